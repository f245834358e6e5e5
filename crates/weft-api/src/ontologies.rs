//! Handlers for `/ontologies` and `/endpoint` configuration.
//!
//! Reserved-id and validation failures are client errors and never touch the
//! store; everything the store itself rejects surfaces as a 500.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use weft_core::{
  Ontology,
  store::{ConfigStore, EndpointConfig},
};

use crate::{AppState, error::ApiError};

// ─── Ontologies ──────────────────────────────────────────────────────────────

/// `GET /ontologies`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Ontology>>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ontologies =
    state.store.list_ontologies().await.map_err(ApiError::store)?;
  Ok(Json(ontologies))
}

/// `GET /ontologies/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Ontology>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ontology = state
    .store
    .get_ontology(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("ontology {id:?} not found")))?;
  Ok(Json(ontology))
}

/// `POST /ontologies` — body is the exchange-format ontology JSON.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(ontology): Json<Ontology>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if Ontology::is_reserved(&ontology.id) {
    return Err(ApiError::BadRequest(format!(
      "ontology id {:?} is reserved",
      ontology.id
    )));
  }
  ontology
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let id = ontology.id.clone();
  state
    .store
    .save_ontology(ontology)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// `DELETE /ontologies/:id`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if Ontology::is_reserved(&id) {
    return Err(ApiError::BadRequest(format!(
      "built-in ontology {id:?} cannot be deleted"
    )));
  }
  state
    .store
    .delete_ontology(&id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /ontologies/:id/select`
pub async fn select<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if state
    .store
    .get_ontology(&id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("ontology {id:?} not found")));
  }
  state
    .store
    .set_selected_ontology(&id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Endpoint config ─────────────────────────────────────────────────────────

/// `GET /endpoint`
pub async fn endpoint<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<EndpointConfig>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let config = state.store.load_endpoint().await.map_err(ApiError::store)?;
  Ok(Json(config))
}

/// `PUT /endpoint`
pub async fn save_endpoint<S>(
  State(state): State<AppState<S>>,
  Json(config): Json<EndpointConfig>,
) -> Result<StatusCode, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  config
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  state
    .store
    .save_endpoint(&config)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
