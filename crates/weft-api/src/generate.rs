//! Handlers for `/generate`, `/graph`, and `/graph/stats`.
//!
//! Generation is synchronous and rebuilds the triple set wholesale from the
//! current workspace on every call — no incremental update, which is what
//! makes re-invocation idempotent.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use weft_core::{
  ColumnMappings, Generation, GraphViewModel, Ontology,
  graph::{self, GraphStats},
  store::ConfigStore,
};
use weft_rdf::RdfFormat;

use crate::{AppState, error::ApiError};

// ─── Shared plumbing ─────────────────────────────────────────────────────────

/// Resolve the ontology to generate with: an explicit request id, else the
/// stored selection.
async fn resolve_ontology<S>(
  state: &AppState<S>,
  requested: Option<String>,
) -> Result<Ontology, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = match requested {
    Some(id) => id,
    None => state
      .store
      .selected_ontology()
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::BadRequest(
          "no ontology requested and none selected".to_string(),
        )
      })?,
  };
  state
    .store
    .get_ontology(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("ontology {id:?} not found")))
}

async fn run_generation<S>(
  state: &AppState<S>,
  ontology: &Ontology,
  column_mappings: &ColumnMappings,
) -> Result<Generation, ApiError>
where
  S: ConfigStore,
{
  let workspace = state.workspace.read().await;
  weft_core::generate(
    workspace.tables(),
    ontology,
    workspace.mappings(),
    column_mappings,
  )
  .map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ─── Generate ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
  pub format:          RdfFormat,
  /// Ontology id; defaults to the stored selection.
  pub ontology:        Option<String>,
  /// Manual column→predicate choices, per table.
  #[serde(default)]
  pub column_mappings: ColumnMappings,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub format:       RdfFormat,
  /// Suggested download name, e.g. `output.ttl`.
  pub filename:     String,
  pub media_type:   String,
  pub triple_count: usize,
  pub warnings:     Vec<String>,
  pub serialized:   String,
}

/// `POST /generate`
pub async fn generate_document<S>(
  State(state): State<AppState<S>>,
  Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ontology = resolve_ontology(&state, request.ontology).await?;
  let generation =
    run_generation(&state, &ontology, &request.column_mappings).await?;
  let serialized = weft_rdf::serialize(
    request.format,
    &generation.triples,
    &ontology.prefixes,
    &ontology.base,
  )
  .map_err(ApiError::store)?;

  Ok(Json(GenerateResponse {
    format: request.format,
    filename: format!("output.{}", request.format.extension()),
    media_type: request.format.mime().to_string(),
    triple_count: generation.triples.len(),
    warnings: generation.warnings,
    serialized,
  }))
}

// ─── Graph projection ────────────────────────────────────────────────────────

/// `GET /graph` — project the current workspace under the selected ontology.
pub async fn graph<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<GraphViewModel>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ontology = resolve_ontology(&state, None).await?;
  let generation =
    run_generation(&state, &ontology, &ColumnMappings::new()).await?;
  Ok(Json(graph::project(&generation.triples)))
}

/// `GET /graph/stats`
pub async fn graph_stats<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<GraphStats>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ontology = resolve_ontology(&state, None).await?;
  let generation =
    run_generation(&state, &ontology, &ColumnMappings::new()).await?;
  Ok(Json(graph::stats(&graph::project(&generation.triples))))
}
