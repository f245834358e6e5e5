//! Handlers for `/tables` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tables` | Summaries of all loaded tables |
//! | `POST`   | `/tables/:name` | Body: raw CSV text; `?id_column=` designates an existing id column |
//! | `DELETE` | `/tables/:name` | Also drops relation mappings referencing the table |
//! | `GET`    | `/tables/:name/preview?rows=N` | Defaults to the stored preview length |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use weft_core::{Table, store::ConfigStore, table::Row};
use weft_csv::IdColumn;

use crate::{AppState, error::ApiError};

// ─── Summaries ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TableSummary {
  pub name:      String,
  pub headers:   Vec<String>,
  pub rows:      usize,
  pub id_column: String,
}

impl TableSummary {
  fn of(table: &Table) -> Self {
    Self {
      name:      table.name.clone(),
      headers:   table.headers.clone(),
      rows:      table.rows.len(),
      id_column: table.id_column.clone(),
    }
  }
}

/// `GET /tables`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Json<Vec<TableSummary>>
where
  S: ConfigStore,
{
  let workspace = state.workspace.read().await;
  Json(workspace.tables().iter().map(TableSummary::of).collect())
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  pub id_column: Option<String>,
}

/// `POST /tables/:name` — body is the raw CSV text.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Query(params): Query<UploadParams>,
  body: String,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConfigStore,
{
  let id = match params.id_column {
    Some(column) => IdColumn::Existing(column),
    None => IdColumn::Synthetic,
  };
  let table = weft_csv::ingest(&name, &body, id)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let summary = TableSummary::of(&table);

  let mut workspace = state.workspace.write().await;
  if !workspace.insert_table(table) {
    return Err(ApiError::Conflict(format!(
      "table {:?} is already loaded",
      summary.name
    )));
  }
  tracing::info!(table = %summary.name, rows = summary.rows, "table ingested");
  Ok((StatusCode::CREATED, Json(summary)))
}

// ─── Preview ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
  pub rows: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TablePreview {
  pub name:    String,
  pub headers: Vec<String>,
  pub rows:    Vec<Row>,
}

/// `GET /tables/:name/preview?rows=N`
pub async fn preview<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Query(params): Query<PreviewParams>,
) -> Result<Json<TablePreview>, ApiError>
where
  S: ConfigStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = match params.rows {
    Some(rows) => rows,
    None => state.store.preview_rows().await.map_err(ApiError::store)?,
  };

  let workspace = state.workspace.read().await;
  let table = workspace
    .table(&name)
    .ok_or_else(|| ApiError::NotFound(format!("table {name:?} not loaded")))?;
  Ok(Json(TablePreview {
    name:    table.name.clone(),
    headers: table.headers.clone(),
    rows:    table.rows.iter().take(limit).cloned().collect(),
  }))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /tables/:name`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ConfigStore,
{
  let mut workspace = state.workspace.write().await;
  match workspace.remove_table(&name) {
    Some(dropped) => {
      tracing::info!(table = %name, dropped_mappings = dropped, "table removed");
      Ok(StatusCode::NO_CONTENT)
    }
    None => Err(ApiError::NotFound(format!("table {name:?} not loaded"))),
  }
}
