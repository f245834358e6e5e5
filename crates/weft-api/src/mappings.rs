//! Handlers for `/mappings` — the relation mappings between loaded tables.
//!
//! The generator itself tolerates dangling references, but this boundary
//! enforces the collaborator contract: every submitted mapping must be
//! complete and reference loaded tables and real columns, or the whole
//! replace is rejected.

use axum::{Json, extract::State};
use weft_core::{RelationMapping, store::ConfigStore};

use crate::{AppState, error::ApiError};

/// `GET /mappings`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Json<Vec<RelationMapping>>
where
  S: ConfigStore,
{
  let workspace = state.workspace.read().await;
  Json(workspace.mappings().to_vec())
}

/// `PUT /mappings` — replace the full mapping list.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Json(mappings): Json<Vec<RelationMapping>>,
) -> Result<Json<Vec<RelationMapping>>, ApiError>
where
  S: ConfigStore,
{
  let mut workspace = state.workspace.write().await;

  for (index, mapping) in mappings.iter().enumerate() {
    if !mapping.is_complete() {
      return Err(ApiError::BadRequest(format!(
        "mapping {index} is incomplete; all fields are required"
      )));
    }
    for (table, column) in [
      (&mapping.source_table, &mapping.source_column),
      (&mapping.target_table, &mapping.target_column),
    ] {
      let Some(table) = workspace.table(table) else {
        return Err(ApiError::BadRequest(format!(
          "mapping {index} references table {table:?}, which is not loaded"
        )));
      };
      if table.column_index(column).is_none() {
        return Err(ApiError::BadRequest(format!(
          "mapping {index} references column {column:?}, which is not in \
           table {:?}",
          table.name
        )));
      }
    }
  }

  workspace.set_mappings(mappings);
  Ok(Json(workspace.mappings().to_vec()))
}
