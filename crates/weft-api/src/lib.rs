//! JSON HTTP API for Weft.
//!
//! Exposes an axum [`Router`] backed by any
//! [`weft_core::store::ConfigStore`]. The router owns the in-memory
//! [`Workspace`] of ingested tables and relation mappings; all pure
//! transforms (ingest, generate, project) live in the weft-core/csv/rdf
//! crates, keeping the handlers thin adapters.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store);
//! axum::serve(listener, weft_api::api_router(state)).await?;
//! ```

pub mod error;
pub mod generate;
pub mod mappings;
pub mod ontologies;
pub mod tables;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tokio::sync::RwLock;
use weft_core::{RelationMapping, Table, store::ConfigStore};

pub use error::ApiError;

// ─── Workspace ───────────────────────────────────────────────────────────────

/// The mutable application state: ingested tables plus the relation
/// mappings declared between them. Created empty on startup, replaced
/// wholesale on reset — generation reads it, never mutates it.
#[derive(Debug, Default)]
pub struct Workspace {
  tables:   Vec<Table>,
  mappings: Vec<RelationMapping>,
}

impl Workspace {
  pub fn tables(&self) -> &[Table] { &self.tables }

  pub fn mappings(&self) -> &[RelationMapping] { &self.mappings }

  pub fn table(&self, name: &str) -> Option<&Table> {
    self.tables.iter().find(|t| t.name == name)
  }

  /// Add a table. Returns `false` (and leaves the workspace unchanged) when
  /// a table with the same name is already loaded.
  pub fn insert_table(&mut self, table: Table) -> bool {
    if self.table(&table.name).is_some() {
      return false;
    }
    self.tables.push(table);
    true
  }

  /// Remove a table and any relation mappings referencing it. Returns the
  /// number of mappings dropped, or `None` if the table was not loaded.
  pub fn remove_table(&mut self, name: &str) -> Option<usize> {
    let before = self.tables.len();
    self.tables.retain(|t| t.name != name);
    if self.tables.len() == before {
      return None;
    }
    let mappings_before = self.mappings.len();
    self.mappings.retain(|m| !m.references(name));
    Some(mappings_before - self.mappings.len())
  }

  pub fn set_mappings(&mut self, mappings: Vec<RelationMapping>) {
    self.mappings = mappings;
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub workspace: Arc<RwLock<Workspace>>,
}

impl<S> AppState<S> {
  pub fn new(store: S) -> Self {
    Self {
      store:     Arc::new(store),
      workspace: Arc::new(RwLock::new(Workspace::default())),
    }
  }
}

// Manual impl: `S` itself does not need to be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      workspace: Arc::clone(&self.workspace),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: ConfigStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Tables
    .route("/tables", get(tables::list::<S>))
    .route(
      "/tables/{name}",
      post(tables::upload::<S>).delete(tables::remove::<S>),
    )
    .route("/tables/{name}/preview", get(tables::preview::<S>))
    // Relation mappings
    .route(
      "/mappings",
      get(mappings::list::<S>).put(mappings::replace::<S>),
    )
    // Generation + projection
    .route("/generate", post(generate::generate_document::<S>))
    .route("/graph", get(generate::graph::<S>))
    .route("/graph/stats", get(generate::graph_stats::<S>))
    // Ontologies + endpoint config
    .route(
      "/ontologies",
      get(ontologies::list::<S>).post(ontologies::save::<S>),
    )
    .route(
      "/ontologies/{id}",
      get(ontologies::get_one::<S>).delete(ontologies::remove::<S>),
    )
    .route("/ontologies/{id}/select", post(ontologies::select::<S>))
    .route(
      "/endpoint",
      get(ontologies::endpoint::<S>).put(ontologies::save_endpoint::<S>),
    )
    .layer(tower_http::trace::TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Workspace tests ─────────────────────────────────────────────────────────


// ─── Router tests ────────────────────────────────────────────────────────────
