//! The `ConfigStore` trait and the persisted configuration types.
//!
//! The trait is implemented by storage backends (e.g. `weft-store-sqlite`).
//! Higher layers (`weft-api`, `weft-cli`) depend on this abstraction, not on
//! any concrete backend. Only *configuration* is durable — tables and
//! generated triples are rebuilt from source on every run.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  ontology::Ontology,
};

// ─── Endpoint configuration ──────────────────────────────────────────────────

/// Where generated RDF gets submitted.
///
/// `headers` is kept as the raw JSON string the user supplied; it must parse
/// as a JSON object, which [`EndpointConfig::validate`] enforces before any
/// save or send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
  pub url:         String,
  pub method:      String,
  pub headers:     String,
  pub named_graph: String,
}

impl Default for EndpointConfig {
  fn default() -> Self {
    Self {
      url:         "http://localhost:3030/ds/update".to_string(),
      method:      "POST".to_string(),
      headers:     "{}".to_string(),
      named_graph: String::new(),
    }
  }
}

impl EndpointConfig {
  /// Parse the raw headers string into name/value pairs.
  pub fn parsed_headers(&self) -> Result<Vec<(String, String)>> {
    let value: serde_json::Value = serde_json::from_str(&self.headers)
      .map_err(|e| Error::InvalidEndpointHeaders(e.to_string()))?;
    let Some(object) = value.as_object() else {
      return Err(Error::InvalidEndpointHeaders(
        "expected a JSON object".to_string(),
      ));
    };
    Ok(
      object
        .iter()
        .map(|(name, v)| {
          let value = match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
          };
          (name.clone(), value)
        })
        .collect(),
    )
  }

  pub fn validate(&self) -> Result<()> {
    self.parsed_headers().map(|_| ())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over durable key-value configuration storage.
///
/// Corrupt stored blobs are a backend concern: implementations reset the
/// offending entry to its default and log a warning rather than failing the
/// read. Writes are validated before they replace anything — a bad payload
/// never partially applies.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ConfigStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Ontologies ────────────────────────────────────────────────────────

  /// All ontologies: the two built-ins followed by stored customs.
  fn list_ontologies(
    &self,
  ) -> impl Future<Output = Result<Vec<Ontology>, Self::Error>> + Send + '_;

  /// Fetch one ontology by id (built-in or custom).
  fn get_ontology<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Ontology>, Self::Error>> + Send + 'a;

  /// Validate and persist a custom ontology, replacing any previous version
  /// with the same id. Reserved ids (`example`, `blank`) are rejected.
  fn save_ontology(
    &self,
    ontology: Ontology,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a custom ontology. Reserved ids are rejected.
  fn delete_ontology<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The id of the currently selected ontology, if any.
  fn selected_ontology(
    &self,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Select an ontology by id; it must exist.
  fn set_selected_ontology<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Endpoint ──────────────────────────────────────────────────────────

  /// The stored endpoint configuration, or defaults.
  fn load_endpoint(
    &self,
  ) -> impl Future<Output = Result<EndpointConfig, Self::Error>> + Send + '_;

  /// Validate and persist the endpoint configuration.
  fn save_endpoint<'a>(
    &'a self,
    config: &'a EndpointConfig,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Preferences ───────────────────────────────────────────────────────

  /// How many rows table previews return by default.
  fn preview_rows(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn set_preview_rows(
    &self,
    rows: usize,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
