//! Error types for `weft-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no tables loaded; ingest at least one CSV before generating")]
  NoTables,

  #[error("invalid ontology: {0}")]
  InvalidOntology(String),

  #[error("ontology id {0:?} is reserved and cannot be overwritten")]
  ReservedOntologyId(String),

  #[error("ontology not found: {0}")]
  OntologyNotFound(String),

  #[error("endpoint headers must be a JSON object: {0}")]
  InvalidEndpointHeaders(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
