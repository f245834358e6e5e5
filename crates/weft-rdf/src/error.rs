//! Error types for the weft-rdf codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown RDF format {0:?} (expected \"turtle\" or \"json-ld\")")]
  UnknownFormat(String),

  #[error("malformed Turtle line: {0}")]
  MalformedLine(String),

  #[error("unknown prefix {0:?}")]
  UnknownPrefix(String),

  #[error("malformed JSON-LD document: {0}")]
  MalformedDocument(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
