//! Error types for the weft-csv ingestion codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("empty input: no header line or data rows found")]
  Empty,

  #[error("no columns detected in header line")]
  NoColumns,

  #[error("duplicate header {0:?}")]
  DuplicateHeader(String),

  #[error(
    "header {0:?} collides with the synthetic identifier column; \
     designate it as the id column or rename it"
  )]
  IdColumnCollision(String),

  #[error("designated id column {0:?} not found in headers")]
  MissingIdColumn(String),

  #[error("CSV parse error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
