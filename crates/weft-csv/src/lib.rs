//! CSV ingestion codec for Weft.
//!
//! Converts raw CSV text into [`weft_core::Table`]s. Pure synchronous; no
//! HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use weft_csv::{IdColumn, ingest};
//!
//! let table =
//!   ingest("people.csv", "name,age\nAlice,30\n", IdColumn::Synthetic)
//!     .unwrap();
//! println!("{} with {} rows", table.name, table.rows.len());
//! ```

pub mod error;
mod parse;

pub use error::{Error, Result};
use weft_core::Table;

/// Name of the synthetic identifier column appended at ingestion.
pub const SYNTHETIC_ID_COLUMN: &str = "row_id";

// ─── Public types ────────────────────────────────────────────────────────────

/// How rows in an ingested table are identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdColumn {
  /// Append a [`SYNTHETIC_ID_COLUMN`] populated with a fresh UUID per row.
  /// Ingestion fails if a column with that name already exists.
  Synthetic,
  /// Use an existing column as the identifier. Values are not required to
  /// be unique; duplicate keys resolve last-write-wins downstream.
  Existing(String),
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse one CSV document into a [`Table`].
///
/// `name` is the source name; a trailing `.csv` extension (any case) is
/// stripped to form the table name. The first record is the header line;
/// quoted fields may contain the delimiter, and doubled quotes escape a
/// literal quote. Empty lines are skipped; short rows are padded and long
/// rows truncated so every row has exactly `headers.len()` fields.
pub fn ingest(name: &str, input: &str, id: IdColumn) -> Result<Table> {
  parse::ingest_one(name, input, &id)
}

/// Parse a batch of `(name, text)` documents independently.
///
/// A file that fails to parse yields `Err(…)` in the corresponding position
/// without aborting the rest of the batch.
pub fn ingest_many(
  files: &[(String, String)],
  id: IdColumn,
) -> Vec<Result<Table>> {
  files
    .iter()
    .map(|(name, input)| parse::ingest_one(name, input, &id))
    .collect()
}

/// Strip a trailing `.csv` (any case) from a source name.
pub fn table_name(source: &str) -> String {
  let lower = source.to_ascii_lowercase();
  match lower.strip_suffix(".csv") {
    Some(_) => source[..source.len() - 4].to_string(),
    None => source.to_string(),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
