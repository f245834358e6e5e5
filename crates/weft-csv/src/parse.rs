//! CSV → [`Table`] ingestion.
//!
//! Pipeline:
//!   raw &str
//!     └─ csv::Reader (RFC 4180 quoting, flexible record lengths)
//!          └─ header uniqueness + id-column checks
//!               └─ pad/truncate rows → Table

use uuid::Uuid;
use weft_core::table::{Row, Table};

use crate::{
  IdColumn, SYNTHETIC_ID_COLUMN,
  error::{Error, Result},
  table_name,
};

pub(crate) fn ingest_one(
  name: &str,
  input: &str,
  id: &IdColumn,
) -> Result<Table> {
  if input.trim().is_empty() {
    return Err(Error::Empty);
  }

  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_reader(input.as_bytes());

  let mut headers: Vec<String> =
    reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
  if headers.is_empty() || headers.iter().all(String::is_empty) {
    return Err(Error::NoColumns);
  }
  let mut seen = std::collections::HashSet::new();
  for header in &headers {
    if !seen.insert(header.as_str()) {
      return Err(Error::DuplicateHeader(header.clone()));
    }
  }

  // Resolve the identifier strategy before reading any rows, so a bad
  // designation rejects the file as a whole.
  let id_column = match id {
    IdColumn::Synthetic => {
      if headers.iter().any(|h| h == SYNTHETIC_ID_COLUMN) {
        return Err(Error::IdColumnCollision(SYNTHETIC_ID_COLUMN.to_string()));
      }
      SYNTHETIC_ID_COLUMN.to_string()
    }
    IdColumn::Existing(column) => {
      if !headers.iter().any(|h| h == column) {
        return Err(Error::MissingIdColumn(column.clone()));
      }
      column.clone()
    }
  };

  let source_width = headers.len();
  let mut rows: Vec<Row> = Vec::new();
  for record in reader.records() {
    let record = record?;
    let mut values: Vec<String> =
      record.iter().map(str::to_string).collect();
    // A lone empty field is what a whitespace-only line parses to.
    if values.len() == 1 && values[0].trim().is_empty() {
      continue;
    }
    // Dense rows: exactly one value per source column.
    values.resize(source_width, String::new());
    if matches!(id, IdColumn::Synthetic) {
      values.push(Uuid::new_v4().to_string());
    }
    rows.push(Row::new(values));
  }
  if rows.is_empty() {
    return Err(Error::Empty);
  }

  if matches!(id, IdColumn::Synthetic) {
    headers.push(SYNTHETIC_ID_COLUMN.to_string());
  }

  Ok(Table {
    name: table_name(name),
    headers,
    rows,
    id_column,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  fn synthetic(name: &str, input: &str) -> Result<Table> {
    ingest_one(name, input, &IdColumn::Synthetic)
  }

  // ── Shape ───────────────────────────────────────────────────────────────

  #[test]
  fn row_and_field_counts_match_input() {
    let t = synthetic("people.csv", "name,age\nAlice,30\nBob,25\n").unwrap();
    assert_eq!(t.name, "people");
    assert_eq!(t.headers, vec!["name", "age", "row_id"]);
    assert_eq!(t.rows.len(), 2);
    for row in &t.rows {
      assert_eq!(row.len(), t.headers.len());
    }
  }

  #[test]
  fn empty_lines_are_skipped() {
    let t =
      synthetic("p.csv", "name,age\nAlice,30\n\n\nBob,25\n\n").unwrap();
    assert_eq!(t.rows.len(), 2);
  }

  #[test]
  fn short_rows_are_padded_and_long_rows_truncated() {
    let t = synthetic("p.csv", "a,b,c\n1\n1,2,3,4\n").unwrap();
    assert_eq!(t.rows[0].values()[..3], ["1", "", ""]);
    assert_eq!(t.rows[1].values()[..3], ["1", "2", "3"]);
  }

  // ── Quoting ─────────────────────────────────────────────────────────────

  #[test]
  fn quoted_field_may_contain_the_delimiter() {
    let t = synthetic("p.csv", "name,address\nAda,\"1 Main St, Springfield\"\n")
      .unwrap();
    assert_eq!(t.value(&t.rows[0], "address"), Some("1 Main St, Springfield"));
  }

  #[test]
  fn doubled_quotes_escape_a_literal_quote() {
    let t = synthetic("p.csv", "name,nick\nAda,\"the \"\"Countess\"\"\"\n")
      .unwrap();
    assert_eq!(t.value(&t.rows[0], "nick"), Some("the \"Countess\""));
  }

  // ── Synthetic identifiers ───────────────────────────────────────────────

  #[test]
  fn synthetic_ids_are_unique_and_non_empty() {
    let t = synthetic("p.csv", "name\nA\nB\nC\n").unwrap();
    let ids: HashSet<_> =
      t.rows.iter().map(|r| t.row_id(r).unwrap().to_string()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| !id.is_empty()));
  }

  #[test]
  fn synthetic_id_header_collision_is_rejected() {
    let r = synthetic("p.csv", "name,row_id\nA,1\n");
    assert!(matches!(r, Err(Error::IdColumnCollision(_))));
  }

  // ── Designated id columns ───────────────────────────────────────────────

  #[test]
  fn existing_id_column_is_used_as_is() {
    let t = ingest_one(
      "p.csv",
      "email,name\nada@example.com,Ada\n",
      &IdColumn::Existing("email".to_string()),
    )
    .unwrap();
    assert_eq!(t.id_column, "email");
    assert_eq!(t.row_id(&t.rows[0]), Some("ada@example.com"));
    assert_eq!(t.headers.len(), 2); // nothing appended
  }

  #[test]
  fn missing_designated_id_column_is_rejected() {
    let r = ingest_one(
      "p.csv",
      "name\nAda\n",
      &IdColumn::Existing("email".to_string()),
    );
    assert!(matches!(r, Err(Error::MissingIdColumn(_))));
  }

  // ── Failure modes ───────────────────────────────────────────────────────

  #[test]
  fn empty_input_is_rejected() {
    assert!(matches!(synthetic("p.csv", ""), Err(Error::Empty)));
    assert!(matches!(synthetic("p.csv", "  \n \n"), Err(Error::Empty)));
  }

  #[test]
  fn header_only_input_is_rejected() {
    assert!(matches!(synthetic("p.csv", "name,age\n"), Err(Error::Empty)));
  }

  #[test]
  fn duplicate_headers_are_rejected() {
    let r = synthetic("p.csv", "name,name\nA,B\n");
    assert!(matches!(r, Err(Error::DuplicateHeader(_))));
  }
}
