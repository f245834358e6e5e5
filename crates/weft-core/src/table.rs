//! Tables and rows — the parsed form of one CSV source.
//!
//! A [`Row`] stores its values positionally; the owning [`Table`]'s header
//! list gives the values their column names. Every row in a table has exactly
//! `headers.len()` values (ingestion pads or truncates).

use serde::{Deserialize, Serialize};

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One source record. Values are aligned with the owning table's `headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
  values: Vec<String>,
}

impl Row {
  pub fn new(values: Vec<String>) -> Self { Self { values } }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.values.get(index).map(String::as_str)
  }

  pub fn len(&self) -> usize { self.values.len() }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  pub fn values(&self) -> &[String] { &self.values }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// A named, ordered sequence of rows sharing a header set.
///
/// `id_column` names the header whose values identify rows — either the
/// synthetic column appended at ingestion or a user-designated existing
/// column. Synthetic identifiers are unique per row and stable for the
/// table's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
  /// Source name with any `.csv` extension already stripped.
  pub name:      String,
  pub headers:   Vec<String>,
  pub rows:      Vec<Row>,
  pub id_column: String,
}

impl Table {
  /// Index of `column` in the header list, or `None` if absent.
  pub fn column_index(&self, column: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == column)
  }

  /// The value of `column` in `row`, or `None` if the column is unknown.
  pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
    self.column_index(column).and_then(|i| row.get(i))
  }

  /// The row's identifier value (the `id_column` cell).
  pub fn row_id<'a>(&self, row: &'a Row) -> Option<&'a str> {
    self.value(row, &self.id_column)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn people() -> Table {
    Table {
      name:      "people".to_string(),
      headers:   vec!["name".into(), "age".into(), "row_id".into()],
      rows:      vec![
        Row::new(vec!["Alice".into(), "30".into(), "r1".into()]),
        Row::new(vec!["Bob".into(), "25".into(), "r2".into()]),
      ],
      id_column: "row_id".to_string(),
    }
  }

  #[test]
  fn value_lookup_by_column_name() {
    let t = people();
    assert_eq!(t.value(&t.rows[0], "name"), Some("Alice"));
    assert_eq!(t.value(&t.rows[1], "age"), Some("25"));
    assert_eq!(t.value(&t.rows[0], "missing"), None);
  }

  #[test]
  fn row_id_reads_id_column() {
    let t = people();
    assert_eq!(t.row_id(&t.rows[0]), Some("r1"));
    assert_eq!(t.row_id(&t.rows[1]), Some("r2"));
  }
}
