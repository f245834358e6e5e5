//! Triples — the atomic unit of generated RDF data.

use serde::{Deserialize, Serialize};

/// The `rdf:type` predicate IRI.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

// ─── Term ────────────────────────────────────────────────────────────────────

/// The object position of a triple: a resource IRI or a plain literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
  Iri(String),
  Literal(String),
}

impl Term {
  pub fn as_iri(&self) -> Option<&str> {
    match self {
      Self::Iri(iri) => Some(iri),
      Self::Literal(_) => None,
    }
  }

  pub fn as_literal(&self) -> Option<&str> {
    match self {
      Self::Iri(_) => None,
      Self::Literal(value) => Some(value),
    }
  }
}

// ─── Triple ──────────────────────────────────────────────────────────────────

/// A subject–predicate–object statement. Subject and predicate are always
/// IRIs; the object may be an IRI or a literal.
///
/// Triple sets are conceptually unordered, but generation emits them in a
/// deterministic order (table, then row, then column, then relation
/// mappings) so identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
  pub subject:   String,
  pub predicate: String,
  pub object:    Term,
}

impl Triple {
  pub fn new(
    subject: impl Into<String>,
    predicate: impl Into<String>,
    object: Term,
  ) -> Self {
    Self {
      subject: subject.into(),
      predicate: predicate.into(),
      object,
    }
  }
}

/// The local name of an IRI: the segment after the last `/` or `#`.
pub fn local_name(iri: &str) -> &str {
  iri
    .rfind(['/', '#'])
    .map(|i| &iri[i + 1..])
    .unwrap_or(iri)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn local_name_after_slash_or_hash() {
    assert_eq!(local_name("http://example.org/data/name"), "name");
    assert_eq!(local_name("http://www.w3.org/2000/01/rdf-schema#label"), "label");
    assert_eq!(local_name("name"), "name");
  }

  #[test]
  fn term_accessors() {
    assert_eq!(Term::Iri("a".into()).as_iri(), Some("a"));
    assert_eq!(Term::Iri("a".into()).as_literal(), None);
    assert_eq!(Term::Literal("x".into()).as_literal(), Some("x"));
  }
}
