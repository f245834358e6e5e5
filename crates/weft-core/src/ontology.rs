//! Ontology configuration — prefixes, base IRI, classes, and predicates.
//!
//! Ontologies are exchanged as JSON (`{id, name, prefixes, base, classes,
//! predicates}`) and persisted through a [`crate::store::ConfigStore`]. Two
//! built-ins ship with every store and their ids are reserved: `example` and
//! `blank`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ontology ids that ship as built-ins and can never be overwritten.
pub const RESERVED_IDS: [&str; 2] = ["example", "blank"];

// ─── Definitions ─────────────────────────────────────────────────────────────

/// A class known to the ontology. `uri` may be a CURIE or a full IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
  #[serde(alias = "id")]
  pub name: String,
  pub uri:  String,
}

/// A predicate known to the ontology. `uri` may be a CURIE or a full IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDef {
  #[serde(alias = "id")]
  pub name: String,
  pub uri:  String,
}

// ─── Ontology ────────────────────────────────────────────────────────────────

/// A user-editable mapping configuration: prefix map, base IRI, and the
/// classes and predicates that column names resolve against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ontology {
  pub id:         String,
  pub name:       String,
  /// prefix → namespace IRI. A `BTreeMap` keeps serialization stable.
  #[serde(default)]
  pub prefixes:   BTreeMap<String, String>,
  pub base:       String,
  #[serde(default)]
  pub classes:    Vec<ClassDef>,
  #[serde(default)]
  pub predicates: Vec<PredicateDef>,
}

impl Ontology {
  // ── Built-ins ─────────────────────────────────────────────────────────

  /// The `example` built-in: schema.org-flavoured defaults covering the
  /// common people/orders/products demo tables.
  pub fn example() -> Self {
    let prefixes = BTreeMap::from([
      ("ex".to_string(), "http://example.org/ns#".to_string()),
      ("schema".to_string(), "http://schema.org/".to_string()),
      (
        "rdf".to_string(),
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_string(),
      ),
      (
        "rdfs".to_string(),
        "http://www.w3.org/2000/01/rdf-schema#".to_string(),
      ),
    ]);
    let class = |name: &str, uri: &str| ClassDef {
      name: name.to_string(),
      uri:  uri.to_string(),
    };
    let pred = |name: &str, uri: &str| PredicateDef {
      name: name.to_string(),
      uri:  uri.to_string(),
    };
    Self {
      id: "example".to_string(),
      name: "Example Ontology".to_string(),
      prefixes,
      base: "http://example.org/".to_string(),
      classes: vec![
        class("Person", "schema:Person"),
        class("Product", "schema:Product"),
        class("Order", "ex:Order"),
      ],
      predicates: vec![
        pred("schemaName", "schema:name"),
        pred("schemaAge", "schema:age"),
        pred("schemaCity", "schema:addressLocality"),
        pred("exHasOrder", "ex:hasOrder"),
        pred("exCustomer", "ex:customer"),
        pred("exOrderedProduct", "ex:orderedProduct"),
        pred("id", "ex:id"),
      ],
    }
  }

  /// The `blank` built-in: an empty ontology for fully manual definitions.
  pub fn blank() -> Self {
    Self {
      id:         "blank".to_string(),
      name:       "Blank Ontology (Manual Definition)".to_string(),
      prefixes:   BTreeMap::new(),
      base:       "http://example.org/base/".to_string(),
      classes:    vec![],
      predicates: vec![],
    }
  }

  /// Look up a built-in ontology by reserved id.
  pub fn builtin(id: &str) -> Option<Self> {
    match id {
      "example" => Some(Self::example()),
      "blank" => Some(Self::blank()),
      _ => None,
    }
  }

  pub fn is_reserved(id: &str) -> bool { RESERVED_IDS.contains(&id) }

  // ── Validation ────────────────────────────────────────────────────────

  /// The gate applied before an ontology replaces persisted or in-memory
  /// state: structural checks only, never a partial apply.
  pub fn validate(&self) -> Result<()> {
    if self.id.trim().is_empty() {
      return Err(Error::InvalidOntology("id must not be empty".into()));
    }
    if self.name.trim().is_empty() {
      return Err(Error::InvalidOntology("name must not be empty".into()));
    }
    if self.base.trim().is_empty() {
      return Err(Error::InvalidOntology("base IRI must not be empty".into()));
    }
    for def in &self.classes {
      if def.name.trim().is_empty() || def.uri.trim().is_empty() {
        return Err(Error::InvalidOntology(
          "class definitions need a name and a uri".into(),
        ));
      }
    }
    for def in &self.predicates {
      if def.name.trim().is_empty() || def.uri.trim().is_empty() {
        return Err(Error::InvalidOntology(
          "predicate definitions need a name and a uri".into(),
        ));
      }
    }
    Ok(())
  }

  // ── Resolution ────────────────────────────────────────────────────────

  /// Resolve a CURIE or IRI reference to a full IRI.
  ///
  /// `prefix:local` with a known prefix expands through the prefix map; an
  /// absolute IRI passes through; anything else that still contains a `:`
  /// is treated as an opaque IRI (unknown prefixes are not an error). A
  /// bare name returns `None` — the caller decides how to synthesize.
  pub fn resolve(&self, value: &str) -> Option<String> {
    if is_absolute_iri(value) {
      return Some(value.to_string());
    }
    if let Some((prefix, local)) = value.split_once(':') {
      if let Some(namespace) = self.prefixes.get(prefix) {
        return Some(format!("{namespace}{local}"));
      }
      return Some(value.to_string()); // opaque
    }
    None
  }

  /// Case-insensitive class lookup.
  pub fn find_class(&self, name: &str) -> Option<&ClassDef> {
    self
      .classes
      .iter()
      .find(|c| c.name.eq_ignore_ascii_case(name))
  }

  /// Case-insensitive predicate lookup for a column name. Also matches
  /// `schema`-prefixed predicate names (`name` ↔ `schemaName`), which the
  /// built-in example ontology relies on.
  pub fn find_predicate(&self, column: &str) -> Option<&PredicateDef> {
    let prefixed = format!("schema{column}");
    self.predicates.iter().find(|p| {
      p.name.eq_ignore_ascii_case(column)
        || p.name.eq_ignore_ascii_case(&prefixed)
    })
  }
}

/// `scheme://…` with a plausible scheme.
pub fn is_absolute_iri(value: &str) -> bool {
  match value.split_once("://") {
    Some((scheme, rest)) => {
      !scheme.is_empty()
        && !rest.is_empty()
        && scheme
          .chars()
          .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    }
    None => false,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
