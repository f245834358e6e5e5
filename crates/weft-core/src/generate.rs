//! The triple generator — maps tables through an ontology to RDF triples.
//!
//! Pipeline per table, in order:
//!   rows → subject IRIs
//!     └─ optional `rdf:type` triple (table-name/class heuristic)
//!          └─ one literal triple per non-empty, non-identifier column
//! then one resource triple per resolved relation-mapping pair.
//!
//! Generation is pure and deterministic: identical inputs produce an
//! identical triple sequence. Data-level problems (missing identifiers,
//! unmatched predicates, dangling relation endpoints) are skipped with a
//! warning; only structural problems (no tables, invalid ontology) abort.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  ontology::Ontology,
  table::Table,
  triple::{RDF_TYPE, Term, Triple},
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A user-declared foreign-key-like link between two tables.
///
/// Rows in `source_table` whose `source_column` value equals some row's
/// `target_column` value in `target_table` are linked by `predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMapping {
  pub source_table:  String,
  pub source_column: String,
  pub target_table:  String,
  pub target_column: String,
  pub predicate:     String,
}

impl RelationMapping {
  /// All four endpoints and the predicate are non-empty.
  pub fn is_complete(&self) -> bool {
    !self.source_table.is_empty()
      && !self.source_column.is_empty()
      && !self.target_table.is_empty()
      && !self.target_column.is_empty()
      && !self.predicate.is_empty()
  }

  /// Whether the mapping references `table` on either side.
  pub fn references(&self, table: &str) -> bool {
    self.source_table == table || self.target_table == table
  }
}

/// Manual column→predicate choices, per table. The inner value is a
/// predicate name, CURIE, or IRI; columns without an entry fall back to
/// automatic matching against the ontology's predicate names.
pub type ColumnMappings = BTreeMap<String, BTreeMap<String, String>>;

// ─── Output ──────────────────────────────────────────────────────────────────

/// The result of one generation pass: the triples plus the non-fatal
/// warnings accumulated along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
  pub triples:  Vec<Triple>,
  pub warnings: Vec<String>,
}

// ─── IRI helpers ─────────────────────────────────────────────────────────────

/// Percent-encode one path segment derived from free-text values.
/// Whitespace becomes `_` first; unreserved characters pass through.
pub fn encode_segment(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    if c.is_whitespace() {
      out.push('_');
    } else if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
      out.push(c);
    } else {
      let mut buf = [0u8; 4];
      for byte in c.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
      }
    }
  }
  out
}

/// Subject IRI for one row: `base + table + "/" + row identifier`.
pub fn subject_iri(base: &str, table: &str, row_id: &str) -> String {
  format!("{base}{}/{}", encode_segment(table), encode_segment(row_id))
}

/// Uppercase the first character, leave the rest untouched.
fn title_case(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

/// Class-name candidate for a table: TitleCase, minus one trailing `s`
/// (`customers` → `Customer`).
fn singularize(table: &str) -> String {
  let titled = title_case(table);
  titled.strip_suffix('s').map(str::to_string).unwrap_or(titled)
}

// ─── Predicate resolution ────────────────────────────────────────────────────

/// Resolve a predicate reference (name, CURIE, or IRI) to a full IRI,
/// synthesizing under the base IRI as a last resort.
fn resolve_predicate_ref(ontology: &Ontology, value: &str) -> String {
  if let Some(def) = ontology.find_predicate(value) {
    return resolve_def_uri(ontology, &def.uri, &def.name);
  }
  ontology
    .resolve(value)
    .unwrap_or_else(|| format!("{}{}", ontology.base, encode_segment(value)))
}

/// Resolve a class/predicate definition's `uri` field, falling back to the
/// definition's own name under the base IRI when the value is a bare name.
fn resolve_def_uri(ontology: &Ontology, uri: &str, name: &str) -> String {
  ontology
    .resolve(uri)
    .unwrap_or_else(|| format!("{}{}", ontology.base, encode_segment(name)))
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Generate the full triple set for `tables` under `ontology`.
///
/// Triple order is table order, then row order, then column order, then
/// `relations` in declaration order — stable for identical inputs.
pub fn generate(
  tables: &[Table],
  ontology: &Ontology,
  relations: &[RelationMapping],
  column_mappings: &ColumnMappings,
) -> Result<Generation> {
  if tables.is_empty() {
    return Err(Error::NoTables);
  }
  ontology.validate()?;

  let mut triples: Vec<Triple> = Vec::new();
  let mut warnings: Vec<String> = Vec::new();
  fn warn(warnings: &mut Vec<String>, message: String) {
    tracing::warn!("{message}");
    warnings.push(message);
  }

  // ── Row triples ───────────────────────────────────────────────────────
  for table in tables {
    let class_iri = ontology
      .find_class(&singularize(&table.name))
      .map(|def| resolve_def_uri(ontology, &def.uri, &def.name));
    let manual = column_mappings.get(&table.name);

    for (row_index, row) in table.rows.iter().enumerate() {
      let Some(row_id) = table.row_id(row).filter(|id| !id.is_empty()) else {
        warn(
          &mut warnings,
          format!(
            "row {row_index} in table {:?} has no identifier value; skipped",
            table.name
          ),
        );
        continue;
      };
      let subject = subject_iri(&ontology.base, &table.name, row_id);

      if let Some(class_iri) = &class_iri {
        triples.push(Triple::new(
          subject.clone(),
          RDF_TYPE,
          Term::Iri(class_iri.clone()),
        ));
      }

      for (index, column) in table.headers.iter().enumerate() {
        if *column == table.id_column {
          continue;
        }
        let Some(value) = row.get(index).filter(|v| !v.is_empty()) else {
          continue;
        };

        let predicate = if let Some(chosen) =
          manual.and_then(|m| m.get(column))
        {
          resolve_predicate_ref(ontology, chosen)
        } else if let Some(def) = ontology.find_predicate(column) {
          resolve_def_uri(ontology, &def.uri, &def.name)
        } else {
          let synthesized = format!(
            "{}has{}",
            ontology.base,
            encode_segment(&title_case(column))
          );
          warn(
            &mut warnings,
            format!(
              "no predicate matches column {column:?} in table {:?}; \
               using {synthesized}",
              table.name
            ),
          );
          synthesized
        };

        triples.push(Triple::new(
          subject.clone(),
          predicate,
          Term::Literal(value.to_string()),
        ));
      }
    }
  }

  // ── Relation triples ──────────────────────────────────────────────────
  for mapping in relations {
    if !mapping.is_complete() {
      warn(
        &mut warnings,
        format!("incomplete relation mapping skipped: {mapping:?}"),
      );
      continue;
    }
    let source = tables.iter().find(|t| t.name == mapping.source_table);
    let target = tables.iter().find(|t| t.name == mapping.target_table);
    let (Some(source), Some(target)) = (source, target) else {
      warn(
        &mut warnings,
        format!(
          "relation mapping references missing table(s): {:?} or {:?}; \
           skipped",
          mapping.source_table, mapping.target_table
        ),
      );
      continue;
    };
    if source.column_index(&mapping.source_column).is_none()
      || target.column_index(&mapping.target_column).is_none()
    {
      warn(
        &mut warnings,
        format!(
          "relation mapping references unknown column(s): {:?} or {:?}; \
           skipped",
          mapping.source_column, mapping.target_column
        ),
      );
      continue;
    }

    let predicate = resolve_predicate_ref(ontology, &mapping.predicate);

    // Lookup: target-column value → target row identifier. Duplicate keys
    // resolve last-write-wins (known limitation, covered by tests).
    let mut lookup: HashMap<&str, &str> = HashMap::new();
    for row in &target.rows {
      let value = target.value(row, &mapping.target_column);
      let id = target.row_id(row);
      if let (Some(value), Some(id)) = (value, id)
        && !value.is_empty()
        && !id.is_empty()
      {
        lookup.insert(value, id);
      }
    }

    for row in &source.rows {
      let Some(source_id) = source.row_id(row).filter(|id| !id.is_empty())
      else {
        continue;
      };
      let Some(value) = source
        .value(row, &mapping.source_column)
        .filter(|v| !v.is_empty())
      else {
        continue;
      };
      match lookup.get(value) {
        Some(target_id) => {
          triples.push(Triple::new(
            subject_iri(&ontology.base, &source.name, source_id),
            predicate.clone(),
            Term::Iri(subject_iri(&ontology.base, &target.name, target_id)),
          ));
        }
        None => {
          // Expected for foreign keys with no match; kept off the warning
          // list so bulk misses do not flood callers.
          tracing::debug!(
            table = %source.name,
            column = %mapping.source_column,
            %value,
            "relation lookup found no target row"
          );
        }
      }
    }
  }

  Ok(Generation { triples, warnings })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;
  use crate::{
    ontology::{ClassDef, PredicateDef},
    table::Row,
  };

  fn test_ontology() -> Ontology {
    Ontology {
      id:         "test".to_string(),
      name:       "Test".to_string(),
      prefixes:   BTreeMap::from([(
        "ex".to_string(),
        "http://example.org/vocab#".to_string(),
      )]),
      base:       "http://example.org/data/".to_string(),
      classes:    vec![
        ClassDef { name: "Customer".into(), uri: "ex:Customer".into() },
        ClassDef { name: "Order".into(), uri: "ex:Order".into() },
      ],
      predicates: vec![
        PredicateDef { name: "name".into(), uri: "ex:name".into() },
        PredicateDef { name: "age".into(), uri: "ex:age".into() },
        PredicateDef { name: "customer".into(), uri: "ex:customer".into() },
      ],
    }
  }

  fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
    Table {
      name:      name.to_string(),
      headers:   headers.iter().map(|h| h.to_string()).collect(),
      rows:      rows
        .iter()
        .map(|r| Row::new(r.iter().map(|v| v.to_string()).collect()))
        .collect(),
      id_column: "row_id".to_string(),
    }
  }

  fn people() -> Table {
    table(
      "people",
      &["name", "age", "row_id"],
      &[&["Alice", "30", "p1"], &["Bob", "25", "p2"]],
    )
  }

  // ── Structural errors ───────────────────────────────────────────────────

  #[test]
  fn no_tables_short_circuits() {
    let r = generate(&[], &test_ontology(), &[], &ColumnMappings::new());
    assert!(matches!(r, Err(Error::NoTables)));
  }

  #[test]
  fn invalid_ontology_short_circuits() {
    let mut onto = test_ontology();
    onto.base = String::new();
    let r = generate(&[people()], &onto, &[], &ColumnMappings::new());
    assert!(matches!(r, Err(Error::InvalidOntology(_))));
  }

  // ── The Alice/Bob scenario ──────────────────────────────────────────────

  #[test]
  fn literal_triples_per_row_and_column() {
    let g = generate(&[people()], &test_ontology(), &[], &BTreeMap::new())
      .unwrap();

    let expect = |s: &str, p: &str, o: &str| {
      Triple::new(s, p, Term::Literal(o.to_string()))
    };
    assert_eq!(g.triples, vec![
      expect(
        "http://example.org/data/people/p1",
        "http://example.org/vocab#name",
        "Alice"
      ),
      expect(
        "http://example.org/data/people/p1",
        "http://example.org/vocab#age",
        "30"
      ),
      expect(
        "http://example.org/data/people/p2",
        "http://example.org/vocab#name",
        "Bob"
      ),
      expect(
        "http://example.org/data/people/p2",
        "http://example.org/vocab#age",
        "25"
      ),
    ]);
    assert!(g.warnings.is_empty());
  }

  #[test]
  fn generation_is_deterministic() {
    let tables = [people()];
    let onto = test_ontology();
    let a = generate(&tables, &onto, &[], &BTreeMap::new()).unwrap();
    let b = generate(&tables, &onto, &[], &BTreeMap::new()).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn unrelated_table_does_not_alter_existing_triples() {
    let onto = test_ontology();
    let base = generate(&[people()], &onto, &[], &BTreeMap::new()).unwrap();
    let extra = table("widgets", &["label", "row_id"], &[&["Thing", "w1"]]);
    let both =
      generate(&[people(), extra], &onto, &[], &BTreeMap::new()).unwrap();
    assert_eq!(&both.triples[..base.triples.len()], &base.triples[..]);
  }

  // ── Type triples ────────────────────────────────────────────────────────

  #[test]
  fn type_triple_for_singularized_table_name() {
    let customers =
      table("customers", &["name", "row_id"], &[&["Ada", "c1"]]);
    let g = generate(&[customers], &test_ontology(), &[], &BTreeMap::new())
      .unwrap();
    assert_eq!(g.triples[0], Triple::new(
      "http://example.org/data/customers/c1",
      RDF_TYPE,
      Term::Iri("http://example.org/vocab#Customer".to_string()),
    ));
  }

  #[test]
  fn no_class_match_emits_no_type_triple() {
    let g = generate(&[people()], &test_ontology(), &[], &BTreeMap::new())
      .unwrap();
    assert!(g.triples.iter().all(|t| t.predicate != RDF_TYPE));
  }

  // ── Predicate fallback ──────────────────────────────────────────────────

  #[test]
  fn unmatched_column_synthesizes_predicate_and_warns() {
    let t = table("people", &["shoeSize", "row_id"], &[&["42", "p1"]]);
    let g =
      generate(&[t], &test_ontology(), &[], &BTreeMap::new()).unwrap();
    assert_eq!(
      g.triples[0].predicate,
      "http://example.org/data/hasShoeSize"
    );
    assert_eq!(g.warnings.len(), 1);
    assert!(g.warnings[0].contains("shoeSize"));
  }

  #[test]
  fn manual_column_mapping_overrides_auto_match() {
    let mut mappings = ColumnMappings::new();
    mappings.insert(
      "people".to_string(),
      BTreeMap::from([("name".to_string(), "ex:fullName".to_string())]),
    );
    let g =
      generate(&[people()], &test_ontology(), &[], &mappings).unwrap();
    assert_eq!(g.triples[0].predicate, "http://example.org/vocab#fullName");
  }

  // ── Empty values / missing identifiers ──────────────────────────────────

  #[test]
  fn empty_cells_are_skipped() {
    let t = table("people", &["name", "age", "row_id"], &[&["Ada", "", "p1"]]);
    let g =
      generate(&[t], &test_ontology(), &[], &BTreeMap::new()).unwrap();
    assert_eq!(g.triples.len(), 1);
    assert_eq!(g.triples[0].object, Term::Literal("Ada".to_string()));
  }

  #[test]
  fn row_without_identifier_is_skipped_with_warning() {
    let t = table("people", &["name", "row_id"], &[
      &["Ada", ""],
      &["Grace", "p2"],
    ]);
    let g =
      generate(&[t], &test_ontology(), &[], &BTreeMap::new()).unwrap();
    assert_eq!(g.triples.len(), 1);
    assert!(g.triples[0].subject.ends_with("/p2"));
    assert_eq!(g.warnings.len(), 1);
  }

  // ── Relation mappings ───────────────────────────────────────────────────

  fn orders() -> Table {
    table("orders", &["item", "customerEmail", "row_id"], &[
      &["Book", "ada@example.com", "o1"],
      &["Lamp", "nobody@example.com", "o2"],
      &["Pen", "grace@example.com", "o3"],
    ])
  }

  fn customers() -> Table {
    table("customers", &["name", "email", "row_id"], &[
      &["Ada", "ada@example.com", "c1"],
      &["Grace", "grace@example.com", "c2"],
    ])
  }

  fn customer_relation() -> RelationMapping {
    RelationMapping {
      source_table:  "orders".to_string(),
      source_column: "customerEmail".to_string(),
      target_table:  "customers".to_string(),
      target_column: "email".to_string(),
      predicate:     "ex:customer".to_string(),
    }
  }

  #[test]
  fn dangling_relation_endpoint_is_omitted_not_fatal() {
    let g = generate(
      &[orders(), customers()],
      &test_ontology(),
      &[customer_relation()],
      &BTreeMap::new(),
    )
    .unwrap();

    let relation_triples: Vec<_> = g
      .triples
      .iter()
      .filter(|t| t.predicate == "http://example.org/vocab#customer")
      .collect();
    // o2's email matches no customer: two relation triples, not three.
    assert_eq!(relation_triples.len(), 2);
    assert!(relation_triples[0].subject.ends_with("/orders/o1"));
    assert_eq!(
      relation_triples[0].object,
      Term::Iri("http://example.org/data/customers/c1".to_string())
    );
    assert!(relation_triples[1].subject.ends_with("/orders/o3"));
  }

  #[test]
  fn duplicate_lookup_keys_resolve_last_write_wins() {
    let mut customers = customers();
    customers.rows.push(Row::new(vec![
      "Ada (dup)".to_string(),
      "ada@example.com".to_string(),
      "c9".to_string(),
    ]));
    let g = generate(
      &[orders(), customers],
      &test_ontology(),
      &[customer_relation()],
      &BTreeMap::new(),
    )
    .unwrap();

    let o1 = g
      .triples
      .iter()
      .find(|t| {
        t.subject.ends_with("/orders/o1")
          && t.predicate == "http://example.org/vocab#customer"
      })
      .unwrap();
    assert_eq!(
      o1.object,
      Term::Iri("http://example.org/data/customers/c9".to_string())
    );
  }

  #[test]
  fn incomplete_mapping_is_skipped_with_warning() {
    let mut mapping = customer_relation();
    mapping.predicate = String::new();
    let g = generate(
      &[orders(), customers()],
      &test_ontology(),
      &[mapping],
      &BTreeMap::new(),
    )
    .unwrap();
    assert!(g.warnings.iter().any(|w| w.contains("incomplete")));
    assert!(
      g.triples.iter().all(|t| t.object.as_iri().is_none()),
      "no relation triples expected"
    );
  }

  #[test]
  fn mapping_against_missing_table_is_skipped_with_warning() {
    let mut mapping = customer_relation();
    mapping.target_table = "suppliers".to_string();
    let g = generate(
      &[orders(), customers()],
      &test_ontology(),
      &[mapping],
      &BTreeMap::new(),
    )
    .unwrap();
    assert!(g.warnings.iter().any(|w| w.contains("missing table")));
  }

  // ── IRI encoding ────────────────────────────────────────────────────────

  #[test]
  fn segment_encoding_replaces_whitespace_and_percent_encodes() {
    assert_eq!(encode_segment("a b"), "a_b");
    assert_eq!(encode_segment("a/b"), "a%2Fb");
    assert_eq!(encode_segment("r1"), "r1");
    assert_eq!(encode_segment("café"), "caf%C3%A9");
  }

  #[test]
  fn free_text_identifier_produces_well_formed_subject() {
    let t = table("my report", &["name", "row_id"], &[&["Ada", "id 1/2"]]);
    let g =
      generate(&[t], &test_ontology(), &[], &BTreeMap::new()).unwrap();
    assert_eq!(
      g.triples[0].subject,
      "http://example.org/data/my_report/id_1%2F2"
    );
  }
}
