//! JSON-LD codec.
//!
//! Serialization produces a `@context`/`@graph` document with one object per
//! subject, grouping that subject's predicate/object pairs. `rdf:type`
//! triples become `@type` entries; resource objects become `{"@id": …}`
//! references; repeated predicates collapse into arrays. Subjects appear in
//! first-seen order, keeping output deterministic.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value, json};
use weft_core::{Term, Triple, triple::RDF_TYPE};

use crate::{
  Document, compact,
  error::{Error, Result},
};

// ─── Serializer ──────────────────────────────────────────────────────────────

fn compact_or_full(iri: &str, prefixes: &BTreeMap<String, String>) -> String {
  compact(iri, prefixes).unwrap_or_else(|| iri.to_string())
}

/// Serialize `triples` as a pretty-printed JSON-LD document.
pub fn serialize(
  triples: &[Triple],
  prefixes: &BTreeMap<String, String>,
  base: &str,
) -> Result<String> {
  let mut context = Map::new();
  if !base.is_empty() {
    context.insert("@base".to_string(), Value::String(base.to_string()));
  }
  for (prefix, namespace) in prefixes {
    context.insert(prefix.clone(), Value::String(namespace.clone()));
  }

  // Group triples by subject, first-seen order.
  let mut order: Vec<String> = Vec::new();
  let mut subjects: HashMap<String, Vec<&Triple>> = HashMap::new();
  for triple in triples {
    subjects
      .entry(triple.subject.clone())
      .or_insert_with(|| {
        order.push(triple.subject.clone());
        Vec::new()
      })
      .push(triple);
  }

  let mut graph: Vec<Value> = Vec::with_capacity(order.len());
  for subject in &order {
    let mut node = Map::new();
    node.insert(
      "@id".to_string(),
      Value::String(compact_or_full(subject, prefixes)),
    );

    // key → accumulated values, collapsed to a scalar when single.
    let mut values: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for triple in &subjects[subject] {
      let (key, value) = if triple.predicate == RDF_TYPE {
        let Term::Iri(class) = &triple.object else {
          return Err(Error::MalformedDocument(
            "rdf:type with a literal object".to_string(),
          ));
        };
        (
          "@type".to_string(),
          Value::String(compact_or_full(class, prefixes)),
        )
      } else {
        let key = compact_or_full(&triple.predicate, prefixes);
        let value = match &triple.object {
          Term::Iri(iri) => json!({ "@id": compact_or_full(iri, prefixes) }),
          Term::Literal(text) => Value::String(text.clone()),
        };
        (key, value)
      };
      values.entry(key).or_default().push(value);
    }
    for (key, mut collected) in values {
      let value = if collected.len() == 1 {
        collected.remove(0)
      } else {
        Value::Array(collected)
      };
      node.insert(key, value);
    }
    graph.push(Value::Object(node));
  }

  let document = json!({
    "@context": Value::Object(context),
    "@graph": graph,
  });
  Ok(serde_json::to_string_pretty(&document)?)
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Expand a term through the parsed `@context`.
fn expand(term: &str, prefixes: &BTreeMap<String, String>) -> String {
  if let Some((prefix, local)) = term.split_once(':')
    && let Some(namespace) = prefixes.get(prefix)
  {
    return format!("{namespace}{local}");
  }
  term.to_string()
}

fn expand_id(
  value: &Value,
  prefixes: &BTreeMap<String, String>,
) -> Result<String> {
  let Some(id) = value.as_str() else {
    return Err(Error::MalformedDocument("@id must be a string".to_string()));
  };
  Ok(expand(id, prefixes))
}

fn object_values(value: &Value) -> Vec<&Value> {
  match value {
    Value::Array(items) => items.iter().collect(),
    other => vec![other],
  }
}

/// Parse a JSON-LD document emitted by [`serialize`].
pub fn parse(input: &str) -> Result<Document> {
  let root: Value = serde_json::from_str(input)?;

  let mut prefixes = BTreeMap::new();
  if let Some(context) = root.get("@context").and_then(Value::as_object) {
    for (key, value) in context {
      if key == "@base" {
        continue;
      }
      if let Some(namespace) = value.as_str() {
        prefixes.insert(key.clone(), namespace.to_string());
      }
    }
  }

  let Some(graph) = root.get("@graph").and_then(Value::as_array) else {
    return Err(Error::MalformedDocument(
      "missing @graph array".to_string(),
    ));
  };

  let mut triples = Vec::new();
  for node in graph {
    let Some(object) = node.as_object() else {
      return Err(Error::MalformedDocument(
        "@graph entries must be objects".to_string(),
      ));
    };
    let subject = expand_id(
      object.get("@id").ok_or_else(|| {
        Error::MalformedDocument("node without @id".to_string())
      })?,
      &prefixes,
    )?;

    for (key, value) in object {
      if key == "@id" {
        continue;
      }
      if key == "@type" {
        for class in object_values(value) {
          triples.push(Triple::new(
            subject.clone(),
            RDF_TYPE,
            Term::Iri(expand_id(class, &prefixes)?),
          ));
        }
        continue;
      }

      let predicate = expand(key, &prefixes);
      for item in object_values(value) {
        let term = match item {
          Value::String(text) => Term::Literal(text.clone()),
          Value::Object(map) => match map.get("@id") {
            Some(id) => Term::Iri(expand_id(id, &prefixes)?),
            None => {
              return Err(Error::MalformedDocument(
                "object value without @id".to_string(),
              ));
            }
          },
          other => Term::Literal(other.to_string()),
        };
        triples.push(Triple::new(subject.clone(), predicate.clone(), term));
      }
    }
  }

  Ok(Document { prefixes, triples })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
