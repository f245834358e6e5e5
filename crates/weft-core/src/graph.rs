//! Graph projection — triples to a renderable node/link view model.
//!
//! The view model is derived, read-only, and rebuilt wholesale on every
//! regeneration. It carries no invariant beyond referential consistency:
//! every link endpoint id exists in `nodes`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::triple::{Term, Triple, local_name};

// ─── View model ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
  /// Appears at least once in subject position.
  Subject,
  /// A resource that only ever appears as an object.
  Object,
  /// A literal value; one node per occurrence, never deduplicated.
  Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
  pub id:    String,
  pub label: String,
  /// `None` for literal nodes.
  pub uri:   Option<String>,
  pub kind:  NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
  /// Id of the subject node.
  pub source: String,
  /// Id of the object or literal node.
  pub target: String,
  /// The predicate's local name.
  pub label:  String,
  /// The full predicate IRI.
  pub uri:    String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphViewModel {
  pub nodes: Vec<GraphNode>,
  pub links: Vec<GraphLink>,
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Project a triple set into a [`GraphViewModel`].
///
/// Each distinct subject IRI becomes one node; resource objects reuse the
/// subject's node when one exists. Each literal occurrence becomes its own
/// node (ids `lit:0`, `lit:1`, …). Each triple becomes one link.
pub fn project(triples: &[Triple]) -> GraphViewModel {
  let subjects: HashSet<&str> =
    triples.iter().map(|t| t.subject.as_str()).collect();

  let mut nodes: Vec<GraphNode> = Vec::new();
  let mut links: Vec<GraphLink> = Vec::with_capacity(triples.len());
  let mut iri_node: HashMap<String, usize> = HashMap::new();
  let mut literal_counter = 0usize;

  let mut iri_node_id =
    |iri: &str, nodes: &mut Vec<GraphNode>| -> String {
      if let Some(&index) = iri_node.get(iri) {
        return nodes[index].id.clone();
      }
      let kind = if subjects.contains(iri) {
        NodeKind::Subject
      } else {
        NodeKind::Object
      };
      nodes.push(GraphNode {
        id:    iri.to_string(),
        label: local_name(iri).to_string(),
        uri:   Some(iri.to_string()),
        kind,
      });
      iri_node.insert(iri.to_string(), nodes.len() - 1);
      iri.to_string()
    };

  for triple in triples {
    let source = iri_node_id(&triple.subject, &mut nodes);
    let target = match &triple.object {
      Term::Iri(iri) => iri_node_id(iri, &mut nodes),
      Term::Literal(value) => {
        let id = format!("lit:{literal_counter}");
        literal_counter += 1;
        nodes.push(GraphNode {
          id:    id.clone(),
          label: value.clone(),
          uri:   None,
          kind:  NodeKind::Literal,
        });
        id
      }
    };
    links.push(GraphLink {
      source,
      target,
      label: local_name(&triple.predicate).to_string(),
      uri: triple.predicate.clone(),
    });
  }

  GraphViewModel { nodes, links }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Summary series over a view model — the data behind node/link count,
/// link-type breakdown, and degree-distribution charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
  pub node_count:       usize,
  pub link_count:       usize,
  pub subject_nodes:    usize,
  pub object_nodes:     usize,
  pub literal_nodes:    usize,
  /// link label → number of links carrying it.
  pub link_labels:      BTreeMap<String, usize>,
  /// node degree → number of nodes with that degree.
  pub degree_histogram: BTreeMap<usize, usize>,
}

pub fn stats(graph: &GraphViewModel) -> GraphStats {
  let mut s = GraphStats {
    node_count: graph.nodes.len(),
    link_count: graph.links.len(),
    ..GraphStats::default()
  };

  for node in &graph.nodes {
    match node.kind {
      NodeKind::Subject => s.subject_nodes += 1,
      NodeKind::Object => s.object_nodes += 1,
      NodeKind::Literal => s.literal_nodes += 1,
    }
  }

  let mut degrees: HashMap<&str, usize> =
    graph.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
  for link in &graph.links {
    *s.link_labels.entry(link.label.clone()).or_default() += 1;
    if let Some(d) = degrees.get_mut(link.source.as_str()) {
      *d += 1;
    }
    if let Some(d) = degrees.get_mut(link.target.as_str()) {
      *d += 1;
    }
  }
  for degree in degrees.values() {
    *s.degree_histogram.entry(*degree).or_default() += 1;
  }

  s
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::triple::RDF_TYPE;

  fn sample() -> Vec<Triple> {
    vec![
      Triple::new(
        "http://ex.org/people/p1",
        "http://ex.org/vocab#name",
        Term::Literal("Alice".to_string()),
      ),
      Triple::new(
        "http://ex.org/people/p1",
        RDF_TYPE,
        Term::Iri("http://schema.org/Person".to_string()),
      ),
      Triple::new(
        "http://ex.org/orders/o1",
        "http://ex.org/vocab#customer",
        Term::Iri("http://ex.org/people/p1".to_string()),
      ),
    ]
  }

  #[test]
  fn subject_object_and_literal_kinds() {
    let g = project(&sample());

    let p1 = g.nodes.iter().find(|n| n.id.ends_with("/p1")).unwrap();
    assert_eq!(p1.kind, NodeKind::Subject);

    let person =
      g.nodes.iter().find(|n| n.id.ends_with("Person")).unwrap();
    assert_eq!(person.kind, NodeKind::Object);

    let alice = g.nodes.iter().find(|n| n.label == "Alice").unwrap();
    assert_eq!(alice.kind, NodeKind::Literal);
    assert!(alice.uri.is_none());
  }

  #[test]
  fn one_link_per_triple_with_local_name_label() {
    let g = project(&sample());
    assert_eq!(g.links.len(), 3);
    assert_eq!(g.links[0].label, "name");
    assert_eq!(g.links[1].label, "type");
    assert_eq!(g.links[2].label, "customer");
  }

  #[test]
  fn every_link_endpoint_exists_in_nodes() {
    let g = project(&sample());
    let ids: std::collections::HashSet<&str> =
      g.nodes.iter().map(|n| n.id.as_str()).collect();
    for link in &g.links {
      assert!(ids.contains(link.source.as_str()));
      assert!(ids.contains(link.target.as_str()));
    }
  }

  #[test]
  fn repeated_literal_values_are_separate_nodes() {
    let triples = vec![
      Triple::new(
        "http://ex.org/people/p1",
        "http://ex.org/vocab#city",
        Term::Literal("Paris".to_string()),
      ),
      Triple::new(
        "http://ex.org/people/p2",
        "http://ex.org/vocab#city",
        Term::Literal("Paris".to_string()),
      ),
    ];
    let g = project(&triples);
    let paris: Vec<_> =
      g.nodes.iter().filter(|n| n.label == "Paris").collect();
    assert_eq!(paris.len(), 2);
    assert_ne!(paris[0].id, paris[1].id);
  }

  #[test]
  fn shared_object_reuses_subject_node() {
    let g = project(&sample());
    let p1_nodes =
      g.nodes.iter().filter(|n| n.id.ends_with("/p1")).count();
    assert_eq!(p1_nodes, 1);
  }

  #[test]
  fn empty_projection() {
    let g = project(&[]);
    assert!(g.nodes.is_empty());
    assert!(g.links.is_empty());
  }

  #[test]
  fn stats_series() {
    let g = project(&sample());
    let s = stats(&g);
    assert_eq!(s.node_count, 4);
    assert_eq!(s.link_count, 3);
    assert_eq!(s.subject_nodes, 2);
    assert_eq!(s.object_nodes, 1);
    assert_eq!(s.literal_nodes, 1);
    assert_eq!(s.link_labels.get("customer"), Some(&1));
    // p1 has degree 3 (name out, type out, customer in); the other three
    // nodes have degree 1.
    assert_eq!(s.degree_histogram.get(&3), Some(&1));
    assert_eq!(s.degree_histogram.get(&1), Some(&3));
  }
}
