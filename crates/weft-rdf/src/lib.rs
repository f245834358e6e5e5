//! RDF serialization codecs for Weft: Turtle and JSON-LD.
//!
//! Both directions are implemented so that emitted documents round-trip:
//! `parse(serialize(triples))` reconstructs an equivalent triple set. The
//! parsers cover the subset of each grammar that the serializers emit (plus
//! a little slack, e.g. Turtle's `a` keyword) — they are not general-purpose
//! RDF parsers.

pub mod error;
pub mod jsonld;
pub mod turtle;

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use weft_core::Triple;

pub use error::{Error, Result};

// ─── Format ──────────────────────────────────────────────────────────────────

/// The closed set of supported output formats. Unknown tags are rejected at
/// the boundary via [`FromStr`] instead of silently no-op'ing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RdfFormat {
  Turtle,
  JsonLd,
}

impl RdfFormat {
  /// Download file extension.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Turtle => "ttl",
      Self::JsonLd => "jsonld",
    }
  }

  pub fn mime(self) -> &'static str {
    match self {
      Self::Turtle => "text/turtle",
      Self::JsonLd => "application/ld+json",
    }
  }

  /// The wire tag used in submission envelopes.
  pub fn tag(self) -> &'static str {
    match self {
      Self::Turtle => "turtle",
      Self::JsonLd => "json-ld",
    }
  }
}

impl fmt::Display for RdfFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Turtle => write!(f, "Turtle"),
      Self::JsonLd => write!(f, "JSON-LD"),
    }
  }
}

impl FromStr for RdfFormat {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "turtle" | "ttl" => Ok(Self::Turtle),
      "json-ld" | "jsonld" => Ok(Self::JsonLd),
      other => Err(Error::UnknownFormat(other.to_string())),
    }
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A parsed RDF document: the prefix map plus the triples, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub prefixes: BTreeMap<String, String>,
  pub triples:  Vec<Triple>,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Serialize `triples` in `format`.
pub fn serialize(
  format: RdfFormat,
  triples: &[Triple],
  prefixes: &BTreeMap<String, String>,
  base: &str,
) -> Result<String> {
  match format {
    RdfFormat::Turtle => Ok(turtle::serialize(triples, prefixes)),
    RdfFormat::JsonLd => jsonld::serialize(triples, prefixes, base),
  }
}

/// Parse a document previously emitted in `format`.
pub fn parse(format: RdfFormat, input: &str) -> Result<Document> {
  match format {
    RdfFormat::Turtle => turtle::parse(input),
    RdfFormat::JsonLd => jsonld::parse(input),
  }
}

// ─── Compaction helper (shared by both codecs) ──────────────────────────────

/// Compact an IRI to `prefix:local` when a prefix namespace matches and the
/// remainder is a safe local name. Longest namespace wins.
pub(crate) fn compact(
  iri: &str,
  prefixes: &BTreeMap<String, String>,
) -> Option<String> {
  let mut best: Option<(&str, &str)> = None;
  for (prefix, namespace) in prefixes {
    if let Some(local) = iri.strip_prefix(namespace.as_str())
      && !namespace.is_empty()
      && best.is_none_or(|(_, b)| namespace.len() > iri.len() - b.len())
    {
      best = Some((prefix.as_str(), local));
    }
  }
  let (prefix, local) = best?;
  let safe = !local.is_empty()
    && local
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
  safe.then(|| format!("{prefix}:{local}"))
}

// ─── Round-trip tests ────────────────────────────────────────────────────────
