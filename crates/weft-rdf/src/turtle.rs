//! Turtle codec.
//!
//! Serialization emits an `@prefix` header block followed by one
//! `subject predicate object .` statement per triple, in input order. IRIs
//! compact to prefixed names where a declared namespace matches; literals
//! are double-quoted with backslash escapes for `\`, `"`, newline, carriage
//! return, and tab.

use std::collections::BTreeMap;

use weft_core::{Term, Triple, triple::RDF_TYPE};

use crate::{
  Document, compact,
  error::{Error, Result},
};

// ─── Serializer ──────────────────────────────────────────────────────────────

/// Escape a literal value for a double-quoted Turtle string.
fn escape_literal(value: &str) -> String {
  value
    .replace('\\', "\\\\")
    .replace('"', "\\\"")
    .replace('\n', "\\n")
    .replace('\r', "\\r")
    .replace('\t', "\\t")
}

fn write_iri(iri: &str, prefixes: &BTreeMap<String, String>) -> String {
  match compact(iri, prefixes) {
    Some(prefixed) => prefixed,
    None => format!("<{iri}>"),
  }
}

/// Serialize `triples` as a Turtle document.
pub fn serialize(
  triples: &[Triple],
  prefixes: &BTreeMap<String, String>,
) -> String {
  let mut out = String::new();
  for (prefix, namespace) in prefixes {
    out.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
  }
  if !prefixes.is_empty() {
    out.push('\n');
  }

  for triple in triples {
    let subject = write_iri(&triple.subject, prefixes);
    let predicate = write_iri(&triple.predicate, prefixes);
    let object = match &triple.object {
      Term::Iri(iri) => write_iri(iri, prefixes),
      Term::Literal(value) => format!("\"{}\"", escape_literal(value)),
    };
    out.push_str(&format!("{subject} {predicate} {object} .\n"));
  }
  out
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// One syntactic term on a statement line.
#[derive(Debug, PartialEq, Eq)]
enum Token {
  Iri(String),
  Literal(String),
  Dot,
}

struct Scanner<'a> {
  line:     &'a str,
  chars:    std::iter::Peekable<std::str::CharIndices<'a>>,
  prefixes: &'a BTreeMap<String, String>,
}

impl<'a> Scanner<'a> {
  fn new(line: &'a str, prefixes: &'a BTreeMap<String, String>) -> Self {
    Self {
      line,
      chars: line.char_indices().peekable(),
      prefixes,
    }
  }

  fn malformed(&self) -> Error { Error::MalformedLine(self.line.to_string()) }

  fn skip_whitespace(&mut self) {
    while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
  }

  /// The next token, or `None` at end of line.
  fn next_token(&mut self) -> Result<Option<Token>> {
    self.skip_whitespace();
    let Some(&(start, c)) = self.chars.peek() else {
      return Ok(None);
    };

    match c {
      '<' => {
        self.chars.next();
        let mut iri = String::new();
        for (_, c) in self.chars.by_ref() {
          if c == '>' {
            return Ok(Some(Token::Iri(iri)));
          }
          iri.push(c);
        }
        Err(self.malformed())
      }
      '"' => {
        self.chars.next();
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
          match c {
            '"' => return Ok(Some(Token::Literal(value))),
            '\\' => match self.chars.next() {
              Some((_, 'n')) => value.push('\n'),
              Some((_, 'r')) => value.push('\r'),
              Some((_, 't')) => value.push('\t'),
              Some((_, '"')) => value.push('"'),
              Some((_, '\\')) => value.push('\\'),
              _ => return Err(self.malformed()),
            },
            other => value.push(other),
          }
        }
        Err(self.malformed())
      }
      _ => {
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
          if c.is_whitespace() {
            break;
          }
          end = i + c.len_utf8();
          self.chars.next();
        }
        let word = &self.line[start..end];
        match word {
          "." => Ok(Some(Token::Dot)),
          // The type keyword.
          "a" => Ok(Some(Token::Iri(RDF_TYPE.to_string()))),
          _ => {
            let (prefix, local) =
              word.split_once(':').ok_or_else(|| self.malformed())?;
            let namespace = self
              .prefixes
              .get(prefix)
              .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))?;
            Ok(Some(Token::Iri(format!("{namespace}{local}"))))
          }
        }
      }
    }
  }
}

/// Parse a `@prefix p: <iri> .` directive.
fn parse_prefix_line(line: &str) -> Result<(String, String)> {
  let malformed = || Error::MalformedLine(line.to_string());
  let rest = line.strip_prefix("@prefix").ok_or_else(malformed)?.trim();
  let (prefix, rest) = rest.split_once(':').ok_or_else(malformed)?;
  let rest = rest.trim().strip_suffix('.').ok_or_else(malformed)?.trim();
  let namespace = rest
    .strip_prefix('<')
    .and_then(|r| r.strip_suffix('>'))
    .ok_or_else(malformed)?;
  Ok((prefix.trim().to_string(), namespace.to_string()))
}

/// Parse a Turtle document emitted by [`serialize`].
///
/// Handles `@prefix`/`@base` directives, `#` comments, full IRI references,
/// prefixed names, the `a` keyword, and escaped double-quoted literals — one
/// statement per line.
pub fn parse(input: &str) -> Result<Document> {
  let mut document = Document::default();

  for raw in input.lines() {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    if line.starts_with("@prefix") {
      let (prefix, namespace) = parse_prefix_line(line)?;
      document.prefixes.insert(prefix, namespace);
      continue;
    }
    if line.starts_with("@base") {
      // All emitted IRIs are absolute; the directive carries no information
      // we need.
      continue;
    }

    let mut scanner = Scanner::new(line, &document.prefixes);
    let malformed = || Error::MalformedLine(line.to_string());

    let Token::Iri(subject) = scanner.next_token()?.ok_or_else(malformed)?
    else {
      return Err(malformed());
    };
    let Token::Iri(predicate) = scanner.next_token()?.ok_or_else(malformed)?
    else {
      return Err(malformed());
    };
    let object = match scanner.next_token()?.ok_or_else(malformed)? {
      Token::Iri(iri) => Term::Iri(iri),
      Token::Literal(value) => Term::Literal(value),
      Token::Dot => return Err(malformed()),
    };
    match scanner.next_token()? {
      Some(Token::Dot) => {}
      _ => return Err(malformed()),
    }
    if scanner.next_token()?.is_some() {
      return Err(malformed());
    }

    document.triples.push(Triple::new(subject, predicate, object));
  }

  Ok(document)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
