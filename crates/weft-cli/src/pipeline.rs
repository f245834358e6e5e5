//! The shared ingest → generate → serialize pipeline behind the `generate`
//! and `submit` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use weft_core::{ColumnMappings, Generation, Ontology, RelationMapping};
use weft_csv::IdColumn;
use weft_rdf::RdfFormat;
use weft_store_sqlite::SqliteStore;

use crate::ontology::load_ontology;

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PipelineArgs {
  /// CSV file to ingest (repeatable).
  #[arg(short, long = "file", value_name = "FILE", required = true)]
  pub files: Vec<PathBuf>,

  /// Ontology id from the store. Defaults to the stored selection, falling
  /// back to the `example` built-in.
  #[arg(long, value_name = "ID")]
  pub ontology: Option<String>,

  /// Read the ontology from an exchange-format JSON file instead.
  #[arg(long, value_name = "FILE", conflicts_with = "ontology")]
  pub ontology_file: Option<PathBuf>,

  /// Output format (`turtle` or `json-ld`).
  #[arg(short = 'F', long)]
  pub format: Option<RdfFormat>,

  /// Use an existing column as the row identifier instead of appending a
  /// synthetic one.
  #[arg(long, value_name = "COLUMN")]
  pub id_column: Option<String>,

  /// Relation mapping `source.column=predicate=>target.column`
  /// (repeatable).
  #[arg(long = "relate", value_name = "SPEC")]
  pub relations: Vec<String>,
}

// ─── Relation specs ──────────────────────────────────────────────────────────

/// Parse `source.column=predicate=>target.column`. Tables keep any dots in
/// their names — the split is on the *last* dot of each side.
pub fn parse_relation(spec: &str) -> Result<RelationMapping> {
  let malformed = || {
    anyhow!(
      "malformed relation {spec:?}; expected \
       source.column=predicate=>target.column"
    )
  };
  let (left, target) = spec.split_once("=>").ok_or_else(malformed)?;
  let (source, predicate) = left.rsplit_once('=').ok_or_else(malformed)?;
  let (source_table, source_column) =
    source.rsplit_once('.').ok_or_else(malformed)?;
  let (target_table, target_column) =
    target.rsplit_once('.').ok_or_else(malformed)?;

  let mapping = RelationMapping {
    source_table:  source_table.trim().to_string(),
    source_column: source_column.trim().to_string(),
    target_table:  target_table.trim().to_string(),
    target_column: target_column.trim().to_string(),
    predicate:     predicate.trim().to_string(),
  };
  if !mapping.is_complete() {
    return Err(malformed());
  }
  Ok(mapping)
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct PipelineOutput {
  pub format:     RdfFormat,
  pub ontology:   Ontology,
  pub generation: Generation,
  pub serialized: String,
}

/// Ingest the given files, generate, and serialize.
///
/// Unlike batch ingestion in the API, an unreadable or unparsable file here
/// aborts the run: the files were named explicitly on the command line.
pub async fn run(
  store: &SqliteStore,
  args: &PipelineArgs,
) -> Result<PipelineOutput> {
  let id = match &args.id_column {
    Some(column) => IdColumn::Existing(column.clone()),
    None => IdColumn::Synthetic,
  };

  let mut tables = Vec::with_capacity(args.files.len());
  for path in &args.files {
    let name = path
      .file_name()
      .and_then(|n| n.to_str())
      .ok_or_else(|| anyhow!("bad file name: {path:?}"))?;
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("reading {}", path.display()))?;
    let table = weft_csv::ingest(name, &text, id.clone())
      .with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(table = %table.name, rows = table.rows.len(), "ingested");
    tables.push(table);
  }

  let mut relations = Vec::with_capacity(args.relations.len());
  for spec in &args.relations {
    relations.push(parse_relation(spec)?);
  }

  let ontology =
    load_ontology(store, args.ontology.as_deref(), args.ontology_file.as_deref())
      .await?;
  let format = args.format.unwrap_or(RdfFormat::Turtle);

  let generation =
    weft_core::generate(&tables, &ontology, &relations, &ColumnMappings::new())?;
  let serialized = weft_rdf::serialize(
    format,
    &generation.triples,
    &ontology.prefixes,
    &ontology.base,
  )?;

  Ok(PipelineOutput {
    format,
    ontology,
    generation,
    serialized,
  })
}

/// Write serialized output to `path`, or to stdout when absent.
pub fn write_output(
  output: Option<&std::path::Path>,
  serialized: &str,
) -> Result<()> {
  match output {
    Some(path) => {
      std::fs::write(path, serialized)
        .with_context(|| format!("writing {}", path.display()))?;
      tracing::info!(path = %path.display(), "wrote RDF document");
    }
    None => print!("{serialized}"),
  }
  Ok(())
}

/// Guard against submitting nothing.
pub fn ensure_nonempty(generation: &Generation) -> Result<()> {
  if generation.triples.is_empty() {
    bail!("generation produced no triples; nothing to submit");
  }
  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
