//! `weft` — turn CSV tables into RDF triples.
//!
//! # Usage
//!
//! ```
//! weft generate -f people.csv -f orders.csv \
//!   --relate "orders.customerEmail=ex:customer=>customers.email" \
//!   -F turtle -o out.ttl
//! weft submit -f people.csv --ontology example
//! weft ontology list
//! weft serve --server-config weft.toml
//! ```

mod client;
mod ontology;
mod pipeline;
mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::SparqlClient;
use ontology::OntologyCommand;
use pipeline::PipelineArgs;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use weft_core::store::ConfigStore as _;
use weft_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "weft", about = "Turn CSV tables into RDF triples")]
struct Cli {
  /// Path to a TOML config file (store_path).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Path to the sqlite config store.
  #[arg(long, env = "WEFT_STORE", global = true)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Ingest CSV files and print or write the generated RDF document.
  Generate {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Write output here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },

  /// Generate and POST the document to the configured SPARQL endpoint.
  Submit {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Override the stored endpoint URL.
    #[arg(long)]
    url: Option<String>,

    /// Override the stored named graph.
    #[arg(long)]
    graph: Option<String>,
  },

  /// Manage stored ontologies.
  Ontology {
    #[command(subcommand)]
    command: OntologyCommand,
  },

  /// Serve the HTTP API.
  Serve(serve::ServeArgs),
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  store_path: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr; stdout is reserved for generated documents.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let store_path = cli
    .store
    .or_else(|| {
      (!file_cfg.store_path.is_empty())
        .then(|| expand_tilde(Path::new(&file_cfg.store_path)))
    })
    .unwrap_or_else(default_store_path);

  match cli.command {
    Command::Serve(args) => serve::run(args, store_path).await,

    Command::Generate { pipeline, output } => {
      let store = open_store(&store_path).await?;
      let out = pipeline::run(&store, &pipeline).await?;
      tracing::info!(
        triples = out.generation.triples.len(),
        warnings = out.generation.warnings.len(),
        format = %out.format,
        "generation finished"
      );
      pipeline::write_output(output.as_deref(), &out.serialized)
    }

    Command::Submit {
      pipeline,
      url,
      graph,
    } => {
      let store = open_store(&store_path).await?;
      let out = pipeline::run(&store, &pipeline).await?;
      pipeline::ensure_nonempty(&out.generation)?;

      let mut endpoint = store.load_endpoint().await?;
      if let Some(url) = url {
        endpoint.url = url;
      }
      if let Some(graph) = graph {
        endpoint.named_graph = graph;
      }

      let client = SparqlClient::new(endpoint)?;
      let response = client
        .submit(out.format, &out.ontology, &out.serialized)
        .await?;
      tracing::info!(
        triples = out.generation.triples.len(),
        "submission accepted"
      );
      if !response.is_empty() {
        println!("{response}");
      }
      Ok(())
    }

    Command::Ontology { command } => {
      let store = open_store(&store_path).await?;
      ontology::run(&store, command).await
    }
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn open_store(path: &Path) -> Result<SqliteStore> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}

fn default_store_path() -> PathBuf {
  expand_tilde(Path::new("~/.local/share/weft/weft.db"))
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
