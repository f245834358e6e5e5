//! The `weft ontology` subcommands and ontology loading helpers.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use weft_core::{Ontology, store::ConfigStore as _};
use weft_store_sqlite::SqliteStore;

// ─── Subcommands ─────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum OntologyCommand {
  /// List ontology ids and display names.
  List,
  /// Print one ontology as exchange-format JSON.
  Show { id: String },
  /// Add or update a custom ontology from an exchange-format JSON file.
  Add { file: std::path::PathBuf },
  /// Delete a custom ontology.
  Remove { id: String },
  /// Select the default ontology used by `generate` and `submit`.
  Select { id: String },
}

pub async fn run(store: &SqliteStore, command: OntologyCommand) -> Result<()> {
  match command {
    OntologyCommand::List => {
      let selected = store.selected_ontology().await?;
      for ontology in store.list_ontologies().await? {
        let marker = if selected.as_deref() == Some(&ontology.id) {
          "*"
        } else {
          " "
        };
        println!("{marker} {:<20} {}", ontology.id, ontology.name);
      }
    }
    OntologyCommand::Show { id } => {
      let ontology = store
        .get_ontology(&id)
        .await?
        .with_context(|| format!("ontology {id:?} not found"))?;
      println!("{}", serde_json::to_string_pretty(&ontology)?);
    }
    OntologyCommand::Add { file } => {
      let ontology = read_ontology_file(&file)?;
      let id = ontology.id.clone();
      store.save_ontology(ontology).await?;
      println!("saved ontology {id:?}");
    }
    OntologyCommand::Remove { id } => {
      store.delete_ontology(&id).await?;
      println!("removed ontology {id:?}");
    }
    OntologyCommand::Select { id } => {
      store.set_selected_ontology(&id).await?;
      println!("selected ontology {id:?}");
    }
  }
  Ok(())
}

// ─── Loading helpers ─────────────────────────────────────────────────────────

/// Parse and validate an exchange-format ontology JSON file. A malformed
/// file aborts before anything is applied.
pub fn read_ontology_file(path: &Path) -> Result<Ontology> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let ontology: Ontology = serde_json::from_str(&raw)
    .with_context(|| format!("parsing ontology JSON in {}", path.display()))?;
  if Ontology::is_reserved(&ontology.id) {
    bail!("ontology id {:?} is reserved", ontology.id);
  }
  ontology.validate()?;
  Ok(ontology)
}

/// Resolve the ontology for a pipeline run: explicit file, then explicit
/// id, then the stored selection, then the `example` built-in.
pub async fn load_ontology(
  store: &SqliteStore,
  id: Option<&str>,
  file: Option<&Path>,
) -> Result<Ontology> {
  if let Some(path) = file {
    return read_ontology_file(path);
  }
  if let Some(id) = id {
    return store
      .get_ontology(id)
      .await?
      .with_context(|| format!("ontology {id:?} not found"));
  }
  if let Some(selected) = store.selected_ontology().await?
    && let Some(ontology) = store.get_ontology(&selected).await?
  {
    return Ok(ontology);
  }
  Ok(Ontology::example())
}
