//! [`SqliteStore`] — the SQLite implementation of [`ConfigStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use weft_core::{
  ontology::Ontology,
  store::{ConfigStore, EndpointConfig},
};

use crate::{Error, Result, schema::SCHEMA};

/// Preview length used when no preference has been stored.
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

const KEY_ENDPOINT: &str = "endpoint";
const KEY_SELECTED_ONTOLOGY: &str = "selected_ontology";
const KEY_PREVIEW_ROWS: &str = "preview_rows";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Weft config store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Settings plumbing ─────────────────────────────────────────────────

  async fn get_setting(&self, key: &'static str) -> Result<Option<String>> {
    let value = self
      .conn
      .call(move |conn| {
        let value: Option<String> = conn
          .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?;
        Ok(value)
      })
      .await?;
    Ok(value)
  }

  async fn put_setting(&self, key: &'static str, value: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_setting(&self, key: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM settings WHERE key = ?1",
          rusqlite::params![key],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load a JSON-encoded setting. A corrupt value is reset to defaults with
  /// a warning — never a hard failure.
  async fn load_setting<T>(&self, key: &'static str) -> Result<Option<T>>
  where
    T: serde::de::DeserializeOwned,
  {
    let Some(raw) = self.get_setting(key).await? else {
      return Ok(None);
    };
    match serde_json::from_str(&raw) {
      Ok(value) => Ok(Some(value)),
      Err(e) => {
        tracing::warn!(%key, error = %e, "corrupt setting; resetting to default");
        self.delete_setting(key).await?;
        Ok(None)
      }
    }
  }

  async fn delete_ontology_row(&self, id: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM ontologies WHERE id = ?1",
          rusqlite::params![id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ConfigStore impl ────────────────────────────────────────────────────────

impl ConfigStore for SqliteStore {
  type Error = Error;

  // ── Ontologies ────────────────────────────────────────────────────────

  async fn list_ontologies(&self) -> Result<Vec<Ontology>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, body FROM ontologies ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut ontologies = vec![Ontology::example(), Ontology::blank()];
    for (id, body) in rows {
      match serde_json::from_str::<Ontology>(&body) {
        Ok(ontology) if !Ontology::is_reserved(&ontology.id) => {
          ontologies.push(ontology);
        }
        Ok(_) => {
          // A reserved id should never have been stored; drop the row.
          tracing::warn!(%id, "reserved ontology id found in store; removing");
          self.delete_ontology_row(id).await?;
        }
        Err(e) => {
          tracing::warn!(%id, error = %e, "corrupt ontology row; removing");
          self.delete_ontology_row(id).await?;
        }
      }
    }
    Ok(ontologies)
  }

  async fn get_ontology(&self, id: &str) -> Result<Option<Ontology>> {
    if let Some(builtin) = Ontology::builtin(id) {
      return Ok(Some(builtin));
    }
    let owned = id.to_string();
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        let body = conn
          .query_row(
            "SELECT body FROM ontologies WHERE id = ?1",
            rusqlite::params![owned],
            |row| row.get(0),
          )
          .optional()?;
        Ok(body)
      })
      .await?;
    let Some(body) = body else {
      return Ok(None);
    };
    match serde_json::from_str(&body) {
      Ok(ontology) => Ok(Some(ontology)),
      Err(e) => {
        tracing::warn!(%id, error = %e, "corrupt ontology row; removing");
        self.delete_ontology_row(id.to_string()).await?;
        Ok(None)
      }
    }
  }

  async fn save_ontology(&self, ontology: Ontology) -> Result<()> {
    if Ontology::is_reserved(&ontology.id) {
      return Err(
        weft_core::Error::ReservedOntologyId(ontology.id.clone()).into(),
      );
    }
    ontology.validate().map_err(Error::Core)?;

    let id = ontology.id.clone();
    let body = serde_json::to_string(&ontology)?;
    let updated_at = Utc::now().to_rfc3339();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ontologies (id, body, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(id) DO UPDATE
             SET body = excluded.body, updated_at = excluded.updated_at",
          rusqlite::params![id, body, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_ontology(&self, id: &str) -> Result<()> {
    if Ontology::is_reserved(id) {
      return Err(weft_core::Error::ReservedOntologyId(id.to_string()).into());
    }
    self.delete_ontology_row(id.to_string()).await?;
    // A dangling selection would point at nothing; clear it.
    if self.selected_ontology().await?.as_deref() == Some(id) {
      self.delete_setting(KEY_SELECTED_ONTOLOGY).await?;
    }
    Ok(())
  }

  async fn selected_ontology(&self) -> Result<Option<String>> {
    self.load_setting(KEY_SELECTED_ONTOLOGY).await
  }

  async fn set_selected_ontology(&self, id: &str) -> Result<()> {
    if self.get_ontology(id).await?.is_none() {
      return Err(weft_core::Error::OntologyNotFound(id.to_string()).into());
    }
    self
      .put_setting(KEY_SELECTED_ONTOLOGY, serde_json::to_string(id)?)
      .await
  }

  // ── Endpoint ──────────────────────────────────────────────────────────

  async fn load_endpoint(&self) -> Result<EndpointConfig> {
    Ok(self.load_setting(KEY_ENDPOINT).await?.unwrap_or_default())
  }

  async fn save_endpoint(&self, config: &EndpointConfig) -> Result<()> {
    config.validate().map_err(Error::Core)?;
    self
      .put_setting(KEY_ENDPOINT, serde_json::to_string(config)?)
      .await
  }

  // ── Preferences ───────────────────────────────────────────────────────

  async fn preview_rows(&self) -> Result<usize> {
    Ok(
      self
        .load_setting(KEY_PREVIEW_ROWS)
        .await?
        .unwrap_or(DEFAULT_PREVIEW_ROWS),
    )
  }

  async fn set_preview_rows(&self, rows: usize) -> Result<()> {
    self
      .put_setting(KEY_PREVIEW_ROWS, serde_json::to_string(&rows)?)
      .await
  }
}
