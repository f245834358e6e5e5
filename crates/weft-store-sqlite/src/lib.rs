//! SQLite backend for the Weft configuration store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Only configuration is stored
//! here — ontologies, the SPARQL endpoint, preferences. Table data is never
//! persisted; it is re-ingested from source on every run.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
