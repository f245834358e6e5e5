//! Core types and the triple-generation pipeline for Weft.
//!
//! This crate is deliberately free of HTTP, filesystem, and database
//! dependencies. Everything here is a pure data transform: parsed tables in,
//! triples and view models out. All other crates depend on it; it depends on
//! nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod generate;
pub mod graph;
pub mod ontology;
pub mod store;
pub mod table;
pub mod triple;

pub use error::{Error, Result};
pub use generate::{ColumnMappings, Generation, RelationMapping, generate};
pub use graph::{GraphViewModel, project};
pub use ontology::Ontology;
pub use table::{Row, Table};
pub use triple::{Term, Triple};
