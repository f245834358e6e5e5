//! SQL schema for the Weft SQLite config store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Custom ontologies, one JSON blob per id. The `example` and `blank`
-- built-ins are never stored; they are materialised in code.
CREATE TABLE IF NOT EXISTS ontologies (
    id         TEXT PRIMARY KEY,
    body       TEXT NOT NULL,   -- exchange-format ontology JSON
    updated_at TEXT NOT NULL    -- ISO 8601 UTC
);

-- Everything else: endpoint config, selected ontology, preferences.
-- Values are JSON-encoded.
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

PRAGMA user_version = 1;
";
