//! Database schema and migrations for foyer.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - accounts table
    r#"
-- Account records: identity, credentials and profile fields
CREATE TABLE accounts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    username    TEXT NOT NULL UNIQUE,
    address     TEXT,
    password    TEXT NOT NULL,           -- Argon2 hash
    birthday    TEXT,                    -- ISO date (YYYY-MM-DD)
    avatar      TEXT,                    -- stored filename; NULL = no custom avatar
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
];
