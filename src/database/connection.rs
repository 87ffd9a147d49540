//! SQLite connection management for the slot database.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and runs schema migrations on open.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::migrations;

/// Owns a `rusqlite::Connection` with the slot schema applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Reads the value stored under `name`, or `None` if the slot was never written.
    pub fn read_slot(&self, name: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
    }

    /// Overwrites the slot `name` with `value`, creating it if needed.
    pub fn write_slot(&self, name: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, value, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    ///
    /// Test seam: gateways go through `read_slot`/`write_slot`; tests use this
    /// to inspect the schema and row counts directly.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
