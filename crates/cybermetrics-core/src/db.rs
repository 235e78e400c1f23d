// SQLite persistence for client-local state (the session keys).

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::session::SessionStore;

/// SQLite-backed key-value store. Stands in for the browser's local storage.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database (useful for
    /// tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS local_storage (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Read a value by key. Returns `None` if the key does not exist.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read local storage")
    }

    /// Insert or overwrite a value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value      = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![key, value],
        )
        .context("failed to write local storage")?;
        Ok(())
    }

    /// Delete a value. Deleting a missing key is a no-op.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .context("failed to delete from local storage")?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_item(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_item(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_item(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
