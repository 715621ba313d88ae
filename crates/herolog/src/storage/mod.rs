//! Storage layer for herolog.
//!
//! This module provides `SQLite`-based persistent key-value slots. Each slot
//! holds one whole serialized document that is read at startup and fully
//! rewritten on every change.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Key-value slot storage backed by `SQLite`.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this storage lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Reject every further write on this connection.
    #[cfg(test)]
    pub(crate) fn make_read_only(&self) {
        self.conn
            .execute_batch("PRAGMA query_only = ON;")
            .expect("failed to switch to read-only");
    }

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!("Wrote {} bytes to slot {}", value.len(), key);
        Ok(())
    }

    /// Size in bytes of the value stored under `key` (0 when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn slot_len(&self, key: &str) -> Result<usize> {
        let len: Option<i64> = self
            .conn
            .query_row(
                "SELECT length(CAST(value AS BLOB)) FROM slots WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(len.map_or(0, |n| usize::try_from(n).unwrap_or(0)))
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let slot_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))?;

        let db_size_bytes = if self.is_in_memory() {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            slot_count,
            db_size_bytes,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of populated slots.
    pub slot_count: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(storage.is_in_memory());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let storage = create_test_storage();
        storage.write_slot("events", "x").unwrap();
        storage.make_read_only();

        assert!(storage.write_slot("events", "y").is_err());
        assert_eq!(storage.read_slot("events").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_read_missing_slot() {
        let storage = create_test_storage();
        assert_eq!(storage.read_slot("nothing").unwrap(), None);
    }

    #[test]
    fn test_write_and_read_slot() {
        let storage = create_test_storage();
        storage.write_slot("events", "[1,2,3]").unwrap();
        assert_eq!(
            storage.read_slot("events").unwrap().as_deref(),
            Some("[1,2,3]")
        );
    }

    #[test]
    fn test_write_slot_overwrites() {
        let storage = create_test_storage();
        storage.write_slot("events", "old").unwrap();
        storage.write_slot("events", "new").unwrap();

        assert_eq!(storage.read_slot("events").unwrap().as_deref(), Some("new"));
        assert_eq!(storage.stats().unwrap().slot_count, 1);
    }

    #[test]
    fn test_slots_are_independent() {
        let storage = create_test_storage();
        storage.write_slot("a", "1").unwrap();
        storage.write_slot("b", "2").unwrap();

        assert_eq!(storage.read_slot("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.read_slot("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_slot_len_counts_bytes() {
        let storage = create_test_storage();
        assert_eq!(storage.slot_len("events").unwrap(), 0);

        storage.write_slot("events", "é").unwrap();
        assert_eq!(storage.slot_len("events").unwrap(), 2);
    }

    #[test]
    fn test_unicode_value() {
        let storage = create_test_storage();
        let value = "Capture du drapeau 🚩 — réussie";
        storage.write_slot("events", value).unwrap();
        assert_eq!(storage.read_slot("events").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.slot_count, 0);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("herolog.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.write_slot("events", "[]").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.read_slot("events").unwrap().as_deref(), Some("[]"));
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/herolog.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }
}
