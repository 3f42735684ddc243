//! Local storage for shareable-notes.
//!
//! A small string key-value store with the same surface as browser local
//! storage (`get_item`, `set_item`, `remove_item`, `keys`, `clear`), kept in a
//! `SQLite` database file. Writes whose value is identical to what is already
//! stored are skipped by comparing BLAKE3 hashes.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, trace};

use crate::error::{Error, Result};

/// Key-value storage engine.
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

        info!("Database opened successfully at {}", path.display());
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

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`.
    ///
    /// Returns `false` when the stored value was already identical and no
    /// write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_item(&self, key: &str, value: &str) -> Result<bool> {
        let hash = compute_hash(value);

        if self.stored_hash(key)?.as_deref() == Some(hash.as_str()) {
            trace!(key, "Skipping unchanged value");
            return Ok(false);
        }

        self.conn.execute(
            r"
            INSERT INTO local_storage (key, value, value_hash, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_hash = excluded.value_hash,
                updated_at = excluded.updated_at
            ",
            params![key, value, hash, Utc::now().to_rfc3339()],
        )?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(true)
    }

    /// Remove the value stored under `key`.
    ///
    /// Returns `true` if something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        if affected > 0 {
            debug!(key, "Removed value");
        }
        Ok(affected > 0)
    }

    /// All keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Remove every key. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM local_storage", [])?;
        if affected > 0 {
            info!("Cleared {} stored values", affected);
        }
        Ok(affected)
    }

    /// Count stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_keys = self.count()?;

        let total_value_bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM local_storage",
            [],
            |row| row.get(0),
        )?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM local_storage ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let last_write = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_keys,
            total_value_bytes: u64::try_from(total_value_bytes).unwrap_or(0),
            last_write,
            db_size_bytes,
        })
    }

    fn stored_hash(&self, key: &str) -> Result<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT value_hash FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }
}

/// Compute the BLAKE3 hash of a stored value.
#[must_use]
pub fn compute_hash(value: &str) -> String {
    blake3::hash(value.as_bytes()).to_hex().to_string()
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored keys.
    pub total_keys: i64,
    /// Sum of all value sizes in bytes.
    pub total_value_bytes: u64,
    /// When a value was last written.
    pub last_write: Option<DateTime<Utc>>,
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
    fn test_get_missing_key() {
        let storage = create_test_storage();
        assert!(storage.get_item("nope").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let storage = create_test_storage();
        assert!(storage.set_item("notes-storage", "{}").unwrap());
        assert_eq!(
            storage.get_item("notes-storage").unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_set_identical_value_is_skipped() {
        let storage = create_test_storage();
        assert!(storage.set_item("k", "value").unwrap());
        assert!(!storage.set_item("k", "value").unwrap());
        assert!(storage.set_item("k", "other").unwrap());
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("other"));
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_item() {
        let storage = create_test_storage();
        storage.set_item("k", "v").unwrap();

        assert!(storage.remove_item("k").unwrap());
        assert!(!storage.remove_item("k").unwrap());
        assert!(storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_keys_sorted() {
        let storage = create_test_storage();
        storage.set_item("b", "2").unwrap();
        storage.set_item("a", "1").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let storage = create_test_storage();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        assert_eq!(storage.clear().unwrap(), 2);
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_storage().stats().unwrap();
        assert_eq!(stats.total_keys, 0);
        assert_eq!(stats.total_value_bytes, 0);
        assert!(stats.last_write.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let storage = create_test_storage();
        storage.set_item("a", "hello").unwrap();
        storage.set_item("b", "wörld").unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.total_value_bytes, 11);
        assert!(stats.last_write.is_some());
    }

    #[test]
    fn test_unicode_round_trip() {
        let storage = create_test_storage();
        storage.set_item("k", "Hello 世界 🌍").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("Hello 世界 🌍"));
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash("x"), compute_hash("x"));
        assert_ne!(compute_hash("x"), compute_hash("y"));
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("storage.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.set_item("k", "persisted").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("persisted"));
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }
}
