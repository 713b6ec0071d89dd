use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use time::OffsetDateTime;

use crate::config::StorageOptions;
use crate::error::{StorageError, StorageResult};

mod persistence;
mod schema;

pub use persistence::{LoadOutcome, PersistenceAdapter};

/// Durable string-to-string store. Each `set` replaces the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// SQLite-backed store holding one row per key.
pub struct SqliteKvStore {
    conn: Connection,
    db_path: PathBuf,
    quota: Option<usize>,
}

impl SqliteKvStore {
    pub fn open(options: &StorageOptions) -> StorageResult<Self> {
        let db_path = options.database_path.clone();
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                StorageError::Open(format!("creating data directory {}: {err}", parent.display()))
            })?;
        }
        let conn = Connection::open(&db_path)
            .map_err(|err| StorageError::Open(format!("opening {}: {err}", db_path.display())))?;
        prepare_connection(&conn)?;
        schema::apply(&conn)?;
        tracing::debug!(path = %db_path.display(), "opened key-value store");
        Ok(Self {
            conn,
            db_path,
            quota: options.quota_bytes,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|source| StorageError::Read {
                key: key.to_owned(),
                source,
            })
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(self.quota, key, value)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(|source| StorageError::Write {
                key: key.to_owned(),
                source,
            })?;
        Ok(())
    }
}

/// In-process store, optionally capped at `quota` bytes per value.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Overwrites a raw value without any checks.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(self.quota, key, value)?;
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

fn check_quota(quota: Option<usize>, key: &str, value: &str) -> StorageResult<()> {
    match quota {
        Some(quota) if value.len() > quota => Err(StorageError::QuotaExceeded {
            key: key.to_owned(),
            needed: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

fn prepare_connection(conn: &Connection) -> StorageResult<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    fn options(root: &TempDir) -> StorageOptions {
        let mut options = StorageOptions::default();
        options.database_path = root.path().join("data").join("store.db");
        options
    }

    #[test]
    fn sqlite_store_round_trips_and_overwrites() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let mut store = SqliteKvStore::open(&options(&temp))?;
        assert_eq!(store.get("missing")?, None);

        store.set("theme", "dark")?;
        store.set("theme", "cream")?;
        assert_eq!(store.get("theme")?.as_deref(), Some("cream"));
        Ok(())
    }

    #[test]
    fn sqlite_store_survives_reopen() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let opts = options(&temp);
        {
            let mut store = SqliteKvStore::open(&opts)?;
            store.set("notes", "[]")?;
        }
        let store = SqliteKvStore::open(&opts)?;
        assert_eq!(store.get("notes")?.as_deref(), Some("[]"));
        assert!(store.database_path().exists());
        Ok(())
    }

    #[test]
    fn quota_rejects_oversized_values() {
        let mut store = MemoryKvStore::with_quota(4);
        assert!(store.set("k", "1234").is_ok());
        assert_matches!(
            store.set("k", "12345"),
            Err(StorageError::QuotaExceeded { needed: 5, quota: 4, .. })
        );
        assert_eq!(store.get("k").ok().flatten().as_deref(), Some("1234"));
    }
}
