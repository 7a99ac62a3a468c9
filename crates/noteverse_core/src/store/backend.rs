//! Snapshot backends: one serialized value per named key.
//!
//! # Responsibility
//! - Read and overwrite whole snapshots; no partial updates.
//!
//! # See also
//! - `crate::db` for connection bootstrap and migrations.

use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Key/value persistence contract used by `NoteStore`.
pub trait SnapshotBackend {
    /// Returns the stored value for `key`, or `None` when absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the stored value for `key`.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// SQLite-backed snapshot storage over the `snapshots` table.
pub struct SqliteSnapshotBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotBackend<'conn> {
    /// Wraps a connection returned by `db::open_db` / `db::open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotBackend for SqliteSnapshotBackend<'_> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process snapshot storage.
///
/// `fail_writes` simulates a full or read-only storage medium.
#[derive(Debug, Default)]
pub struct MemorySnapshotBackend {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemorySnapshotBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing the codec.
    pub fn with_raw(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl SnapshotBackend for MemorySnapshotBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Backend(format!(
                "write rejected for key `{key}`: storage quota exceeded"
            )));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySnapshotBackend, SnapshotBackend, SqliteSnapshotBackend};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_backend_overwrites_value_per_key() {
        let conn = open_db_in_memory().unwrap();
        let mut backend = SqliteSnapshotBackend::new(&conn);

        assert_eq!(backend.read("notes").unwrap(), None);
        backend.write("notes", "[1]").unwrap();
        backend.write("notes", "[2]").unwrap();
        backend.write("other", "x").unwrap();

        assert_eq!(backend.read("notes").unwrap().as_deref(), Some("[2]"));
        assert_eq!(backend.read("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn memory_backend_can_reject_writes() {
        let mut backend = MemorySnapshotBackend::new();
        backend.set_fail_writes(true);
        assert!(backend.write("notes", "[]").is_err());
        assert_eq!(backend.read("notes").unwrap(), None);
    }
}
