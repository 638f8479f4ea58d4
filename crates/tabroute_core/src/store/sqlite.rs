//! SQLite-backed state store.
//!
//! # Invariants
//! - Connections passed in must come from `db::open_db*` (migrated schema).
//! - One row per `(area, key)`; writes are upserts.

use super::{StateStore, StorageArea, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// `StateStore` over the `state_entries` table.
pub struct SqliteStateStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateStore for SqliteStateStore<'_> {
    fn read(&self, area: StorageArea, key: &str) -> StoreResult<Option<Value>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value_json FROM state_entries WHERE area = ?1 AND key = ?2;",
                params![area.as_str(), key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|err| StoreError::InvalidData {
                    key: key.to_string(),
                    message: err.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn write(&mut self, area: StorageArea, key: &str, value: &Value) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO state_entries (area, key, value_json)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (area, key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![area.as_str(), key, value.to_string()],
        )?;
        Ok(())
    }

    fn remove(&mut self, area: StorageArea, key: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM state_entries WHERE area = ?1 AND key = ?2;",
            params![area.as_str(), key],
        )?;
        Ok(())
    }
}
