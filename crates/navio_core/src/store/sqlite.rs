//! SQLite-backed key-value store.
//!
//! # Invariants
//! - A batch passed to `apply` commits in one transaction or not at all.
//! - `updated_at` is refreshed on every put.

use super::{KeyValueStore, KvWrite, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection that already went through `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a store file with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }

    fn apply(&self, writes: &[KvWrite]) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for write in writes {
            let result = match write {
                KvWrite::Put { key, value } => tx.execute(
                    "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![key, value],
                ),
                KvWrite::Remove { key } => {
                    tx.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])
                }
            };
            if let Err(err) = result {
                error!(
                    "event=kv_apply module=store status=error batch_size={} error={}",
                    writes.len(),
                    err
                );
                return Err(err.into());
            }
        }
        tx.commit()?;
        Ok(())
    }
}
