//! Key-value storage contract and implementations.
//!
//! # Responsibility
//! - Model the single-key string store the review collection is serialized
//!   into (one `get`/`set` pair, wholesale value replacement).
//! - Provide a SQLite-backed store for real runs and an in-memory store for
//!   tests and ephemeral sessions.
//!
//! # Invariants
//! - `set` replaces the full value for a key in one atomic write.
//! - `SqliteKeyValueStore` only accepts migrated connections.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Minimal string key-value store.
///
/// The whole review collection is one value under one key, so this is the
/// entire persistence surface the upper layers need.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> DbResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> DbResult<()>;
}

/// SQLite-backed key-value store over the `storage` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a migrated connection after verifying its schema state.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   this binary's latest migration.
    /// - `MissingStorageTable` when the `storage` table is absent.
    pub fn try_new(conn: Connection) -> DbResult<Self> {
        let actual_version = current_user_version(&conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'storage'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists != 1 {
            return Err(DbError::MissingStorageTable);
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory key-value store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DbResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
