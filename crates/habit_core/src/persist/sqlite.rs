//! SQLite-backed snapshot store.
//!
//! # Invariants
//! - The connection must be migrated to the latest schema before use.
//! - Saves upsert by slot and bump `updated_at`.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::persist::{PersistResult, SnapshotStore};
use rusqlite::{params, Connection, OptionalExtension};

/// Snapshot store over one `snapshots` table.
pub struct SqliteSnapshotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `SchemaNotReady` when the connection was not migrated.
    pub fn try_new(conn: &'conn Connection) -> PersistResult<Self> {
        let db_version = current_version(conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(DbError::SchemaNotReady {
                db_version,
                expected,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Lists slots that currently hold a snapshot.
    pub fn slots(&self) -> PersistResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slot FROM snapshots ORDER BY slot ASC;")?;
        let slots = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }
}

impl SnapshotStore for SqliteSnapshotStore<'_> {
    fn load_snapshot(&self, slot: &str) -> PersistResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE slot = ?1;",
                params![slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_snapshot(&self, slot: &str, payload: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (slot, payload) VALUES (?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![slot, payload],
        )?;
        Ok(())
    }
}
