//! Snapshot persistence contract and implementations.
//!
//! # Responsibility
//! - Define the load/save seam the habit store writes through.
//! - Keep storage media (SQLite, memory) out of store orchestration.
//!
//! # Invariants
//! - A slot holds exactly one full snapshot payload; saves replace it.
//! - Loading an absent slot is `Ok(None)`, never an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod snapshot;
pub mod sqlite;

/// Well-known slot the habit collection is stored under.
pub const DEFAULT_SNAPSHOT_SLOT: &str = "notion-habits";

pub type PersistResult<T> = Result<T, PersistError>;

/// Storage medium failure.
#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    /// Medium refused the operation (read-only, quota, simulated outage).
    Unavailable(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value medium for serialized snapshots.
pub trait SnapshotStore {
    fn load_snapshot(&self, slot: &str) -> PersistResult<Option<String>>;
    fn save_snapshot(&self, slot: &str, payload: &str) -> PersistResult<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn load_snapshot(&self, slot: &str) -> PersistResult<Option<String>> {
        (**self).load_snapshot(slot)
    }

    fn save_snapshot(&self, slot: &str, payload: &str) -> PersistResult<()> {
        (**self).save_snapshot(slot, payload)
    }
}
