//! Snapshot wire codec.
//!
//! # Responsibility
//! - Encode the habit collection as one JSON array.
//! - Decode persisted payloads and reject collections that break
//!   record or collection invariants.
//!
//! # Invariants
//! - Decoded collections have unique ids and non-blank names.
//! - Order is preserved in both directions.

use crate::model::habit::{Habit, HabitId, HabitValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Payload that cannot become a valid habit collection.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    DuplicateId(HabitId),
    InvalidHabit {
        id: HabitId,
        source: HabitValidationError,
    },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "snapshot is not valid habit JSON: {err}"),
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate habit id: {id}"),
            Self::InvalidHabit { id, source } => {
                write!(f, "snapshot habit {id} is invalid: {source}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::InvalidHabit { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes the collection in display order.
pub fn encode_snapshot(habits: &[Habit]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(habits)?)
}

/// Parses and validates a persisted collection.
pub fn decode_snapshot(payload: &str) -> Result<Vec<Habit>, SnapshotError> {
    let habits: Vec<Habit> = serde_json::from_str(payload)?;

    let mut seen = HashSet::with_capacity(habits.len());
    for habit in &habits {
        if !seen.insert(habit.id()) {
            return Err(SnapshotError::DuplicateId(habit.id().clone()));
        }
        if habit.name.trim().is_empty() {
            return Err(SnapshotError::InvalidHabit {
                id: habit.id().clone(),
                source: HabitValidationError::EmptyName,
            });
        }
    }
    Ok(habits)
}
