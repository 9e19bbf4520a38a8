//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit record, its draft/patch inputs and form presets.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod habit;
pub mod palette;
