//! Habit completion and streak-derivation engine.
//! This crate is the single source of truth for habit and streak invariants.

pub mod completion;
pub mod config;
pub mod date;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod stats;
pub mod streak;

pub use completion::CompletionSet;
pub use config::{ConfigError, EngineConfig};
pub use date::{
    days_ago, format_date, last_n_days, parse_date, today, Clock, DateParseError, FixedClock,
    SystemClock, MAX_WINDOW_DAYS,
};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::habit::{DayMark, Habit, HabitDraft, HabitId, HabitPatch, HabitValidationError};
pub use persist::memory::MemorySnapshotStore;
pub use persist::sqlite::SqliteSnapshotStore;
pub use persist::{PersistError, PersistResult, SnapshotStore, DEFAULT_SNAPSHOT_SLOT};
pub use service::habit_store::{HabitStore, HabitStoreError, StoreOptions, ToggleOutcome};
pub use stats::{compute_stats, habit_completion_rate, AggregateStats};
pub use streak::{compute_streaks, StreakPolicy, Streaks, LEGACY_CURRENT_STREAK_CAP};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
