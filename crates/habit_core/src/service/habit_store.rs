//! Habit collection use-case service.
//!
//! # Responsibility
//! - Own the in-memory habit collection in display order.
//! - Route every completion change through toggle + streak recompute.
//! - Write a full snapshot after each effective mutation.
//!
//! # Invariants
//! - Operations on unknown ids are silent no-ops and do not persist.
//! - Validation failures leave the collection untouched.
//! - Save failures never roll back the in-memory mutation; they are logged
//!   and kept in `last_save_error`.
//! - `&mut self` on every mutation gives one writer at a time. Hosts
//!   sharing a store across threads must wrap it in a lock.

use crate::date::{parse_date, Clock, DateParseError, SystemClock};
use crate::model::habit::{Habit, HabitDraft, HabitId, HabitPatch, HabitValidationError};
use crate::persist::snapshot::{decode_snapshot, encode_snapshot};
use crate::persist::{SnapshotStore, DEFAULT_SNAPSHOT_SLOT};
use crate::stats::{compute_stats, AggregateStats};
use crate::streak::{StreakPolicy, Streaks};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-level error for rejected inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitStoreError {
    Validation(HabitValidationError),
    InvalidDate(DateParseError),
}

impl Display for HabitStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidDate(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HabitStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidDate(err) => Some(err),
        }
    }
}

impl From<HabitValidationError> for HabitStoreError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DateParseError> for HabitStoreError {
    fn from(value: DateParseError) -> Self {
        Self::InvalidDate(value)
    }
}

/// Construction options for [`HabitStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Slot the snapshot is loaded from and saved to.
    pub slot: String,
    pub streak_policy: StreakPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slot: DEFAULT_SNAPSHOT_SLOT.to_string(),
            streak_policy: StreakPolicy::default(),
        }
    }
}

/// Result of one completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the toggled date is completed afterwards.
    pub completed: bool,
    pub streaks: Streaks,
}

/// In-memory habit collection with snapshot persistence.
pub struct HabitStore<S: SnapshotStore, C: Clock = SystemClock> {
    habits: Vec<Habit>,
    persistence: S,
    clock: C,
    options: StoreOptions,
    last_save_error: Option<String>,
}

impl<S: SnapshotStore, C: Clock> HabitStore<S, C> {
    /// Loads the collection from the default slot with the default policy.
    pub fn open(persistence: S, clock: C) -> Self {
        Self::open_with(persistence, clock, StoreOptions::default())
    }

    /// Loads the collection from `options.slot`.
    ///
    /// An absent slot starts empty. A corrupt or unreadable snapshot is
    /// logged and also starts empty. Loaded streaks are recomputed for the
    /// clock's current day.
    pub fn open_with(persistence: S, clock: C, options: StoreOptions) -> Self {
        let habits = load_initial(&persistence, &options.slot);
        let mut store = Self {
            habits,
            persistence,
            clock,
            options,
            last_save_error: None,
        };
        store.refresh_streaks();
        store
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id() == id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn streak_policy(&self) -> StreakPolicy {
        self.options.streak_policy
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Collection summary for the clock's current day.
    pub fn stats(&self) -> Option<AggregateStats> {
        compute_stats(&self.habits, self.clock.today())
    }

    /// Appends a new habit built from `draft` and persists.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` when the trimmed name is empty; nothing is
    ///   stored or saved.
    pub fn create(&mut self, draft: HabitDraft) -> Result<HabitId, HabitStoreError> {
        let habit = Habit::from_draft(draft, self.clock.now()).map_err(|err| {
            warn!("event=habit_create module=store status=rejected reason={err}");
            err
        })?;
        let id = habit.id().clone();
        self.habits.push(habit);
        info!(
            "event=habit_create module=store status=ok habit_id={id} total={}",
            self.habits.len()
        );
        self.persist();
        Ok(id)
    }

    /// Merges `patch` into the habit with `id`.
    ///
    /// Returns `Ok(false)` when no habit has `id`.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` when the patch carries a blank name.
    pub fn update(&mut self, id: &HabitId, patch: &HabitPatch) -> Result<bool, HabitStoreError> {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id() == id) else {
            debug!("event=habit_update module=store status=noop habit_id={id}");
            return Ok(false);
        };
        habit.apply_patch(patch)?;
        info!("event=habit_update module=store status=ok habit_id={id}");
        self.persist();
        Ok(true)
    }

    /// Removes the habit with `id`. Returns `false` when none matched.
    pub fn delete(&mut self, id: &HabitId) -> bool {
        let Some(index) = self.habits.iter().position(|habit| habit.id() == id) else {
            debug!("event=habit_delete module=store status=noop habit_id={id}");
            return false;
        };
        self.habits.remove(index);
        info!(
            "event=habit_delete module=store status=ok habit_id={id} total={}",
            self.habits.len()
        );
        self.persist();
        true
    }

    /// Toggles completion of `date` for the habit with `id`.
    ///
    /// Streaks are recomputed against the clock's today, not against `date`.
    /// Returns `None` when no habit has `id`.
    pub fn toggle_completion(&mut self, id: &HabitId, date: NaiveDate) -> Option<ToggleOutcome> {
        let today = self.clock.today();
        let policy = self.options.streak_policy;
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id() == id) else {
            debug!("event=habit_toggle module=store status=noop habit_id={id}");
            return None;
        };

        let completed = habit.toggle_completion(date, today, policy);
        let streaks = habit.streaks();
        info!(
            "event=habit_toggle module=store status=ok habit_id={id} completed={completed} current={} longest={}",
            streaks.current, streaks.longest
        );
        self.persist();
        Some(ToggleOutcome { completed, streaks })
    }

    /// Toggles completion of today's date.
    pub fn toggle_today(&mut self, id: &HabitId) -> Option<ToggleOutcome> {
        let today = self.clock.today();
        self.toggle_completion(id, today)
    }

    /// String-keyed form of [`HabitStore::toggle_completion`].
    ///
    /// # Errors
    /// - `InvalidDate` when `date` is not a canonical `YYYY-MM-DD` key.
    pub fn toggle_completion_key(
        &mut self,
        id: &HabitId,
        date: &str,
    ) -> Result<Option<ToggleOutcome>, HabitStoreError> {
        let date = parse_date(date)?;
        Ok(self.toggle_completion(id, date))
    }

    /// Recomputes every habit's streaks for the clock's current day.
    ///
    /// Derived fields only; does not persist.
    pub fn refresh_streaks(&mut self) {
        let today = self.clock.today();
        let policy = self.options.streak_policy;
        for habit in &mut self.habits {
            habit.refresh_streaks(today, policy);
        }
    }

    fn persist(&mut self) {
        let result = encode_snapshot(&self.habits)
            .map_err(|err| err.to_string())
            .and_then(|payload| {
                self.persistence
                    .save_snapshot(&self.options.slot, &payload)
                    .map_err(|err| err.to_string())
            });

        match result {
            Ok(()) => {
                debug!(
                    "event=snapshot_save module=store status=ok slot={} habits={}",
                    self.options.slot,
                    self.habits.len()
                );
                self.last_save_error = None;
            }
            Err(message) => {
                error!(
                    "event=snapshot_save module=store status=error slot={} error={message}",
                    self.options.slot
                );
                self.last_save_error = Some(message);
            }
        }
    }
}

fn load_initial<S: SnapshotStore>(persistence: &S, slot: &str) -> Vec<Habit> {
    let payload = match persistence.load_snapshot(slot) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            info!("event=snapshot_load module=store status=empty slot={slot}");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=store status=error slot={slot} error_code=load_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_snapshot(&payload) {
        Ok(habits) => {
            info!(
                "event=snapshot_load module=store status=ok slot={slot} habits={}",
                habits.len()
            );
            habits
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=store status=error slot={slot} error_code=snapshot_corrupt error={err}"
            );
            Vec::new()
        }
    }
}
