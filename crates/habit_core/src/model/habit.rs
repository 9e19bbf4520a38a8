//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its draft/patch inputs.
//! - Keep derived streak fields in lockstep with the completion set.
//!
//! # Invariants
//! - `id` and `created_at` are fixed at construction.
//! - `name` is non-empty after trimming and is stored trimmed.
//! - `current_streak` and `longest_streak` are written only by
//!   [`Habit::refresh_streaks`], so `longest_streak >= current_streak`.
//! - `target_frequency` is informational; streak math ignores it.

use crate::completion::CompletionSet;
use crate::date::window_ending;
use crate::model::palette::{DEFAULT_COLOR, DEFAULT_TARGET_FREQUENCY};
use crate::streak::{compute_streaks, StreakPolicy, Streaks};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable habit identifier.
///
/// Generated ids are UUID v4 strings; persisted ids of any shape are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HabitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Habit validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Name is empty or whitespace only.
    EmptyName,
    /// Derived streak fields disagree with each other.
    StreakInvariant { current: u32, longest: u32 },
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name must not be empty"),
            Self::StreakInvariant { current, longest } => write!(
                f,
                "longest streak ({longest}) must be >= current streak ({current})"
            ),
        }
    }
}

impl Error for HabitValidationError {}

/// User input for creating a habit.
///
/// Only `name` is validated; every other field passes through unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub color: String,
    pub target_frequency: u8,
}

impl HabitDraft {
    /// Creates a draft with form defaults for everything except `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for HabitDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            color: DEFAULT_COLOR.to_string(),
            target_frequency: DEFAULT_TARGET_FREQUENCY,
        }
    }
}

/// Partial edit of user-editable habit fields. `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub target_frequency: Option<u8>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.target_frequency.is_none()
    }
}

/// One day of a habit's recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMark {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Canonical habit record.
///
/// Serialized with the camelCase keys used by persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    completed_dates: CompletionSet,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    longest_streak: u32,
    #[serde(default = "default_target_frequency")]
    pub target_frequency: u8,
    created_at: DateTime<Utc>,
}

fn default_target_frequency() -> u8 {
    DEFAULT_TARGET_FREQUENCY
}

impl Habit {
    /// Creates a habit from a draft with a freshly generated id.
    ///
    /// # Errors
    /// - `EmptyName` when the trimmed draft name is empty.
    pub fn from_draft(
        draft: HabitDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, HabitValidationError> {
        Self::with_id(HabitId::generate(), draft, created_at)
    }

    /// Creates a habit with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: HabitId,
        draft: HabitDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, HabitValidationError> {
        let name = normalize_name(&draft.name)?;
        Ok(Self {
            id,
            name,
            description: draft.description,
            category: draft.category,
            color: draft.color,
            completed_dates: CompletionSet::new(),
            current_streak: 0,
            longest_streak: 0,
            target_frequency: draft.target_frequency,
            created_at,
        })
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_dates(&self) -> &CompletionSet {
        &self.completed_dates
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn streaks(&self) -> Streaks {
        Streaks {
            current: self.current_streak,
            longest: self.longest_streak,
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(date)
    }

    /// Toggles completion on `date` and recomputes streaks as of `today`.
    ///
    /// Returns `true` when `date` is completed after the call.
    pub fn toggle_completion(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        policy: StreakPolicy,
    ) -> bool {
        let completed = self.completed_dates.toggle(date);
        self.refresh_streaks(today, policy);
        completed
    }

    /// Recomputes derived streak fields from the completion set.
    pub fn refresh_streaks(&mut self, today: NaiveDate, policy: StreakPolicy) {
        let streaks = compute_streaks(&self.completed_dates, today, policy);
        self.current_streak = streaks.current;
        self.longest_streak = streaks.longest;
    }

    /// Applies a patch after validating it; on error nothing changes.
    pub fn apply_patch(&mut self, patch: &HabitPatch) -> Result<(), HabitValidationError> {
        let name = patch.name.as_deref().map(normalize_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(target_frequency) = patch.target_frequency {
            self.target_frequency = target_frequency;
        }
        Ok(())
    }

    /// Completion marks for the `days` days ending at `today`, ascending.
    ///
    /// At most [`MAX_WINDOW_DAYS`](crate::date::MAX_WINDOW_DAYS) marks are built.
    pub fn recent_days(&self, today: NaiveDate, days: u64) -> Vec<DayMark> {
        window_ending(today, days)
            .into_iter()
            .map(|date| DayMark {
                date,
                completed: self.completed_dates.contains(date),
            })
            .collect()
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.longest_streak < self.current_streak {
            return Err(HabitValidationError::StreakInvariant {
                current: self.current_streak,
                longest: self.longest_streak,
            });
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> Result<String, HabitValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HabitValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}
