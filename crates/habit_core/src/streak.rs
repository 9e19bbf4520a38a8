//! Streak derivation from a completion set.
//!
//! # Responsibility
//! - Compute the current and longest consecutive-day runs for one habit.
//!
//! # Invariants
//! - Output depends only on the input set, `today` and the policy; nothing
//!   is carried between calls.
//! - `longest >= current` for every input.
//! - The current streak is 0 whenever `today` is not completed.

use crate::completion::CompletionSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cap applied to the current streak by the legacy lookback walk.
pub const LEGACY_CURRENT_STREAK_CAP: u32 = 30;

/// Controls how far back the current streak walk may count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakPolicy {
    current_cap: Option<u32>,
}

impl StreakPolicy {
    /// Counts at most `days` days (today included) into the current streak.
    ///
    /// A cap of 0 is treated as 1, since a completed today always counts.
    pub const fn capped(days: u32) -> Self {
        let days = if days == 0 { 1 } else { days };
        Self {
            current_cap: Some(days),
        }
    }

    /// Counts the full unbroken run ending today.
    pub const fn uncapped() -> Self {
        Self { current_cap: None }
    }

    pub fn current_cap(&self) -> Option<u32> {
        self.current_cap
    }
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self::capped(LEGACY_CURRENT_STREAK_CAP)
    }
}

/// Derived streak values for one habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Computes current and longest streaks for `dates` as seen on `today`.
pub fn compute_streaks(dates: &CompletionSet, today: NaiveDate, policy: StreakPolicy) -> Streaks {
    let current = current_streak(dates, today, policy);
    Streaks {
        current,
        longest: longest_run(dates).max(current),
    }
}

fn current_streak(dates: &CompletionSet, today: NaiveDate, policy: StreakPolicy) -> u32 {
    if !dates.contains(today) {
        return 0;
    }

    let mut streak = 1;
    let mut cursor = today;
    while policy.current_cap.map_or(true, |cap| streak < cap) {
        let Some(previous) = cursor.pred_opt() else {
            break;
        };
        if !dates.contains(previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

fn longest_run(dates: &CompletionSet) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates.iter() {
        run = match previous.and_then(|prev| prev.succ_opt()) {
            Some(expected) if expected == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}
