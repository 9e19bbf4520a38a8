//! Cross-habit summary views.
//!
//! # Responsibility
//! - Derive today's progress and average streak from a habit snapshot.
//! - Derive a per-habit completion rate since creation.
//!
//! # Invariants
//! - Views are recomputed on every call; nothing is cached.
//! - Empty input yields `None` instead of dividing by zero.
//! - Percentages and averages round half up.

use crate::model::habit::Habit;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Summary of the whole habit collection as of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_habits: u32,
    pub completed_today: u32,
    pub completion_rate_pct: u32,
    pub average_current_streak: u32,
}

/// Computes the collection summary for `today`.
///
/// Returns `None` when there are no habits to summarize.
pub fn compute_stats(habits: &[Habit], today: NaiveDate) -> Option<AggregateStats> {
    if habits.is_empty() {
        return None;
    }

    let total = habits.len() as u64;
    let completed_today = habits
        .iter()
        .filter(|habit| habit.is_completed_on(today))
        .count() as u64;
    let streak_sum: u64 = habits
        .iter()
        .map(|habit| u64::from(habit.current_streak()))
        .sum();

    Some(AggregateStats {
        total_habits: saturate(total),
        completed_today: saturate(completed_today),
        completion_rate_pct: saturate(round_ratio(100 * completed_today, total)),
        average_current_streak: saturate(round_ratio(streak_sum, total)),
    })
}

/// Completions as a percentage of whole days elapsed since creation.
///
/// Elapsed days round up and count at least one, so a habit created today and
/// completed today reports 100. Backfilled completions can push the value
/// above 100.
pub fn habit_completion_rate(habit: &Habit, now: DateTime<Utc>) -> u32 {
    let completions = habit.completed_dates().len() as u64;
    if completions == 0 {
        return 0;
    }

    let elapsed_ms = (now - habit.created_at()).num_milliseconds();
    let elapsed_days = if elapsed_ms > 0 {
        ((elapsed_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY) as u64
    } else {
        0
    };
    saturate(round_ratio(100 * completions, elapsed_days.max(1)))
}

fn round_ratio(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
