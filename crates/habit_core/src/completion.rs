//! Per-habit completion date set.
//!
//! # Responsibility
//! - Hold the ordered, duplicate-free set of dates a habit was completed.
//! - Expose `toggle` as the only way to change completion state.
//!
//! # Invariants
//! - Iteration is ascending by calendar date.
//! - Membership is exact equality on the canonical date key.
//! - There is no separate mark/unmark API. Callers that need a direction
//!   read `contains` first.

use crate::date::{format_date, parse_date, DateParseError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered set of completion dates.
///
/// Serialized as an ascending array of `YYYY-MM-DD` strings. Duplicate keys
/// in persisted input collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CompletionSet {
    dates: BTreeSet<NaiveDate>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `date` if present, inserts it otherwise.
    ///
    /// Returns `true` when `date` is present after the call.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        }
    }

    /// Value-returning form of [`CompletionSet::toggle`].
    pub fn toggled(&self, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.toggle(date);
        next
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Ascending iterator over completion dates.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Canonical date keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(format_date).collect()
    }
}

impl FromIterator<NaiveDate> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CompletionSet {
    type Error = DateParseError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        value
            .iter()
            .map(|key| parse_date(key))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|dates| Self { dates })
    }
}

impl From<CompletionSet> for Vec<String> {
    fn from(value: CompletionSet) -> Self {
        value.keys()
    }
}
