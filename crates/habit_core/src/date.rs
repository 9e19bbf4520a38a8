//! Calendar date helpers shared by completion and streak logic.
//!
//! # Responsibility
//! - Format and parse canonical `YYYY-MM-DD` date keys.
//! - Resolve "today" through an injectable [`Clock`].
//! - Build trailing day windows for recent-history views.
//!
//! # Invariants
//! - Dates carry no time or timezone component.
//! - Only zero-padded `YYYY-MM-DD` text is accepted as a date key, so two
//!   keys are equal exactly when their strings are equal.

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// `chrono` format string for canonical date keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

/// Date key text that is not a canonical calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    input: String,
}

impl DateParseError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date `{}`; expected YYYY-MM-DD", self.input)
    }
}

impl Error for DateParseError {}

/// Source of "today" and "now" for the engine.
pub trait Clock {
    /// Current calendar date, no time component.
    fn today(&self) -> NaiveDate;
    /// Current instant, used for creation timestamps.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock in the local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
///
/// Interior mutability lets a store keep ownership of the clock while the
/// caller still advances it through a shared reference.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    /// Pins the clock to noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            today: Cell::new(date),
            now: Cell::new(noon_utc(date)),
        }
    }

    /// Pins the clock to an explicit instant; `today` is its UTC date.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            today: Cell::new(now.date_naive()),
            now: Cell::new(now),
        }
    }

    pub fn set_today(&self, date: NaiveDate) {
        self.today.set(date);
        self.now.set(noon_utc(date));
    }

    /// Moves the clock forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        let next = self
            .today
            .get()
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        self.set_today(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// Formats `date` as a canonical `YYYY-MM-DD` key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a canonical `YYYY-MM-DD` key.
///
/// # Errors
/// - Rejects non-padded forms such as `2024-1-5`.
/// - Rejects impossible dates such as `2023-02-30`.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateParseError> {
    if !DATE_KEY_RE.is_match(value) {
        return Err(DateParseError {
            input: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DateParseError {
        input: value.to_string(),
    })
}

/// Longest day window the window helpers will build (one leap year).
pub const MAX_WINDOW_DAYS: u64 = 366;

/// Today's date in the local calendar.
pub fn today() -> NaiveDate {
    SystemClock.today()
}

/// The date `n` calendar days before today; `n = 0` is today.
pub fn days_ago(n: u64) -> NaiveDate {
    days_before(today(), n)
}

/// `n` dates from `n - 1` days ago through today, ascending.
///
/// `n` is clamped to [`MAX_WINDOW_DAYS`].
pub fn last_n_days(n: u64) -> Vec<NaiveDate> {
    window_ending(today(), n)
}

/// The date `n` calendar days before `date`, saturating at the calendar start.
pub fn days_before(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// `n` ascending dates ending at (and including) `end`.
///
/// `n` is clamped to [`MAX_WINDOW_DAYS`].
pub fn window_ending(end: NaiveDate, n: u64) -> Vec<NaiveDate> {
    let n = n.min(MAX_WINDOW_DAYS);
    (0..n).rev().map(|offset| days_before(end, offset)).collect()
}
