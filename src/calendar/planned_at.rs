//! Planned date with optional time of day.

use super::CalendarError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;
const DATE_LEN: usize = 10;
const TIME_LEN: usize = 5;

/// A planned calendar day, optionally carrying a time of day.
///
/// Backends exchange these as ISO strings: `2024-03-10` for date-only
/// plans and `2024-03-10T14:30` when a time is set. Parsing keeps only
/// the local calendar day and the `HH:MM` part; seconds, fractions and
/// offsets are dropped.
///
/// # Examples
///
///     use montage::calendar::PlannedAt;
///
///     let planned = PlannedAt::parse("2024-03-10T14:30").expect("valid");
///     assert_eq!(planned.date().to_string(), "2024-03-10");
///     assert_eq!(planned.to_string(), "2024-03-10T14:30");
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlannedAt {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl PlannedAt {
    /// Creates a date-only plan.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self { date, time: None }
    }

    /// Creates a plan with a time of day.
    #[must_use]
    pub const fn at(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time: Some(time),
        }
    }

    /// Parses an ISO date or date-time string.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTimestamp`] when the leading ten
    /// characters are not a `YYYY-MM-DD` date or the time part is not
    /// `HH:MM`.
    pub fn parse(value: &str) -> Result<Self, CalendarError> {
        let trimmed = value.trim();
        let invalid = || CalendarError::InvalidTimestamp(value.to_owned());

        let date_part = trimmed.get(..DATE_LEN).ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())?;

        let rest = trimmed.get(DATE_LEN..).unwrap_or_default();
        if rest.is_empty() {
            return Ok(Self::on(date));
        }
        if !rest.starts_with(['T', ' ']) {
            return Err(invalid());
        }

        let time_part = rest.get(1..=TIME_LEN).ok_or_else(invalid)?;
        let time = NaiveTime::parse_from_str(time_part, "%H:%M").map_err(|_| invalid())?;
        Ok(Self::at(date, time))
    }

    /// Returns the calendar day.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.date
    }

    /// Returns the time of day, if any.
    #[must_use]
    pub const fn time(self) -> Option<NaiveTime> {
        self.time
    }

    /// Returns a copy moved to `date`, keeping the time of day.
    #[must_use]
    pub const fn with_date(self, date: NaiveDate) -> Self {
        Self {
            date,
            time: self.time,
        }
    }

    fn as_datetime(self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    /// Whole days between this plan and the start of `new_date`, rounded
    /// up. Positive when `new_date` is later.
    #[must_use]
    pub fn delay_days_until(self, new_date: NaiveDate) -> i64 {
        let seconds = new_date
            .and_time(NaiveTime::MIN)
            .signed_duration_since(self.as_datetime())
            .num_seconds();
        let whole = seconds.div_euclid(SECONDS_PER_DAY);
        if seconds.rem_euclid(SECONDS_PER_DAY) == 0 {
            whole
        } else {
            whole + 1
        }
    }

    /// Returns whether moving to `new_date` postpones this plan.
    #[must_use]
    pub fn is_postponed_by(self, new_date: NaiveDate) -> bool {
        self.delay_days_until(new_date) > 0
    }
}

impl fmt::Display for PlannedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(time) => write!(f, "{}T{}", self.date, time.format("%H:%M")),
            None => write!(f, "{}", self.date),
        }
    }
}

impl TryFrom<String> for PlannedAt {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlannedAt> for String {
    fn from(value: PlannedAt) -> Self {
        value.to_string()
    }
}
