//! Month and week grid construction.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of cells in a month grid (six rows of seven days).
pub const MONTH_GRID_CELLS: usize = 42;

/// Number of cells in a week grid.
pub const WEEK_GRID_CELLS: usize = 7;

/// A single day in a calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    /// The calendar day.
    pub date: NaiveDate,
    /// Whether the day belongs to the displayed period rather than a
    /// neighbouring month.
    pub is_current_period: bool,
}

/// Calendar layout currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarView {
    /// Six-week month grid.
    #[default]
    Month,
    /// Single Monday-anchored week.
    Week,
}

impl CalendarView {
    /// Builds the grid for the period containing `reference`.
    #[must_use]
    pub fn grid(self, reference: NaiveDate) -> Vec<DayCell> {
        match self {
            Self::Month => build_month_grid(reference),
            Self::Week => build_week_grid(reference),
        }
    }

    /// Moves `reference` by `steps` periods (months or weeks); negative
    /// steps move backwards.
    ///
    /// Month arithmetic clamps to the last valid day, so 31 January plus
    /// one month lands on the last day of February. Out-of-range results
    /// leave the reference unchanged.
    #[must_use]
    pub fn shift(self, reference: NaiveDate, steps: i32) -> NaiveDate {
        let magnitude = steps.unsigned_abs();
        let shifted = match self {
            Self::Month if steps >= 0 => reference.checked_add_months(Months::new(magnitude)),
            Self::Month => reference.checked_sub_months(Months::new(magnitude)),
            Self::Week => {
                let days = Days::new(u64::from(magnitude) * 7);
                if steps >= 0 {
                    reference.checked_add_days(days)
                } else {
                    reference.checked_sub_days(days)
                }
            }
        };
        shifted.unwrap_or(reference)
    }
}

/// Returns the Monday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Builds the 42-cell month grid for the month containing `reference`.
///
/// The grid starts on the Monday on or before the first of the month and
/// is padded with days of the following month so that it always has six
/// rows, whatever the month length.
#[must_use]
pub fn build_month_grid(reference: NaiveDate) -> Vec<DayCell> {
    let first = reference.with_day(1).unwrap_or(reference);
    let start = week_start(first);

    start
        .iter_days()
        .take(MONTH_GRID_CELLS)
        .map(|date| DayCell {
            date,
            is_current_period: date.year() == first.year() && date.month() == first.month(),
        })
        .collect()
}

/// Builds the seven-cell week grid for the week containing `reference`.
#[must_use]
pub fn build_week_grid(reference: NaiveDate) -> Vec<DayCell> {
    week_start(reference)
        .iter_days()
        .take(WEEK_GRID_CELLS)
        .map(|date| DayCell {
            date,
            is_current_period: true,
        })
        .collect()
}
