//! Grouping items into calendar-day buckets.

use super::PlannedAt;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Groups items by the calendar day of their plan.
///
/// Items without a plan are skipped. Within a bucket, items keep their
/// input order except that timed items are sorted by time of day, with
/// date-only items ahead of timed ones.
pub fn bucket_items_by_date<'a, T, F>(
    items: impl IntoIterator<Item = &'a T>,
    date_of: F,
) -> BTreeMap<NaiveDate, Vec<&'a T>>
where
    T: 'a,
    F: Fn(&T) -> Option<PlannedAt>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<(Option<chrono::NaiveTime>, &'a T)>> =
        BTreeMap::new();
    for item in items {
        if let Some(planned) = date_of(item) {
            buckets
                .entry(planned.date())
                .or_default()
                .push((planned.time(), item));
        }
    }

    buckets
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by_key(|(time, _)| *time);
            (date, entries.into_iter().map(|(_, item)| item).collect())
        })
        .collect()
}

/// Load indicator for a single calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    /// Number of items planned on the day.
    pub count: usize,
    /// Soft limit the count is compared with.
    pub limit: usize,
}

impl DayLoad {
    /// Creates a load indicator.
    #[must_use]
    pub const fn for_count(count: usize, limit: usize) -> Self {
        Self { count, limit }
    }

    /// Returns whether the cell should show the over-limit warning.
    ///
    /// The limit is advisory only; reaching it never blocks a drop.
    #[must_use]
    pub const fn is_over_limit(self) -> bool {
        self.limit > 0 && self.count >= self.limit
    }
}
