//! Working-day calendar and stats window resolution.
//!
//! The business runs six days a week; Friday is the single non-working day.
//! Capacity is scaled by working days, never by raw calendar days. All
//! arithmetic is on `NaiveDate`, so no time zone or DST shift can change a
//! day count. "Today" is supplied by the caller in the deployment's calendar.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

/// The one weekday nobody is scheduled on.
pub const NON_WORKING_DAY: Weekday = Weekday::Fri;

pub fn is_working_day(date: NaiveDate) -> bool {
    date.weekday() != NON_WORKING_DAY
}

/// Count working days in `[start, end]` inclusive. An inverted range is empty.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_working_day(*day))
        .count() as i64
}

/// Resolved date bounds for one stats request.
///
/// `log_from`/`log_to` filter activity (worked hours, revenue, active crews).
/// `capacity_from`/`capacity_to` bound the working-day count that scales
/// scheduled capacity; `capacity_to` never passes today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsWindow {
    pub log_from: Option<NaiveDate>,
    pub log_to: Option<NaiveDate>,
    pub capacity_from: NaiveDate,
    pub capacity_to: NaiveDate,
    pub working_days: i64,
}

impl StatsWindow {
    /// Resolve the requested bounds against `today`.
    ///
    /// - both bounds: logs in `[start, end]`, capacity over `[start, min(end, today)]`
    /// - start only: open range, logs from `start`, capacity over `[start, today]`
    /// - end only: trailing `fallback_days` window ending at `end`
    /// - neither: logs unfiltered, capacity over the trailing window ending today
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        fallback_days: u64,
    ) -> Self {
        let trailing = |anchor: NaiveDate| {
            anchor
                .checked_sub_days(Days::new(fallback_days))
                .unwrap_or(NaiveDate::MIN)
        };

        let (log_from, log_to, capacity_from, requested_end) = match (start, end) {
            (Some(start), Some(end)) => (Some(start), Some(end), start, end),
            (Some(start), None) => (Some(start), None, start, today),
            (None, Some(end)) => {
                let from = trailing(end);
                (Some(from), Some(end), from, end)
            }
            (None, None) => (None, None, trailing(today), today),
        };

        let capacity_to = requested_end.min(today);

        Self {
            log_from,
            log_to,
            capacity_from,
            capacity_to,
            working_days: count_working_days(capacity_from, capacity_to),
        }
    }
}
