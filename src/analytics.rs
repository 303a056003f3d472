//! Step-count aggregation engine
//!
//! Pure computation over a date-ordered series of daily step counts: totals,
//! rounded means, most/least active day, and weekday-grouped averages. All
//! functions here are deterministic and never touch the network or the clock,
//! with the single exception of [`recent_window`], which anchors a relative
//! window at the current UTC date.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Window length used when a caller omits the day count or supplies a
/// non-positive one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// One day of step data as produced by the step store.
///
/// Records are immutable once read; ascending date order is the store's
/// contract and is assumed, not enforced, by [`summarize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStepRecord {
    /// Calendar date of the measurement
    pub date: NaiveDate,
    /// Steps counted on that date
    pub step_count: u64,
}

/// A `{date, steps}` pair as it appears on the wire.
///
/// The default value (empty date, zero steps) is the documented placeholder
/// for extrema over an empty range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStat {
    /// ISO 8601 date, or empty for the placeholder
    pub date: String,
    /// Steps on that date
    pub steps: u64,
}

impl DayStat {
    fn from_record(record: &DailyStepRecord) -> Self {
        DayStat {
            date: record.date.to_string(),
            steps: record.step_count,
        }
    }
}

/// Aggregated statistics over a date-bounded series of daily step counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    /// Sum of all step counts in the range
    pub total_steps: u64,
    /// Rounded mean steps per recorded day, 0 for an empty range
    pub average_steps: u64,
    /// Day with the highest count; earliest such day wins ties
    pub most_active_day: DayStat,
    /// Day with the lowest count; earliest such day wins ties
    pub least_active_day: DayStat,
    /// Rounded mean step count per weekday name; absent weekdays are absent
    pub weekly_pattern: BTreeMap<String, u64>,
    /// The full input series in original order
    pub daily_data: Vec<DayStat>,
}

impl StepSummary {
    /// The summary of an empty range: zeros everywhere, placeholder extrema.
    pub fn empty() -> Self {
        StepSummary {
            total_steps: 0,
            average_steps: 0,
            most_active_day: DayStat::default(),
            least_active_day: DayStat::default(),
            weekly_pattern: BTreeMap::new(),
            daily_data: Vec::new(),
        }
    }
}

/// Aggregate a series of daily records into a [`StepSummary`].
///
/// Extremum ties resolve through stable sorts: descending by count for the
/// most active day, ascending for the least, first element of each order
/// wins. Among equal counts the record earliest in input order is selected.
pub fn summarize(records: &[DailyStepRecord]) -> StepSummary {
    if records.is_empty() {
        return StepSummary::empty();
    }

    let total_steps: u64 = records.iter().map(|r| r.step_count).sum();
    let average_steps = rounded_mean(total_steps, records.len() as u64);

    let mut by_count: Vec<&DailyStepRecord> = records.iter().collect();
    by_count.sort_by(|a, b| b.step_count.cmp(&a.step_count));
    let most_active_day = by_count
        .first()
        .map(|r| DayStat::from_record(r))
        .unwrap_or_default();

    by_count.sort_by(|a, b| a.step_count.cmp(&b.step_count));
    let least_active_day = by_count
        .first()
        .map(|r| DayStat::from_record(r))
        .unwrap_or_default();

    let mut weekday_totals: BTreeMap<&'static str, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = weekday_totals
            .entry(weekday_name(record.date.weekday()))
            .or_insert((0, 0));
        entry.0 += record.step_count;
        entry.1 += 1;
    }
    let weekly_pattern = weekday_totals
        .into_iter()
        .map(|(day, (total, count))| (day.to_string(), rounded_mean(total, count)))
        .collect();

    StepSummary {
        total_steps,
        average_steps,
        most_active_day,
        least_active_day,
        weekly_pattern,
        daily_data: records.iter().map(DayStat::from_record).collect(),
    }
}

/// Normalize a requested window length: missing or non-positive values fall
/// back to [`DEFAULT_WINDOW_DAYS`].
pub fn normalized_window_days(requested: Option<i64>) -> i64 {
    match requested {
        Some(days) if days > 0 => days,
        _ => DEFAULT_WINDOW_DAYS,
    }
}

/// Date range ending at the current UTC date and reaching `days` back.
///
/// Non-positive values are normalized first. Windows larger than the calendar
/// clamp to the earliest representable date.
pub fn recent_window(days: i64) -> (NaiveDate, NaiveDate) {
    let days = normalized_window_days(Some(days));
    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MIN);
    (start, end)
}

/// Fixed English weekday names, independent of host locale and timezone.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn rounded_mean(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}
