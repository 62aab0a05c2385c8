//! Calendar helpers for release scheduling.
//!
//! All dates are calendar dates in the operator's local time zone. Nothing
//! here reads the clock; callers pass "today" in.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Render `YYYY-MM-DD` from the value's own calendar fields.
///
/// For a `DateTime<Local>` these are the local fields, not UTC.
pub fn format_iso_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// The next Tuesday strictly after `date`; a Tuesday maps to the following week.
///
/// `None` past the last representable date.
pub fn next_tuesday(date: NaiveDate) -> Option<NaiveDate> {
    let weekday = date.weekday().num_days_from_sunday();
    let offset = match (9 - weekday) % 7 {
        0 => 7,
        days => days,
    };
    date.checked_add_days(Days::new(u64::from(offset)))
}

/// Parse a stored date string into a local calendar date.
///
/// Bare dates are local calendar dates. Offset timestamps are converted to
/// local time before the time of day is dropped.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|stamp| stamp.date())
}

/// Drop any time of day and re-render as `YYYY-MM-DD`.
///
/// Input that does not parse as a date is returned unchanged, which keeps the
/// function idempotent for every input.
pub fn normalize_to_local_midnight(value: &str) -> String {
    match parse_local_date(value) {
        Some(date) => format_iso_date(&date),
        None => value.to_string(),
    }
}

/// `date` shifted forward by `days` calendar days, or `None` on overflow.
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}
