//! Date parsing and the clock used to resolve year-less dates

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of "now"
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Pin the clock to the last second of a `YYYY-MM-DD` day
    pub fn end_of_day(date: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        date.and_hms_opt(23, 59, 59).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const MONTH_NAME_FORMATS: [&str; 2] = ["%B %d, %Y", "%b %d, %Y"];

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Parse an ISO-8601 date or datetime
///
/// Offsets are dropped and the wall-clock time kept; a trailing `Z` is
/// tolerated. A bare date is midnight of that day.
pub fn parse_iso(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    let raw = raw.strip_suffix('Z').unwrap_or(raw);
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(midnight)
        })
}

/// Parse `March 5, 2024` or `Mar 5, 2024` as midnight of that day
pub fn parse_month_day_year(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    MONTH_NAME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(midnight)
}

/// ISO first, then month-name forms
pub fn parse_loose_date(raw: &str) -> Option<NaiveDateTime> {
    parse_iso(raw).or_else(|| parse_month_day_year(raw))
}

/// Parse `Mar 5` in the year of `now`, or the year before if that lands in
/// the future
pub fn parse_month_day(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let in_year = |year: i32| {
        NaiveDate::parse_from_str(&format!("{raw} {year}"), "%b %d %Y")
            .ok()
            .map(midnight)
    };

    match in_year(now.year()) {
        Some(date) if date <= now => Some(date),
        _ => in_year(now.year() - 1),
    }
}
