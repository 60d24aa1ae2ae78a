//! Page date resolution without I/O operations.
//!
//! This module anchors "now" to the configured timezone and turns the user's day and
//! week offsets into the dates each page is generated for: the task day, the log day
//! and the Saturday that opens the weekly page.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use std::str::FromStr;

/// Day and week offsets relative to today.
///
/// All offsets default to zero, which targets today's task and log pages and the
/// week that contains today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateOffsets {
    /// Days added to today for the task page.
    pub task_days: i64,
    /// Days added to today for the log page.
    pub log_days: i64,
    /// Weeks added to the current week for the weekly page.
    pub weeks: i64,
}

/// The dates a run generates pages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDates {
    /// Today in the configured zone.
    pub today: NaiveDate,
    pub task_date: NaiveDate,
    pub log_date: NaiveDate,
    /// Always a Saturday.
    pub week_start: NaiveDate,
}

/// Parses an IANA timezone name (`UTC` and `Z` are accepted case-insensitively).
///
/// # Examples
///
/// ```
/// use bitacora::dates::parse_timezone;
///
/// assert_eq!(parse_timezone("utc").unwrap(), chrono_tz::UTC);
/// assert!(parse_timezone("Mars/Olympus").is_err());
/// ```
pub fn parse_timezone(raw: &str) -> AppResult<Tz> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(chrono_tz::UTC);
    }
    Tz::from_str(trimmed).map_err(|_| AppError::Config(format!("Unknown timezone '{}'", trimmed)))
}

/// Returns the current instant in `tz`.
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Resolves the page dates for a run.
///
/// # Examples
///
/// ```
/// use bitacora::dates::{resolve, DateOffsets};
/// use chrono::{NaiveDate, TimeZone};
///
/// let now = chrono_tz::America::Bogota
///     .with_ymd_and_hms(2024, 4, 15, 7, 30, 0)
///     .unwrap();
/// let offsets = DateOffsets { task_days: 1, log_days: -1, weeks: 0 };
/// let dates = resolve(now, offsets);
///
/// assert_eq!(dates.task_date, NaiveDate::from_ymd_opt(2024, 4, 16).unwrap());
/// assert_eq!(dates.log_date, NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
/// assert_eq!(dates.week_start, NaiveDate::from_ymd_opt(2024, 4, 13).unwrap());
/// ```
pub fn resolve(now: DateTime<Tz>, offsets: DateOffsets) -> PageDates {
    let today = now.date_naive();
    PageDates {
        today,
        task_date: today + Duration::days(offsets.task_days),
        log_date: today + Duration::days(offsets.log_days),
        week_start: week_start(today, offsets.weeks),
    }
}

/// Whether `date` falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Computes the Saturday that opens the weekly page.
///
/// Takes the Saturday of `today`'s Monday-based week. On a weekend that Saturday is
/// already behind us and the offset applies as is; on a weekday it is still ahead, so
/// one week is subtracted to land on the Saturday that opened the current planner week.
pub fn week_start(today: NaiveDate, week_offset: i64) -> NaiveDate {
    let days_from_monday = i64::from(today.weekday().num_days_from_monday());
    let saturday = today - Duration::days(days_from_monday) + Duration::days(5);

    let weeks = if is_weekend(today) {
        week_offset
    } else {
        week_offset - 1
    };

    saturday + Duration::weeks(weeks)
}
