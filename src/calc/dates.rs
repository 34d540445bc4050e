//! Calendar arithmetic the picker is built on.
//!
//! Every comparison here is by calendar day. Month and year shifts clamp the
//! day-of-month to the length of the target month (Jan 31 + 1 month is the
//! last day of February).

use crate::calc::error::PickerError;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// A day on the calendar, with no time-of-day or zone attached.
pub type CalendarDate = NaiveDate;

pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, PickerError> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(PickerError::DateOutOfRange {
            from: date,
            amount: days,
            unit: "days",
        })
}

pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, PickerError> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or(PickerError::DateOutOfRange {
        from: date,
        amount: months as i64,
        unit: "months",
    })
}

pub fn add_years(date: NaiveDate, years: i32) -> Result<NaiveDate, PickerError> {
    let months = years.checked_mul(12).ok_or(PickerError::DateOutOfRange {
        from: date,
        amount: years as i64,
        unit: "years",
    })?;
    add_months(date, months).map_err(|_| PickerError::DateOutOfRange {
        from: date,
        amount: years as i64,
        unit: "years",
    })
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

/// Number of days from `week_start` forward to `date`'s weekday (0..=6).
fn days_into_week(date: NaiveDate, week_start: Weekday) -> i64 {
    let offset =
        date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday();
    (offset % 7) as i64
}

/// The first day of the week containing `date`, for weeks beginning on `week_start`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> Result<NaiveDate, PickerError> {
    add_days(date, -days_into_week(date, week_start))
}

/// The last day of the week containing `date`, for weeks beginning on `week_start`.
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> Result<NaiveDate, PickerError> {
    add_days(date, 6 - days_into_week(date, week_start))
}

/// Inclusive count of calendar days from `start` to `end`.
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// True for Saturday and Sunday, regardless of the configured week start.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Inclusive interval test. An interval whose start is after its end contains nothing.
pub fn is_within_interval(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Replaces the month (0-based index) keeping year and day, clamping the day
/// to the target month's length.
pub fn set_month(date: NaiveDate, month_index: u32) -> Result<NaiveDate, PickerError> {
    if month_index > 11 {
        return Err(PickerError::InvalidMonthIndex(month_index.to_string()));
    }
    let month = month_index + 1;
    let day = date.day().min(days_in_month(date.year(), month));
    NaiveDate::from_ymd_opt(date.year(), month, day)
        .ok_or_else(|| PickerError::InvalidMonthIndex(month_index.to_string()))
}

/// Replaces the year keeping month and day; Feb 29 lands on Feb 28 in a common year.
pub fn set_year(date: NaiveDate, year: i32) -> Result<NaiveDate, PickerError> {
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
        .ok_or_else(|| PickerError::InvalidYear(year.to_string()))
}

/// Parses a weekday name ("Mon", "monday", "Sun", ...) used as the first column of the grid.
pub fn parse_week_start(raw: &str) -> Result<Weekday, PickerError> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| PickerError::InvalidWeekStart(raw.to_string()))
}

/// Two-letter column headers starting from `week_start`.
pub fn weekday_headers(week_start: Weekday) -> [&'static str; 7] {
    let mut headers = [""; 7];
    let mut day = week_start;
    for slot in headers.iter_mut() {
        *slot = match day {
            Weekday::Mon => "Mo",
            Weekday::Tue => "Tu",
            Weekday::Wed => "We",
            Weekday::Thu => "Th",
            Weekday::Fri => "Fr",
            Weekday::Sat => "Sa",
            Weekday::Sun => "Su",
        };
        day = day.succ();
    }
    headers
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Three-letter month label ("Jan", "Feb", ...).
pub(crate) fn short_month_name(month: u32) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}
