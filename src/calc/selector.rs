//! Month and year pickers. Choosing an option only produces a new reference
//! date; selection and focus are untouched.

use crate::calc::dates::{set_month, set_year, short_month_name};
use crate::calc::error::PickerError;
use chrono::{Datelike, NaiveDate};

/// Years offered before the reference year.
pub const YEARS_BEFORE: i32 = 4;
/// Total years offered.
pub const YEAR_WINDOW: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    /// 0-based month index.
    pub index: u32,
    pub label: &'static str,
}

/// The twelve months in calendar order.
pub fn month_options() -> Vec<MonthOption> {
    (0..12)
        .map(|index| MonthOption {
            index,
            label: short_month_name(index + 1),
        })
        .collect()
}

/// Reference year minus four through reference year plus five.
pub fn year_options(reference: NaiveDate) -> Vec<i32> {
    let from = reference.year() - YEARS_BEFORE;
    (from..from + YEAR_WINDOW).collect()
}

pub fn select_month(month_index: u32, reference: NaiveDate) -> Result<NaiveDate, PickerError> {
    set_month(reference, month_index)
}

pub fn select_year(year: i32, reference: NaiveDate) -> Result<NaiveDate, PickerError> {
    set_year(reference, year)
}

/// Parses a raw month selector value. Anything but an integer in 0..=11 is rejected.
pub fn parse_month_index(raw: &str) -> Result<u32, PickerError> {
    match raw.trim().parse::<u32>() {
        Ok(index) if index <= 11 => Ok(index),
        _ => Err(PickerError::InvalidMonthIndex(raw.to_string())),
    }
}

pub fn parse_year(raw: &str) -> Result<i32, PickerError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| PickerError::InvalidYear(raw.to_string()))
}

/// Applies a raw month value, leaving `reference` alone when it is rejected.
pub fn apply_month_input(raw: &str, reference: NaiveDate) -> Result<NaiveDate, PickerError> {
    select_month(parse_month_index(raw)?, reference)
}

/// Applies a raw year value, leaving `reference` alone when it is rejected.
pub fn apply_year_input(raw: &str, reference: NaiveDate) -> Result<NaiveDate, PickerError> {
    select_year(parse_year(raw)?, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_options_in_calendar_order() {
        let options = month_options();
        assert_eq!(options.len(), 12);
        assert_eq!(options[0], MonthOption { index: 0, label: "Jan" });
        assert_eq!(options[11], MonthOption { index: 11, label: "Dec" });
    }

    #[test]
    fn test_year_window() {
        let years = year_options(d(2024, 4, 15));
        assert_eq!(years.len(), 10);
        assert_eq!(years.first(), Some(&2020));
        assert_eq!(years.last(), Some(&2029));
    }

    #[test]
    fn test_select_february_from_april_15() {
        assert_eq!(select_month(1, d(2024, 4, 15)).unwrap(), d(2024, 2, 15));
    }

    #[test]
    fn test_select_february_from_day_31_clamps() {
        assert_eq!(select_month(1, d(2024, 1, 31)).unwrap(), d(2024, 2, 29));
        assert_eq!(select_month(1, d(2023, 8, 31)).unwrap(), d(2023, 2, 28));
    }

    #[test]
    fn test_select_year_keeps_month_and_day() {
        assert_eq!(select_year(2027, d(2024, 4, 15)).unwrap(), d(2027, 4, 15));
        assert_eq!(select_year(2025, d(2024, 2, 29)).unwrap(), d(2025, 2, 28));
    }

    #[test]
    fn test_parse_month_index_rejects_non_numeric() {
        assert_eq!(parse_month_index("3").unwrap(), 3);
        assert_eq!(parse_month_index(" 11 ").unwrap(), 11);
        assert!(parse_month_index("12").is_err());
        assert!(parse_month_index("-1").is_err());
        assert_eq!(
            parse_month_index("march").unwrap_err(),
            PickerError::InvalidMonthIndex("march".to_string())
        );
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2031").unwrap(), 2031);
        assert!(matches!(parse_year("20x1"), Err(PickerError::InvalidYear(_))));
    }

    #[test]
    fn test_apply_inputs() {
        let reference = d(2024, 3, 31);
        assert_eq!(apply_month_input("3", reference).unwrap(), d(2024, 4, 30));
        assert_eq!(apply_year_input("2021", reference).unwrap(), d(2021, 3, 31));
        assert!(apply_month_input("", reference).is_err());
    }
}
