use crate::calc::dates::{month_name, parse_week_start, weekday_headers};
use crate::calc::{generate, CalendarDate, MonthView};
use crate::data::PickerSettings;
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::io::{self, Write};

pub fn run(month: Option<&str>, week_start: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let week_start = match week_start {
        Some(raw) => parse_week_start(raw)?,
        None => PickerSettings::load()?.week_start()?,
    };
    let reference = match month {
        Some(raw) => parse_month_arg(raw)?,
        None => today,
    };
    let view = generate(reference, week_start)?;
    write_grid(&view, today, &mut io::stdout().lock())
}

/// Parses `YYYY-MM` into the first day of that month.
pub(crate) fn parse_month_arg(raw: &str) -> Result<CalendarDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{raw}', expected YYYY-MM"))
}

/// Prints one month: in-month days as ` dd `, padding as `(dd)`, today as `[dd]`.
pub(crate) fn write_grid(
    view: &MonthView,
    today: CalendarDate,
    out: &mut impl Write,
) -> Result<()> {
    let title = format!("{} {}", month_name(view.month()), view.year());
    writeln!(out, "{title:^28}")?;
    let header: String = weekday_headers(view.week_start())
        .iter()
        .map(|h| format!(" {h} "))
        .collect();
    writeln!(out, "{header}")?;
    for week in view.weeks() {
        let row: String = week
            .iter()
            .map(|&date| {
                let day = date.day();
                if date == today {
                    format!("[{day:>2}]")
                } else if view.is_padding(date) {
                    format!("({day:>2})")
                } else {
                    format!(" {day:>2} ")
                }
            })
            .collect();
        writeln!(out, "{}", row.trim_end())?;
    }
    Ok(())
}
