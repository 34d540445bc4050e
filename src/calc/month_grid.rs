use crate::calc::dates::{
    add_days, days_between_inclusive, end_of_month, end_of_week, is_same_day, is_same_month,
    is_weekend, start_of_month, start_of_week,
};
use crate::calc::error::PickerError;
use crate::calc::selection::Range;
use chrono::{Datelike, NaiveDate, Weekday};

/// One rendered day. Recomputed on every draw, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    /// Padding day from the previous or next month.
    pub is_outside_displayed_month: bool,
    pub is_weekend: bool,
    pub is_selected: bool,
    pub is_in_highlight_range: bool,
}

impl DayCell {
    /// Day-of-month label.
    pub fn label(&self) -> String {
        self.date.day().to_string()
    }
}

/// What a grid needs from the outside to flag its cells.
#[derive(Debug, Clone, Copy)]
pub struct CellContext {
    pub today: NaiveDate,
    pub selected: Option<NaiveDate>,
    /// Host-controlled range; never the selection anchor.
    pub highlight: Range,
}

/// The week-aligned run of days shown for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    first_of_month: NaiveDate,
    week_start: Weekday,
    days: Vec<NaiveDate>,
}

/// Builds the grid for the month containing `reference`.
///
/// The grid starts on `week_start` of the week holding the 1st and ends on
/// the last day of the week holding the month's last day, so its length is
/// always 28, 35 or 42.
pub fn generate(reference: NaiveDate, week_start: Weekday) -> Result<MonthView, PickerError> {
    let first_of_month = start_of_month(reference);
    let grid_start = start_of_week(first_of_month, week_start)?;
    let grid_end = end_of_week(end_of_month(reference), week_start)?;
    let total_days = days_between_inclusive(grid_start, grid_end);

    let days = (0..total_days)
        .map(|offset| add_days(grid_start, offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MonthView {
        first_of_month,
        week_start,
        days,
    })
}

impl MonthView {
    pub fn first_of_month(&self) -> NaiveDate {
        self.first_of_month
    }

    pub fn year(&self) -> i32 {
        self.first_of_month.year()
    }

    pub fn month(&self) -> u32 {
        self.first_of_month.month()
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.days.chunks(7)
    }

    pub fn is_padding(&self, date: NaiveDate) -> bool {
        !is_same_month(date, self.first_of_month)
    }

    /// True when `date` is drawn in this grid as a day of the displayed month.
    pub fn shows_in_month(&self, date: NaiveDate) -> bool {
        is_same_month(date, self.first_of_month)
    }

    pub fn cell(&self, date: NaiveDate, ctx: &CellContext) -> DayCell {
        DayCell {
            date,
            is_today: is_same_day(date, ctx.today),
            is_outside_displayed_month: self.is_padding(date),
            is_weekend: is_weekend(date),
            is_selected: ctx.selected.is_some_and(|s| is_same_day(s, date)),
            is_in_highlight_range: ctx.highlight.contains(date),
        }
    }

    pub fn cells(&self, ctx: &CellContext) -> Vec<DayCell> {
        self.days.iter().map(|&date| self.cell(date, ctx)).collect()
    }
}
