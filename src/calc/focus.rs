//! Keyboard focus, tracked apart from the selection.
//!
//! The navigator owns `focused`, the date arrow keys move. Moving it does not
//! move the input cursor by itself: the shell asks [`FocusNavigator::poll_request`]
//! after each event and gets at most one [`FocusRequest`] per change, and only
//! once the target day is on screen as a day of its own month.

use crate::calc::dates::add_days;
use crate::calc::error::PickerError;
use crate::calc::month_grid::MonthView;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Up,
    Down,
    Left,
    Right,
}

impl FocusMove {
    pub fn delta_days(self) -> i64 {
        match self {
            FocusMove::Up => -7,
            FocusMove::Down => 7,
            FocusMove::Left => -1,
            FocusMove::Right => 1,
        }
    }
}

/// Ask the renderer to put input focus on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct FocusNavigator {
    focused: Option<NaiveDate>,
    request_pending: bool,
}

impl FocusNavigator {
    pub fn new() -> Self {
        FocusNavigator::default()
    }

    pub fn focused(&self) -> Option<NaiveDate> {
        self.focused
    }

    /// Shifts the focused date. A no-op when nothing is focused.
    pub fn on_key(&mut self, mv: FocusMove) -> Result<Option<NaiveDate>, PickerError> {
        let Some(current) = self.focused else {
            return Ok(None);
        };
        let next = add_days(current, mv.delta_days())?;
        self.set_focused(next);
        Ok(Some(next))
    }

    /// A day cell received input focus (pointer, tab).
    pub fn on_day_focused(&mut self, date: NaiveDate) {
        self.set_focused(date);
    }

    /// The date Enter/Space should commit.
    pub fn commit_target(&self) -> Option<NaiveDate> {
        self.focused
    }

    fn set_focused(&mut self, date: NaiveDate) {
        if self.focused != Some(date) {
            self.focused = Some(date);
            self.request_pending = true;
        }
    }

    /// Returns a focus request for the current `focused` date at most once per change.
    ///
    /// `input_focus` is the cell that currently holds input focus, if any.
    /// Nothing is requested while the date is off screen or only visible as a
    /// padding day; the change stays pending until a later call finds it visible.
    pub fn poll_request(
        &mut self,
        views: &[MonthView],
        input_focus: Option<NaiveDate>,
    ) -> Option<FocusRequest> {
        if !self.request_pending {
            return None;
        }
        let date = self.focused?;
        if input_focus == Some(date) {
            self.request_pending = false;
            return None;
        }
        if !views.iter().any(|view| view.shows_in_month(date)) {
            tracing::trace!(%date, "focus target not visible, request deferred");
            return None;
        }
        self.request_pending = false;
        tracing::debug!(%date, "focus request");
        Some(FocusRequest { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::month_grid::generate;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn march_and_april() -> Vec<MonthView> {
        vec![
            generate(d(2024, 3, 1), Weekday::Mon).unwrap(),
            generate(d(2024, 4, 1), Weekday::Mon).unwrap(),
        ]
    }

    #[test]
    fn test_key_without_focus_is_noop() {
        let mut nav = FocusNavigator::new();
        assert_eq!(nav.on_key(FocusMove::Down).unwrap(), None);
        assert_eq!(nav.focused(), None);
        assert_eq!(nav.poll_request(&march_and_april(), None), None);
    }

    #[test]
    fn test_arrow_deltas() {
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 13));
        assert_eq!(nav.on_key(FocusMove::Down).unwrap(), Some(d(2024, 3, 20)));
        assert_eq!(nav.on_key(FocusMove::Up).unwrap(), Some(d(2024, 3, 13)));
        assert_eq!(nav.on_key(FocusMove::Left).unwrap(), Some(d(2024, 3, 12)));
        assert_eq!(nav.on_key(FocusMove::Right).unwrap(), Some(d(2024, 3, 13)));
    }

    #[test]
    fn test_arrow_down_crosses_month() {
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 28));
        assert_eq!(nav.on_key(FocusMove::Down).unwrap(), Some(d(2024, 4, 4)));
        assert_eq!(nav.commit_target(), Some(d(2024, 4, 4)));
    }

    #[test]
    fn test_request_issued_once_per_change() {
        let views = march_and_april();
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 13));
        assert_eq!(nav.poll_request(&views, None), Some(FocusRequest { date: d(2024, 3, 13) }));
        // repeated renders with an unchanged date stay quiet
        assert_eq!(nav.poll_request(&views, None), None);
        assert_eq!(nav.poll_request(&views, Some(d(2024, 3, 1))), None);

        nav.on_key(FocusMove::Right).unwrap();
        assert_eq!(
            nav.poll_request(&views, Some(d(2024, 3, 13))),
            Some(FocusRequest { date: d(2024, 3, 14) })
        );
    }

    #[test]
    fn test_no_request_when_cell_already_holds_focus() {
        let views = march_and_april();
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 13));
        assert_eq!(nav.poll_request(&views, Some(d(2024, 3, 13))), None);
        assert_eq!(nav.poll_request(&views, None), None);
    }

    #[test]
    fn test_refocusing_same_date_is_not_a_change() {
        let views = march_and_april();
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 13));
        nav.poll_request(&views, None);
        nav.on_day_focused(d(2024, 3, 13));
        assert_eq!(nav.poll_request(&views, None), None);
    }

    #[test]
    fn test_padding_only_target_is_deferred() {
        // Feb 26 is only a padding day in the March grid
        let views = march_and_april();
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 4));
        nav.poll_request(&views, None);
        nav.on_key(FocusMove::Up).unwrap();
        assert_eq!(nav.focused(), Some(d(2024, 2, 26)));
        assert_eq!(nav.poll_request(&views, Some(d(2024, 3, 4))), None);

        // once February is on screen the deferred request fires
        let with_feb = vec![
            generate(d(2024, 2, 1), Weekday::Mon).unwrap(),
            generate(d(2024, 3, 1), Weekday::Mon).unwrap(),
        ];
        assert_eq!(
            nav.poll_request(&with_feb, Some(d(2024, 3, 4))),
            Some(FocusRequest { date: d(2024, 2, 26) })
        );
    }

    #[test]
    fn test_padding_in_first_pane_visible_in_second() {
        // Apr 1 is padding in March but a real day in the April pane
        let views = march_and_april();
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(d(2024, 3, 31));
        nav.poll_request(&views, None);
        nav.on_key(FocusMove::Right).unwrap();
        assert_eq!(
            nav.poll_request(&views, Some(d(2024, 3, 31))),
            Some(FocusRequest { date: d(2024, 4, 1) })
        );
    }

    #[test]
    fn test_overflow_keeps_focus() {
        let mut nav = FocusNavigator::new();
        nav.on_day_focused(NaiveDate::MAX);
        assert!(nav.on_key(FocusMove::Right).is_err());
        assert_eq!(nav.focused(), Some(NaiveDate::MAX));
    }
}
