//! The range selection state machine.
//!
//! The controller keeps a private *anchor* range that decides what the next
//! commit produces. The range a host draws as highlighted is a separate value
//! the host owns and feeds back in; the controller never reads its own
//! emissions back as a highlight.

use crate::calc::dates::is_within_interval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ordered pair of optional dates. When both ends are present, `start <= end`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Range {
    pub fn cleared() -> Self {
        Range::default()
    }

    pub fn open(start: NaiveDate) -> Self {
        Range {
            start: Some(start),
            end: None,
        }
    }

    /// A closed range over `a` and `b` in ascending order.
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        Range {
            start: Some(a.min(b)),
            end: Some(a.max(b)),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// False only for a closed range whose ends are out of order.
    pub fn is_well_formed(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Inclusive membership. Open and cleared ranges contain no days.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => is_within_interval(date, start, end),
            _ => false,
        }
    }

    /// `start | end`, each side in `fmt` or the word `empty`.
    pub fn display_with(&self, fmt: &str) -> String {
        [self.start, self.end]
            .iter()
            .map(|side| match side {
                Some(date) => date.format(fmt).to_string(),
                None => "empty".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
    Empty,
    Open,
    Closed,
}

/// What a single commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub anchor: Range,
    /// The range to hand to the host, or `None` when the commit only reopened the anchor.
    pub range_changed: Option<Range>,
    pub selected: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    anchor: Range,
    selected: NaiveDate,
}

impl SelectionController {
    pub fn new(initial_selected: NaiveDate) -> Self {
        SelectionController {
            anchor: Range::cleared(),
            selected: initial_selected,
        }
    }

    pub fn anchor(&self) -> Range {
        self.anchor
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn state(&self) -> AnchorState {
        if self.anchor.is_closed() {
            AnchorState::Closed
        } else if self.anchor.start.is_some() {
            AnchorState::Open
        } else {
            AnchorState::Empty
        }
    }

    /// Applies one commit.
    ///
    /// Empty opens the anchor at `date`; Open closes it over the old start and
    /// `date` in ascending order; Closed discards the range and reopens at
    /// `date` without a range notification. The selected date always moves.
    pub fn on_commit(&mut self, date: NaiveDate) -> CommitOutcome {
        let range_changed = match self.state() {
            AnchorState::Empty => {
                self.anchor = Range::open(date);
                Some(self.anchor)
            }
            AnchorState::Open => {
                let start = self.anchor.start.unwrap_or(date);
                self.anchor = Range::between(start, date);
                Some(self.anchor)
            }
            AnchorState::Closed => {
                self.anchor = Range::open(date);
                None
            }
        };
        self.selected = date;

        tracing::debug!(
            %date,
            anchor = ?self.anchor,
            notified = range_changed.is_some(),
            "commit"
        );

        CommitOutcome {
            anchor: self.anchor,
            range_changed,
            selected: date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn open_at(date: NaiveDate) -> SelectionController {
        let mut ctl = SelectionController::new(date);
        ctl.on_commit(date);
        ctl
    }

    // ── Range ────────────────────────────────────────────────────────────────

    #[test]
    fn test_range_between_sorts() {
        let r = Range::between(d(2024, 3, 10), d(2024, 3, 5));
        assert_eq!(r.start, Some(d(2024, 3, 5)));
        assert_eq!(r.end, Some(d(2024, 3, 10)));
    }

    #[test]
    fn test_range_contains_inclusive() {
        let r = Range::between(d(2024, 3, 5), d(2024, 3, 10));
        assert!(r.contains(d(2024, 3, 5)));
        assert!(r.contains(d(2024, 3, 10)));
        assert!(!r.contains(d(2024, 3, 4)));
        assert!(!r.contains(d(2024, 3, 11)));
    }

    #[test]
    fn test_open_and_cleared_ranges_contain_nothing() {
        assert!(!Range::open(d(2024, 3, 5)).contains(d(2024, 3, 5)));
        assert!(!Range::cleared().contains(d(2024, 3, 5)));
    }

    #[test]
    fn test_backwards_range_is_not_well_formed() {
        let r = Range {
            start: Some(d(2024, 3, 10)),
            end: Some(d(2024, 3, 5)),
        };
        assert!(!r.is_well_formed());
        assert!(!r.contains(d(2024, 3, 7)));
        assert!(Range::open(d(2024, 3, 10)).is_well_formed());
    }

    #[test]
    fn test_display_with_format() {
        let r = Range::between(d(2024, 3, 5), d(2024, 3, 10));
        assert_eq!(r.display_with("%d/%m/%Y"), "05/03/2024 | 10/03/2024");
        assert_eq!(Range::open(d(2024, 3, 5)).display_with("%Y-%m-%d"), "2024-03-05 | empty");
        assert_eq!(Range::cleared().display_with("%Y-%m-%d"), "empty | empty");
    }

    #[test]
    fn test_range_json_roundtrip() {
        let r = Range::open(d(2024, 3, 5));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"start":"2024-03-05","end":null}"#);
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    // ── state machine ────────────────────────────────────────────────────────

    #[test]
    fn test_new_controller_is_empty() {
        let ctl = SelectionController::new(d(2024, 3, 1));
        assert_eq!(ctl.state(), AnchorState::Empty);
        assert_eq!(ctl.selected(), d(2024, 3, 1));
    }

    #[test]
    fn test_first_commit_opens_and_notifies() {
        let mut ctl = SelectionController::new(d(2024, 3, 1));
        let out = ctl.on_commit(d(2024, 3, 10));
        assert_eq!(out.anchor, Range::open(d(2024, 3, 10)));
        assert_eq!(out.range_changed, Some(Range::open(d(2024, 3, 10))));
        assert_eq!(ctl.state(), AnchorState::Open);
    }

    #[test]
    fn test_open_commit_earlier_date_sorts() {
        let mut ctl = open_at(d(2024, 3, 10));
        let out = ctl.on_commit(d(2024, 3, 5));
        assert_eq!(out.range_changed, Some(Range::between(d(2024, 3, 5), d(2024, 3, 10))));
        assert_eq!(out.anchor.start, Some(d(2024, 3, 5)));
        assert_eq!(out.anchor.end, Some(d(2024, 3, 10)));
        assert_eq!(out.selected, d(2024, 3, 5));
    }

    #[test]
    fn test_pair_of_commits_is_order_independent() {
        let dates = [d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 1), d(2025, 12, 31)];
        for &a in &dates {
            for &b in &dates {
                let mut ctl = SelectionController::new(a);
                ctl.on_commit(a);
                let out = ctl.on_commit(b);
                let range = out.range_changed.unwrap();
                assert!(range.is_closed());
                assert!(range.start <= range.end, "{a} then {b}");
                assert_eq!(range, Range::between(b, a));
            }
        }
    }

    #[test]
    fn test_same_date_twice_is_single_day_range() {
        let mut ctl = open_at(d(2024, 3, 10));
        let out = ctl.on_commit(d(2024, 3, 10));
        assert_eq!(out.anchor, Range::between(d(2024, 3, 10), d(2024, 3, 10)));
        assert_eq!(ctl.state(), AnchorState::Closed);
    }

    #[test]
    fn test_commit_after_closed_reopens_without_range_notification() {
        let mut ctl = open_at(d(2024, 3, 10));
        ctl.on_commit(d(2024, 3, 5));
        let out = ctl.on_commit(d(2024, 3, 20));
        assert_eq!(out.anchor, Range::open(d(2024, 3, 20)));
        assert_eq!(out.range_changed, None);
        assert_eq!(out.selected, d(2024, 3, 20));
        assert_eq!(ctl.state(), AnchorState::Open);
    }

    #[test]
    fn test_fourth_commit_closes_again() {
        let mut ctl = open_at(d(2024, 3, 10));
        ctl.on_commit(d(2024, 3, 5));
        ctl.on_commit(d(2024, 3, 20));
        let out = ctl.on_commit(d(2024, 3, 15));
        assert_eq!(out.range_changed, Some(Range::between(d(2024, 3, 15), d(2024, 3, 20))));
    }

    #[test]
    fn test_every_commit_moves_selected() {
        let mut ctl = SelectionController::new(d(2024, 1, 1));
        for date in [d(2024, 3, 10), d(2024, 3, 5), d(2024, 3, 20)] {
            assert_eq!(ctl.on_commit(date).selected, date);
            assert_eq!(ctl.selected(), date);
        }
    }

    #[test]
    fn test_commit_in_another_month_is_allowed() {
        let mut ctl = open_at(d(2024, 3, 30));
        let out = ctl.on_commit(d(2024, 4, 2));
        assert_eq!(out.range_changed, Some(Range::between(d(2024, 3, 30), d(2024, 4, 2))));
    }
}
