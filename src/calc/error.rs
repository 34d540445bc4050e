use chrono::NaiveDate;

/// Errors raised by the date picker core.
///
/// All of these are caller-contract violations: out-of-range date arithmetic
/// or selector input that cannot be turned into a month or year.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickerError {
    /// Shifting a date left chrono's supported range.
    #[error("date out of range: {from} shifted by {amount} {unit}")]
    DateOutOfRange {
        from: NaiveDate,
        amount: i64,
        unit: &'static str,
    },

    /// A month selector value that is not an index in 0..=11.
    #[error("invalid month index: {0:?} (must be 0..=11)")]
    InvalidMonthIndex(String),

    /// A year selector value that is not a year chrono can represent.
    #[error("invalid year: {0:?}")]
    InvalidYear(String),

    /// A week-start setting that does not name a weekday.
    #[error("invalid week start: {0:?} (expected a weekday such as Mon or Sunday)")]
    InvalidWeekStart(String),
}
