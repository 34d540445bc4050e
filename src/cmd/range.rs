use crate::calc::dates::days_between_inclusive;
use crate::calc::Range;
use crate::data::{Persistable, PickerSettings, SavedRange};
use anyhow::Result;
use std::io::{self, Write};

pub fn run(clear: bool) -> Result<()> {
    let settings = PickerSettings::load()?;
    let mut saved = SavedRange::load()?;
    if clear {
        saved.clear();
        saved.save()?;
        tracing::info!("saved range cleared");
    }
    write_range(&saved.range, &settings.date_format, &mut io::stdout().lock())
}

pub(crate) fn write_range(range: &Range, date_format: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Range: {}", range.display_with(date_format))?;
    if let (Some(start), Some(end)) = (range.start, range.end) {
        writeln!(out, "Days:  {}", days_between_inclusive(start, end))?;
    }
    Ok(())
}
