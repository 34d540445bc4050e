use crate::calc::dates::add_days;
use crate::calc::{CalendarDate, Range};
use crate::data::persistence::Persistable;
use crate::data::settings::SettingsWrapper;
use crate::data::SavedRange;
use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir, Local::now().date_naive())?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes config.yaml and a sample range.json into `dir`.
pub(crate) fn run_in_dir(dir: &Path, today: CalendarDate) -> Result<()> {
    SettingsWrapper::default().save_to(dir)?;
    SavedRange::new(sample_range(today)?).save_to(dir)?;
    tracing::info!(dir = %dir.display(), "initialized data directory");
    Ok(())
}

/// A short closed range ending a few days before `today`.
fn sample_range(today: CalendarDate) -> Result<Range> {
    Ok(Range::between(add_days(today, -5)?, add_days(today, -3)?))
}
