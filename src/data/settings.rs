use crate::calc::dates::parse_week_start;
use crate::data::persistence::Persistable;
use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerSettings {
    /// First column of every month grid ("Mon", "Sun", ...).
    pub week_starts_on: String,
    /// strftime pattern for the range readout.
    pub date_format: String,
    /// When false the host stops echoing emitted ranges back as the highlight.
    pub follow_emitted_range: bool,
}

impl Default for PickerSettings {
    fn default() -> Self {
        PickerSettings {
            week_starts_on: "Mon".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            follow_emitted_range: true,
        }
    }
}

/// Reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsWrapper {
    #[serde(default)]
    pub(crate) settings: PickerSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl PickerSettings {
    pub fn load() -> Result<Self> {
        let settings = SettingsWrapper::load()?.settings;
        settings.validate()?;
        Ok(settings)
    }

    pub fn week_start(&self) -> Result<Weekday> {
        Ok(parse_week_start(&self.week_starts_on)?)
    }

    /// Rejects settings that would fail later while drawing.
    pub fn validate(&self) -> Result<()> {
        self.week_start()?;
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date_format '{}' in config.yaml", self.date_format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_values() {
        let settings = PickerSettings::default();
        assert_eq!(settings.week_starts_on, "Mon");
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert!(settings.follow_emitted_range);
        assert_eq!(settings.week_start().unwrap(), Weekday::Mon);
    }

    #[test]
    fn test_missing_settings_key_uses_default() {
        let wrapper: SettingsWrapper = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(wrapper.settings, PickerSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let yaml = "settings:\n  week_starts_on: Sun\n";
        let wrapper: SettingsWrapper = serde_norway::from_str(yaml).unwrap();
        assert_eq!(wrapper.settings.week_start().unwrap(), Weekday::Sun);
        assert_eq!(wrapper.settings.date_format, "%d/%m/%Y");
        assert!(wrapper.settings.follow_emitted_range);
    }

    #[test]
    fn test_validate_rejects_bad_week_start() {
        let settings = PickerSettings {
            week_starts_on: "Caturday".to_string(),
            ..PickerSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(format!("{err}").contains("Caturday"));
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let settings = PickerSettings {
            date_format: "%Q".to_string(),
            ..PickerSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip_through_dir() {
        let tmp = TempDir::new().unwrap();
        let wrapper = SettingsWrapper {
            settings: PickerSettings {
                week_starts_on: "Sun".to_string(),
                date_format: "%Y-%m-%d".to_string(),
                follow_emitted_range: false,
            },
        };
        wrapper.save_to(tmp.path()).unwrap();
        let loaded = SettingsWrapper::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.settings, wrapper.settings);
    }
}
