use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toman_domain::{DayCalendar, DigitStyle, RangePreset};

use crate::ConfigError;

/// User-adjustable settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the ledger blobs. Defaults to `<base>/data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
    pub default_range: RangePreset,
    pub digits: DigitStyle,
    /// Offset from UTC used to assign transactions to calendar days.
    pub utc_offset_minutes: i32,
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: Self::default_log_filter(),
            default_range: RangePreset::default(),
            digits: DigitStyle::default(),
            utc_offset_minutes: 0,
            recent_limit: Self::DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    pub const DEFAULT_RECENT_LIMIT: usize = 5;

    pub fn default_log_filter() -> String {
        "toman_ledger=info".into()
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        base.join("data")
    }

    pub fn calendar(&self) -> Result<DayCalendar, ConfigError> {
        DayCalendar::from_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_minutes {} is outside +/-24h",
                self.utc_offset_minutes
            ))
        })
    }
}
