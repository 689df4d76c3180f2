use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PipelineError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "SWIPE_REPORT_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Defaults for the caller-side row filters
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub remove_weekends: bool,
    pub remove_holidays: bool,
    pub holiday_start: NaiveDate,
    pub holiday_end: NaiveDate,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            remove_weekends: true,
            remove_holidays: true,
            // Sat 17 Dec 2022 - Fri 06 Jan 2023
            holiday_start: NaiveDate::from_ymd_opt(2022, 12, 17).unwrap_or_default(),
            holiday_end: NaiveDate::from_ymd_opt(2023, 1, 6).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of daily counts in the trailing rolling mean, current day included
    pub rolling_window: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { rolling_window: 6 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "swipe_report.log".to_string(),
            default_filter: "swipe_report=info,warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Load a config file that must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.filters.holiday_start > self.filters.holiday_end {
            return Err(PipelineError::Config(format!(
                "holiday_start {} is after holiday_end {}",
                self.filters.holiday_start, self.filters.holiday_end
            )));
        }
        if self.report.rolling_window == 0 {
            return Err(PipelineError::Config("rolling_window must be at least 1".to_string()));
        }
        Ok(())
    }
}
