//! Dashboard configuration.
//!
//! Configuration is read from a YAML file. Every key is optional; missing
//! keys take the defaults below and unknown keys are rejected.
//!
//! ```yaml
//! workbook: Seasonal_Ridership_by_Station.xlsx
//! title: MTA Ridership Analysis Dashboard
//! timeout_secs: 30
//! load_policy: all_or_nothing
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default workbook source key.
pub const DEFAULT_WORKBOOK: &str = "Seasonal_Ridership_by_Station.xlsx";
/// Default dashboard heading.
pub const DEFAULT_TITLE: &str = "MTA Ridership Analysis Dashboard";
/// Default read timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// How a load treats a sheet that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Any failing sheet fails the whole load.
    #[default]
    AllOrNothing,
    /// Failing sheets are skipped and recorded on the table set.
    PerSheet,
}

/// Settings for one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Source key of the workbook to load.
    pub workbook: String,
    /// Heading shown above the tabs.
    pub title: String,
    /// Read timeout in seconds; `0` disables the guard.
    pub timeout_secs: u64,
    pub load_policy: LoadPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: DEFAULT_WORKBOOK.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            load_policy: LoadPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read configuration from a YAML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// The read timeout, or `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
