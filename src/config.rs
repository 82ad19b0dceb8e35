//! Configuration loaded from TOML.
//!
//! ```toml
//! timeslots = ["8:45-9:30", "9:30-10:15", "10:15-11:00", "11:30-12:15", "12:15-13:00"]
//! week_order = "chronological"   # or "label"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{TimeslotCatalog, DEFAULT_TIMESLOTS};
use crate::views::WeekOrder;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Valid timeslot labels, in chronological order.
    pub timeslots: Vec<String>,
    /// Timeslot order of the full-week listing.
    pub week_order: WeekOrder,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timeslots: DEFAULT_TIMESLOTS.iter().map(|s| s.to_string()).collect(),
            week_order: WeekOrder::default(),
        }
    }
}

impl ScheduleConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// The validated timeslot catalog.
    pub fn catalog(&self) -> Result<TimeslotCatalog, ConfigError> {
        TimeslotCatalog::new(self.timeslots.iter().cloned())
    }
}

/// Config file looked for in the data directory when none is given.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("schedule.toml")
}
