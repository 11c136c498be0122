// Settings module
// Application configuration read from config.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::harptos::HarptosDate;

pub const DEFAULT_ADVANCE_INTERVAL_MINUTES: u64 = 10;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// One year of minutes.
pub const MAX_ADVANCE_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file. `None` resolves to the platform data directory.
    pub database_path: Option<PathBuf>,
    pub advance_interval_minutes: u64,
    pub busy_timeout_ms: u64,
    pub log_level: String,
    /// Seed for the calendar when no state has been stored yet.
    pub default_date: HarptosDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            advance_interval_minutes: DEFAULT_ADVANCE_INTERVAL_MINUTES,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: "info".to_string(),
            default_date: HarptosDate {
                year: 1492,
                month: 1,
                day: 1,
            },
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.advance_interval_minutes == 0 {
            return Err("advance_interval_minutes must be at least 1".to_string());
        }
        if self.advance_interval_minutes > MAX_ADVANCE_INTERVAL_MINUTES {
            return Err(format!(
                "advance_interval_minutes must be at most {}",
                MAX_ADVANCE_INTERVAL_MINUTES
            ));
        }
        if self.busy_timeout_ms == 0 {
            return Err("busy_timeout_ms must be greater than zero".to_string());
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of {}",
                LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}
