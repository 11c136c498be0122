// Settings service module
// Loads and saves config.toml

mod service;

pub use service::{SettingsService, ADVANCE_INTERVAL_ENV, DATABASE_ENV};
