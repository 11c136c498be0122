use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "harptos.db";

/// Overrides `database_path`.
pub const DATABASE_ENV: &str = "HARPTOS_DB";
/// Overrides `advance_interval_minutes`.
pub const ADVANCE_INTERVAL_ENV: &str = "HARPTOS_ADVANCE_INTERVAL";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "KenBoyle", "HarptosAlmanac")
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for `<config dir>/config.toml`, falling back to the working
    /// directory when the platform has no home directory.
    pub fn from_default_location() -> Self {
        let path = project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, applying environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = if self.path.exists() {
            let content = fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read settings from {:?}", self.path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings in {:?}", self.path))?
        } else {
            log::debug!("No settings file at {:?}, using defaults", self.path);
            Settings::default()
        };

        apply_env_overrides(&mut settings)?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    /// Write settings to disk, creating the directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.save(&Settings::default())
    }

    /// Database file for `settings`, defaulting to the platform data dir.
    pub fn resolve_database_path(settings: &Settings) -> PathBuf {
        if let Some(path) = &settings.database_path {
            return path.clone();
        }

        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
            None => PathBuf::from(DATABASE_FILE_NAME),
        }
    }
}

fn apply_env_overrides(settings: &mut Settings) -> Result<()> {
    if let Ok(path) = env::var(DATABASE_ENV) {
        if !path.trim().is_empty() {
            settings.database_path = Some(PathBuf::from(path.trim()));
        }
    }

    if let Ok(value) = env::var(ADVANCE_INTERVAL_ENV) {
        settings.advance_interval_minutes = value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of minutes", ADVANCE_INTERVAL_ENV))?;
    }

    Ok(())
}
