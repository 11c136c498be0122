use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::harptos::HarptosDate;
use crate::models::settings::Settings;
use crate::services::advance::AdvanceEngine;
use crate::services::database::Database;
use crate::services::event::EventService;
use crate::services::session_notes::SessionNotesService;
use crate::services::settings::SettingsService;

/// Shared access point for the database and the services built on it.
pub struct AppContext {
    database: Database,
    database_path: PathBuf,
    settings: Settings,
}

impl AppContext {
    /// Open the configured database, creating its directory and schema.
    pub fn open(settings: Settings) -> Result<Self> {
        let database_path = SettingsService::resolve_database_path(&settings);
        if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let path_str = database_path.to_string_lossy().to_string();
        let database = Database::with_busy_timeout(
            &path_str,
            Duration::from_millis(settings.busy_timeout_ms),
        )?;
        database.initialize_schema()?;
        log::debug!("Opened database at {:?}", database_path);

        Ok(Self {
            database,
            database_path,
            settings,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn default_date(&self) -> HarptosDate {
        self.settings.default_date
    }

    pub fn advance_engine(&self) -> AdvanceEngine<'_> {
        AdvanceEngine::new(self.database.connection())
    }

    pub fn event_service(&self) -> EventService<'_> {
        EventService::new(self.database.connection())
    }

    pub fn session_notes_service(&self) -> SessionNotesService<'_> {
        SessionNotesService::new(self.database.connection())
    }
}
