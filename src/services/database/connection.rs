use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;
use crate::models::settings::DEFAULT_BUSY_TIMEOUT_MS;

/// Thin wrapper around the application's SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the provided path with the
    /// default busy timeout.
    pub fn new(path: &str) -> Result<Self> {
        Self::with_busy_timeout(path, Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
    }

    /// Like [`Database::new`], but with an explicit wait for the write lock.
    ///
    /// Concurrent advances on other connections block for up to
    /// `busy_timeout` before the call fails as storage unavailable.
    pub fn with_busy_timeout(path: &str, busy_timeout: Duration) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        conn.busy_timeout(busy_timeout)
            .context("Failed to set busy timeout")?;

        Ok(Self { conn })
    }

    /// Provides read/write access to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates tables and runs migrations.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}
