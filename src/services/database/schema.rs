use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_state_table(conn)?;
    create_events_table(conn)?;
    run_events_migrations(conn)?;
    create_events_index(conn)?;
    Ok(())
}

fn create_state_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create state table")?;

    Ok(())
}

// The CHECK mirrors harptos::is_valid_day so nothing can write an
// impossible day behind the service layer's back.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL CHECK (year >= 0),
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            day INTEGER NOT NULL CHECK (
                day BETWEEN 1 AND 30 OR (day = 31 AND month IN (1, 4, 7, 9, 11))
            ),
            title TEXT,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

fn run_events_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "real_world_date",
        "ALTER TABLE events ADD COLUMN real_world_date TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "hidden",
        "ALTER TABLE events ADD COLUMN hidden INTEGER NOT NULL DEFAULT 0",
    )?;

    Ok(())
}

fn create_events_index(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_day ON events (year, month, day)",
        [],
    )
    .context("Failed to create events day index")?;

    Ok(())
}
