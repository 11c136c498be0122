use super::shared::{map_event_row, EVENT_COLUMNS};
use super::EventService;
use crate::error::CalendarError;
use crate::models::event::Event;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{self, params};

fn format_real_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

impl<'a> EventService<'a> {
    /// Create a new event, rejecting days that are not on the calendar.
    pub fn create(&self, event: Event) -> Result<Event> {
        event.validate()?;
        self.insert(event)
    }

    /// Create a new event, clamping an impossible day instead of failing.
    ///
    /// Used for bulk import so one bad record does not sink the batch.
    pub fn create_normalized(&self, event: Event) -> Result<Event> {
        let normalized = event.normalized();
        if normalized != event {
            log::warn!(
                "Clamped imported event day {}-{}-{} to {}",
                event.year,
                event.month,
                event.day,
                normalized.date()
            );
        }
        self.insert(normalized)
    }

    fn insert(&self, mut event: Event) -> Result<Event> {
        let now = Local::now();
        let now_str = now.to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO events (
                    year, month, day, title, notes, real_world_date, hidden,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event.year,
                    event.month,
                    event.day,
                    event.title,
                    event.notes,
                    format_real_date(event.real_world_date),
                    event.hidden as i32,
                    &now_str,
                    &now_str,
                ],
            )
            .context("Failed to insert event")?;

        event.id = Some(self.conn.last_insert_rowid());
        event.created_at = Some(now);
        event.updated_at = Some(now);

        Ok(event)
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the editable fields of an event.
    ///
    /// The Harptos day is fixed at creation; to move an event, delete it and
    /// create a new one.
    pub fn update(&self, event: &Event) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| anyhow::anyhow!("Event ID is required for update"))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE events SET
                    title = ?, notes = ?, real_world_date = ?, hidden = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    event.title,
                    event.notes,
                    format_real_date(event.real_world_date),
                    event.hidden as i32,
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(CalendarError::EventNotFound(id).into());
        }

        Ok(())
    }

    /// Soft-delete (or restore) an event.
    pub fn set_hidden(&self, id: i64, hidden: bool) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE events SET hidden = ?, updated_at = ? WHERE id = ?",
                params![hidden as i32, Local::now().to_rfc3339(), id],
            )
            .context("Failed to change event visibility")?;

        if rows_affected == 0 {
            return Err(CalendarError::EventNotFound(id).into());
        }

        Ok(())
    }

    /// Delete an event by ID.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(CalendarError::EventNotFound(id).into());
        }

        Ok(())
    }
}
