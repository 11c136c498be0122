use super::shared::{map_event_row, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::Event;
use anyhow::Result;
use rusqlite::{self, params};

impl<'a> EventService<'a> {
    /// Visible events on one Harptos day, oldest first.
    pub fn list(&self, year: u32, month: u32, day: u32) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE year = ?1 AND month = ?2 AND day = ?3 AND hidden = 0
             ORDER BY id ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map(params![year, month, day], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Visible events in one month, in calendar order.
    pub fn list_for_month(&self, year: u32, month: u32) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE year = ?1 AND month = ?2 AND hidden = 0
             ORDER BY day ASC, id ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map(params![year, month], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Every event in calendar order.
    pub fn list_all(&self, include_hidden: bool) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE hidden = 0 OR ?1
             ORDER BY year ASC, month ASC, day ASC, id ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([include_hidden], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Search visible events by title or notes.
    pub fn search(&self, query: &str) -> Result<Vec<Event>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let search_pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE hidden = 0
               AND (LOWER(COALESCE(title, '')) LIKE ?1 ESCAPE '\\'
                    OR LOWER(COALESCE(notes, '')) LIKE ?1 ESCAPE '\\')
             ORDER BY year ASC, month ASC, day ASC, id ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([&search_pattern], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }
}

/// Make `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
