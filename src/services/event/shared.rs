use chrono::{DateTime, Local, NaiveDateTime};
use rusqlite::{self, Result, Row};

use crate::models::event::Event;
use crate::utils::date::parse_iso_date;

pub(crate) const EVENT_COLUMNS: &str = "id, year, month, day, title, notes, real_world_date, hidden,
        created_at, updated_at";

/// Parse a stored timestamp: RFC 3339 from the service layer, or SQLite's
/// `CURRENT_TIMESTAMP` format (UTC) for rows written by column defaults.
pub(crate) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Ok(dt.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc().with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn map_event_row(row: &Row<'_>) -> Result<Event> {
    // Older rows may hold free text here; unreadable values are dropped.
    let real_world_date = row
        .get::<_, Option<String>>(6)?
        .as_deref()
        .and_then(parse_iso_date);

    Ok(Event {
        id: Some(row.get(0)?),
        year: row.get(1)?,
        month: row.get(2)?,
        day: row.get(3)?,
        title: row.get(4)?,
        notes: row.get(5)?,
        real_world_date,
        hidden: row.get::<_, i32>(7)? != 0,
        created_at: Some(to_local_datetime(row.get::<_, String>(8)?)?),
        updated_at: Some(to_local_datetime(row.get::<_, String>(9)?)?),
    })
}
