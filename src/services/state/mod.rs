//! Key/value state store.
//!
//! Holds the calendar singletons (`current_date`, `last_checked`) as JSON
//! documents in the `state` table. Writes are upserts; `updated_at` is
//! assigned by the database.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CalendarError;
use crate::models::harptos::HarptosDate;
use crate::models::state::{CalendarState, CURRENT_DATE_KEY, LAST_CHECKED_KEY};
use crate::utils::date::parse_iso_date;

/// Typed access to the `state` table.
pub struct StateService<'a> {
    conn: &'a Connection,
}

impl<'a> StateService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Raw stored value for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>, CalendarError> {
        let value = self
            .conn
            .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Insert or replace the value for `key`.
    pub fn upsert(&self, key: &str, value: &str) -> Result<(), CalendarError> {
        self.conn.execute(
            "INSERT INTO state (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn upsert_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CalendarError> {
        let json = serde_json::to_string(value)
            .map_err(|e| CalendarError::corrupt_state(key, e.to_string()))?;
        self.upsert(key, &json)
    }

    /// Decoded value for `key`, or `default` when missing or unreadable.
    pub fn get_value_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, CalendarError> {
        let Some(raw) = self.get(key)? else {
            return Ok(default);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::warn!("Ignoring unreadable state '{}': {}", key, err);
                Ok(default)
            }
        }
    }

    /// Database timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, CalendarError> {
        let value = self
            .conn
            .query_row("SELECT updated_at FROM state WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Stored Harptos date, clamped onto the calendar.
    ///
    /// Returns [`CalendarError::CorruptState`] if the value is not a date
    /// document at all.
    pub fn current_date(&self) -> Result<Option<HarptosDate>, CalendarError> {
        let Some(raw) = self.get(CURRENT_DATE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str::<HarptosDate>(&raw)
            .map(Some)
            .map_err(|e| CalendarError::corrupt_state(CURRENT_DATE_KEY, e.to_string()))
    }

    /// Stored real-world marker of the last advance.
    ///
    /// Accepts a JSON string (`"2025-03-14"`) or a bare ISO date.
    pub fn last_checked(&self) -> Result<Option<NaiveDate>, CalendarError> {
        let Some(raw) = self.get(LAST_CHECKED_KEY)? else {
            return Ok(None);
        };
        let text = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        parse_iso_date(&text)
            .map(Some)
            .ok_or_else(|| CalendarError::corrupt_state(LAST_CHECKED_KEY, format!("not an ISO date: {}", text)))
    }

    /// Write both calendar records.
    ///
    /// Not atomic on its own; callers hold the advance transaction.
    pub fn write_calendar_state(&self, state: &CalendarState) -> Result<(), CalendarError> {
        self.upsert_json(CURRENT_DATE_KEY, &state.current_date)?;
        self.upsert_json(
            LAST_CHECKED_KEY,
            &state.last_checked.format("%Y-%m-%d").to_string(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    #[test]
    fn test_get_missing_key() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        assert!(service.get("nothing").unwrap().is_none());
        assert!(service.current_date().unwrap().is_none());
        assert!(service.last_checked().unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_value() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        service.upsert("k", "\"first\"").unwrap();
        service.upsert("k", "\"second\"").unwrap();

        assert_eq!(service.get("k").unwrap(), Some("\"second\"".to_string()));
        assert!(service.updated_at("k").unwrap().is_some());

        let rows: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM state WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_get_value_or_falls_back() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        assert_eq!(service.get_value_or("count", 7u32).unwrap(), 7);
        service.upsert("count", "not json").unwrap();
        assert_eq!(service.get_value_or("count", 7u32).unwrap(), 7);
        service.upsert_json("count", &3u32).unwrap();
        assert_eq!(service.get_value_or("count", 7u32).unwrap(), 3);
    }

    #[test]
    fn test_calendar_state_round_trip() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        let state = CalendarState::new(
            HarptosDate::new(1492, 7, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        service.write_calendar_state(&state).unwrap();

        assert_eq!(service.current_date().unwrap(), Some(state.current_date));
        assert_eq!(service.last_checked().unwrap(), Some(state.last_checked));
        assert_eq!(
            service.get(LAST_CHECKED_KEY).unwrap(),
            Some("\"2025-06-01\"".to_string())
        );
    }

    #[test]
    fn test_stored_invalid_day_is_clamped() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        service
            .upsert(CURRENT_DATE_KEY, r#"{"year":1492,"month":2,"day":31}"#)
            .unwrap();
        let date = service.current_date().unwrap().unwrap();
        assert_eq!((date.month, date.day), (2, 30));
    }

    #[test]
    fn test_corrupt_values_reported() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        service.upsert(CURRENT_DATE_KEY, "garbage").unwrap();
        service.upsert(LAST_CHECKED_KEY, "\"yesterday\"").unwrap();

        assert!(matches!(
            service.current_date(),
            Err(CalendarError::CorruptState { .. })
        ));
        assert!(matches!(
            service.last_checked(),
            Err(CalendarError::CorruptState { .. })
        ));
    }

    #[test]
    fn test_last_checked_accepts_bare_date() {
        let db = setup_test_db();
        let service = StateService::new(db.connection());

        service.upsert(LAST_CHECKED_KEY, "2025-01-02").unwrap();
        assert_eq!(
            service.last_checked().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
    }
}
