//! Typed errors for the calendar core.
//!
//! Services return `anyhow::Result`; these values travel inside and can be
//! recovered with `err.downcast_ref::<CalendarError>()`.

/// Failure kinds surfaced by the calendar model and its stores.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// Out-of-range year, month or day on explicit input.
    #[error("invalid Harptos date: year {year}, month {month}, day {day}")]
    InvalidDate { year: i64, month: i64, day: i64 },

    /// A stored state value could not be parsed. Recovered locally by the
    /// advance engine; never returned from `advance`.
    #[error("corrupt state value for '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    /// The database rejected or could not complete the request.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("event with id {0} not found")]
    EventNotFound(i64),
}

impl CalendarError {
    pub fn invalid_date(year: i64, month: i64, day: i64) -> Self {
        Self::InvalidDate { year, month, day }
    }

    pub fn corrupt_state(key: &str, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
