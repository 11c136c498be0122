// Event module
// A note pinned to a single Harptos day

use chrono::{DateTime, Local, NaiveDate};

use crate::error::CalendarError;
use crate::models::harptos::{self, HarptosDate};

/// Campaign event recorded against a Harptos day.
///
/// The date components are public so rows can be mapped straight from the
/// database; anything written goes through [`Event::validate`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Option<i64>,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub real_world_date: Option<NaiveDate>,
    pub hidden: bool,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Event {
    /// Create an untitled event on `date`.
    ///
    /// # Examples
    /// ```
    /// use harptos_almanac::models::event::Event;
    /// use harptos_almanac::models::harptos::HarptosDate;
    ///
    /// let date = HarptosDate::new(1492, 1, 3).unwrap();
    /// let event = Event::new(date);
    /// assert_eq!(event.date(), date);
    /// ```
    pub fn new(date: HarptosDate) -> Self {
        Self {
            id: None,
            year: date.year,
            month: date.month,
            day: date.day,
            title: None,
            notes: None,
            real_world_date: None,
            hidden: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// The Harptos day this event belongs to.
    ///
    /// Normalizes, so an invalid in-memory event still maps to a real day.
    pub fn date(&self) -> HarptosDate {
        harptos::normalize(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        )
    }

    /// Check the day invariant.
    pub fn validate(&self) -> Result<(), CalendarError> {
        if !harptos::is_valid_day(self.month, self.day) {
            return Err(CalendarError::invalid_date(
                i64::from(self.year),
                i64::from(self.month),
                i64::from(self.day),
            ));
        }
        Ok(())
    }

    /// Copy of this event with its day clamped onto the calendar.
    pub fn normalized(&self) -> Self {
        let date = self.date();
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            ..self.clone()
        }
    }

    /// Title for display, falling back to the first line of the notes.
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.trim().to_string();
        }
        self.notes
            .as_deref()
            .and_then(|notes| notes.lines().find(|line| !line.trim().is_empty()))
            .map(|line| line.trim().to_string())
            .unwrap_or_else(|| "(untitled)".to_string())
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    date: Option<(i64, i64, i64)>,
    title: Option<String>,
    notes: Option<String>,
    real_world_date: Option<NaiveDate>,
    hidden: bool,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            date: None,
            title: None,
            notes: None,
            real_world_date: None,
            hidden: false,
        }
    }

    /// Set the Harptos day. Checked in [`EventBuilder::build`].
    pub fn on(mut self, year: i64, month: i64, day: i64) -> Self {
        self.date = Some((year, month, day));
        self
    }

    pub fn date(self, date: HarptosDate) -> Self {
        self.on(
            i64::from(date.year),
            i64::from(date.month),
            i64::from(date.day),
        )
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn real_world_date(mut self, date: NaiveDate) -> Self {
        self.real_world_date = Some(date);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Build the event, rejecting days that are not on the calendar.
    pub fn build(self) -> Result<Event, CalendarError> {
        let (year, month, day) = self
            .date
            .ok_or_else(|| CalendarError::invalid_date(0, 0, 0))?;
        let date = HarptosDate::new(year, month, day)?;

        let mut event = Event::new(date);
        event.title = self.title;
        event.notes = self.notes;
        event.real_world_date = self.real_world_date;
        event.hidden = self.hidden;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
