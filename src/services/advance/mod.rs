//! Advance engine.
//!
//! Moves the global Harptos date forward by the number of real-world days
//! since the last check. The whole read-compute-write sequence runs under
//! the advance lock, so racing callers apply each elapsed window once.

mod lock;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::CalendarError;
use crate::models::harptos::{self, HarptosDate};
use crate::models::state::CalendarState;
use crate::services::state::StateService;
use crate::utils::date::elapsed_days;

/// What a single advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub previous: HarptosDate,
    pub current: HarptosDate,
    /// Days applied; zero for same-day calls and clock skew.
    pub elapsed_days: u64,
    /// True when no usable date was stored and the defaults were used.
    pub initialized: bool,
}

impl AdvanceOutcome {
    pub fn advanced(&self) -> bool {
        self.elapsed_days > 0
    }
}

pub struct AdvanceEngine<'a> {
    conn: &'a Connection,
}

impl<'a> AdvanceEngine<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Advance the stored date to `today`.
    ///
    /// `defaults` seeds the calendar when nothing (or nothing readable) is
    /// stored. Storage failures are returned as-is; there is no retry here.
    pub fn advance(
        &self,
        defaults: HarptosDate,
        today: NaiveDate,
    ) -> Result<AdvanceOutcome, CalendarError> {
        let outcome = lock::with_lock(self.conn, lock::ADVANCE_LOCK_KEY, |tx| {
            let state = StateService::new(tx);

            let (previous, initialized) = load_current_date(&state, defaults)?;
            let last_checked = load_last_checked(&state, today)?;

            // Clock skew yields a negative count; never step backwards.
            let elapsed = elapsed_days(last_checked, today).max(0) as u64;
            let current = harptos::step_n_days(previous, elapsed);

            // Keep the later marker so a clock that jumped back cannot
            // replay days once it catches up.
            let marker = last_checked.max(today);
            state.write_calendar_state(&CalendarState::new(current, marker))?;

            Ok(AdvanceOutcome {
                previous,
                current,
                elapsed_days: elapsed,
                initialized,
            })
        })?;

        if outcome.advanced() {
            log::info!(
                "Advanced calendar {} day(s): {} -> {}",
                outcome.elapsed_days,
                outcome.previous,
                outcome.current
            );
        } else {
            log::debug!("Calendar already current at {}", outcome.current);
        }

        Ok(outcome)
    }

    /// Overwrite the current date from explicit user input.
    ///
    /// Invalid input is rejected before any state is touched. The
    /// `last_checked` marker is refreshed so the next advance does not
    /// replay days from before the override.
    pub fn set_date(
        &self,
        year: i64,
        month: i64,
        day: i64,
        today: NaiveDate,
    ) -> Result<HarptosDate, CalendarError> {
        let date = HarptosDate::new(year, month, day)?;

        lock::with_lock(self.conn, lock::ADVANCE_LOCK_KEY, |tx| {
            let state = StateService::new(tx);
            let last_checked = load_last_checked(&state, today)?;
            state.write_calendar_state(&CalendarState::new(date, last_checked.max(today)))
        })?;

        log::info!("Calendar date set to {}", date);
        Ok(date)
    }

    /// The stored date without advancing, or `defaults` if none is stored.
    pub fn current_date(&self, defaults: HarptosDate) -> Result<HarptosDate, CalendarError> {
        let state = StateService::new(self.conn);
        load_current_date(&state, defaults).map(|(date, _)| date)
    }
}

fn normalized_defaults(defaults: HarptosDate) -> HarptosDate {
    harptos::normalize(
        i64::from(defaults.year),
        i64::from(defaults.month),
        i64::from(defaults.day),
    )
}

fn load_current_date(
    state: &StateService<'_>,
    defaults: HarptosDate,
) -> Result<(HarptosDate, bool), CalendarError> {
    match state.current_date() {
        Ok(Some(date)) => Ok((date, false)),
        Ok(None) => Ok((normalized_defaults(defaults), true)),
        Err(CalendarError::CorruptState { key, reason }) => {
            log::warn!("Stored {} unreadable ({}), resetting to defaults", key, reason);
            Ok((normalized_defaults(defaults), true))
        }
        Err(err) => Err(err),
    }
}

fn load_last_checked(
    state: &StateService<'_>,
    today: NaiveDate,
) -> Result<NaiveDate, CalendarError> {
    match state.last_checked() {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Ok(today),
        Err(CalendarError::CorruptState { key, reason }) => {
            log::warn!("Stored {} unreadable ({}), treating as today", key, reason);
            Ok(today)
        }
        Err(err) => Err(err),
    }
}
