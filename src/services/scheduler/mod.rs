use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local};
use rusqlite::Connection;

use crate::error::CalendarError;
use crate::models::harptos::HarptosDate;
use crate::models::settings::MAX_ADVANCE_INTERVAL_MINUTES;
use crate::services::advance::{AdvanceEngine, AdvanceOutcome};

#[derive(Debug, Clone, Default)]
pub struct AdvanceTickResult {
    pub attempted: bool,
    pub outcome: Option<AdvanceOutcome>,
    pub error: Option<String>,
    pub next_due_in: Option<StdDuration>,
}

/// Decides when the advance engine runs.
///
/// Successful runs repeat every `interval_minutes`. Failures back off
/// exponentially up to `max_backoff_minutes`; the engine itself never
/// retries, the next due tick does.
pub struct AdvanceScheduler {
    defaults: HarptosDate,
    interval_minutes: i64,
    max_backoff_minutes: i64,
    next_run_at: Option<DateTime<Local>>,
    consecutive_failures: u32,
}

impl AdvanceScheduler {
    pub fn new(defaults: HarptosDate, interval_minutes: u64) -> Self {
        Self {
            defaults,
            interval_minutes: interval_minutes.clamp(1, MAX_ADVANCE_INTERVAL_MINUTES) as i64,
            max_backoff_minutes: 60,
            next_run_at: None,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn tick(&mut self, conn: &Connection) -> AdvanceTickResult {
        let now = Local::now();
        let engine = AdvanceEngine::new(conn);
        let defaults = self.defaults;
        self.tick_with_runner_at(now, |now| engine.advance(defaults, now.date_naive()))
    }

    pub fn tick_with_runner_at<F>(&mut self, now: DateTime<Local>, runner: F) -> AdvanceTickResult
    where
        F: FnOnce(DateTime<Local>) -> Result<AdvanceOutcome, CalendarError>,
    {
        let is_due = self.next_run_at.is_none_or(|next_run_at| now >= next_run_at);
        if !is_due {
            return AdvanceTickResult {
                next_due_in: self.time_until_due(now),
                ..AdvanceTickResult::default()
            };
        }

        let mut result = AdvanceTickResult {
            attempted: true,
            ..AdvanceTickResult::default()
        };

        match runner(now) {
            Ok(outcome) => {
                self.consecutive_failures = 0;
                self.next_run_at = Some(Self::after_minutes(now, self.interval_minutes));
                result.outcome = Some(outcome);
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let backoff_minutes = Self::calculate_backoff_minutes(
                    self.interval_minutes,
                    self.consecutive_failures,
                    self.max_backoff_minutes,
                );
                self.next_run_at = Some(Self::after_minutes(now, backoff_minutes));
                log::warn!(
                    "Calendar advance failed ({} in a row), retrying in {} min: {}",
                    self.consecutive_failures,
                    backoff_minutes,
                    err
                );
                result.error = Some(err.to_string());
            }
        }

        result.next_due_in = self.time_until_due(now);
        result
    }

    /// `now + minutes`, capped at one year out so the add cannot overflow.
    fn after_minutes(now: DateTime<Local>, minutes: i64) -> DateTime<Local> {
        let capped = minutes.clamp(0, MAX_ADVANCE_INTERVAL_MINUTES as i64);
        now.checked_add_signed(Duration::minutes(capped)).unwrap_or(now)
    }

    fn time_until_due(&self, now: DateTime<Local>) -> Option<StdDuration> {
        self.next_run_at.map(|next_run_at| {
            let delta = next_run_at - now;
            if delta <= Duration::zero() {
                StdDuration::from_secs(0)
            } else {
                delta.to_std().unwrap_or_else(|_| StdDuration::from_secs(0))
            }
        })
    }

    fn calculate_backoff_minutes(base_minutes: i64, failures: u32, max_backoff_minutes: i64) -> i64 {
        let base = base_minutes.max(1);
        if failures == 0 {
            return base;
        }

        let factor = 2_i64.saturating_pow(failures.min(10));
        let backoff = base.saturating_mul(factor);
        backoff.min(max_backoff_minutes.max(base))
    }
}
