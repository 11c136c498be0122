// Calendar state module
// The singleton records behind the global Harptos date

use chrono::NaiveDate;

use crate::models::harptos::HarptosDate;

/// State key holding the authoritative Harptos date.
pub const CURRENT_DATE_KEY: &str = "current_date";
/// State key holding the real-world date of the last advance evaluation.
pub const LAST_CHECKED_KEY: &str = "last_checked";

/// Both halves of the global calendar, always written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub current_date: HarptosDate,
    pub last_checked: NaiveDate,
}

impl CalendarState {
    pub fn new(current_date: HarptosDate, last_checked: NaiveDate) -> Self {
        Self {
            current_date,
            last_checked,
        }
    }
}
