// Harptos calendar model
// Twelve thirty-day months plus five festival days, one after each of
// Hammer, Tarsakh, Flamerule, Eleint and Uktar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

pub const MONTHS_IN_YEAR: u32 = 12;
pub const DAYS_IN_MONTH: u32 = 30;
pub const FESTIVAL_DAY: u32 = 31;
pub const FESTIVAL_MONTHS: [u32; 5] = [1, 4, 7, 9, 11];
pub const DAYS_IN_YEAR: u32 = MONTHS_IN_YEAR * DAYS_IN_MONTH + FESTIVAL_MONTHS.len() as u32;

pub const MONTH_NAMES: [&str; 12] = [
    "Hammer",
    "Alturiak",
    "Ches",
    "Tarsakh",
    "Mirtul",
    "Kythorn",
    "Flamerule",
    "Eleasis",
    "Eleint",
    "Marpenoth",
    "Uktar",
    "Nightal",
];

/// Festival names, paired with the month they follow.
pub const FESTIVALS: [(u32, &str); 5] = [
    (1, "Midwinter"),
    (4, "Greengrass"),
    (7, "Midsummer"),
    (9, "Highharvestide"),
    (11, "Feast of the Moon"),
];

/// A day on the Harptos calendar.
///
/// Always valid once constructed: `day` is 1..=30, or 31 in a festival month.
/// Deserialization goes through [`normalize`], so stored values that violate
/// the invariant are clamped on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawHarptosDate")]
pub struct HarptosDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

#[derive(Deserialize)]
struct RawHarptosDate {
    year: i64,
    month: i64,
    day: i64,
}

impl From<RawHarptosDate> for HarptosDate {
    fn from(raw: RawHarptosDate) -> Self {
        normalize(raw.year, raw.month, raw.day)
    }
}

pub fn is_festival_month(month: u32) -> bool {
    FESTIVAL_MONTHS.contains(&month)
}

/// Whether `(month, day)` names a real Harptos day.
pub fn is_valid_day(month: u32, day: u32) -> bool {
    if !(1..=MONTHS_IN_YEAR).contains(&month) {
        return false;
    }
    match day {
        1..=DAYS_IN_MONTH => true,
        FESTIVAL_DAY => is_festival_month(month),
        _ => false,
    }
}

/// Clamp arbitrary components onto the calendar. Never fails.
///
/// Year is clamped to `0..=u32::MAX`, month to 1..=12 and day to 1..=31;
/// a 31st outside a festival month becomes the 30th.
pub fn normalize(year: i64, month: i64, day: i64) -> HarptosDate {
    let year = year.clamp(0, i64::from(u32::MAX)) as u32;
    let month = month.clamp(1, i64::from(MONTHS_IN_YEAR)) as u32;
    let mut day = day.clamp(1, i64::from(FESTIVAL_DAY)) as u32;
    if day == FESTIVAL_DAY && !is_festival_month(month) {
        day = DAYS_IN_MONTH;
    }
    HarptosDate { year, month, day }
}

/// The day after `date`.
pub fn step_one_day(date: HarptosDate) -> HarptosDate {
    let HarptosDate { year, month, day } = date;

    if day < DAYS_IN_MONTH {
        return HarptosDate { year, month, day: day + 1 };
    }
    if day == DAYS_IN_MONTH && is_festival_month(month) {
        return HarptosDate { year, month, day: FESTIVAL_DAY };
    }
    if month == MONTHS_IN_YEAR {
        HarptosDate { year: year.saturating_add(1), month: 1, day: 1 }
    } else {
        HarptosDate { year, month: month + 1, day: 1 }
    }
}

/// Advance `date` by `n` days.
///
/// Every year has exactly [`DAYS_IN_YEAR`] days with the same layout, so
/// whole years are skipped by bumping the year; the remainder is stepped.
/// The result equals `n` calls to [`step_one_day`].
pub fn step_n_days(date: HarptosDate, n: u64) -> HarptosDate {
    let whole_years = n / u64::from(DAYS_IN_YEAR);
    let remainder = n % u64::from(DAYS_IN_YEAR);

    let skipped = u32::try_from(whole_years).unwrap_or(u32::MAX);
    let mut current = HarptosDate {
        year: date.year.saturating_add(skipped),
        ..date
    };
    for _ in 0..remainder {
        current = step_one_day(current);
    }
    current
}

impl HarptosDate {
    /// Strict constructor for explicit user input.
    pub fn new(year: i64, month: i64, day: i64) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::invalid_date(year, month, day);
        let y = u32::try_from(year).map_err(|_| invalid())?;
        let m = u32::try_from(month).map_err(|_| invalid())?;
        let d = u32::try_from(day).map_err(|_| invalid())?;
        if !is_valid_day(m, d) {
            return Err(invalid());
        }
        Ok(Self { year: y, month: m, day: d })
    }

    pub fn is_festival(&self) -> bool {
        self.day == FESTIVAL_DAY
    }

    /// Name of the month. Out-of-range months (only reachable by building
    /// the struct by hand) are read as the nearest real month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month.clamp(1, MONTHS_IN_YEAR) - 1) as usize]
    }

    pub fn festival_name(&self) -> Option<&'static str> {
        if !self.is_festival() {
            return None;
        }
        FESTIVALS
            .iter()
            .find(|(month, _)| *month == self.month)
            .map(|(_, name)| *name)
    }

    /// Position within the year, 1..=365.
    pub fn day_of_year(&self) -> u32 {
        let month = self.month.clamp(1, MONTHS_IN_YEAR);
        let festivals_before = FESTIVAL_MONTHS.iter().filter(|m| **m < month).count() as u32;
        (month - 1) * DAYS_IN_MONTH + festivals_before + self.day
    }

    pub fn plus_days(self, n: u64) -> Self {
        step_n_days(self, n)
    }
}

impl fmt::Display for HarptosDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.festival_name() {
            Some(festival) => write!(f, "{}, {} DR", festival, self.year),
            None => write!(f, "{} {}, {} DR", self.day, self.month_name(), self.year),
        }
    }
}

pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim();
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

pub fn festival_from_name(name: &str) -> Option<u32> {
    let name = name.trim();
    FESTIVALS
        .iter()
        .find(|(_, festival)| festival.eq_ignore_ascii_case(name))
        .map(|(month, _)| *month)
}

/// Split a date string into raw `(year, month, day)` components without
/// validating ranges.
///
/// Accepts `1492-4-31`, `3 Hammer 1492` (optionally `3 Hammer, 1492 DR`) and
/// `Greengrass 1492`.
pub fn parse_components(input: &str) -> Option<(i64, i64, i64)> {
    let cleaned = input.trim().replace(',', " ");
    let cleaned = cleaned
        .strip_suffix("DR")
        .or_else(|| cleaned.strip_suffix("dr"))
        .unwrap_or(&cleaned)
        .trim();

    if cleaned.contains('-') && !cleaned.contains(' ') {
        let parts: Vec<&str> = cleaned.split('-').collect();
        if parts.len() != 3 {
            return None;
        }
        let year = parts[0].trim().parse().ok()?;
        let month = parts[1].trim().parse().ok()?;
        let day = parts[2].trim().parse().ok()?;
        return Some((year, month, day));
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let (last, rest) = words.split_last()?;
    let year: i64 = last.parse().ok()?;
    if rest.is_empty() {
        return None;
    }

    let festival = rest.join(" ");
    if let Some(month) = festival_from_name(&festival) {
        return Some((year, i64::from(month), i64::from(FESTIVAL_DAY)));
    }

    let (day, month_words) = rest.split_first()?;
    let day: i64 = day.parse().ok()?;
    let month = month_from_name(&month_words.join(" "))?;
    Some((year, i64::from(month), day))
}

impl FromStr for HarptosDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = parse_components(s)
            .ok_or_else(|| anyhow::anyhow!("Unrecognized Harptos date '{}'", s))?;
        Ok(HarptosDate::new(year, month, day)?)
    }
}
