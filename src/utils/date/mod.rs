// Real-world date helpers

use chrono::{Local, NaiveDate};

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` date, ignoring surrounding whitespace and any
/// trailing time component.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whole days from `from` to `to`. Negative when the clock went backwards.
pub fn elapsed_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_iso_date("2025-03-14"), expected);
        assert_eq!(parse_iso_date(" 2025-03-14 "), expected);
        assert_eq!(parse_iso_date("2025-03-14T10:00:00+00:00"), expected);
        assert_eq!(parse_iso_date("14/03/2025"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_elapsed_days() {
        let a = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(elapsed_days(a, b), 3);
        assert_eq!(elapsed_days(b, a), -3);
        assert_eq!(elapsed_days(a, a), 0);
    }
}
