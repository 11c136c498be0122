// Property-based tests for Harptos date arithmetic

use harptos_almanac::models::harptos::{self, HarptosDate, DAYS_IN_YEAR};
use proptest::prelude::*;

fn valid_date() -> impl Strategy<Value = HarptosDate> {
    (0i64..3000, 1i64..=12, 1i64..=31).prop_map(|(y, m, d)| harptos::normalize(y, m, d))
}

proptest! {
    /// Normalization always lands on a real calendar day
    #[test]
    fn prop_normalize_is_valid(year in -10i64..5000, month in -5i64..20, day in -5i64..40) {
        let date = harptos::normalize(year, month, day);
        prop_assert!((1..=12).contains(&date.month));
        prop_assert!(harptos::is_valid_day(date.month, date.day));
    }

    /// Valid dates survive normalization unchanged
    #[test]
    fn prop_normalize_is_idempotent(date in valid_date()) {
        let again = harptos::normalize(
            i64::from(date.year),
            i64::from(date.month),
            i64::from(date.day),
        );
        prop_assert_eq!(again, date);
    }

    /// Stepping a + b days equals stepping a then b
    #[test]
    fn prop_steps_compose(date in valid_date(), a in 0u64..800, b in 0u64..800) {
        let joined = harptos::step_n_days(date, a + b);
        let split = harptos::step_n_days(harptos::step_n_days(date, a), b);
        prop_assert_eq!(joined, split);
    }

    /// A full year lands on the same day of the next year
    #[test]
    fn prop_year_cycle(date in valid_date(), years in 0u64..5) {
        let later = harptos::step_n_days(date, u64::from(DAYS_IN_YEAR) * years);
        prop_assert_eq!(later.year, date.year + years as u32);
        prop_assert_eq!((later.month, later.day), (date.month, date.day));
    }

    /// The successor is strictly later
    #[test]
    fn prop_next_day_is_later(date in valid_date()) {
        prop_assert!(harptos::step_one_day(date) > date);
    }
}
