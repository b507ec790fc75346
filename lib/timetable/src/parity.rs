//! Numerator/denominator week labeling for biweekly class rotation.

use crate::weekday::Locale;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which half of the biweekly rotation a week belongs to.
///
/// Derived from the ISO week number; never stored per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekParity {
    /// Odd ISO weeks.
    Numerator,
    /// Even ISO weeks.
    Denominator,
}

impl WeekParity {
    /// Parity of the week containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        if date.iso_week().week() % 2 == 0 {
            Self::Denominator
        } else {
            Self::Numerator
        }
    }

    /// 1 for the numerator week, 2 for the denominator week.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Numerator => 1,
            Self::Denominator => 2,
        }
    }

    /// Localized label.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Russian, Self::Numerator) => "числитель",
            (Locale::Russian, Self::Denominator) => "знаменатель",
            (Locale::English, Self::Numerator) => "numerator",
            (Locale::English, Self::Denominator) => "denominator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn odd_iso_week_is_numerator() {
        // 2024-01-01 is a Monday in ISO week 1.
        assert_eq!(WeekParity::of(date(2024, 1, 1)), WeekParity::Numerator);
        assert_eq!(WeekParity::of(date(2024, 1, 7)), WeekParity::Numerator);
    }

    #[test]
    fn even_iso_week_is_denominator() {
        assert_eq!(WeekParity::of(date(2024, 1, 8)), WeekParity::Denominator);
        assert_eq!(WeekParity::Denominator.ordinal(), 2);
    }

    #[test]
    fn iso_week_crosses_calendar_year() {
        // 2021-01-03 belongs to ISO week 53 of 2020.
        assert_eq!(WeekParity::of(date(2021, 1, 3)), WeekParity::Numerator);
    }

    #[test]
    fn labels_are_localized() {
        assert_eq!(WeekParity::Numerator.label(Locale::Russian), "числитель");
        assert_eq!(WeekParity::Denominator.label(Locale::English), "denominator");
    }
}
