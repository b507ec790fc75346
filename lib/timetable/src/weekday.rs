//! Weekdays and their localized names.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};

/// Day of the week. Declaration order is the canonical Monday-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the Monday-first week.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The following day, wrapping Sunday to Monday.
    #[must_use]
    pub const fn succ(self) -> Self {
        Self::ALL[(self.index() + 1) % 7]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Language of the day-name vocabulary and of the bot's replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "ru")]
    Russian,
    #[serde(alias = "en")]
    English,
}

const RUSSIAN_DAYS: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

const ENGLISH_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl Locale {
    /// The closed vocabulary of day names, Monday first.
    #[must_use]
    pub fn day_names(self) -> &'static [&'static str; 7] {
        match self {
            Self::Russian => &RUSSIAN_DAYS,
            Self::English => &ENGLISH_DAYS,
        }
    }

    /// Canonical name of a day.
    #[must_use]
    pub fn display(self, day: Weekday) -> &'static str {
        self.day_names()[day.index()]
    }

    /// Resolves a day name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnknownWeekday`] when the text is not one of
    /// [`Locale::day_names`]; there is no fallback day.
    pub fn resolve(self, text: &str) -> Result<Weekday, FormatError> {
        let wanted = text.trim().to_lowercase();
        self.day_names()
            .iter()
            .position(|name| name.to_lowercase() == wanted)
            .map(|index| Weekday::ALL[index])
            .ok_or_else(|| FormatError::UnknownWeekday {
                input: text.to_string(),
            })
    }
}
