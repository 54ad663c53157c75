use crate::ids::Clock;
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid day '{0}' (expected monday..sunday)")]
    InvalidDay(String),
}

/// A day of the fixed seven-day study week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Position in the week, 0 for Monday through 6 for Sunday.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Day {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(&self) -> Day {
        self.ahead(1)
    }

    /// The day `n` days later, wrapping around the week.
    pub fn ahead(&self, n: usize) -> Day {
        Self::from_index(self.index() + n % Self::ALL.len())
    }

    pub fn today(clock: &dyn Clock) -> Day {
        Day::from(clock.now().weekday())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| CalendarError::InvalidDay(s.to_string()))
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Day::from_index(weekday.num_days_from_monday() as usize)
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

/// Index of a day token in the week; tokens are the lowercase day names.
pub fn day_index(token: &str) -> Result<usize, CalendarError> {
    token.parse::<Day>().map(|day| day.index())
}

pub fn next_day(day: Day) -> Day {
    day.next()
}

pub fn day_ahead(day: Day, n: usize) -> Day {
    day.ahead(n)
}
