//! Simulation Calendar Types
//!
//! Handles simulation time with both turn-based and human-readable date formats.
//! One turn corresponds to one in-world day.
//!
//! # Example
//!
//! ```
//! use timeline_events::{GameDate, TurnStamp};
//!
//! let ts = TurnStamp::new(12, GameDate::new(2018, 3, 27));
//! assert_eq!(ts.turn, 12);
//! assert_eq!(ts.date.to_string(), "2018-03-27");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The in-world date on which every simulation starts.
pub const CAMPAIGN_START: (i32, u8, u8) = (2018, 3, 15);

/// Human-readable simulation date.
///
/// Serializes to strings like "2018-03-15".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl GameDate {
    /// Creates a new GameDate.
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates the date the campaign opens on.
    pub fn campaign_start() -> Self {
        let (year, month, day) = CAMPAIGN_START;
        Self { year, month, day }
    }

    /// Returns true if this date falls in a leap year.
    pub fn is_leap_year(&self) -> bool {
        (self.year % 4 == 0 && self.year % 100 != 0) || self.year % 400 == 0
    }

    /// Number of days in the current month.
    pub fn days_in_month(&self) -> u8 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => {
                if self.is_leap_year() {
                    29
                } else {
                    28
                }
            }
            _ => 30,
        }
    }

    /// Advances the date by one day, handling month and year rollovers.
    pub fn advance_day(&mut self) {
        self.day += 1;
        if self.day > self.days_in_month() {
            self.day = 1;
            self.month += 1;
            if self.month > 12 {
                self.month = 1;
                self.year += 1;
            }
        }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Error type for parsing GameDate from strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseDateError {
    InvalidFormat(String),
    InvalidYear(String),
    InvalidMonth(String),
    InvalidDay(String),
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDateError::InvalidFormat(s) => {
                write!(f, "invalid date format: '{}', expected 'YYYY-MM-DD'", s)
            }
            ParseDateError::InvalidYear(s) => write!(f, "invalid year: '{}'", s),
            ParseDateError::InvalidMonth(s) => write!(f, "invalid month: '{}'", s),
            ParseDateError::InvalidDay(s) => write!(f, "invalid day: '{}'", s),
        }
    }
}

impl std::error::Error for ParseDateError {}

impl FromStr for GameDate {
    type Err = ParseDateError;

    /// Parses a GameDate from a string like "2018-03-15".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(ParseDateError::InvalidFormat(s.to_string()));
        }

        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| ParseDateError::InvalidYear(parts[0].to_string()))?;

        let month = parts[1]
            .parse::<u8>()
            .map_err(|_| ParseDateError::InvalidMonth(parts[1].to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(ParseDateError::InvalidMonth(parts[1].to_string()));
        }

        let day = parts[2]
            .parse::<u8>()
            .map_err(|_| ParseDateError::InvalidDay(parts[2].to_string()))?;
        let date = GameDate { year, month, day };
        if day == 0 || day > date.days_in_month() {
            return Err(ParseDateError::InvalidDay(parts[2].to_string()));
        }

        Ok(date)
    }
}

// Custom serialization for GameDate - serialize as a string
impl Serialize for GameDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GameDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A point in simulation time.
///
/// Contains both a monotonic turn counter and a human-readable date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStamp {
    /// Monotonically increasing turn number.
    pub turn: u64,
    /// Human-readable date.
    pub date: GameDate,
}

impl TurnStamp {
    /// Creates a new TurnStamp.
    pub fn new(turn: u64, date: GameDate) -> Self {
        Self { turn, date }
    }

    /// Creates a stamp for the start of the campaign.
    pub fn start() -> Self {
        Self {
            turn: 0,
            date: GameDate::campaign_start(),
        }
    }

    /// Advances to the next turn and the next day.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
        self.date.advance_day();
    }
}
