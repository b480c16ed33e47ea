//! Bit-packed weekday sets for timetable meetings.
//!
//! Bit `i` of a [`WeekdaySet`] is set iff weekday `i` (Monday = 0) is present.
//!
//! ```
//! use calendar_scraper::weekday::{decode, encode, Weekday};
//!
//! let mask = encode(&["F", "M"]).unwrap();
//! assert_eq!(mask.bits(), 17); // 10001 in base 2
//! assert_eq!(decode(mask), vec![Weekday::Monday, Weekday::Friday]);
//! ```

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A teaching day, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

impl Weekday {
    /// Timetable abbreviation ("M", "Tu", "W", "Th", "F").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
        }
    }

    /// Case-sensitive lookup by abbreviation.
    pub fn from_abbreviation(token: &str) -> Option<Self> {
        WEEKDAYS.into_iter().find(|day| day.abbreviation() == token)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// A set of weekdays packed into the low 5 bits of an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const MAX: u8 = 0b1_1111;

    pub fn from_bits(bits: u8) -> Result<Self, ScrapeError> {
        if bits > Self::MAX {
            return Err(ScrapeError::WeekdayMaskOutOfRange {
                value: u32::from(bits),
            });
        }
        Ok(WeekdaySet(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= day.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Days in Monday-to-Friday order.
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        WEEKDAYS.into_iter().filter(move |day| self.contains(*day))
    }
}

impl TryFrom<u8> for WeekdaySet {
    type Error = ScrapeError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        WeekdaySet::from_bits(bits)
    }
}

impl From<WeekdaySet> for u8 {
    fn from(set: WeekdaySet) -> Self {
        set.0
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Encodes timetable day tokens into a [`WeekdaySet`].
///
/// Every token must be one of the five abbreviations exactly; unmatched tokens
/// are rejected rather than dropped.
pub fn encode<S: AsRef<str>>(tokens: &[S]) -> Result<WeekdaySet, ScrapeError> {
    if tokens.len() > WEEKDAYS.len() {
        return Err(ScrapeError::TooManyWeekdays {
            count: tokens.len(),
        });
    }

    let mut set = WeekdaySet::EMPTY;
    for token in tokens {
        let token = token.as_ref();
        let day = Weekday::from_abbreviation(token).ok_or_else(|| {
            ScrapeError::UnknownWeekdayToken {
                token: token.to_string(),
            }
        })?;
        set.insert(day);
    }
    Ok(set)
}

/// Decodes a [`WeekdaySet`] into its days, Monday first.
pub fn decode(set: WeekdaySet) -> Vec<Weekday> {
    set.days().collect()
}
