//! Wall-clock time-of-day parsing and formatting.
//!
//! The booking store serializes times in the 12-hour `"HH:MM AM|PM"` grammar.
//! [`TimeOfDay`] decodes that immediately into a minute-of-day integer so that
//! every comparison and overlap decision runs on numbers, never on raw
//! strings. Formatting is the exact inverse, zero-padded, which makes the
//! grammar round-trippable.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

/// Minutes in one calendar day; `TimeOfDay` values are strictly below this.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time within a single day, counted in minutes since midnight.
///
/// `12:00 AM` is minute 0, `12:00 PM` is minute 720, `11:59 PM` is 1439.
/// Ordering is plain integer ordering, so interval arithmetic never touches
/// the 12-hour display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from a minute-of-day count. Rejects values of 1440 or more.
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(SlotError::InvalidFormat(format!(
                "minute-of-day {minutes} out of range"
            )));
        }
        Ok(Self(minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Parse the 12-hour grammar: `"H:MM AM"`, `"HH:MM PM"`, etc.
    ///
    /// Hour must be 1-12. The time picker only offers minutes
    /// {00, 15, 30, 45}, but any minute 0-59 parses, for robustness against
    /// hand-written store records. `PM` adds twelve hours unless the hour is
    /// already 12; `12 AM` is midnight.
    pub fn parse(text: &str) -> Result<Self> {
        let bad = || SlotError::InvalidFormat(text.to_string());

        let mut tokens = text.trim().split_whitespace();
        let (Some(time), Some(meridiem), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(bad());
        };

        let pm = match meridiem {
            "AM" => false,
            "PM" => true,
            _ => return Err(bad()),
        };

        let (hour_text, minute_text) = time.split_once(':').ok_or_else(bad)?;
        let mut hour: u16 = hour_text.parse().map_err(|_| bad())?;
        let minute: u16 = minute_text.parse().map_err(|_| bad())?;

        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(bad());
        }

        if pm && hour < 12 {
            hour += 12;
        }
        if !pm && hour == 12 {
            hour = 0;
        }

        Ok(Self(hour * 60 + minute))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour24 = self.0 / 60;
        let minute = self.0 % 60;
        let meridiem = if hour24 >= 12 { "PM" } else { "AM" };
        let hour12 = match hour24 % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{hour12:02}:{minute:02} {meridiem}")
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Serialized as the display string so JSON payloads carry the same grammar
// as the store ("10:00 AM"), not a bare minute count.
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}
