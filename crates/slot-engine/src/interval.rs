//! Half-open time intervals and the overlap test.
//!
//! A [`TimeInterval`] is a `[start, end)` window within one calendar day;
//! intervals never span midnight. The store persists intervals as the literal
//! string `"<start> - <end>"` in the 12-hour grammar, which [`parse_wire`]
//! and [`Display`] reproduce exactly.
//!
//! [`parse_wire`]: TimeInterval::parse_wire
//! [`Display`]: TimeInterval#impl-Display-for-TimeInterval

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::TimeOfDay;
use crate::error::{Result, SlotError};

/// Endpoint separator in the persisted wire form, e.g. `"10:00 AM - 01:00 PM"`.
const WIRE_SEPARATOR: &str = " - ";

/// A half-open `[start, end)` window within a single day.
///
/// Construction is unchecked; inverted and zero-length intervals exist as
/// values so that "invalid range" can be reported as a first-class outcome
/// rather than a panic. Use [`validated`](Self::validated) before persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeInterval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// True iff `start >= end` — zero-length and inverted windows.
    pub fn is_invalid(&self) -> bool {
        self.start >= self.end
    }

    /// Reject invalid ranges with [`SlotError::InvalidRange`].
    pub fn validated(self) -> Result<Self> {
        if self.is_invalid() {
            return Err(SlotError::InvalidRange);
        }
        Ok(self)
    }

    /// Two half-open intervals overlap iff `max(starts) < min(ends)`.
    ///
    /// This excludes the adjacent case where one interval ends exactly when
    /// the other starts: back-to-back bookings are permitted.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Window length in minutes; zero for invalid intervals.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Parse the persisted wire form `"<start> - <end>"`.
    pub fn parse_wire(text: &str) -> Result<Self> {
        let (start_text, end_text) = text
            .split_once(WIRE_SEPARATOR)
            .ok_or_else(|| SlotError::InvalidFormat(text.to_string()))?;
        Ok(Self {
            start: TimeOfDay::parse(start_text)?,
            end: TimeOfDay::parse(end_text)?,
        })
    }

    /// The wire form, zero-padded: `"10:00 AM - 01:00 PM"`.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, WIRE_SEPARATOR, self.end)
    }
}

impl FromStr for TimeInterval {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_wire(s)
    }
}

impl Serialize for TimeInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_wire(&text).map_err(de::Error::custom)
    }
}

/// A partially chosen interval from the time picker.
///
/// Until both endpoints are picked the selection is *incomplete* — a third
/// state distinct from valid/invalid/overlapping. Incomplete selections block
/// progression silently and never reach the overlap test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalSelection {
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

impl IntervalSelection {
    /// The chosen interval, once both endpoints are set. The result may still
    /// be an invalid range; completeness and validity are separate questions.
    pub fn complete(&self) -> Option<TimeInterval> {
        Some(TimeInterval::new(self.start?, self.end?))
    }

    /// Drop both endpoints (date changes reset the time selection).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
