//! Conflict checking for a candidate interval against a date's occupied slots.
//!
//! The checker is pure and synchronous. It has no knowledge of *why* an
//! existing interval exists — customer bookings and administrative blocks
//! occupy the same timeline for a date, so one shared conflict space applies
//! regardless of caller role.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::TimeInterval;

/// Outcome of checking a complete candidate interval against existing slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictOutcome {
    /// The candidate fits: valid range, no overlap with any existing slot.
    Clear,
    /// The candidate's end does not strictly follow its start.
    InvalidRange,
    /// Existing intervals the candidate collides with, in the order supplied.
    Overlaps(Vec<TimeInterval>),
}

impl ConflictOutcome {
    pub fn is_clear(&self) -> bool {
        matches!(self, ConflictOutcome::Clear)
    }

    /// Map to the error taxonomy for callers that want `?` propagation.
    pub fn into_result(self) -> Result<()> {
        match self {
            ConflictOutcome::Clear => Ok(()),
            ConflictOutcome::InvalidRange => Err(SlotError::InvalidRange),
            ConflictOutcome::Overlaps(conflicts) => Err(SlotError::SlotOverlap { conflicts }),
        }
    }
}

/// Check a candidate interval against every existing slot on the same date.
///
/// Invalid range is checked *before* overlap: an inverted interval's overlap
/// semantics are meaningless, and reporting "overlaps" for a backwards window
/// would mislead the user about which constraint to fix.
///
/// Callers must not invoke this with an incomplete selection — gate on
/// [`IntervalSelection::complete`](crate::interval::IntervalSelection::complete)
/// first.
pub fn check_conflict(candidate: TimeInterval, existing: &[TimeInterval]) -> ConflictOutcome {
    if candidate.is_invalid() {
        return ConflictOutcome::InvalidRange;
    }

    let hits: Vec<TimeInterval> = existing
        .iter()
        .filter(|slot| candidate.overlaps(slot))
        .copied()
        .collect();

    if hits.is_empty() {
        ConflictOutcome::Clear
    } else {
        ConflictOutcome::Overlaps(hits)
    }
}
