//! Error types for slot-engine operations.
//!
//! Every variant is a recoverable, user-correctable condition: parsing and
//! range errors re-prompt for input, gateway errors are retryable. Nothing
//! here should ever terminate the hosting process.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::interval::TimeInterval;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// A time or interval string does not match the `"HH:MM AM|PM"` grammar.
    /// Local and non-retryable; the caller re-prompts for input.
    #[error("invalid time format: {0:?}")]
    InvalidFormat(String),

    /// An interval whose end does not strictly follow its start.
    #[error("end time must be after start time")]
    InvalidRange,

    /// The candidate collides with existing slots on the same date.
    #[error("time slot overlaps an existing booking: {}", join_intervals(.conflicts))]
    SlotOverlap { conflicts: Vec<TimeInterval> },

    /// Network/server failure at the availability boundary. Retryable; the
    /// session keeps all entered data.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn join_intervals(conflicts: &[TimeInterval]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used throughout slot-engine.
pub type Result<T> = std::result::Result<T, SlotError>;
