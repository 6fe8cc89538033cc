//! Availability Data Gateway — the boundary to the external booking store.
//!
//! The engine never mutates the slot set directly: it reads existing slots to
//! evaluate conflicts and requests creation/deletion through this trait.
//! Conflict checking on our side is advisory — two sessions can race for the
//! same slot — so the store remains the final arbiter and may reject a create
//! even after a client-side clear. Callers treat that rejection as an
//! ordinary conflict, not a defect.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::interval::TimeInterval;

/// A persisted occupied interval on a date — a confirmed booking or an
/// administrative block. Both occupy the same timeline; the store carries no
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub id: u64,
    pub date: NaiveDate,
    /// Wire form, e.g. `"10:00 AM - 01:00 PM"`.
    pub time_slot: String,
}

impl BookedSlot {
    /// Decode the wire string into a structured interval. Logic never runs on
    /// the raw string form.
    pub fn interval(&self) -> Result<TimeInterval> {
        TimeInterval::parse_wire(&self.time_slot)
    }
}

/// Finalized hand-off payload for human follow-up. Delivery (email, chat,
/// storage) is the collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub contact: String,
    pub kind: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport or server failure. Retryable; no state change was observed.
    #[error("availability service unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request — e.g. the slot was taken between our
    /// conflict check and the create, or the exact (date, time_slot) pair
    /// already exists. Re-fetch and re-check before retrying.
    #[error("rejected by availability store: {0}")]
    Rejected(String),
}

/// Operations the booking/admin flows consume from the external store.
///
/// All calls are async and non-blocking; timeout and retry policy belong to
/// the implementor, not to the scheduling core.
#[async_trait]
pub trait AvailabilityGateway: Send + Sync {
    /// All booked/blocked slots for a date.
    async fn fetch_booked_slots(
        &self,
        date: NaiveDate,
    ) -> std::result::Result<Vec<BookedSlot>, GatewayError>;

    /// Persist a new occupied interval (customer booking or admin block).
    /// `time_slot` must already be in wire form.
    async fn create_booked_slot(
        &self,
        date: NaiveDate,
        time_slot: &str,
    ) -> std::result::Result<BookedSlot, GatewayError>;

    /// Remove a previously created slot (admin unblock / cancellation).
    async fn delete_booked_slot(&self, id: u64) -> std::result::Result<(), GatewayError>;

    /// Hand off a finalized booking or general inquiry.
    async fn submit_inquiry(&self, inquiry: &Inquiry) -> std::result::Result<(), GatewayError>;
}

/// Decode every slot's wire string, failing on the first malformed record.
pub fn decode_slots(slots: &[BookedSlot]) -> Result<Vec<TimeInterval>> {
    slots.iter().map(BookedSlot::interval).collect()
}
