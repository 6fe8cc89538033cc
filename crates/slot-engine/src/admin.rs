//! Administrator slot-blocking flow.
//!
//! A two-state machine: `Idle` until a date is selected, then `DateSelected`
//! with the date's slots loaded for display. Every block/unblock is followed
//! by a full re-fetch — read-your-writes, no optimistic local mutation of the
//! conflict set — and further mutations are refused until the refreshed set
//! arrives. Same reducer-plus-effects shape as the customer flow in
//! [`session`](crate::session).

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::conflict::{check_conflict, ConflictOutcome};
use crate::error::SlotError;
use crate::gateway::{decode_slots, AvailabilityGateway, BookedSlot, GatewayError};
use crate::interval::TimeInterval;

/// Where the admin session stands with respect to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPhase {
    /// No date selected yet.
    Idle,
    /// A fetch for the selected date is in flight.
    Fetching,
    /// Slots are loaded; block/unblock actions are allowed.
    Ready,
    /// A create/delete is in flight; further mutations refused.
    Mutating,
    /// The last fetch failed; prior data kept, manual retry allowed.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminEvent {
    SelectDate(NaiveDate),
    SlotsLoaded { date: NaiveDate, slots: Vec<BookedSlot> },
    SlotsFailed { date: NaiveDate },
    /// Block a time window on the selected date.
    Block(TimeInterval),
    /// Remove a block/booking by slot id.
    Unblock(u64),
    MutationDone,
    MutationFailed(GatewayError),
    RetryFetch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminEffect {
    FetchSlots(NaiveDate),
    CreateSlot { date: NaiveDate, time_slot: String },
    DeleteSlot(u64),
}

/// The admin availability session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    phase: AdminPhase,
    selected: Option<NaiveDate>,
    slots: Vec<BookedSlot>,
    intervals: Vec<TimeInterval>,
    last_outcome: Option<ConflictOutcome>,
    last_error: Option<SlotError>,
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminSession {
    pub fn new() -> Self {
        Self {
            phase: AdminPhase::Idle,
            selected: None,
            slots: Vec::new(),
            intervals: Vec::new(),
            last_outcome: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> AdminPhase {
        self.phase
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// The last loaded slot records (ids included, for unblocking).
    pub fn slots(&self) -> &[BookedSlot] {
        &self.slots
    }

    /// Outcome of the most recent block attempt's conflict check.
    pub fn last_outcome(&self) -> Option<&ConflictOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&SlotError> {
        self.last_error.as_ref()
    }

    /// Whether block/unblock actions are currently allowed.
    pub fn can_mutate(&self) -> bool {
        self.phase == AdminPhase::Ready
    }

    pub fn apply(&mut self, event: AdminEvent) -> Vec<AdminEffect> {
        match event {
            AdminEvent::SelectDate(date) => {
                self.selected = Some(date);
                self.phase = AdminPhase::Fetching;
                vec![AdminEffect::FetchSlots(date)]
            }
            AdminEvent::SlotsLoaded { date, slots } => {
                if self.selected != Some(date) {
                    debug!(%date, "discarding slot fetch for unselected date");
                    return Vec::new();
                }
                match decode_slots(&slots) {
                    Ok(intervals) => {
                        self.slots = slots;
                        self.intervals = intervals;
                        self.phase = AdminPhase::Ready;
                        self.last_error = None;
                    }
                    Err(err) => {
                        warn!(%date, %err, "malformed slot record; keeping prior data");
                        self.phase = AdminPhase::Stale;
                        self.last_error = Some(err);
                    }
                }
                Vec::new()
            }
            AdminEvent::SlotsFailed { date } => {
                if self.selected != Some(date) {
                    debug!(%date, "discarding failed fetch for unselected date");
                    return Vec::new();
                }
                // Prior slots stay in place rather than vanishing silently.
                self.phase = AdminPhase::Stale;
                Vec::new()
            }
            AdminEvent::Block(interval) => self.block(interval),
            AdminEvent::Unblock(id) => self.unblock(id),
            AdminEvent::MutationDone => self.refetch(),
            AdminEvent::MutationFailed(err) => {
                // The store may have refused a racing create; either way the
                // local view is suspect, so re-read before anything else.
                warn!(%err, "slot mutation failed");
                self.last_error = Some(SlotError::Gateway(err));
                self.refetch()
            }
            AdminEvent::RetryFetch => {
                if self.phase == AdminPhase::Stale {
                    self.refetch()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn block(&mut self, interval: TimeInterval) -> Vec<AdminEffect> {
        if !self.can_mutate() {
            debug!(phase = ?self.phase, "block refused: availability not settled");
            return Vec::new();
        }
        let Some(date) = self.selected else {
            return Vec::new();
        };
        let outcome = check_conflict(interval, &self.intervals);
        if !outcome.is_clear() {
            // Invalid or overlapping candidates never reach the gateway.
            self.last_outcome = Some(outcome);
            return Vec::new();
        }
        self.last_outcome = Some(outcome);
        self.phase = AdminPhase::Mutating;
        vec![AdminEffect::CreateSlot {
            date,
            time_slot: interval.to_wire(),
        }]
    }

    fn unblock(&mut self, id: u64) -> Vec<AdminEffect> {
        if !self.can_mutate() {
            debug!(phase = ?self.phase, "unblock refused: availability not settled");
            return Vec::new();
        }
        if !self.slots.iter().any(|slot| slot.id == id) {
            debug!(id, "unblock refused: unknown slot id");
            return Vec::new();
        }
        self.phase = AdminPhase::Mutating;
        vec![AdminEffect::DeleteSlot(id)]
    }

    fn refetch(&mut self) -> Vec<AdminEffect> {
        match self.selected {
            Some(date) => {
                self.phase = AdminPhase::Fetching;
                vec![AdminEffect::FetchSlots(date)]
            }
            None => {
                self.phase = AdminPhase::Idle;
                Vec::new()
            }
        }
    }
}

/// Execute one admin effect against the gateway, producing the follow-up
/// event.
pub async fn drive_admin(gateway: &dyn AvailabilityGateway, effect: AdminEffect) -> AdminEvent {
    match effect {
        AdminEffect::FetchSlots(date) => match gateway.fetch_booked_slots(date).await {
            Ok(slots) => AdminEvent::SlotsLoaded { date, slots },
            Err(err) => {
                warn!(%date, %err, "slot fetch failed");
                AdminEvent::SlotsFailed { date }
            }
        },
        AdminEffect::CreateSlot { date, time_slot } => {
            match gateway.create_booked_slot(date, &time_slot).await {
                Ok(_) => AdminEvent::MutationDone,
                Err(err) => AdminEvent::MutationFailed(err),
            }
        }
        AdminEffect::DeleteSlot(id) => match gateway.delete_booked_slot(id).await {
            Ok(()) => AdminEvent::MutationDone,
            Err(err) => AdminEvent::MutationFailed(err),
        },
    }
}
