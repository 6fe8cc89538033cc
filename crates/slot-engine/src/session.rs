//! Customer booking flow as an explicit state machine.
//!
//! Session state is a value advanced by [`BookingSession::apply`]; the
//! reducer is pure and returns the side effects the caller must run against
//! the gateway. [`drive`] executes one effect and produces the follow-up
//! event to feed back in. This keeps every transition deterministic and unit
//! testable without a rendering environment.
//!
//! Flow: `Addons → Schedule → Details → Closed`, forward with [`Next`],
//! single-step [`Back`]. The draft survives back-navigation, so moving back
//! and forward again restores prior selections. Nothing is persisted before
//! final submission; dropping the session discards the draft.
//!
//! [`Next`]: BookingEvent::Next
//! [`Back`]: BookingEvent::Back

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::TimeOfDay;
use crate::conflict::{check_conflict, ConflictOutcome};
use crate::error::SlotError;
use crate::gateway::{decode_slots, AvailabilityGateway, BookedSlot, GatewayError, Inquiry};
use crate::interval::{IntervalSelection, TimeInterval};

/// Indoor/outdoor event mode carried through to the booking summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueMode {
    Indoor,
    Outdoor,
}

impl fmt::Display for VenueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VenueMode::Indoor => "INDOOR",
            VenueMode::Outdoor => "OUTDOOR",
        })
    }
}

/// The package the customer picked before the booking flow opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSelection {
    pub mode: VenueMode,
    pub decoration: String,
    /// Specific setup within the decoration, if one was chosen.
    pub setup: Option<String>,
    pub plan: String,
}

/// How an add-on is offered: a yes/no extra or a counted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOnKind {
    Checkbox,
    Quantity,
}

/// An offerable add-on from the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: u32,
    pub name: String,
    pub kind: AddOnKind,
}

/// Transient, session-scoped accumulation of the customer's choices.
/// Discarded on submission or cancellation; never persisted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    /// Chosen add-ons, id → quantity. Setting quantity 0 removes the entry.
    pub addons: BTreeMap<u32, u32>,
    pub selected_date: Option<NaiveDate>,
    pub selection: IntervalSelection,
    pub name: String,
    pub phone: String,
}

/// Step of the customer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Addons,
    Schedule,
    Details,
    Closed,
}

/// What the session currently knows about the selected date's occupied slots.
///
/// Each fetch is tagged with the date it was issued for; responses for a date
/// that is no longer selected are discarded (last-selected-date-wins), so an
/// out-of-order completion can never overwrite a newer date's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityView {
    NotLoaded,
    Loading { date: NaiveDate },
    Loaded { date: NaiveDate, intervals: Vec<TimeInterval> },
    /// The fetch failed. Previously fetched data is kept rather than cleared
    /// silently; a manual retry is allowed. Conflict checks against this view
    /// are not authoritative.
    Stale { date: NaiveDate, last_known: Vec<TimeInterval> },
}

impl AvailabilityView {
    fn known_intervals(&self) -> Vec<TimeInterval> {
        match self {
            AvailabilityView::Loaded { intervals, .. } => intervals.clone(),
            AvailabilityView::Stale { last_known, .. } => last_known.clone(),
            _ => Vec::new(),
        }
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    /// Advance one step, subject to the schedule gate.
    Next,
    /// Go back one step; later-step data is kept.
    Back,
    SetAddon { id: u32, quantity: u32 },
    SelectDate(NaiveDate),
    /// Re-issue the fetch after a failed one.
    RetryFetch,
    SlotsLoaded { date: NaiveDate, slots: Vec<BookedSlot> },
    SlotsFailed { date: NaiveDate },
    SetStart(TimeOfDay),
    SetEnd(TimeOfDay),
    SetContact { name: String, phone: String },
    Submit,
    /// The store accepted the slot; the inquiry half still has to run.
    SlotPersisted { id: u64 },
    /// A stale slot from an earlier partial submission was released.
    SlotReleased,
    SubmitSucceeded,
    SubmitFailed(GatewayError),
}

/// Side effects the caller must run via [`drive`].
///
/// Submission is two effects, not one, so that a failure between them leaves
/// the session knowing exactly which half remains: persist the slot, then
/// hand the summary to the inquiry collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEffect {
    FetchSlots(NaiveDate),
    PersistSlot { date: NaiveDate, time_slot: String },
    SendInquiry(Inquiry),
    /// Delete a slot persisted for a draft that has since changed.
    ReleaseSlot(u64),
}

/// The slot created by a submission attempt, kept so a retry after a failed
/// inquiry does not re-create it (the store rejects exact duplicates).
#[derive(Debug, Clone, PartialEq, Eq)]
struct PersistedSlot {
    id: u64,
    date: NaiveDate,
    time_slot: String,
}

/// Why the `Schedule → Details` transition is (or is not) available.
///
/// Everything except `Ready` disables the transition; `Incomplete` and
/// `AwaitingAvailability` do so silently, `Conflict` carries the message to
/// surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleGate {
    NoDate,
    /// One or both interval endpoints unset. Not a failure — disable, don't
    /// alert.
    Incomplete,
    /// Slots for the selected date are still loading, or the last fetch
    /// failed. Conflict checks are not authoritative yet.
    AwaitingAvailability,
    Conflict(ConflictOutcome),
    Ready,
}

/// The customer booking session.
#[derive(Debug, Clone)]
pub struct BookingSession {
    package: PackageSelection,
    catalog: Vec<AddOn>,
    today: NaiveDate,
    step: BookingStep,
    draft: BookingDraft,
    availability: AvailabilityView,
    submitting: bool,
    persisted: Option<PersistedSlot>,
    last_error: Option<SlotError>,
}

impl BookingSession {
    /// Open a session for a picked package. `today` is snapshotted once and
    /// used to refuse past dates.
    pub fn new(package: PackageSelection, catalog: Vec<AddOn>, today: NaiveDate) -> Self {
        Self {
            package,
            catalog,
            today,
            step: BookingStep::Addons,
            draft: BookingDraft::default(),
            availability: AvailabilityView::NotLoaded,
            submitting: false,
            persisted: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn availability(&self) -> &AvailabilityView {
        &self.availability
    }

    /// The retryable error from the last failed submit, if any.
    pub fn last_error(&self) -> Option<&SlotError> {
        self.last_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Evaluate the guard on `Schedule → Details` (re-checked on submit).
    pub fn schedule_gate(&self) -> ScheduleGate {
        let Some(date) = self.draft.selected_date else {
            return ScheduleGate::NoDate;
        };
        let Some(candidate) = self.draft.selection.complete() else {
            return ScheduleGate::Incomplete;
        };
        let AvailabilityView::Loaded { date: loaded_for, intervals } = &self.availability else {
            return ScheduleGate::AwaitingAvailability;
        };
        if *loaded_for != date {
            return ScheduleGate::AwaitingAvailability;
        }
        match check_conflict(candidate, intervals) {
            ConflictOutcome::Clear => ScheduleGate::Ready,
            other => ScheduleGate::Conflict(other),
        }
    }

    /// Advance the session. Pure apart from tracing; returns the effects the
    /// caller must execute.
    pub fn apply(&mut self, event: BookingEvent) -> Vec<BookingEffect> {
        if self.step == BookingStep::Closed {
            debug!(?event, "event after close ignored");
            return Vec::new();
        }
        match event {
            BookingEvent::Next => self.advance(),
            BookingEvent::Back => {
                self.step = match self.step {
                    BookingStep::Details => BookingStep::Schedule,
                    BookingStep::Schedule => BookingStep::Addons,
                    other => other,
                };
                Vec::new()
            }
            BookingEvent::SetAddon { id, quantity } => {
                if quantity == 0 {
                    self.draft.addons.remove(&id);
                } else {
                    self.draft.addons.insert(id, quantity);
                }
                Vec::new()
            }
            BookingEvent::SelectDate(date) => self.select_date(date),
            BookingEvent::RetryFetch => {
                if let AvailabilityView::Stale { date, .. } = self.availability {
                    self.availability = AvailabilityView::Loading { date };
                    vec![BookingEffect::FetchSlots(date)]
                } else {
                    Vec::new()
                }
            }
            BookingEvent::SlotsLoaded { date, slots } => {
                self.slots_loaded(date, &slots);
                Vec::new()
            }
            BookingEvent::SlotsFailed { date } => {
                self.slots_failed(date);
                Vec::new()
            }
            BookingEvent::SetStart(start) => {
                self.draft.selection.start = Some(start);
                Vec::new()
            }
            BookingEvent::SetEnd(end) => {
                self.draft.selection.end = Some(end);
                Vec::new()
            }
            BookingEvent::SetContact { name, phone } => {
                self.draft.name = name;
                self.draft.phone = phone;
                Vec::new()
            }
            BookingEvent::Submit => self.submit(),
            BookingEvent::SlotPersisted { id } => self.slot_persisted(id),
            BookingEvent::SlotReleased => Vec::new(),
            BookingEvent::SubmitSucceeded => {
                self.submitting = false;
                self.last_error = None;
                self.step = BookingStep::Closed;
                Vec::new()
            }
            BookingEvent::SubmitFailed(err) => {
                // Draft stays intact; the user may retry.
                warn!(%err, "booking submission failed");
                self.submitting = false;
                self.last_error = Some(SlotError::Gateway(err));
                Vec::new()
            }
        }
    }

    fn advance(&mut self) -> Vec<BookingEffect> {
        match self.step {
            BookingStep::Addons => {
                self.step = BookingStep::Schedule;
            }
            BookingStep::Schedule => {
                if self.schedule_gate() == ScheduleGate::Ready {
                    self.step = BookingStep::Details;
                } else {
                    debug!(gate = ?self.schedule_gate(), "schedule gate holds");
                }
            }
            // Details advances only through Submit.
            BookingStep::Details | BookingStep::Closed => {}
        }
        Vec::new()
    }

    fn select_date(&mut self, date: NaiveDate) -> Vec<BookingEffect> {
        if date < self.today {
            debug!(%date, "past date refused");
            return Vec::new();
        }
        self.draft.selected_date = Some(date);
        // A new date invalidates the picked times and anything we knew about
        // the old date's slots.
        self.draft.selection.clear();
        self.availability = AvailabilityView::Loading { date };
        vec![BookingEffect::FetchSlots(date)]
    }

    fn slots_loaded(&mut self, date: NaiveDate, slots: &[BookedSlot]) {
        if self.draft.selected_date != Some(date) {
            debug!(%date, "discarding slot fetch for unselected date");
            return;
        }
        match decode_slots(slots) {
            Ok(intervals) => {
                self.availability = AvailabilityView::Loaded { date, intervals };
            }
            Err(err) => {
                warn!(%date, %err, "malformed slot record; keeping prior data");
                self.slots_failed(date);
            }
        }
    }

    fn slots_failed(&mut self, date: NaiveDate) {
        if self.draft.selected_date != Some(date) {
            debug!(%date, "discarding failed fetch for unselected date");
            return;
        }
        let last_known = self.availability.known_intervals();
        self.availability = AvailabilityView::Stale { date, last_known };
    }

    fn submit(&mut self) -> Vec<BookingEffect> {
        if self.step != BookingStep::Details || self.submitting {
            return Vec::new();
        }
        // Re-check the guard: the slot set may have changed since Schedule.
        if self.schedule_gate() != ScheduleGate::Ready {
            debug!(gate = ?self.schedule_gate(), "submit refused by gate");
            return Vec::new();
        }
        let (Some(date), Some(interval)) =
            (self.draft.selected_date, self.draft.selection.complete())
        else {
            return Vec::new();
        };
        self.submitting = true;
        self.last_error = None;

        let time_slot = interval.to_wire();
        match self.persisted.take() {
            // An earlier attempt already occupied this exact slot; only the
            // inquiry half remains.
            Some(prior) if prior.date == date && prior.time_slot == time_slot => {
                self.persisted = Some(prior);
                vec![BookingEffect::SendInquiry(self.build_inquiry(date, interval))]
            }
            // The draft moved to a different slot after a partial failure;
            // free the stranded one before occupying the new one.
            Some(prior) => vec![
                BookingEffect::ReleaseSlot(prior.id),
                BookingEffect::PersistSlot { date, time_slot },
            ],
            None => vec![BookingEffect::PersistSlot { date, time_slot }],
        }
    }

    fn slot_persisted(&mut self, id: u64) -> Vec<BookingEffect> {
        let (Some(date), Some(interval)) =
            (self.draft.selected_date, self.draft.selection.complete())
        else {
            return Vec::new();
        };
        self.persisted = Some(PersistedSlot {
            id,
            date,
            time_slot: interval.to_wire(),
        });
        if !self.submitting {
            return Vec::new();
        }
        vec![BookingEffect::SendInquiry(self.build_inquiry(date, interval))]
    }

    fn build_inquiry(&self, date: NaiveDate, interval: TimeInterval) -> Inquiry {
        Inquiry {
            name: self.draft.name.clone(),
            contact: self.draft.phone.clone(),
            kind: "Booking".to_string(),
            message: self.summary_message(date, interval),
        }
    }

    /// Assemble the human-readable booking summary handed to the inquiry
    /// collaborator.
    fn summary_message(&self, date: NaiveDate, interval: TimeInterval) -> String {
        let addons = self
            .draft
            .addons
            .iter()
            .filter_map(|(id, qty)| {
                let addon = self.catalog.iter().find(|a| a.id == *id)?;
                Some(match addon.kind {
                    AddOnKind::Quantity => format!("{} (x{qty})", addon.name),
                    AddOnKind::Checkbox => addon.name.clone(),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");
        let addons = if addons.is_empty() {
            "None".to_string()
        } else {
            addons
        };

        format!(
            "*New Booking Inquiry*\n\
             *Type:* {mode}\n\
             *Decoration:* {decoration}\n\
             *Setup:* {setup}\n\
             *Plan:* {plan}\n\
             *Add-ons:* {addons}\n\
             *Date:* {date}\n\
             *Time Slot:* {slot}\n\
             \n\
             *Customer Details:*\n\
             Name: {name}\n\
             Phone: {phone}",
            mode = self.package.mode,
            decoration = self.package.decoration,
            setup = self.package.setup.as_deref().unwrap_or("General"),
            plan = self.package.plan,
            addons = addons,
            date = date,
            slot = interval,
            name = self.draft.name,
            phone = self.draft.phone,
        )
    }
}

/// Execute one effect against the gateway and produce the follow-up event.
///
/// Submission persists the slot first — the store is the final arbiter and
/// may reject a create even after a client-side clear — then hands off the
/// inquiry. Either failure becomes a retryable [`BookingEvent::SubmitFailed`]
/// with the draft untouched; the session remembers a successful persist, so
/// retrying after a failed inquiry re-sends only the inquiry.
pub async fn drive(gateway: &dyn AvailabilityGateway, effect: BookingEffect) -> BookingEvent {
    match effect {
        BookingEffect::FetchSlots(date) => match gateway.fetch_booked_slots(date).await {
            Ok(slots) => BookingEvent::SlotsLoaded { date, slots },
            Err(err) => {
                warn!(%date, %err, "slot fetch failed");
                BookingEvent::SlotsFailed { date }
            }
        },
        BookingEffect::PersistSlot { date, time_slot } => {
            match gateway.create_booked_slot(date, &time_slot).await {
                Ok(slot) => BookingEvent::SlotPersisted { id: slot.id },
                Err(err) => {
                    warn!(%date, %err, "slot persistence refused");
                    BookingEvent::SubmitFailed(err)
                }
            }
        }
        BookingEffect::SendInquiry(inquiry) => match gateway.submit_inquiry(&inquiry).await {
            Ok(()) => BookingEvent::SubmitSucceeded,
            Err(err) => BookingEvent::SubmitFailed(err),
        },
        BookingEffect::ReleaseSlot(id) => {
            if let Err(err) = gateway.delete_booked_slot(id).await {
                warn!(id, %err, "stale slot release failed");
            }
            BookingEvent::SlotReleased
        }
    }
}
