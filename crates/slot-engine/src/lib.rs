//! # slot-engine
//!
//! Time-slot scheduling core for a single-venue event-booking front end:
//! customers reserve a date and time window, an administrator blocks and
//! unblocks availability, and both share one conflict timeline per date.
//!
//! The scheduling logic itself — time parsing, overlap testing, conflict
//! checking, calendar generation, session transitions — is pure and
//! synchronous. I/O happens only at the [`gateway`] boundary, where the
//! external booking store remains the final arbiter of every reservation.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::{check_conflict, ConflictOutcome, TimeInterval, TimeOfDay};
//!
//! let candidate = TimeInterval::new(
//!     TimeOfDay::parse("10:00 AM").unwrap(),
//!     TimeOfDay::parse("01:00 PM").unwrap(),
//! );
//! let existing = vec![TimeInterval::parse_wire("09:00 AM - 11:00 AM").unwrap()];
//!
//! match check_conflict(candidate, &existing) {
//!     ConflictOutcome::Overlaps(with) => assert_eq!(with, existing),
//!     outcome => panic!("expected an overlap, got {outcome:?}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`clock`] — 12-hour time strings ↔ minute-of-day values
//! - [`interval`] — half-open time windows, overlap test, wire codec
//! - [`conflict`] — candidate-vs-existing conflict checking
//! - [`calendar`] — month grids for the date picker
//! - [`session`] — customer booking flow state machine
//! - [`admin`] — administrator slot-blocking state machine
//! - [`gateway`] — async boundary to the external booking store
//! - [`error`] — error types

pub mod admin;
pub mod calendar;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod gateway;
pub mod interval;
pub mod session;

pub use admin::{drive_admin, AdminEffect, AdminEvent, AdminPhase, AdminSession};
pub use calendar::{month_grid, CalendarCell, CalendarDay, MonthCursor};
pub use clock::TimeOfDay;
pub use conflict::{check_conflict, ConflictOutcome};
pub use error::{Result, SlotError};
pub use gateway::{AvailabilityGateway, BookedSlot, GatewayError, Inquiry};
pub use interval::{IntervalSelection, TimeInterval};
pub use session::{
    drive, AddOn, AddOnKind, AvailabilityView, BookingDraft, BookingEffect, BookingEvent,
    BookingSession, BookingStep, PackageSelection, ScheduleGate, VenueMode,
};
