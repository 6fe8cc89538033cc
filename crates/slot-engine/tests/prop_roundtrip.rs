//! Property-based tests for the time grammar and the overlap algebra.
//!
//! These verify invariants that should hold for *any* well-formed input, not
//! just the examples in the unit test files.

use proptest::prelude::*;
use slot_engine::{check_conflict, ConflictOutcome, TimeInterval, TimeOfDay};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_meridiem() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("AM"), Just("PM")]
}

/// Any well-formed time string, zero-padded or not.
fn arb_time_string() -> impl Strategy<Value = String> {
    (1u16..=12, 0u16..=59, arb_meridiem(), any::<bool>()).prop_map(
        |(hour, minute, meridiem, padded)| {
            if padded {
                format!("{hour:02}:{minute:02} {meridiem}")
            } else {
                format!("{hour}:{minute:02} {meridiem}")
            }
        },
    )
}

fn arb_time() -> impl Strategy<Value = TimeOfDay> {
    (0u16..1440).prop_map(|m| TimeOfDay::from_minutes(m).unwrap())
}

/// Any interval value, valid or not.
fn arb_interval() -> impl Strategy<Value = TimeInterval> {
    (arb_time(), arb_time()).prop_map(|(start, end)| TimeInterval::new(start, end))
}

/// A strictly increasing pair, i.e. a valid interval.
fn arb_valid_interval() -> impl Strategy<Value = TimeInterval> {
    (0u16..1439)
        .prop_flat_map(|start| (Just(start), (start + 1)..1440))
        .prop_map(|(start, end)| {
            TimeInterval::new(
                TimeOfDay::from_minutes(start).unwrap(),
                TimeOfDay::from_minutes(end).unwrap(),
            )
        })
}

fn normalize(text: &str) -> String {
    // Zero-pad the hour; minutes in the grammar are already two digits.
    match text.split_once(':') {
        Some((hour, rest)) if hour.len() == 1 => format!("0{hour}:{rest}"),
        _ => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Time grammar round-trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn format_after_parse_normalizes(text in arb_time_string()) {
        let parsed = TimeOfDay::parse(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), normalize(&text));
    }

    #[test]
    fn parse_after_format_is_identity(time in arb_time()) {
        let reparsed = TimeOfDay::parse(&time.to_string()).unwrap();
        prop_assert_eq!(reparsed, time);
    }

    #[test]
    fn wire_round_trip_is_identity(interval in arb_interval()) {
        let reparsed = TimeInterval::parse_wire(&interval.to_wire()).unwrap();
        prop_assert_eq!(reparsed, interval);
    }
}

// ---------------------------------------------------------------------------
// Overlap algebra
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn overlap_is_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn valid_intervals_overlap_themselves(a in arb_valid_interval()) {
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn invalid_intervals_overlap_nothing(
        start in 0u16..1440,
        shrink in 0u16..1440,
        other in arb_interval(),
    ) {
        // start >= end, including zero-length.
        let end = start.saturating_sub(shrink);
        let inverted = TimeInterval::new(
            TimeOfDay::from_minutes(start).unwrap(),
            TimeOfDay::from_minutes(end).unwrap(),
        );
        prop_assert!(!inverted.overlaps(&other));
    }

    #[test]
    fn touching_intervals_never_overlap(
        (a, b, c) in (0u16..1438)
            .prop_flat_map(|a| ((a + 1)..1439).prop_flat_map(move |b| {
                (Just(a), Just(b), (b + 1)..1440)
            }))
    ) {
        let left = TimeInterval::new(
            TimeOfDay::from_minutes(a).unwrap(),
            TimeOfDay::from_minutes(b).unwrap(),
        );
        let right = TimeInterval::new(
            TimeOfDay::from_minutes(b).unwrap(),
            TimeOfDay::from_minutes(c).unwrap(),
        );
        prop_assert!(!left.overlaps(&right));
    }
}

// ---------------------------------------------------------------------------
// Conflict checker invariants
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn invalid_range_wins_regardless_of_existing(
        start in 0u16..1440,
        shrink in 0u16..1440,
        existing in proptest::collection::vec(arb_valid_interval(), 0..8),
    ) {
        let end = start.saturating_sub(shrink);
        let candidate = TimeInterval::new(
            TimeOfDay::from_minutes(start).unwrap(),
            TimeOfDay::from_minutes(end).unwrap(),
        );
        prop_assert_eq!(
            check_conflict(candidate, &existing),
            ConflictOutcome::InvalidRange
        );
    }

    #[test]
    fn clear_means_no_pairwise_overlap(
        candidate in arb_valid_interval(),
        existing in proptest::collection::vec(arb_valid_interval(), 0..8),
    ) {
        match check_conflict(candidate, &existing) {
            ConflictOutcome::Clear => {
                prop_assert!(existing.iter().all(|e| !candidate.overlaps(e)));
            }
            ConflictOutcome::Overlaps(hits) => {
                prop_assert!(!hits.is_empty());
                prop_assert!(hits.iter().all(|h| candidate.overlaps(h)));
            }
            ConflictOutcome::InvalidRange => {
                prop_assert!(false, "valid candidate reported as invalid range");
            }
        }
    }
}
