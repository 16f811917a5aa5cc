//! Tests for the date consistency rules.

use caseflow_domain::dates::{self, DateRuleError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

#[test]
fn test_no_end_date_always_passes() {
    assert!(dates::validate(ts(100), None, None).is_ok());
    assert!(dates::validate(ts(100), None, Some(ts(50))).is_ok());
}

#[test]
fn test_end_after_start_passes() {
    assert!(dates::validate(ts(100), Some(ts(101)), None).is_ok());
}

#[test]
fn test_end_equal_to_start_is_rejected() {
    assert_eq!(
        dates::validate(ts(100), Some(ts(100)), None),
        Err(DateRuleError::EndBeforeStart)
    );
}

#[test]
fn test_end_before_start_is_rejected() {
    assert_eq!(
        dates::validate(ts(100), Some(ts(99)), None),
        Err(DateRuleError::EndBeforeStart)
    );
}

#[test]
fn test_end_before_in_progress_is_rejected() {
    assert_eq!(
        dates::validate(ts(100), Some(ts(150)), Some(ts(200))),
        Err(DateRuleError::EndBeforeInProgress)
    );
}

#[test]
fn test_end_equal_to_in_progress_is_rejected() {
    assert_eq!(
        dates::validate(ts(100), Some(ts(150)), Some(ts(150))),
        Err(DateRuleError::EndBeforeInProgress)
    );
}

#[test]
fn test_start_before_in_progress_before_end_passes() {
    assert!(dates::validate(ts(100), Some(ts(300)), Some(ts(200))).is_ok());
}

#[test]
fn test_past_dates_are_allowed() {
    // The rules order dates relative to each other, never to the wall clock.
    let start = Utc::now() - Duration::days(400);
    let end = start + Duration::days(3);
    assert!(dates::validate(start, Some(end), None).is_ok());
}

#[test]
fn test_start_after_in_progress_is_not_checked() {
    // Only the end date participates in the ordering rules; an odd
    // in-progress stamp before the start date is tolerated.
    assert!(dates::validate(ts(200), Some(ts(300)), Some(ts(100))).is_ok());
}

proptest! {
    /// The validator accepts exactly when the end date is strictly after the
    /// start date and, if the in-progress stamp exists, strictly after it too.
    #[test]
    fn prop_validator_matches_ordering(
        start in 0i64..1_000_000,
        end in proptest::option::of(0i64..1_000_000),
        in_progress in proptest::option::of(0i64..1_000_000),
    ) {
        let result = dates::validate(ts(start), end.map(ts), in_progress.map(ts));
        let expected_ok = match end {
            None => true,
            Some(e) => e > start && in_progress.map_or(true, |p| e > p),
        };
        prop_assert_eq!(result.is_ok(), expected_ok);
    }

    /// When both rules are violated at once, the start-date rule wins.
    #[test]
    fn prop_start_rule_reported_first(
        start in 500i64..1_000_000,
        in_progress in 500i64..1_000_000,
        end in 0i64..500,
    ) {
        let result = dates::validate(ts(start), Some(ts(end)), Some(ts(in_progress)));
        prop_assert_eq!(result, Err(DateRuleError::EndBeforeStart));
    }
}
