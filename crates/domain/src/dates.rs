//! Date consistency rules for case records.
//!
//! The lifecycle service runs [`validate`] before any write that touches
//! dates or status. The rules are deliberately minimal: past dates are
//! allowed, and only the ordering of the end date against the other two
//! timestamps is checked.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Violation of a date ordering rule.
///
/// The two variants are surfaced verbatim to the caller; each carries a
/// specific, actionable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateRuleError {
    #[error("end date must be later than the start date")]
    EndBeforeStart,

    #[error("end date must be later than the in-progress timestamp")]
    EndBeforeInProgress,
}

/// Check the date invariants for a case.
///
/// If `end` is present it must be strictly greater than `start`, and strictly
/// greater than `in_progress_at` when that is also present. No end date means
/// nothing to check. Pure; no side effects.
pub fn validate(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    in_progress_at: Option<DateTime<Utc>>,
) -> Result<(), DateRuleError> {
    let Some(end) = end else {
        return Ok(());
    };

    if end <= start {
        return Err(DateRuleError::EndBeforeStart);
    }

    if let Some(in_progress) = in_progress_at {
        if end <= in_progress {
            return Err(DateRuleError::EndBeforeInProgress);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn test_no_end_date_is_always_ok() {
        assert!(validate(at(9), None, None).is_ok());
        assert!(validate(at(9), None, Some(at(8))).is_ok());
    }

    #[test]
    fn test_end_after_start_is_ok() {
        assert!(validate(at(9), Some(at(10)), None).is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert_eq!(
            validate(at(9), Some(at(8)), None),
            Err(DateRuleError::EndBeforeStart)
        );
    }

    #[test]
    fn test_end_equal_to_start_rejected() {
        assert_eq!(
            validate(at(9), Some(at(9)), None),
            Err(DateRuleError::EndBeforeStart)
        );
    }

    #[test]
    fn test_end_before_in_progress_rejected_even_when_after_start() {
        assert_eq!(
            validate(at(9), Some(at(11)), Some(at(12))),
            Err(DateRuleError::EndBeforeInProgress)
        );
    }

    #[test]
    fn test_end_after_both_is_ok() {
        assert!(validate(at(9), Some(at(13)), Some(at(12))).is_ok());
    }

    #[test]
    fn test_past_dates_allowed() {
        let start = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(1999, 1, 2, 0, 0, 0).unwrap();
        assert!(validate(start, Some(end), None).is_ok());
    }
}
