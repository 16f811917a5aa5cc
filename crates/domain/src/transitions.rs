//! Status transition resolution.
//!
//! The resolver never fails: inconsistent date combinations are rejected by
//! [`crate::dates::validate`] before a transition is applied. Two rules live
//! here:
//!
//! 1. An explicitly requested status is accepted as-is. The source system
//!    never enforced strict adjacency and downstream tooling depends on that
//!    permissiveness, so a non-documented edge is logged and allowed rather
//!    than rejected.
//! 2. Auto-promotion: a patch that sets an end date forces `Completed` when
//!    the status would otherwise stay non-terminal. An explicit `Cancelled`
//!    request takes precedence; cancellation may carry an end date without
//!    being reinterpreted as completion.

use crate::case::CaseStatus;
use tracing::warn;

/// Outcome of resolving a status patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResolution {
    pub status: CaseStatus,
    /// True when rule 2 fired and overrode the otherwise-resolved status.
    pub auto_promoted: bool,
}

/// Resolve the final status for an update.
///
/// `requested` is the explicit status from the patch, if any; `end_date_set`
/// is true when the same patch writes a (non-null) end date. Writing
/// `in_progress_at` alone never advances the status.
pub fn resolve(
    current: CaseStatus,
    requested: Option<CaseStatus>,
    end_date_set: bool,
) -> StatusResolution {
    let resolved = match requested {
        Some(target) if target != current => {
            if !current.is_documented_edge(target) {
                warn!(
                    from = current.display_name(),
                    to = target.display_name(),
                    "status change outside the documented edges, accepting as-is"
                );
            }
            target
        }
        _ => current,
    };

    if end_date_set && !resolved.is_terminal() {
        return StatusResolution {
            status: CaseStatus::Completed,
            auto_promoted: true,
        };
    }

    StatusResolution {
        status: resolved,
        auto_promoted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_patch_keeps_status() {
        let res = resolve(CaseStatus::Received, None, false);
        assert_eq!(res.status, CaseStatus::Received);
        assert!(!res.auto_promoted);
    }

    #[test]
    fn test_explicit_forward_transition() {
        let res = resolve(CaseStatus::Received, Some(CaseStatus::InProgress), false);
        assert_eq!(res.status, CaseStatus::InProgress);
    }

    #[test]
    fn test_non_documented_edge_still_accepted() {
        // Permissiveness is intentional; see module docs.
        let res = resolve(CaseStatus::Completed, Some(CaseStatus::Received), false);
        assert_eq!(res.status, CaseStatus::Received);
    }

    #[test]
    fn test_end_date_promotes_received() {
        let res = resolve(CaseStatus::Received, None, true);
        assert_eq!(res.status, CaseStatus::Completed);
        assert!(res.auto_promoted);
    }

    #[test]
    fn test_end_date_promotes_in_progress() {
        let res = resolve(CaseStatus::InProgress, None, true);
        assert_eq!(res.status, CaseStatus::Completed);
        assert!(res.auto_promoted);
    }

    #[test]
    fn test_explicit_cancel_beats_auto_promotion() {
        let res = resolve(CaseStatus::InProgress, Some(CaseStatus::Cancelled), true);
        assert_eq!(res.status, CaseStatus::Cancelled);
        assert!(!res.auto_promoted);
    }

    #[test]
    fn test_end_date_on_terminal_status_is_noop() {
        let res = resolve(CaseStatus::Cancelled, None, true);
        assert_eq!(res.status, CaseStatus::Cancelled);
        assert!(!res.auto_promoted);
    }
}
