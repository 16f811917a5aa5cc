//! Difficulty/effort assessment blocks.
//!
//! Every case carries two assessment blocks: the requester's self-assessment
//! and the administrator's override assessment. Sub-scores are small positive
//! integers; an absent sub-score means "not yet assessed" and is distinct from
//! zero everywhere in the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive bounds for the regular sub-scores.
pub const SUB_SCORE_MIN: u8 = 1;
pub const SUB_SCORE_MAX: u8 = 5;

/// Inclusive bounds for the user form score.
pub const FORM_SCORE_MIN: u8 = 1;
pub const FORM_SCORE_MAX: u8 = 2;

/// The requester's self-assessment of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_score: Option<u8>,
    /// Stamped by the lifecycle service whenever a sub-score of this block
    /// changes. Never caller-settable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessed_at: Option<DateTime<Utc>>,
}

impl UserAssessment {
    /// Sum of the present sub-scores; absent counts as 0.
    pub fn total(&self) -> u32 {
        [
            self.difficulty,
            self.estimated_time,
            self.impact,
            self.urgency,
            self.form_score,
        ]
        .iter()
        .flatten()
        .map(|&v| v as u32)
        .sum()
    }
}

/// The administrator's override assessment. No form dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<u8>,
    /// Stamped by the lifecycle service whenever a sub-score of this block
    /// changes. Never caller-settable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessed_at: Option<DateTime<Utc>>,
}

impl AdminAssessment {
    /// Sum of the present sub-scores; absent counts as 0.
    pub fn total(&self) -> u32 {
        [self.difficulty, self.estimated_time, self.impact, self.urgency]
            .iter()
            .flatten()
            .map(|&v| v as u32)
            .sum()
    }

    /// True iff all four sub-scores are present. Presence only; magnitude is
    /// irrelevant. This is what drives "needs evaluation" state downstream.
    pub fn is_complete(&self) -> bool {
        self.difficulty.is_some()
            && self.estimated_time.is_some()
            && self.impact.is_some()
            && self.urgency.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blocks_total_zero() {
        assert_eq!(UserAssessment::default().total(), 0);
        assert_eq!(AdminAssessment::default().total(), 0);
        assert!(!AdminAssessment::default().is_complete());
    }

    #[test]
    fn test_user_total_sums_present_scores() {
        let block = UserAssessment {
            difficulty: Some(3),
            estimated_time: Some(2),
            impact: Some(4),
            urgency: Some(5),
            form_score: Some(1),
            assessed_at: None,
        };
        assert_eq!(block.total(), 15);
    }

    #[test]
    fn test_partial_user_block_treats_absent_as_zero() {
        let block = UserAssessment {
            difficulty: Some(5),
            urgency: Some(2),
            ..Default::default()
        };
        assert_eq!(block.total(), 7);
    }

    #[test]
    fn test_admin_completeness_is_presence_only() {
        let mut block = AdminAssessment {
            difficulty: Some(1),
            estimated_time: Some(1),
            impact: Some(1),
            urgency: None,
            assessed_at: None,
        };
        assert!(!block.is_complete());

        block.urgency = Some(1);
        assert!(block.is_complete());
    }

    #[test]
    fn test_absent_scores_not_serialized() {
        let json = serde_json::to_string(&UserAssessment::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
