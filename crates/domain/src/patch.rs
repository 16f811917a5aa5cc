//! Tri-state patch types for partial case updates.
//!
//! A JSON merge patch needs to distinguish three cases per field: the key is
//! missing (leave the field alone), the key is `null` (clear the field), or
//! the key carries a value (replace the field). [`Field`] makes that tri-state
//! explicit instead of relying on dynamic `undefined` checks.

use crate::assessment::{AdminAssessment, UserAssessment};
use crate::case::{CaseStatus, Counterparty};
use crate::identifiers::EmployeeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a partial update: keep, clear, or set.
///
/// Deserializes from an optional JSON value: an absent key must be mapped to
/// `Keep` by the containing struct (`#[serde(default)]`), `null` becomes
/// `Clear`, anything else becomes `Set`. When serializing, `Keep` fields are
/// expected to be skipped (`skip_serializing_if = "Field::is_keep"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Field<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Clone> Field<T> {
    /// Resolve the field against the current stored value.
    pub fn apply(&self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Keep has no wire representation of its own; callers skip it.
            Self::Keep | Self::Clear => serializer.serialize_none(),
            Self::Set(value) => serializer.serialize_some(value),
        }
    }
}

/// Partial update for the user assessment block, one tri-state per sub-score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAssessmentPatch {
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub difficulty: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub estimated_time: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub impact: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub urgency: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub form_score: Field<u8>,
}

impl UserAssessmentPatch {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_keep()
            && self.estimated_time.is_keep()
            && self.impact.is_keep()
            && self.urgency.is_keep()
            && self.form_score.is_keep()
    }

    /// Merge into `block`. Returns true iff at least one sub-score value
    /// actually changed (drives the assessment timestamp).
    pub fn apply(&self, block: &mut UserAssessment) -> bool {
        let before = *block;
        block.difficulty = self.difficulty.apply(block.difficulty);
        block.estimated_time = self.estimated_time.apply(block.estimated_time);
        block.impact = self.impact.apply(block.impact);
        block.urgency = self.urgency.apply(block.urgency);
        block.form_score = self.form_score.apply(block.form_score);

        UserAssessment {
            assessed_at: before.assessed_at,
            ..*block
        } != before
    }
}

/// Partial update for the admin assessment block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminAssessmentPatch {
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub difficulty: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub estimated_time: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub impact: Field<u8>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub urgency: Field<u8>,
}

impl AdminAssessmentPatch {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_keep()
            && self.estimated_time.is_keep()
            && self.impact.is_keep()
            && self.urgency.is_keep()
    }

    /// Merge into `block`. Returns true iff at least one sub-score value
    /// actually changed.
    pub fn apply(&self, block: &mut AdminAssessment) -> bool {
        let before = *block;
        block.difficulty = self.difficulty.apply(block.difficulty);
        block.estimated_time = self.estimated_time.apply(block.estimated_time);
        block.impact = self.impact.apply(block.impact);
        block.urgency = self.urgency.apply(block.urgency);

        AdminAssessment {
            assessed_at: before.assessed_at,
            ..*block
        } != before
    }
}

/// Partial update for a case.
///
/// `Option` fields are replace-only (they are required on the record and
/// cannot be cleared); `Field` fields are genuinely optional on the record
/// and support the full keep/clear/set tri-state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub counterparty: Field<Counterparty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub in_progress_at: Field<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub end_date: Field<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub notes: Field<String>,
    #[serde(skip_serializing_if = "Field::is_keep")]
    pub crm_reference_code: Field<String>,
    pub user_assessment: UserAssessmentPatch,
    pub admin_assessment: AdminAssessmentPatch,
    /// When present, the update only succeeds if the stored revision still
    /// matches (optimistic locking). Absent preserves last-writer-wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_revision: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Payload {
        value: Field<String>,
    }

    #[test]
    fn test_missing_key_is_keep() {
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert!(payload.value.is_keep());
    }

    #[test]
    fn test_null_is_clear() {
        let payload: Payload = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert!(payload.value.is_clear());
    }

    #[test]
    fn test_value_is_set() {
        let payload: Payload = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(payload.value.as_set().map(String::as_str), Some("x"));
    }

    #[test]
    fn test_field_apply() {
        assert_eq!(Field::<u8>::Keep.apply(Some(3)), Some(3));
        assert_eq!(Field::<u8>::Clear.apply(Some(3)), None);
        assert_eq!(Field::Set(5u8).apply(Some(3)), Some(5));
        assert_eq!(Field::Set(5u8).apply(None), Some(5));
    }

    #[test]
    fn test_assessment_patch_reports_change() {
        let mut block = UserAssessment::default();
        let patch = UserAssessmentPatch {
            difficulty: Field::Set(3),
            ..Default::default()
        };
        assert!(patch.apply(&mut block));
        assert_eq!(block.difficulty, Some(3));

        // Re-applying the same value is not a change.
        assert!(!patch.apply(&mut block));
    }

    #[test]
    fn test_clearing_a_sub_score_is_a_change() {
        let mut block = AdminAssessment {
            impact: Some(4),
            ..Default::default()
        };
        let patch = AdminAssessmentPatch {
            impact: Field::Clear,
            ..Default::default()
        };
        assert!(patch.apply(&mut block));
        assert_eq!(block.impact, None);
    }

    #[test]
    fn test_case_patch_deserializes_tri_state() {
        let patch: CasePatch = serde_json::from_str(
            r#"{
                "title": "New title",
                "end_date": null,
                "notes": "checked with the vendor"
            }"#,
        )
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert!(patch.end_date.is_clear());
        assert!(patch.in_progress_at.is_keep());
        assert_eq!(patch.notes.as_set().map(String::as_str), Some("checked with the vendor"));
        assert!(patch.user_assessment.is_empty());
    }
}
