//! Validation for case create requests and update patches.

use super::{Validatable, ValidationResult, ValidationRules, ValidatorExt};
use caseflow_domain::assessment::{FORM_SCORE_MAX, FORM_SCORE_MIN, SUB_SCORE_MAX, SUB_SCORE_MIN};
use caseflow_domain::case::{CaseKind, Counterparty};
use caseflow_domain::identifiers::EmployeeId;
use caseflow_domain::patch::{AdminAssessmentPatch, CasePatch, UserAssessmentPatch};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Maximum length for the case title
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Maximum length for free-text fields (description, notes)
pub const MAX_TEXT_LENGTH: u64 = 4000;

/// Maximum length for the CRM reference code
pub const MAX_CRM_CODE_LENGTH: u64 = 64;

/// Request to create a new case.
///
/// A case is always created as `Received`; completion only ever happens
/// through updates, so neither a status nor an end date can be supplied here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCaseRequest {
    pub kind: CaseKind,

    #[validate(length(min = 1, max = "MAX_TITLE_LENGTH", message = "Title is required and must be at most 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = "MAX_TEXT_LENGTH", message = "Description is required and must be at most 4000 characters"))]
    pub description: String,

    pub requester: EmployeeId,
    pub handler: EmployeeId,

    #[serde(default)]
    pub counterparty: Option<Counterparty>,

    pub start_date: DateTime<Utc>,

    #[serde(default)]
    pub in_progress_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(length(max = "MAX_TEXT_LENGTH", message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,

    #[serde(default)]
    #[validate(length(max = "MAX_CRM_CODE_LENGTH", message = "CRM reference code must be at most 64 characters"))]
    pub crm_reference_code: Option<String>,

    /// Sub-scores the requester supplies up front, if any.
    #[serde(default)]
    pub user_assessment: UserAssessmentPatch,
}

impl Validatable for CreateCaseRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();
        result.merge(validate_counterparty(self.kind, self.counterparty.as_ref()));
        result.merge(validate_user_patch_bounds(&self.user_assessment));
        result
    }
}

/// Check that a counterparty fits the kind's registry entry.
pub fn validate_counterparty(
    kind: CaseKind,
    counterparty: Option<&Counterparty>,
) -> ValidationResult {
    let mut result = ValidationResult::success();

    match (kind.counterparty_role(), counterparty) {
        (None, Some(_)) => {
            result.add_field_error(
                "counterparty",
                format!("{} cases do not take a counterparty", kind.display_name()),
            );
        }
        (Some(expected), Some(actual)) if actual.role != expected => {
            result.add_field_error(
                "counterparty",
                format!(
                    "{} cases take a {:?} counterparty, got {:?}",
                    kind.display_name(),
                    expected,
                    actual.role
                ),
            );
        }
        _ => {}
    }

    result
}

/// Bounds check for every sub-score the user patch sets.
pub fn validate_user_patch_bounds(patch: &UserAssessmentPatch) -> ValidationResult {
    let mut result = ValidationResult::success();

    let regular = [
        ("user_assessment.difficulty", patch.difficulty),
        ("user_assessment.estimated_time", patch.estimated_time),
        ("user_assessment.impact", patch.impact),
        ("user_assessment.urgency", patch.urgency),
    ];
    for (field, value) in regular {
        if let Some(&v) = value.as_set() {
            result.merge(ValidationRules::validate_sub_score(
                v,
                field,
                SUB_SCORE_MIN,
                SUB_SCORE_MAX,
            ));
        }
    }

    if let Some(&v) = patch.form_score.as_set() {
        result.merge(ValidationRules::validate_sub_score(
            v,
            "user_assessment.form_score",
            FORM_SCORE_MIN,
            FORM_SCORE_MAX,
        ));
    }

    result
}

/// Bounds check for every sub-score the admin patch sets.
pub fn validate_admin_patch_bounds(patch: &AdminAssessmentPatch) -> ValidationResult {
    let mut result = ValidationResult::success();

    let fields = [
        ("admin_assessment.difficulty", patch.difficulty),
        ("admin_assessment.estimated_time", patch.estimated_time),
        ("admin_assessment.impact", patch.impact),
        ("admin_assessment.urgency", patch.urgency),
    ];
    for (field, value) in fields {
        if let Some(&v) = value.as_set() {
            result.merge(ValidationRules::validate_sub_score(
                v,
                field,
                SUB_SCORE_MIN,
                SUB_SCORE_MAX,
            ));
        }
    }

    result
}

impl Validatable for CasePatch {
    fn validate_all(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        if let Some(title) = &self.title {
            result.merge(ValidationRules::validate_length(
                title,
                "title",
                Some(1),
                Some(MAX_TITLE_LENGTH as usize),
            ));
        }

        if let Some(description) = &self.description {
            result.merge(ValidationRules::validate_length(
                description,
                "description",
                Some(1),
                Some(MAX_TEXT_LENGTH as usize),
            ));
        }

        if let Some(notes) = self.notes.as_set() {
            result.merge(ValidationRules::validate_length(
                notes,
                "notes",
                None,
                Some(MAX_TEXT_LENGTH as usize),
            ));
        }

        if let Some(code) = self.crm_reference_code.as_set() {
            result.merge(ValidationRules::validate_length(
                code,
                "crm_reference_code",
                None,
                Some(MAX_CRM_CODE_LENGTH as usize),
            ));
        }

        result.merge(validate_user_patch_bounds(&self.user_assessment));
        result.merge(validate_admin_patch_bounds(&self.admin_assessment));

        result
    }
}
