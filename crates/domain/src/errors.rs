//! Error types for the Caseflow domain.
//!
//! This module defines the error hierarchy for all core operations, providing
//! structured error information with HTTP status codes and error codes for
//! the enclosing API layer.

use crate::dates::DateRuleError;
use crate::identifiers::{CaseId, EmployeeId, PartnerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level application error type
///
/// This enum encompasses all possible error types that can occur within the
/// core, providing a unified error handling mechanism.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// Case-related errors
    #[error("Case error: {0}")]
    Case(#[from] CaseError),

    /// Date business-rule violations
    #[error("Date rule error: {0}")]
    DateRule(#[from] DateRuleError),

    /// Validation-related errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Dangling foreign references
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Authorization-related errors
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Store-level failures
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for this error
    ///
    /// Error codes are used in API responses for programmatic error handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Case(CaseError::NotFound(_)) => "CASE_NOT_FOUND",
            Self::Case(CaseError::RevisionConflict { .. }) => "REVISION_CONFLICT",
            Self::DateRule(_) => "DATE_RULE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Reference(_) => "REFERENCE_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Case(CaseError::NotFound(_)) => 404,
            Self::Case(CaseError::RevisionConflict { .. }) => 409,
            Self::DateRule(_) => 400,
            Self::Validation(_) => 400,
            Self::Reference(_) => 404,
            Self::Authorization(_) => 401,
            Self::Persistence(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Check if this error is retryable
    ///
    /// Retryable errors are transient store-level issues; business-rule
    /// rejections are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Case-specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaseError {
    /// Case not found
    #[error("Case not found: {0}")]
    NotFound(CaseId),

    /// Stored revision no longer matches the expected one
    #[error("Case was modified concurrently: expected revision {expected}, found {actual}")]
    RevisionConflict { expected: i64, actual: i64 },
}

/// Validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// Field validation failed
    #[error("Field validation failed: {field} - {message}")]
    FieldValidation { field: String, message: String },

    /// Required field missing or empty
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    /// Multiple validation errors
    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<String>),
}

/// Dangling foreign key errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReferenceError {
    /// Requester or handler does not resolve in the personnel directory
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Counterparty does not resolve in the partner registry
    #[error("Partner not found: {0}")]
    PartnerNotFound(PartnerId),
}

/// Authorization errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthorizationError {
    /// Authentication required
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Insufficient permissions for action
    #[error("Insufficient permissions for action: {action}")]
    InsufficientPermissions { action: String },
}

/// Store-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PersistenceError {
    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Transaction failed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Standardized API error response
///
/// This structure is returned in API responses to provide consistent error
/// information to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,

    /// Unique request identifier for tracing
    pub request_id: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

/// Detailed error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorDetail {
                code: error.error_code().to_string(),
                message: error.to_string(),
                details: None,
            },
            request_id: String::new(), // Set by middleware
            timestamp: Utc::now(),
        }
    }
}

/// Application-wide result type
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::Case(CaseError::NotFound(CaseId::new()));
        assert_eq!(err.error_code(), "CASE_NOT_FOUND");
        assert_eq!(err.http_status(), 404);

        let err = AppError::Authorization(AuthorizationError::AuthenticationRequired);
        assert_eq!(err.error_code(), "AUTHORIZATION_ERROR");
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_date_rule_errors_are_bad_request() {
        let err = AppError::DateRule(DateRuleError::EndBeforeStart);
        assert_eq!(err.http_status(), 400);
        let err = AppError::DateRule(DateRuleError::EndBeforeInProgress);
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_date_rule_variants_have_distinct_messages() {
        let a = AppError::DateRule(DateRuleError::EndBeforeStart).to_string();
        let b = AppError::DateRule(DateRuleError::EndBeforeInProgress).to_string();
        assert_ne!(a, b);
    }

    #[test]
    fn test_retryable() {
        let err = AppError::Persistence(PersistenceError::QueryFailed("down".to_string()));
        assert!(err.is_retryable());

        let err = AppError::Validation(ValidationError::MissingRequired("title".to_string()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = AppError::Case(CaseError::NotFound(CaseId::new()));
        let response = ErrorResponse::from(err);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("CASE_NOT_FOUND"));
    }
}
