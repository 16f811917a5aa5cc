//! Application layer for Caseflow
//!
//! This crate orchestrates domain logic and coordinates between layers.
//!
//! ## Architecture
//!
//! The application layer sits between the domain and infrastructure layers,
//! providing use case orchestration and business logic coordination.
//!
//! ## Modules
//!
//! - `services` - Business logic services (CaseLifecycleService)
//! - `scoring` - Evaluation scoring engine
//! - `validation` - Input validation framework

pub mod scoring;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use scoring::{GrandTotal, ScoreReport, ScoringConfig, ScoringEngine};
pub use services::{
    CaseCollaboration, CaseLifecycleService, CaseQueryFilters, CaseRepositoryPort, CaseView,
    EmployeeRef, EventPublisher, NoOpEventPublisher, PartnerPort, PartnerRef, PersonnelPort,
    ServiceConfig, ServiceContext, ServiceEvent,
};
pub use validation::{Validatable, ValidationResult, ValidationRules};

use caseflow_common::datetime::now_utc;
use caseflow_domain::dates::DateRuleError;
use caseflow_domain::errors::{
    AppError, AuthorizationError, CaseError, ErrorDetail, ErrorResponse, PersistenceError,
    ReferenceError, ValidationError,
};
use thiserror::Error;

/// Application-level errors
///
/// Domain rule violations ride the [`AppError`] taxonomy and keep its error
/// codes and status mapping; the remaining variants cover conditions that
/// only exist at this layer or below (auth context, transport, stores).
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] AppError),

    /// Resource not found (infrastructure-level; case lookups use
    /// [`CaseError::NotFound`])
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Permission denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// External service unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl From<DateRuleError> for ApplicationError {
    fn from(error: DateRuleError) -> Self {
        Self::Domain(AppError::DateRule(error))
    }
}

impl From<CaseError> for ApplicationError {
    fn from(error: CaseError) -> Self {
        Self::Domain(AppError::Case(error))
    }
}

impl From<ValidationError> for ApplicationError {
    fn from(error: ValidationError) -> Self {
        Self::Domain(AppError::Validation(error))
    }
}

impl From<ReferenceError> for ApplicationError {
    fn from(error: ReferenceError) -> Self {
        Self::Domain(AppError::Reference(error))
    }
}

impl From<AuthorizationError> for ApplicationError {
    fn from(error: AuthorizationError) -> Self {
        Self::Domain(AppError::Authorization(error))
    }
}

impl From<PersistenceError> for ApplicationError {
    fn from(error: PersistenceError) -> Self {
        Self::Domain(AppError::Persistence(error))
    }
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::Domain(error) => error.http_status(),
            ApplicationError::NotFound(_) => 404,
            ApplicationError::Forbidden(_) => 403,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
            ApplicationError::Timeout(_) => 504,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ApplicationError::Domain(error) => error.is_retryable(),
            ApplicationError::ServiceUnavailable(_) | ApplicationError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::Domain(error) => error.error_code(),
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::Forbidden(_) => "FORBIDDEN",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApplicationError::Timeout(_) => "TIMEOUT",
        }
    }

    /// Build the wire envelope for this error
    pub fn to_response(&self, request_id: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: None,
            },
            request_id: request_id.into(),
            timestamp: now_utc(),
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
