//! External service consumers.
//!
//! Thin HTTP adapters for the services Caseflow depends on:
//! - Personnel directory: employee resolution and the active-admin roster
//! - Partner registry: counterparty resolution
//! - Notification service: per-employee notifications
//! - Telegram: the shared chat webhook for new cases
//!
//! All adapters carry explicit timeouts so a slow upstream cannot stall the
//! write path or the worker.

pub mod notification;
pub mod partner;
pub mod personnel;
pub mod telegram;

pub use notification::{NotificationConsumer, NotificationConsumerConfig};
pub use partner::{PartnerConsumer, PartnerConsumerConfig};
pub use personnel::{PersonnelConsumer, PersonnelConsumerConfig};
pub use telegram::{TelegramConfig, TelegramNotifier};

use caseflow_application::ApplicationError;
use caseflow_common::retry::RetryConfig;
use std::time::Duration;
use thiserror::Error;

/// Retry policy for idempotent lookups against the directories.
///
/// Writes (notifications, chat messages) are never retried here; the job
/// queue owns redelivery for those.
pub(crate) fn lookup_retry() -> RetryConfig {
    RetryConfig::exponential(2).with_max_delay(Duration::from_secs(2))
}

/// Errors from external consumer operations
#[derive(Error, Debug, Clone)]
pub enum ExternalConsumerError {
    /// Connection failed to external service
    #[error("Connection failed to {service}: {message}")]
    ConnectionFailed { service: String, message: String },

    /// Service unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid response from external service
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Timeout
    #[error("Timeout waiting for {service}")]
    Timeout { service: String },
}

impl ExternalConsumerError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExternalConsumerError::ConnectionFailed { .. }
                | ExternalConsumerError::ServiceUnavailable(_)
                | ExternalConsumerError::Timeout { .. }
        )
    }

    /// Classify a reqwest error for the given service.
    pub(crate) fn from_reqwest(service: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                service: service.to_string(),
            }
        } else if error.is_connect() {
            Self::ConnectionFailed {
                service: service.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::ServiceUnavailable(format!("{}: {}", service, error))
        }
    }
}

/// Result type for external consumer operations
pub type ExternalConsumerResult<T> = Result<T, ExternalConsumerError>;

impl From<ExternalConsumerError> for ApplicationError {
    fn from(error: ExternalConsumerError) -> Self {
        match error {
            ExternalConsumerError::NotFound(message) => ApplicationError::NotFound(message),
            ExternalConsumerError::ConfigurationError(message) => {
                ApplicationError::InvalidInput(message)
            }
            ExternalConsumerError::Timeout { service } => ApplicationError::Timeout(service),
            other => ApplicationError::ServiceUnavailable(other.to_string()),
        }
    }
}

/// Individual service health
#[derive(Debug, Clone)]
pub struct ServiceHealth {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Latency to service
    pub latency_ms: u64,
    /// Error message if unhealthy
    pub error: Option<String>,
}
