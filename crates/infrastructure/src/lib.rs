//! Infrastructure layer for Caseflow
//!
//! This crate provides implementations for:
//! - Database access (PostgreSQL with sqlx)
//! - Case repository with transactional cascade delete
//! - Redis job queue (producer side) and the queue-backed event publisher
//! - HTTP adapters for the personnel, partner, notification and chat-webhook
//!   collaborators
//!
//! ## Architecture
//!
//! The infrastructure layer implements the ports declared by the application
//! layer, so concrete data access and transport can be swapped for testing.

pub mod database;
pub mod events;
pub mod external_consumers;
pub mod queue;
pub mod repositories;

// Re-export commonly used types
pub use database::{DatabaseConfig, DatabasePool, HealthStatus, PoolStats, TransactionExt};
pub use events::QueueEventPublisher;
pub use queue::{
    CaseCreatedFanoutJob, Job, JobPriority, JobProducer, JobStatus, JobType, NotificationChannel,
    SendNotificationJob,
};
pub use repositories::{CaseRepository, PgCaseRepository};

// Re-export external consumer types
pub use external_consumers::{
    ExternalConsumerError, ExternalConsumerResult, NotificationConsumer, NotificationConsumerConfig,
    PartnerConsumer, PartnerConsumerConfig, PersonnelConsumer, PersonnelConsumerConfig,
    ServiceHealth, TelegramConfig, TelegramNotifier,
};

use caseflow_application::ApplicationError;
use caseflow_domain::errors::PersistenceError;

pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Queue errors from Redis
    #[error("Queue error: {0}")]
    Queue(#[from] redis::RedisError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout errors
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Queue(_) | Error::Connection(_) | Error::Timeout(_)
        )
    }
}

impl From<Error> for ApplicationError {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound(message) => ApplicationError::NotFound(message),
            Error::Configuration(message) => ApplicationError::InvalidInput(message),
            Error::Timeout(message) => ApplicationError::Timeout(message),
            Error::Connection(message) => ApplicationError::ServiceUnavailable(message),
            Error::Database(e) => {
                PersistenceError::QueryFailed(e.to_string()).into()
            }
            Error::Queue(e) => ApplicationError::ServiceUnavailable(format!("queue: {}", e)),
            Error::Serialization(e) => {
                PersistenceError::Serialization(e.to_string()).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let db_err = Error::Database(sqlx::Error::PoolTimedOut);
        assert!(db_err.is_retryable());

        let not_found = Error::NotFound("case".to_string());
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_error_maps_to_application_status() {
        let err: ApplicationError = Error::NotFound("case".to_string()).into();
        assert_eq!(err.http_status(), 404);

        let err: ApplicationError = Error::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.http_status(), 500);

        let err: ApplicationError = Error::Timeout("personnel".to_string()).into();
        assert!(err.is_retryable());
    }
}
