//! Application Services
//!
//! Business logic orchestration layer that coordinates domain operations,
//! repository access, and cross-cutting concerns.

mod case;

pub use case::*;

use crate::ApplicationError;
use async_trait::async_trait;
use caseflow_domain::case::{CaseKind, CaseStatus};
use caseflow_domain::errors::AuthorizationError;
use caseflow_domain::identifiers::{CaseId, EmployeeId};
use serde::{Deserialize, Serialize};

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum page size for list operations
    pub max_page_size: u32,
    /// Default page size for list operations
    pub default_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_page_size: 25,
        }
    }
}

/// Service context for request handling
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// The authenticated employee (if any)
    pub actor: Option<EmployeeId>,
    /// Request correlation ID for tracing
    pub correlation_id: String,
    /// Whether the actor has admin privileges
    pub is_admin: bool,
}

impl ServiceContext {
    pub fn anonymous(correlation_id: String) -> Self {
        Self {
            actor: None,
            correlation_id,
            is_admin: false,
        }
    }

    pub fn authenticated(actor: EmployeeId, correlation_id: String) -> Self {
        Self {
            actor: Some(actor),
            correlation_id,
            is_admin: false,
        }
    }

    pub fn with_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn require_authenticated(&self) -> Result<EmployeeId, ApplicationError> {
        self.actor
            .ok_or_else(|| AuthorizationError::AuthenticationRequired.into())
    }

    pub fn require_admin(&self) -> Result<(), ApplicationError> {
        if !self.is_admin {
            return Err(ApplicationError::Forbidden(
                "Admin privileges required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Service event for the post-commit notification fan-out.
///
/// Serializable so the queue-backed publisher can carry it as a job payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServiceEvent {
    CaseCreated {
        case_id: CaseId,
        kind: CaseKind,
        title: String,
        requester_name: String,
    },
    CaseUpdated {
        case_id: CaseId,
    },
    CaseStatusChanged {
        case_id: CaseId,
        from: CaseStatus,
        to: CaseStatus,
    },
    CaseDeleted {
        case_id: CaseId,
    },
}

/// Event publisher trait for service events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ServiceEvent) -> Result<(), ApplicationError>;
}

/// No-op event publisher for testing
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ServiceEvent) -> Result<(), ApplicationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_context() {
        let ctx = ServiceContext::anonymous("corr-123".to_string());
        assert!(ctx.actor.is_none());
        assert!(ctx.require_authenticated().is_err());

        let ctx = ServiceContext::authenticated(EmployeeId::new(), "corr-123".to_string());
        assert!(ctx.require_authenticated().is_ok());
        assert!(ctx.require_admin().is_err());

        let ctx = ctx.with_admin();
        assert!(ctx.require_admin().is_ok());
    }

    #[test]
    fn test_service_event_round_trips_as_job_payload() {
        let event = ServiceEvent::CaseCreated {
            case_id: CaseId::new(),
            kind: CaseKind::Incident,
            title: "Router down".to_string(),
            requester_name: "Dana Vargas".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: ServiceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
