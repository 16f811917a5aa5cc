//! Case record types for the Caseflow domain.
//!
//! Every kind of IT-service work (internal requests, deliveries, incidents, ...)
//! shares the same generic case record; kind-specific behavior is limited to the
//! counterparty role the kind associates with.

use crate::assessment::{AdminAssessment, UserAssessment};
use crate::identifiers::{CaseId, EmployeeId, PartnerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The enumerable registry of case kinds.
///
/// Fixed at creation; a case never changes kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    Internal,
    Delivery,
    Receiving,
    Incident,
    Maintenance,
    Warranty,
    Deployment,
}

impl CaseKind {
    pub fn all() -> &'static [CaseKind] {
        &[
            Self::Internal,
            Self::Delivery,
            Self::Receiving,
            Self::Incident,
            Self::Maintenance,
            Self::Warranty,
            Self::Deployment,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Internal => "Internal request",
            Self::Delivery => "Delivery",
            Self::Receiving => "Receiving",
            Self::Incident => "Incident",
            Self::Maintenance => "Maintenance",
            Self::Warranty => "Warranty",
            Self::Deployment => "Deployment",
        }
    }

    /// Which counterparty role this kind of case is associated with.
    ///
    /// `None` means the kind carries no counterparty at all; `Some` means a
    /// counterparty of that role may be attached.
    pub fn counterparty_role(&self) -> Option<CounterpartyRole> {
        match self {
            Self::Internal => None,
            Self::Delivery | Self::Deployment => Some(CounterpartyRole::Customer),
            Self::Receiving | Self::Warranty => Some(CounterpartyRole::Supplier),
            Self::Incident | Self::Maintenance => Some(CounterpartyRole::Partner),
        }
    }
}

/// Role of the external party attached to a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyRole {
    Customer,
    Supplier,
    Partner,
}

/// Reference to the external customer/supplier/partner on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub role: CounterpartyRole,
    pub partner_id: PartnerId,
}

/// Case lifecycle status.
///
/// Documented forward path: `Received -> InProgress -> Completed`, with
/// `Cancelled` reachable from the two non-terminal states. Explicit status
/// writes are deliberately permissive (see [`crate::transitions`]); this enum
/// only knows which states are terminal and which edges are the documented
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Received,
    InProgress,
    Completed,
    Cancelled,
}

impl CaseStatus {
    pub fn all() -> &'static [CaseStatus] {
        &[
            Self::Received,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    /// Completed and Cancelled are terminal: no documented edge leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self -> target` is one of the documented forward edges.
    pub fn is_documented_edge(&self, target: CaseStatus) -> bool {
        matches!(
            (self, target),
            (Self::Received, Self::InProgress)
                | (Self::Received, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A trackable unit of IT-service work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub kind: CaseKind,
    pub title: String,
    pub description: String,
    /// The employee who raised the case. Set once at creation.
    pub requester: EmployeeId,
    /// The employee assigned to the case. May be reassigned over its life.
    pub handler: EmployeeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<Counterparty>,
    pub status: CaseStatus,
    /// When work begins. May lie in the past or the future.
    pub start_date: DateTime<Utc>,
    /// When the case transitioned into `InProgress`, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_at: Option<DateTime<Utc>>,
    /// Presence implies completion semantics (auto-promotion, see transitions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_reference_code: Option<String>,
    pub user_assessment: UserAssessment,
    pub admin_assessment: AdminAssessment,
    /// Incremented on every successful update. Callers may pass it back for
    /// optimistic locking; plain updates remain last-writer-wins.
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
