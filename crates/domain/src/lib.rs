//! Caseflow Domain Types
//!
//! This crate provides the core domain model for the Caseflow IT-service
//! tracking platform. It defines the generic case record shared by every case
//! kind, the status state machine, the date consistency rules, the two
//! assessment blocks and the tri-state patch types, all as strongly-typed
//! Rust structures with serialization support.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **identifiers**: Strongly-typed UUID-based identifiers for all entities
//! - **case**: The case record, kind registry and lifecycle status
//! - **transitions**: Status transition resolution (incl. auto-promotion)
//! - **dates**: Date consistency rules checked before every write
//! - **assessment**: User/admin assessment blocks and their totals
//! - **patch**: Tri-state partial-update types (keep / clear / set)
//! - **collaboration**: Comment and worklog child records
//! - **errors**: Error taxonomy with HTTP status codes
//!
//! ## Usage
//!
//! ```rust
//! use caseflow_domain::{
//!     case::{CaseKind, CaseStatus},
//!     identifiers::CaseId,
//!     transitions,
//! };
//!
//! let id = CaseId::new();
//! assert_eq!(CaseKind::Incident.display_name(), "Incident");
//!
//! // An end date on a non-terminal case forces completion.
//! let res = transitions::resolve(CaseStatus::Received, None, true);
//! assert_eq!(res.status, CaseStatus::Completed);
//! ```

#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]

// Core domain modules
pub mod assessment;
pub mod case;
pub mod collaboration;
pub mod dates;
pub mod errors;
pub mod identifiers;
pub mod patch;
pub mod transitions;

// Re-export commonly used types
pub use identifiers::*;
pub use errors::{AppError, AppResult};

// Re-export key domain types
pub use assessment::{AdminAssessment, UserAssessment};
pub use case::{Case, CaseKind, CaseStatus, Counterparty, CounterpartyRole};
pub use dates::DateRuleError;
pub use patch::{AdminAssessmentPatch, CasePatch, Field, UserAssessmentPatch};
pub use transitions::StatusResolution;
