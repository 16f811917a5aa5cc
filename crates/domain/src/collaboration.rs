//! Child records owned by the Collaboration collaborator.
//!
//! Comments and worklogs hang off a case and are deleted with it in the same
//! transaction. Their lifecycle beyond that cascade is managed elsewhere;
//! these types exist so the persistence layer can name what it cascades.

use crate::identifiers::{CaseId, CommentId, EmployeeId, WorklogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discussion comment on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseComment {
    pub id: CommentId,
    pub case_id: CaseId,
    pub author: EmployeeId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A time-tracking entry on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseWorklog {
    pub id: WorklogId,
    pub case_id: CaseId,
    pub author: EmployeeId,
    pub minutes_spent: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}
