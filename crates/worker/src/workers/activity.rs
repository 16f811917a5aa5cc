//! Case activity worker.
//!
//! Records update, status-change and deletion events in the structured log
//! stream. These events ride the low-priority queue so they never compete
//! with the creation fan-out.

use super::Worker;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use caseflow_application::ServiceEvent;
use caseflow_infrastructure::queue::{CaseActivityJob, Job, JobType};
use tracing::{info, warn};

/// Worker for recording case activity
pub struct ActivityWorker;

impl ActivityWorker {
    pub fn new() -> Self {
        Self
    }

    fn record(&self, job_data: &CaseActivityJob) {
        match &job_data.event {
            ServiceEvent::CaseUpdated { case_id } => {
                info!(case_id = %case_id, activity = "updated", "Case activity");
            }
            ServiceEvent::CaseStatusChanged { case_id, from, to } => {
                info!(
                    case_id = %case_id,
                    activity = "status_changed",
                    from = ?from,
                    to = ?to,
                    "Case activity"
                );
            }
            ServiceEvent::CaseDeleted { case_id } => {
                info!(case_id = %case_id, activity = "deleted", "Case activity");
            }
            ServiceEvent::CaseCreated { case_id, .. } => {
                // Creations arrive as fan-out jobs; an activity record here
                // means a producer misrouted the event.
                warn!(case_id = %case_id, "Creation event on the activity queue");
            }
        }
    }
}

impl Default for ActivityWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Worker for ActivityWorker {
    async fn process(&self, job: &Job) -> Result<()> {
        match &job.job_type {
            JobType::CaseActivity(job_data) => {
                self.record(job_data);
                Ok(())
            }
            _ => {
                warn!(
                    job_id = %job.id,
                    job_type = ?job.job_type,
                    "Invalid job type for ActivityWorker"
                );
                Err(anyhow!("Invalid job type"))
            }
        }
    }

    fn name(&self) -> &str {
        "ActivityWorker"
    }
}
