//! Job types and definitions

use caseflow_application::ServiceEvent;
use caseflow_domain::case::CaseKind;
use caseflow_domain::identifiers::{CaseId, EmployeeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobPriority {
    /// Critical priority - processed first
    Critical = 4,
    /// High priority
    High = 3,
    /// Normal priority (default)
    Normal = 2,
    /// Low priority - processed last
    Low = 1,
}

impl Default for JobPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl JobPriority {
    /// Get the queue name for this priority
    pub fn queue_name(&self, prefix: &str) -> String {
        match self {
            Self::Critical => format!("{}:jobs:critical", prefix),
            Self::High => format!("{}:jobs:high", prefix),
            Self::Normal => format!("{}:jobs:normal", prefix),
            Self::Low => format!("{}:jobs:low", prefix),
        }
    }

    /// All priorities, highest first. Consumption order.
    pub fn descending() -> [JobPriority; 4] {
        [Self::Critical, Self::High, Self::Normal, Self::Low]
    }
}

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is queued and waiting to be processed
    Queued,
    /// Job is currently being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed
    Failed,
    /// Job was retried
    Retried,
    /// Job is in dead letter queue
    Dead,
}

/// Job type enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum JobType {
    /// Fan out a freshly created case to the active administrators
    CaseCreatedFanout(CaseCreatedFanoutJob),
    /// Deliver one notification over one channel
    SendNotification(SendNotificationJob),
    /// Record case activity (updates, status changes, deletions)
    CaseActivity(CaseActivityJob),
}

/// Fan-out payload for a newly created case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseCreatedFanoutJob {
    pub case_id: CaseId,
    pub kind: CaseKind,
    pub title: String,
    pub requester_name: String,
}

/// One notification to deliver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendNotificationJob {
    pub channel: NotificationChannel,
    pub subject: String,
    pub body: String,
}

/// Delivery channel for a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationChannel {
    /// Internal notification addressed to an employee
    Employee(EmployeeId),
    /// The shared chat webhook
    ChatWebhook,
}

/// Case activity payload; carries the service event verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseActivityJob {
    pub event: ServiceEvent,
}

/// Job wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier
    pub id: Uuid,
    /// Job type and payload
    pub job_type: JobType,
    /// Job priority
    pub priority: JobPriority,
    /// Job status
    pub status: JobStatus,
    /// Number of retry attempts
    pub retry_count: u32,
    /// Maximum retry attempts
    pub max_retries: u32,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job was scheduled to run
    pub scheduled_at: DateTime<Utc>,
    /// When the job started processing
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Error message if failed
    pub error: Option<String>,
}

impl Job {
    /// Create a new job
    pub fn new(job_type: JobType, priority: JobPriority) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_type,
            priority,
            status: JobStatus::Queued,
            retry_count: 0,
            max_retries: 3,
            created_at: now,
            scheduled_at: now,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    /// Create a delayed job
    pub fn new_delayed(job_type: JobType, priority: JobPriority, delay: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            scheduled_at: now + delay,
            ..Self::new(job_type, priority)
        }
    }

    /// Mark job as processing
    pub fn mark_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
    }

    /// Mark job as completed
    pub fn mark_completed(&mut self) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark job as failed
    pub fn mark_failed(&mut self, error: String) {
        self.status = JobStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error);
    }

    /// Check if job should be retried
    pub fn should_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Increment retry count
    pub fn increment_retry(&mut self) {
        self.retry_count += 1;
        self.status = JobStatus::Retried;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fanout_job() -> JobType {
        JobType::CaseCreatedFanout(CaseCreatedFanoutJob {
            case_id: CaseId::new(),
            kind: CaseKind::Incident,
            title: "Router down".to_string(),
            requester_name: "Dana Vargas".to_string(),
        })
    }

    #[test]
    fn test_job_creation() {
        let job = Job::new(fanout_job(), JobPriority::High);

        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.priority, JobPriority::High);
        assert_eq!(job.retry_count, 0);
    }

    #[test]
    fn test_job_lifecycle() {
        let mut job = Job::new(fanout_job(), JobPriority::Normal);

        job.mark_processing();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.started_at.is_some());

        job.mark_completed();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_job_retry_budget() {
        let mut job = Job::new(fanout_job(), JobPriority::Low);

        assert!(job.should_retry());

        job.increment_retry();
        job.increment_retry();
        job.increment_retry();
        assert_eq!(job.retry_count, 3);
        assert!(!job.should_retry());
    }

    #[test]
    fn test_priority_queue_name() {
        assert_eq!(
            JobPriority::Critical.queue_name("caseflow"),
            "caseflow:jobs:critical"
        );
        assert_eq!(JobPriority::Low.queue_name("caseflow"), "caseflow:jobs:low");
    }

    #[test]
    fn test_delayed_job_schedule() {
        let job = Job::new_delayed(fanout_job(), JobPriority::Normal, chrono::Duration::minutes(5));
        assert!(job.scheduled_at > job.created_at);
    }

    #[test]
    fn test_job_round_trips_through_json() {
        let job = Job::new(
            JobType::SendNotification(SendNotificationJob {
                channel: NotificationChannel::Employee(EmployeeId::new()),
                subject: "New case".to_string(),
                body: "Router down".to_string(),
            }),
            JobPriority::High,
        );

        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, job.id);
        assert!(matches!(back.job_type, JobType::SendNotification(_)));
    }
}
