//! Queue-backed event publisher.
//!
//! Maps service events to queue jobs. The lifecycle service already treats
//! publishing as best-effort, so an enqueue failure here surfaces as an error
//! for the service to log and swallow.

use crate::queue::{
    CaseActivityJob, CaseCreatedFanoutJob, JobPriority, JobProducer, JobType,
};
use async_trait::async_trait;
use caseflow_application::{ApplicationError, EventPublisher, ServiceEvent};
use tracing::{debug, instrument};

/// Publishes service events as Redis queue jobs.
pub struct QueueEventPublisher {
    producer: JobProducer,
}

impl QueueEventPublisher {
    pub fn new(producer: JobProducer) -> Self {
        Self { producer }
    }
}

#[async_trait]
impl EventPublisher for QueueEventPublisher {
    #[instrument(skip(self, event))]
    async fn publish(&self, event: ServiceEvent) -> Result<(), ApplicationError> {
        let (job_type, priority) = match event {
            ServiceEvent::CaseCreated {
                case_id,
                kind,
                title,
                requester_name,
            } => (
                JobType::CaseCreatedFanout(CaseCreatedFanoutJob {
                    case_id,
                    kind,
                    title,
                    requester_name,
                }),
                JobPriority::High,
            ),
            other => (
                JobType::CaseActivity(CaseActivityJob { event: other }),
                JobPriority::Low,
            ),
        };

        let job = self
            .producer
            .enqueue_with_priority(job_type, priority)
            .await
            .map_err(ApplicationError::from)?;

        debug!(job_id = %job.id, "Service event enqueued");
        Ok(())
    }
}
