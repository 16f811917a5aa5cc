//! Creation fan-out worker.
//!
//! Turns one `CaseCreatedFanout` job into the individual delivery jobs: one
//! notification per active administrator plus one chat-webhook announcement.
//! A failed enqueue for one recipient never blocks the others; failures are
//! logged and absorbed.

use super::Worker;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use caseflow_infrastructure::external_consumers::PersonnelConsumer;
use caseflow_infrastructure::queue::{
    CaseCreatedFanoutJob, Job, JobPriority, JobProducer, JobType, NotificationChannel,
    SendNotificationJob,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Worker for fanning out newly created cases
pub struct FanoutWorker {
    personnel: Arc<PersonnelConsumer>,
    producer: JobProducer,
}

impl FanoutWorker {
    pub fn new(personnel: Arc<PersonnelConsumer>, producer: JobProducer) -> Self {
        Self { personnel, producer }
    }

    async fn fan_out(&self, job_data: &CaseCreatedFanoutJob) -> Result<()> {
        // Roster lookup failures are worth retrying; everything past this
        // point is best-effort per recipient.
        let admins = self.personnel.get_active_admins().await?;

        info!(
            case_id = %job_data.case_id,
            admin_count = admins.len(),
            "Fanning out case creation"
        );

        let subject = format!("New case: {}", job_data.title);
        let body = format!(
            "{} case \"{}\" was raised by {}.",
            job_data.kind.display_name(),
            job_data.title,
            job_data.requester_name
        );

        for admin in &admins {
            let notification = JobType::SendNotification(SendNotificationJob {
                channel: NotificationChannel::Employee(admin.id),
                subject: subject.clone(),
                body: body.clone(),
            });

            if let Err(e) = self
                .producer
                .enqueue_with_priority(notification, JobPriority::High)
                .await
            {
                warn!(
                    case_id = %job_data.case_id,
                    recipient_id = %admin.id,
                    error = %e,
                    "Failed to enqueue admin notification, continuing"
                );
            }
        }

        let chat_message = JobType::SendNotification(SendNotificationJob {
            channel: NotificationChannel::ChatWebhook,
            subject: subject.clone(),
            body,
        });

        if let Err(e) = self
            .producer
            .enqueue_with_priority(chat_message, JobPriority::High)
            .await
        {
            warn!(
                case_id = %job_data.case_id,
                error = %e,
                "Failed to enqueue chat announcement, continuing"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl Worker for FanoutWorker {
    async fn process(&self, job: &Job) -> Result<()> {
        match &job.job_type {
            JobType::CaseCreatedFanout(job_data) => self.fan_out(job_data).await,
            _ => {
                warn!(
                    job_id = %job.id,
                    job_type = ?job.job_type,
                    "Invalid job type for FanoutWorker"
                );
                Err(anyhow!("Invalid job type"))
            }
        }
    }

    fn name(&self) -> &str {
        "FanoutWorker"
    }
}
