//! Notification delivery worker.
//!
//! Delivers one queued notification over one channel: either the notification
//! service (per-employee) or the Telegram chat webhook.

use super::Worker;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use caseflow_infrastructure::external_consumers::{NotificationConsumer, TelegramNotifier};
use caseflow_infrastructure::queue::{Job, JobType, NotificationChannel, SendNotificationJob};
use std::sync::Arc;
use tracing::{info, warn};

/// Worker for delivering notifications
pub struct NotificationWorker {
    notifications: Arc<NotificationConsumer>,
    telegram: Option<Arc<TelegramNotifier>>,
}

impl NotificationWorker {
    pub fn new(
        notifications: Arc<NotificationConsumer>,
        telegram: Option<Arc<TelegramNotifier>>,
    ) -> Self {
        Self {
            notifications,
            telegram,
        }
    }

    async fn deliver(&self, job_data: &SendNotificationJob) -> Result<()> {
        match &job_data.channel {
            NotificationChannel::Employee(recipient) => {
                self.notifications
                    .send(*recipient, &job_data.subject, &job_data.body)
                    .await?;

                info!(recipient_id = %recipient, "Notification delivered");
            }
            NotificationChannel::ChatWebhook => {
                let Some(telegram) = &self.telegram else {
                    warn!("Chat webhook not configured, dropping announcement");
                    return Ok(());
                };

                telegram.send_message(&job_data.body).await?;

                info!("Chat announcement delivered");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Worker for NotificationWorker {
    async fn process(&self, job: &Job) -> Result<()> {
        match &job.job_type {
            JobType::SendNotification(job_data) => self.deliver(job_data).await,
            _ => {
                warn!(
                    job_id = %job.id,
                    job_type = ?job.job_type,
                    "Invalid job type for NotificationWorker"
                );
                Err(anyhow!("Invalid job type"))
            }
        }
    }

    fn name(&self) -> &str {
        "NotificationWorker"
    }
}
