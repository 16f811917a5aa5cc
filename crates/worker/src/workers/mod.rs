//! Worker implementations

pub mod activity;
pub mod fanout;
pub mod notification;

use crate::config::WorkerConfig;
use anyhow::Result;
use async_trait::async_trait;
use caseflow_infrastructure::external_consumers::{
    NotificationConsumer, PersonnelConsumer, TelegramNotifier,
};
use caseflow_infrastructure::queue::{Job, JobProducer, JobType};
use std::sync::Arc;

/// Worker trait for processing jobs
#[async_trait]
pub trait Worker: Send + Sync {
    /// Process a job
    async fn process(&self, job: &Job) -> Result<()>;

    /// Get the worker name
    fn name(&self) -> &str;
}

/// Job handler that routes jobs to appropriate workers.
///
/// Holds the shared service clients so every job reuses the same connection
/// pools instead of rebuilding them per job.
pub struct JobHandler {
    fanout: fanout::FanoutWorker,
    notification: notification::NotificationWorker,
    activity: activity::ActivityWorker,
}

impl JobHandler {
    /// Build the handler and its service clients from configuration.
    pub fn new(config: &WorkerConfig, producer: JobProducer) -> Result<Self> {
        let personnel = Arc::new(PersonnelConsumer::new(config.consumers.personnel.clone())?);
        let notifications = Arc::new(NotificationConsumer::new(
            config.consumers.notification.clone(),
        )?);
        let telegram = config
            .consumers
            .telegram
            .clone()
            .map(TelegramNotifier::new)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            fanout: fanout::FanoutWorker::new(personnel, producer),
            notification: notification::NotificationWorker::new(notifications, telegram),
            activity: activity::ActivityWorker::new(),
        })
    }

    /// Handle a job by routing to the appropriate worker
    pub async fn handle(&self, job: &Job) -> Result<()> {
        match &job.job_type {
            JobType::CaseCreatedFanout(_) => self.fanout.process(job).await,
            JobType::SendNotification(_) => self.notification.process(job).await,
            JobType::CaseActivity(_) => self.activity.process(job).await,
        }
    }
}
