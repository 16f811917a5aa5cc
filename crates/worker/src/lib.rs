//! Caseflow Worker
//!
//! Background job processing for the Caseflow case-tracking service.
//!
//! This crate provides:
//! - Redis-based job consumption with priority handling
//! - The case-creation fan-out (per-admin notifications plus the chat webhook)
//! - Notification delivery and case-activity recording
//! - Retry policies with a delayed-job set and a dead letter queue
//! - Metrics and monitoring

pub mod config;
pub mod consumer;
pub mod metrics;
pub mod workers;

pub use config::WorkerConfig;
pub use consumer::JobConsumer;
pub use metrics::WorkerMetrics;
pub use workers::JobHandler;

use anyhow::Result;
use caseflow_infrastructure::queue::JobProducer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Worker pool for processing background jobs
pub struct WorkerPool {
    config: WorkerConfig,
    producer: JobProducer,
    consumer: JobConsumer,
    handler: Arc<JobHandler>,
    metrics: WorkerMetrics,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl WorkerPool {
    /// Create a new worker pool
    pub async fn new(config: WorkerConfig) -> Result<Self> {
        let producer =
            JobProducer::with_prefix(&config.redis_url, config.queue.prefix.clone()).await?;
        let consumer = JobConsumer::new(
            &config.redis_url,
            config.queue.prefix.clone(),
            config.pool_size,
        )
        .await?;
        let handler = Arc::new(JobHandler::new(&config, producer.clone())?);
        let metrics = WorkerMetrics::new();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Ok(Self {
            config,
            producer,
            consumer,
            handler,
            metrics,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Start the worker pool and block until shutdown is signalled
    pub async fn start(&mut self) -> Result<()> {
        info!(pool_size = self.config.pool_size, "Starting worker pool");

        let worker_handles = self
            .consumer
            .start(
                self.config.clone(),
                self.handler.clone(),
                self.metrics.clone(),
            )
            .await?;

        self.shutdown_rx.recv().await;

        info!("Shutting down worker pool");

        for handle in worker_handles {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Worker task error: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Get a handle to send shutdown signal
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Get the job producer for enqueuing jobs
    pub fn producer(&self) -> &JobProducer {
        &self.producer
    }

    /// Get metrics
    pub fn metrics(&self) -> &WorkerMetrics {
        &self.metrics
    }
}
