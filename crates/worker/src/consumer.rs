//! Job consumer - fetch and process jobs from Redis

use crate::config::WorkerConfig;
use crate::metrics::WorkerMetrics;
use crate::workers::JobHandler;
use anyhow::{Context, Result};
use caseflow_infrastructure::queue::{Job, JobPriority, JobStatus};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Job consumer for fetching and processing jobs
#[derive(Clone)]
pub struct JobConsumer {
    redis: ConnectionManager,
    prefix: String,
    pool_size: usize,
}

impl JobConsumer {
    /// Create a new job consumer
    pub async fn new(redis_url: &str, prefix: String, pool_size: usize) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;
        let redis = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        Ok(Self {
            redis,
            prefix,
            pool_size,
        })
    }

    /// Start the consumer worker pool
    pub async fn start(
        &self,
        config: WorkerConfig,
        handler: Arc<JobHandler>,
        metrics: WorkerMetrics,
    ) -> Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::new();

        info!(pool_size = self.pool_size, "Starting worker pool");

        for worker_id in 0..self.pool_size {
            let consumer = self.clone();
            let config = config.clone();
            let handler = handler.clone();
            let metrics = metrics.clone();

            let handle = tokio::spawn(async move {
                if let Err(e) = consumer
                    .worker_loop(worker_id, config, handler, metrics)
                    .await
                {
                    error!(worker_id, error = %e, "Worker loop error");
                }
            });

            handles.push(handle);
        }

        // Start delayed job processor
        let consumer = self.clone();
        let config = config.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = consumer.delayed_job_processor(config).await {
                error!(error = %e, "Delayed job processor error");
            }
        });
        handles.push(handle);

        Ok(handles)
    }

    /// Worker loop - continuously fetch and process jobs
    async fn worker_loop(
        &self,
        worker_id: usize,
        config: WorkerConfig,
        handler: Arc<JobHandler>,
        metrics: WorkerMetrics,
    ) -> Result<()> {
        let mut redis = self.redis.clone();

        loop {
            match self.fetch_job(&mut redis, &config).await {
                Ok(Some(mut job)) => {
                    debug!(
                        worker_id,
                        job_id = %job.id,
                        job_type = ?job.job_type,
                        "Processing job"
                    );

                    metrics.increment_jobs_processed();
                    let start = std::time::Instant::now();

                    job.mark_processing();

                    let result = handler.handle(&job).await;

                    let duration = start.elapsed();
                    metrics.record_job_duration(duration);

                    match result {
                        Ok(_) => {
                            job.mark_completed();
                            metrics.increment_jobs_succeeded();
                            info!(
                                worker_id,
                                job_id = %job.id,
                                duration_ms = duration.as_millis(),
                                "Job completed successfully"
                            );
                        }
                        Err(e) => {
                            error!(
                                worker_id,
                                job_id = %job.id,
                                error = %e,
                                "Job failed"
                            );

                            if job.should_retry() {
                                job.increment_retry();
                                let backoff = config.retry.calculate_backoff(job.retry_count);
                                warn!(
                                    worker_id,
                                    job_id = %job.id,
                                    retry_count = job.retry_count,
                                    backoff_secs = backoff.as_secs(),
                                    "Retrying job"
                                );

                                self.requeue_job(&mut redis, &job, backoff).await?;
                                metrics.increment_jobs_retried();
                            } else {
                                job.mark_failed(e.to_string());
                                self.move_to_dlq(&mut redis, &job).await?;
                                metrics.increment_jobs_failed();
                            }
                        }
                    }
                }
                Ok(None) => {
                    // No job available, sleep briefly
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(e) => {
                    error!(worker_id, error = %e, "Failed to fetch job");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    /// Fetch a job from the queue, highest priority first
    async fn fetch_job(
        &self,
        redis: &mut ConnectionManager,
        config: &WorkerConfig,
    ) -> Result<Option<Job>> {
        let queues: Vec<String> = JobPriority::descending()
            .iter()
            .map(|p| p.queue_name(&self.prefix))
            .collect();

        // BRPOP blocks until a job shows up on any priority queue. A timeout
        // yields None; connection failures must reach the worker loop so it
        // can back off instead of spinning on a dead connection.
        let result: Option<(String, String)> = redis
            .brpop(&queues, config.queue.blocking_timeout as f64)
            .await
            .context("Failed to fetch job from queue")?;

        if let Some((_, job_json)) = result {
            let job: Job =
                serde_json::from_str(&job_json).context("Failed to deserialize job")?;
            Ok(Some(job))
        } else {
            Ok(None)
        }
    }

    /// Re-enqueue a job with delay
    async fn requeue_job(
        &self,
        redis: &mut ConnectionManager,
        job: &Job,
        delay: Duration,
    ) -> Result<()> {
        let delayed_key = format!("{}:jobs:delayed", self.prefix);
        let score = chrono::Utc::now().timestamp() + delay.as_secs() as i64;
        let job_json = serde_json::to_string(job).context("Failed to serialize job")?;

        redis
            .zadd::<_, _, _, ()>(&delayed_key, &job_json, score)
            .await
            .context("Failed to requeue job")?;

        Ok(())
    }

    /// Move a job to the dead letter queue
    async fn move_to_dlq(&self, redis: &mut ConnectionManager, job: &Job) -> Result<()> {
        let dlq_key = format!("{}:jobs:dlq", self.prefix);
        let job_json = serde_json::to_string(job).context("Failed to serialize job")?;

        redis
            .lpush::<_, _, ()>(&dlq_key, &job_json)
            .await
            .context("Failed to move job to DLQ")?;

        warn!(job_id = %job.id, "Job moved to dead letter queue");

        Ok(())
    }

    /// Promote delayed jobs whose scheduled time has arrived
    async fn delayed_job_processor(&self, config: WorkerConfig) -> Result<()> {
        let mut redis = self.redis.clone();
        let delayed_key = format!("{}:jobs:delayed", self.prefix);

        loop {
            let now = chrono::Utc::now().timestamp();

            let jobs: Vec<String> = redis
                .zrangebyscore_limit(&delayed_key, 0, now, 0, config.queue.max_delayed_per_poll as isize)
                .await
                .context("Failed to fetch delayed jobs")?;

            for job_json in jobs {
                let job: Job = match serde_json::from_str(&job_json) {
                    Ok(j) => j,
                    Err(e) => {
                        error!(error = %e, "Failed to parse delayed job");
                        // Drop the malformed entry so it stops blocking the set
                        redis.zrem::<_, _, ()>(&delayed_key, &job_json).await.ok();
                        continue;
                    }
                };

                redis
                    .zrem::<_, _, ()>(&delayed_key, &job_json)
                    .await
                    .context("Failed to remove delayed job")?;

                let queue_name = job.priority.queue_name(&self.prefix);
                redis
                    .lpush::<_, _, ()>(&queue_name, &job_json)
                    .await
                    .context("Failed to enqueue delayed job")?;

                debug!(job_id = %job.id, "Delayed job enqueued");
            }

            tokio::time::sleep(Duration::from_secs(config.queue.delayed_poll_interval)).await;
        }
    }

    /// Get dead letter queue jobs
    pub async fn get_dlq_jobs(&self, limit: usize) -> Result<Vec<Job>> {
        let mut redis = self.redis.clone();
        let dlq_key = format!("{}:jobs:dlq", self.prefix);

        let jobs_json: Vec<String> = redis
            .lrange(&dlq_key, 0, limit as isize - 1)
            .await
            .context("Failed to fetch DLQ jobs")?;

        let mut jobs = Vec::new();
        for job_json in jobs_json {
            if let Ok(job) = serde_json::from_str(&job_json) {
                jobs.push(job);
            }
        }

        Ok(jobs)
    }

    /// Retry a job from the dead letter queue
    pub async fn retry_dlq_job(&self, job_id: &uuid::Uuid) -> Result<()> {
        let mut redis = self.redis.clone();
        let dlq_key = format!("{}:jobs:dlq", self.prefix);

        let jobs_json: Vec<String> = redis
            .lrange(&dlq_key, 0, -1)
            .await
            .context("Failed to fetch DLQ jobs")?;

        for job_json in jobs_json.iter() {
            if let Ok(mut job) = serde_json::from_str::<Job>(job_json) {
                if &job.id == job_id {
                    job.status = JobStatus::Queued;
                    job.retry_count = 0;
                    job.error = None;

                    redis
                        .lrem::<_, _, ()>(&dlq_key, 1, job_json)
                        .await
                        .context("Failed to remove job from DLQ")?;

                    let queue_name = job.priority.queue_name(&self.prefix);
                    let new_job_json = serde_json::to_string(&job)?;
                    redis
                        .lpush::<_, _, ()>(&queue_name, &new_job_json)
                        .await
                        .context("Failed to re-enqueue job")?;

                    info!(job_id = %job_id, "Job retried from DLQ");
                    return Ok(());
                }
            }
        }

        Err(anyhow::anyhow!("Job not found in DLQ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance and are run with --ignored.

    #[tokio::test]
    #[ignore]
    async fn test_fetch_job_empty_queue_times_out_to_none() {
        let consumer = JobConsumer::new(
            "redis://localhost:6379",
            "caseflow-test-fetch".to_string(),
            1,
        )
        .await
        .unwrap();

        let mut redis = consumer.redis.clone();
        let mut config = WorkerConfig::default();
        config.queue.blocking_timeout = 1;

        // An empty queue is a quiet timeout, not an error.
        let job = consumer.fetch_job(&mut redis, &config).await.unwrap();
        assert!(job.is_none());
    }
}
