//! Job producer - enqueue jobs to Redis

use super::job::{Job, JobPriority, JobType};
use super::DEFAULT_QUEUE_PREFIX;
use crate::{Error, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

/// Job producer for enqueueing jobs
#[derive(Clone)]
pub struct JobProducer {
    redis: ConnectionManager,
    prefix: String,
}

impl JobProducer {
    /// Create a new job producer
    pub async fn new(redis_url: &str) -> Result<Self> {
        Self::with_prefix(redis_url, DEFAULT_QUEUE_PREFIX.to_string()).await
    }

    /// Create a new job producer with custom prefix
    pub async fn with_prefix(redis_url: &str, prefix: String) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(Error::Queue)?;
        let redis = ConnectionManager::new(client)
            .await
            .map_err(Error::Queue)?;

        Ok(Self { redis, prefix })
    }

    /// Enqueue a job with default priority (Normal)
    pub async fn enqueue(&self, job_type: JobType) -> Result<Job> {
        self.enqueue_with_priority(job_type, JobPriority::Normal)
            .await
    }

    /// Enqueue a job with specific priority
    pub async fn enqueue_with_priority(
        &self,
        job_type: JobType,
        priority: JobPriority,
    ) -> Result<Job> {
        let job = Job::new(job_type, priority);
        self.push_job(&job).await?;

        debug!(
            job_id = %job.id,
            priority = ?job.priority,
            "Job enqueued"
        );

        Ok(job)
    }

    /// Enqueue a delayed job
    pub async fn enqueue_delayed(
        &self,
        job_type: JobType,
        priority: JobPriority,
        delay: chrono::Duration,
    ) -> Result<Job> {
        let job = Job::new_delayed(job_type, priority, delay);
        let job_json = serde_json::to_string(&job).map_err(Error::Serialization)?;

        // Delayed jobs live in a sorted set scored by their scheduled time
        let delayed_key = format!("{}:jobs:delayed", self.prefix);
        let score = job.scheduled_at.timestamp();

        let mut redis = self.redis.clone();
        redis
            .zadd::<_, _, _, ()>(&delayed_key, &job_json, score)
            .await
            .map_err(Error::Queue)?;

        debug!(
            job_id = %job.id,
            priority = ?job.priority,
            delay_seconds = delay.num_seconds(),
            "Delayed job enqueued"
        );

        Ok(job)
    }

    /// Enqueue multiple jobs in one pipeline
    pub async fn enqueue_batch(&self, jobs: Vec<(JobType, JobPriority)>) -> Result<Vec<Job>> {
        let created_jobs: Vec<Job> = jobs
            .into_iter()
            .map(|(job_type, priority)| Job::new(job_type, priority))
            .collect();

        let mut pipe = redis::pipe();
        for job in &created_jobs {
            let queue_name = job.priority.queue_name(&self.prefix);
            let job_json = serde_json::to_string(job).map_err(Error::Serialization)?;
            pipe.lpush::<_, _>(&queue_name, &job_json);
        }

        let mut redis = self.redis.clone();
        pipe.query_async::<_, ()>(&mut redis).await.map_err(Error::Queue)?;

        info!(count = created_jobs.len(), "Batch jobs enqueued");

        Ok(created_jobs)
    }

    /// Push a job to the appropriate queue
    async fn push_job(&self, job: &Job) -> Result<()> {
        let queue_name = job.priority.queue_name(&self.prefix);
        let job_json = serde_json::to_string(job).map_err(Error::Serialization)?;

        let mut redis = self.redis.clone();
        redis
            .lpush::<_, _, ()>(&queue_name, &job_json)
            .await
            .map_err(Error::Queue)?;

        Ok(())
    }

    /// Get the number of jobs in a queue
    pub async fn queue_size(&self, priority: JobPriority) -> Result<usize> {
        let queue_name = priority.queue_name(&self.prefix);
        let mut redis = self.redis.clone();
        let size: usize = redis.llen(&queue_name).await.map_err(Error::Queue)?;
        Ok(size)
    }

    /// Get the total number of jobs across all priority queues
    pub async fn total_queue_size(&self) -> Result<usize> {
        let mut total = 0;
        for priority in JobPriority::descending() {
            total += self.queue_size(priority).await?;
        }
        Ok(total)
    }

    /// Get the number of delayed jobs
    pub async fn delayed_queue_size(&self) -> Result<usize> {
        let delayed_key = format!("{}:jobs:delayed", self.prefix);
        let mut redis = self.redis.clone();
        let size: usize = redis.zcard(&delayed_key).await.map_err(Error::Queue)?;
        Ok(size)
    }

    /// Clear all jobs from a queue (use with caution!)
    pub async fn clear_queue(&self, priority: JobPriority) -> Result<()> {
        let queue_name = priority.queue_name(&self.prefix);
        let mut redis = self.redis.clone();
        redis.del::<_, ()>(&queue_name).await.map_err(Error::Queue)?;
        info!(priority = ?priority, "Queue cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::job::CaseCreatedFanoutJob;
    use caseflow_domain::case::CaseKind;
    use caseflow_domain::identifiers::CaseId;

    // These tests require a running Redis instance and are run with --ignored.

    fn fanout_job() -> JobType {
        JobType::CaseCreatedFanout(CaseCreatedFanoutJob {
            case_id: CaseId::new(),
            kind: CaseKind::Delivery,
            title: "Rack delivery".to_string(),
            requester_name: "Dana Vargas".to_string(),
        })
    }

    #[tokio::test]
    #[ignore]
    async fn test_enqueue_job() {
        let producer = JobProducer::new("redis://localhost:6379")
            .await
            .expect("Failed to create producer");

        let job = producer
            .enqueue(fanout_job())
            .await
            .expect("Failed to enqueue job");

        assert_eq!(job.priority, JobPriority::Normal);

        producer.clear_queue(JobPriority::Normal).await.ok();
    }

    #[tokio::test]
    #[ignore]
    async fn test_queue_size() {
        let producer = JobProducer::new("redis://localhost:6379")
            .await
            .expect("Failed to create producer");

        producer.clear_queue(JobPriority::High).await.ok();
        assert_eq!(producer.queue_size(JobPriority::High).await.unwrap(), 0);

        producer
            .enqueue_with_priority(fanout_job(), JobPriority::High)
            .await
            .expect("Failed to enqueue job");

        assert_eq!(producer.queue_size(JobPriority::High).await.unwrap(), 1);

        producer.clear_queue(JobPriority::High).await.ok();
    }
}
