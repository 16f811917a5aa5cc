//! Worker metrics and monitoring

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Worker metrics, shared across worker tasks
#[derive(Clone)]
pub struct WorkerMetrics {
    inner: Arc<RwLock<MetricsInner>>,
}

#[derive(Default)]
struct MetricsInner {
    /// Total number of jobs processed
    jobs_processed: u64,
    /// Number of successfully completed jobs
    jobs_succeeded: u64,
    /// Number of jobs moved to the dead letter queue
    jobs_failed: u64,
    /// Number of retried jobs
    jobs_retried: u64,
    /// Recent job durations, for percentile estimates
    durations: Vec<Duration>,
}

impl WorkerMetrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner::default())),
        }
    }

    /// Increment jobs processed counter
    pub fn increment_jobs_processed(&self) {
        self.inner.write().jobs_processed += 1;
    }

    /// Increment jobs succeeded counter
    pub fn increment_jobs_succeeded(&self) {
        self.inner.write().jobs_succeeded += 1;
    }

    /// Increment jobs failed counter
    pub fn increment_jobs_failed(&self) {
        self.inner.write().jobs_failed += 1;
    }

    /// Increment jobs retried counter
    pub fn increment_jobs_retried(&self) {
        self.inner.write().jobs_retried += 1;
    }

    /// Record job duration
    pub fn record_job_duration(&self, duration: Duration) {
        let mut inner = self.inner.write();
        inner.durations.push(duration);

        // Bound the sample window
        if inner.durations.len() > 1000 {
            inner.durations.drain(0..500);
        }
    }

    /// Get total jobs processed
    pub fn jobs_processed(&self) -> u64 {
        self.inner.read().jobs_processed
    }

    /// Get success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let inner = self.inner.read();
        if inner.jobs_processed == 0 {
            0.0
        } else {
            inner.jobs_succeeded as f64 / inner.jobs_processed as f64
        }
    }

    /// Get average job duration
    pub fn average_duration(&self) -> Option<Duration> {
        let inner = self.inner.read();
        if inner.durations.is_empty() {
            return None;
        }

        let total: Duration = inner.durations.iter().sum();
        Some(total / inner.durations.len() as u32)
    }

    /// Get p95 job duration
    pub fn p95_duration(&self) -> Option<Duration> {
        let inner = self.inner.read();
        if inner.durations.is_empty() {
            return None;
        }

        let mut sorted = inner.durations.clone();
        sorted.sort();
        let index = (sorted.len() as f64 * 0.95) as usize;
        Some(sorted[index.min(sorted.len() - 1)])
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.read();
        MetricsSnapshot {
            jobs_processed: inner.jobs_processed,
            jobs_succeeded: inner.jobs_succeeded,
            jobs_failed: inner.jobs_failed,
            jobs_retried: inner.jobs_retried,
            success_rate: if inner.jobs_processed == 0 {
                0.0
            } else {
                inner.jobs_succeeded as f64 / inner.jobs_processed as f64
            },
            average_duration: {
                if inner.durations.is_empty() {
                    None
                } else {
                    let total: Duration = inner.durations.iter().sum();
                    Some(total / inner.durations.len() as u32)
                }
            },
            p95_duration: {
                if inner.durations.is_empty() {
                    None
                } else {
                    let mut sorted = inner.durations.clone();
                    sorted.sort();
                    let index = (sorted.len() as f64 * 0.95) as usize;
                    Some(sorted[index.min(sorted.len() - 1)])
                }
            },
        }
    }
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub jobs_processed: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub jobs_retried: u64,
    pub success_rate: f64,
    pub average_duration: Option<Duration>,
    pub p95_duration: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counters() {
        let metrics = WorkerMetrics::new();

        assert_eq!(metrics.jobs_processed(), 0);

        metrics.increment_jobs_processed();
        metrics.increment_jobs_succeeded();

        assert_eq!(metrics.jobs_processed(), 1);
        assert_eq!(metrics.success_rate(), 1.0);
    }

    #[test]
    fn test_success_rate() {
        let metrics = WorkerMetrics::new();

        metrics.increment_jobs_processed();
        metrics.increment_jobs_succeeded();
        metrics.increment_jobs_processed();
        metrics.increment_jobs_failed();

        assert_eq!(metrics.success_rate(), 0.5);
    }

    #[test]
    fn test_duration_metrics() {
        let metrics = WorkerMetrics::new();

        metrics.record_job_duration(Duration::from_millis(100));
        metrics.record_job_duration(Duration::from_millis(200));
        metrics.record_job_duration(Duration::from_millis(300));

        assert_eq!(metrics.average_duration(), Some(Duration::from_millis(200)));
        assert!(metrics.p95_duration().is_some());
    }

    #[test]
    fn test_snapshot_matches_counters() {
        let metrics = WorkerMetrics::new();

        metrics.increment_jobs_processed();
        metrics.increment_jobs_retried();
        metrics.record_job_duration(Duration::from_millis(50));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.jobs_processed, 1);
        assert_eq!(snapshot.jobs_retried, 1);
        assert!(snapshot.average_duration.is_some());
    }
}
