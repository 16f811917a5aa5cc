//! Worker configuration

use caseflow_common::retry::ExponentialBackoff;
use caseflow_infrastructure::external_consumers::{
    NotificationConsumerConfig, PersonnelConsumerConfig, TelegramConfig,
};
use caseflow_infrastructure::queue::DEFAULT_QUEUE_PREFIX;
use std::time::Duration;

/// Worker pool configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent worker tasks
    pub pool_size: usize,

    /// Redis connection URL
    pub redis_url: String,

    /// Queue settings
    pub queue: QueueConfig,

    /// Retry policy for failed jobs
    pub retry: RetryConfig,

    /// Downstream service endpoints
    pub consumers: ConsumersConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_size: num_cpus::get(),
            redis_url: "redis://localhost:6379".to_string(),
            queue: QueueConfig::default(),
            retry: RetryConfig::default(),
            consumers: ConsumersConfig::default(),
        }
    }
}

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Prefix for queue keys in Redis
    pub prefix: String,

    /// Blocking timeout when waiting for jobs (seconds)
    pub blocking_timeout: u64,

    /// How often the delayed-job set is polled (seconds)
    pub delayed_poll_interval: u64,

    /// Maximum delayed jobs promoted per poll
    pub max_delayed_per_poll: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_QUEUE_PREFIX.to_string(),
            blocking_timeout: 5,
            delayed_poll_interval: 10,
            max_delayed_per_poll: 100,
        }
    }
}

/// Retry policy for failed jobs.
///
/// Retries go through the delayed-job set, so the backoff here is the score
/// offset a retried job gets.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Initial backoff duration (seconds)
    pub initial_backoff: u64,

    /// Maximum backoff duration (seconds)
    pub max_backoff: u64,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_backoff: 5,
            max_backoff: 300,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Calculate backoff duration for a given retry attempt.
    ///
    /// Attempts are 1-based; attempt 0 is treated as the first retry.
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let policy = caseflow_common::retry::RetryConfig {
            max_attempts: attempt,
            initial_delay: Duration::from_secs(self.initial_backoff),
            max_delay: Duration::from_secs(self.max_backoff),
            backoff_multiplier: self.backoff_multiplier,
        };

        let mut backoff = ExponentialBackoff::new(policy);
        for _ in 0..attempt.max(1) {
            backoff.next_attempt();
        }
        backoff.delay()
    }
}

/// Endpoints of the services the worker talks to.
///
/// The Telegram webhook is optional; without it the chat announcement leg of
/// the fan-out is skipped.
#[derive(Debug, Clone, Default)]
pub struct ConsumersConfig {
    pub personnel: PersonnelConsumerConfig,
    pub notification: NotificationConsumerConfig,
    pub telegram: Option<TelegramConfig>,
}

impl ConsumersConfig {
    /// Build from environment variables. Telegram settings are optional.
    pub fn from_env() -> anyhow::Result<Self> {
        let telegram = if std::env::var("TELEGRAM_BOT_TOKEN").is_ok() {
            Some(TelegramConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            personnel: PersonnelConsumerConfig::from_env()?,
            notification: NotificationConsumerConfig::from_env()?,
            telegram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue_prefix() {
        let config = QueueConfig::default();
        assert_eq!(config.prefix, "caseflow");
        assert_eq!(config.blocking_timeout, 5);
    }

    #[test]
    fn test_retry_config_exponential_backoff() {
        let config = RetryConfig {
            initial_backoff: 5,
            max_backoff: 100,
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.calculate_backoff(0), Duration::from_secs(5));
        assert_eq!(config.calculate_backoff(1), Duration::from_secs(5));
        assert_eq!(config.calculate_backoff(2), Duration::from_secs(10));
        assert_eq!(config.calculate_backoff(3), Duration::from_secs(20));
        assert_eq!(config.calculate_backoff(4), Duration::from_secs(40));
        assert_eq!(config.calculate_backoff(5), Duration::from_secs(80));
        assert_eq!(config.calculate_backoff(6), Duration::from_secs(100)); // capped at max
    }
}
