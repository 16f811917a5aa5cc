//! Retry utilities with exponential backoff.
//!
//! Used by the HTTP collaborator clients for transient lookup failures, and
//! by the worker's job backoff policy. Business-rule rejections are never
//! retried; callers gate on [`retry_with_predicate`] with the error's
//! retryability check.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 means no retries)
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier (e.g., 2.0 for doubling)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a configuration with exponential backoff.
    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Set the maximum delay between retries.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }
}

/// Exponential backoff calculator.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: RetryConfig,
    current_attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            current_attempt: 0,
        }
    }

    /// Calculate the delay for the current attempt.
    pub fn delay(&self) -> Duration {
        if self.current_attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.config.initial_delay.as_millis() as f64
            * self
                .config
                .backoff_multiplier
                .powi((self.current_attempt - 1) as i32);

        Duration::from_millis(delay_ms as u64).min(self.config.max_delay)
    }

    /// Move to the next attempt.
    pub fn next_attempt(&mut self) {
        self.current_attempt += 1;
    }

    /// Check if there are more attempts remaining.
    pub fn has_attempts_remaining(&self) -> bool {
        self.current_attempt <= self.config.max_attempts
    }
}

/// Retry an async operation with exponential backoff.
pub async fn retry_with_backoff<F, Fut, T, E>(config: RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_predicate(config, operation, |_| true).await
}

/// Retry an async operation, consulting `should_retry` on each error.
///
/// # Examples
///
/// ```no_run
/// use caseflow_common::retry::{retry_with_predicate, RetryConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = RetryConfig::exponential(3);
///
///     let result = retry_with_predicate(
///         config,
///         || async {
///             Err::<(), _>(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"))
///         },
///         |err| err.kind() == std::io::ErrorKind::TimedOut,
///     )
///     .await;
///     assert!(result.is_err());
/// }
/// ```
pub async fn retry_with_predicate<F, Fut, T, E, P>(
    config: RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut backoff = ExponentialBackoff::new(config);

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !should_retry(&error) {
                    return Err(error);
                }

                backoff.next_attempt();

                if !backoff.has_attempts_remaining() {
                    return Err(error);
                }

                let delay = backoff.delay();
                tracing::debug!(
                    attempt = backoff.current_attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying operation after retryable error"
                );
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_exponential_backoff_doubles() {
        let mut backoff = ExponentialBackoff::new(RetryConfig::exponential(3));

        assert_eq!(backoff.delay(), Duration::ZERO);

        backoff.next_attempt();
        assert_eq!(backoff.delay(), Duration::from_millis(100));

        backoff.next_attempt();
        assert_eq!(backoff.delay(), Duration::from_millis(200));

        backoff.next_attempt();
        assert_eq!(backoff.delay(), Duration::from_millis(400));
        assert!(backoff.has_attempts_remaining());

        backoff.next_attempt();
        assert!(!backoff.has_attempts_remaining());
    }

    #[test]
    fn test_exponential_backoff_respects_max_delay() {
        let config = RetryConfig::exponential(10).with_max_delay(Duration::from_millis(500));
        let mut backoff = ExponentialBackoff::new(config);

        for _ in 0..10 {
            backoff.next_attempt();
        }

        assert!(backoff.delay() <= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_retry_eventual_success() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(RetryConfig::exponential(3), || {
            let counter = counter_clone.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(std::io::Error::new(std::io::ErrorKind::Other, "error"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(RetryConfig::exponential(2), || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(std::io::Error::new(std::io::ErrorKind::Other, "error"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3); // Initial + 2 retries
    }

    #[tokio::test]
    async fn test_predicate_stops_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_predicate(
            RetryConfig::exponential(3),
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "error",
                    ))
                }
            },
            |err| err.kind() == std::io::ErrorKind::TimedOut,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
