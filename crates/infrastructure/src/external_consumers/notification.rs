//! Notification service consumer.
//!
//! Delivers per-employee notifications. Used by the worker during the
//! case-creation fan-out; one call per recipient.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use caseflow_domain::identifiers::EmployeeId;

use super::{ExternalConsumerError, ExternalConsumerResult, ServiceHealth};

const SERVICE_NAME: &str = "notification";

/// Configuration for the notification service connection
#[derive(Debug, Clone)]
pub struct NotificationConsumerConfig {
    /// Base URL for the notification API
    pub base_url: String,
    /// API key for authentication (optional)
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for NotificationConsumerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8083".to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

impl NotificationConsumerConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> ExternalConsumerResult<Self> {
        let base_url = std::env::var("NOTIFICATION_API_URL").map_err(|_| {
            ExternalConsumerError::ConfigurationError("NOTIFICATION_API_URL not set".to_string())
        })?;

        let timeout_ms = std::env::var("NOTIFICATION_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            base_url,
            api_key: std::env::var("NOTIFICATION_API_KEY").ok(),
            timeout_ms,
        })
    }
}

#[derive(Debug, Serialize)]
struct NotificationRequest<'a> {
    recipient_id: EmployeeId,
    subject: &'a str,
    body: &'a str,
}

/// Notification service consumer implementation
pub struct NotificationConsumer {
    config: NotificationConsumerConfig,
    client: reqwest::Client,
}

impl NotificationConsumer {
    /// Create a new notification consumer
    pub fn new(config: NotificationConsumerConfig) -> ExternalConsumerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ExternalConsumerError::ConfigurationError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the current configuration
    pub fn config(&self) -> &NotificationConsumerConfig {
        &self.config
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send one notification to one employee.
    #[instrument(skip(self, subject, body), fields(recipient_id = %recipient))]
    pub async fn send(
        &self,
        recipient: EmployeeId,
        subject: &str,
        body: &str,
    ) -> ExternalConsumerResult<()> {
        let url = self.build_url("/v1/notifications");

        let mut builder = self.client.post(&url).json(&NotificationRequest {
            recipient_id: recipient,
            subject,
            body,
        });
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExternalConsumerError::from_reqwest(SERVICE_NAME, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ExternalConsumerError::NotFound(format!(
                "recipient {}",
                recipient
            )));
        }
        if !response.status().is_success() {
            return Err(ExternalConsumerError::ServiceUnavailable(format!(
                "{} returned {}",
                SERVICE_NAME,
                response.status()
            )));
        }

        debug!(recipient_id = %recipient, "Notification delivered");
        Ok(())
    }

    /// Health check against the notification service.
    pub async fn health_check(&self) -> ServiceHealth {
        let url = self.build_url("/health");
        let start = std::time::Instant::now();

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => ServiceHealth {
                healthy: true,
                latency_ms: start.elapsed().as_millis() as u64,
                error: None,
            },
            Ok(response) => ServiceHealth {
                healthy: false,
                latency_ms: start.elapsed().as_millis() as u64,
                error: Some(format!("status {}", response.status())),
            },
            Err(e) => ServiceHealth {
                healthy: false,
                latency_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
            },
        }
    }
}
