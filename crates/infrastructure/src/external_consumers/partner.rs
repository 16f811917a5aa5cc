//! Partner registry consumer.
//!
//! Resolves counterparty partner references (customers, suppliers, partners)
//! when a case attaches or changes its counterparty.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use caseflow_application::{ApplicationError, PartnerPort, PartnerRef};
use caseflow_common::retry::retry_with_predicate;
use caseflow_domain::identifiers::PartnerId;

use super::{lookup_retry, ExternalConsumerError, ExternalConsumerResult, ServiceHealth};

const SERVICE_NAME: &str = "partner";

/// Configuration for the partner registry connection
#[derive(Debug, Clone)]
pub struct PartnerConsumerConfig {
    /// Base URL for the partner API
    pub base_url: String,
    /// API key for authentication (optional)
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for PartnerConsumerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082".to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

impl PartnerConsumerConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> ExternalConsumerResult<Self> {
        let base_url = std::env::var("PARTNER_API_URL").map_err(|_| {
            ExternalConsumerError::ConfigurationError("PARTNER_API_URL not set".to_string())
        })?;

        let timeout_ms = std::env::var("PARTNER_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            base_url,
            api_key: std::env::var("PARTNER_API_KEY").ok(),
            timeout_ms,
        })
    }
}

/// Partner record as returned by the registry.
#[derive(Debug, Clone, Deserialize)]
struct PartnerDto {
    id: Uuid,
    name: String,
}

impl From<PartnerDto> for PartnerRef {
    fn from(dto: PartnerDto) -> Self {
        Self {
            id: PartnerId::from(dto.id),
            name: dto.name,
        }
    }
}

/// Partner registry consumer implementation
pub struct PartnerConsumer {
    config: PartnerConsumerConfig,
    client: reqwest::Client,
}

impl PartnerConsumer {
    /// Create a new partner consumer
    pub fn new(config: PartnerConsumerConfig) -> ExternalConsumerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ExternalConsumerError::ConfigurationError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the current configuration
    pub fn config(&self) -> &PartnerConsumerConfig {
        &self.config
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }
        builder
    }

    /// Look up one partner. `None` means the registry has no such record.
    ///
    /// Transient failures are retried with backoff before surfacing.
    #[instrument(skip(self), fields(partner_id = %id))]
    pub async fn get_partner(&self, id: PartnerId) -> ExternalConsumerResult<Option<PartnerRef>> {
        retry_with_predicate(
            lookup_retry(),
            || self.fetch_partner(id),
            ExternalConsumerError::is_retryable,
        )
        .await
    }

    async fn fetch_partner(&self, id: PartnerId) -> ExternalConsumerResult<Option<PartnerRef>> {
        let url = self.build_url(&format!("/v1/partners/{}", id));

        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| ExternalConsumerError::from_reqwest(SERVICE_NAME, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ExternalConsumerError::ServiceUnavailable(format!(
                "{} returned {}",
                SERVICE_NAME,
                response.status()
            )));
        }

        let dto: PartnerDto =
            response
                .json()
                .await
                .map_err(|e| ExternalConsumerError::InvalidResponse {
                    service: SERVICE_NAME.to_string(),
                    message: e.to_string(),
                })?;

        debug!(partner_id = %id, "Partner resolved");
        Ok(Some(dto.into()))
    }

    /// Health check against the registry.
    pub async fn health_check(&self) -> ServiceHealth {
        let url = self.build_url("/health");
        let start = std::time::Instant::now();

        match self.request(&url).send().await {
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

#[async_trait]
impl PartnerPort for PartnerConsumer {
    async fn resolve_partner(
        &self,
        id: PartnerId,
    ) -> Result<Option<PartnerRef>, ApplicationError> {
        Ok(self.get_partner(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PartnerConsumerConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
    }
}
