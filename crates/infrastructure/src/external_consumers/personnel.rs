//! Personnel directory consumer.
//!
//! Resolves employee references at create/update time and supplies the
//! active-administrator roster for the creation fan-out.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use caseflow_application::{ApplicationError, EmployeeRef, PersonnelPort};
use caseflow_common::retry::retry_with_predicate;
use caseflow_domain::identifiers::EmployeeId;

use super::{lookup_retry, ExternalConsumerError, ExternalConsumerResult, ServiceHealth};

const SERVICE_NAME: &str = "personnel";

/// Configuration for the personnel directory connection
#[derive(Debug, Clone)]
pub struct PersonnelConsumerConfig {
    /// Base URL for the personnel API
    pub base_url: String,
    /// API key for authentication (optional)
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for PersonnelConsumerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

impl PersonnelConsumerConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> ExternalConsumerResult<Self> {
        let base_url = std::env::var("PERSONNEL_API_URL").map_err(|_| {
            ExternalConsumerError::ConfigurationError("PERSONNEL_API_URL not set".to_string())
        })?;

        let timeout_ms = std::env::var("PERSONNEL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            base_url,
            api_key: std::env::var("PERSONNEL_API_KEY").ok(),
            timeout_ms,
        })
    }
}

/// Employee record as returned by the personnel directory.
#[derive(Debug, Clone, Deserialize)]
struct EmployeeDto {
    id: Uuid,
    display_name: String,
    email: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

impl From<EmployeeDto> for EmployeeRef {
    fn from(dto: EmployeeDto) -> Self {
        Self {
            id: EmployeeId::from(dto.id),
            display_name: dto.display_name,
            email: dto.email,
            is_admin: dto.is_admin,
        }
    }
}

/// Personnel directory consumer implementation
pub struct PersonnelConsumer {
    config: PersonnelConsumerConfig,
    client: reqwest::Client,
}

impl PersonnelConsumer {
    /// Create a new personnel consumer
    pub fn new(config: PersonnelConsumerConfig) -> ExternalConsumerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ExternalConsumerError::ConfigurationError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the current configuration
    pub fn config(&self) -> &PersonnelConsumerConfig {
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

    /// Look up one employee. `None` means the directory has no such record.
    ///
    /// Transient failures are retried with backoff before surfacing.
    #[instrument(skip(self), fields(employee_id = %id))]
    pub async fn get_employee(&self, id: EmployeeId) -> ExternalConsumerResult<Option<EmployeeRef>> {
        retry_with_predicate(
            lookup_retry(),
            || self.fetch_employee(id),
            ExternalConsumerError::is_retryable,
        )
        .await
    }

    async fn fetch_employee(&self, id: EmployeeId) -> ExternalConsumerResult<Option<EmployeeRef>> {
        let url = self.build_url(&format!("/v1/employees/{}", id));

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

        let dto: EmployeeDto =
            response
                .json()
                .await
                .map_err(|e| ExternalConsumerError::InvalidResponse {
                    service: SERVICE_NAME.to_string(),
                    message: e.to_string(),
                })?;

        debug!(employee_id = %id, "Employee resolved");
        Ok(Some(dto.into()))
    }

    /// Fetch the current active-administrator roster.
    ///
    /// Transient failures are retried with backoff before surfacing.
    #[instrument(skip(self))]
    pub async fn get_active_admins(&self) -> ExternalConsumerResult<Vec<EmployeeRef>> {
        retry_with_predicate(
            lookup_retry(),
            || self.fetch_active_admins(),
            ExternalConsumerError::is_retryable,
        )
        .await
    }

    async fn fetch_active_admins(&self) -> ExternalConsumerResult<Vec<EmployeeRef>> {
        let url = self.build_url("/v1/employees");

        let response = self
            .request(&url)
            .query(&[("role", "admin"), ("active", "true")])
            .send()
            .await
            .map_err(|e| ExternalConsumerError::from_reqwest(SERVICE_NAME, e))?;

        if !response.status().is_success() {
            return Err(ExternalConsumerError::ServiceUnavailable(format!(
                "{} returned {}",
                SERVICE_NAME,
                response.status()
            )));
        }

        let dtos: Vec<EmployeeDto> =
            response
                .json()
                .await
                .map_err(|e| ExternalConsumerError::InvalidResponse {
                    service: SERVICE_NAME.to_string(),
                    message: e.to_string(),
                })?;

        debug!(count = dtos.len(), "Active admins fetched");
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    /// Health check against the directory.
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
impl PersonnelPort for PersonnelConsumer {
    async fn resolve_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeRef>, ApplicationError> {
        Ok(self.get_employee(id).await?)
    }

    async fn list_active_admins(&self) -> Result<Vec<EmployeeRef>, ApplicationError> {
        Ok(self.get_active_admins().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PersonnelConsumerConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_build_url_strips_trailing_slash() {
        let consumer = PersonnelConsumer::new(PersonnelConsumerConfig {
            base_url: "http://personnel.local/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            consumer.build_url("/v1/employees"),
            "http://personnel.local/v1/employees"
        );
    }
}
