//! Configuration management for the application.
//!
//! This module provides a centralized configuration system that loads settings
//! from environment variables and configuration files.
//!
//! ## Example Configuration
//!
//! ```toml
//! [database]
//! url = "postgres://localhost:5432/caseflow"
//! pool_size = 10
//!
//! [queue]
//! url = "redis://localhost:6379"
//!
//! [telemetry]
//! service_name = "caseflow"
//! log_level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub telemetry: TelemetryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,
}

/// Job queue (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_queue_pool_size")]
    pub pool_size: u32,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    30
}

fn default_queue_pool_size() -> u32 {
    5
}

fn default_service_name() -> String {
    "caseflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables and configuration files.
    ///
    /// The configuration is loaded in the following order (later sources
    /// override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use caseflow_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Database pool size: {}", config.database.pool_size);
    /// ```
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            // Start with default configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add environment-specific configuration
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Add environment variables (prefix: APP_)
            // Example: APP_DATABASE__POOL_SIZE=20
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if self.database.pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.database.timeout_seconds == 0 {
            anyhow::bail!("Database timeout must be greater than 0");
        }

        if self.queue.url.is_empty() {
            anyhow::bail!("Queue URL is required");
        }

        if self.queue.pool_size == 0 {
            anyhow::bail!("Queue pool size must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the database connection timeout as a Duration
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.timeout_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost:5432/caseflow_dev".to_string(),
                pool_size: 5,
                timeout_seconds: 30,
            },
            queue: QueueConfig {
                url: "redis://localhost:6379".to_string(),
                pool_size: 5,
            },
            telemetry: TelemetryConfig {
                service_name: "caseflow-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
        }
    }
}
