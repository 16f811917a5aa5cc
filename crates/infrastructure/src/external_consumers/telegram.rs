//! Telegram chat notifier.
//!
//! Posts a short message to the shared support chat when a case is created.
//! This is the second leg of the creation fan-out, next to the per-admin
//! notifications.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use caseflow_domain::case::CaseKind;

use super::{ExternalConsumerError, ExternalConsumerResult};

const SERVICE_NAME: &str = "telegram";

/// Configuration for the Telegram bot connection
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL; overridable for tests
    pub api_base: String,
    /// Bot token
    pub bot_token: String,
    /// Target chat identifier
    pub chat_id: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl TelegramConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> ExternalConsumerResult<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            ExternalConsumerError::ConfigurationError("TELEGRAM_BOT_TOKEN not set".to_string())
        })?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").map_err(|_| {
            ExternalConsumerError::ConfigurationError("TELEGRAM_CHAT_ID not set".to_string())
        })?;

        let timeout_ms = std::env::var("TELEGRAM_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token,
            chat_id,
            timeout_ms,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram bot client for the shared support chat
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(config: TelegramConfig) -> ExternalConsumerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ExternalConsumerError::ConfigurationError(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    /// Send a free-form text message to the configured chat.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, text: &str) -> ExternalConsumerResult<()> {
        let url = self.send_message_url();

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.config.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| ExternalConsumerError::from_reqwest(SERVICE_NAME, e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ExternalConsumerError::ConfigurationError(
                "Telegram bot token rejected".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(ExternalConsumerError::ServiceUnavailable(format!(
                "{} returned {}",
                SERVICE_NAME,
                response.status()
            )));
        }

        debug!("Chat message delivered");
        Ok(())
    }

    /// Announce a newly created case in the support chat.
    pub async fn send_case_created_message(
        &self,
        kind: CaseKind,
        title: &str,
        requester_name: &str,
    ) -> ExternalConsumerResult<()> {
        let text = format!(
            "New case [{}] {} (raised by {})",
            kind.display_name(),
            title,
            requester_name
        );
        self.send_message(&text).await
    }
}
