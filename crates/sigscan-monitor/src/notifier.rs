//! Signal notifiers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sigscan_core::error::NotifyError;
use sigscan_core::traits::Notifier;
use std::time::Duration;
use tracing::{debug, info};

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Send signals to Telegram
    pub enabled: bool,
    pub telegram_url: String,
    pub token_env: String,
    pub chat_id_env: String,
    /// Echo every signal message to the log
    pub log_signals: bool,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            telegram_url: "https://api.telegram.org".to_string(),
            token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
            log_signals: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    base_url: String,
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::NotConfigured(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    /// Create from the environment variables named in `settings`.
    pub fn from_settings(settings: &NotifySettings) -> Result<Self, NotifyError> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| NotifyError::NotConfigured(format!("{} is not set", name)))
        };
        Self::new(
            settings.telegram_url.as_str(),
            var(&settings.token_env)?,
            var(&settings.chat_id_env)?,
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "Markdown",
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.without_url().to_string()))?;

        let status = resp.status();
        let body: TelegramResponse = resp
            .json()
            .await
            .map_err(|e| NotifyError::Delivery(format!("{}: {}", status, e.without_url())))?;

        if !status.is_success() || !body.ok {
            return Err(NotifyError::Delivery(format!(
                "{}: {}",
                status,
                body.description.unwrap_or_default()
            )));
        }

        debug!("telegram message delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Writes each message to the log at info level.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!(target: "sigscan::signals", "{}", message);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
