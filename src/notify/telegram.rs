use std::time::Duration;

use reqwest::Client;

use super::Notifier;
use crate::error::SendError;

/// Telegram Bot API sink. One attempt per alert, no retries: losing a
/// notification is preferred over duplicate floods on a flaky transport.
pub struct TelegramNotifier {
    token: Option<String>,
    chat_id: Option<String>,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("TELEGRAM_TOKEN").ok(),
            chat_id: std::env::var("CHAT_ID").ok(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Explicit builder for tests/tools.
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token: Some(token),
            chat_id: Some(chat_id),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            tracing::debug!("Telegram disabled (no TELEGRAM_TOKEN/CHAT_ID)");
            return Ok(());
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });

        self.client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
