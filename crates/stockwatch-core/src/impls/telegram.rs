//! TelegramChannel - Bot API 経由の MessageChannel 実装
//!
//! 受信者単位の失敗（ブロックされた、chat が消えた、ネットワーク断）は
//! outcome に畳み込む。この層からエラー型は出ていかない。

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{MonitorError, NotificationOutcome};
use crate::ports::MessageChannel;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Same file shape as the registration bot's `telegram_config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

impl TelegramConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            MonitorError::Infrastructure(format!("read telegram config {}: {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            MonitorError::Infrastructure(format!("parse telegram config {}: {e}", path.display()))
        })
    }
}

pub struct TelegramChannel {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: config.bot_token,
        }
    }

    /// Point at a different endpoint (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    fn payload(chat_id: i64, body: &str) -> serde_json::Value {
        serde_json::json!({
            "chat_id": chat_id,
            "text": body,
            "parse_mode": "Markdown",
        })
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn send(&self, chat_id: i64, body: &str) -> NotificationOutcome {
        let response = self
            .http
            .post(self.send_url())
            .json(&Self::payload(chat_id, body))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let message_id = resp
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v["result"]["message_id"].as_i64());
                match message_id {
                    Some(id) => NotificationOutcome::delivered(chat_id, format!("message {id}")),
                    None => NotificationOutcome::delivered(chat_id, "delivered"),
                }
            }
            Ok(resp) => {
                let description = resp
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v["description"].as_str().map(str::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string());
                NotificationOutcome::failed(chat_id, description)
            }
            Err(e) => NotificationOutcome::failed(chat_id, e.to_string()),
        }
    }
}
