use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::notify::{Channel, NotifyError};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram bot-API channel: POSTs `sendMessage` for a fixed chat.
pub struct TelegramChannel {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_api_base("https://api.telegram.org", bot_token, chat_id)
    }

    /// Overridable base URL so tests can point the channel at a local mock.
    pub fn with_api_base(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: String,
    disable_web_page_preview: bool,
}

#[async_trait::async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = serde_json::to_string(&TelegramMessage {
            chat_id: &self.chat_id,
            text: format!("{title}\n{body}"),
            disable_web_page_preview: true,
        })
        .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::HttpStatus(response.status().as_u16()))
        }
    }
}

/// Generic signed-webhook channel: POSTs a JSON document with a timestamp
/// header and a sha256 signature over `{ts}\n{secret}\n{payload}`.
pub struct SignedWebhookChannel {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl SignedWebhookChannel {
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            secret: secret.into(),
        }
    }
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    title: &'a str,
    text: &'a str,
    ts: i64,
}

#[async_trait::async_trait]
impl Channel for SignedWebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let ts = Utc::now().timestamp();
        let payload = serde_json::to_string(&WebhookMessage {
            title,
            text: body,
            ts,
        })
        .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let signature = hex_digest(&format!("{ts}\n{}\n{payload}", self.secret));

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Watch-Timestamp", ts.to_string())
            .header("X-Watch-Signature", signature)
            .body(payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::HttpStatus(response.status().as_u16()))
        }
    }
}

fn hex_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
