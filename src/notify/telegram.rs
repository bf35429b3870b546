//! Telegram Bot API notifier.

use super::{Notifier, Subscriptions};
use crate::config::Config;
use crate::error::SyncError;
use crate::retry::Backoff;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info};
use wreq::Client;

/// Sends HTML messages through a Telegram bot to subscribed chats.
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    subscriptions: Subscriptions,
    backoff: Backoff,
}

impl TelegramNotifier {
    /// Creates a notifier from the bot token and subscriptions in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let token = config
            .telegram_token
            .as_deref()
            .context("Missing Telegram bot token (set telegram_token or STOCK_SYNC_TELEGRAM_TOKEN)")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        info!("Telegram notifier initialized for {} recipients", config.subscriptions.len());

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url.trim_end_matches('/'),
                token
            ),
            subscriptions: config.subscriptions.clone(),
            backoff: config.backoff(),
        })
    }

    /// One sendMessage call, retried while Telegram reports a rate limit.
    async fn deliver(&self, chat_id: &str, message: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": message,
            "parse_mode": "HTML",
        })
        .to_string();

        let client = &self.client;
        let url = self.send_url.as_str();
        let payload = payload.as_str();

        let label = format!("Telegram message to {}", chat_id);
        self.backoff
            .retry_on_quota(&label, || async move {
                debug!("POST sendMessage chat_id={}", chat_id);

                let response = client
                    .post(url)
                    .header("Content-Type", "application/json")
                    .body(payload.to_string())
                    .send()
                    .await
                    .context("Failed to send Telegram request")?;

                let status = response.status();
                if status.is_success() {
                    return Ok(());
                }

                let body = response.text().await.unwrap_or_default();
                Err(anyhow::Error::from(SyncError::from_response(status.as_u16(), body)))
            })
            .await
    }

    async fn deliver_all<'a>(
        &self,
        recipients: impl IntoIterator<Item = &'a str>,
        message: &str,
        what: &str,
    ) -> bool {
        let mut success = true;

        for chat_id in recipients {
            match self.deliver(chat_id, message).await {
                Ok(()) => info!("{} sent successfully to chat_id: {}", what, chat_id),
                Err(e) => {
                    error!("Failed to send {} to chat_id {}: {:#}", what, chat_id, e);
                    success = false;
                }
            }
        }

        success
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str, category: &str) -> Result<bool> {
        let recipients: Vec<&str> = self.subscriptions.recipients_for(category).collect();
        if recipients.is_empty() {
            debug!("No recipients subscribed to {}", category);
        }

        let what = format!("Message for category {}", category);
        Ok(self.deliver_all(recipients, message, &what).await)
    }

    async fn send_grouped(&self, message: &str, categories: &[String]) -> Result<bool> {
        let mut sent_to = HashSet::new();
        let recipients: Vec<&str> = self
            .subscriptions
            .recipients_for_any(categories)
            .into_iter()
            .filter(|chat_id| sent_to.insert(*chat_id))
            .collect();

        Ok(self.deliver_all(recipients, message, "Out of stock message").await)
    }
}
