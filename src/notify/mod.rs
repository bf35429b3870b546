//! Outbound chat notifications: subscriptions, message rendering, delivery.

pub mod alerts;
pub mod subscriptions;
pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

pub use alerts::{send_out_of_stock_summary, OutOfStock, PriceAlert};
pub use subscriptions::Subscriptions;
pub use telegram::TelegramNotifier;

/// Delivers alert messages to subscribed recipients - enables mocking for tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` to every recipient subscribed to `category`.
    ///
    /// Returns `Ok(false)` if any single delivery failed; other recipients
    /// are still attempted.
    async fn send(&self, message: &str, category: &str) -> Result<bool>;

    /// Sends `message` once to every recipient subscribed to any of `categories`.
    async fn send_grouped(&self, message: &str, categories: &[String]) -> Result<bool>;
}

/// Notifier that only logs, used for dry runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str, category: &str) -> Result<bool> {
        info!("[dry-run] Would send {} alert:\n{}", category, message);
        Ok(true)
    }

    async fn send_grouped(&self, message: &str, categories: &[String]) -> Result<bool> {
        info!("[dry-run] Would send alert for {}:\n{}", categories.join(", "), message);
        Ok(true)
    }
}
