//! Shared HTTP session for the shop scrapers.

use crate::config::Config;
use crate::error::SyncError;
use crate::retry::Backoff;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Statuses worth another try; the shops return 404 transiently under load.
const RETRY_STATUSES: [u16; 5] = [404, 500, 502, 503, 504];

/// Browser-like HTTP session with bounded retries on transient statuses.
pub struct ShopSession {
    client: Client,
    retries: u32,
    backoff: Backoff,
}

impl ShopSession {
    /// Creates a session using the proxy and retry settings in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, retries: config.http_retries, backoff: config.http_backoff() })
    }

    /// GETs a page, retrying transient failures up to the configured count.
    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retries && is_transient(&e) => {
                    attempt += 1;
                    let wait = self.backoff.delay_for(attempt);
                    warn!("{} (retry {}/{} in {:?})", e, attempt, self.retries, wait);
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(SyncError::Http { status: status.as_u16(), body: String::new() }.into());
        }

        response.text().await.context("Failed to read response body")
    }
}

/// Retryable statuses plus connect, timeout, reset and body-read failures.
fn is_transient(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(SyncError::Http { status, .. }) = cause.downcast_ref::<SyncError>() {
            return RETRY_STATUSES.contains(status);
        }

        cause.downcast_ref::<wreq::Error>().is_some_and(|e| {
            e.is_connect() || e.is_timeout() || e.is_connection_reset() || e.is_body()
        })
    })
}
