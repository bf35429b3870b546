//! HTTP clients for the two shops.

use super::http::ShopSession;
use super::parser::{self, ShopAListing};
use super::{ShopA, ShopB};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Shop A product page scraper.
pub struct ShopAClient {
    session: ShopSession,
    base_url: String,
}

impl ShopAClient {
    /// Creates a new Shop A client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            session: ShopSession::new(config).context("Failed to create Shop A HTTP client")?,
            base_url: config.shop_a_url.trim_end_matches('/').to_string(),
        })
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/single-product.php?id={}", self.base_url, urlencoding::encode(product_id))
    }
}

#[async_trait]
impl ShopA for ShopAClient {
    async fn fetch(&self, product_id: &str) -> Result<ShopAListing> {
        info!("Extracting info from Shop A product ID: {}", product_id);
        let html = self.session.get(&self.product_url(product_id)).await?;
        Ok(parser::parse_shop_a(&html))
    }
}

/// Shop B product page scraper with a randomized pause before every request.
pub struct ShopBClient {
    session: ShopSession,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl ShopBClient {
    /// Creates a new Shop B client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            session: ShopSession::new(config).context("Failed to create Shop B HTTP client")?,
            delay_min_ms: config.shop_b_delay_min_ms.min(config.shop_b_delay_max_ms),
            delay_max_ms: config.shop_b_delay_min_ms.max(config.shop_b_delay_max_ms),
        })
    }

    /// Sleeps a random time in the configured range.
    async fn delay(&self) {
        if self.delay_max_ms == 0 {
            return;
        }

        let delay = rand::random_range(self.delay_min_ms..=self.delay_max_ms);
        debug!("Waiting {}ms before Shop B request...", delay);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

#[async_trait]
impl ShopB for ShopBClient {
    async fn fetch(&self, link: &str) -> Result<Option<f64>> {
        info!("Extracting price from Shop B link: {}", link);
        self.delay().await;

        let html = self.session.get(link).await?;
        Ok(parser::parse_shop_b(&html))
    }
}
