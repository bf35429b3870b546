//! Scrapers for the two shops: HTTP session, selectors, parsing.

pub mod client;
pub mod digits;
pub mod http;
pub mod parser;
pub mod selectors;

use anyhow::Result;
use async_trait::async_trait;

pub use client::{ShopAClient, ShopBClient};
pub use parser::ShopAListing;

/// Shop A lookup by product id - enables mocking for tests.
#[async_trait]
pub trait ShopA: Send + Sync {
    /// Fetches current price and stock. Errors on network or HTTP failure.
    async fn fetch(&self, product_id: &str) -> Result<ShopAListing>;
}

/// Shop B lookup by product page link - enables mocking for tests.
#[async_trait]
pub trait ShopB: Send + Sync {
    /// Fetches the current lowest price. Errors on network or HTTP failure.
    async fn fetch(&self, link: &str) -> Result<Option<f64>>;
}
