//! stock-sync - Keep a Google Sheets product catalog in line with two shops
//!
//! Scrapes Shop A (price and stock) and Shop B (comparison price) for every
//! catalog row, writes the results back in rate-limited batches, and sends
//! Telegram alerts for large price gaps and out-of-stock products.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod pricing;
pub mod retry;
pub mod shops;
pub mod sync;

pub use catalog::{CatalogRow, CatalogStore, CellUpdate, Stock};
pub use config::Config;
pub use error::SyncError;
pub use notify::Notifier;
pub use sync::{Reconciler, RunReport, Thresholds};
