//! The product catalog: row model, column schema, and the spreadsheet store.

pub mod models;
pub mod schema;
pub mod sheets;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

pub use models::{CatalogRow, CellUpdate, Stock, NO_LINK};
pub use schema::{columns, ColumnMap};
pub use sheets::SheetsClient;

/// A data row keyed by header name.
pub type Record = HashMap<String, String>;

/// Tabular catalog storage - enables mocking for tests.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Header row, in column order. Empty if the worksheet has no data.
    async fn get_schema(&self) -> Result<Vec<String>>;

    /// Every data row below the header, in sheet order.
    async fn read_all_rows(&self) -> Result<Vec<Record>>;

    /// Applies all updates; implementations chunk and rate-limit internally.
    async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()>;
}

/// Reads through to a real store but only logs writes.
pub struct DryRunStore<S> {
    inner: S,
}

impl<S: CatalogStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: CatalogStore> CatalogStore for DryRunStore<S> {
    async fn get_schema(&self) -> Result<Vec<String>> {
        self.inner.get_schema().await
    }

    async fn read_all_rows(&self) -> Result<Vec<Record>> {
        self.inner.read_all_rows().await
    }

    async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()> {
        for update in updates {
            info!("[dry-run] Would write row {} col {} = {}", update.row, update.column, update.value);
        }
        Ok(())
    }
}
