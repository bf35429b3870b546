//! The `check` command: validate the catalog layout without scraping.

use crate::catalog::schema::row_from_record;
use crate::catalog::{CatalogStore, ColumnMap, SheetsClient};
use crate::config::Config;
use anyhow::{Context, Result};
use std::fmt::Write;
use tracing::info;

/// Reads the catalog, resolves its columns, and reports row counts.
pub struct CheckCommand {
    config: Config,
}

impl CheckCommand {
    /// Creates a new check command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Checks the configured worksheet and returns a printable summary.
    pub async fn execute(&self) -> Result<String> {
        let store =
            SheetsClient::new(&self.config).context("Failed to create Google Sheets client")?;

        self.execute_with_store(&store).await
    }

    /// Checks a provided store (for testing).
    pub async fn execute_with_store(&self, store: &dyn CatalogStore) -> Result<String> {
        let headers = store.get_schema().await.context("Failed to read catalog header")?;
        if headers.is_empty() {
            return Ok(format!("Worksheet '{}' is empty", self.config.worksheet));
        }

        let columns = ColumnMap::resolve(&headers)?;
        let records = store.read_all_rows().await.context("Failed to read catalog rows")?;
        info!("Read {} catalog rows", records.len());

        let rows: Vec<_> =
            records.iter().enumerate().map(|(i, record)| row_from_record(i, record)).collect();
        let trackable = rows.iter().filter(|row| row.is_trackable()).count();
        let linked = rows
            .iter()
            .filter(|row| row.is_trackable() && row.comparison_link().is_some())
            .count();

        let mut output = String::new();
        writeln!(output, "Worksheet:      {}", self.config.worksheet)?;
        writeln!(
            output,
            "Columns:        ShopA_ID={} ShopA_Price={} ShopA_Stock={} ShopB_Price={} ShopB_Link={} Category={}",
            columns.product_id,
            columns.shop_a_price,
            columns.shop_a_stock,
            columns.shop_b_price,
            columns.shop_b_link,
            columns.category
        )?;
        writeln!(output, "Rows:           {}", rows.len())?;
        writeln!(output, "Trackable:      {}", trackable)?;
        writeln!(output, "Skipped:        {}", rows.len() - trackable)?;
        write!(output, "With Shop B:    {}", linked)?;

        Ok(output)
    }
}
