//! The reconciliation pass: scrape every catalog row, queue cell updates,
//! and decide which alerts to send.
//!
//! Rows are handled strictly one after another. Scrape failures are logged
//! and absorbed per row and per shop; a missing column, a failed write, or a
//! failed dispatch aborts the pass and is left to the caller to retry.

mod report;

pub use report::RunReport;

use crate::catalog::schema::row_from_record;
use crate::catalog::{CatalogRow, CatalogStore, CellUpdate, ColumnMap, Stock};
use crate::config::Config;
use crate::notify::{send_out_of_stock_summary, Notifier, OutOfStock, PriceAlert};
use crate::pricing::{exceeds_threshold, price_difference};
use crate::shops::{ShopA, ShopB};
use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

/// Alerting limits for a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Alert when |difference| is strictly greater than this percentage
    pub price_alert_percent: f64,
    /// Send out-of-stock summaries only at or above this many products
    pub out_of_stock_minimum: usize,
}

impl Thresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            price_alert_percent: config.price_alert_percent,
            out_of_stock_minimum: config.out_of_stock_minimum,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// State accumulated over one pass; owned by [`Reconciler::run`].
#[derive(Default)]
struct PassState {
    updates: Vec<CellUpdate>,
    out_of_stock: Vec<OutOfStock>,
    report: RunReport,
}

/// Values resolved for a row during this pass (never from the sheet).
#[derive(Debug, Default)]
struct Fresh {
    shop_a_price: Option<f64>,
    shop_b_price: Option<f64>,
    stock: Option<Stock>,
}

/// Drives one reconciliation pass over the catalog.
pub struct Reconciler<'a> {
    store: &'a dyn CatalogStore,
    shop_a: &'a dyn ShopA,
    shop_b: &'a dyn ShopB,
    notifier: &'a dyn Notifier,
    thresholds: Thresholds,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        store: &'a dyn CatalogStore,
        shop_a: &'a dyn ShopA,
        shop_b: &'a dyn ShopB,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self { store, shop_a, shop_b, notifier, thresholds: Thresholds::default() }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Runs the full pass: scrape, write back, then out-of-stock summaries.
    pub async fn run(&self) -> Result<RunReport> {
        info!("Starting price and stock update process...");

        let headers = self.store.get_schema().await.context("Failed to read catalog header")?;
        if headers.is_empty() {
            warn!("No data found in catalog worksheet");
            return Ok(RunReport::default());
        }

        let columns = ColumnMap::resolve(&headers).inspect_err(|e| error!("{}", e))?;
        info!("Successfully identified all required columns");

        let records = self.store.read_all_rows().await.context("Failed to read catalog rows")?;
        let total = records.len();
        info!("Processing {} products", total);

        let mut state = PassState::default();
        state.report.rows_total = total;

        for (index, record) in records.iter().enumerate() {
            let row = row_from_record(index, record);
            info!("Processing product {}/{}", index + 1, total);
            self.process_row(&row, &columns, &mut state).await?;
        }

        if !state.updates.is_empty() {
            info!("Starting batch updates for {} total changes...", state.updates.len());
            self.store
                .batch_write(&state.updates)
                .await
                .context("Failed to write catalog updates")?;
            state.report.updates_written = state.updates.len();
        }

        state.report.out_of_stock = state.out_of_stock.len();
        if !state.out_of_stock.is_empty() {
            info!("Found {} out-of-stock products", state.out_of_stock.len());
            state.report.out_of_stock_messages = send_out_of_stock_summary(
                self.notifier,
                &state.out_of_stock,
                self.thresholds.out_of_stock_minimum,
            )
            .await
            .context("Failed to send out-of-stock summary")?;
        }

        info!("Price and stock update process completed successfully");
        Ok(state.report)
    }

    async fn process_row(
        &self,
        row: &CatalogRow,
        columns: &ColumnMap,
        state: &mut PassState,
    ) -> Result<()> {
        if !row.is_trackable() {
            warn!("Skipping row {}: Missing product ShopA_ID or category", row.row);
            state.report.rows_skipped += 1;
            return Ok(());
        }

        let product_id = row.product_id.as_str();
        let mut fresh = Fresh::default();

        if let Some(link) = row.comparison_link() {
            debug!("Processing Shop B data for product {}", product_id);
            match self.shop_b.fetch(link).await {
                Ok(Some(price)) => {
                    state.updates.push(CellUpdate::price(row.row, columns.shop_b_price, price));
                    fresh.shop_b_price = Some(price);
                    info!("Product {}: Shop B price = {}", product_id, price);
                }
                Ok(None) => warn!("Product {}: no Shop B price found", product_id),
                Err(e) => {
                    error!("Error processing Shop B for product {}: {:#}", product_id, e);
                    state.report.shop_b_failures += 1;
                }
            }
        }

        debug!("Processing Shop A data for product {}", product_id);
        match self.shop_a.fetch(product_id).await {
            Ok(listing) => {
                if let Some(price) = listing.price {
                    state.updates.push(CellUpdate::price(row.row, columns.shop_a_price, price));
                    fresh.shop_a_price = Some(price);
                    info!("Product {}: Shop A price = {}", product_id, price);
                }

                if let Some(stock) = listing.stock {
                    state.updates.push(CellUpdate::stock(row.row, columns.shop_a_stock, stock));
                    fresh.stock = Some(stock);
                    info!("Product {}: Stock = {}", product_id, stock.as_cell());

                    if stock == Stock::OutOfStock {
                        info!("Product {} is out of stock", product_id);
                        state.out_of_stock.push(OutOfStock {
                            product_id: row.product_id.clone(),
                            title: row.title.clone(),
                            display_name: row.display_name.clone(),
                            category: row.category.clone(),
                        });
                    }
                }
            }
            Err(e) => {
                error!("Error processing Shop A for product {}: {:#}", product_id, e);
                state.report.shop_a_failures += 1;
            }
        }

        if self.check_price_gap(row, &fresh).await? {
            state.report.price_alerts += 1;
        }

        Ok(())
    }

    /// Sends an immediate alert when both prices and in-stock status were
    /// scraped this pass and the gap exceeds the threshold.
    async fn check_price_gap(&self, row: &CatalogRow, fresh: &Fresh) -> Result<bool> {
        let (Some(shop_a_price), Some(shop_b_price), Some(stock)) =
            (fresh.shop_a_price, fresh.shop_b_price, fresh.stock)
        else {
            return Ok(false);
        };
        if !stock.is_in_stock() {
            return Ok(false);
        }

        let Some(diff) = price_difference(shop_a_price, shop_b_price) else {
            return Ok(false);
        };
        if !exceeds_threshold(diff, self.thresholds.price_alert_percent) {
            return Ok(false);
        }

        info!("Price difference alert for {}: {}%", row.product_id, diff);

        let display_name =
            if row.display_name.is_empty() { row.title.as_str() } else { row.display_name.as_str() };
        let message = PriceAlert {
            product_id: &row.product_id,
            display_name,
            category: &row.category,
            shop_a_price,
            shop_b_price,
            diff_percent: diff,
        }
        .render();

        let delivered = self
            .notifier
            .send(&message, &row.category)
            .await
            .with_context(|| format!("Failed to send price alert for product {}", row.product_id))?;
        if !delivered {
            warn!("Price alert for {} was not delivered to every recipient", row.product_id);
        }
        info!("Sent price difference alert for product {}", row.product_id);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Record;
    use crate::shops::ShopAListing;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const HEADERS: [&str; 8] = [
        "ShopA_ID",
        "Title",
        "Name",
        "Category",
        "ShopA_Price",
        "ShopA_Stock",
        "ShopB_Link",
        "ShopB_Price",
    ];

    // 1-based positions of the HEADERS above
    const COL_A_PRICE: u32 = 5;
    const COL_A_STOCK: u32 = 6;
    const COL_B_PRICE: u32 = 8;

    struct MockStore {
        headers: Vec<String>,
        rows: Vec<Record>,
        written: Mutex<Vec<CellUpdate>>,
        fail_write: bool,
    }

    impl MockStore {
        fn new(rows: Vec<Record>) -> Self {
            Self {
                headers: HEADERS.iter().map(|s| s.to_string()).collect(),
                rows,
                written: Mutex::new(Vec::new()),
                fail_write: false,
            }
        }

        fn written(&self) -> Vec<CellUpdate> {
            self.written.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogStore for MockStore {
        async fn get_schema(&self) -> Result<Vec<String>> {
            Ok(self.headers.clone())
        }

        async fn read_all_rows(&self) -> Result<Vec<Record>> {
            Ok(self.rows.clone())
        }

        async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()> {
            if self.fail_write {
                anyhow::bail!("Simulated write failure");
            }
            self.written.lock().unwrap().extend_from_slice(updates);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockShopA {
        listings: HashMap<String, ShopAListing>,
        calls: Mutex<Vec<String>>,
    }

    impl MockShopA {
        fn with(mut self, id: &str, price: Option<f64>, stock: Option<Stock>) -> Self {
            self.listings.insert(id.to_string(), ShopAListing { price, stock });
            self
        }
    }

    #[async_trait]
    impl ShopA for MockShopA {
        async fn fetch(&self, product_id: &str) -> Result<ShopAListing> {
            self.calls.lock().unwrap().push(product_id.to_string());
            match self.listings.get(product_id) {
                Some(listing) => Ok(*listing),
                None => anyhow::bail!("Simulated network error"),
            }
        }
    }

    #[derive(Default)]
    struct MockShopB {
        prices: HashMap<String, Option<f64>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockShopB {
        fn with(mut self, link: &str, price: Option<f64>) -> Self {
            self.prices.insert(link.to_string(), price);
            self
        }
    }

    #[async_trait]
    impl ShopB for MockShopB {
        async fn fetch(&self, link: &str) -> Result<Option<f64>> {
            self.calls.lock().unwrap().push(link.to_string());
            match self.prices.get(link) {
                Some(price) => Ok(*price),
                None => anyhow::bail!("Simulated network error"),
            }
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        direct: Mutex<Vec<(String, String)>>,
        grouped: Mutex<Vec<(String, Vec<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, message: &str, category: &str) -> Result<bool> {
            if self.fail {
                anyhow::bail!("Simulated transport failure");
            }
            self.direct.lock().unwrap().push((message.to_string(), category.to_string()));
            Ok(true)
        }

        async fn send_grouped(&self, message: &str, categories: &[String]) -> Result<bool> {
            if self.fail {
                anyhow::bail!("Simulated transport failure");
            }
            self.grouped.lock().unwrap().push((message.to_string(), categories.to_vec()));
            Ok(true)
        }
    }

    fn record(id: &str, category: &str, link: &str) -> Record {
        [
            ("ShopA_ID", id.to_string()),
            ("Title", format!("Title {}", id)),
            ("Name", format!("Name {}", id)),
            ("Category", category.to_string()),
            ("ShopA_Price", "1000".to_string()),
            ("ShopA_Stock", "1".to_string()),
            ("ShopB_Link", link.to_string()),
            ("ShopB_Price", "900".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[tokio::test]
    async fn test_price_gap_alert_fires() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", Some(110.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.price_alerts, 1);
        let direct = notifier.direct.lock().unwrap();
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].1, "CPU");
        assert!(direct[0].0.contains("+10.00%"));
        assert!(direct[0].0.contains("Name 1"));

        assert_eq!(
            store.written(),
            vec![
                CellUpdate::new(2, COL_B_PRICE, "100"),
                CellUpdate::new(2, COL_A_PRICE, "110"),
                CellUpdate::new(2, COL_A_STOCK, "1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_small_price_gap_no_alert() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", Some(102.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.price_alerts, 0);
        assert!(notifier.direct.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exactly_five_percent_no_alert() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", Some(105.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();
        assert_eq!(report.price_alerts, 0);
    }

    #[tokio::test]
    async fn test_no_alert_when_out_of_stock() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", Some(150.0), Some(Stock::OutOfStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.price_alerts, 0);
        assert_eq!(report.out_of_stock, 1);
        assert!(notifier.direct.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_alert_from_stale_sheet_values() {
        // Sheet has ShopB_Price = 900 but no link, so nothing is fresh for Shop B
        let store = MockStore::new(vec![record("1", "CPU", "-")]);
        let shop_a = MockShopA::default().with("1", Some(5000.0), Some(Stock::InStock));
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.price_alerts, 0);
        assert!(shop_b.calls.lock().unwrap().is_empty());
        assert_eq!(store.written().len(), 2);
    }

    #[tokio::test]
    async fn test_rows_missing_id_or_category_are_skipped() {
        let store = MockStore::new(vec![
            record("", "CPU", "https://b/1"),
            record("2", "", "https://b/2"),
        ]);
        let shop_a = MockShopA::default()
            .with("", Some(110.0), Some(Stock::OutOfStock))
            .with("2", Some(110.0), Some(Stock::OutOfStock));
        let shop_b =
            MockShopB::default().with("https://b/1", Some(100.0)).with("https://b/2", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.rows_total, 2);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.rows_processed(), 0);
        assert!(store.written().is_empty());
        assert!(shop_a.calls.lock().unwrap().is_empty());
        assert!(shop_b.calls.lock().unwrap().is_empty());
        assert!(notifier.direct.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_null_values_never_written() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", None, Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", None);
        let notifier = MockNotifier::default();

        Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(store.written(), vec![CellUpdate::new(2, COL_A_STOCK, "1")]);
    }

    #[tokio::test]
    async fn test_shop_b_failure_keeps_shop_a_data() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/broken")]);
        let shop_a = MockShopA::default().with("1", Some(110.0), Some(Stock::InStock));
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.shop_b_failures, 1);
        assert_eq!(report.price_alerts, 0);
        assert_eq!(
            store.written(),
            vec![CellUpdate::new(2, COL_A_PRICE, "110"), CellUpdate::new(2, COL_A_STOCK, "1")]
        );
    }

    #[tokio::test]
    async fn test_shop_a_failure_keeps_shop_b_data_and_continues() {
        let store = MockStore::new(vec![
            record("missing", "CPU", "https://b/1"),
            record("2", "GPU", "-"),
        ]);
        let shop_a = MockShopA::default().with("2", Some(50.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.shop_a_failures, 1);
        assert_eq!(
            store.written(),
            vec![
                CellUpdate::new(2, COL_B_PRICE, "100"),
                CellUpdate::new(3, COL_A_PRICE, "50"),
                CellUpdate::new(3, COL_A_STOCK, "1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_column_aborts_before_scraping() {
        let mut store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        store.headers.retain(|h| h != "ShopB_Link");
        let shop_a = MockShopA::default().with("1", Some(110.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let err =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap_err();

        assert!(err.to_string().contains("ShopB_Link"));
        assert!(shop_a.calls.lock().unwrap().is_empty());
        assert!(shop_b.calls.lock().unwrap().is_empty());
        assert!(store.written().is_empty());
    }

    #[tokio::test]
    async fn test_padded_headers_still_process_rows() {
        let pad = |key: &str| match key {
            "ShopA_ID" | "Category" => format!("{} ", key),
            other => other.to_string(),
        };
        let padded: Record =
            record("1", "CPU", "https://b/1").into_iter().map(|(k, v)| (pad(k.as_str()), v)).collect();

        let mut store = MockStore::new(vec![padded]);
        store.headers = store.headers.iter().map(|h| pad(h.as_str())).collect();
        let shop_a = MockShopA::default().with("1", Some(110.0), Some(Stock::InStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.rows_skipped, 0);
        assert_eq!(report.price_alerts, 1);
        assert_eq!(*shop_a.calls.lock().unwrap(), vec!["1".to_string()]);
        assert_eq!(store.written().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_worksheet_is_a_no_op() {
        let mut store = MockStore::new(Vec::new());
        store.headers.clear();
        let shop_a = MockShopA::default();
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();
        assert_eq!(report, RunReport::default());
    }

    #[tokio::test]
    async fn test_out_of_stock_below_minimum_sends_nothing() {
        let rows: Vec<_> = (0..7).map(|i| record(&i.to_string(), "CPU", "-")).collect();
        let store = MockStore::new(rows);
        let shop_a = (0..7).fold(MockShopA::default(), |m, i| {
            m.with(&i.to_string(), Some(100.0), Some(Stock::OutOfStock))
        });
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.out_of_stock, 7);
        assert_eq!(report.out_of_stock_messages, 0);
        assert!(notifier.grouped.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock_at_minimum_groups_by_category() {
        let categories = ["CPU", "GPU", "CPU", "RAM", "CPU", "GPU", "CPU", "RAM"];
        let rows: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| record(&i.to_string(), c, "-"))
            .collect();
        let store = MockStore::new(rows);
        let shop_a = (0..8).fold(MockShopA::default(), |m, i| {
            m.with(&i.to_string(), None, Some(Stock::OutOfStock))
        });
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let report =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap();

        assert_eq!(report.out_of_stock, 8);
        assert_eq!(report.out_of_stock_messages, 3);

        let grouped = notifier.grouped.lock().unwrap();
        let sent: Vec<_> = grouped.iter().map(|(_, c)| c.join(",")).collect();
        assert_eq!(sent, vec!["CPU", "GPU", "RAM"]);
        assert!(grouped[0].0.contains("4 products are out of stock"));
        assert!(grouped[0].0.contains("4. Product Name (ID: 6)"));
    }

    #[tokio::test]
    async fn test_custom_thresholds() {
        let store = MockStore::new(vec![record("1", "CPU", "https://b/1")]);
        let shop_a = MockShopA::default().with("1", Some(102.0), Some(Stock::OutOfStock));
        let shop_b = MockShopB::default().with("https://b/1", Some(100.0));
        let notifier = MockNotifier::default();

        let report = Reconciler::new(&store, &shop_a, &shop_b, &notifier)
            .with_thresholds(Thresholds { price_alert_percent: 1.0, out_of_stock_minimum: 1 })
            .run()
            .await
            .unwrap();

        // Out of stock, so no price alert even with a lower threshold
        assert_eq!(report.price_alerts, 0);
        assert_eq!(report.out_of_stock_messages, 1);
    }

    #[tokio::test]
    async fn test_write_failure_propagates_before_summaries() {
        let rows: Vec<_> = (0..8).map(|i| record(&i.to_string(), "CPU", "-")).collect();
        let mut store = MockStore::new(rows);
        store.fail_write = true;
        let shop_a = (0..8).fold(MockShopA::default(), |m, i| {
            m.with(&i.to_string(), None, Some(Stock::OutOfStock))
        });
        let shop_b = MockShopB::default();
        let notifier = MockNotifier::default();

        let err =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap_err();

        assert!(format!("{:#}", err).contains("Simulated write failure"));
        assert!(notifier.grouped.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_aborts_pass() {
        let store = MockStore::new(vec![
            record("1", "CPU", "https://b/1"),
            record("2", "CPU", "https://b/2"),
        ]);
        let shop_a = MockShopA::default()
            .with("1", Some(200.0), Some(Stock::InStock))
            .with("2", Some(200.0), Some(Stock::InStock));
        let shop_b =
            MockShopB::default().with("https://b/1", Some(100.0)).with("https://b/2", Some(100.0));
        let notifier = MockNotifier { fail: true, ..Default::default() };

        let err =
            Reconciler::new(&store, &shop_a, &shop_b, &notifier).run().await.unwrap_err();

        assert!(err.to_string().contains("price alert for product 1"));
        assert_eq!(*shop_a.calls.lock().unwrap(), vec!["1".to_string()]);
        assert!(store.written().is_empty());
    }
}
