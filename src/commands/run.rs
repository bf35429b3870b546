//! The `run` command: one reconciliation pass with whole-run retries.

use crate::catalog::{CatalogStore, DryRunStore, SheetsClient};
use crate::config::Config;
use crate::error::SyncError;
use crate::notify::{LogNotifier, Notifier, TelegramNotifier};
use crate::shops::{ShopA, ShopAClient, ShopB, ShopBClient};
use crate::sync::{Reconciler, RunReport, Thresholds};
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

/// Executes the catalog reconciliation.
pub struct RunCommand {
    config: Config,
    dry_run: bool,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config) -> Self {
        Self { config, dry_run: false }
    }

    /// Scrape normally but only log sheet writes and alerts.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the pass, retrying the whole run up to `max_attempts` times.
    pub async fn execute(&self) -> Result<RunReport> {
        let attempts = self.config.max_attempts;
        let delay = self.config.retry_delay();

        run_with_retries(attempts, delay, move || self.execute_once()).await
    }

    async fn execute_once(&self) -> Result<RunReport> {
        let shop_a = ShopAClient::new(&self.config)?;
        let shop_b = ShopBClient::new(&self.config)?;
        let sheets =
            SheetsClient::new(&self.config).context("Failed to create Google Sheets client")?;

        if self.dry_run {
            info!("Dry run: catalog writes and alerts will only be logged");
            let store = DryRunStore::new(sheets);
            return self.execute_with(&store, &shop_a, &shop_b, &LogNotifier).await;
        }

        let notifier =
            TelegramNotifier::new(&self.config).context("Failed to create Telegram notifier")?;
        self.execute_with(&sheets, &shop_a, &shop_b, &notifier).await
    }

    /// Runs one pass against provided collaborators (for testing).
    pub async fn execute_with(
        &self,
        store: &dyn CatalogStore,
        shop_a: &dyn ShopA,
        shop_b: &dyn ShopB,
        notifier: &dyn Notifier,
    ) -> Result<RunReport> {
        let report = Reconciler::new(store, shop_a, shop_b, notifier)
            .with_thresholds(Thresholds::from_config(&self.config))
            .run()
            .await?;

        info!("Run summary:\n{}", report);
        Ok(report)
    }
}

/// Runs `op` up to `attempts` times (at least once), sleeping `delay`
/// between failures. The last error is returned after the final attempt.
///
/// A missing catalog column will not fix itself, so it is returned at once.
pub async fn run_with_retries<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        info!("Starting attempt {}/{}", attempt, attempts);

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_schema_error(&e) => {
                error!("Catalog schema is invalid, not retrying: {:#}", e);
                return Err(e);
            }
            Err(e) if attempt < attempts => {
                error!("Attempt {}/{} failed: {:#}", attempt, attempts, e);
                info!("Retrying in {:?}...", delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("All {} attempts failed. Last error: {:#}", attempts, e);
                return Err(e);
            }
        }
    }
}

fn is_schema_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<SyncError>(), Some(SyncError::MissingColumn(_))))
}
