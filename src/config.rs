//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::notify::Subscriptions;
use crate::retry::Backoff;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet URL or bare spreadsheet id
    #[serde(default)]
    pub spreadsheet: Option<String>,

    /// Worksheet (tab) holding the catalog
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// OAuth access token for the Sheets API
    #[serde(default)]
    pub sheets_token: Option<String>,

    /// Telegram bot token
    #[serde(default)]
    pub telegram_token: Option<String>,

    /// Recipient chat id -> categories they want alerts for
    #[serde(default)]
    pub subscriptions: Subscriptions,

    /// Sheets API endpoint
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,

    /// Telegram Bot API endpoint
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Shop A site root
    #[serde(default = "default_shop_a_url")]
    pub shop_a_url: String,

    /// Proxy URL for the shop scrapers (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Lower bound of the random pause before each Shop B request
    #[serde(default = "default_shop_b_delay_min_ms")]
    pub shop_b_delay_min_ms: u64,

    /// Upper bound of the random pause before each Shop B request
    #[serde(default = "default_shop_b_delay_max_ms")]
    pub shop_b_delay_max_ms: u64,

    /// Retries for shop requests failing with a transient status
    #[serde(default = "default_http_retries")]
    pub http_retries: u32,

    /// First delay between shop request retries
    #[serde(default = "default_http_backoff_ms")]
    pub http_backoff_ms: u64,

    /// Absolute price difference (percent) that triggers an alert
    #[serde(default = "default_price_alert_percent")]
    pub price_alert_percent: f64,

    /// Out-of-stock products needed before any summary is sent
    #[serde(default = "default_out_of_stock_minimum")]
    pub out_of_stock_minimum: usize,

    /// Cells per Sheets batchUpdate request
    #[serde(default = "default_write_batch_size")]
    pub write_batch_size: usize,

    /// First backoff delay on a quota error
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    /// Backoff delay cap
    #[serde(default = "default_backoff_max_secs")]
    pub backoff_max_secs: u64,

    /// Full-run attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between full-run attempts
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_worksheet() -> String {
    "Sheet2".to_string()
}

fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_shop_a_url() -> String {
    "https://shopa.com".to_string()
}

fn default_shop_b_delay_min_ms() -> u64 {
    1000
}

fn default_shop_b_delay_max_ms() -> u64 {
    3000
}

fn default_http_retries() -> u32 {
    5
}

fn default_http_backoff_ms() -> u64 {
    1000
}

fn default_price_alert_percent() -> f64 {
    crate::pricing::PRICE_ALERT_PERCENT
}

fn default_out_of_stock_minimum() -> usize {
    8
}

fn default_write_batch_size() -> usize {
    10
}

fn default_backoff_base_secs() -> u64 {
    2
}

fn default_backoff_max_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet: None,
            worksheet: default_worksheet(),
            sheets_token: None,
            telegram_token: None,
            subscriptions: Subscriptions::default(),
            sheets_api_url: default_sheets_api_url(),
            telegram_api_url: default_telegram_api_url(),
            shop_a_url: default_shop_a_url(),
            proxy: None,
            shop_b_delay_min_ms: default_shop_b_delay_min_ms(),
            shop_b_delay_max_ms: default_shop_b_delay_max_ms(),
            http_retries: default_http_retries(),
            http_backoff_ms: default_http_backoff_ms(),
            price_alert_percent: default_price_alert_percent(),
            out_of_stock_minimum: default_out_of_stock_minimum(),
            write_batch_size: default_write_batch_size(),
            backoff_base_secs: default_backoff_base_secs(),
            backoff_max_secs: default_backoff_max_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("stock-sync.toml");
        if local_config.exists() {
            debug!("Found stock-sync.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("stock-sync").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(spreadsheet) = std::env::var("STOCK_SYNC_SPREADSHEET") {
            self.spreadsheet = Some(spreadsheet);
        }

        if let Ok(worksheet) = std::env::var("STOCK_SYNC_WORKSHEET") {
            self.worksheet = worksheet;
        }

        if let Ok(token) = std::env::var("STOCK_SYNC_SHEETS_TOKEN") {
            self.sheets_token = Some(token);
        }

        if let Ok(token) = std::env::var("STOCK_SYNC_TELEGRAM_TOKEN") {
            self.telegram_token = Some(token);
        }

        if let Ok(proxy) = std::env::var("STOCK_SYNC_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(attempts) = std::env::var("STOCK_SYNC_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.max_attempts = n;
            }
        }

        self
    }

    /// Quota backoff schedule for the Sheets and Telegram adapters.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_secs(self.backoff_base_secs),
            Duration::from_secs(self.backoff_max_secs),
        )
    }

    /// Backoff schedule for transient shop request failures.
    pub fn http_backoff(&self) -> Backoff {
        let base = Duration::from_millis(self.http_backoff_ms);
        Backoff::new(base, base.saturating_mul(60))
    }

    /// Pause between full-run attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}
