//! Google Sheets v4 REST store for the catalog worksheet.

use super::{CatalogStore, CellUpdate, Record};
use crate::config::Config;
use crate::error::SyncError;
use crate::retry::Backoff;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Catalog store backed by one worksheet of a Google spreadsheet.
pub struct SheetsClient {
    client: Client,
    api_url: String,
    spreadsheet_id: String,
    worksheet: String,
    token: String,
    batch_size: usize,
    backoff: Backoff,
}

impl SheetsClient {
    /// Creates a client for the spreadsheet and worksheet named in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let spreadsheet = config
            .spreadsheet
            .as_deref()
            .context("Missing spreadsheet (set spreadsheet or STOCK_SYNC_SPREADSHEET)")?;
        let token = config
            .sheets_token
            .as_deref()
            .context("Missing Sheets access token (set sheets_token or STOCK_SYNC_SHEETS_TOKEN)")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let spreadsheet_id = spreadsheet_id(spreadsheet).to_string();
        info!("Using spreadsheet {} / worksheet {}", spreadsheet_id, config.worksheet);

        Ok(Self {
            client,
            api_url: config.sheets_api_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            worksheet: config.worksheet.clone(),
            token: token.to_string(),
            batch_size: config.write_batch_size.max(1),
            backoff: config.backoff(),
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    fn batch_update_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}/values:batchUpdate", self.api_url, self.spreadsheet_id)
    }

    /// Reads a range, retrying while the API reports a quota error.
    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(range);
        let client = &self.client;
        let auth = format!("Bearer {}", self.token);
        let (url, auth) = (url.as_str(), auth.as_str());

        let label = format!("read of {}", range);
        let values: ValueRange = self
            .backoff
            .retry_on_quota(&label, || async move {
                debug!("GET {}", url);

                let response = client
                    .get(url)
                    .header("Authorization", auth)
                    .send()
                    .await
                    .context("Failed to send Sheets request")?;

                let status = response.status();
                let body = response.text().await.context("Failed to read response body")?;
                if !status.is_success() {
                    return Err(anyhow::Error::from(SyncError::from_response(status.as_u16(), body)));
                }

                serde_json::from_str(&body).context("Failed to parse Sheets values response")
            })
            .await?;

        Ok(values.values)
    }

    /// Posts one batchUpdate chunk.
    async fn write_chunk(&self, chunk: &[CellUpdate]) -> Result<()> {
        let data: Vec<_> = chunk
            .iter()
            .map(|u| {
                serde_json::json!({
                    "range": a1_cell(&self.worksheet, u.row, u.column),
                    "values": [[u.value]],
                })
            })
            .collect();
        let payload =
            serde_json::json!({ "valueInputOption": "USER_ENTERED", "data": data }).to_string();

        let client = &self.client;
        let url = self.batch_update_url();
        let auth = format!("Bearer {}", self.token);
        let (url, auth, payload) = (url.as_str(), auth.as_str(), payload.as_str());

        self.backoff
            .retry_on_quota("batch update", || async move {
                let response = client
                    .post(url)
                    .header("Authorization", auth)
                    .header("Content-Type", "application/json")
                    .body(payload.to_string())
                    .send()
                    .await
                    .context("Failed to send Sheets batch update")?;

                let status = response.status();
                if status.is_success() {
                    return Ok(());
                }

                let body = response.text().await.unwrap_or_default();
                Err(anyhow::Error::from(SyncError::from_response(status.as_u16(), body)))
            })
            .await
    }
}

#[async_trait]
impl CatalogStore for SheetsClient {
    async fn get_schema(&self) -> Result<Vec<String>> {
        let range = format!("{}!1:1", quote_sheet_name(&self.worksheet));
        let mut rows = self.get_values(&range).await?;
        Ok(if rows.is_empty() { Vec::new() } else { rows.swap_remove(0) })
    }

    async fn read_all_rows(&self) -> Result<Vec<Record>> {
        let values = self.get_values(&quote_sheet_name(&self.worksheet)).await?;
        let Some((headers, rows)) = values.split_first() else {
            return Ok(Vec::new());
        };

        info!("Read {} data rows from {}", rows.len(), self.worksheet);

        // The API drops trailing empty cells, so short rows are padded
        Ok(rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        (header.trim().to_string(), row.get(i).cloned().unwrap_or_default())
                    })
                    .collect()
            })
            .collect())
    }

    async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        info!("Starting batch updates for {} cells...", updates.len());

        let total = updates.len().div_ceil(self.batch_size);
        for (i, chunk) in updates.chunks(self.batch_size).enumerate() {
            info!("Processing batch {}/{}", i + 1, total);
            self.write_chunk(chunk)
                .await
                .with_context(|| format!("Failed to write batch {}/{}", i + 1, total))?;
            info!("Successfully updated batch {}/{}", i + 1, total);

            tokio::time::sleep(self.backoff.base()).await;
        }

        info!("All batch updates completed successfully");
        Ok(())
    }
}

/// Extracts the spreadsheet id from a Sheets URL; bare ids pass through.
pub fn spreadsheet_id(value: &str) -> &str {
    match value.split_once("/d/") {
        Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or(rest),
        None => value.trim(),
    }
}

/// Quotes a worksheet name for A1 notation.
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Column letters for a 1-based column number (1 -> A, 27 -> AA).
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 reference of a single cell on `sheet`.
pub fn a1_cell(sheet: &str, row: u32, column: u32) -> String {
    format!("{}!{}{}", quote_sheet_name(sheet), column_letters(column), row)
}
