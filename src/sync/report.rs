//! Summary of one reconciliation pass.

use serde::Serialize;
use std::fmt;

/// Counters collected while processing the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Data rows in the catalog
    pub rows_total: usize,
    /// Rows skipped for a missing id or category
    pub rows_skipped: usize,
    /// Cells written back to the catalog
    pub updates_written: usize,
    /// Rows whose Shop A fetch failed
    pub shop_a_failures: usize,
    /// Rows whose Shop B fetch failed
    pub shop_b_failures: usize,
    /// Price difference alerts dispatched
    pub price_alerts: usize,
    /// Products found out of stock
    pub out_of_stock: usize,
    /// Out-of-stock summary messages sent (one per category)
    pub out_of_stock_messages: usize,
}

impl RunReport {
    /// Rows that were actually scraped.
    pub fn rows_processed(&self) -> usize {
        self.rows_total - self.rows_skipped
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows:             {} ({} skipped)", self.rows_total, self.rows_skipped)?;
        writeln!(f, "Cells written:    {}", self.updates_written)?;
        writeln!(
            f,
            "Fetch failures:   {} Shop A, {} Shop B",
            self.shop_a_failures, self.shop_b_failures
        )?;
        writeln!(f, "Price alerts:     {}", self.price_alerts)?;
        write!(
            f,
            "Out of stock:     {} ({} summary messages)",
            self.out_of_stock, self.out_of_stock_messages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_processed() {
        let report = RunReport { rows_total: 10, rows_skipped: 3, ..Default::default() };
        assert_eq!(report.rows_processed(), 7);
    }

    #[test]
    fn test_display() {
        let report = RunReport {
            rows_total: 12,
            rows_skipped: 1,
            updates_written: 30,
            shop_a_failures: 2,
            shop_b_failures: 0,
            price_alerts: 1,
            out_of_stock: 9,
            out_of_stock_messages: 3,
        };
        let text = report.to_string();
        assert!(text.contains("12 (1 skipped)"));
        assert!(text.contains("Cells written:    30"));
        assert!(text.contains("2 Shop A, 0 Shop B"));
        assert!(text.contains("9 (3 summary messages)"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_string(&RunReport::default()).unwrap();
        assert!(json.contains("\"price_alerts\":0"));
    }
}
