//! Locating catalog columns by header name.

use super::models::{parse_price, CatalogRow, Stock};
use crate::error::SyncError;
use std::collections::HashMap;

/// Header names the catalog worksheet uses.
pub mod columns {
    pub const PRODUCT_ID: &str = "ShopA_ID";
    pub const SHOP_A_PRICE: &str = "ShopA_Price";
    pub const SHOP_A_STOCK: &str = "ShopA_Stock";
    pub const SHOP_B_PRICE: &str = "ShopB_Price";
    pub const SHOP_B_LINK: &str = "ShopB_Link";
    pub const CATEGORY: &str = "Category";
    pub const TITLE: &str = "Title";
    pub const NAME: &str = "Name";

    /// Columns a run cannot proceed without.
    pub const REQUIRED: [&str; 6] =
        [SHOP_B_PRICE, PRODUCT_ID, SHOP_A_PRICE, SHOP_A_STOCK, CATEGORY, SHOP_B_LINK];
}

/// 1-based column positions of the catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub product_id: u32,
    pub shop_a_price: u32,
    pub shop_a_stock: u32,
    pub shop_b_price: u32,
    pub shop_b_link: u32,
    pub category: u32,
}

impl ColumnMap {
    /// Finds every required column in `headers`.
    pub fn resolve(headers: &[String]) -> Result<Self, SyncError> {
        let find = |name: &str| -> Result<u32, SyncError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .map(|i| i as u32 + 1)
                .ok_or_else(|| SyncError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            shop_b_price: find(columns::SHOP_B_PRICE)?,
            product_id: find(columns::PRODUCT_ID)?,
            shop_a_price: find(columns::SHOP_A_PRICE)?,
            shop_a_stock: find(columns::SHOP_A_STOCK)?,
            category: find(columns::CATEGORY)?,
            shop_b_link: find(columns::SHOP_B_LINK)?,
        })
    }
}

/// Builds a catalog row from a header -> cell record.
///
/// `index` is the 0-based position among data rows; the sheet row is
/// `index + 2` because of the header. Keys are matched ignoring surrounding
/// whitespace, the same way [`ColumnMap::resolve`] matches headers.
pub fn row_from_record(index: usize, record: &HashMap<String, String>) -> CatalogRow {
    let cell = |name: &str| {
        record
            .get(name)
            .or_else(|| record.iter().find(|(key, _)| key.trim() == name).map(|(_, v)| v))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    let link = cell(columns::SHOP_B_LINK);

    CatalogRow {
        row: index as u32 + 2,
        product_id: cell(columns::PRODUCT_ID),
        category: cell(columns::CATEGORY),
        title: cell(columns::TITLE),
        display_name: cell(columns::NAME),
        source_a_price: parse_price(&cell(columns::SHOP_A_PRICE)),
        source_a_stock: Stock::from_cell(&cell(columns::SHOP_A_STOCK)),
        source_b_price: parse_price(&cell(columns::SHOP_B_PRICE)),
        source_b_link: (!link.is_empty()).then_some(link),
    }
}
