//! Catalog rows and cell write intents.

/// Link cell value meaning "no Shop B listing to compare against".
pub const NO_LINK: &str = "-";

/// Shop A stock indicator as stored in the sheet (`0` / `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stock {
    OutOfStock,
    InStock,
}

impl Stock {
    /// Parses a sheet cell; anything other than `0`/`1` is unknown.
    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Stock::OutOfStock),
            "1" => Some(Stock::InStock),
            _ => None,
        }
    }

    /// The value written back to the sheet.
    pub fn as_cell(&self) -> &'static str {
        match self {
            Stock::OutOfStock => "0",
            Stock::InStock => "1",
        }
    }

    pub fn is_in_stock(&self) -> bool {
        matches!(self, Stock::InStock)
    }
}

/// One tracked product, as read from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    /// Sheet row number (1-based; row 1 is the header)
    pub row: u32,
    /// Shop A product id
    pub product_id: String,
    /// Category tag used for notification routing
    pub category: String,
    /// English title
    pub title: String,
    /// Name shown in alerts
    pub display_name: String,
    /// Last known Shop A price
    pub source_a_price: Option<f64>,
    /// Last known Shop A stock
    pub source_a_stock: Option<Stock>,
    /// Last known Shop B price
    pub source_b_price: Option<f64>,
    /// Shop B product page, if any
    pub source_b_link: Option<String>,
}

impl CatalogRow {
    /// Rows without an id or category are never touched.
    pub fn is_trackable(&self) -> bool {
        !self.product_id.is_empty() && !self.category.is_empty()
    }

    /// The Shop B link to scrape, ignoring blanks and the `-` sentinel.
    pub fn comparison_link(&self) -> Option<&str> {
        self.source_b_link.as_deref().map(str::trim).filter(|link| !link.is_empty() && *link != NO_LINK)
    }
}

/// Intent to write one value at a (row, column) coordinate, both 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: u32,
    pub column: u32,
    pub value: String,
}

impl CellUpdate {
    pub fn new(row: u32, column: u32, value: impl Into<String>) -> Self {
        Self { row, column, value: value.into() }
    }

    /// A price cell; whole numbers are written without a fraction.
    pub fn price(row: u32, column: u32, price: f64) -> Self {
        Self::new(row, column, format_price(price))
    }

    pub fn stock(row: u32, column: u32, stock: Stock) -> Self {
        Self::new(row, column, stock.as_cell())
    }
}

/// Formats a price for the sheet.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{}", price as i64)
    } else {
        price.to_string()
    }
}

/// Parses a price cell, tolerating thousands separators.
pub fn parse_price(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok().filter(|p: &f64| p.is_finite())
}
