//! HTML parsing for the two shop product pages.

use super::digits::parse_marked_price;
use super::selectors::{shop_a, shop_b, TOMAN};
use crate::catalog::Stock;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

/// What a Shop A product page says about price and availability.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShopAListing {
    pub price: Option<f64>,
    pub stock: Option<Stock>,
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Parses a Shop A product page.
///
/// Without the availability label nothing is trusted and both fields are
/// `None`. A missing or malformed price still leaves the stock known.
pub fn parse_shop_a(html: &str) -> ShopAListing {
    let document = Html::parse_document(html);

    let Some(label) = document.select(&shop_a::STOCK).next() else {
        warn!("Stock status not found on Shop A page");
        return ShopAListing::default();
    };

    let stock = if element_text(label).contains(shop_a::OUT_OF_STOCK) {
        Stock::OutOfStock
    } else {
        Stock::InStock
    };
    debug!("Shop A stock status: {:?}", stock);

    let price = match document.select(&shop_a::PRICE).next() {
        Some(element) => {
            let text = element_text(element);
            let price = parse_marked_price(text.trim(), TOMAN);
            if price.is_none() {
                warn!("Could not read Shop A price from '{}'", text.trim());
            }
            price
        }
        None => {
            warn!("Price element not found on Shop A page");
            None
        }
    };

    ShopAListing { price, stock: Some(stock) }
}

/// Parses the lowest price from a Shop B product page.
pub fn parse_shop_b(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);

    let Some(block) = document.select(&shop_b::BUY_BOX_TEXT).nth(shop_b::PRICE_INDEX) else {
        warn!("Price element not found on Shop B page");
        return None;
    };

    let price = parse_marked_price(&element_text(block), TOMAN);
    debug!("Shop B price: {:?}", price);
    price
}
