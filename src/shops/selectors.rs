//! CSS selectors and text markers for the shop product pages.
//!
//! Update this file when either site changes its HTML structure, and add a
//! fixture under `tests/fixtures/` for the new layout.

use scraper::Selector;
use std::sync::LazyLock;

/// Currency word that follows every price on both sites.
pub const TOMAN: &str = "تومان";

/// Selectors for Shop A product pages.
pub mod shop_a {
    use super::*;

    /// Availability label; contains [`OUT_OF_STOCK`] when unavailable.
    pub static STOCK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("b.text-primary").unwrap());

    /// Main price line.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("strong.text-success.font-size-large.font-weight-bold.mt-2").unwrap()
    });

    /// "Unavailable".
    pub const OUT_OF_STOCK: &str = "ناموجود";
}

/// Selectors for Shop B product pages.
pub mod shop_b {
    use super::*;

    /// Buy-box text blocks; the second one carries the lowest price.
    pub static BUY_BOX_TEXT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.Showcase_buy_box_text__otYW_").unwrap());

    /// Index of the price block among [`BUY_BOX_TEXT`] matches.
    pub const PRICE_INDEX: usize = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_compile() {
        let _ = &*shop_a::STOCK;
        let _ = &*shop_a::PRICE;
        let _ = &*shop_b::BUY_BOX_TEXT;
    }
}
