//! Alert message rendering and the grouped out-of-stock summary.

use super::Notifier;
use anyhow::Result;
use tracing::{info, warn};

/// A product found out of stock during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfStock {
    pub product_id: String,
    pub title: String,
    pub display_name: String,
    pub category: String,
}

/// A price gap between the shops worth telling someone about.
#[derive(Debug, Clone)]
pub struct PriceAlert<'a> {
    pub product_id: &'a str,
    pub display_name: &'a str,
    pub category: &'a str,
    pub shop_a_price: f64,
    pub shop_b_price: f64,
    pub diff_percent: f64,
}

impl PriceAlert<'_> {
    /// Renders the Telegram HTML message.
    pub fn render(&self) -> String {
        format!(
            "🔔 <b>Price Difference Alert - {category}</b> 🔔\n\n\
             📝 <b>Product Name:</b>\n\
             {name}\n\
             🆔 <b>Product ID:</b> {id}\n\n\
             <b>ShopA Price:</b> {a} Toman\n\
             <b>ShopB Price:</b> {b} Toman\n\
             <b>Price Difference:</b> {diff:+.2}%\n\n\
             ✅ <b>Status:</b> In Stock\n",
            category = self.category,
            name = self.display_name,
            id = self.product_id,
            a = format_toman(self.shop_a_price),
            b = format_toman(self.shop_b_price),
            diff = self.diff_percent,
        )
    }
}

/// Formats a price with thousands separators; cents only when present.
pub fn format_toman(price: f64) -> String {
    let rounded = (price * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let whole = rounded.abs().trunc() as u64;
    let cents = ((rounded.abs() - whole as f64) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if cents > 0 {
        format!("{}{}.{:02}", sign, grouped, cents)
    } else {
        format!("{}{}", sign, grouped)
    }
}

/// Partitions records by category, keeping first-seen category order.
pub fn group_by_category(records: &[OutOfStock]) -> Vec<(&str, Vec<&OutOfStock>)> {
    let mut groups: Vec<(&str, Vec<&OutOfStock>)> = Vec::new();

    for record in records {
        match groups.iter().position(|(category, _)| *category == record.category) {
            Some(pos) => groups[pos].1.push(record),
            None => groups.push((record.category.as_str(), vec![record])),
        }
    }

    groups
}

/// Renders one category's out-of-stock message, entries numbered from 1.
pub fn render_out_of_stock(category: &str, products: &[&OutOfStock]) -> String {
    let mut message = format!(
        "⚠️ <b>Out-of-Stock Alert - {}</b> ⚠️\n\n<b>{} products are out of stock:</b>\n\n",
        category,
        products.len()
    );

    for (i, product) in products.iter().enumerate() {
        message.push_str(&format!(
            "<b>{}. Product Name (ID: {}):</b>\n{}\n\n",
            i + 1,
            product.product_id,
            product.display_name
        ));
    }

    message
}

/// Sends one grouped message per category when at least `minimum` products
/// are out of stock. Returns the number of messages sent.
///
/// Below the minimum nothing is sent at all.
pub async fn send_out_of_stock_summary(
    notifier: &dyn Notifier,
    records: &[OutOfStock],
    minimum: usize,
) -> Result<usize> {
    if records.len() < minimum {
        info!(
            "{} out-of-stock products, below the summary minimum of {}",
            records.len(),
            minimum
        );
        return Ok(0);
    }

    info!("Preparing out-of-stock summary for {} products", records.len());

    let mut sent = 0;
    for (category, products) in group_by_category(records) {
        let message = render_out_of_stock(category, &products);
        let delivered = notifier.send_grouped(&message, &[category.to_string()]).await?;
        if !delivered {
            warn!("Out-of-stock summary for {} was not delivered to every recipient", category);
        }
        info!("Sent out-of-stock summary notification for category {}", category);
        sent += 1;
    }

    Ok(sent)
}
