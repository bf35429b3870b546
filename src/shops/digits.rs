//! Digit normalization for Persian-formatted prices.

/// Maps Persian (`۰`-`۹`) and Arabic-Indic (`٠`-`٩`) digits to ASCII and
/// drops every other character.
///
/// `"۱۲,۵۰۰,۰۰۰ "` becomes `"12500000"`.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '۰'..='۹' => char::from_digit(c as u32 - '۰' as u32, 10),
            '٠'..='٩' => char::from_digit(c as u32 - '٠' as u32, 10),
            _ => None,
        })
        .collect()
}

/// Parses a price written as `<amount> <currency marker> ...`.
///
/// Only the text before the first `marker` counts. Returns `None` when the
/// marker is missing or no digits precede it.
pub fn parse_marked_price(text: &str, marker: &str) -> Option<f64> {
    let (amount, _) = text.split_once(marker)?;
    let digits = normalize_digits(amount);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
