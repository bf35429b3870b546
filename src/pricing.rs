//! Price comparison between the two shops.

/// Default alert threshold, in percent.
pub const PRICE_ALERT_PERCENT: f64 = 5.0;

/// Percentage difference of `price` relative to `reference`, rounded up to
/// two decimals.
///
/// Rounding is always towards positive infinity: `4.991` becomes `5.00` and
/// `-1.968` becomes `-1.96`. Returns `None` when `reference` is zero or either
/// input is not a finite number.
pub fn price_difference(price: f64, reference: f64) -> Option<f64> {
    if !price.is_finite() || !reference.is_finite() || reference == 0.0 {
        return None;
    }

    let diff = (price - reference) / reference * 100.0;
    let scaled = diff * 100.0;

    // Absorb float noise so exact percentages don't get bumped up a cent.
    let nearest = scaled.round();
    let scaled = if (scaled - nearest).abs() < 1e-9 { nearest } else { scaled };

    let rounded = scaled.ceil() / 100.0;
    rounded.is_finite().then_some(rounded)
}

/// True if the difference is large enough to alert on.
pub fn exceeds_threshold(diff_percent: f64, threshold_percent: f64) -> bool {
    diff_percent.abs() > threshold_percent
}
