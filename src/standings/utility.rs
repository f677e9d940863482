/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Most decimal places an `f64` can meaningfully keep.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Rounds half away from zero to `places` decimal places, capped at
/// [`MAX_DECIMAL_PLACES`].
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(MAX_DECIMAL_PLACES) as i32);
    (value * factor).round() / factor
}

/// `part / whole`, or 0.0 when `whole` is zero.
pub fn ratio(part: f64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part / whole as f64 }
}
