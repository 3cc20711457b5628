//! Support share arithmetic.
//!
//! Percentages are kept as raw `f64` values. Samples where the two sides add up
//! to more than 100 produce a negative "other" share; that is passed through
//! untouched so garbage input stays visible in the report.

/// Share attributed to neither tracked side: `100 - (a + b)`.
///
/// Every "other" value in the crate goes through this function so the
/// floating-point rounding is the same for per-sample values and for means.
pub fn other_share(pct_a: f64, pct_b: f64) -> f64 {
    100.0 - (pct_a + pct_b)
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
