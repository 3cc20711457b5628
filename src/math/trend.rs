//! Three-point trend rule.
//!
//! Only the three most recent values are inspected, whatever the window size:
//! this is a local direction indicator, not a regression.

use crate::domain::Trend;

/// Classify the direction of a most-recent-first series.
///
/// - fewer than 3 values: `Flat`
/// - `v0 > v1`: `UpAccelerating` when also `v1 > v2`, else `Up`
/// - `v0 < v1`: `DownAccelerating` when also `v1 < v2`, else `Down`
/// - otherwise (equal or NaN): `Flat`
pub fn trend(values: &[f64]) -> Trend {
    let [v0, v1, v2, ..] = values else {
        return Trend::Flat;
    };

    if v0 > v1 {
        if v1 > v2 { Trend::UpAccelerating } else { Trend::Up }
    } else if v0 < v1 {
        if v1 < v2 { Trend::DownAccelerating } else { Trend::Down }
    } else {
        Trend::Flat
    }
}
