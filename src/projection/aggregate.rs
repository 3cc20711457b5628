//! Per-unit aggregation and the no-data fallback.

use crate::domain::{Category, Trend, UnitAggregate, UnitRecord, WindowedSeries};
use crate::math::{mean, other_share, trend};

/// Share assigned to the presumed side when a unit has no usable polls.
pub const FALLBACK_SHARE: f64 = 99.9;

/// Aggregate a non-empty window.
///
/// Returns `None` for an empty window; callers use [`fallback`] instead.
///
/// `mean_other` is derived from the means (mean first, then subtract), not
/// averaged from per-sample "other" values.
pub fn aggregate(unit: &UnitRecord, series: &WindowedSeries) -> Option<UnitAggregate> {
    let latest = series.samples.first()?;

    let pct_a: Vec<f64> = series.samples.iter().map(|s| s.pct_a).collect();
    let pct_b: Vec<f64> = series.samples.iter().map(|s| s.pct_b).collect();
    let pct_other: Vec<f64> = series
        .samples
        .iter()
        .map(|s| other_share(s.pct_a, s.pct_b))
        .collect();

    let mean_a = mean(pct_a.iter().copied())?;
    let mean_b = mean(pct_b.iter().copied())?;

    Some(UnitAggregate {
        code: unit.code.clone(),
        weight: unit.weight,
        latest_end_date: Some(latest.end_date),
        mean_a,
        mean_b,
        mean_other: other_share(mean_a, mean_b),
        trend_a: trend(&pct_a),
        trend_b: trend(&pct_b),
        trend_other: trend(&pct_other),
        sample_count: series.len(),
    })
}

/// Synthesize an aggregate from the unit's prior category.
pub fn fallback(unit: &UnitRecord) -> UnitAggregate {
    let (mean_a, mean_b, mean_other) = match unit.category {
        Category::StronglyA => (FALLBACK_SHARE, 0.0, 0.0),
        Category::StronglyB => (0.0, FALLBACK_SHARE, 0.0),
        Category::Battleground => (0.0, 0.0, FALLBACK_SHARE),
    };

    UnitAggregate {
        code: unit.code.clone(),
        weight: unit.weight,
        latest_end_date: None,
        mean_a,
        mean_b,
        mean_other,
        trend_a: Trend::Flat,
        trend_b: Trend::Flat,
        trend_other: Trend::Flat,
        sample_count: 0,
    }
}

pub fn aggregate_or_fallback(unit: &UnitRecord, series: &WindowedSeries) -> UnitAggregate {
    aggregate(unit, series).unwrap_or_else(|| fallback(unit))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::PollSample;

    fn unit(category: Category) -> UnitRecord {
        UnitRecord {
            code: "WI".to_string(),
            weight: 10,
            category,
        }
    }

    fn series(values: &[(u32, f64, f64)]) -> WindowedSeries {
        WindowedSeries {
            code: "WI".to_string(),
            samples: values
                .iter()
                .map(|&(day, a, b)| {
                    let end = NaiveDate::from_ymd_opt(2024, 7, day).unwrap();
                    PollSample {
                        unit_code: "WI".to_string(),
                        start_date: end,
                        end_date: end,
                        pct_a: a,
                        pct_b: b,
                        pollster: "P".to_string(),
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn means_and_other_from_window() {
        let s = series(&[(20, 48.0, 45.0), (15, 46.0, 46.0), (10, 44.0, 47.0)]);
        let agg = aggregate(&unit(Category::Battleground), &s).unwrap();
        assert_eq!(agg.sample_count, 3);
        assert_eq!(agg.latest_end_date, NaiveDate::from_ymd_opt(2024, 7, 20));
        assert!((agg.mean_a - 46.0).abs() < 1e-12);
        assert!((agg.mean_b - 46.0).abs() < 1e-12);
        assert!((agg.mean_other - (100.0 - agg.mean_a - agg.mean_b)).abs() < 1e-9);
        assert_eq!(agg.trend_a, Trend::UpAccelerating);
        assert_eq!(agg.trend_b, Trend::DownAccelerating);
        // other: 7, 8, 9
        assert_eq!(agg.trend_other, Trend::DownAccelerating);
    }

    #[test]
    fn other_identity_holds_for_odd_values() {
        let s = series(&[(3, 33.3, 41.7), (2, 51.9, 38.2), (1, 47.1, 47.3)]);
        let agg = aggregate(&unit(Category::StronglyA), &s).unwrap();
        assert!((agg.mean_other - (100.0 - agg.mean_a - agg.mean_b)).abs() < 1e-9);
    }

    #[test]
    fn short_window_has_flat_trends() {
        let s = series(&[(2, 50.0, 40.0), (1, 40.0, 50.0)]);
        let agg = aggregate(&unit(Category::Battleground), &s).unwrap();
        assert_eq!(agg.trend_a, Trend::Flat);
        assert_eq!(agg.trend_b, Trend::Flat);
    }

    #[test]
    fn empty_window_has_no_aggregate() {
        assert!(aggregate(&unit(Category::Battleground), &WindowedSeries::default()).is_none());
    }

    #[test]
    fn fallback_triples_follow_category() {
        let cases = [
            (Category::StronglyA, (99.9, 0.0, 0.0)),
            (Category::StronglyB, (0.0, 99.9, 0.0)),
            (Category::Battleground, (0.0, 0.0, 99.9)),
        ];
        for (category, expected) in cases {
            let agg = aggregate_or_fallback(&unit(category), &WindowedSeries::default());
            assert_eq!((agg.mean_a, agg.mean_b, agg.mean_other), expected);
            assert_eq!(agg.latest_end_date, None);
            assert_eq!(agg.sample_count, 0);
            assert_eq!(agg.weight, 10);
            assert!(!agg.has_data());
        }
    }
}
