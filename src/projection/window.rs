//! History windowing.

use chrono::NaiveDate;

use crate::domain::{EngineConfig, PollSample, SeriesPoint, UnitSeries, WindowedSeries};
use crate::error::AppError;
use crate::io::history::PollStore;
use crate::math::other_share;

/// Bounds a unit's poll history to the samples used for averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindower {
    pub max_count: usize,
    pub date_threshold: NaiveDate,
}

impl HistoryWindower {
    pub fn new(max_count: usize, date_threshold: NaiveDate) -> Self {
        Self {
            max_count,
            date_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_poll_count, config.date_threshold)
    }

    /// Query the store and window the result.
    ///
    /// Store failures are returned as-is; nothing is retried.
    pub fn window(&self, store: &dyn PollStore, code: &str) -> Result<WindowedSeries, AppError> {
        let history = store.query_history(code)?;
        Ok(self.window_samples(code, history))
    }

    /// Window an already-fetched history.
    ///
    /// `history` must be ordered by end date, most recent first. Samples ending
    /// before the threshold are skipped without counting toward `max_count`.
    pub fn window_samples<I>(&self, code: &str, history: I) -> WindowedSeries
    where
        I: IntoIterator<Item = PollSample>,
    {
        let samples = history
            .into_iter()
            .filter(|s| s.end_date >= self.date_threshold)
            .take(self.max_count)
            .collect();

        WindowedSeries {
            code: code.to_string(),
            samples,
        }
    }
}

/// Convert a window into the chart series (one point per sample).
pub fn unit_series(series: &WindowedSeries) -> UnitSeries {
    let points = series
        .samples
        .iter()
        .map(|s| SeriesPoint {
            end_date: s.end_date,
            pct_a: s.pct_a,
            pct_b: s.pct_b,
            pct_other: other_share(s.pct_a, s.pct_b),
        })
        .collect();

    UnitSeries {
        code: series.code.clone(),
        points,
    }
}
