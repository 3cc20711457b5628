//! Export projection rows to CSV and chart series to JSON.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{SideLabels, UnitSeries};
use crate::error::AppError;
use crate::report::ProjectionReport;

#[derive(Debug, Serialize)]
struct ProjectionRow<'a> {
    state: &'a str,
    votes: u32,
    last_poll: String,
    mean_a: String,
    trend_a: &'static str,
    mean_b: String,
    trend_b: &'static str,
    mean_other: String,
    trend_other: &'static str,
    samples: usize,
    flagged: bool,
    leader: &'a str,
    votes_a: u32,
    votes_b: u32,
    votes_tossup: u32,
}

/// Write one CSV row per projected unit.
pub fn write_projection_csv(path: &Path, report: &ProjectionReport, labels: &SideLabels) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::render(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in &report.rows {
        let agg = &row.aggregate;
        let out = ProjectionRow {
            state: &agg.code,
            votes: agg.weight,
            last_poll: agg.latest_end_date.map(|d| d.to_string()).unwrap_or_default(),
            mean_a: format!("{:.4}", agg.mean_a),
            trend_a: agg.trend_a.as_str(),
            mean_b: format!("{:.4}", agg.mean_b),
            trend_b: agg.trend_b.as_str(),
            mean_other: format!("{:.4}", agg.mean_other),
            trend_other: agg.trend_other.as_str(),
            samples: agg.sample_count,
            flagged: row.outcome.flagged,
            leader: labels.leader(row.outcome.leader),
            votes_a: row.outcome.increment_a,
            votes_b: row.outcome.increment_b,
            votes_tossup: row.outcome.increment_tossup,
        };
        writer
            .serialize(out)
            .map_err(|e| AppError::render(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::render(format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), rows = report.rows.len(), "wrote projection export");
    Ok(())
}

/// Write all per-unit chart series as a JSON array.
pub fn write_series_json(path: &Path, series: &[UnitSeries]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::render(format!("Failed to create series JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, series)
        .map_err(|e| AppError::render(format!("Failed to write series JSON: {e}")))?;
    Ok(())
}

/// Read a series JSON file written by `write_series_json`.
pub fn read_series_json(path: &Path) -> Result<Vec<UnitSeries>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::render(format!("Failed to open series JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::render(format!("Invalid series JSON: {e}")))
}
