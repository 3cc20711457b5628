//! Poll history storage.
//!
//! The engine only needs one query: a unit's polls, most recent end date
//! first. `PollStore` is that seam. `CsvHistoryStore` is the on-disk store used
//! by the binary; `MemoryStore` backs tests and ad-hoc runs.
//!
//! Rows are keyed by `(state, end_date)`: loading a poll that ends on the same
//! day as an existing one for that state replaces it.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PollSample;
use crate::error::AppError;

pub const HISTORY_FILE: &str = "history.csv";

/// Read access to a unit's poll history.
pub trait PollStore {
    /// All polls for `unit_code`, ordered by end date, most recent first.
    fn query_history(&self, unit_code: &str) -> Result<Vec<PollSample>, AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryRow {
    date_stamp: String,
    time_stamp: String,
    state: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pct_a: f64,
    pct_b: f64,
    pollster: String,
}

impl HistoryRow {
    fn to_sample(&self) -> PollSample {
        PollSample {
            unit_code: self.state.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            pct_a: self.pct_a,
            pct_b: self.pct_b,
            pollster: self.pollster.clone(),
        }
    }
}

/// CSV-backed history table.
#[derive(Debug)]
pub struct CsvHistoryStore {
    path: PathBuf,
    rows: BTreeMap<(String, NaiveDate), HistoryRow>,
}

impl CsvHistoryStore {
    /// Open the history table in `dir`, creating an empty one if needed.
    pub fn open(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(HISTORY_FILE);
        if !path.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::storage(format!("Failed to create database dir '{}': {e}", dir.display()))
            })?;
            let store = Self {
                path,
                rows: BTreeMap::new(),
            };
            store.flush()?;
            tracing::info!(path = %store.path.display(), "created history store");
            return Ok(store);
        }

        let file = File::open(&path)
            .map_err(|e| AppError::storage(format!("Failed to open history '{}': {e}", path.display())))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut rows = BTreeMap::new();
        for (idx, result) in reader.deserialize::<HistoryRow>().enumerate() {
            let row = result.map_err(|e| {
                AppError::storage(format!("History '{}' row {} is unreadable: {e}", path.display(), idx + 2))
            })?;
            rows.insert((row.state.clone(), row.end_date), row);
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "opened history store");

        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a poll, replacing any row with the same state and end date.
    pub fn upsert(&mut self, sample: &PollSample) {
        let now = Utc::now();
        let row = HistoryRow {
            date_stamp: now.format("%Y-%m-%d").to_string(),
            time_stamp: now.format("%H:%M:%S%.3f").to_string(),
            state: sample.unit_code.clone(),
            start_date: sample.start_date,
            end_date: sample.end_date,
            pct_a: sample.pct_a,
            pct_b: sample.pct_b,
            pollster: sample.pollster.clone(),
        };
        self.rows.insert((row.state.clone(), row.end_date), row);
    }

    /// Write the table back to disk.
    pub fn flush(&self) -> Result<(), AppError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| AppError::storage(format!("Failed to write history '{}': {e}", self.path.display())))?;

        // Headers are written explicitly so an empty table still carries them.
        writer
            .write_record([
                "date_stamp",
                "time_stamp",
                "state",
                "start_date",
                "end_date",
                "pct_a",
                "pct_b",
                "pollster",
            ])
            .map_err(|e| AppError::storage(format!("Failed to write history header: {e}")))?;
        for row in self.rows.values() {
            writer
                .serialize(row)
                .map_err(|e| AppError::storage(format!("Failed to write history row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| AppError::storage(format!("Failed to flush history '{}': {e}", self.path.display())))?;
        Ok(())
    }
}

impl PollStore for CsvHistoryStore {
    fn query_history(&self, unit_code: &str) -> Result<Vec<PollSample>, AppError> {
        let lo = (unit_code.to_string(), NaiveDate::MIN);
        let hi = (unit_code.to_string(), NaiveDate::MAX);
        Ok(self.rows.range(lo..=hi).rev().map(|(_, row)| row.to_sample()).collect())
    }
}

/// In-memory poll history.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    by_unit: HashMap<String, Vec<PollSample>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a poll, replacing any poll for the same unit and end date.
    pub fn insert(&mut self, sample: PollSample) {
        let polls = self.by_unit.entry(sample.unit_code.clone()).or_default();
        polls.retain(|p| p.end_date != sample.end_date);
        polls.push(sample);
        polls.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    }
}

impl FromIterator<PollSample> for MemoryStore {
    fn from_iter<T: IntoIterator<Item = PollSample>>(iter: T) -> Self {
        let mut store = MemoryStore::new();
        for sample in iter {
            store.insert(sample);
        }
        store
    }
}

impl PollStore for MemoryStore {
    fn query_history(&self, unit_code: &str) -> Result<Vec<PollSample>, AppError> {
        Ok(self.by_unit.get(unit_code).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: &str, day: u32, a: f64) -> PollSample {
        let end = NaiveDate::from_ymd_opt(2024, 8, day).unwrap();
        PollSample {
            unit_code: code.to_string(),
            start_date: end,
            end_date: end,
            pct_a: a,
            pct_b: 45.0,
            pollster: "Quinnipiac University".to_string(),
        }
    }

    #[test]
    fn memory_store_orders_most_recent_first_and_replaces() {
        let mut store: MemoryStore = [sample("GA", 3, 40.0), sample("GA", 9, 41.0), sample("GA", 5, 42.0)]
            .into_iter()
            .collect();
        store.insert(sample("GA", 5, 43.0));

        let polls = store.query_history("GA").unwrap();
        let days: Vec<u32> = polls.iter().map(|p| chrono::Datelike::day(&p.end_date)).collect();
        assert_eq!(days, vec![9, 5, 3]);
        assert!((polls[1].pct_a - 43.0).abs() < 1e-12);
        assert!(store.query_history("AZ").unwrap().is_empty());
    }

    #[test]
    fn csv_store_persists_and_queries_descending() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvHistoryStore::open(dir.path()).unwrap();
        assert!(store.is_empty());

        store.upsert(&sample("NV", 1, 44.0));
        store.upsert(&sample("NV", 20, 46.0));
        store.upsert(&sample("AZ", 10, 47.0));
        store.upsert(&sample("NV", 20, 48.0));
        store.flush().unwrap();

        let reopened = CsvHistoryStore::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 3);
        let nv = reopened.query_history("NV").unwrap();
        assert_eq!(nv.len(), 2);
        assert!(nv[0].end_date > nv[1].end_date);
        assert!((nv[0].pct_a - 48.0).abs() < 1e-12);
        assert_eq!(nv[0].pollster, "Quinnipiac University");
        assert_eq!(reopened.query_history("AZ").unwrap().len(), 1);
    }

    #[test]
    fn csv_store_rejects_corrupt_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(HISTORY_FILE),
            "date_stamp,time_stamp,state,start_date,end_date,pct_a,pct_b,pollster\n\
             2024-08-01,10:00:00.000,PA,2024-07-01,2024-07-03,abc,45,X\n",
        )
        .unwrap();
        let err = CsvHistoryStore::open(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_STORAGE);
    }
}
