//! Shared pipeline steps used by the subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! settings -> directories -> state table + history store -> engine config
//!
//! The handlers in `app` can then focus on presentation (printing vs files).

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::data::{StateTable, poll_file_path};
use crate::domain::EngineConfig;
use crate::error::AppError;
use crate::io::history::CsvHistoryStore;
use crate::io::ingest::read_poll_file;

/// Everything a report or plot run reads.
#[derive(Debug)]
pub struct Inputs {
    pub table: StateTable,
    pub store: CsvHistoryStore,
    pub engine: EngineConfig,
}

/// Create the working directories named in the settings if missing.
pub fn ensure_dirs(settings: &Settings) -> Result<(), AppError> {
    for dir in [
        &settings.dir_csv,
        &settings.dir_database,
        &settings.dir_plots,
        &settings.dir_temp,
    ] {
        create_dir(dir)?;
    }
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir).map_err(|e| AppError::config(format!("Failed to create dir '{}': {e}", dir.display())))
}

/// Open the state table and history store for a run.
pub fn open_inputs(settings: &Settings, battleground_only: bool) -> Result<Inputs, AppError> {
    let table = StateTable::load(&settings.state_table_file)?;
    let store = CsvHistoryStore::open(&settings.dir_database)?;
    Ok(Inputs {
        table,
        store,
        engine: settings.engine_config(battleground_only),
    })
}

/// Result of loading the local poll file into the history store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub source: PathBuf,
    pub lines_read: usize,
    pub polls_loaded: usize,
    pub history_rows: usize,
}

/// Parse the local poll file and upsert every poll into the history store.
pub fn load_polls(settings: &Settings) -> Result<LoadSummary, AppError> {
    let source = poll_file_path(&settings.dir_csv, &settings.poll_file_name);
    let file = read_poll_file(&source, settings.poll_year)?;

    let mut store = CsvHistoryStore::open(&settings.dir_database)?;
    for sample in &file.samples {
        store.upsert(sample);
    }
    store.flush()?;

    let summary = LoadSummary {
        source,
        lines_read: file.lines_read,
        polls_loaded: file.samples.len(),
        history_rows: store.len(),
    };
    tracing::info!(
        source = %summary.source.display(),
        store = %store.path().display(),
        lines = summary.lines_read,
        polls = summary.polls_loaded,
        rows = summary.history_rows,
        "poll file loaded"
    );
    Ok(summary)
}
