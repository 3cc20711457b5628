//! Raw poll file parsing.
//!
//! The published poll file is plain text, one poll per line, whitespace
//! separated:
//!
//! ```text
//! STATE PCT_A PCT_B PCT_X START_MON START_DAY END_MON END_DAY POLLSTER...
//! PA 47 46 0 Jul 8 Jul 12 Emerson College
//! ```
//!
//! Dates carry no year; the configured poll year is applied. Any malformed line
//! fails the whole load with its line number.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::PollSample;
use crate::error::AppError;

const MIN_COLUMNS: usize = 9;
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Parsed poll file.
#[derive(Debug, Clone)]
pub struct PollFile {
    pub samples: Vec<PollSample>,
    pub lines_read: usize,
}

/// Read and parse a raw poll file.
pub fn read_poll_file(path: &Path, year: i32) -> Result<PollFile, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::fetch(format!("Failed to read poll file '{}': {e}", path.display())))?;
    let lines_read = text.lines().count();
    let samples = parse_poll_text(&text, year)
        .map_err(|e| AppError::fetch(format!("Poll file '{}' is malformed: {}", path.display(), e.message())))?;
    Ok(PollFile { samples, lines_read })
}

/// Parse raw poll text into samples, in file order.
pub fn parse_poll_text(text: &str, year: i32) -> Result<Vec<PollSample>, AppError> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match parse_line(line, year) {
            Ok(Some(sample)) => out.push(sample),
            Ok(None) => {}
            Err(e) => return Err(AppError::fetch(format!("line {}: {e}", idx + 1))),
        }
    }
    Ok(out)
}

fn parse_line(line: &str, year: i32) -> Result<Option<PollSample>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < MIN_COLUMNS {
        return Err(format!("expected at least {MIN_COLUMNS} columns, found {}", cols.len()));
    }

    let unit_code = cols[0].to_ascii_uppercase();
    let pct_a = parse_pct(cols[1], "side A")?;
    let pct_b = parse_pct(cols[2], "side B")?;
    let start_date = parse_month_day(cols[4], cols[5], year, "start")?;
    let end_date = parse_month_day(cols[6], cols[7], year, "end")?;
    let pollster = cols[MIN_COLUMNS - 1..].join(" ");

    Ok(Some(PollSample {
        unit_code,
        start_date,
        end_date,
        pct_a,
        pct_b,
        pollster,
    }))
}

fn parse_pct(s: &str, what: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{what} percentage '{s}' is not a valid number"))
}

fn parse_month_day(month: &str, day: &str, year: i32, what: &str) -> Result<NaiveDate, String> {
    let m = month_number(month).ok_or_else(|| format!("invalid {what} month '{month}'"))?;
    let d = day
        .parse::<u32>()
        .map_err(|_| format!("{what} day '{day}' is not a valid integer"))?;
    NaiveDate::from_ymd_opt(year, m, d).ok_or_else(|| format!("invalid {what} date {year}-{m:02}-{d:02}"))
}

/// Month number (1-12) for a three-letter English abbreviation.
pub fn month_number(s: &str) -> Option<u32> {
    let upper = s.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32 + 1)
}
