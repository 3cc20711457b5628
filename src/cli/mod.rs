//! Command-line parsing for the poll projection tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! projection code. Run settings live in the config file; flags here only pick
//! the command and per-run output options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ppolls", version, about = "Presidential poll aggregator and electoral projection")]
pub struct Cli {
    /// Config file (default: $PPOLLS_CONFIG, then ./config.toml).
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the published poll file, replacing the local copy if it changed.
    Fetch,
    /// Load the local poll file into the history store.
    Load,
    /// Render one SVG chart per state with polls in the window.
    Plot(PlotArgs),
    /// Print the electoral projection (`ec`) or one state's polls (e.g. `pa`).
    Report(ReportArgs),
}

/// Options for `plot`.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Also write all per-state series to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub series: Option<PathBuf>,
}

/// Options for `report`.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// `ec` for the electoral projection, or a two-letter state code.
    pub id: String,

    /// Battleground states only (electoral projection).
    #[arg(short = 'b', long)]
    pub battleground: bool,

    /// Export the projection rows to CSV (electoral projection).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

impl ReportArgs {
    /// Whether this is the electoral projection rather than a state listing.
    pub fn is_projection(&self) -> bool {
        self.id.eq_ignore_ascii_case("ec")
    }
}
