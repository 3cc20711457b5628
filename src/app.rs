//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments and loads the config file
//! - dispatches to fetch, load, plot or report
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Command, PlotArgs, ReportArgs};
use crate::config::{Settings, resolve_config_path};
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "ppolls=info,warn";

/// Entry point for the `ppolls` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let settings = Settings::load(&config_path)?;
    pipeline::ensure_dirs(&settings)?;

    match cli.command {
        Command::Fetch => handle_fetch(&settings),
        Command::Load => handle_load(&settings),
        Command::Plot(args) => handle_plot(&settings, &args),
        Command::Report(args) => handle_report(&settings, &args),
    }
}

/// Logs go to stderr so reports on stdout stay pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Keep a subscriber the host process already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

fn handle_fetch(settings: &Settings) -> Result<(), AppError> {
    let outcome = crate::data::fetch_poll_file(
        &settings.source_url,
        &settings.dir_csv,
        &settings.dir_temp,
        &settings.poll_file_name,
    )?;
    tracing::info!(?outcome, "fetch complete");
    Ok(())
}

fn handle_load(settings: &Settings) -> Result<(), AppError> {
    let summary = pipeline::load_polls(settings)?;
    println!(
        "Loaded {} polls from {} ({} lines); history now holds {} rows.",
        summary.polls_loaded,
        summary.source.display(),
        summary.lines_read,
        summary.history_rows
    );
    Ok(())
}

fn handle_plot(settings: &Settings, args: &PlotArgs) -> Result<(), AppError> {
    let inputs = pipeline::open_inputs(settings, false)?;
    let series = crate::report::all_series(&inputs.table, &inputs.store, &inputs.engine)?;

    crate::plot::render_all(
        &series,
        &settings.dir_plots,
        &settings.labels,
        settings.plot_width,
        settings.plot_height,
    )?;

    if let Some(path) = &args.series {
        crate::io::export::write_series_json(path, &series)?;
    }
    Ok(())
}

fn handle_report(settings: &Settings, args: &ReportArgs) -> Result<(), AppError> {
    if args.is_projection() {
        return handle_projection(settings, args);
    }

    if args.battleground {
        tracing::warn!(id = %args.id, "-b only applies to the ec report, ignoring");
    }
    if args.export.is_some() {
        tracing::warn!(id = %args.id, "--export only applies to the ec report, ignoring");
    }

    let inputs = pipeline::open_inputs(settings, false)?;
    let unit = inputs
        .table
        .get(&args.id)
        .ok_or_else(|| AppError::config(format!("Unknown state code '{}'.", args.id)))?;

    let report = crate::report::state_report(unit, &inputs.store, &inputs.engine)?;
    print!("{}", crate::report::format_state_report(&report, &settings.labels));
    Ok(())
}

fn handle_projection(settings: &Settings, args: &ReportArgs) -> Result<(), AppError> {
    let inputs = pipeline::open_inputs(settings, args.battleground)?;
    let report = crate::report::project(&inputs.table, &inputs.store, &inputs.engine)?;

    print!(
        "{}",
        crate::report::format_projection(&report, &settings.labels, &inputs.engine)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_projection_csv(path, &report, &settings.labels)?;
    }
    Ok(())
}
