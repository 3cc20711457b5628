//! Formatted terminal output for projections and state listings.
//!
//! Formatting is kept in one place so the engine stays free of layout concerns
//! and output changes stay local.

use crate::domain::{EngineConfig, Leader, SideLabels, UnitAggregate};
use crate::math::other_share;
use crate::report::{ProjectionReport, StateReport, UnitProjection};

const DIVIDER: &str = "-------------------------------------------------------------";
const NO_DATA: &str = "no data";

/// Format the projection table with totals per outcome.
pub fn format_projection(report: &ProjectionReport, labels: &SideLabels, config: &EngineConfig) -> String {
    let mut out = String::new();

    out.push_str(&format_settings(config));
    out.push('\n');
    out.push_str(&format!(
        "{:<2}  {:>2}  {:<10}  {:<8}  {:<8}  {:<10}  {}\n",
        "St", "EV", "Last Poll", labels.a, labels.b, "Other", "Leading"
    ));
    out.push_str(DIVIDER);
    out.push('\n');

    for row in &report.rows {
        out.push_str(&format_row(row, labels));
        out.push('\n');
    }

    out.push_str(DIVIDER);
    out.push('\n');
    for leader in [Leader::A, Leader::B, Leader::Tossup] {
        let bucket = report.bucket(leader);
        let codes: String = bucket.codes.iter().map(|c| format!(" {c}")).collect();
        out.push_str(&format!(
            "{:<6} EV: {:>3}, states: ({:>2}){codes}\n",
            labels.leader(leader),
            bucket.weight,
            bucket.codes.len(),
        ));
    }

    out
}

fn format_settings(config: &EngineConfig) -> String {
    let scope = if config.battleground_only {
        "battleground states"
    } else {
        "all states"
    };
    format!(
        "Award policy {} | tossup threshold {:.1} | up to {} polls since {} | {scope}\n",
        u8::from(config.award_policy),
        config.tossup_threshold,
        config.max_poll_count,
        config.date_threshold,
    )
}

fn format_row(row: &UnitProjection, labels: &SideLabels) -> String {
    let agg = &row.aggregate;
    format!(
        "{:<2}  {:>2}  {:<10}  {:>4.1}  {}  {:>4.1}  {}  {:>4.1}  {}{}  {}",
        agg.code,
        agg.weight,
        last_poll(agg),
        agg.mean_a,
        agg.trend_a,
        agg.mean_b,
        agg.trend_b,
        agg.mean_other,
        agg.trend_other,
        flag(row.outcome.flagged),
        labels.leader(row.outcome.leader),
    )
}

/// Format one state's windowed polls followed by its projection line.
pub fn format_state_report(report: &StateReport, labels: &SideLabels) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({} EV, {:?})\n",
        report.unit.code, report.unit.weight, report.unit.category
    ));
    out.push_str(&format!(
        "{:<10}  {:>5}  {:>5}  {:>5}  {}\n",
        "End Poll", labels.a, labels.b, "Other", "Pollster"
    ));
    for s in &report.series.samples {
        out.push_str(&format!(
            "{:<10}  {:>5.1}  {:>5.1}  {:>5.1}  {}\n",
            s.end_date.to_string(),
            s.pct_a,
            s.pct_b,
            other_share(s.pct_a, s.pct_b),
            s.pollster,
        ));
    }
    if report.series.is_empty() {
        out.push_str("(no polls in window)\n");
    }

    out.push_str(DIVIDER);
    out.push('\n');
    out.push_str(&format_row(&report.projection, labels));
    out.push('\n');
    out
}

fn last_poll(agg: &UnitAggregate) -> String {
    agg.latest_end_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| NO_DATA.to_string())
}

fn flag(flagged: bool) -> &'static str {
    if flagged { "**" } else { "  " }
}
