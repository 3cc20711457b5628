//! Reporting: the electoral projection across all units and the single-state
//! poll listing.
//!
//! Computation lives here; text layout lives in `format`.

pub mod format;

pub use format::*;

use crate::data::StateTable;
use crate::domain::{
    AwardOutcome, Category, EngineConfig, Leader, UnitAggregate, UnitRecord, UnitSeries, WindowedSeries,
};
use crate::error::AppError;
use crate::io::history::PollStore;
use crate::projection::{HistoryWindower, aggregate_or_fallback, unit_series};

/// One unit's line in the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitProjection {
    pub aggregate: UnitAggregate,
    pub outcome: AwardOutcome,
}

/// Running total for one outcome bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    pub weight: u32,
    pub codes: Vec<String>,
}

/// The whole projection: per-unit lines plus totals per outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionReport {
    pub rows: Vec<UnitProjection>,
    pub a: Bucket,
    pub b: Bucket,
    pub tossup: Bucket,
}

impl ProjectionReport {
    fn push(&mut self, aggregate: UnitAggregate, outcome: AwardOutcome) {
        self.a.weight += outcome.increment_a;
        self.b.weight += outcome.increment_b;
        self.tossup.weight += outcome.increment_tossup;
        self.bucket_mut(outcome.leader).codes.push(aggregate.code.clone());
        self.rows.push(UnitProjection { aggregate, outcome });
    }

    fn bucket_mut(&mut self, leader: Leader) -> &mut Bucket {
        match leader {
            Leader::A => &mut self.a,
            Leader::B => &mut self.b,
            Leader::Tossup => &mut self.tossup,
        }
    }

    pub fn bucket(&self, leader: Leader) -> &Bucket {
        match leader {
            Leader::A => &self.a,
            Leader::B => &self.b,
            Leader::Tossup => &self.tossup,
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.a.weight + self.b.weight + self.tossup.weight
    }
}

/// Run the projection over every unit of the table, in table order.
///
/// With `battleground_only`, other categories are skipped entirely. A store
/// failure on any unit aborts the whole run.
pub fn project(table: &StateTable, store: &dyn PollStore, config: &EngineConfig) -> Result<ProjectionReport, AppError> {
    let windower = HistoryWindower::from_config(config);
    let mut report = ProjectionReport::default();

    for unit in table.units() {
        if config.battleground_only && unit.category != Category::Battleground {
            continue;
        }
        let (aggregate, outcome) = project_unit(unit, store, &windower, config)?;
        report.push(aggregate, outcome);
    }

    tracing::debug!(
        units = report.rows.len(),
        a = report.a.weight,
        b = report.b.weight,
        tossup = report.tossup.weight,
        "projection complete"
    );
    Ok(report)
}

fn project_unit(
    unit: &UnitRecord,
    store: &dyn PollStore,
    windower: &HistoryWindower,
    config: &EngineConfig,
) -> Result<(UnitAggregate, AwardOutcome), AppError> {
    let series = windower.window(store, &unit.code)?;
    let aggregate = aggregate_or_fallback(unit, &series);
    let outcome = config
        .award_policy
        .award(unit.weight, aggregate.mean_a, aggregate.mean_b, config.tossup_threshold);
    Ok((aggregate, outcome))
}

/// A single unit's windowed polls and its projection line.
#[derive(Debug, Clone, PartialEq)]
pub struct StateReport {
    pub unit: UnitRecord,
    pub series: WindowedSeries,
    pub projection: UnitProjection,
}

pub fn state_report(unit: &UnitRecord, store: &dyn PollStore, config: &EngineConfig) -> Result<StateReport, AppError> {
    let windower = HistoryWindower::from_config(config);
    let series = windower.window(store, &unit.code)?;
    let aggregate = aggregate_or_fallback(unit, &series);
    let outcome = config
        .award_policy
        .award(unit.weight, aggregate.mean_a, aggregate.mean_b, config.tossup_threshold);

    Ok(StateReport {
        unit: unit.clone(),
        series,
        projection: UnitProjection { aggregate, outcome },
    })
}

/// Chart series for every unit of the table, in table order.
///
/// Units without windowed polls yield an empty series.
pub fn all_series(table: &StateTable, store: &dyn PollStore, config: &EngineConfig) -> Result<Vec<UnitSeries>, AppError> {
    let windower = HistoryWindower::from_config(config);
    table
        .units()
        .iter()
        .map(|unit| windower.window(store, &unit.code).map(|w| unit_series(&w)))
        .collect()
}
