//! Shared domain types.
//!
//! These types are kept small and plain so they can flow between the store,
//! the projection engine, the report formatter and the chart renderer without
//! conversions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prior classification of a unit from the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Battleground,
    /// Reliably carried by side A.
    StronglyA,
    /// Reliably carried by side B.
    StronglyB,
}

impl Category {
    /// Parse the single-letter code used in the state table (`B`, `D`, `G`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Category::Battleground),
            "D" => Some(Category::StronglyA),
            "G" => Some(Category::StronglyB),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Category::Battleground => "B",
            Category::StronglyA => "D",
            Category::StronglyB => "G",
        }
    }
}

/// One geographic unit (a state) and its electoral weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub code: String,
    pub weight: u32,
    pub category: Category,
}

/// One poll's measured support for the two tracked sides.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSample {
    pub unit_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pct_a: f64,
    pub pct_b: f64,
    pub pollster: String,
}

/// The bounded, most-recent-first poll window for one unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowedSeries {
    pub code: String,
    pub samples: Vec<PollSample>,
}

impl WindowedSeries {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Three-point trend classification (see `math::trend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Not enough points, no movement, or not computed.
    Flat,
    Up,
    UpAccelerating,
    Down,
    DownAccelerating,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Flat => "--",
            Trend::Up => "u1",
            Trend::UpAccelerating => "u2",
            Trend::Down => "d1",
            Trend::DownAccelerating => "d2",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-unit summary statistics for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAggregate {
    pub code: String,
    pub weight: u32,
    /// `None` when the aggregate was synthesized from the unit's category.
    pub latest_end_date: Option<NaiveDate>,
    pub mean_a: f64,
    pub mean_b: f64,
    pub mean_other: f64,
    pub trend_a: Trend,
    pub trend_b: Trend,
    pub trend_other: Trend,
    pub sample_count: usize,
}

impl UnitAggregate {
    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }
}

/// Which outcome bucket a unit's weight was awarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leader {
    A,
    B,
    Tossup,
}

/// Result of applying an award policy to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardOutcome {
    pub leader: Leader,
    pub increment_a: u32,
    pub increment_b: u32,
    pub increment_tossup: u32,
    /// The undecided share exceeds the margin between the sides.
    pub flagged: bool,
}

impl AwardOutcome {
    /// Award the full weight to a single bucket.
    pub fn to_leader(leader: Leader, weight: u32, flagged: bool) -> Self {
        let (increment_a, increment_b, increment_tossup) = match leader {
            Leader::A => (weight, 0, 0),
            Leader::B => (0, weight, 0),
            Leader::Tossup => (0, 0, weight),
        };
        Self {
            leader,
            increment_a,
            increment_b,
            increment_tossup,
            flagged,
        }
    }

    pub fn total(&self) -> u32 {
        self.increment_a + self.increment_b + self.increment_tossup
    }
}

/// Electoral vote award algorithm, selected by number in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum AwardPolicy {
    /// 1: reallocate "other" proportionally before comparing.
    Proportional,
    /// 2: threshold decides; flag when "other" exceeds the margin.
    FlagOverlap,
    /// 3: "other" exceeding the margin forces a tossup.
    OverlapTossup,
}

impl TryFrom<u8> for AwardPolicy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AwardPolicy::Proportional),
            2 => Ok(AwardPolicy::FlagOverlap),
            3 => Ok(AwardPolicy::OverlapTossup),
            other => Err(format!("award policy {other} is not supported (expected 1, 2 or 3)")),
        }
    }
}

impl From<AwardPolicy> for u8 {
    fn from(value: AwardPolicy) -> Self {
        match value {
            AwardPolicy::Proportional => 1,
            AwardPolicy::FlagOverlap => 2,
            AwardPolicy::OverlapTossup => 3,
        }
    }
}

/// Engine settings as understood by the projection pipeline.
///
/// Derived from the config file plus CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_poll_count: usize,
    pub date_threshold: NaiveDate,
    pub tossup_threshold: f64,
    pub award_policy: AwardPolicy,
    pub battleground_only: bool,
}

/// One charted point of a unit's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub end_date: NaiveDate,
    pub pct_a: f64,
    pub pct_b: f64,
    pub pct_other: f64,
}

/// Per-unit series handed to the chart renderer, most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSeries {
    pub code: String,
    pub points: Vec<SeriesPoint>,
}

/// Display names for the two tracked sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLabels {
    pub a: String,
    pub b: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            a: "Dem".to_string(),
            b: "Gop".to_string(),
        }
    }
}

impl SideLabels {
    pub fn leader(&self, leader: Leader) -> &str {
        match leader {
            Leader::A => &self.a,
            Leader::B => &self.b,
            Leader::Tossup => "TOSSUP",
        }
    }
}
