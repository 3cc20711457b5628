//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the static classification (`UnitRecord`, `Category`)
//! - poll observations and windows (`PollSample`, `WindowedSeries`)
//! - engine outputs (`UnitAggregate`, `AwardOutcome`, `UnitSeries`)

pub mod types;

pub use types::*;
