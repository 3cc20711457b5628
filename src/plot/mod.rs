//! Chart rendering for per-state poll series.
//!
//! Charts are written as SVG files, one per state, with `plotters`.

pub mod chart;

pub use chart::*;
