//! Mathematical utilities: support shares, means and the three-point trend.

pub mod share;
pub mod trend;

pub use share::*;
pub use trend::*;
