//! Poll aggregation and electoral projection engine.
//!
//! Per unit, the pipeline is:
//!
//! - `window`: bound the store's history by end date and count
//! - `aggregate`: means, "other" share and trends (or the no-data fallback)
//! - `award`: decide a leader or tossup with the configured policy
//!
//! Everything here is pure except `HistoryWindower::window`, which reads the store.

pub mod aggregate;
pub mod award;
pub mod window;

pub use aggregate::*;
pub use award::*;
pub use window::*;
