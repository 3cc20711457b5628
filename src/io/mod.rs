//! Input/output helpers.
//!
//! - raw poll file parsing (`ingest`)
//! - poll history storage (`history`)
//! - report and series exports (`export`)

pub mod export;
pub mod history;
pub mod ingest;

pub use export::*;
pub use history::*;
pub use ingest::*;
