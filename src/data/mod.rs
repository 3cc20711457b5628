//! Reference and remote data: the state table and the published poll file.

pub mod fetch;
pub mod state_table;

pub use fetch::*;
pub use state_table::*;
