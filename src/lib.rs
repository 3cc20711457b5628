//! `ppolls` library crate.
//!
//! The binary (`ppolls`) is a thin wrapper around this library so that:
//!
//! - the projection engine is testable without spawning processes
//! - the store, config and report layers stay reusable on their own
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod projection;
pub mod report;
