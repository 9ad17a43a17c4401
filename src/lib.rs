//! `subset-ols` library crate.
//!
//! The binary (`subset`) is a thin wrapper around this library so that:
//!
//! - the search, fitting and scoring code is testable without spawning processes
//! - a `Dataset` built elsewhere (e.g. in memory) can go straight through the pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
