//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - candidate subsets and fit outputs (`VariableSet`, `FittedModel`, `ScoredResult`)
//! - ranking keys (`Criterion`)
//! - run configuration (`RunConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
