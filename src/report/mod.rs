//! Reporting: text rendering of a run (dataset summary, results, selection).
//!
//! The core returns structured `ScoredResult`s; everything here is presentation.

pub mod format;

pub use format::*;
