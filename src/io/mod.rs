//! Input/output helpers.
//!
//! - CSV ingest into a `Dataset` (`ingest`)
//! - result exports (CSV/JSON) and synthetic data files (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
