//! Linear model evaluation.
//!
//! Kept as small, pure functions so fitting and scoring code share one
//! definition of "design row" and "prediction".

pub mod linear;

pub use linear::*;
