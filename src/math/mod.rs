//! Mathematical utilities: least squares and combinatorics.

pub mod combin;
pub mod ols;

pub use combin::*;
pub use ols::*;
