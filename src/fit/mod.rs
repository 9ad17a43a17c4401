//! Exhaustive subset search.
//!
//! Responsibilities:
//!
//! - enumerate every k-subset of the candidate pool
//! - fit + score each subset (parallel)
//! - rank and select by AIC / BIC / MSE

pub mod combinations;
pub mod evaluator;
pub mod fitter;
pub mod score;
pub mod selection;

pub use combinations::*;
pub use evaluator::*;
pub use fitter::*;
pub use score::*;
pub use selection::*;
