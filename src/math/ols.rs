//! Least squares solver.
//!
//! Every candidate combination is one small problem of the form
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a tall design matrix (many rows, `k + 1` columns).
//!
//! Implementation choices:
//! - SVD, because it handles tall matrices directly and exposes the singular
//!   values. (Nalgebra's `QR::solve` is intended for square systems.)
//! - Rank deficiency is an error, never a minimum-norm solution: if any
//!   singular value falls below `RANK_TOL * σ_max` the coefficients are not
//!   identified and we report which rank we found.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value threshold for declaring a column direction degenerate.
pub const RANK_TOL: f64 = 1e-10;

/// Why a least squares problem has no unique solution.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveFailure {
    /// Fewer observations than unknowns.
    Underdetermined { rows: usize, cols: usize },
    /// Numerical rank below the column count.
    RankDeficient { rank: usize, cols: usize },
    /// The solve produced NaN/inf (non-finite inputs or overflow).
    NonFinite,
}

impl std::fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveFailure::Underdetermined { rows, cols } => {
                write!(f, "{rows} rows cannot identify {cols} coefficients")
            }
            SolveFailure::RankDeficient { rank, cols } => {
                write!(f, "design matrix rank {rank} < {cols} columns (collinear variables)")
            }
            SolveFailure::NonFinite => write!(f, "solution is not finite"),
        }
    }
}

/// Solve a full-rank least squares problem using SVD.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolveFailure> {
    let (rows, cols) = x.shape();
    if rows < cols {
        return Err(SolveFailure::Underdetermined { rows, cols });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(SolveFailure::NonFinite);
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = RANK_TOL * sigma_max;

    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
    if rank < cols || sigma_max <= 0.0 {
        return Err(SolveFailure::RankDeficient { rank, cols });
    }

    let beta = svd.solve(y, eps).map_err(|_| SolveFailure::NonFinite)?;
    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(SolveFailure::NonFinite)
    }
}
