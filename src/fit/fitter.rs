//! OLS fitting for a single combination.
//!
//! Given:
//! - a dataset (shared, read-only)
//! - the response column
//! - one `VariableSet`
//!
//! we build the `n × (k + 1)` design matrix (intercept first), solve the least
//! squares problem and return the coefficients as a `FittedModel`.
//!
//! Every required cell must be numeric; there is no row skipping. A design
//! matrix without full column rank is a `SingularMatrix` error.

use nalgebra::{DMatrix, DVector};

use crate::data::Dataset;
use crate::domain::{FittedModel, VariableSet};
use crate::error::FitError;
use crate::math::solve_least_squares;
use crate::models::fill_design_row;

/// Response and explanatory columns resolved for one combination.
#[derive(Debug, Clone)]
pub struct DesignColumns<'a> {
    pub y: &'a [f64],
    /// One slice per variable, in `VariableSet` order.
    pub x: Vec<&'a [f64]>,
}

impl<'a> DesignColumns<'a> {
    /// Resolve and validate the numeric columns for `variables`.
    pub fn resolve(dataset: &'a Dataset, response: &str, variables: &VariableSet) -> Result<Self, FitError> {
        if variables.is_empty() {
            return Err(FitError::invalid("Variable set is empty."));
        }

        let response_idx = dataset.column_index(response)?;
        let y = dataset.numeric_column(response_idx)?;

        let mut x = Vec::with_capacity(variables.len());
        for name in variables.iter() {
            let idx = dataset.column_index(name)?;
            if idx == response_idx {
                return Err(FitError::invalid(format!(
                    "Response column `{}` cannot be an explanatory variable.",
                    dataset.columns()[idx]
                )));
            }
            x.push(dataset.numeric_column(idx)?);
        }

        Ok(Self { y, x })
    }

    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    /// Copy row `i`'s explanatory values into `out` (length = variable count).
    pub fn features_into(&self, i: usize, out: &mut [f64]) {
        for (slot, col) in out.iter_mut().zip(&self.x) {
            *slot = col[i];
        }
    }
}

/// Fit `response ~ 1 + variables` by ordinary least squares.
pub fn fit(dataset: &Dataset, response: &str, variables: &VariableSet) -> Result<FittedModel, FitError> {
    let columns = DesignColumns::resolve(dataset, response, variables)?;
    fit_columns(&columns, variables)
}

/// Fit from already-resolved columns.
pub fn fit_columns(columns: &DesignColumns<'_>, variables: &VariableSet) -> Result<FittedModel, FitError> {
    let n = columns.n_rows();
    let p = variables.len() + 1;

    let mut x = DMatrix::<f64>::zeros(n, p);
    let y = DVector::<f64>::from_column_slice(columns.y);
    let mut features = vec![0.0; p - 1];
    let mut row = vec![0.0; p];

    for i in 0..n {
        columns.features_into(i, &mut features);
        fill_design_row(&features, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }

    let beta = solve_least_squares(&x, &y).map_err(|reason| FitError::SingularMatrix {
        combination: variables.to_string(),
        reason: reason.to_string(),
    })?;

    log::debug!("fitted {variables}: coefficients={:?}", beta.as_slice());

    FittedModel::new(variables.clone(), beta.iter().copied().collect())
}
