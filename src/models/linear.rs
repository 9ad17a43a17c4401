//! Linear model primitives.
//!
//! - build a design row (intercept first) for OLS
//! - predict `y` from a fitted model and a feature vector
//! - render the fitted equation

use crate::domain::FittedModel;
use crate::error::FitError;

/// Fill a design row: `[1, x_1, ..., x_k]`.
///
/// # Panics
/// Panics if `out.len() != features.len() + 1`. Callers size the buffer once
/// per combination.
pub fn fill_design_row(features: &[f64], out: &mut [f64]) {
    out[0] = 1.0;
    out[1..].copy_from_slice(features);
}

/// Apply fitted coefficients to one observation.
///
/// `features` must be in the model's variable order.
pub fn predict(model: &FittedModel, features: &[f64]) -> Result<f64, FitError> {
    let expected = model.variables().len();
    if features.len() != expected {
        return Err(FitError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }

    let y = model
        .slopes()
        .iter()
        .zip(features)
        .fold(model.intercept(), |acc, (b, x)| acc + b * x);
    Ok(y)
}

/// Render `response = b0 + b1*x1 - b2*x2 ...` with four decimals.
pub fn formula(model: &FittedModel, response: &str) -> String {
    let mut out = format!("{response} = {:.4}", model.intercept());
    for (name, &b) in model.variables().iter().zip(model.slopes()) {
        if b.is_sign_negative() {
            out.push_str(&format!(" - {:.4}*{name}", -b));
        } else {
            out.push_str(&format!(" + {b:.4}*{name}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> FittedModel {
        FittedModel::new(["x1", "x2"].into_iter().collect(), vec![5.0, 2.0, -3.0]).unwrap()
    }

    #[test]
    fn design_row_has_intercept_first() {
        let mut row = [0.0; 3];
        fill_design_row(&[4.0, 7.0], &mut row);
        assert_eq!(row, [1.0, 4.0, 7.0]);
    }

    #[test]
    fn predict_applies_intercept_and_slopes() {
        let y = predict(&model(), &[1.0, 2.0]).unwrap();
        assert!((y - (5.0 + 2.0 - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn predict_rejects_wrong_length() {
        let err = predict(&model(), &[1.0]).unwrap_err();
        assert_eq!(err, FitError::DimensionMismatch { expected: 2, actual: 1 });
        assert!(predict(&model(), &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn formula_renders_signs() {
        assert_eq!(formula(&model(), "y"), "y = 5.0000 + 2.0000*x1 - 3.0000*x2");
    }
}
