//! In-sample scoring of a fitted model.
//!
//! For `n` training rows and `k = |variables| + 1` parameters:
//!
//! ```text
//! MSE = (1/n) Σ (y_i - ŷ_i)^2
//! AIC = n ln(MSE) + 2k
//! BIC = n ln(MSE) + k ln(n)
//! ```
//!
//! The same `n` (training row count) feeds all three statistics. There is no
//! held-out split: the information criteria carry the complexity penalty.
//!
//! An exact fit leaves rounding residue instead of a literal zero: each residual
//! is a few ulps of `y`. MSE at or below `degenerate_threshold(mean(y²))`, i.e.
//! residuals within `DEGENERATE_ULPS` ulps of the response scale, is treated as
//! zero and rejected with `DegenerateFit` instead of producing a huge negative
//! AIC/BIC. Any residual noise above that floor is a genuine fit.

use crate::data::Dataset;
use crate::domain::{FittedModel, Scores, VariableSet};
use crate::error::FitError;
use crate::fit::fitter::DesignColumns;
use crate::models::predict;

/// Residual size, in units of `f64::EPSILON * rms(y)`, below which a fit counts as exact.
pub const DEGENERATE_ULPS: f64 = 1024.0;

/// MSE floor for a response with mean square `mean_sq_y`.
pub fn degenerate_threshold(mean_sq_y: f64) -> f64 {
    let rel = DEGENERATE_ULPS * f64::EPSILON;
    rel * rel * mean_sq_y
}

/// Score `model` on the training data it was fitted against.
pub fn score(
    model: &FittedModel,
    dataset: &Dataset,
    response: &str,
    variables: &VariableSet,
) -> Result<Scores, FitError> {
    if model.variables() != variables {
        return Err(FitError::invalid(format!(
            "Model was fitted on {} but scored against {variables}.",
            model.variables()
        )));
    }
    let columns = DesignColumns::resolve(dataset, response, variables)?;
    score_columns(model, &columns)
}

/// Score from already-resolved columns.
pub fn score_columns(model: &FittedModel, columns: &DesignColumns<'_>) -> Result<Scores, FitError> {
    let n = columns.n_rows();
    if n == 0 {
        return Err(FitError::invalid("Cannot score a model on zero rows."));
    }

    let mse = mean_squared_error(model, columns)?;
    let mean_sq_y = columns.y.iter().map(|v| v * v).sum::<f64>() / n as f64;

    if !mse.is_finite() || mse <= degenerate_threshold(mean_sq_y) {
        return Err(FitError::DegenerateFit {
            combination: model.variables().to_string(),
            mse,
        });
    }

    let k = model.param_count();
    Ok(Scores {
        mse,
        aic: aic(n, k, mse),
        bic: bic(n, k, mse),
        n,
        k,
    })
}

/// Mean of squared residuals over every training row.
pub fn mean_squared_error(model: &FittedModel, columns: &DesignColumns<'_>) -> Result<f64, FitError> {
    let n = columns.n_rows();
    let mut features = vec![0.0; columns.x.len()];
    let mut sse = 0.0;

    for i in 0..n {
        columns.features_into(i, &mut features);
        let residual = columns.y[i] - predict(model, &features)?;
        sse += residual * residual;
    }

    Ok(sse / n as f64)
}

/// Akaike Information Criterion, `n ln(MSE) + 2k`.
pub fn aic(n: usize, k: usize, mse: f64) -> f64 {
    n as f64 * mse.ln() + 2.0 * k as f64
}

/// Bayesian Information Criterion, `n ln(MSE) + k ln(n)`.
pub fn bic(n: usize, k: usize, mse: f64) -> f64 {
    let n_f = n as f64;
    n_f * mse.ln() + k as f64 * n_f.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fitter::fit;

    fn set(names: &[&str]) -> VariableSet {
        names.iter().copied().collect()
    }

    #[test]
    fn information_criteria_match_reference_values() {
        // n=10, two variables + intercept, MSE=4.
        let a = aic(10, 3, 4.0);
        let b = bic(10, 3, 4.0);
        assert!((a - 19.863).abs() < 1e-3, "aic={a}");
        assert!((b - 20.771).abs() < 1e-3, "bic={b}");
    }

    #[test]
    fn scores_use_training_row_count() {
        // Single regressor, residuals alternate +1/-1 around y = 1 + 2x.
        let x: Vec<f64> = (0..20).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 2.0 * v + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let ds = Dataset::from_columns(vec![("x", x), ("y", y)]).unwrap();
        let vars = set(&["x"]);

        let model = fit(&ds, "y", &vars).unwrap();
        let scores = score(&model, &ds, "y", &vars).unwrap();

        assert_eq!(scores.n, 20);
        assert_eq!(scores.k, 2);
        let expected_mse = scores.mse;
        assert!(expected_mse > 0.9 && expected_mse <= 1.0, "mse={expected_mse}");
        assert!((scores.aic - (20.0 * expected_mse.ln() + 4.0)).abs() < 1e-9);
        assert!((scores.bic - (20.0 * expected_mse.ln() + 2.0 * 20f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn mse_matches_hand_computation() {
        let ds = Dataset::from_columns(vec![("x", vec![0.0, 1.0, 2.0, 3.0]), ("y", vec![2.0, 1.0, 4.0, 3.0])])
            .unwrap();
        let vars = set(&["x"]);
        let model = fit(&ds, "y", &vars).unwrap();
        let scores = score(&model, &ds, "y", &vars).unwrap();

        // Fit is y = 1.6 + 0.6x; residuals 0.4, -1.2, 1.2, -0.4.
        assert!((scores.mse - 0.8).abs() < 1e-9, "mse={}", scores.mse);
    }

    #[test]
    fn exact_fit_is_degenerate() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2 = vec![2.0, 1.0, 4.0, 3.0, 6.0, 8.0];
        let y: Vec<f64> = x1.iter().zip(&x2).map(|(a, b)| 2.0 * a + 3.0 * b + 5.0).collect();
        let ds = Dataset::from_columns(vec![("x1", x1), ("x2", x2), ("y", y)]).unwrap();
        let vars = set(&["x1", "x2"]);

        let model = fit(&ds, "y", &vars).unwrap();
        assert!((model.slopes()[0] - 2.0).abs() < 1e-6);
        assert!((model.slopes()[1] - 3.0).abs() < 1e-6);

        match score(&model, &ds, "y", &vars).unwrap_err() {
            FitError::DegenerateFit { combination, mse } => {
                assert_eq!(combination, "[x1, x2]");
                assert!(mse.abs() < 1e-12);
            }
            other => panic!("expected DegenerateFit, got {other:?}"),
        }
    }

    #[test]
    fn small_noise_on_large_offset_is_a_real_fit() {
        // y = 1e6 + 0.01x with +/-1e-5 alternating noise: MSE ~ 1e-10, far above rounding residue.
        let x: Vec<f64> = (0..30).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1e6 + 0.01 * v + if i % 2 == 0 { 1e-5 } else { -1e-5 })
            .collect();
        let ds = Dataset::from_columns(vec![("x", x), ("y", y)]).unwrap();
        let vars = set(&["x"]);

        let model = fit(&ds, "y", &vars).unwrap();
        let scores = score(&model, &ds, "y", &vars).unwrap();
        assert!(scores.mse > 0.9e-10 && scores.mse < 1.01e-10, "mse={}", scores.mse);
        assert!(scores.aic.is_finite() && scores.bic.is_finite());
    }

    #[test]
    fn degenerate_threshold_tracks_machine_precision() {
        assert!(degenerate_threshold(1.0) < 1e-25);
        assert!(degenerate_threshold(1e12) < 1e-12);
        assert_eq!(degenerate_threshold(0.0), 0.0);
    }

    #[test]
    fn mismatched_variable_set_is_rejected() {
        let ds = Dataset::from_columns(vec![
            ("a", vec![1.0, 2.0, 3.0, 5.0]),
            ("b", vec![2.0, 1.0, 0.0, 4.0]),
            ("y", vec![1.0, 3.0, 2.0, 7.0]),
        ])
        .unwrap();
        let model = fit(&ds, "y", &set(&["a"])).unwrap();
        assert!(matches!(
            score(&model, &ds, "y", &set(&["b"])),
            Err(FitError::InvalidParameter(_))
        ));
    }
}
