//! Synthetic dataset generation with a known linear truth.
//!
//! Layout of the generated table: `id, x1..xm, y` (response last, so the
//! defaults of `subset fit` pick it up without flags).
//!
//! ```text
//! y = intercept + Σ_{j < informative} β_j x_j + ε,   ε ~ N(0, noise²)
//! β_j = (j + 1) with alternating sign
//! ```
//!
//! Features are drawn uniformly from `[0, 10)`. Generation is deterministic for
//! a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::Dataset;
use crate::domain::SampleConfig;
use crate::error::FitError;

/// Name of the generated response column.
pub const SAMPLE_RESPONSE: &str = "y";

#[derive(Debug, Clone)]
pub struct SampleData {
    pub dataset: Dataset,
    /// True coefficients, intercept first, one entry per feature column
    /// (zero for non-informative features).
    pub true_coefficients: Vec<f64>,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, FitError> {
    if config.rows == 0 {
        return Err(FitError::invalid("Sample row count must be > 0."));
    }
    if config.features == 0 {
        return Err(FitError::invalid("Sample feature count must be > 0."));
    }
    if config.informative > config.features {
        return Err(FitError::invalid(format!(
            "Informative features ({}) cannot exceed feature count ({}).",
            config.informative, config.features
        )));
    }
    if !config.intercept.is_finite() {
        return Err(FitError::invalid("Sample intercept must be finite."));
    }
    if !(config.noise >= 0.0 && config.noise.is_finite()) {
        return Err(FitError::invalid(format!(
            "Sample noise must be a finite, non-negative standard deviation, got {}.",
            config.noise
        )));
    }

    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| FitError::invalid(format!("Invalid noise level {}: {e}", config.noise)))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut true_coefficients = Vec::with_capacity(config.features + 1);
    true_coefficients.push(config.intercept);
    for j in 0..config.features {
        let beta = if j < config.informative {
            let magnitude = (j + 1) as f64;
            if j % 2 == 0 { magnitude } else { -magnitude }
        } else {
            0.0
        };
        true_coefficients.push(beta);
    }

    let mut columns = Vec::with_capacity(config.features + 2);
    columns.push("id".to_string());
    columns.extend((1..=config.features).map(|j| format!("x{j}")));
    columns.push(SAMPLE_RESPONSE.to_string());

    let mut rows = Vec::with_capacity(config.rows);
    for i in 0..config.rows {
        let mut row = Vec::with_capacity(columns.len());
        row.push(format!("obs{:04}", i + 1));

        let mut y = config.intercept;
        for beta in &true_coefficients[1..] {
            let x: f64 = rng.gen_range(0.0..10.0);
            y += beta * x;
            row.push(format!("{x:.6}"));
        }
        y += normal.sample(&mut rng);
        row.push(format!("{y:.6}"));

        rows.push(row);
    }

    Ok(SampleData {
        dataset: Dataset::new(columns, rows)?,
        true_coefficients,
    })
}
