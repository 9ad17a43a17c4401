//! Shared domain types.
//!
//! Everything produced by the fitting pipeline is immutable once built:
//!
//! - `VariableSet`: one candidate subset of explanatory columns
//! - `FittedModel`: OLS coefficients for one `VariableSet`
//! - `ScoredResult`: the model plus its in-sample scores (MSE / AIC / BIC)
//!
//! Result types are serializable so they can be exported to JSON/CSV.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// An ordered subset of explanatory variable names.
///
/// The order is the canonical order of the candidate pool the set was drawn
/// from, not a caller-chosen regression column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(Vec<String>);

impl VariableSet {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for VariableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for VariableSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// OLS fit for a single `VariableSet`.
///
/// `coefficients[0]` is the intercept; `coefficients[j + 1]` belongs to
/// `variables.names()[j]`. There is always exactly one more coefficient than
/// variables; `new` (and deserialization) enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FittedModelRecord")]
pub struct FittedModel {
    variables: VariableSet,
    coefficients: Vec<f64>,
}

#[derive(Deserialize)]
struct FittedModelRecord {
    variables: VariableSet,
    coefficients: Vec<f64>,
}

impl TryFrom<FittedModelRecord> for FittedModel {
    type Error = FitError;

    fn try_from(record: FittedModelRecord) -> Result<Self, Self::Error> {
        Self::new(record.variables, record.coefficients)
    }
}

impl FittedModel {
    pub fn new(variables: VariableSet, coefficients: Vec<f64>) -> Result<Self, FitError> {
        if coefficients.len() != variables.len() + 1 {
            return Err(FitError::invalid(format!(
                "Model over {variables} needs {} coefficients (intercept first), got {}.",
                variables.len() + 1,
                coefficients.len()
            )));
        }
        Ok(Self {
            variables,
            coefficients,
        })
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// Intercept first, then one slope per variable.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    pub fn slopes(&self) -> &[f64] {
        &self.coefficients[1..]
    }

    /// Parameter count used by the information criteria (slopes + intercept).
    pub fn param_count(&self) -> usize {
        self.coefficients.len()
    }
}

/// In-sample fit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub mse: f64,
    pub aic: f64,
    pub bic: f64,
    /// Training rows used for MSE and for the AIC/BIC terms.
    pub n: usize,
    /// Parameters (explanatory variables + intercept).
    pub k: usize,
}

/// One evaluated combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Position of the combination in generator order.
    pub index: usize,
    pub model: FittedModel,
    /// Human readable fitted equation, e.g. `y = 5.0000 + 2.0000*x1`.
    pub formula: String,
    pub scores: Scores,
}

impl ScoredResult {
    pub fn variables(&self) -> &VariableSet {
        self.model.variables()
    }

    pub fn criterion(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Aic => self.scores.aic,
            Criterion::Bic => self.scores.bic,
            Criterion::Mse => self.scores.mse,
            Criterion::Order => self.index as f64,
        }
    }
}

/// Key used to rank results (lower is better for every key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Aic,
    Bic,
    Mse,
    /// Generator order (no ranking).
    Order,
}

impl Criterion {
    pub fn display_name(self) -> &'static str {
        match self {
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
            Criterion::Mse => "MSE",
            Criterion::Order => "order",
        }
    }
}

/// Summary of the loaded dataset (the "data exploration" header of a run).
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub columns: Vec<String>,
    pub response: String,
    pub response_mean: f64,
    pub response_min: f64,
    pub response_max: f64,
}

/// Resolved configuration for a `subset fit` / `subset rank` run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    /// Response column; `None` means the last column of the file.
    pub response: Option<String>,
    /// Explicit candidate pool; `None` means every non-response, non-excluded column.
    pub candidates: Option<Vec<String>>,
    /// Identifier columns kept out of the default candidate pool.
    pub exclude: Vec<String>,
    pub combo_size: usize,
    /// Upper bound on C(m, k) accepted before dispatching any work.
    pub max_combinations: u64,
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    pub sort_by: Criterion,
    pub top_n: Option<usize>,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Default subset size.
pub const DEFAULT_COMBO_SIZE: usize = 4;

/// Default guard against combinatorial explosion.
pub const DEFAULT_MAX_COMBINATIONS: u64 = 1_000_000;

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            response: None,
            candidates: None,
            exclude: vec!["id".to_string()],
            combo_size: DEFAULT_COMBO_SIZE,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            threads: None,
            sort_by: Criterion::Bic,
            top_n: None,
            export_csv: None,
            export_json: None,
        }
    }
}

/// Settings for the synthetic dataset generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    /// Number of feature columns `x1..xm`.
    pub features: usize,
    /// Only `x1..x_informative` enter the true response.
    pub informative: usize,
    pub intercept: f64,
    /// Standard deviation of the Gaussian response noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            features: 6,
            informative: 2,
            intercept: 5.0,
            noise: 1.0,
            seed: 42,
        }
    }
}
