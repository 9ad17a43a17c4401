//! Model selection over evaluated combinations.
//!
//! Every criterion is "lower is better". Ties are broken by generator index so
//! rankings are reproducible regardless of the order results arrived in.

use std::cmp::Ordering;

use crate::domain::{Criterion, ScoredResult};

/// Best model under each criterion.
#[derive(Debug, Clone)]
pub struct Selection {
    pub best_aic: ScoredResult,
    pub best_bic: ScoredResult,
    pub best_mse: ScoredResult,
}

/// Pick the best result by AIC, BIC and MSE. `None` for an empty result set.
pub fn select(results: &[ScoredResult]) -> Option<Selection> {
    Some(Selection {
        best_aic: best_by(results, Criterion::Aic)?.clone(),
        best_bic: best_by(results, Criterion::Bic)?.clone(),
        best_mse: best_by(results, Criterion::Mse)?.clone(),
    })
}

pub fn best_by(results: &[ScoredResult], criterion: Criterion) -> Option<&ScoredResult> {
    results.iter().min_by(|a, b| compare(a, b, criterion))
}

/// Sort results ascending by `criterion`.
pub fn rank(mut results: Vec<ScoredResult>, criterion: Criterion) -> Vec<ScoredResult> {
    results.sort_by(|a, b| compare(a, b, criterion));
    results
}

fn compare(a: &ScoredResult, b: &ScoredResult, criterion: Criterion) -> Ordering {
    a.criterion(criterion)
        .total_cmp(&b.criterion(criterion))
        .then(a.index.cmp(&b.index))
}
