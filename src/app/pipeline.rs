//! Shared "fit pipeline" logic used by the `fit` and `rank` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> resolve columns -> generate combinations -> evaluate (parallel) -> rank/select
//!
//! Everything that can be validated is validated before any work is dispatched.

use crate::data::Dataset;
use crate::domain::{DatasetStats, RunConfig, ScoredResult, VariableSet};
use crate::error::{AppError, FitError};
use crate::fit::combinations::{combination_count, generate};
use crate::fit::evaluator::{EvalOptions, evaluate_all};
use crate::fit::selection::{Selection, rank, select};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stats: DatasetStats,
    /// Canonical response column name.
    pub response: String,
    /// Candidate pool in file order.
    pub candidates: Vec<String>,
    pub combinations: Vec<VariableSet>,
    /// One result per combination, sorted by `RunConfig::sort_by`.
    pub results: Vec<ScoredResult>,
    pub selection: Selection,
}

/// Load the configured CSV and run the full pipeline.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let dataset = crate::io::ingest::load_csv(&config.input)?;
    Ok(run_fit_with_dataset(config, &dataset)?)
}

/// Run the pipeline against an already loaded dataset.
pub fn run_fit_with_dataset(config: &RunConfig, dataset: &Dataset) -> Result<RunOutput, FitError> {
    let response = resolve_response(dataset, config.response.as_deref())?;

    // Fail fast on the response before anything else.
    let stats = dataset.stats(&response)?;

    let candidates = resolve_candidates(dataset, &response, config.candidates.as_deref(), &config.exclude)?;

    let count = combination_count(candidates.len(), config.combo_size)?;
    if count > config.max_combinations {
        return Err(FitError::invalid(format!(
            "C({}, {}) = {count} combinations exceeds the limit of {}.",
            candidates.len(),
            config.combo_size,
            config.max_combinations
        )));
    }
    if config.threads == Some(0) {
        return Err(FitError::invalid("Thread count must be > 0."));
    }

    let combinations = generate(&candidates, config.combo_size)?;
    log::info!(
        "response `{response}`, {} candidates, {} combinations of size {}",
        candidates.len(),
        combinations.len(),
        config.combo_size
    );

    let options = EvalOptions {
        threads: config.threads,
    };
    let results = evaluate_all(dataset, &response, &combinations, &options)?;

    let selection = select(&results).ok_or_else(|| FitError::invalid("No combinations were evaluated."))?;
    let results = rank(results, config.sort_by);

    Ok(RunOutput {
        stats,
        response,
        candidates,
        combinations,
        results,
        selection,
    })
}

/// Resolve the response column: explicit name, or the last column.
pub fn resolve_response(dataset: &Dataset, response: Option<&str>) -> Result<String, FitError> {
    match response {
        Some(name) => Ok(dataset.canonical_name(name)?.to_string()),
        None => dataset
            .columns()
            .last()
            .cloned()
            .ok_or_else(|| FitError::invalid("Dataset has no columns.")),
    }
}

/// Resolve the candidate pool.
///
/// - explicit list: every name must exist, appear once and differ from the response
/// - default: every column except the response and the excluded identifier columns
pub fn resolve_candidates(
    dataset: &Dataset,
    response: &str,
    candidates: Option<&[String]>,
    exclude: &[String],
) -> Result<Vec<String>, FitError> {
    let response_idx = dataset.column_index(response)?;

    let pool: Vec<String> = match candidates {
        Some(names) => {
            let mut pool = Vec::with_capacity(names.len());
            for name in names {
                let idx = dataset.column_index(name)?;
                if idx == response_idx {
                    return Err(FitError::invalid(format!(
                        "Response column `{}` cannot be a candidate variable.",
                        dataset.columns()[idx]
                    )));
                }
                let canonical = dataset.columns()[idx].clone();
                if pool.contains(&canonical) {
                    return Err(FitError::invalid(format!("Candidate `{canonical}` is listed twice.")));
                }
                pool.push(canonical);
            }
            pool
        }
        None => {
            let excluded: Vec<usize> = exclude
                .iter()
                .filter_map(|name| dataset.column_index(name).ok())
                .collect();
            dataset
                .columns()
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != response_idx && !excluded.contains(idx))
                .map(|(_, name)| name.clone())
                .collect()
        }
    };

    if pool.is_empty() {
        return Err(FitError::invalid("Candidate pool is empty."));
    }
    Ok(pool)
}
