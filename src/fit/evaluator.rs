//! Parallel evaluation of the combination search space.
//!
//! Fan-out / fan-in:
//!
//! - one rayon task per combination (fit + score, nothing shared but the
//!   read-only `Dataset`)
//! - each task sends its outcome *by value* into an `mpsc` channel
//! - the rayon scope is the completion barrier; the last `Sender` is dropped only
//!   after the scope returns, so the sink closes after every worker has finished
//!
//! The batch is all-or-nothing. The first failure raises a cancellation flag so
//! tasks that have not started yet skip their work; the reported error is the
//! failure with the lowest combination index among those observed.
//!
//! Concurrency is bounded by rayon's global pool, or by a dedicated pool when
//! `EvalOptions::threads` is set. Output order is completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use crate::data::Dataset;
use crate::domain::{ScoredResult, VariableSet};
use crate::error::FitError;
use crate::fit::fitter::{DesignColumns, fit_columns};
use crate::fit::score::score_columns;
use crate::models::formula;

#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Worker threads; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

enum Outcome {
    Scored(ScoredResult),
    Failed(FitError),
    Skipped,
}

/// Fit and score one combination.
pub fn evaluate_combination(
    dataset: &Dataset,
    response: &str,
    index: usize,
    variables: &VariableSet,
) -> Result<ScoredResult, FitError> {
    let columns = DesignColumns::resolve(dataset, response, variables)?;
    let model = fit_columns(&columns, variables)?;
    let scores = score_columns(&model, &columns)?;
    let formula = formula(&model, dataset.canonical_name(response)?);

    Ok(ScoredResult {
        index,
        model,
        formula,
        scores,
    })
}

/// Evaluate every combination concurrently.
///
/// Returns one result per combination, in no particular order, or the first
/// fatal error.
pub fn evaluate_all(
    dataset: &Dataset,
    response: &str,
    combinations: &[VariableSet],
    options: &EvalOptions,
) -> Result<Vec<ScoredResult>, FitError> {
    // Resolve the response once up front so a bad response column fails before dispatch.
    dataset.numeric(response)?;

    let started = Instant::now();
    let batch = run_batch(combinations, options, |index, variables| {
        evaluate_combination(dataset, response, index, variables)
    })?;

    if let Some((index, err)) = batch.failure {
        if batch.skipped > 0 {
            log::warn!(
                "evaluation aborted: {} combinations were skipped after a failure",
                batch.skipped
            );
        }
        log::debug!("combination #{index} failed: {err}");
        return Err(err);
    }

    debug_assert_eq!(batch.results.len(), combinations.len());
    log::info!(
        "evaluated {} combinations in {:.2?}",
        batch.results.len(),
        started.elapsed()
    );
    Ok(batch.results)
}

/// Everything collected from one fan-out, successful or not.
struct Batch {
    results: Vec<ScoredResult>,
    /// Lowest-index failure observed.
    failure: Option<(usize, FitError)>,
    /// Tasks that saw the cancellation flag and did no work.
    skipped: usize,
}

/// Fan `task` out over every combination and fan the outcomes back in.
fn run_batch<F>(combinations: &[VariableSet], options: &EvalOptions, task: F) -> Result<Batch, FitError>
where
    F: Fn(usize, &VariableSet) -> Result<ScoredResult, FitError> + Sync,
{
    let cancelled = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<(usize, Outcome)>();

    let fan_out = || {
        rayon::scope(|s| {
            for (index, variables) in combinations.iter().enumerate() {
                let tx = tx.clone();
                let cancelled = &cancelled;
                let task = &task;
                s.spawn(move |_| {
                    let outcome = if cancelled.load(Ordering::Acquire) {
                        Outcome::Skipped
                    } else {
                        match task(index, variables) {
                            Ok(result) => Outcome::Scored(result),
                            Err(err) => {
                                cancelled.store(true, Ordering::Release);
                                Outcome::Failed(err)
                            }
                        }
                    };
                    // The receiver outlives the scope, so a send cannot fail here.
                    let _ = tx.send((index, outcome));
                });
            }
        });
    };

    match options.threads {
        Some(threads) => build_pool(threads)?.install(fan_out),
        None => fan_out(),
    }
    drop(tx);

    let mut batch = Batch {
        results: Vec::with_capacity(combinations.len()),
        failure: None,
        skipped: 0,
    };
    for (index, outcome) in rx {
        match outcome {
            Outcome::Scored(result) => batch.results.push(result),
            Outcome::Skipped => batch.skipped += 1,
            Outcome::Failed(err) => {
                if batch.failure.as_ref().is_none_or(|(i, _)| index < *i) {
                    batch.failure = Some((index, err));
                }
            }
        }
    }
    Ok(batch)
}

/// Evaluate every combination on the calling thread, in generator order.
///
/// Same contract as [`evaluate_all`]; used as the reference for the parallel path.
pub fn evaluate_sequential(
    dataset: &Dataset,
    response: &str,
    combinations: &[VariableSet],
) -> Result<Vec<ScoredResult>, FitError> {
    dataset.numeric(response)?;
    combinations
        .iter()
        .enumerate()
        .map(|(index, variables)| evaluate_combination(dataset, response, index, variables))
        .collect()
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool, FitError> {
    if threads == 0 {
        return Err(FitError::invalid("Thread count must be > 0."));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("subset-worker-{i}"))
        .build()
        .map_err(|e| FitError::invalid(format!("Failed to start {threads} worker threads: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use crate::domain::SampleConfig;
    use crate::fit::combinations::generate;
    use std::sync::atomic::AtomicUsize;

    fn sample_dataset() -> Dataset {
        let config = SampleConfig {
            rows: 40,
            features: 5,
            informative: 3,
            noise: 0.5,
            seed: 11,
            ..SampleConfig::default()
        };
        generate_sample(&config).unwrap().dataset
    }

    fn pool() -> Vec<String> {
        (1..=5).map(|j| format!("x{j}")).collect()
    }

    fn sorted(mut results: Vec<ScoredResult>) -> Vec<ScoredResult> {
        results.sort_by_key(|r| r.index);
        results
    }

    #[test]
    fn parallel_matches_sequential() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 3).unwrap();

        let sequential = evaluate_sequential(&ds, "y", &combos).unwrap();
        let parallel = evaluate_all(&ds, "y", &combos, &EvalOptions::default()).unwrap();
        let bounded = evaluate_all(&ds, "y", &combos, &EvalOptions { threads: Some(2) }).unwrap();

        assert_eq!(sequential.len(), 10);
        assert_eq!(sorted(parallel), sequential);
        assert_eq!(sorted(bounded), sequential);
    }

    #[test]
    fn one_result_per_combination() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 2).unwrap();
        let results = sorted(evaluate_all(&ds, "y", &combos, &EvalOptions::default()).unwrap());

        assert_eq!(results.len(), combos.len());
        for (result, combo) in results.iter().zip(&combos) {
            assert_eq!(result.variables(), combo);
            assert_eq!(result.scores.n, 40);
            assert_eq!(result.scores.k, 3);
            assert!(result.formula.starts_with("y = "));
        }
    }

    #[test]
    fn informative_subset_scores_best() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 3).unwrap();
        let results = evaluate_all(&ds, "y", &combos, &EvalOptions::default()).unwrap();

        let best = results
            .iter()
            .min_by(|a, b| a.scores.bic.total_cmp(&b.scores.bic))
            .unwrap();
        assert_eq!(best.variables().names(), &["x1", "x2", "x3"]);
    }

    #[test]
    fn single_failure_aborts_the_batch() {
        // `d` duplicates `a`, so only the {a, d} pair is singular.
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0];
        let c = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let y = vec![1.3, 4.1, 2.2, 7.9, 5.5, 9.6, 4.4, 11.0];
        let ds = Dataset::from_columns(vec![
            ("a", a.clone()),
            ("b", b),
            ("c", c),
            ("d", a),
            ("y", y),
        ])
        .unwrap();
        let combos = generate(&["a", "b", "c", "d"].map(String::from), 2).unwrap();

        let err = evaluate_all(&ds, "y", &combos, &EvalOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::SingularMatrix {
                combination: "[a, d]".to_string(),
                reason: "design matrix rank 2 < 3 columns (collinear variables)".to_string(),
            }
        );
        assert_eq!(evaluate_sequential(&ds, "y", &combos).unwrap_err(), err);
    }

    #[test]
    fn bad_response_fails_before_dispatch() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 1).unwrap();
        assert!(matches!(
            evaluate_all(&ds, "id", &combos, &EvalOptions::default()),
            Err(FitError::DataFormat { row: 1, .. })
        ));
        assert!(matches!(
            evaluate_all(&ds, "nope", &combos, &EvalOptions::default()),
            Err(FitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_threads_is_invalid() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 1).unwrap();
        assert!(matches!(
            evaluate_all(&ds, "y", &combos, &EvalOptions { threads: Some(0) }),
            Err(FitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn failure_cancels_tasks_that_have_not_started() {
        let combos = generate(&pool(), 2).unwrap();
        let calls = AtomicUsize::new(0);

        // One worker runs tasks one after another, so everything after the first
        // failing task sees the cancellation flag.
        let batch = run_batch(&combos, &EvalOptions { threads: Some(1) }, |index, variables| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FitError::SingularMatrix {
                combination: format!("#{index} {variables}"),
                reason: "always fails".to_string(),
            })
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(batch.skipped, combos.len() - 1);
        assert!(batch.results.is_empty());
        assert!(batch.failure.is_some());
    }

    #[test]
    fn every_dispatched_task_is_accounted_for() {
        let ds = sample_dataset();
        let combos = generate(&pool(), 2).unwrap();
        let calls = AtomicUsize::new(0);

        let batch = run_batch(&combos, &EvalOptions { threads: Some(1) }, |index, variables| {
            calls.fetch_add(1, Ordering::SeqCst);
            if index == 4 {
                return Err(FitError::invalid("injected failure"));
            }
            evaluate_combination(&ds, "y", index, variables)
        })
        .unwrap();

        let ran = calls.load(Ordering::SeqCst);
        assert_eq!(ran + batch.skipped, combos.len());
        assert_eq!(batch.results.len() + 1, ran);
        assert!(matches!(batch.failure, Some((4, FitError::InvalidParameter(_)))));
    }

    #[test]
    fn empty_search_space_yields_no_results() {
        let ds = sample_dataset();
        let results = evaluate_all(&ds, "y", &[], &EvalOptions::default()).unwrap();
        assert!(results.is_empty());
    }
}
