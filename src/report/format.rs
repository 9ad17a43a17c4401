//! Formatted terminal output.
//!
//! We keep formatting code in one place so the fitting code stays clean and
//! output changes are localized.

use crate::domain::{Criterion, DatasetStats, ScoredResult};
use crate::fit::selection::Selection;

/// Dataset exploration block plus the search-space size.
pub fn format_run_summary(stats: &DatasetStats, candidates: &[String], combo_size: usize, n_combinations: usize) -> String {
    let mut out = String::new();

    out.push_str("=== subset - exhaustive subset OLS ===\n");
    out.push_str(&format!("Columns: {}\n", stats.columns.join(", ")));
    out.push_str(&format!("Rows: {}\n", stats.n_rows));
    out.push_str(&format!(
        "Response: {} | mean={:.4} | range=[{:.4}, {:.4}]\n",
        stats.response, stats.response_mean, stats.response_min, stats.response_max
    ));
    out.push_str(&format!("Candidates ({}): {}\n", candidates.len(), candidates.join(", ")));
    out.push_str(&format!("Combination size: {combo_size} | combinations: {n_combinations}\n"));

    out
}

/// One block per result, in the given order.
pub fn format_results(results: &[ScoredResult]) -> String {
    let mut out = String::new();
    for r in results {
        out.push_str(&format!("\nCombination: {}\n", r.variables()));
        out.push_str(&format!("Formula: {}\n", r.formula));
        out.push_str(&format!("MSE: {:.6}\n", r.scores.mse));
        out.push_str(&format!("AIC: {:.6}\n", r.scores.aic));
        out.push_str(&format!("BIC: {:.6}\n", r.scores.bic));
    }
    out
}

/// Compact ranked table (rank, variables, MSE, AIC, BIC).
pub fn format_ranking(results: &[ScoredResult], criterion: Criterion) -> String {
    let mut out = String::new();
    out.push_str(&format!("Ranked by {}:\n", criterion.display_name()));

    out.push_str(
        format!(
            "{:>5} {:<40} {:>14} {:>14} {:>14}",
            "rank", "variables", "mse", "aic", "bic"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:->5} {:-<40} {:->14} {:->14} {:->14}", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for (i, r) in results.iter().enumerate() {
        out.push_str(
            format!(
                "{:>5} {:<40} {:>14.6} {:>14.4} {:>14.4}",
                i + 1,
                truncate(&r.variables().to_string(), 40),
                r.scores.mse,
                r.scores.aic,
                r.scores.bic
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Best combination under each criterion.
pub fn format_selection(selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str("\nBest models:\n");
    for (label, r, value) in [
        ("AIC", &selection.best_aic, selection.best_aic.scores.aic),
        ("BIC", &selection.best_bic, selection.best_bic.scores.bic),
        ("MSE", &selection.best_mse, selection.best_mse.scores.mse),
    ] {
        out.push_str(&format!(
            "- by {label}: {} ({label}={value:.4})\n  {}\n",
            r.variables(),
            r.formula
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FittedModel, Scores};
    use crate::fit::selection::select;

    fn result(index: usize, names: &[&str], aic: f64, bic: f64) -> ScoredResult {
        ScoredResult {
            index,
            model: FittedModel::new(names.iter().copied().collect(), vec![1.0; names.len() + 1]).unwrap(),
            formula: format!("y = formula{index}"),
            scores: Scores {
                mse: 2.5,
                aic,
                bic,
                n: 20,
                k: names.len() + 1,
            },
        }
    }

    #[test]
    fn summary_lists_columns_and_search_space() {
        let stats = DatasetStats {
            n_rows: 20,
            columns: vec!["id".into(), "y".into(), "a".into(), "b".into()],
            response: "y".into(),
            response_mean: 3.5,
            response_min: 1.0,
            response_max: 6.0,
        };
        let out = format_run_summary(&stats, &["a".into(), "b".into()], 1, 2);
        assert!(out.contains("Columns: id, y, a, b"));
        assert!(out.contains("Response: y | mean=3.5000"));
        assert!(out.contains("Candidates (2): a, b"));
        assert!(out.contains("combinations: 2"));
    }

    #[test]
    fn result_blocks_contain_all_statistics() {
        let out = format_results(&[result(0, &["a", "b"], 10.0, 11.0)]);
        assert!(out.contains("Combination: [a, b]"));
        assert!(out.contains("Formula: y = formula0"));
        assert!(out.contains("MSE: 2.500000"));
        assert!(out.contains("AIC: 10.000000"));
        assert!(out.contains("BIC: 11.000000"));
    }

    #[test]
    fn ranking_table_has_one_line_per_result() {
        let results = vec![result(0, &["a"], 1.0, 2.0), result(1, &["b"], 3.0, 4.0)];
        let out = format_ranking(&results, Criterion::Aic);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Ranked by AIC:");
        assert!(lines[3].starts_with("    1 [a]"));
        assert!(lines.iter().all(|l| l.len() == l.trim_end().len()));
    }

    #[test]
    fn selection_names_each_criterion() {
        let results = vec![result(0, &["a"], 1.0, 9.0), result(1, &["b"], 3.0, 4.0)];
        let out = format_selection(&select(&results).unwrap());
        assert!(out.contains("- by AIC: [a] (AIC=1.0000)"));
        assert!(out.contains("- by BIC: [b] (BIC=4.0000)"));
    }

    #[test]
    fn truncate_marks_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
