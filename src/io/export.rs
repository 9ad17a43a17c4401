//! Export ranked results to CSV or JSON.
//!
//! The CSV is meant for spreadsheets and scripts: one row per combination,
//! variables and slope coefficients joined with `;` so each stays one field.
//! The JSON carries the full `ScoredResult` records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::data::Dataset;
use crate::domain::ScoredResult;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    variables: String,
    intercept: f64,
    coefficients: String,
    mse: f64,
    aic: f64,
    bic: f64,
    n: usize,
    formula: &'a str,
}

/// Write results (already in the desired order) to a CSV file.
pub fn write_results_csv(path: &Path, results: &[ScoredResult]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results_csv_to(file, results)
}

pub fn write_results_csv_to<W: Write>(writer: W, results: &[ScoredResult]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, r) in results.iter().enumerate() {
        let row = CsvRow {
            rank: i + 1,
            variables: r.variables().names().join(";"),
            intercept: r.model.intercept(),
            coefficients: r
                .model
                .slopes()
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            mse: r.scores.mse,
            aic: r.scores.aic,
            bic: r.scores.bic,
            n: r.scores.n,
            formula: &r.formula,
        };
        wtr.serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write results to a pretty-printed JSON array.
pub fn write_results_json(path: &Path, results: &[ScoredResult]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, results)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Write a dataset (header + raw cells) as CSV, e.g. a generated sample.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_dataset_csv_to(file, dataset)
}

pub fn write_dataset_csv_to<W: Write>(writer: W, dataset: &Dataset) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.columns())
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for idx in 0..dataset.n_rows() {
        if let Some(row) = dataset.raw_row(idx) {
            wtr.write_record(row)
                .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
        }
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}
