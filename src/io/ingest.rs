//! CSV ingest.
//!
//! Turns a comma-separated file into a [`Dataset`]:
//!
//! - first record is the header; the last column is the default response
//! - **strict width**: every record must have as many fields as the header
//! - fields are trimmed; numeric parsing happens in `Dataset` (eagerly, once)
//!
//! No fitting logic here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data::Dataset;
use crate::error::{AppError, FitError};

/// Load a CSV file from disk.
pub fn load_csv(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let dataset = read_csv(file).map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;

    log::info!(
        "loaded {} rows x {} columns from {}",
        dataset.n_rows(),
        dataset.n_cols(),
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV text from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, FitError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FitError::invalid(format!("Failed to read CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(FitError::invalid("CSV header is empty."));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_record_error(idx + 1, headers.len(), e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(FitError::invalid("CSV contains a header but no data rows."));
    }

    Dataset::new(headers, rows)
}

fn csv_record_error(row: usize, width: usize, err: csv::Error) -> FitError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { len, .. } => FitError::DataFormat {
            row,
            column: "*".to_string(),
            value: format!("expected {width} fields, found {len}"),
        },
        _ => FitError::DataFormat {
            row,
            column: "*".to_string(),
            value: format!("unreadable record ({err})"),
        },
    }
}
