//! In-memory tabular dataset.
//!
//! A `Dataset` is built once per run and then shared read-only (by reference)
//! across all fitting workers. It keeps:
//!
//! - the header (display names) and a precomputed, case-insensitive name→index table
//! - the raw cell text, row-major, for error messages and reporting
//! - eagerly parsed `f64` values, column-major, so the fitting hot loop is a slice read
//!
//! Cells that do not parse as finite numbers are stored as `NaN` and remembered
//! per column. They only become a `DataFormat` error when the column is actually
//! requested as numeric, so identifier/text columns are harmless unless used.

use std::collections::HashMap;

use crate::domain::DatasetStats;
use crate::error::FitError;

#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    raw: Vec<Vec<String>>,
    values: Vec<Vec<f64>>,
    /// First unparseable row (0-based) per column.
    first_bad: Vec<Option<usize>>,
}

/// Borrowed view of one observation.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    idx: usize,
}

impl Dataset {
    /// Build a dataset from a header and row-major raw cells.
    ///
    /// Every row must have exactly as many cells as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, FitError> {
        if columns.is_empty() {
            return Err(FitError::invalid("Dataset has no columns."));
        }

        let columns: Vec<String> = columns
            .iter()
            .map(|c| c.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(FitError::invalid(format!("Column {} has an empty name.", idx + 1)));
            }
            if index.insert(normalize_name(name), idx).is_some() {
                return Err(FitError::invalid(format!("Duplicate column name `{name}`.")));
            }
        }

        let width = columns.len();
        let mut values = vec![Vec::with_capacity(rows.len()); width];
        let mut first_bad = vec![None; width];

        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(FitError::DataFormat {
                    row: r + 1,
                    column: "*".to_string(),
                    value: format!("expected {width} fields, found {}", row.len()),
                });
            }
            for (c, cell) in row.iter().enumerate() {
                let v = parse_cell(cell);
                if v.is_none() && first_bad[c].is_none() {
                    first_bad[c] = Some(r);
                }
                values[c].push(v.unwrap_or(f64::NAN));
            }
        }

        Ok(Self {
            columns,
            index,
            raw: rows,
            values,
            first_bad,
        })
    }

    /// Build a dataset from named numeric columns of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, FitError> {
        let n = columns.first().map_or(0, |(_, v)| v.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut rows = vec![Vec::with_capacity(columns.len()); n];

        for (name, values) in columns {
            let name = name.into();
            if values.len() != n {
                return Err(FitError::invalid(format!(
                    "Column `{name}` has {} values, expected {n}.",
                    values.len()
                )));
            }
            for (row, v) in rows.iter_mut().zip(values) {
                // `Display` for f64 round-trips exactly.
                row.push(v.to_string());
            }
            names.push(name);
        }

        Self::new(names, rows)
    }

    pub fn n_rows(&self) -> usize {
        self.raw.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names as they appear in the header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Look up a column by name, ignoring ASCII case and surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Result<usize, FitError> {
        self.index
            .get(&normalize_name(name))
            .copied()
            .ok_or_else(|| FitError::invalid(format!("Unknown column `{}`.", name.trim())))
    }

    /// Canonical (header) spelling of a column name.
    pub fn canonical_name(&self, name: &str) -> Result<&str, FitError> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    /// Parsed values of a column, failing if any row is not a finite number.
    pub fn numeric_column(&self, idx: usize) -> Result<&[f64], FitError> {
        let Some(values) = self.values.get(idx) else {
            return Err(FitError::invalid(format!("Column index {idx} is out of range.")));
        };
        if let Some(r) = self.first_bad[idx] {
            return Err(FitError::DataFormat {
                row: r + 1,
                column: self.columns[idx].clone(),
                value: self.raw[r][idx].clone(),
            });
        }
        Ok(values)
    }

    /// Parsed values of a column looked up by name.
    pub fn numeric(&self, name: &str) -> Result<&[f64], FitError> {
        self.numeric_column(self.column_index(name)?)
    }

    /// Raw cell text of one row, in header order.
    pub fn raw_row(&self, idx: usize) -> Option<&[String]> {
        self.raw.get(idx).map(Vec::as_slice)
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        (idx < self.n_rows()).then_some(Row { dataset: self, idx })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.n_rows()).map(move |idx| Row { dataset: self, idx })
    }

    /// Summary of the response column (the run's "data exploration" block).
    pub fn stats(&self, response: &str) -> Result<DatasetStats, FitError> {
        let y = self.numeric(response)?;
        if y.is_empty() {
            return Err(FitError::invalid("Dataset has no rows."));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in y {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        Ok(DatasetStats {
            n_rows: y.len(),
            columns: self.columns.clone(),
            response: self.canonical_name(response)?.to_string(),
            response_mean: sum / y.len() as f64,
            response_min: min,
            response_max: max,
        })
    }
}

impl<'a> Row<'a> {
    /// 1-based row number (header excluded).
    pub fn number(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self, name: &str) -> Option<&'a str> {
        let col = self.dataset.column_index(name).ok()?;
        Some(self.dataset.raw[self.idx][col].as_str())
    }

    pub fn value(&self, name: &str) -> Result<f64, FitError> {
        let col = self.dataset.column_index(name)?;
        let v = self.dataset.values[col][self.idx];
        if v.is_finite() {
            Ok(v)
        } else {
            Err(FitError::DataFormat {
                row: self.number(),
                column: self.dataset.columns[col].clone(),
                value: self.dataset.raw[self.idx][col].clone(),
            })
        }
    }
}

/// Normalize a column name for lookup.
///
/// Spreadsheet exports often prefix the first header with a UTF-8 BOM; it is
/// stripped along with surrounding whitespace before lower-casing.
pub fn normalize_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn parse_cell(cell: &str) -> Option<f64> {
    let v = cell.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}
