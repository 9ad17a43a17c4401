//! Error types.
//!
//! Core modules (dataset access, fitting, scoring, evaluation) return
//! [`FitError`], a typed taxonomy that callers and tests can match on.
//!
//! The binary boundary uses [`AppError`]: a message plus the process exit code.
//! Every `FitError` converts into an `AppError` with a fixed exit code:
//!
//! - `2`: bad input or configuration (including file I/O)
//! - `3`: a combination could not be scored (singular design, degenerate fit)
//! - `4`: internal contract defect

use thiserror::Error;

/// Failures raised by the model-selection core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Bad combination size, unknown column name, empty candidate pool, ...
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A cell could not be parsed as a finite number where one is required.
    ///
    /// `row` is the 1-based data row (header excluded).
    #[error("Data format error: row {row}, column `{column}`: cannot parse '{value}' as a number")]
    DataFormat {
        row: usize,
        column: String,
        value: String,
    },

    /// The design matrix for a combination has no unique least-squares solution.
    #[error("Singular design matrix for combination {combination}: {reason}")]
    SingularMatrix { combination: String, reason: String },

    /// A prediction received a feature vector of the wrong length.
    #[error("Dimension mismatch: model expects {expected} inputs, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// MSE is zero (or numerically indistinguishable from zero), so AIC/BIC are undefined.
    #[error("Degenerate fit for combination {combination}: MSE={mse:e} makes AIC/BIC undefined")]
    DegenerateFit { combination: String, mse: f64 },
}

impl FitError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Process exit code used when this error aborts a run.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidParameter(_) | FitError::DataFormat { .. } => 2,
            FitError::SingularMatrix { .. } | FitError::DegenerateFit { .. } => 3,
            FitError::DimensionMismatch { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_exit_codes() {
        let cases = [
            (FitError::invalid("k=0"), 2),
            (
                FitError::DataFormat {
                    row: 3,
                    column: "a".to_string(),
                    value: "abc".to_string(),
                },
                2,
            ),
            (
                FitError::SingularMatrix {
                    combination: "[a, b]".to_string(),
                    reason: "rank 1 < 3".to_string(),
                },
                3,
            ),
            (
                FitError::DegenerateFit {
                    combination: "[a]".to_string(),
                    mse: 0.0,
                },
                3,
            ),
            (FitError::DimensionMismatch { expected: 2, actual: 3 }, 4),
        ];

        for (err, code) in cases {
            let app: AppError = err.clone().into();
            assert_eq!(app.exit_code(), code, "{err}");
            assert_eq!(app.message(), err.to_string());
        }
    }

    #[test]
    fn data_format_message_names_column_and_value() {
        let err = FitError::DataFormat {
            row: 7,
            column: "nox".to_string(),
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("`nox`"));
        assert!(msg.contains("'n/a'"));
    }
}
