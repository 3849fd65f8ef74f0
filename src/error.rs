//! Crate-level error type.

use crate::preprocessing::PreprocessingError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between loading a table and exporting a model.
///
/// Configuration and input errors are raised before the first training
/// iteration. [`Error::Divergence`] is the only error raised mid-training.
#[derive(Debug, Error)]
pub enum Error {
    /// Table validation, label encoding, splitting or scaling failed.
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),

    /// A hyperparameter is outside its valid range.
    #[error("Invalid configuration: `{parameter}` {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    /// Feature matrix and label vector cannot be trained on.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A label is not one of the binary codes `0` or `1`.
    #[error("Labels must be 0 or 1, found {value} at row {row}")]
    InvalidLabel { row: usize, value: f64 },

    /// The fold count does not fit the number of samples.
    #[error("Cannot split {n} samples into {k} folds (need 2 <= k <= n)")]
    InvalidFolds { n: usize, k: usize },

    /// The loss or the parameters became NaN or infinite.
    #[error("Training diverged at iteration {iteration} (last finite loss: {last_finite_loss:?})")]
    Divergence {
        iteration: usize,
        last_finite_loss: Option<f64>,
    },

    /// An exported parameter block could not be parsed.
    #[error("Malformed parameter export: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    pub(crate) fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_parameter() {
        let err = Error::config("alpha", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: `alpha` must be positive, got 0"
        );
    }

    #[test]
    fn test_preprocessing_error_is_transparent() {
        let err: Error = PreprocessingError::MissingLabel("label".into()).into();
        assert_eq!(err.to_string(), "Label column `label` not found");
    }

    #[test]
    fn test_divergence_reports_iteration() {
        let err = Error::Divergence {
            iteration: 7,
            last_finite_loss: Some(3.5),
        };
        let msg = err.to_string();
        assert!(msg.contains("iteration 7"));
        assert!(msg.contains("3.5"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: Error = serde_json::from_str::<Vec<f64>>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
