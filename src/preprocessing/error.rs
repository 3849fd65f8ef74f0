//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for table validation, label encoding, splitting and scaling.
///
/// All of these are raised before any training starts.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The requested label column is not part of the table.
    #[error("Label column `{0}` not found")]
    MissingLabel(String),

    /// A requested column is not part of the table.
    #[error("Column `{0}` not found")]
    MissingColumn(String),

    /// A feature column holds text instead of numbers.
    #[error("Feature column `{0}` is not numeric")]
    NonNumericFeature(String),

    /// The label column has more than two distinct values.
    #[error("Label column must have at most 2 classes, found {found}: {classes:?}")]
    NotBinary { found: usize, classes: Vec<String> },

    /// Columns of a table differ in length.
    #[error("Column `{name}` has {got} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A feature has zero standard deviation on the training split.
    #[error("Feature `{name}` (column {index}) has zero variance on the training split")]
    ZeroVariance { index: usize, name: String },

    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// A label seen at transform time was not seen during fit.
    #[error("Unknown label `{0}`")]
    UnknownLabel(String),

    /// Data contains NaN or infinite values.
    #[error("Non-finite values: {0}")]
    NonFinite(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_zero_variance_names_feature() {
        let err = PreprocessingError::ZeroVariance {
            index: 2,
            name: "blue".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("blue"));
        assert!(msg.contains("zero variance"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[test]
    fn test_error_display_not_binary() {
        let err = PreprocessingError::NotBinary {
            found: 3,
            classes: vec!["a".into(), "b".into(), "c".into()],
        };
        assert!(err.to_string().contains("at most 2 classes"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }
}
