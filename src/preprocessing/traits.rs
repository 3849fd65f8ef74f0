//! The two states of a preprocessing step.
//!
//! A [`Transformer`] holds configuration and learns statistics from the
//! training split; the [`FittedTransformer`] it produces applies those
//! statistics to any split and can be persisted.

use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;
use std::path::Path;

/// A preprocessing step before it has seen data.
pub trait Transformer<B: Backend>: Clone {
    type Input;
    type Output;
    /// Plain-data record of what `fit` learns.
    type Params: SerializableParams;
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learns statistics from `data`, normally the training split.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// A preprocessing step with learned statistics.
///
/// `from_params(extract_params())` yields an equivalent step.
pub trait FittedTransformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;

    /// # Errors
    /// [`PreprocessingError::FeatureMismatch`] when `data` has a different
    /// feature count than the fitted data.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError>;

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    fn n_features_in(&self) -> usize;

    /// Writes the learned statistics as `bincode`.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self.extract_params().to_bytes().map_err(serialization_error)?;
        Ok(std::fs::write(path, bytes)?)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let params = Self::Params::from_bytes(&std::fs::read(path)?).map_err(serialization_error)?;
        Self::from_params(params)
    }
}

fn serialization_error(err: impl std::fmt::Display) -> PreprocessingError {
    PreprocessingError::SerializationError(err.to_string())
}
