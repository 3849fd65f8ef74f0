//! Standard Scaler (z-score normalization).
//!
//! ```text
//! z = (x - mean) / std
//! ```
//! `mean` and `std` are per-feature statistics of the training split, with
//! the population standard deviation (ddof = 0). The same statistics are
//! applied verbatim to every other split and exported alongside the model.
//!
//! # Example
//! ```
//! use logistic_trainer::backend::{CpuBackend, Tensor2D};
//! use logistic_trainer::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let train = Tensor2D::<CpuBackend>::new(vec![0.0, 10.0, 2.0, 30.0], 2, 2);
//! let fitted = StandardScaler::<CpuBackend>::new().fit(&train)?;
//! assert_eq!(fitted.mean().to_vec(), vec![1.0, 20.0]);
//! assert_eq!(fitted.transform(&train)?.to_vec(), vec![-1.0, -1.0, 1.0, 1.0]);
//! # Ok::<(), logistic_trainer::preprocessing::PreprocessingError>(())
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Index of the first feature whose `std` is too small to divide by.
///
/// A constant column can come out of `col_std` with a rounding residue
/// instead of an exact zero, so the threshold is relative to the mean.
pub(crate) fn degenerate_feature(mean: &[f64], std: &[f64]) -> Option<usize> {
    mean.iter()
        .zip(std)
        .position(|(&m, &s)| !s.is_finite() || s <= f64::EPSILON * m.abs().max(1.0))
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler<B: Backend> {
    feature_names: Option<Vec<String>>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    pub fn new() -> Self {
        Self {
            feature_names: None,
            _backend: PhantomData,
        }
    }

    /// Names used when reporting a zero-variance feature. Without them the
    /// feature is reported as `x{index}`.
    pub fn with_feature_names(mut self, names: &[String]) -> Self {
        self.feature_names = Some(names.to_vec());
        self
    }

    fn feature_name(&self, index: usize) -> String {
        self.feature_names
            .as_ref()
            .and_then(|names| names.get(index).cloned())
            .unwrap_or_else(|| format!("x{index}"))
    }
}

impl<B: Backend> Transformer<B> for StandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler<B>;

    /// # Errors
    /// - [`PreprocessingError::EmptyData`] on a matrix without rows.
    /// - [`PreprocessingError::ZeroVariance`] for the first constant column,
    ///   which would otherwise divide by zero.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = data.col_mean();
        let std = data.col_std(0);

        if let Some(index) = degenerate_feature(&mean.to_vec(), &std.to_vec()) {
            return Err(PreprocessingError::ZeroVariance {
                index,
                name: self.feature_name(index),
            });
        }

        Ok(FittedStandardScaler { mean, std })
    }
}

/// Fitted StandardScaler: the normalization statistics of a training split.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler<B: Backend> {
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
}

impl<B: Backend> FittedStandardScaler<B> {
    /// Per-feature mean of the training split.
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    /// Per-feature population standard deviation of the training split.
    pub fn std(&self) -> &Tensor1D<B> {
        &self.std
    }

    fn check_features(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl<B: Backend> FittedTransformer<B> for FittedStandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_features(data.cols())?;
        Ok(data.broadcast_sub(&self.mean).broadcast_div(&self.std))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_features(data.cols())?;
        Ok(data.broadcast_mul(&self.std).broadcast_add(&self.mean))
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.std.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.mean.len(),
                got_features: params.std.len(),
            });
        }
        if let Some(index) = degenerate_feature(&params.mean, &params.std) {
            return Err(PreprocessingError::ZeroVariance {
                index,
                name: format!("x{index}"),
            });
        }
        Ok(Self {
            mean: Tensor1D::new(params.mean),
            std: Tensor1D::new(params.std),
        })
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }
}
