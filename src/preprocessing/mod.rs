//! Data preprocessing: from a labeled [`Table`] to numeric train/test splits.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Pipeline
//!
//! 1. [`preprocess_data`] validates the table, encodes the label column with
//!    a [`LabelEncoder`] fitted on the full column, shuffles rows with an
//!    explicit seed and splits them into train and test matrices.
//! 2. [`StandardScaler`] learns per-feature mean and std on the training
//!    split; the fitted scaler normalizes every split with those statistics.
//!
//! # Example
//!
//! ```
//! use logistic_trainer::backend::CpuBackend;
//! use logistic_trainer::dataset::Table;
//! use logistic_trainer::preprocessing::{preprocess_data, FittedTransformer};
//!
//! let table = Table::new()
//!     .with_column("red", vec![10.0, 12.0, 30.0, 33.0, 11.0])?
//!     .with_column("label", vec!["leaf", "leaf", "ripe", "ripe", "leaf"])?;
//!
//! let data = preprocess_data::<CpuBackend>(&table, "label", 0.6, Some(12))?;
//! assert_eq!(data.x_train.shape(), (3, 1));
//! assert_eq!(data.x_test.shape(), (2, 1));
//! assert_eq!(data.feature_names, vec!["red".to_string()]);
//! assert_eq!(data.label_map.label(1), Some("ripe"));
//!
//! let scaler = data.fit_scaler()?;
//! let x_test = scaler.transform(&data.x_test)?;
//! assert_eq!(x_test.shape(), (2, 1));
//! # Ok::<(), logistic_trainer::preprocessing::PreprocessingError>(())
//! ```

pub mod encoding;
pub mod error;
pub mod scaling;
pub mod traits;

pub use encoding::{LabelEncoder, LabelMap, LabelMapParams};
pub use error::PreprocessingError;
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{Column, Table};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Train/test matrices produced by [`preprocess_data`].
#[derive(Clone, Debug)]
pub struct PreparedData<B: Backend> {
    pub x_train: Tensor2D<B>,
    /// Class codes of the training rows, as `0.0` / `1.0`.
    pub y_train: Tensor1D<B>,
    pub x_test: Tensor2D<B>,
    pub y_test: Tensor1D<B>,
    /// Feature columns in matrix column order.
    pub feature_names: Vec<String>,
    /// Built from the full label column, before splitting.
    pub label_map: LabelMap,
    /// Original table row of each training row.
    pub train_rows: Vec<usize>,
    /// Original table row of each test row.
    pub test_rows: Vec<usize>,
}

impl<B: Backend> PreparedData<B> {
    /// Fits a [`StandardScaler`] on the training split.
    ///
    /// # Errors
    /// [`PreprocessingError::ZeroVariance`] naming the first constant
    /// training feature.
    pub fn fit_scaler(&self) -> Result<FittedStandardScaler<B>, PreprocessingError> {
        StandardScaler::new()
            .with_feature_names(&self.feature_names)
            .fit(&self.x_train)
    }

    /// Integer class codes of the training rows.
    pub fn train_codes(&self) -> Vec<usize> {
        self.y_train.to_vec().iter().map(|&c| c as usize).collect()
    }

    /// Integer class codes of the test rows.
    pub fn test_codes(&self) -> Vec<usize> {
        self.y_test.to_vec().iter().map(|&c| c as usize).collect()
    }
}

/// Turns a labeled table into shuffled, split numeric matrices.
///
/// Every column other than `label` is a feature, in table order. Rows are
/// shuffled with `seed` (`None` draws a seed from the OS), then the first
/// `floor(N * train_size)` rows form the training split.
///
/// # Errors
/// - [`PreprocessingError::EmptyData`]: no rows, no feature columns, or an
///   empty training split.
/// - [`PreprocessingError::MissingLabel`]: `label` is not a column.
/// - [`PreprocessingError::NonNumericFeature`]: a feature column holds text.
/// - [`PreprocessingError::NonFinite`]: a feature holds NaN or infinity.
/// - [`PreprocessingError::InvalidParameter`]: `train_size` outside `(0, 1]`.
/// - [`PreprocessingError::NotBinary`]: more than two label classes.
pub fn preprocess_data<B: Backend>(
    table: &Table,
    label: &str,
    train_size: f64,
    seed: Option<u64>,
) -> Result<PreparedData<B>, PreprocessingError> {
    if table.is_empty() {
        return Err(PreprocessingError::EmptyData(
            "Table has no rows".to_string(),
        ));
    }
    let label_column = table
        .column(label)
        .ok_or_else(|| PreprocessingError::MissingLabel(label.to_string()))?;
    if !(train_size > 0.0 && train_size <= 1.0) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "train_size must be in (0, 1], got {train_size}"
        )));
    }

    let mut feature_names = Vec::new();
    let mut features = Vec::new();
    for (name, column) in table.iter().filter(|(name, _)| *name != label) {
        match column {
            Column::Numeric(values) => {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(PreprocessingError::NonFinite(format!(
                        "feature `{name}` contains NaN or infinite values"
                    )));
                }
                feature_names.push(name.to_string());
                features.push(values);
            }
            Column::Categorical(_) => {
                return Err(PreprocessingError::NonNumericFeature(name.to_string()))
            }
        }
    }
    if features.is_empty() {
        return Err(PreprocessingError::EmptyData(
            "Table has no feature columns".to_string(),
        ));
    }

    let (label_map, codes) = LabelEncoder::new().fit_transform(label_column)?;
    if label_map.n_classes() > 2 {
        return Err(PreprocessingError::NotBinary {
            found: label_map.n_classes(),
            classes: label_map.classes().to_vec(),
        });
    }

    let n = table.n_rows();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    order.shuffle(&mut rng);

    let n_train = (n as f64 * train_size).floor() as usize;
    if n_train == 0 {
        return Err(PreprocessingError::EmptyData(format!(
            "Training split is empty ({n} rows, train_size {train_size})"
        )));
    }
    let (train_rows, test_rows) = order.split_at(n_train);

    debug!(
        rows = n,
        features = feature_names.len(),
        train = train_rows.len(),
        test = test_rows.len(),
        "prepared data"
    );

    let gather = |rows: &[usize]| -> (Tensor2D<B>, Tensor1D<B>) {
        let mut data = Vec::with_capacity(rows.len() * features.len());
        for &r in rows {
            data.extend(features.iter().map(|col| col[r]));
        }
        let y = rows.iter().map(|&r| codes[r] as f64).collect();
        (
            Tensor2D::new(data, rows.len(), features.len()),
            Tensor1D::new(y),
        )
    };
    let (x_train, y_train) = gather(train_rows);
    let (x_test, y_test) = gather(test_rows);

    Ok(PreparedData {
        x_train,
        y_train,
        x_test,
        y_test,
        feature_names,
        label_map,
        train_rows: train_rows.to_vec(),
        test_rows: test_rows.to_vec(),
    })
}

/// `(x - mean) / std`, column by column.
///
/// # Errors
/// [`PreprocessingError::FeatureMismatch`] when `mean` or `std` do not match
/// the column count, [`PreprocessingError::ZeroVariance`] on a `std` that is
/// zero up to rounding.
pub fn normalize<B: Backend>(
    x: &Tensor2D<B>,
    mean: &Tensor1D<B>,
    std: &Tensor1D<B>,
) -> Result<Tensor2D<B>, PreprocessingError> {
    for stat in [mean, std] {
        if stat.len() != x.cols() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: x.cols(),
                got_features: stat.len(),
            });
        }
    }
    let degenerate = scaling::standard::degenerate_feature(&mean.to_vec(), &std.to_vec());
    if let Some(index) = degenerate {
        return Err(PreprocessingError::ZeroVariance {
            index,
            name: format!("x{index}"),
        });
    }
    Ok(x.broadcast_sub(mean).broadcast_div(std))
}
