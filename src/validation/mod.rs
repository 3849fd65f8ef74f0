//! K-fold cross-validation and the L2 strength search built on it.
//!
//! Folds are contiguous, unshuffled index blocks: fold `i` validates on
//! `[i·(N/k), (i+1)·(N/k))` and trains on every other index, including the
//! `N mod k` trailing rows that never appear in a validation block.

mod search;

pub use search::{
    find_regularization_param, find_regularization_param_with, lambda_candidates, SearchResult,
};

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::{Error, Result};
use crate::metrics::accuracy;
use crate::regularizers::L2;
use crate::trainer::{Trainer, DEFAULT_LEARNING_RATE, DEFAULT_MIN_DELTA, DEFAULT_PENALIZED_MAX_ITERS};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_FOLDS: usize = 5;

/// One train/validation partition of `0..N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// The `k` folds of `0..N`, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldPlan {
    n: usize,
    folds: Vec<Fold>,
}

impl FoldPlan {
    pub fn n_samples(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fold> {
        self.folds.iter()
    }
}

impl<'a> IntoIterator for &'a FoldPlan {
    type Item = &'a Fold;
    type IntoIter = std::slice::Iter<'a, Fold>;

    fn into_iter(self) -> Self::IntoIter {
        self.folds.iter()
    }
}

/// Splits `0..n` into `k` folds; requires `2 <= k <= n`.
///
/// ```
/// use logistic_trainer::validation::k_fold_indices;
///
/// let plan = k_fold_indices(7, 3).unwrap();
/// assert_eq!(plan.folds()[1].validation, vec![2, 3]);
/// assert_eq!(plan.folds()[1].train, vec![0, 1, 4, 5, 6]);
/// ```
pub fn k_fold_indices(n: usize, k: usize) -> Result<FoldPlan> {
    if k < 2 || k > n {
        return Err(Error::InvalidFolds { n, k });
    }
    let split = n / k;
    let folds = (0..k)
        .map(|i| {
            let (start, end) = (i * split, (i + 1) * split);
            Fold {
                train: (0..start).chain(end..n).collect(),
                validation: (start..end).collect(),
            }
        })
        .collect();
    Ok(FoldPlan { n, folds })
}

/// Hyperparameters shared by every fold of a cross-validation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    pub max_iters: usize,
    pub alpha: f64,
    pub loss_freq: usize,
    pub k: usize,
    pub patience: Option<usize>,
    pub min_delta: f64,
    pub init_seed: u64,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_PENALIZED_MAX_ITERS,
            alpha: DEFAULT_LEARNING_RATE,
            loss_freq: 0,
            k: DEFAULT_FOLDS,
            patience: None,
            min_delta: DEFAULT_MIN_DELTA,
            init_seed: 0,
        }
    }
}

/// Held-out accuracies of one `λ`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub lambda: f64,
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
}

/// Trains one penalized model per fold and scores it on the held-out block.
///
/// Every fold starts from the same seeded initialization; nothing carries
/// over between folds.
pub fn cross_validate<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    lambda: f64,
    config: &CrossValidationConfig,
) -> Result<CrossValidationReport> {
    if x.rows() != y.len() {
        return Err(Error::InvalidInput(format!(
            "feature matrix has {} rows but there are {} labels",
            x.rows(),
            y.len()
        )));
    }
    let plan = k_fold_indices(x.rows(), config.k)?;
    let trainer = Trainer::builder(L2::new(lambda))
        .max_iters(config.max_iters)
        .learning_rate(config.alpha)
        .loss_freq(config.loss_freq)
        .patience(config.patience)
        .min_delta(config.min_delta)
        .init_seed(config.init_seed)
        .build();

    let mut fold_accuracies = Vec::with_capacity(plan.len());
    for (i, fold) in plan.iter().enumerate() {
        let outcome = trainer.fit(&x.select_rows(&fold.train), &y.select(&fold.train))?;
        let predicted = outcome.model.classify(&x.select_rows(&fold.validation));
        let acc = accuracy(&y.select(&fold.validation), &predicted);
        debug!(fold = i, lambda, accuracy = acc, "fold done");
        fold_accuracies.push(acc);
    }

    let mean_accuracy = fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64;
    debug!(lambda, mean_accuracy, "cross-validation done");
    Ok(CrossValidationReport {
        lambda,
        fold_accuracies,
        mean_accuracy,
    })
}

/// Mean held-out accuracy of an L2-penalized model over `k` folds.
pub fn cross_val_penalized_logistic_regression<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    lambda: f64,
    max_iters: usize,
    alpha: f64,
    loss_freq: usize,
    k: usize,
) -> Result<f64> {
    let config = CrossValidationConfig {
        max_iters,
        alpha,
        loss_freq,
        k,
        ..Default::default()
    };
    Ok(cross_validate(x, y, lambda, &config)?.mean_accuracy)
}
