//! # logistic-trainer
//!
//! Binary logistic regression trained by full-batch gradient descent, with
//! k-fold cross-validation and a search over the L2 penalty strength.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models carry their training state in the type
//!   system (`Unfitted` vs `Fitted`); only fitted models predict.
//! - **Explicit State**: weight initialization takes a seed, shuffling takes a
//!   seed, and every training run returns its own [`TrainingLog`] by value.
//! - **Backend Agnosticism**: all numeric code is generic over [`Backend`];
//!   [`CpuBackend`] is pure Rust, `NdarrayBackend` sits behind the `ndarray`
//!   feature.
//!
//! ## Quick Start
//!
//! ```rust
//! use logistic_trainer::backend::{CpuBackend, Tensor1D, Tensor2D};
//! use logistic_trainer::metrics::accuracy;
//! use logistic_trainer::trainer::train_logistic_regression;
//!
//! let x = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0, 3.0], 4, 1);
//! let y = Tensor1D::<CpuBackend>::new(vec![0.0, 0.0, 1.0, 1.0]);
//!
//! let outcome = train_logistic_regression(&x, &y, 1000, 0.5, 0)?;
//! assert_eq!(accuracy(&y, &outcome.model.classify(&x)), 1.0);
//! assert_eq!(outcome.log.len(), 1000);
//! # Ok::<(), logistic_trainer::Error>(())
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions and computation primitives
//! - `dataset`: column tables and CSV loading
//! - `preprocessing`: label encoding, train/test split, standardization
//! - `model`: the logistic model and its math
//! - `loss`, `regularizers`, `optimizer`: the pieces the trainer combines
//! - `trainer`: the gradient-descent loop, early stopping, training logs
//! - `validation`: k-fold cross-validation and the λ search
//! - `export`: parameter blocks for the embedded consumer

pub mod backend;

/// Configuration of a full run, loadable from JSON.
pub mod config;

/// Column tables and CSV loading.
pub mod dataset;

pub mod error;

/// Export of trained parameters and normalization statistics.
pub mod export;

/// Differentiable loss functions for model training.
pub mod loss;

pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Weight regularization strategies.
pub mod regularizers;

/// Model persistence utilities.
pub mod serialization;

/// High-level training loop orchestration.
pub mod trainer;

/// Cross-validation and regularization search.
pub mod validation;

pub use backend::{Backend, CpuBackend, Scalar, ScalarOps, Tensor1D, Tensor2D};
pub use error::{Error, Result};
pub use trainer::{Trainer, TrainingLog, TrainingOutcome};
