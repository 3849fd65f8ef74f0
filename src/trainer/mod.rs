//! Full-batch gradient-descent training.
//!
//! [`Trainer`] is assembled with [`Trainer::builder`] and owns the loss,
//! the optimizer and the penalty. Each call to [`Trainer::fit`] starts from a
//! freshly seeded model and returns the fitted model together with its
//! [`TrainingLog`]; nothing is shared between calls.

mod early_stopping;
mod log;

pub use early_stopping::EarlyStopping;
pub use log::{TrainingLog, TrainingRecord};

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::{Error, Result};
use crate::loss::{BinaryCrossEntropy, Loss};
use crate::metrics::accuracy;
use crate::model::{Fitted, LogisticModel, LogisticRegression, ParamOps, TrainableModel};
use crate::optimizer::{Optimizer, SGD};
use crate::regularizers::{NoRegularizer, Regularizer, L2};
use std::marker::PhantomData;
use tracing::{info, warn};

/// Iterations used by [`train_logistic_regression`].
pub const DEFAULT_MAX_ITERS: usize = 101;
/// Iterations used by [`train_penalized_logistic_regression`] and the search.
pub const DEFAULT_PENALIZED_MAX_ITERS: usize = 1001;
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
pub const DEFAULT_MIN_DELTA: f64 = 1e-5;

/// Configured training loop. Immutable once built.
#[derive(Clone, Debug)]
pub struct Trainer<B, R>
where
    B: Backend,
    R: Regularizer<B, LogisticRegression<B>>,
{
    pub(crate) max_iters: usize,
    pub(crate) learning_rate: f64,
    pub(crate) loss_freq: usize,
    pub(crate) patience: Option<usize>,
    pub(crate) min_delta: f64,
    pub(crate) init_seed: u64,
    pub(crate) snapshot_params: bool,
    pub(crate) loss_fn: BinaryCrossEntropy,
    pub(crate) regularizer: R,
    _phantom_backend: PhantomData<B>,
}

pub struct TrainerBuilder<B, R>
where
    B: Backend,
    R: Regularizer<B, LogisticRegression<B>>,
{
    max_iters: usize,
    learning_rate: f64,
    loss_freq: usize,
    patience: Option<usize>,
    min_delta: f64,
    init_seed: u64,
    snapshot_params: bool,
    regularizer: R,
    _phantom_backend: PhantomData<B>,
}

impl<B, R> TrainerBuilder<B, R>
where
    B: Backend,
    R: Regularizer<B, LogisticRegression<B>>,
{
    pub fn new(regularizer: R) -> Self {
        Self {
            max_iters: DEFAULT_PENALIZED_MAX_ITERS,
            learning_rate: DEFAULT_LEARNING_RATE,
            loss_freq: 0,
            patience: None,
            min_delta: DEFAULT_MIN_DELTA,
            init_seed: 0,
            snapshot_params: false,
            regularizer,
            _phantom_backend: PhantomData,
        }
    }

    pub fn max_iters(mut self, iters: usize) -> Self {
        self.max_iters = iters;
        self
    }

    /// Step size `α` of `θ ← θ - α·∇L`.
    pub fn learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    /// Report progress every `freq` iterations; `0` disables reporting.
    pub fn loss_freq(mut self, freq: usize) -> Self {
        self.loss_freq = freq;
        self
    }

    /// Stop after this many consecutive non-improving iterations.
    pub fn patience(mut self, patience: Option<usize>) -> Self {
        self.patience = patience;
        self
    }

    pub fn min_delta(mut self, min_delta: f64) -> Self {
        self.min_delta = min_delta;
        self
    }

    pub fn init_seed(mut self, seed: u64) -> Self {
        self.init_seed = seed;
        self
    }

    /// Record the weights and bias after every iteration.
    pub fn snapshot_params(mut self, enabled: bool) -> Self {
        self.snapshot_params = enabled;
        self
    }

    pub fn build(self) -> Trainer<B, R> {
        Trainer {
            max_iters: self.max_iters,
            learning_rate: self.learning_rate,
            loss_freq: self.loss_freq,
            patience: self.patience,
            min_delta: self.min_delta,
            init_seed: self.init_seed,
            snapshot_params: self.snapshot_params,
            loss_fn: BinaryCrossEntropy::default(),
            regularizer: self.regularizer,
            _phantom_backend: PhantomData,
        }
    }
}

/// Result of one training run.
#[derive(Clone, Debug)]
pub struct TrainingOutcome<B: Backend> {
    pub model: LogisticModel<B, Fitted>,
    pub log: TrainingLog,
    /// Iteration at which early stopping fired, if it did.
    pub stopped_at: Option<usize>,
}

impl<B, R> Trainer<B, R>
where
    B: Backend,
    R: Regularizer<B, LogisticRegression<B>>,
{
    pub fn builder(regularizer: R) -> TrainerBuilder<B, R> {
        TrainerBuilder::new(regularizer)
    }

    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn regularizer(&self) -> &R {
        &self.regularizer
    }

    /// Checks every hyperparameter, naming the first offending one.
    pub fn validate(&self) -> Result<()> {
        if self.max_iters == 0 {
            return Err(Error::config("max_iters", "must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::config(
                "alpha",
                format!("must be finite and positive, got {}", self.learning_rate),
            ));
        }
        if !(self.min_delta >= 0.0 && self.min_delta.is_finite()) {
            return Err(Error::config(
                "min_delta",
                format!("must be finite and non-negative, got {}", self.min_delta),
            ));
        }
        if self.patience == Some(0) {
            return Err(Error::config("patience", "must be at least 1 when set"));
        }
        self.regularizer.validate()
    }

    /// Trains a fresh model on `(x, y)`.
    ///
    /// The loss in each [`TrainingRecord`] is measured before the update,
    /// the accuracy after it. With early stopping the returned model holds
    /// the parameters at which the best loss was measured.
    pub fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<TrainingOutcome<B>> {
        self.validate()?;
        check_inputs(x, y)?;

        let optimizer = SGD::<B>::new(self.learning_rate);
        let mut model = LogisticRegression::<B>::new(x.cols(), self.init_seed);
        let mut log = TrainingLog::new();
        let mut early_stopping = self
            .patience
            .map(|patience| EarlyStopping::new(patience, self.min_delta));
        let mut last_finite_loss = None;
        let mut stopped_at = None;

        let mut probabilities = model.forward(x);
        for iteration in 0..self.max_iters {
            let (penalty, reg_grad) = self.regularizer.regularizer_penalty_grad(&model);
            let loss = (Loss::<B>::loss(&self.loss_fn, &probabilities, y) + penalty).to_f64();
            if !loss.is_finite() {
                warn!(iteration, "loss is no longer finite");
                return Err(Error::Divergence {
                    iteration,
                    last_finite_loss,
                });
            }

            let grad_score = Loss::<B>::grad_wrt_score(&self.loss_fn, &probabilities, y);
            let grads = model.backward(x, &grad_score).add(&reg_grad);
            let new_params = optimizer.step(model.params(), &grads);
            if !new_params.is_finite() {
                warn!(iteration, loss, "parameters are no longer finite");
                return Err(Error::Divergence {
                    iteration,
                    last_finite_loss: Some(loss),
                });
            }

            let measured = early_stopping.as_ref().map(|_| model.params().clone());
            model.update_params(&new_params);
            probabilities = model.forward(x);

            log.push(TrainingRecord {
                iteration,
                loss,
                accuracy: accuracy(y, &probabilities.threshold(0.5)),
                weights: self.snapshot_params.then(|| new_params.weights.to_vec()),
                bias: self.snapshot_params.then(|| new_params.bias.to_f64()),
            });
            last_finite_loss = Some(loss);

            if self.loss_freq > 0 && iteration % self.loss_freq == 0 {
                info!("Loss at iter {}: {}", iteration, loss);
            }

            if let (Some(es), Some(measured)) = (early_stopping.as_mut(), measured) {
                if es.observe(iteration, loss, measured) {
                    stopped_at = Some(iteration);
                    break;
                }
            }
        }

        if let (Some(iteration), Some(es)) = (stopped_at, early_stopping) {
            warn!(
                iteration,
                best_iteration = ?es.best_iteration(),
                best_loss = ?es.best_loss(),
                "early stopping"
            );
            if let Some(best) = es.into_best() {
                model.update_params(&best);
            }
        }

        if self.loss_freq > 0 {
            if let Some(last) = log.last() {
                info!("Final loss: {}", last.loss);
            }
        }

        Ok(TrainingOutcome {
            model: model.into_fitted(),
            log,
            stopped_at,
        })
    }
}

fn check_inputs<B: Backend>(x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<()> {
    if x.rows() == 0 {
        return Err(Error::InvalidInput("feature matrix has no rows".into()));
    }
    if x.rows() != y.len() {
        return Err(Error::InvalidInput(format!(
            "feature matrix has {} rows but there are {} labels",
            x.rows(),
            y.len()
        )));
    }
    if let Some(pos) = x.to_vec().iter().position(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "non-finite feature value at row {}, column {}",
            pos / x.cols(),
            pos % x.cols()
        )));
    }
    if let Some((row, value)) = y
        .to_vec()
        .into_iter()
        .enumerate()
        .find(|(_, v)| *v != 0.0 && *v != 1.0)
    {
        return Err(Error::InvalidLabel { row, value });
    }
    Ok(())
}

/// Unpenalized logistic regression with per-iteration weight snapshots.
pub fn train_logistic_regression<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    max_iters: usize,
    alpha: f64,
    loss_freq: usize,
) -> Result<TrainingOutcome<B>> {
    Trainer::builder(NoRegularizer)
        .max_iters(max_iters)
        .learning_rate(alpha)
        .loss_freq(loss_freq)
        .snapshot_params(true)
        .build()
        .fit(x, y)
}

/// L2-penalized logistic regression, loss `BCE + λ‖w‖²`.
pub fn train_penalized_logistic_regression<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    lambda: f64,
    max_iters: usize,
    alpha: f64,
    loss_freq: usize,
) -> Result<TrainingOutcome<B>> {
    Trainer::builder(L2::new(lambda))
        .max_iters(max_iters)
        .learning_rate(alpha)
        .loss_freq(loss_freq)
        .build()
        .fit(x, y)
}
