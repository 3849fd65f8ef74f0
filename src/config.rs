//! Run configuration, loadable from JSON.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "train_size": 0.8, "train": { "alpha": 0.1, "patience": 20 } }
//! ```

use crate::backend::{Backend, CpuBackend};
use crate::error::{Error, Result};
use crate::export::DEFAULT_PREFIX;
use crate::model::LogisticRegression;
use crate::regularizers::L2;
use crate::trainer::{
    Trainer, DEFAULT_LEARNING_RATE, DEFAULT_MIN_DELTA, DEFAULT_PENALIZED_MAX_ITERS,
};
use crate::validation::{CrossValidationConfig, DEFAULT_FOLDS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyperparameters of training, cross-validation and the λ search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub max_iters: usize,
    pub alpha: f64,
    pub loss_freq: usize,
    pub patience: Option<usize>,
    pub min_delta: f64,
    pub lambda: f64,
    pub k: usize,
    pub init_seed: u64,
    /// Candidates `0, 10^-depth, …, 1` for the search.
    pub search_depth: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_PENALIZED_MAX_ITERS,
            alpha: DEFAULT_LEARNING_RATE,
            loss_freq: 0,
            patience: None,
            min_delta: DEFAULT_MIN_DELTA,
            lambda: 0.0,
            k: DEFAULT_FOLDS,
            init_seed: 0,
            search_depth: 10,
        }
    }
}

impl TrainConfig {
    /// Checks the trainer hyperparameters the way [`Trainer::fit`] would,
    /// plus the fold count.
    pub fn validate(&self) -> Result<()> {
        self.trainer::<CpuBackend>(self.lambda).validate()?;
        if self.k < 2 {
            return Err(Error::config("k", format!("must be at least 2, got {}", self.k)));
        }
        Ok(())
    }

    /// An L2 trainer with these hyperparameters and strength `lambda`.
    pub fn trainer<B: Backend>(&self, lambda: f64) -> Trainer<B, L2>
    where
        L2: crate::regularizers::Regularizer<B, LogisticRegression<B>>,
    {
        Trainer::builder(L2::new(lambda))
            .max_iters(self.max_iters)
            .learning_rate(self.alpha)
            .loss_freq(self.loss_freq)
            .patience(self.patience)
            .min_delta(self.min_delta)
            .init_seed(self.init_seed)
            .build()
    }

    pub fn cross_validation(&self) -> CrossValidationConfig {
        CrossValidationConfig {
            max_iters: self.max_iters,
            alpha: self.alpha,
            loss_freq: self.loss_freq,
            k: self.k,
            patience: self.patience,
            min_delta: self.min_delta,
            init_seed: self.init_seed,
        }
    }
}

/// Everything a run of the binary needs besides the CSV path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the label column.
    pub label: String,
    /// Columns to load; empty loads all of them.
    pub columns: Vec<String>,
    pub train_size: f64,
    /// Shuffle seed; `None` shuffles from entropy.
    pub seed: Option<u64>,
    /// Name prefix of the exported constants.
    pub prefix: String,
    pub train: TrainConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "label".to_string(),
            columns: Vec::new(),
            train_size: 0.7,
            seed: Some(12),
            prefix: DEFAULT_PREFIX.to_string(),
            train: TrainConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every field, naming the first offending one.
    pub fn validate(&self) -> Result<()> {
        if self.label.is_empty() {
            return Err(Error::config("label", "must not be empty"));
        }
        if !self.columns.is_empty() && !self.columns.contains(&self.label) {
            return Err(Error::config(
                "columns",
                format!("must include the label column `{}`", self.label),
            ));
        }
        if !(self.train_size > 0.0 && self.train_size <= 1.0) {
            return Err(Error::config(
                "train_size",
                format!("must be in (0, 1], got {}", self.train_size),
            ));
        }
        self.train.validate()
    }
}
