use super::{cross_validate, CrossValidationConfig, CrossValidationReport};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// `[0, 10^-depth, 10^-(depth-1), …, 10^0]`.
///
/// ```
/// use logistic_trainer::validation::lambda_candidates;
///
/// assert_eq!(lambda_candidates(2), vec![0.0, 0.01, 0.1, 1.0]);
/// ```
pub fn lambda_candidates(depth: u32) -> Vec<f64> {
    std::iter::once(0.0)
        .chain((0..=depth).rev().map(|i| 1.0 / 10f64.powi(i as i32)))
        .collect()
}

/// Outcome of a regularization-strength sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_lambda: f64,
    pub best_accuracy: f64,
    /// One report per candidate, in candidate order.
    pub scores: Vec<CrossValidationReport>,
}

/// Cross-validates every candidate of [`lambda_candidates`] with the default
/// hyperparameters (1001 iterations, `α = 0.5`, 5 folds).
pub fn find_regularization_param<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    depth: u32,
) -> Result<SearchResult> {
    find_regularization_param_with(x, y, depth, &CrossValidationConfig::default())
}

/// Like [`find_regularization_param`] with explicit hyperparameters.
///
/// Ties on mean accuracy go to the larger `λ`.
pub fn find_regularization_param_with<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    depth: u32,
    config: &CrossValidationConfig,
) -> Result<SearchResult> {
    let mut scores = Vec::new();
    let mut best: Option<(f64, f64)> = None;

    for lambda in lambda_candidates(depth) {
        let report = cross_validate(x, y, lambda, config)?;
        debug!(lambda, mean_accuracy = report.mean_accuracy, "candidate scored");
        let better = match best {
            None => true,
            Some((best_lambda, best_accuracy)) => {
                report.mean_accuracy > best_accuracy
                    || (report.mean_accuracy == best_accuracy && lambda > best_lambda)
            }
        };
        if better {
            best = Some((lambda, report.mean_accuracy));
        }
        scores.push(report);
    }

    // lambda_candidates always yields at least `0.0`
    let (best_lambda, best_accuracy) = best.unwrap_or((0.0, f64::NAN));
    info!(best_lambda, best_accuracy, "regularization search done");
    Ok(SearchResult {
        best_lambda,
        best_accuracy,
        scores,
    })
}
