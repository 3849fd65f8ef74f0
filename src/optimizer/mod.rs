use crate::backend::{Backend, Scalar};
use crate::model::LinearParams;

/// Gradient-based parameter update.
///
/// The trainer owns the loop; the optimizer only maps `(params, gradients)`
/// to new parameters and never mutates its inputs.
///
/// # Example
/// ```rust
/// use logistic_trainer::backend::{CpuBackend, Scalar, Tensor1D};
/// use logistic_trainer::model::LinearParams;
/// use logistic_trainer::optimizer::{Optimizer, SGD};
///
/// let params = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]),
///     bias: Scalar::new(0.5),
/// };
/// let grads = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![0.5, -1.0]),
///     bias: Scalar::new(1.0),
/// };
/// let updated = SGD::<CpuBackend>::new(0.5).step(&params, &grads);
/// assert_eq!(updated.weights.to_vec(), vec![0.75, 2.5]);
/// assert_eq!(updated.bias.to_f64(), 0.0);
/// ```
pub trait Optimizer<B: Backend, P> {
    /// `params_new = params - learning_rate * gradients`
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain gradient descent: `θ ← θ - α·∇L(θ)`.
///
/// Used full-batch, so every step sees the whole training matrix.
#[derive(Clone, Copy, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend> Optimizer<B, LinearParams<B>> for SGD<B> {
    fn step(&self, params: &LinearParams<B>, grads: &LinearParams<B>) -> LinearParams<B> {
        LinearParams {
            weights: params.weights.add(&grads.weights.scale(&-self.lr)),
            bias: params.bias - grads.bias * self.lr,
        }
    }
}
