use crate::backend::{Backend, Scalar, Tensor1D};
use crate::error::{Error, Result};
use crate::model::{LinearParams, LogisticRegression, TrainableModel};

/// A penalty added to the data loss, together with its parameter gradient.
pub trait Regularizer<B: Backend, M: TrainableModel<B>> {
    fn regularizer_penalty_grad(&self, model: &M) -> (Scalar<B>, M::Gradients);

    /// Checks hyperparameters before training starts.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Ridge penalty `λ‖w‖²` on the weights; the bias is not penalized.
///
/// Gradient: `2λw` for the weights, `0` for the bias.
#[derive(Clone, Copy, Debug)]
pub struct L2 {
    pub lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl<B: Backend> Regularizer<B, LogisticRegression<B>> for L2 {
    fn regularizer_penalty_grad(
        &self,
        model: &LogisticRegression<B>,
    ) -> (Scalar<B>, LinearParams<B>) {
        let weights = &model.params().weights;
        let lambda = Scalar::<B>::new(self.lambda);
        let penalty = lambda * weights.squared_norm();
        let grad = LinearParams {
            weights: weights.scale(&Scalar::new(2.0 * self.lambda)),
            bias: Scalar::zero(),
        };
        (penalty, grad)
    }

    fn validate(&self) -> Result<()> {
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(Error::config(
                "lambda",
                format!("must be finite and non-negative, got {}", self.lambda),
            ));
        }
        Ok(())
    }
}

/// No penalty: plain logistic regression.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegularizer;

impl<B: Backend> Regularizer<B, LogisticRegression<B>> for NoRegularizer {
    fn regularizer_penalty_grad(
        &self,
        model: &LogisticRegression<B>,
    ) -> (Scalar<B>, LinearParams<B>) {
        let grad = LinearParams {
            weights: Tensor1D::zeros(model.params().n_features()),
            bias: Scalar::zero(),
        };
        (Scalar::zero(), grad)
    }
}
