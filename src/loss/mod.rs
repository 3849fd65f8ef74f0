use crate::backend::{Backend, Scalar, Tensor1D};

/// A differentiable loss over model probabilities.
///
/// Implementors define:
/// - the scalar loss value, used for logging and early stopping;
/// - the gradient of the loss with respect to the model's linear score `z`,
///   which is passed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// `∂L/∂z` for each row, where the prediction is `σ(z)`.
    fn grad_wrt_score(&self, prediction: &Self::Prediction, target: &Self::Target)
        -> Self::Prediction;
}

/// Mean binary cross-entropy over probabilities `p̂`:
///
/// ```text
/// L = -(1/N) Σ [ y·ln(p̂ + ε) + (1 - y)·ln(1 - p̂ + ε) ]
/// ```
///
/// With `p̂ = σ(z)` the gradient with respect to the score collapses to
/// `∂L/∂z = (p̂ - y) / N`.
#[derive(Clone, Copy, Debug)]
pub struct BinaryCrossEntropy {
    /// Added inside both logarithms.
    pub epsilon: f64,
}

impl BinaryCrossEntropy {
    pub const DEFAULT_EPSILON: f64 = 1e-9;

    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for BinaryCrossEntropy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPSILON)
    }
}

impl<B: Backend> Loss<B> for BinaryCrossEntropy {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, p: &Self::Prediction, y: &Self::Target) -> Scalar<B> {
        let eps = Scalar::<B>::new(self.epsilon);
        let minus_one = Scalar::<B>::new(-1.0);
        let one_plus_eps = Scalar::<B>::new(1.0 + self.epsilon);

        let log_p = p.add_scalar(&eps).ln();
        let log_not_p = p.scale(&minus_one).add_scalar(&one_plus_eps).ln();
        let not_y = y.scale(&minus_one).add_scalar(&Scalar::new(1.0));

        let log_likelihood = y.mul(&log_p).add(&not_y.mul(&log_not_p)).mean();
        // ε can push a log argument just above 1 for confident correct rows;
        // only that negative residue is clamped, NaN passes through
        let loss = -log_likelihood.to_f64();
        Scalar::new(if loss < 0.0 { 0.0 } else { loss })
    }

    fn grad_wrt_score(&self, p: &Self::Prediction, y: &Self::Target) -> Self::Prediction {
        let n = Scalar::<B>::new(1.0 / p.len() as f64);
        p.sub(y).scale(&n)
    }
}
