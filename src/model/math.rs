//! Logistic-regression math as pure functions of `(X, y, w, b)`.
//!
//! These are the building blocks the trainer composes through
//! [`BinaryCrossEntropy`], [`L2`] and [`LogisticRegression`]; they are
//! exposed directly for evaluation and for checking gradients.
//!
//! All functions panic on shape mismatches (`w.len() != X.cols()` or
//! `y.len() != X.rows()`).

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::loss::{BinaryCrossEntropy, Loss};
use crate::model::{LinearParams, LogisticRegression, TrainableModel};
use crate::regularizers::{Regularizer, L2};

fn model<B: Backend>(w: &Tensor1D<B>, b: f64) -> LogisticRegression<B> {
    LogisticRegression::from_params(LinearParams {
        weights: w.clone(),
        bias: Scalar::new(b),
    })
}

/// Element-wise logistic function, clamped to `[1e-15, 1 - 1e-15]`.
pub fn sigmoid<B: Backend>(z: &Tensor1D<B>) -> Tensor1D<B> {
    z.sigmoid()
}

/// `p̂ = σ(X·w + b)`, one probability per row.
pub fn forward<B: Backend>(x: &Tensor2D<B>, w: &Tensor1D<B>, b: f64) -> Tensor1D<B> {
    model(w, b).forward(x)
}

/// Like [`forward`] with the division-only sigmoid `0.5·(z/(1+|z|) + 1)`.
pub fn fast_forward<B: Backend>(x: &Tensor2D<B>, w: &Tensor1D<B>, b: f64) -> Tensor1D<B> {
    x.dot(w).add_scalar(&Scalar::new(b)).fast_sigmoid()
}

/// Mean binary cross-entropy of `forward(X, w, b)` against `y`.
pub fn bce_loss<B: Backend>(x: &Tensor2D<B>, y: &Tensor1D<B>, w: &Tensor1D<B>, b: f64) -> f64 {
    let p = forward(x, w, b);
    Loss::<B>::loss(&BinaryCrossEntropy::default(), &p, y).to_f64()
}

/// `(dw, db)` of [`bce_loss`]: `dw = Xᵀ(p̂ - y)/N`, `db = Σ(p̂ - y)/N`.
pub fn bce_gradient<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    w: &Tensor1D<B>,
    b: f64,
) -> (Tensor1D<B>, f64) {
    let m = model(w, b);
    let p = m.forward(x);
    let g = Loss::<B>::grad_wrt_score(&BinaryCrossEntropy::default(), &p, y);
    let grads = m.backward(x, &g);
    (grads.weights, grads.bias.to_f64())
}

/// `bce_loss + λ‖w‖²`.
pub fn penalized_bce_loss<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    w: &Tensor1D<B>,
    b: f64,
    lambda: f64,
) -> f64 {
    let (penalty, _) = L2::new(lambda).regularizer_penalty_grad(&model(w, b));
    bce_loss(x, y, w, b) + penalty.to_f64()
}

/// Gradient of [`penalized_bce_loss`]: `(dw + 2λw, db)`.
pub fn penalized_bce_gradient<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    w: &Tensor1D<B>,
    b: f64,
    lambda: f64,
) -> (Tensor1D<B>, f64) {
    let (dw, db) = bce_gradient(x, y, w, b);
    let (_, reg) = L2::new(lambda).regularizer_penalty_grad(&model(w, b));
    (dw.add(&reg.weights), db)
}

/// Thresholds probabilities at 0.5: strictly greater is class `1`.
pub fn classify<B: Backend>(p: &Tensor1D<B>) -> Tensor1D<B> {
    p.threshold(0.5)
}
