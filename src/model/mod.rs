//! Models and the math they are built from.
//!
//! [`logistic`] holds the type-state [`LogisticModel`]; [`math`] exposes the
//! same computations as plain functions over `(X, w, b)`.

pub mod logistic;
pub mod math;
pub mod state;

pub use logistic::{LinearParams, LogisticModel, LogisticRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

use crate::backend::{Backend, Scalar};

/// A model that can be trained by gradient descent.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss given its gradient with respect to the model's
    /// linear score, one value per row.
    fn backward(&self, input: &Self::Input, grad_score: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic on parameter sets, used to combine data and penalty gradients.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

/// A trained model used for prediction.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> crate::Result<Self>
    where
        Self: Sized;
}
