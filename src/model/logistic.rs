use crate::backend::{stable_sigmoid, Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::Result;
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use crate::serialization::SerializableParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and bias of a linear score `z = X·w + b`.
#[derive(Clone, Debug)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

impl<B: Backend> LinearParams<B> {
    /// Weights drawn from `N(0, 1)` with a seeded generator, bias `0`.
    ///
    /// The same `(n_features, seed)` always yields the same parameters.
    pub fn init(n_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..n_features)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        Self {
            weights: Tensor1D::new(weights),
            bias: Scalar::new(0.0),
        }
    }

    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: Tensor1D::zeros(n_features),
            bias: Scalar::new(0.0),
        }
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// `true` when neither the weights nor the bias hold NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.weights.is_finite() && self.bias.is_finite()
    }
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }
}

/// Plain-data form of [`LinearParams`], independent of the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias.to_f64(),
        }
    }
}

impl<B: Backend> From<SerializableLinearParams> for LinearParams<B> {
    fn from(value: SerializableLinearParams) -> Self {
        Self {
            weights: Tensor1D::new(value.weights),
            bias: Scalar::new(value.bias),
        }
    }
}

/// Binary logistic regression `p̂ = σ(X·w + b)`.
///
/// The state parameter `S` is [`Unfitted`] while training and [`Fitted`]
/// afterwards; only fitted models predict.
#[derive(Clone, Debug)]
pub struct LogisticModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

/// A logistic model ready to be trained.
pub type LogisticRegression<B> = LogisticModel<B, Unfitted>;

impl<B: Backend> LogisticModel<B, Unfitted> {
    /// Seeded `N(0, 1)` weights and zero bias; see [`LinearParams::init`].
    pub fn new(n_features: usize, seed: u64) -> Self {
        Self::from_params(LinearParams::init(n_features, seed))
    }

    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl<B: Backend, S> LogisticModel<B, S> {
    fn score(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    pub fn weights(&self) -> &Tensor1D<B> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias.to_f64()
    }
}

impl<B: Backend> TrainableModel<B> for LogisticModel<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor1D<B>;
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Output = LogisticModel<B, Fitted>;

    /// Probabilities `σ(X·w + b)`.
    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        self.score(x).sigmoid()
    }

    /// `dw = Xᵀ g`, `db = Σ g`.
    fn backward(&self, x: &Self::Input, grad_score: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_score),
            bias: grad_score.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LogisticModel<B, Fitted> {
        LogisticModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> LogisticModel<B, Fitted> {
    /// Wraps already-trained parameters.
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams<B> {
        &self.params
    }

    /// Class codes: `1.0` where `p̂ > 0.5`, else `0.0`.
    pub fn classify(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        self.predict_batch(x).threshold(0.5)
    }

    /// Probabilities computed with the division-only [`fast_sigmoid`].
    ///
    /// [`fast_sigmoid`]: crate::backend::fast_sigmoid
    pub fn fast_predict_batch(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        self.score(x).fast_sigmoid()
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_params(SerializableLinearParams::from_bytes(&bytes)?)
    }
}

impl<B: Backend> InferenceModel<B> for LogisticModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = f64;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    /// Probability of class `1` for a single feature vector.
    fn predict(&self, input: &Self::InputSingle) -> f64 {
        stable_sigmoid((self.params.weights.dot(input) + self.params.bias).to_f64())
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        self.score(input).sigmoid()
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        Ok(Self::new(params.into()))
    }
}
