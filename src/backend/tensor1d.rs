use super::scalar::Scalar;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor: a weight vector, a label vector or a vector of
/// per-row predictions.
///
/// Wraps the backend's native representation and carries the backend as a
/// phantom type, so tensors from different backends cannot be mixed.
///
/// ```compile_fail
/// use logistic_trainer::backend::{CpuBackend, NdarrayBackend, Tensor1D};
///
/// let cpu: Tensor1D<CpuBackend> = Tensor1D::zeros(3);
/// let nd: Tensor1D<NdarrayBackend> = Tensor1D::zeros(3);
/// let _ = cpu.sub(&nd);
/// ```
///
/// # Example
/// ```
/// use logistic_trainer::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// let y = x.scale(&Scalar::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    fn wrap(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a tensor from host values.
    pub fn new(data: Vec<f64>) -> Self {
        Self::wrap(B::from_vec_1d(data))
    }

    /// Creates a tensor of `len` zeros.
    ///
    /// ```
    /// use logistic_trainer::backend::{CpuBackend, Tensor1D};
    ///
    /// let zeros: Tensor1D<CpuBackend> = Tensor1D::zeros(4);
    /// assert_eq!(zeros.to_vec(), vec![0.0; 4]);
    /// ```
    pub fn zeros(len: usize) -> Self {
        Self::wrap(B::zeros_1d(len))
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::wrap(B::add_1d(&self.data, &other.data))
    }

    /// Element-wise `self - other`.
    ///
    /// # Panics
    /// If the lengths differ.
    pub fn sub(&self, other: &Self) -> Self {
        Self::wrap(B::sub_1d(&self.data, &other.data))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::wrap(B::mul_1d(&self.data, &other.data))
    }

    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self::wrap(B::mul_scalar_1d(&self.data, &a.data))
    }

    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self::wrap(B::add_scalar_1d(&self.data, &a.data))
    }

    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Arithmetic mean of all elements. NaN for an empty tensor.
    pub fn mean(&self) -> Scalar<B> {
        Scalar {
            data: B::mean_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Inner product `Σᵢ aᵢ bᵢ`.
    ///
    /// ```
    /// use logistic_trainer::backend::{CpuBackend, Tensor1D};
    ///
    /// let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
    /// let b = Tensor1D::<CpuBackend>::new(vec![4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).to_f64(), 32.0);
    /// ```
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        Scalar {
            data: B::dot_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Squared Euclidean norm `‖self‖²`.
    pub fn squared_norm(&self) -> Scalar<B> {
        self.dot(self)
    }

    /// Element-wise natural logarithm.
    pub fn ln(&self) -> Self {
        Self::wrap(B::ln_1d(&self.data))
    }

    /// Element-wise logistic function, clamped strictly inside `(0, 1)`.
    ///
    /// ```
    /// use logistic_trainer::backend::{CpuBackend, Tensor1D};
    ///
    /// let p = Tensor1D::<CpuBackend>::new(vec![-100.0, 0.0, 100.0]).sigmoid().to_vec();
    /// assert!(p[0] > 0.0 && p[0] < 1e-10);
    /// assert_eq!(p[1], 0.5);
    /// assert!(p[2] < 1.0 && p[2] > 1.0 - 1e-10);
    /// ```
    pub fn sigmoid(&self) -> Self {
        Self::wrap(B::sigmoid_1d(&self.data))
    }

    /// Element-wise division-only sigmoid approximation.
    pub fn fast_sigmoid(&self) -> Self {
        Self::wrap(B::fast_sigmoid_1d(&self.data))
    }

    /// `1.0` where the element is strictly greater than `threshold`, else `0.0`.
    pub fn threshold(&self, threshold: f64) -> Self {
        Self::wrap(B::threshold_1d(&self.data, threshold))
    }

    /// Gathers elements at `indices`, in order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::wrap(B::select_1d(&self.data, indices))
    }

    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.to_vec().iter().all(|v| v.is_finite())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }
}
