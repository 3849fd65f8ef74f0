//! # Backend Abstraction
//!
//! Trait-based abstraction over the numeric engine used by the training
//! pipeline. Every model, loss and preprocessing step is generic over a
//! [`Backend`], so the same code runs on the pure-Rust [`CpuBackend`] or on
//! `ndarray` without change.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | always on | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use logistic_trainer::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.5, 0.5]);
//!
//! let z = x.dot(&w);
//! assert_eq!(z.to_vec(), vec![1.5, 3.5]);
//! ```

pub mod cpu;
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Smallest probability a sigmoid may return; the largest is `1 - PROBABILITY_FLOOR`.
///
/// Keeps `forward` strictly inside `(0, 1)` even when `exp` saturates.
pub const PROBABILITY_FLOOR: f64 = 1e-15;

/// Numerically stable logistic function for a single value.
///
/// ```text
/// σ(z) = 1 / (1 + exp(-z))     if z >= 0
/// σ(z) = exp(z) / (1 + exp(z)) if z < 0
/// ```
///
/// The result is clamped to `[PROBABILITY_FLOOR, 1 - PROBABILITY_FLOOR]`.
/// NaN input propagates as NaN.
pub fn stable_sigmoid(z: f64) -> f64 {
    let s = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    };
    s.clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR)
}

/// Division-only sigmoid approximation: `0.5 * (z / (1 + |z|) + 1)`.
///
/// Monotone, symmetric around `0.5` and free of `exp`, which makes it the
/// variant evaluated on targets without a floating-point math library.
pub fn fast_sigmoid(z: f64) -> f64 {
    0.5 * (z / (1.0 + z.abs()) + 1.0)
}

/// Abstraction over the tensor operations required for logistic regression.
///
/// Implementations provide concrete tensor types and the handful of
/// operations used by preprocessing, the model math and the trainer.
///
/// # Safety Guarantees
///
/// - Shape mismatches in element-wise or matrix-vector operations panic;
///   callers validate shapes before reaching the backend.
/// - Tensor types are `Clone + Send + Sync + Debug` so read-only data can be shared
///   across folds run by an external scheduler.
pub trait Backend: Clone + Copy + std::fmt::Debug + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps + Clone;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync + std::fmt::Debug;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync + std::fmt::Debug;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Element-wise operations (1D) ---

    /// Element-wise addition of two 1D tensors.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise multiplication of two 1D tensors.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Element-wise natural logarithm.
    fn ln_1d(t: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise [`stable_sigmoid`].
    fn sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise [`fast_sigmoid`].
    fn fast_sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D;

    /// Maps each element to `1.0` if it is strictly greater than `threshold`, else `0.0`.
    fn threshold_1d(t: &Self::Tensor1D, threshold: f64) -> Self::Tensor1D;

    // --- Reductions ---

    /// Sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Arithmetic mean of all elements in a 1D tensor.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Inner product of two 1D tensors.
    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar;

    // --- Linear algebra ---

    /// Computes `y = A * x` where `A` is (m × n) and `x` is (n,).
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Computes `y = A^T * x` where `A` is (m × n) and `x` is (m,).
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    // --- Column-wise operations (for preprocessing) ---

    /// Mean of each column.
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Standard deviation of each column.
    ///
    /// `ddof` is the delta degrees of freedom (0 for population std).
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    /// `Result[i, j] = t[i, j] - v[j]`
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] / v[j]`
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] * v[j]`
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] + v[j]`
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Indexing ---

    /// Gathers the given rows, in order, into a new tensor.
    ///
    /// # Panics
    /// If any index is out of bounds.
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D;

    /// Gathers the given elements, in order, into a new tensor.
    ///
    /// # Panics
    /// If any index is out of bounds.
    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D;

    // --- Data access ---

    /// Copies a 1D tensor into host memory.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Copies a 2D tensor into host memory in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_sigmoid_midpoint() {
        assert_eq!(stable_sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_stable_sigmoid_stays_open_interval() {
        for z in [-1e4, -800.0, -40.0, 40.0, 800.0, 1e4] {
            let s = stable_sigmoid(z);
            assert!(s > 0.0 && s < 1.0, "sigmoid({z}) = {s}");
        }
    }

    #[test]
    fn test_stable_sigmoid_symmetry() {
        for z in [0.1, 1.0, 3.5, 10.0] {
            let sum = stable_sigmoid(z) + stable_sigmoid(-z);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fast_sigmoid_matches_shape() {
        assert_eq!(fast_sigmoid(0.0), 0.5);
        assert!(fast_sigmoid(3.0) > 0.5);
        assert!(fast_sigmoid(-3.0) < 0.5);
        assert!(fast_sigmoid(1e9) < 1.0);
        assert!(fast_sigmoid(-1e9) > 0.0);
        assert!(fast_sigmoid(1.0) < fast_sigmoid(2.0));
    }
}
