//! Classification metrics.

use crate::backend::{Backend, Tensor1D};

/// Fraction of positions where `y_pred` equals `y_true`.
///
/// NaN when both are empty.
///
/// # Panics
/// If the lengths differ.
///
/// ```
/// use logistic_trainer::backend::{CpuBackend, Tensor1D};
/// use logistic_trainer::metrics::accuracy;
///
/// let y_true = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0, 1.0, 1.0]);
/// let y_pred = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0, 0.0, 1.0]);
/// assert_eq!(accuracy(&y_true, &y_pred), 0.75);
/// ```
pub fn accuracy<B: Backend>(y_true: &Tensor1D<B>, y_pred: &Tensor1D<B>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "accuracy: length mismatch");
    let truth = y_true.to_vec();
    let matches = truth
        .iter()
        .zip(y_pred.to_vec())
        .filter(|(t, p)| **t == *p)
        .count();
    matches as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    type T = Tensor1D<CpuBackend>;

    #[test]
    fn test_accuracy_bounds() {
        let y = T::new(vec![0.0, 1.0, 1.0]);
        assert_eq!(accuracy(&y, &y), 1.0);
        assert_eq!(accuracy(&y, &T::new(vec![1.0, 0.0, 0.0])), 0.0);
    }

    #[test]
    fn test_accuracy_empty_is_nan() {
        assert!(accuracy(&T::zeros(0), &T::zeros(0)).is_nan());
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_accuracy_length_mismatch() {
        accuracy(&T::zeros(2), &T::zeros(3));
    }
}
