use super::{fast_sigmoid, stable_sigmoid, Backend};

/// Pure-Rust CPU backend with no external dependencies.
///
/// Tensors are plain `Vec<f64>` (1D) and a row-major [`CpuTensor2D`].
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major 2D tensor: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.0[i * self.2..(i + 1) * self.2]
    }

    fn map_rows(&self, v: &[f64], op: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.2, "Broadcast vector must match column count");
        let data = self
            .0
            .chunks(self.2.max(1))
            .flat_map(|row| row.iter().zip(v).map(|(&x, &c)| op(x, c)).collect::<Vec<_>>())
            .collect();
        CpuTensor2D::new(data, self.1, self.2)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }
    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Element-wise ops ---
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }
    fn ln_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.iter().map(|&v| v.ln()).collect()
    }
    fn sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.iter().map(|&z| stable_sigmoid(z)).collect()
    }
    fn fast_sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.iter().map(|&z| fast_sigmoid(z)).collect()
    }
    fn threshold_1d(t: &Self::Tensor1D, threshold: f64) -> Self::Tensor1D {
        t.iter()
            .map(|&p| if p > threshold { 1.0 } else { 0.0 })
            .collect()
    }

    // --- Reductions ---
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }
    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
    }

    // --- Linear algebra ---
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.2, x.len(), "matvec: A.cols != x.len");
        (0..a.1)
            .map(|i| a.row(i).iter().zip(x.iter()).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.1, x.len(), "matvec_transposed: A.rows != x.len");
        let mut out = vec![0.0; a.2];
        for (i, &xi) in x.iter().enumerate() {
            for (acc, &aij) in out.iter_mut().zip(a.row(i)) {
                *acc += aij * xi;
            }
        }
        out
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    // --- Column-wise operations ---
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let (rows, cols) = (t.1, t.2);
        let mut sums = vec![0.0; cols];
        for i in 0..rows {
            for (s, &v) in sums.iter_mut().zip(t.row(i)) {
                *s += v;
            }
        }
        sums.into_iter().map(|s| s / rows as f64).collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        let (rows, cols) = (t.1, t.2);
        let means = Self::col_mean_2d(t);
        let mut var_sums = vec![0.0; cols];
        for i in 0..rows {
            for ((acc, &v), &m) in var_sums.iter_mut().zip(t.row(i)).zip(means.iter()) {
                let diff = v - m;
                *acc += diff * diff;
            }
        }
        let divisor = rows.saturating_sub(ddof) as f64;
        var_sums.into_iter().map(|s| (s / divisor).sqrt()).collect()
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, c| x - c)
    }
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, c| x / c)
    }
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, c| x * c)
    }
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, c| x + c)
    }

    // --- Indexing ---
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        let mut data = Vec::with_capacity(rows.len() * t.2);
        for &i in rows {
            assert!(i < t.1, "Row index {} out of bounds ({} rows)", i, t.1);
            data.extend_from_slice(t.row(i));
        }
        CpuTensor2D::new(data, rows.len(), t.2)
    }

    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D {
        indices.iter().map(|&i| t[i]).collect()
    }

    // --- Access ---
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }
    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CpuTensor2D {
        // [[1, 2],
        //  [3, 4],
        //  [5, 6]]
        CpuTensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2)
    }

    #[test]
    fn test_matvec() {
        let y = CpuBackend::matvec(&matrix(), &vec![1.0, -1.0]);
        assert_eq!(y, vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_matvec_transposed() {
        let y = CpuBackend::matvec_transposed(&matrix(), &vec![1.0, 0.0, 1.0]);
        assert_eq!(y, vec![6.0, 8.0]);
    }

    #[test]
    #[should_panic(expected = "matvec")]
    fn test_matvec_shape_mismatch_panics() {
        CpuBackend::matvec(&matrix(), &vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_col_mean_and_population_std() {
        let t = matrix();
        assert_eq!(CpuBackend::col_mean_2d(&t), vec![3.0, 4.0]);
        let std = CpuBackend::col_std_2d(&t, 0);
        let expected = (8.0f64 / 3.0).sqrt();
        assert!((std[0] - expected).abs() < 1e-12);
        assert!((std[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_broadcast_sub_then_div() {
        let centered = CpuBackend::broadcast_sub_1d_to_2d_rows(&matrix(), &vec![1.0, 2.0]);
        let scaled = CpuBackend::broadcast_div_1d_to_2d_rows(&centered, &vec![2.0, 4.0]);
        assert_eq!(scaled.0, vec![0.0, 0.0, 1.0, 0.5, 2.0, 1.0]);
    }

    #[test]
    fn test_select_rows_preserves_order() {
        let picked = CpuBackend::select_rows_2d(&matrix(), &[2, 0]);
        assert_eq!(picked, CpuTensor2D::new(vec![5.0, 6.0, 1.0, 2.0], 2, 2));
    }

    #[test]
    fn test_select_rows_empty() {
        let picked = CpuBackend::select_rows_2d(&matrix(), &[]);
        assert_eq!(CpuBackend::shape(&picked), (0, 2));
    }

    #[test]
    fn test_threshold_is_strict() {
        let out = CpuBackend::threshold_1d(&vec![0.5, 0.5000001, 0.2, 0.9], 0.5);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 1.0]);
    }
}
