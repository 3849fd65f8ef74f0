use super::{fast_sigmoid, stable_sigmoid, Backend};
use ndarray::{Array1, Array2, Axis};

/// Backend built on `ndarray` arrays.
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f64>);

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        match Array2::from_shape_vec((rows, cols), data) {
            Ok(a) => NdarrayTensor2D(a),
            Err(e) => panic!("Inconsistent shape ({rows}, {cols}): {e}"),
        }
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a * b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t * *s
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t + *s
    }

    fn ln_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.mapv(f64::ln)
    }

    fn sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.mapv(stable_sigmoid)
    }

    fn fast_sigmoid_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.mapv(fast_sigmoid)
    }

    fn threshold_1d(t: &Self::Tensor1D, threshold: f64) -> Self::Tensor1D {
        t.mapv(|p| if p > threshold { 1.0 } else { 0.0 })
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum() / t.len() as f64
    }

    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.dot(b)
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.0.ncols(), x.len(), "matvec: A.cols != x.len");
        a.0.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.0.nrows(), x.len(), "matvec_transposed: A.rows != x.len");
        a.0.t().dot(x)
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.sum_axis(Axis(0)) / t.0.nrows() as f64
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        let means = Self::col_mean_2d(t);
        let centered = &t.0 - &means;
        let divisor = t.0.nrows().saturating_sub(ddof) as f64;
        centered
            .mapv(|d| d * d)
            .sum_axis(Axis(0))
            .mapv(|s| (s / divisor).sqrt())
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.0.ncols(), v.len(), "Broadcast vector must match column count");
        NdarrayTensor2D(&t.0 - v)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.0.ncols(), v.len(), "Broadcast vector must match column count");
        NdarrayTensor2D(&t.0 / v)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.0.ncols(), v.len(), "Broadcast vector must match column count");
        NdarrayTensor2D(&t.0 * v)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.0.ncols(), v.len(), "Broadcast vector must match column count");
        NdarrayTensor2D(&t.0 + v)
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.select(Axis(0), rows))
    }

    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D {
        t.select(Axis(0), indices)
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn both(data: Vec<f64>) -> (NdarrayTensor2D, super::super::CpuTensor2D) {
        (
            NdarrayBackend::from_vec_2d(data.clone(), 3, 2),
            CpuBackend::from_vec_2d(data, 3, 2),
        )
    }

    #[test]
    fn test_matches_cpu_backend() {
        let (nd, cpu) = both(vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0]);
        let w = vec![0.5, -1.0];
        let r = vec![1.0, 2.0, 3.0];

        assert_eq!(
            NdarrayBackend::matvec(&nd, &Array1::from_vec(w.clone())).to_vec(),
            CpuBackend::matvec(&cpu, &w)
        );
        assert_eq!(
            NdarrayBackend::matvec_transposed(&nd, &Array1::from_vec(r.clone())).to_vec(),
            CpuBackend::matvec_transposed(&cpu, &r)
        );

        let nd_std = NdarrayBackend::col_std_2d(&nd, 0).to_vec();
        let cpu_std = CpuBackend::col_std_2d(&cpu, 0);
        for (a, b) in nd_std.iter().zip(cpu_std.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_select_rows() {
        let (nd, _) = both(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let picked = NdarrayBackend::select_rows_2d(&nd, &[2, 0]);
        assert_eq!(NdarrayBackend::to_vec_2d(&picked), vec![5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn test_broadcast_rows() {
        let (nd, _) = both(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let out = NdarrayBackend::broadcast_sub_1d_to_2d_rows(&nd, &Array1::from_vec(vec![1.0, 2.0]));
        assert_eq!(NdarrayBackend::to_vec_2d(&out), vec![0.0, 0.0, 2.0, 2.0, 4.0, 4.0]);
    }
}
