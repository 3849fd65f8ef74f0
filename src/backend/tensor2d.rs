use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed row-major 2D tensor. Used for feature matrices: one row per
/// observation, one column per feature.
#[derive(Clone, Debug)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    fn wrap(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Builds a tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::wrap(B::from_vec_2d(data, rows, cols))
    }

    /// `self · x`, one value per row.
    pub fn dot(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec(&self.data, &x.data),
            backend: PhantomData,
        }
    }

    /// `selfᵀ · x`, one value per column.
    pub fn tdot(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec_transposed(&self.data, &x.data),
            backend: PhantomData,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    pub fn cols(&self) -> usize {
        self.shape().1
    }

    /// Gathers the given rows, in order, into a new tensor.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::wrap(B::select_rows_2d(&self.data, rows))
    }

    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_mean_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Per-column standard deviation with `ddof` delta degrees of freedom.
    pub fn col_std(&self, ddof: usize) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_std_2d(&self.data, ddof),
            backend: PhantomData,
        }
    }

    pub fn broadcast_sub(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn broadcast_div(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_div_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn broadcast_mul(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_mul_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn broadcast_add(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_add_1d_to_2d_rows(&self.data, &v.data))
    }

    /// Row-major host copy.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Host copy split into rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let cols = self.cols();
        if cols == 0 {
            return vec![Vec::new(); self.rows()];
        }
        self.to_vec().chunks(cols).map(<[f64]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_matvec_ops() {
        // A = [[1.0, 2.0],
        //      [3.0, 4.0]]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0]);

        assert_eq!(a.dot(&x).to_vec(), vec![1.0, 3.0]);
        // Aᵀ = [[1, 3],
        //       [2, 4]]
        assert_eq!(a.tdot(&x).to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 1);
    }

    #[test]
    fn test_tensor2d_to_rows() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(t.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(t.select_rows(&[1]).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_column_statistics() {
        let t = Tensor2D::<CpuBackend>::new(vec![0.0, 10.0, 2.0, 10.0], 2, 2);
        assert_eq!(t.col_mean().to_vec(), vec![1.0, 10.0]);
        assert_eq!(t.col_std(0).to_vec(), vec![1.0, 0.0]);
    }
}
