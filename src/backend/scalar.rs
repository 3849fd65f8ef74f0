use crate::backend::Backend;
use std::marker::PhantomData;

/// Arithmetic required of a backend's native scalar.
pub trait ScalarOps:
    Clone
    + Copy
    + Send
    + Sync
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    fn zero() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn is_finite(self) -> bool;
}

impl ScalarOps for f64 {
    fn zero() -> Self {
        0.0
    }
    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// Backend-typed scalar, e.g. a bias term or a reduced loss value.
#[derive(Clone, Debug, Copy)]
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Scalar<B> {
    pub fn new(value: f64) -> Self {
        Self {
            data: B::scalar_f64(value),
            backend: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self {
            data: <B::Scalar as ScalarOps>::zero(),
            backend: PhantomData,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }

    pub fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

macro_rules! scalar_binop {
    ($($op:ident :: $method:ident),* $(,)?) => {$(
        impl<B: Backend> std::ops::$op for Scalar<B> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self {
                    data: std::ops::$op::$method(self.data, rhs.data),
                    backend: PhantomData,
                }
            }
        }
    )*};
}

scalar_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<B: Backend> std::ops::Neg for Scalar<B> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::zero() - self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_scalar_ops_f64() {
        assert_eq!(<f64 as ScalarOps>::zero(), 0.0);
        assert_eq!(<f64 as ScalarOps>::from_f64(0.25), 0.25);
        assert!(ScalarOps::is_finite(1.0f64));
        assert!(!ScalarOps::is_finite(f64::NAN));
        assert!(!ScalarOps::is_finite(f64::INFINITY));
    }

    #[test]
    fn test_scalar_arithmetic() {
        let a: Scalar<CpuBackend> = Scalar::new(5.0);
        let b: Scalar<CpuBackend> = Scalar::new(2.0);

        let sum = a + b;
        assert_eq!(sum.to_f64(), 7.0);

        let diff = sum - Scalar::new(3.0);
        assert_eq!(diff.to_f64(), 4.0);

        let prod = diff * Scalar::new(0.5);
        assert_eq!(prod.to_f64(), 2.0);

        let quot = prod / Scalar::new(4.0);
        assert_eq!(quot.to_f64(), 0.5);
        assert_eq!((-quot).to_f64(), -0.5);
    }

    #[test]
    fn test_scalar_zero() {
        let z: Scalar<CpuBackend> = Scalar::zero();
        assert_eq!(z.to_f64(), 0.0);
        assert!(z.is_finite());
    }
}
