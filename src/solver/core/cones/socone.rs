use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Second Order Cone
// -------------------------------------

pub struct SecondOrderCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        assert!(dim >= 1, "SecondOrderCone requires dim >= 1");
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn project(&mut self, x: &mut [T]) {
        let t = x[0];
        let normx = x[1..].norm();

        if t >= normx {
            // already inside
        } else if t <= -normx {
            x.fill(T::zero());
        } else {
            let half = T::from_f64(0.5).unwrap();
            let c = half * (T::one() + t / normx);
            x[0] = c * normx;
            x[1..].scale(c);
        }
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        // self dual
        y[0] >= y[1..].norm() - tol
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        x[0] >= x[1..].norm() - tol
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        // polar cone is -𝒦
        if -y[0] >= y[1..].norm() - tol {
            T::zero()
        } else {
            T::infinity()
        }
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        // only a scalar scaling preserves the cone, so replace the
        // block of e by its mean
        δ.copy_from(e).recip().scale(e.mean());
        true
    }

    fn scale_units(&mut self, _e: &[T]) {
        // nothing to do
    }
}
