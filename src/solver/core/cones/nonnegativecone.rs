use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Nonnegative Cone
// -------------------------------------

pub struct NonnegativeCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> NonnegativeCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn project(&mut self, x: &mut [T]) {
        x.scalarop(|x| T::max(x, T::zero()));
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        // self dual
        y.minimum() >= -tol
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        x.minimum() >= -tol
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        // zero on the polar cone, unbounded elsewhere
        if y.maximum() <= tol {
            T::zero()
        } else {
            T::infinity()
        }
    }

    fn rectify_equilibration(&self, δ: &mut [T], _e: &[T]) -> bool {
        δ.set(T::one());
        false
    }

    fn scale_units(&mut self, _e: &[T]) {
        // nothing to do
    }
}
