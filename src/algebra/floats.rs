use super::blas::BlasFloatT;
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};

/// Trait for floating point types used internally by the solver.
///
/// Implementations are provided for f32 and f64.  The trait collects the
/// [num_traits](num_traits) bounds required by the iterative core together
/// with the BLAS/LAPACK scalar bindings required by the semidefinite cone
/// projections.

pub trait FloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + std::fmt::Display
    + std::fmt::LowerExp
    + std::fmt::Debug
    + BlasFloatT
{
}
impl FloatT for f32 {}
impl FloatT for f64 {}

/// Trait for converting Rust primitives to [FloatT](crate::algebra::FloatT)
///
/// Allows for `(2.0).as_T()` on constants rather than
/// `T::from_f64(2.0).unwrap()` everywhere.

#[allow(non_snake_case)]
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_T {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_T!(u32, from_u32);
impl_as_T!(u64, from_u64);
impl_as_T!(usize, from_usize);
impl_as_T!(f32, from_f32);
impl_as_T!(f64, from_f64);
