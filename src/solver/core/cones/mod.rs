#![allow(non_snake_case)]

use crate::algebra::FloatT;
use enum_dispatch::*;

// the supported cone wrapper type for primitives
// and the composite cone
mod compositecone;
mod supportedcone;
// primitive cone types
mod boxcone;
mod expcone;
mod nonnegativecone;
mod powcone;
mod psdcone;
mod socone;
mod zerocone;

// re-export everything to appear as one module
pub use {
    boxcone::*, compositecone::*, expcone::*, nonnegativecone::*, powcone::*, psdcone::*,
    socone::*, supportedcone::*, zerocone::*,
};

/// Operations required of every cone variant.
///
/// Projections are total on ℝⁿ and idempotent.  The membership tests
/// `in_dual` and `in_recession` serve the infeasibility certificates,
/// and the equilibration hooks keep diagonal scaling compatible with
/// cones that only admit a scalar block scaling.
#[enum_dispatch]
pub trait Cone<T>
where
    T: FloatT,
{
    // number of variables in the cone
    fn numel(&self) -> usize;

    // orthogonal projection onto the cone, in place
    fn project(&mut self, x: &mut [T]);

    // test y ∈ 𝒦* (dual cone membership), within tol
    fn in_dual(&mut self, y: &[T], tol: T) -> bool;

    // test x ∈ 𝒦^∞ (recession cone membership), within tol
    fn in_recession(&mut self, x: &[T], tol: T) -> bool;

    // support function σ_𝒦(y).  Infinite unless y is in the polar
    // cone, except for compact sets (Box) where it is always finite.
    fn support_function(&mut self, y: &[T], tol: T) -> T;

    // converts an elementwise scaling into a scaling that preserves
    // cone membership.  Returns true if the correction δ is not
    // identically one.
    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool;

    // hook for cones carrying data in problem units (Box bounds)
    fn scale_units(&mut self, e: &[T]);
}
