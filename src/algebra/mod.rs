//! Algebra primitives for the solver.
//!
//! Users ordinarily interact with this module only to define sparse matrix
//! inputs in [CscMatrix](crate::algebra::CscMatrix) format.  All floating
//! point calculations are represented internally on values implementing the
//! [FloatT](crate::algebra::FloatT) trait.

mod blas;
mod csc;
mod dense;
mod floats;
mod scalarmath;
mod types;
mod utils;
mod vecmath;

pub use blas::*;
pub use csc::*;
pub use dense::*;
pub use floats::*;
pub use scalarmath::*;
pub use types::*;
pub(crate) use utils::*;
pub use vecmath::*;
