use crate::algebra::FloatT;
use crate::ldl::LdlError;

mod directldl;
pub use directldl::*;

/// Linear solver capability consumed by the iteration engine.
///
/// The engine assembles the quasidefinite system
/// ```text
/// K = [ P + σI      A'          ]
///     [ A           -diag(1/ρ)  ]
/// ```
/// once at setup through a concrete implementation's constructor, then
/// interacts with it only through this trait: in-place solves against
/// K, and penalty updates that refresh the factorization.
pub trait KKTSolver<T: FloatT> {
    /// solve `K x = b` in place, with `x` overwriting `b`
    fn solve(&mut self, b: &mut [T]);

    /// replace the penalty block `-diag(1/ρ)` and refactor
    fn update_rho(&mut self, rho: &[T]) -> Result<(), LdlError>;
}
