use crate::algebra::*;
use crate::solver::core::SolverStatus;

// ---------------
// solver result
// ---------------

/// Solution and iteration information returned by the solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefaultSolution<T> {
    /// primal variable
    pub x: Vec<T>,
    /// primal slack
    pub s: Vec<T>,
    /// dual variable.  Holds the certificate direction when the
    /// problem is detected primal infeasible
    pub μ: Vec<T>,
    /// equality multiplier from the KKT system
    pub ν: Vec<T>,

    /// objective value at termination
    pub obj_val: T,
    /// iterations taken
    pub iterations: u32,
    /// termination status
    pub status: SolverStatus,

    /// primal residual at termination
    pub r_prim: T,
    /// dual residual at termination
    pub r_dual: T,

    /// total solve time (seconds), excluding setup
    pub solve_time: f64,
    /// setup time (seconds)
    pub setup_time: f64,
    /// time spent inside the iteration loop (seconds)
    pub iter_time: f64,
}

impl<T> DefaultSolution<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            s: vec![T::zero(); m],
            μ: vec![T::zero(); m],
            ν: vec![T::zero(); m],
            obj_val: T::nan(),
            iterations: 0,
            status: SolverStatus::Unsolved,
            r_prim: T::nan(),
            r_dual: T::nan(),
            solve_time: 0.0,
            setup_time: 0.0,
            iter_time: 0.0,
        }
    }
}

impl<T> std::fmt::Display for DefaultSolution<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, ">>> solver result")?;
        writeln!(f, "  status    : {}", self.status)?;
        writeln!(f, "  objective : {:.6e}", self.obj_val)?;
        writeln!(f, "  iterations: {}", self.iterations)?;
        writeln!(
            f,
            "  residuals : primal {:.3e}, dual {:.3e}",
            self.r_prim, self.r_dual
        )?;
        writeln!(
            f,
            "  times     : setup {:.3e}s, solve {:.3e}s",
            self.setup_time, self.solve_time
        )
    }
}
