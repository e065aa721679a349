// core components shared by any problem-format implementation:
// cone library, KKT backend interface, status and error types

pub mod cones;
pub mod kktsolvers;

use thiserror::Error;

/// Terminal status of a solve.
///
/// These identifiers form part of the solver's external interface and
/// are stable across versions.
#[allow(non_camel_case_types)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// no solve attempted, or a numerical failure interrupted the solve
    #[default]
    Unsolved,
    /// primal and dual residuals within tolerance
    Solved,
    /// a primal infeasibility certificate was found
    Primal_infeasible,
    /// a dual infeasibility certificate was found
    Dual_infeasible,
    /// iteration limit reached before convergence
    Max_iter_reached,
    /// time limit reached before convergence
    Time_limit_reached,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Errors detected during problem setup.  No solve is attempted when
/// any of these is returned.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Dimension mismatch between problem terms: {0}")]
    DimensionMismatch(String),
    #[error("Invalid setting: {0}")]
    BadSettings(String),
    #[error("Bad matrix format: {0}")]
    BadMatrixFormat(#[from] crate::algebra::SparseFormatError),
    #[error("KKT factorization failed at setup: {0}")]
    KKTFactorization(#[from] crate::ldl::LdlError),
}
