#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::solver::core::cones::{Cone, CompositeCone};
use crate::solver::core::SolverError;

// ---------------
// problem data in the solver's internal (scaled) form
// ---------------

/// Problem matrices and vectors, held in equilibrated form once
/// setup scaling has been applied.
pub struct DefaultProblemData<T> {
    /// quadratic cost, upper triangular part
    pub P: CscMatrix<T>,
    /// linear cost
    pub q: Vec<T>,
    /// constraint matrix
    pub A: CscMatrix<T>,
    /// constraint right hand side
    pub b: Vec<T>,

    /// number of variables
    pub n: usize,
    /// number of constraint rows
    pub m: usize,

    /// equilibration scalings
    pub equilibration: DefaultEquilibrationData<T>,
}

impl<T> DefaultProblemData<T>
where
    T: FloatT,
{
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        b: &[T],
        cones: &CompositeCone<T>,
    ) -> Result<Self, SolverError> {
        let (m, n) = A.size();

        if !P.is_square() || P.n != n {
            return Err(SolverError::DimensionMismatch(format!(
                "P must be square with dimension matching A columns ({})",
                n
            )));
        }
        if q.len() != n {
            return Err(SolverError::DimensionMismatch(format!(
                "q has length {}, expected {}",
                q.len(),
                n
            )));
        }
        if b.len() != m {
            return Err(SolverError::DimensionMismatch(format!(
                "b has length {}, expected {}",
                b.len(),
                m
            )));
        }
        if cones.numel() != m {
            return Err(SolverError::DimensionMismatch(format!(
                "cone dimensions sum to {}, expected {}",
                cones.numel(),
                m
            )));
        }

        P.check_format()?;
        A.check_format()?;

        // only the upper triangle of P is retained
        let P = P.to_triu();

        Ok(Self {
            P,
            q: q.to_vec(),
            A: A.clone(),
            b: b.to_vec(),
            n,
            m,
            equilibration: DefaultEquilibrationData::new(n, m),
        })
    }
}
