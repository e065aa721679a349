#![allow(non_snake_case)]

use super::KKTSolver;
use crate::algebra::*;
use crate::ldl::{LdlError, LdlFactorization};

// -------------------------------------
// Direct LDLᵀ implementation of the KKT interface
// -------------------------------------

pub struct DirectLdlKKTSolver<T> {
    // dimensions of the P and A blocks
    n: usize,
    m: usize,

    // nonzero indices (input ordering) of the -1/ρ diagonal
    rho_idx: Vec<usize>,

    // scratch for penalty updates
    rho_vals: Vec<T>,

    ldl: LdlFactorization<T>,
}

impl<T> DirectLdlKKTSolver<T>
where
    T: FloatT,
{
    /// Assemble and factor the KKT matrix from problem data.
    /// `P` must be upper triangular.
    pub fn new(P: &CscMatrix<T>, A: &CscMatrix<T>, σ: T, rho: &[T]) -> Result<Self, LdlError> {
        let (m, n) = A.size();
        debug_assert!(P.is_square() && P.n == n && rho.len() == m);

        let (K, rho_idx) = assemble_kkt(P, A, σ, rho);
        let ldl = LdlFactorization::new(&K, None, false)?;

        Ok(Self {
            n,
            m,
            rho_idx,
            rho_vals: vec![T::zero(); m],
            ldl,
        })
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.n, self.m)
    }
}

impl<T> KKTSolver<T> for DirectLdlKKTSolver<T>
where
    T: FloatT,
{
    fn solve(&mut self, b: &mut [T]) {
        debug_assert_eq!(b.len(), self.n + self.m);
        self.ldl.solve(b);
    }

    fn update_rho(&mut self, rho: &[T]) -> Result<(), LdlError> {
        debug_assert_eq!(rho.len(), self.m);
        self.rho_vals
            .scalarop_from(|ρ| -T::recip(ρ), rho);
        self.ldl.update_values(&self.rho_idx, &self.rho_vals);
        self.ldl.refactor()
    }
}

// Assemble the upper triangular KKT matrix
//
//   K = [ triu(P) + σI    A'          ]
//       [ 0               -diag(1/ρ)  ]
//
// returning also the nonzero positions of the penalty diagonal so that
// later ρ updates can write straight into the factorization input.

fn assemble_kkt<T: FloatT>(
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    σ: T,
    rho: &[T],
) -> (CscMatrix<T>, Vec<usize>) {
    let (m, n) = A.size();
    let At = A.transpose();

    let nnzKKT = P.nnz() + n - P.count_diagonal_entries() + A.nnz() + m;
    let mut K = CscMatrix::<T>::spalloc((n + m, n + m), nnzKKT);
    let mut rho_idx = Vec::with_capacity(m);

    let mut ptr = 0;

    // upper left block: triu(P) with σ folded onto the diagonal.
    // P may have structurally missing diagonal entries
    for col in 0..n {
        K.colptr[col] = ptr;
        let mut has_diag = false;
        for p in P.colptr[col]..P.colptr[col + 1] {
            let row = P.rowval[p];
            let mut val = P.nzval[p];
            if row == col {
                has_diag = true;
                val += σ;
            }
            K.rowval[ptr] = row;
            K.nzval[ptr] = val;
            ptr += 1;
        }
        if !has_diag {
            K.rowval[ptr] = col;
            K.nzval[ptr] = σ;
            ptr += 1;
        }
    }

    // upper right block columns: row i of A, then the penalty diagonal
    for i in 0..m {
        K.colptr[n + i] = ptr;
        for p in At.colptr[i]..At.colptr[i + 1] {
            K.rowval[ptr] = At.rowval[p];
            K.nzval[ptr] = At.nzval[p];
            ptr += 1;
        }
        K.rowval[ptr] = n + i;
        K.nzval[ptr] = -T::recip(rho[i]);
        rho_idx.push(ptr);
        ptr += 1;
    }
    K.colptr[n + m] = ptr;

    // truncate unused space if P had missing diagonal entries
    K.rowval.truncate(ptr);
    K.nzval.truncate(ptr);

    (K, rho_idx)
}

// -------------
// testing
