#![allow(non_snake_case)]
//! Direct LDLᵀ factorization of sparse symmetric quasidefinite matrices.
//!
//! Serves as the backend for the solver's KKT systems and, in logical-only
//! mode, as the symbolic elimination engine for chordal sparsity analysis.

use crate::algebra::*;
use std::cmp::{max, min};
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorization`] operations
#[derive(Error, Debug)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
    #[error("Fill reducing ordering failed")]
    Ordering,
}

// marker for vertices with no etree parent
const NO_PARENT: usize = usize::MAX;

/// Performs LDLᵀ factorization of a symmetric quasidefinite matrix
/// supplied in upper triangular CSC form.
#[derive(Debug)]
pub struct LdlFactorization<T = f64> {
    /// fill reducing permutation
    pub perm: Vec<usize>,
    /// lower triangular factor
    pub L: CscMatrix<T>,
    /// diagonal of the factorization
    pub D: Vec<T>,
    /// inverse of the diagonal
    pub Dinv: Vec<T>,

    // the permuted triu matrix that gets factored
    triuA: CscMatrix<T>,
    // mapping from input nonzeros to entries of triuA
    AtoPAPt: Vec<usize>,

    // symbolic data and scratch
    etree: Vec<usize>,
    Lnz: Vec<usize>,
    iwork: Vec<usize>,
    bwork: Vec<bool>,
    fwork: Vec<T>,

    is_logical: bool,
}

impl<T> LdlFactorization<T>
where
    T: FloatT,
{
    /// Factor `Ain`, or perform symbolic analysis only if `logical` is true.
    ///
    /// An AMD fill reducing ordering is computed internally unless an
    /// explicit permutation is supplied.
    pub fn new(
        Ain: &CscMatrix<T>,
        perm: Option<Vec<usize>>,
        logical: bool,
    ) -> Result<Self, LdlError> {
        check_structure(Ain)?;
        let n = Ain.nrows();

        let (perm, iperm) = match perm {
            Some(p) => {
                let ip = invperm(&p);
                (p, ip)
            }
            None => amd_ordering(Ain)?,
        };

        // permute to (another) upper triangular matrix, recording the
        // mapping from the input's entries to the permuted entries
        let (triuA, AtoPAPt) = permute_symmetric(Ain, &iperm);

        // symbolic analysis
        let mut etree = vec![NO_PARENT; n];
        let mut Lnz = vec![0usize; n];
        let mut iwork = vec![0usize; 3 * n];
        etree_and_colcounts(&triuA, &mut iwork, &mut Lnz, &mut etree);

        let sumLnz = Lnz.iter().sum();
        let L = CscMatrix::spalloc((n, n), sumLnz);

        let mut ldl = Self {
            perm,
            L,
            D: vec![T::zero(); n],
            Dinv: vec![T::zero(); n],
            triuA,
            AtoPAPt,
            etree,
            Lnz,
            iwork,
            bwork: vec![false; n],
            fwork: vec![T::zero(); n],
            is_logical: logical,
        };

        ldl.factor_internal()?;
        Ok(ldl)
    }

    /// Overwrite values of the original (unpermuted) matrix by nonzero index.
    /// A subsequent [`refactor`](LdlFactorization::refactor) is required
    /// before further solves.
    pub fn update_values(&mut self, indices: &[usize], values: &[T]) {
        for (&idx, &v) in zip(indices, values) {
            self.triuA.nzval[self.AtoPAPt[idx]] = v;
        }
    }

    /// Recompute the numeric factorization with the current matrix values.
    pub fn refactor(&mut self) -> Result<(), LdlError> {
        // a refactor always implies a numeric factorization
        self.is_logical = false;
        self.factor_internal()
    }

    /// Solves Ax = b using the internal LDLᵀ factors, with x replacing b.
    pub fn solve(&mut self, b: &mut [T]) {
        assert!(!self.is_logical);
        assert_eq!(b.len(), self.D.len());

        // permute b into scratch
        let tmp = &mut self.fwork;
        permute(tmp, b, &self.perm);

        lsolve(&self.L, tmp);
        zip(tmp.iter_mut(), &self.Dinv).for_each(|(t, d)| *t *= *d);
        ltsolve(&self.L, tmp);

        // inverse permutation puts the solution back in b
        ipermute(b, tmp, &self.perm);
    }

    fn factor_internal(&mut self) -> Result<(), LdlError> {
        if self.is_logical {
            self.L.nzval.fill(T::zero());
            self.D.fill(T::zero());
            self.Dinv.fill(T::zero());
        }

        factor_inner(
            &self.triuA,
            &mut self.L,
            &mut self.D,
            &mut self.Dinv,
            &self.Lnz,
            &self.etree,
            &mut self.bwork,
            &mut self.iwork,
            &mut self.fwork,
            self.is_logical,
        )
    }
}

fn check_structure<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    if !A.is_square() {
        return Err(LdlError::IncompatibleDimension);
    }
    if !A.is_triu() {
        return Err(LdlError::NotUpperTriangular);
    }
    // A must have at least one entry in every column
    if !A.colptr.windows(2).all(|c| c[0] < c[1]) {
        return Err(LdlError::EmptyColumn);
    }
    Ok(())
}

fn amd_ordering<T: FloatT>(A: &CscMatrix<T>) -> Result<(Vec<usize>, Vec<usize>), LdlError> {
    let control = amd::Control::default();
    let (perm, iperm, _info) =
        amd::order(A.nrows(), &A.colptr, &A.rowval, &control).map_err(|_| LdlError::Ordering)?;
    Ok((perm, iperm))
}

// Given a sparse symmetric matrix `A` (only upper triangular entries), return
// the permuted sparse symmetric matrix `PAPt` (also upper triangular) for the
// inverse permutation `iperm`, plus the index mapping from entries of A to
// entries of PAPt.  Follows Davis - Direct Methods for Sparse Linear Systems.

fn permute_symmetric<T: FloatT>(A: &CscMatrix<T>, iperm: &[usize]) -> (CscMatrix<T>, Vec<usize>) {
    let n = A.nrows();
    let mut P = CscMatrix::<T>::spalloc((n, n), A.nnz());
    let mut AtoPAPt = vec![0; A.nnz()];

    // 1. column counts of P, keeping the row permutation in mind
    let mut num_entries = vec![0usize; n];
    for colA in 0..n {
        let colP = iperm[colA];
        for &rowA in &A.rowval[A.colptr[colA]..A.colptr[colA + 1]] {
            let rowP = iperm[rowA];
            num_entries[max(rowP, colP)] += 1;
        }
    }

    // 2. cumulative sum into colptr
    P.colptr[0] = 0;
    for (i, ne) in num_entries.iter().enumerate() {
        P.colptr[i + 1] = P.colptr[i] + ne;
    }

    // reuse as a moving write cursor per column
    let mut row_starts: Vec<usize> = P.colptr[0..n].to_vec();

    // 3. scatter entries into their permuted positions.  Columns of the
    // result are not sorted by row index, which the factorization tolerates.
    for colA in 0..n {
        let colP = iperm[colA];
        for idxA in A.colptr[colA]..A.colptr[colA + 1] {
            let rowP = iperm[A.rowval[idxA]];
            let col = max(colP, rowP);
            let dest = row_starts[col];
            P.rowval[dest] = min(colP, rowP);
            P.nzval[dest] = A.nzval[idxA];
            AtoPAPt[idxA] = dest;
            row_starts[col] += 1;
        }
    }

    (P, AtoPAPt)
}

// Compute the elimination tree and per-column nonzero counts of L for a
// quasidefinite matrix in (possibly unsorted) upper triangular CSC form.

fn etree_and_colcounts<T: FloatT>(
    A: &CscMatrix<T>,
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) {
    let n = A.nrows();
    work[..n].fill(0);
    Lnz.fill(0);
    etree.fill(NO_PARENT);

    for j in 0..n {
        work[j] = j;
        for &istart in &A.rowval[A.colptr[j]..A.colptr[j + 1]] {
            let mut i = istart;
            while work[i] != j {
                if etree[i] == NO_PARENT {
                    etree[i] = j;
                }
                Lnz[i] += 1; // nonzeros in row j of L, filed by column
                work[i] = j;
                i = etree[i];
            }
        }
    }
}

// The up-looking factorization.  For each k we solve
// y = L[0:k,0:k] \ b, where b is the above-diagonal part of the kth
// column of A; y becomes the kth row of L with an implied unit diagonal.

#[allow(clippy::too_many_arguments)]
fn factor_inner<T: FloatT>(
    A: &CscMatrix<T>,
    L: &mut CscMatrix<T>,
    D: &mut [T],
    Dinv: &mut [T],
    Lnz: &[usize],
    etree: &[usize],
    y_markers: &mut [bool],
    iwork: &mut [usize],
    y_vals: &mut [T],
    logical: bool,
) -> Result<(), LdlError> {
    let n = A.nrows();

    // partition integer scratch
    let (y_idx, iwork) = iwork.split_at_mut(n);
    let (elim_buffer, next_colspace) = iwork.split_at_mut(n);

    // set L.colptr to cumsum(Lnz), starting from zero
    L.colptr[0] = 0;
    for (i, nz) in Lnz.iter().enumerate() {
        L.colptr[i + 1] = L.colptr[i] + nz;
    }

    y_markers.fill(false);
    y_vals.fill(T::zero());
    D.fill(T::zero());
    next_colspace.copy_from_slice(&L.colptr[0..n]);

    if !logical {
        // the first column of a triu matrix can only hold its diagonal
        D[0] = A.nzval[0];
        if D[0] == T::zero() {
            return Err(LdlError::ZeroPivot);
        }
        Dinv[0] = T::recip(D[0]);
    }

    for k in 1..n {
        // mark the nonzero pattern of row k of L by walking the etree
        // from each entry of column k of A
        let mut nnz_y = 0;

        for i in A.colptr[k]..A.colptr[k + 1] {
            let bidx = A.rowval[i];

            // the diagonal entry seeds D[k] and takes no part
            // in the elimination
            if bidx == k {
                D[k] = A.nzval[i];
                continue;
            }

            y_vals[bidx] = A.nzval[i];

            if !y_markers[bidx] {
                y_markers[bidx] = true;
                elim_buffer[0] = bidx;
                let mut nnz_e = 1;

                let mut next_idx = etree[bidx];
                while next_idx != NO_PARENT && next_idx < k {
                    if y_markers[next_idx] {
                        break;
                    }
                    y_markers[next_idx] = true;
                    elim_buffer[nnz_e] = next_idx;
                    next_idx = etree[next_idx];
                    nnz_e += 1;
                }

                // append the buffered elimination path in reverse order
                while nnz_e != 0 {
                    nnz_e -= 1;
                    y_idx[nnz_y] = elim_buffer[nnz_e];
                    nnz_y += 1;
                }
            }
        }

        // numeric elimination along the pattern, in reverse
        for i in (0..nnz_y).rev() {
            let cidx = y_idx[i];
            let dest = next_colspace[cidx];

            if !logical {
                let yv = y_vals[cidx];

                for j in L.colptr[cidx]..dest {
                    y_vals[L.rowval[j]] -= L.nzval[j] * yv;
                }

                L.nzval[dest] = yv * Dinv[cidx];
                D[k] -= yv * L.nzval[dest];
            }

            L.rowval[dest] = k;
            next_colspace[cidx] += 1;

            y_vals[cidx] = T::zero();
            y_markers[cidx] = false;
        }

        if !logical {
            if D[k] == T::zero() {
                return Err(LdlError::ZeroPivot);
            }
            Dinv[k] = T::recip(D[k]);
        }
    }

    Ok(())
}

// Solves (L+I)x = b in place
fn lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        for j in L.colptr[i]..L.colptr[i + 1] {
            x[L.rowval[j]] -= L.nzval[j] * xi;
        }
    }
}

// Solves (L+I)'x = b in place
fn ltsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        for j in L.colptr[i]..L.colptr[i + 1] {
            s += L.nzval[j] * x[L.rowval[j]];
        }
        x[i] -= s;
    }
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    fn test_matrix() -> CscMatrix<f64> {
        // triu of a quasidefinite matrix
        // [ 4  1  0]
        // [ 1  5  2]
        // [ 0  2 -3]
        CscMatrix::from(&[
            [4., 1., 0.],  //
            [0., 5., 2.],  //
            [0., 0., -3.], //
        ])
    }

    #[test]
    fn test_factor_and_solve() {
        let A = test_matrix();
        let mut ldl = LdlFactorization::new(&A, None, false).unwrap();

        let mut b = vec![6., 13., -5.];
        ldl.solve(&mut b);

        // exact solution of the full symmetric system
        let xsol = [85. / 73., 98. / 73., 187. / 73.];
        assert!(b.norm_inf_diff(&xsol) < 1e-12);
    }

    #[test]
    fn test_update_and_refactor() {
        let A = test_matrix();
        let mut ldl = LdlFactorization::new(&A, None, false).unwrap();

        // overwrite the (2,2) entry (nonzero index 4 in input order)
        // and check that solves track the new data
        let idx = [4usize];
        ldl.update_values(&idx, &[-5.]);
        ldl.refactor().unwrap();

        let mut b = vec![5., 8., -3.];
        let mut r = b.clone();
        ldl.solve(&mut b);

        // residual check against the updated matrix
        let x = &b;
        let full = [[4., 1., 0.], [1., 5., 2.], [0., 2., -5.]];
        for i in 0..3 {
            let mut acc = 0.0;
            for j in 0..3 {
                acc += full[i][j] * x[j];
            }
            r[i] -= acc;
        }
        assert!(r.norm_inf() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_structure() {
        // not upper triangular
        let A = CscMatrix::from(&[
            [1., 0.], //
            [1., 1.], //
        ]);
        assert!(matches!(
            LdlFactorization::new(&A, None, false),
            Err(LdlError::NotUpperTriangular)
        ));

        // empty column
        let B = CscMatrix::from(&[
            [1., 0.], //
            [0., 0.], //
        ]);
        assert!(matches!(
            LdlFactorization::new(&B, None, false),
            Err(LdlError::EmptyColumn)
        ));
    }

    #[test]
    fn test_logical_factor_pattern() {
        // arrow-ish pattern; logical factorization only
        let A = CscMatrix::from(&[
            [1., 0., 1.], //
            [0., 1., 1.], //
            [0., 0., 1.], //
        ]);
        let ldl = LdlFactorization::new(&A, Some(vec![0, 1, 2]), true).unwrap();

        // with the identity permutation the L factor has the
        // subdiagonal entries of the last column only
        assert_eq!(ldl.L.nrows(), 3);
        assert_eq!(ldl.L.nnz(), 2);
        assert_eq!(ldl.perm, vec![0, 1, 2]);
    }
}
