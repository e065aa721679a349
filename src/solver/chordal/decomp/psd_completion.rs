#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::chordal::{ChordalInfo, SparsityPattern};
use crate::solver::DefaultVariables;

// -----------------------------------
// psd completion
// -----------------------------------

// The entries of the dual that correspond to structural zeros of the
// decomposed pattern are not constrained by the problem.  To return a
// positive semidefinite dual they must be filled in by a completion
// pass over the clique tree.

impl<T> ChordalInfo<T>
where
    T: FloatT,
{
    pub(crate) fn psd_completion(&self, variables: &mut DefaultVariables<T>) {
        // working with the cones of the original problem here,
        // not the decomposed ones
        let cones = &self.init_cones;

        // row ranges of the original cones
        let mut row_ranges = Vec::with_capacity(cones.len());
        let mut start = 0;
        for cone in cones.iter() {
            let stop = start + cone.nvars();
            row_ranges.push(start..stop);
            start = stop;
        }

        for pattern in self.spatterns.iter() {
            let row_range = row_ranges[pattern.orig_index].clone();
            let z = &mut variables.μ[row_range];
            complete(z, pattern);
        }
    }
}

fn complete<T>(z: &mut [T], pattern: &SparsityPattern)
where
    T: FloatT,
{
    let n = pattern.ordering.len();
    let mut Z = Matrix::zeros((n, n));
    svec_to_mat(&mut Z, z);
    psd_complete(&mut Z, pattern);
    mat_to_svec(z, &Z);
}

// positive semidefinite completion (from Vandenberghe - Chordal Graphs
// and Semidefinite Optimization, p. 362)
// input: A - a positive semidefinite completable matrix

fn psd_complete<T>(A: &mut Matrix<T>, pattern: &SparsityPattern)
where
    T: FloatT,
{
    let sntree = &pattern.sntree;
    let p = &pattern.ordering;
    let ip = invperm(p);
    let N = A.ncols();

    // permute the matrix based on the ordering p, so that W is in the
    // order that the cliques were computed in
    let mut W = Matrix::zeros((N, N));
    W.subsref(A, p, p);

    let mut Wαα = Matrix::<T>::zeros((0, 0));
    let mut Wαν = Matrix::<T>::zeros((0, 0));
    let mut Wηα = Matrix::<T>::zeros((0, 0));
    let mut Wηα_times_Y = Matrix::<T>::zeros((0, 0));

    // traverse the supernode tree in descending order, given by the
    // post-ordering of the cliques
    for j in (0..(sntree.n_cliques - 1)).rev() {
        // vertex set of the supernode, in consecutive order after
        // the reordering step at setup
        let ν: Vec<usize> = sntree.get_snd(j).iter().copied().collect();

        // the separator: column indices of the unknown blocks
        let α: Vec<usize> = sntree.get_sep(j).iter().copied().collect();

        // row indices of the lower-triangular unknowns in the columns
        // of the supernode
        let i = ν[0];
        let η: Vec<usize> = ((i + 1)..N)
            .filter(|x| !α.contains(x) && !ν.contains(x))
            .collect();

        Wαα.subsref(&W, &α, &α);
        Wαν.subsref(&W, &α, &ν);
        Wηα.subsref(&W, &η, &α);

        // solve Wαα \ Wαν.  Cholesky first; if the separator block is
        // singular, fall back to a pseudoinverse solve through the
        // eigendecomposition
        let mut chol = CholeskyEngine::new(α.len());
        match chol.factor(&Wαα) {
            Ok(()) => {
                chol.solve(&mut Wαν);
            }
            Err(_) => {
                pinv_solve(&mut Wαν, &Wαα);
            }
        }

        let Y = &Wαν; // solved in place
        Wηα_times_Y.resize((η.len(), ν.len()));
        Wηα_times_Y.gemm(MatrixShape::N, MatrixShape::N, &Wηα, Y, T::one(), T::zero());

        W.subsasgn(&η, &ν, &Wηα_times_Y);

        // symmetry condition
        W.subsasgn_t(&ν, &η, &Wηα_times_Y);
    }

    // invert the permutation
    A.subsref(&W, &ip, &ip);
}

// overwrite B with pinv(A) * B for symmetric A
fn pinv_solve<T>(B: &mut Matrix<T>, A: &Matrix<T>)
where
    T: FloatT,
{
    let n = A.nrows();
    let mut eng = EigEngine::<T>::new(n);
    let mut Awork = A.clone();
    eng.eigen(&mut Awork).expect("eigendecomposition failure");

    let V = eng.V.as_ref().unwrap();
    let λ = &eng.λ;

    // pseudoinversion threshold relative to the largest eigenvalue
    let λmax = λ.iter().fold(T::zero(), |acc, &v| T::max(acc, T::abs(v)));
    let thresh = λmax * T::epsilon() * T::from_usize(n.max(1)).unwrap();

    // C = V' * B
    let mut C = Matrix::zeros((n, B.ncols()));
    C.gemm(MatrixShape::T, MatrixShape::N, V, B, T::one(), T::zero());

    // scale rows of C by the pseudoinverted eigenvalues
    for r in 0..n {
        let scale = {
            if T::abs(λ[r]) > thresh {
                T::recip(λ[r])
            } else {
                T::zero()
            }
        };
        for c in 0..C.ncols() {
            C[(r, c)] *= scale;
        }
    }

    // B = V * C
    B.gemm(MatrixShape::N, MatrixShape::N, V, &C, T::one(), T::zero());
}
