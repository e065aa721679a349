#![allow(non_snake_case)]

use super::*;

/// Dense column-major matrix of [`FloatT`](crate::algebra::FloatT)
///
/// Used internally by the semidefinite cone projections and by the PSD
/// completion of decomposed duals.  Not part of the user facing API.

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// column-major data, length `m * n`
    pub data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        Self {
            m,
            n,
            data: vec![T::zero(); m * n],
        }
    }

    pub fn nrows(&self) -> usize {
        self.m
    }
    pub fn ncols(&self) -> usize {
        self.n
    }
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }
    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// resize in place, zeroing all contents
    pub fn resize(&mut self, size: (usize, usize)) {
        let (m, n) = size;
        self.m = m;
        self.n = n;
        self.data.clear();
        self.data.resize(m * n, T::zero());
    }

    /// general matrix multiply `self = a*op(A)*op(B) + b*self`
    pub fn gemm(
        &mut self,
        ta: MatrixShape,
        tb: MatrixShape,
        A: &Matrix<T>,
        B: &Matrix<T>,
        a: T,
        b: T,
    ) {
        let (am, ak) = match ta {
            MatrixShape::N => (A.m, A.n),
            MatrixShape::T => (A.n, A.m),
        };
        let (bk, bn) = match tb {
            MatrixShape::N => (B.m, B.n),
            MatrixShape::T => (B.n, B.m),
        };
        assert!(ak == bk && self.m == am && self.n == bn);

        // (m,n,k) of zero dimension implies nothing to do, and
        // the degenerate lda/ldb values would upset BLAS
        if am == 0 || bn == 0 {
            return;
        }
        if ak == 0 {
            self.data.scale(b);
            return;
        }

        let transa = match ta {
            MatrixShape::N => b'N',
            MatrixShape::T => b'T',
        };
        let transb = match tb {
            MatrixShape::N => b'N',
            MatrixShape::T => b'T',
        };

        T::xgemm(
            transa,
            transb,
            am as i32,
            bn as i32,
            ak as i32,
            a,
            &A.data,
            A.m.max(1) as i32,
            &B.data,
            B.m.max(1) as i32,
            b,
            &mut self.data,
            am.max(1) as i32,
        );
    }

    /// `self = src[ri, ci]`, resizing as required
    pub fn subsref(&mut self, src: &Matrix<T>, ri: &[usize], ci: &[usize]) {
        self.resize((ri.len(), ci.len()));
        for (j, &cj) in ci.iter().enumerate() {
            for (i, &rj) in ri.iter().enumerate() {
                self[(i, j)] = src[(rj, cj)];
            }
        }
    }

    /// `self[ri, ci] = src`
    pub fn subsasgn(&mut self, ri: &[usize], ci: &[usize], src: &Matrix<T>) {
        assert!(src.m == ri.len() && src.n == ci.len());
        for (j, &cj) in ci.iter().enumerate() {
            for (i, &rj) in ri.iter().enumerate() {
                self[(rj, cj)] = src[(i, j)];
            }
        }
    }

    /// `self[ri, ci] = src'`
    pub fn subsasgn_t(&mut self, ri: &[usize], ci: &[usize], src: &Matrix<T>) {
        assert!(src.n == ri.len() && src.m == ci.len());
        for (j, &cj) in ci.iter().enumerate() {
            for (i, &rj) in ri.iter().enumerate() {
                self[(rj, cj)] = src[(j, i)];
            }
        }
    }

    /// symmetrize in place: `self = (self + self')/2`
    pub fn symmetric_part(&mut self) {
        assert!(self.is_square());
        let half = T::from_f64(0.5).unwrap();
        for c in 0..self.n {
            for r in 0..c {
                let v = half * (self[(r, c)] + self[(c, r)]);
                self[(r, c)] = v;
                self[(c, r)] = v;
            }
        }
    }
}

impl<T> std::ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.data[idx.0 + self.m * idx.1]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        &mut self.data[idx.0 + self.m * idx.1]
    }
}

impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut M = Matrix::zeros((R, C));
        for (r, rowdata) in rows.iter().enumerate() {
            for (c, &v) in rowdata.iter().enumerate() {
                M[(r, c)] = v;
            }
        }
        M
    }
}

// ---------------------------------------------
// packed triangle (svec) conversions.
// off diagonals carry a factor of √2 so that
// inner products of svec pairs agree with the
// trace inner product of the matrices
// ---------------------------------------------

pub(crate) fn svec_to_mat<T: FloatT>(M: &mut Matrix<T>, x: &[T]) {
    let rt2inv = T::recip(T::SQRT_2());
    let mut idx = 0;
    for col in 0..M.n {
        for row in 0..=col {
            if row == col {
                M[(row, col)] = x[idx];
            } else {
                M[(row, col)] = x[idx] * rt2inv;
                M[(col, row)] = x[idx] * rt2inv;
            }
            idx += 1;
        }
    }
}

pub(crate) fn mat_to_svec<T: FloatT>(x: &mut [T], M: &Matrix<T>) {
    let rt2 = T::SQRT_2();
    let mut idx = 0;
    for col in 0..M.n {
        for row in 0..=col {
            x[idx] = {
                if row == col {
                    M[(row, col)]
                } else {
                    M[(row, col)] * rt2
                }
            };
            idx += 1;
        }
    }
}

// ---------------------------------------------
// symmetric eigendecomposition engine (?syevr)
// ---------------------------------------------

pub(crate) struct EigEngine<T> {
    /// Computed eigenvalues in ascending order
    pub λ: Vec<T>,

    /// Computed eigenvectors (optional)
    pub V: Option<Matrix<T>>,

    // BLAS workspace (allocated vecs only)
    isuppz: Vec<i32>,
    work: Vec<T>,
    iwork: Vec<i32>,
}

impl<T> EigEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            λ: vec![T::zero(); n],
            V: None,
            isuppz: vec![0; 2 * n.max(1)],
            work: vec![T::one()],
            iwork: vec![1],
        }
    }

    /// eigenvalues and vectors of A.  A is corrupted by the factorization.
    pub fn eigen(&mut self, A: &mut Matrix<T>) -> Result<(), DenseFactorizationError> {
        self.syevr(A, b'V')
    }

    /// eigenvalues only
    #[allow(dead_code)]
    pub fn eigvals(&mut self, A: &mut Matrix<T>) -> Result<(), DenseFactorizationError> {
        self.syevr(A, b'N')
    }

    fn syevr(&mut self, A: &mut Matrix<T>, jobz: u8) -> Result<(), DenseFactorizationError> {
        if !A.is_square() || A.nrows() != self.λ.len() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let An = A.nrows();
        if An == 0 {
            return Ok(());
        }

        // allocate for eigenvectors on first request
        if jobz == b'V' && self.V.is_none() {
            self.V = Some(Matrix::<T>::zeros((An, An)));
        }

        // target for computed eigenvectors (if any)
        let mut Vfake = [T::zero()];
        let Vdata = match self.V.as_mut() {
            Some(V) => V.data_mut(),
            None => &mut Vfake,
        };

        // standard ?syevr arguments for computing a full set of eigenvalues
        let range = b'A'; // compute all eigenvalues
        let uplo = MatrixTriangle::Triu.as_blas_char();
        let n = An.try_into().unwrap();
        let a = A.data_mut();
        let lda = n;
        let vl = T::zero(); // eig value lb (unused)
        let vu = T::zero(); // eig value ub (unused)
        let il = 0_i32; // eig interval lb (unused)
        let iu = 0_i32; // eig interval ub (unused)
        let abstol = -T::one(); // forces default tolerance
        let m = &mut 0_i32; // returns # of computed eigenvalues
        let w = &mut self.λ;
        let z = Vdata;
        let ldz = n;
        let isuppz = &mut self.isuppz;
        let work = &mut self.work;
        let mut lwork = -1_i32; // -1 => request required work size
        let iwork = &mut self.iwork;
        let mut liwork = -1_i32; // -1 => request required work size
        let info = &mut 0_i32;

        for i in 0..2 {
            T::xsyevr(
                jobz, range, uplo, n, a, lda, vl, vu, il, iu, abstol, m, w, z, ldz, isuppz, work,
                lwork, iwork, liwork, info,
            );
            if *info != 0 {
                return Err(DenseFactorizationError::Eigen(*info));
            }
            // resize work vectors and reset lengths
            if i == 0 {
                lwork = work[0].to_i32().unwrap();
                liwork = iwork[0];
                work.resize(lwork as usize, T::zero());
                iwork.resize(liwork as usize, 0);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------
// Cholesky engine (?potrf / ?potrs)
// ---------------------------------------------

pub(crate) struct CholeskyEngine<T> {
    // factored matrix, upper triangle meaningful after factor()
    AF: Matrix<T>,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            AF: Matrix::zeros((n, n)),
        }
    }

    /// factor A, which must be symmetric positive definite.
    /// A itself is left untouched.
    pub fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.AF.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let An = A.nrows();
        if An == 0 {
            return Ok(());
        }

        self.AF.data_mut().copy_from(A.data());

        let uplo = MatrixTriangle::Triu.as_blas_char();
        let n = An.try_into().unwrap();
        let a = self.AF.data_mut();
        let lda = n;
        let info = &mut 0_i32;

        T::xpotrf(uplo, n, a, lda, info);

        if *info != 0 {
            return Err(DenseFactorizationError::Cholesky(*info));
        }
        Ok(())
    }

    /// solve A X = B in place using the factors from `factor`
    pub fn solve(&mut self, B: &mut Matrix<T>) {
        assert_eq!(B.nrows(), self.AF.nrows());
        let An = self.AF.nrows();
        if An == 0 || B.ncols() == 0 {
            return;
        }

        let uplo = MatrixTriangle::Triu.as_blas_char();
        let n = An.try_into().unwrap();
        let nrhs = B.ncols().try_into().unwrap();
        let info = &mut 0_i32;

        T::xpotrs(uplo, n, nrhs, self.AF.data(), n, B.data_mut(), n, info);
        assert_eq!(*info, 0);
    }
}

// -------------
// testing

#[test]
fn test_gemm() {
    let A = Matrix::from(&[
        [1., 2.], //
        [3., 4.], //
    ]);
    let B = Matrix::from(&[
        [1., 0.], //
        [0., 2.], //
    ]);
    let mut C = Matrix::<f64>::zeros((2, 2));
    C.gemm(MatrixShape::N, MatrixShape::N, &A, &B, 1., 0.);
    assert_eq!(C, Matrix::from(&[[1., 4.], [3., 8.]]));

    C.gemm(MatrixShape::T, MatrixShape::N, &A, &B, 1., 0.);
    assert_eq!(C, Matrix::from(&[[1., 6.], [2., 8.]]));
}

#[test]
fn test_eigen() {
    let mut S = Matrix::from(&[
        [3., 2., 4.], //
        [2., 0., 2.], //
        [4., 2., 3.], //
    ]);
    let Scopy = S.clone(); // S is corrupted by factorization

    let mut eng = EigEngine::<f64>::new(3);
    assert!(eng.eigen(&mut S).is_ok());
    let sol = [-1.0, -1.0, 8.];
    assert!(eng.λ.norm_inf_diff(&sol) < 1e-8);

    // reassemble V*diag(λ)*V' and compare
    let V = eng.V.as_ref().unwrap();
    let mut Vs = V.clone();
    for c in 0..3 {
        for r in 0..3 {
            Vs[(r, c)] *= eng.λ[c];
        }
    }
    let mut M = Matrix::<f64>::zeros((3, 3));
    M.gemm(MatrixShape::N, MatrixShape::T, &Vs, V, 1., 0.);
    assert!(M.data().norm_inf_diff(Scopy.data()) < 1e-8);
}

#[test]
fn test_cholesky() {
    #[rustfmt::skip]
    let S = Matrix::from(
        &[[ 8., -2., 4.],
          [-2., 12., 2.],
          [ 4.,  2., 6.]]);

    let mut eng = CholeskyEngine::<f64>::new(3);
    assert!(eng.factor(&S).is_ok());

    // solve against the RHS generated by x = (1, 2, 2)
    let mut B = Matrix::from(&[[12.], [26.], [20.]]);
    eng.solve(&mut B);
    let xsol = [1., 2., 2.];
    assert!(B.data().norm_inf_diff(&xsol) < 1e-10);
}

#[test]
fn test_svec_roundtrip() {
    let x = vec![1., 2., 3., 4., 5., 6.];
    let mut M = Matrix::<f64>::zeros((3, 3));
    svec_to_mat(&mut M, &x);

    // matrix is symmetric
    assert_eq!(M[(0, 1)], M[(1, 0)]);

    let mut y = vec![0.; 6];
    mat_to_svec(&mut y, &M);
    assert!(y.norm_inf_diff(&x) < 1e-14);
}
