#![allow(non_snake_case)]

use super::*;
use std::iter::zip;

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use splitcone::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 // colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        // rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], // nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
/// ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer of length `n+1`
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.  Responsibility for ensuring that row indices are in bounds
    /// and sorted within each column is left to the caller.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for an m x n matrix with `nnz` elements
    pub fn spalloc(size: (usize, usize), nnz: usize) -> Self {
        let (m, n) = size;
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// an m x n matrix of structural zeros
    pub fn zeros(size: (usize, usize)) -> Self {
        Self::spalloc(size, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of rows
    pub fn nrows(&self) -> usize {
        self.m
    }
    /// number of columns
    pub fn ncols(&self) -> usize {
        self.n
    }
    /// dimensions as a tuple
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }
    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }
    /// true if `self.nrows() == self.ncols()`
    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// transposed view
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// symmetric view.  Data must be upper triangular.
    pub fn sym(&self) -> Symmetric<'_, Self> {
        debug_assert!(self.is_triu());
        Symmetric { src: self }
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        // colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        // rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        // row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Assemble from (row, col, value) triplets.  Duplicate entries are summed.
    pub fn new_from_triplets(
        m: usize,
        n: usize,
        rows: Vec<usize>,
        cols: Vec<usize>,
        vals: Vec<T>,
    ) -> Self {
        assert!(rows.len() == cols.len() && cols.len() == vals.len());

        // sort entries into (col, row) lexicographic order
        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&k| (cols[k], rows[k]));

        let mut colptr = vec![0usize; n + 1];
        let mut rowval = Vec::with_capacity(rows.len());
        let mut nzval = Vec::<T>::with_capacity(rows.len());

        // entries arrive sorted, so duplicates are adjacent
        let mut last = None;
        for &k in order.iter() {
            let (r, c, v) = (rows[k], cols[k], vals[k]);
            assert!(r < m && c < n);
            if last == Some((c, r)) {
                let lastval: &mut T = nzval.last_mut().unwrap();
                *lastval += v;
            } else {
                rowval.push(r);
                nzval.push(v);
                colptr[c + 1] += 1;
                last = Some((c, r));
            }
        }

        // accumulate column counts into pointers
        for c in 0..n {
            colptr[c + 1] += colptr[c];
        }

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Allocates a new matrix containing only entries from the upper triangle
    pub fn to_triu(&self) -> Self {
        assert_eq!(self.m, self.n);
        let n = self.n;
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut vals = Vec::new();

        for col in 0..n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                let row = self.rowval[ptr];
                if row <= col {
                    rows.push(row);
                    cols.push(col);
                    vals.push(self.nzval[ptr]);
                }
            }
        }
        CscMatrix::new_from_triplets(n, n, rows, cols, vals)
    }

    /// True if the matrix has no structural entries below the diagonal
    pub fn is_triu(&self) -> bool {
        for col in 0..self.ncols() {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            if rows.iter().any(|&row| row > col) {
                return false;
            }
        }
        true
    }

    /// Returns the value at `(row,col)`, or None if it is not a structural nonzero.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        match self.rowval[first..last].binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }

    /// Overwrite the value at `(row,col)`, inserting a new structural
    /// entry if one is not already present.
    pub fn set_entry(&mut self, idx: (usize, usize), value: T) {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        match self.rowval[first..last].binary_search(&row) {
            Ok(offset) => self.nzval[first + offset] = value,
            Err(offset) => {
                self.rowval.insert(first + offset, row);
                self.nzval.insert(first + offset, value);
                for c in (col + 1)..=self.n {
                    self.colptr[c] += 1;
                }
            }
        }
    }

    /// allocating transpose
    pub fn transpose(&self) -> Self {
        let (m, n) = self.size();
        let mut At = CscMatrix::spalloc((n, m), self.nnz());

        // column counts of At are row counts of self
        At.colptr.fill(0);
        for &r in self.rowval.iter() {
            At.colptr[r + 1] += 1;
        }
        for c in 0..m {
            At.colptr[c + 1] += At.colptr[c];
        }

        // scatter, using a moving copy of the column pointers
        let mut next = At.colptr.clone();
        for col in 0..n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                let row = self.rowval[ptr];
                let dest = next[row];
                At.rowval[dest] = col;
                At.nzval[dest] = self.nzval[ptr];
                next[row] += 1;
            }
        }
        At
    }

    /// elementwise scaling of all values
    pub fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    /// negate all values
    pub fn negate(&mut self) {
        self.nzval.negate();
    }

    /// left diagonal scaling: `A[i,:] *= l[i]`
    pub fn lscale(&mut self, l: &[T]) {
        assert_eq!(l.len(), self.m);
        for (row, val) in zip(&self.rowval, &mut self.nzval) {
            *val *= l[*row];
        }
    }

    /// right diagonal scaling: `A[:,j] *= r[j]`
    pub fn rscale(&mut self, r: &[T]) {
        assert_eq!(r.len(), self.n);
        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                self.nzval[ptr] *= r[col];
            }
        }
    }

    /// two sided diagonal scaling: `A[i,j] *= l[i]*r[j]`
    pub fn lrscale(&mut self, l: &[T], r: &[T]) {
        self.lscale(l);
        self.rscale(r);
    }

    /// columnwise infinity norms, overwriting `norms`
    pub fn col_norms(&self, norms: &mut [T]) {
        norms.fill(T::zero());
        self.col_norms_no_reset(norms);
    }

    /// columnwise infinity norms, accumulated onto the existing `norms`
    pub fn col_norms_no_reset(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (col, norm) in norms.iter_mut().enumerate() {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                *norm = T::max(*norm, T::abs(self.nzval[ptr]));
            }
        }
    }

    /// rowwise infinity norms, overwriting `norms`
    pub fn row_norms(&self, norms: &mut [T]) {
        norms.fill(T::zero());
        assert_eq!(norms.len(), self.m);
        for (row, val) in zip(&self.rowval, &self.nzval) {
            norms[*row] = T::max(norms[*row], T::abs(*val));
        }
    }

    /// rowwise sums assigned to `sums`
    pub fn row_sums(&self, sums: &mut [T]) {
        assert_eq!(sums.len(), self.m);
        sums.fill(T::zero());
        for (row, val) in zip(&self.rowval, &self.nzval) {
            sums[*row] += *val;
        }
    }

    /// BLAS-like general matrix-vector multiply: `y = a*A*x + b*y`
    pub fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert!(x.len() == self.n && y.len() == self.m);

        y.scale(b);
        for col in 0..self.n {
            let xcol = x[col] * a;
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                y[self.rowval[ptr]] += self.nzval[ptr] * xcol;
            }
        }
    }

    /// horizontal concatenation `[A B]`
    pub fn hcat(A: &Self, B: &Self) -> Self {
        assert_eq!(A.m, B.m);

        let mut colptr = Vec::with_capacity(A.n + B.n + 1);
        colptr.extend_from_slice(&A.colptr);
        colptr.extend(B.colptr[1..].iter().map(|p| p + A.nnz()));

        let mut rowval = Vec::with_capacity(A.nnz() + B.nnz());
        rowval.extend_from_slice(&A.rowval);
        rowval.extend_from_slice(&B.rowval);

        let mut nzval = Vec::with_capacity(A.nnz() + B.nnz());
        nzval.extend_from_slice(&A.nzval);
        nzval.extend_from_slice(&B.nzval);

        CscMatrix::new(A.m, A.n + B.n, colptr, rowval, nzval)
    }

    /// vertical concatenation `[A; B]`
    pub fn vcat(A: &Self, B: &Self) -> Self {
        assert_eq!(A.n, B.n);

        let mut C = CscMatrix::spalloc((A.m + B.m, A.n), A.nnz() + B.nnz());

        let mut ptr = 0;
        for col in 0..A.n {
            C.colptr[col] = ptr;
            for p in A.colptr[col]..A.colptr[col + 1] {
                C.rowval[ptr] = A.rowval[p];
                C.nzval[ptr] = A.nzval[p];
                ptr += 1;
            }
            for p in B.colptr[col]..B.colptr[col + 1] {
                C.rowval[ptr] = B.rowval[p] + A.m;
                C.nzval[ptr] = B.nzval[p];
                ptr += 1;
            }
        }
        C.colptr[A.n] = ptr;
        C
    }

    /// block diagonal concatenation of a sequence of matrices
    pub fn blockdiag(mats: &[&Self]) -> Result<Self, SparseFormatError> {
        if mats.is_empty() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        let nnz = mats.iter().map(|M| M.nnz()).sum();
        let m = mats.iter().map(|M| M.m).sum();
        let n = mats.iter().map(|M| M.n).sum();
        let mut C = CscMatrix::spalloc((m, n), nnz);

        let (mut rowbase, mut colbase, mut ptr) = (0, 0, 0);
        for M in mats {
            for col in 0..M.n {
                C.colptr[colbase + col] = ptr;
                for p in M.colptr[col]..M.colptr[col + 1] {
                    C.rowval[ptr] = M.rowval[p] + rowbase;
                    C.nzval[ptr] = M.nzval[p];
                    ptr += 1;
                }
            }
            rowbase += M.m;
            colbase += M.n;
        }
        C.colptr[n] = ptr;
        Ok(C)
    }

    /// 2 x 2 block concatenation `[[A B];[C D]]`
    pub fn hvcat(blocks: &[&[&Self; 2]; 2]) -> Result<Self, SparseFormatError> {
        let top = Self::hcat(blocks[0][0], blocks[0][1]);
        let bot = Self::hcat(blocks[1][0], blocks[1][1]);
        if top.n != bot.n {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        Ok(Self::vcat(&top, &bot))
    }

    /// number of structural entries on the diagonal
    pub fn count_diagonal_entries(&self) -> usize {
        let mut count = 0;
        for col in 0..self.n {
            if self.get_entry((col, col)).is_some() {
                count += 1;
            }
        }
        count
    }
}

impl<'a, T> Adjoint<'a, CscMatrix<T>>
where
    T: FloatT,
{
    /// BLAS-like multiply with the transposed matrix: `y = a*A'*x + b*y`
    pub fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert!(x.len() == A.m && y.len() == A.n);

        y.scale(b);
        for (col, yi) in y.iter_mut().enumerate() {
            let mut acc = T::zero();
            for ptr in A.colptr[col]..A.colptr[col + 1] {
                acc += A.nzval[ptr] * x[A.rowval[ptr]];
            }
            *yi += a * acc;
        }
    }
}

impl<'a, T> Symmetric<'a, CscMatrix<T>>
where
    T: FloatT,
{
    /// BLAS-like symmetric multiply: `y = a*A*x + b*y` where only the
    /// upper triangle of A is stored.
    pub fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert!(A.is_square() && x.len() == A.n && y.len() == A.n);

        y.scale(b);
        for col in 0..A.n {
            for ptr in A.colptr[col]..A.colptr[col + 1] {
                let row = A.rowval[ptr];
                let val = A.nzval[ptr];
                y[row] += a * val * x[col];
                if row != col {
                    y[col] += a * val * x[row];
                }
            }
        }
    }

    /// columnwise infinity norms of the full symmetric matrix,
    /// accumulated onto the existing `norms`
    pub fn col_norms_no_reset(&self, norms: &mut [T]) {
        let A = self.src;
        assert_eq!(norms.len(), A.n);
        for col in 0..A.n {
            for ptr in A.colptr[col]..A.colptr[col + 1] {
                let row = A.rowval[ptr];
                let absval = T::abs(A.nzval[ptr]);
                norms[col] = T::max(norms[col], absval);
                if row != col {
                    norms[row] = T::max(norms[row], absval);
                }
            }
        }
    }
}

// dense array conversion, principally for testing

impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for CscMatrix<T>
where
    T: FloatT,
{
    fn from(data: &[[T; C]; R]) -> Self {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for (r, rowdata) in data.iter().enumerate() {
            for (c, &v) in rowdata.iter().enumerate() {
                if v != T::zero() {
                    rows.push(r);
                    cols.push(c);
                    vals.push(v);
                }
            }
        }
        CscMatrix::new_from_triplets(R, C, rows, cols, vals)
    }
}

// -------------
// testing

#[test]
fn test_csc_from_dense_and_get_entry() {
    let A = CscMatrix::from(&[
        [1., 0., 3.], //
        [0., 2., 0.], //
    ]);
    assert_eq!(A.size(), (2, 3));
    assert_eq!(A.nnz(), 3);
    assert_eq!(A.get_entry((0, 2)), Some(3.));
    assert_eq!(A.get_entry((1, 0)), None);
    assert!(A.check_format().is_ok());
}

#[test]
fn test_csc_gemv() {
    let A = CscMatrix::from(&[
        [1., 2.], //
        [3., 4.], //
        [5., 6.], //
    ]);
    let x = vec![1., -1.];
    let mut y = vec![1., 1., 1.];
    A.gemv(&mut y, &x, 2., 1.);
    assert_eq!(y, vec![-1., -1., -1.]);

    let mut z = vec![0., 0.];
    A.t().gemv(&mut z, &[1., 1., 1.], 1., 0.);
    assert_eq!(z, vec![9., 12.]);
}

#[test]
fn test_csc_symv() {
    // full matrix [2 1; 1 3] stored triu
    let P = CscMatrix::from(&[
        [2., 1.], //
        [0., 3.], //
    ]);
    let mut y = vec![0., 0.];
    P.sym().symv(&mut y, &[1., 1.], 1., 0.);
    assert_eq!(y, vec![3., 4.]);
}

#[test]
fn test_csc_transpose_and_concat() {
    let A = CscMatrix::from(&[
        [1., 0.], //
        [2., 3.], //
    ]);
    let At = A.transpose();
    assert_eq!(At.get_entry((0, 1)), Some(2.));
    assert_eq!(At.get_entry((1, 0)), None);

    let H = CscMatrix::hcat(&A, &At);
    assert_eq!(H.size(), (2, 4));
    let V = CscMatrix::vcat(&A, &At);
    assert_eq!(V.size(), (4, 2));
    assert_eq!(V.get_entry((2, 1)), Some(2.));

    let B = CscMatrix::blockdiag(&[&A, &At]).unwrap();
    assert_eq!(B.size(), (4, 4));
    assert_eq!(B.get_entry((2, 3)), Some(2.));
}

#[test]
fn test_csc_set_entry_inserts() {
    let mut A: CscMatrix<f64> = CscMatrix::identity(3);
    A.set_entry((2, 1), 5.);
    assert_eq!(A.nnz(), 4);
    assert_eq!(A.get_entry((2, 1)), Some(5.));
    assert!(A.check_format().is_ok());

    A.set_entry((2, 1), 7.);
    assert_eq!(A.nnz(), 4);
    assert_eq!(A.get_entry((2, 1)), Some(7.));
}
