use thiserror::Error;

/// Matrix orientation marker for multiplication-like operations
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MatrixShape {
    /// matrix is used in its given form
    N,
    /// matrix is transposed
    T,
}

/// Marker for the triangular part of a symmetric matrix
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MatrixTriangle {
    /// upper triangular
    Triu,
    /// lower triangular
    Tril,
}

impl MatrixTriangle {
    /// convert to u8 character for BLAS calls
    pub fn as_blas_char(&self) -> u8 {
        match self {
            MatrixTriangle::Triu => b'U',
            MatrixTriangle::Tril => b'L',
        }
    }
}

/// Transposed view of a matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjoint<'a, M> {
    /// the underlying matrix
    pub src: &'a M,
}

/// Symmetric view of a matrix whose upper triangle is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symmetric<'a, M> {
    /// the underlying (upper triangular) matrix
    pub src: &'a M,
}

/// Error type returned by sparse matrix assembly
#[derive(Error, Debug)]
pub enum SparseFormatError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    BadRowval,
    #[error("Bad column pointer values")]
    BadColptr,
}

/// Error type returned by dense factorization engines
#[derive(Error, Debug)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Eigendecomposition error")]
    Eigen(i32),
    #[error("Cholesky error")]
    Cholesky(i32),
}
