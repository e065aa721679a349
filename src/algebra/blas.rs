#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(clippy::too_many_arguments)]

// standard imports via blas-lapack-rs crates
extern crate blas_src;
extern crate lapack_src;
use blas::*;
use lapack::*;

pub trait BlasFloatT:
    private::BlasFloatSealed
    + XsyevrScalar
    + XpotrfScalar
    + XpotrsScalar
    + XgemmScalar
{}

impl BlasFloatT for f32 {}
impl BlasFloatT for f64 {}

mod private {
    pub trait BlasFloatSealed {}
    impl BlasFloatSealed for f32 {}
    impl BlasFloatSealed for f64 {}
}

// --------------------------------------
// ?syevr : Symmetric eigen decomposition
// --------------------------------------

pub trait XsyevrScalar: Sized {
    fn xsyevr(
        jobz: u8, range: u8, uplo: u8, n: i32, a: &mut [Self], lda: i32, vl: Self, vu: Self, il: i32, iu: i32,
        abstol: Self, m: &mut i32, w: &mut [Self], z: &mut [Self], ldz: i32, isuppz: &mut [i32],
        work: &mut [Self], lwork: i32, iwork: &mut [i32], liwork: i32, info: &mut i32,
    );
}

macro_rules! impl_blas_xsyevr {
    ($T:ty, $XSYEVR:path) => {
        impl XsyevrScalar for $T {
            fn xsyevr(
                jobz: u8, range: u8, uplo: u8, n: i32, a: &mut [Self], lda: i32, vl: Self, vu: Self, il: i32, iu: i32,
                abstol: Self, m: &mut i32, w: &mut [Self], z: &mut [Self], ldz: i32, isuppz: &mut [i32],
                work: &mut [$T], lwork: i32, iwork: &mut [i32], liwork: i32, info: &mut i32,
            ) {
                unsafe{
                    $XSYEVR(
                        jobz, range, uplo, n, a, lda, vl, vu, il, iu, abstol, m,
                        w, z, ldz, isuppz, work, lwork, iwork, liwork, info,
                    );
                }
            }
        }
    };
}

impl_blas_xsyevr!(f32, ssyevr);
impl_blas_xsyevr!(f64, dsyevr);

// --------------------------------------
// ?potrf : Cholesky decomposition
// --------------------------------------

pub trait XpotrfScalar: Sized {
    fn xpotrf(uplo: u8, n: i32, a: &mut [Self], lda: i32, info: &mut i32);
}

macro_rules! impl_blas_xpotrf {
    ($T:ty, $XPOTRF:path) => {
        impl XpotrfScalar for $T {
            fn xpotrf(uplo: u8, n: i32, a: &mut [Self], lda: i32, info: &mut i32) {
                unsafe{ $XPOTRF(uplo, n, a, lda, info); }
            }
        }
    };
}

impl_blas_xpotrf!(f32, spotrf);
impl_blas_xpotrf!(f64, dpotrf);

// --------------------------------------
// ?potrs : triangular solve from Cholesky factors
// --------------------------------------

pub trait XpotrsScalar: Sized {
    fn xpotrs(uplo: u8, n: i32, nrhs: i32, a: &[Self], lda: i32, b: &mut [Self], ldb: i32, info: &mut i32);
}

macro_rules! impl_blas_xpotrs {
    ($T:ty, $XPOTRS:path) => {
        impl XpotrsScalar for $T {
            fn xpotrs(uplo: u8, n: i32, nrhs: i32, a: &[Self], lda: i32, b: &mut [Self], ldb: i32, info: &mut i32) {
                unsafe{ $XPOTRS(uplo, n, nrhs, a, lda, b, ldb, info); }
            }
        }
    };
}

impl_blas_xpotrs!(f32, spotrs);
impl_blas_xpotrs!(f64, dpotrs);

// --------------------------------------
// ?gemm : general matrix-matrix multiply
// --------------------------------------

pub trait XgemmScalar: Sized {
    fn xgemm(
        transa: u8, transb: u8, m: i32, n: i32, k: i32, alpha: Self, a: &[Self], lda: i32,
        b: &[Self], ldb: i32, beta: Self, c: &mut [Self], ldc: i32,
    );
}

macro_rules! impl_blas_xgemm {
    ($T:ty, $XGEMM:path) => {
        impl XgemmScalar for $T {
            fn xgemm(
                transa: u8, transb: u8, m: i32, n: i32, k: i32, alpha: Self, a: &[Self], lda: i32,
                b: &[Self], ldb: i32, beta: Self, c: &mut [Self], ldc: i32,
            ) {
                unsafe{ $XGEMM(transa, transb, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc); }
            }
        }
    };
}

impl_blas_xgemm!(f32, sgemm);
impl_blas_xgemm!(f64, dgemm);
