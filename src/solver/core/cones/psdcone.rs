use super::*;
use crate::algebra::*;

// ------------------------------------
// Positive Semidefinite Cone, in scaled triangular
// storage and in full (square) storage
// ------------------------------------

// shared workspace for the two storage variants
struct PSDConeWork<T> {
    engine: EigEngine<T>,
    M: Matrix<T>,
    workmat: Matrix<T>,
}

impl<T> PSDConeWork<T>
where
    T: FloatT,
{
    fn new(n: usize) -> Self {
        Self {
            engine: EigEngine::new(n),
            M: Matrix::zeros((n, n)),
            workmat: Matrix::zeros((n, n)),
        }
    }

    // eigenvalue clipping projection of the symmetric matrix in M
    fn project_psd(&mut self) {
        let n = self.M.nrows();
        if n == 0 {
            return;
        }

        self.workmat.data_mut().copy_from(self.M.data());
        self.engine
            .eigen(&mut self.workmat)
            .expect("eigendecomposition failure");

        // scale columns of V by the clipped eigenvalues into workmat,
        // then reassemble M = (V Λ⁺) V'
        {
            let λ = &self.engine.λ;
            let V = self.engine.V.as_ref().unwrap();
            for c in 0..n {
                let λc = T::max(λ[c], T::zero());
                for r in 0..n {
                    self.workmat[(r, c)] = V[(r, c)] * λc;
                }
            }
        }

        self.M.gemm(
            MatrixShape::N,
            MatrixShape::T,
            &self.workmat,
            self.engine.V.as_ref().unwrap(),
            T::one(),
            T::zero(),
        );
    }

    // smallest eigenvalue of the symmetric matrix in M (M is corrupted)
    fn min_eigenvalue(&mut self) -> T {
        if self.M.nrows() == 0 {
            return T::infinity();
        }
        self.engine
            .eigvals(&mut self.M)
            .expect("eigendecomposition failure");
        self.engine.λ.minimum()
    }

    fn max_eigenvalue(&mut self) -> T {
        if self.M.nrows() == 0 {
            return -T::infinity();
        }
        self.engine
            .eigvals(&mut self.M)
            .expect("eigendecomposition failure");
        self.engine.λ.maximum()
    }
}

// ------------------------------------
// triangular storage variant
// ------------------------------------

pub struct PSDTriangleCone<T> {
    n: usize,     // matrix side dimension
    numel: usize, // number of elements in the packed triangle
    work: Box<PSDConeWork<T>>,
}

impl<T> PSDTriangleCone<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            n,
            numel: triangular_number(n),
            work: Box::new(PSDConeWork::new(n)),
        }
    }
}

impl<T> Cone<T> for PSDTriangleCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.numel
    }

    fn project(&mut self, x: &mut [T]) {
        if self.n == 0 {
            return;
        }
        svec_to_mat(&mut self.work.M, x);
        self.work.project_psd();
        mat_to_svec(x, &self.work.M);
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        // self dual
        svec_to_mat(&mut self.work.M, y);
        self.work.min_eigenvalue() >= -tol
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        svec_to_mat(&mut self.work.M, x);
        self.work.min_eigenvalue() >= -tol
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        svec_to_mat(&mut self.work.M, y);
        if self.work.max_eigenvalue() <= tol {
            T::zero()
        } else {
            T::infinity()
        }
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        δ.copy_from(e).recip().scale(e.mean());
        true // scalar equilibration
    }

    fn scale_units(&mut self, _e: &[T]) {
        // nothing to do
    }
}

// ------------------------------------
// full (square) storage variant
// ------------------------------------

pub struct PSDCone<T> {
    n: usize,     // matrix side dimension
    numel: usize, // n^2 stored elements
    work: Box<PSDConeWork<T>>,
}

impl<T> PSDCone<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            n,
            numel: n * n,
            work: Box::new(PSDConeWork::new(n)),
        }
    }

    // load column-stacked square data, symmetrizing as we go
    fn load(&mut self, x: &[T]) {
        self.work.M.data_mut().copy_from(x);
        self.work.M.symmetric_part();
    }
}

impl<T> Cone<T> for PSDCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.numel
    }

    fn project(&mut self, x: &mut [T]) {
        if self.n == 0 {
            return;
        }
        self.load(x);
        self.work.project_psd();
        x.copy_from(self.work.M.data());
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        self.load(y);
        self.work.min_eigenvalue() >= -tol
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        self.load(x);
        self.work.min_eigenvalue() >= -tol
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        self.load(y);
        if self.work.max_eigenvalue() <= tol {
            T::zero()
        } else {
            T::infinity()
        }
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        δ.copy_from(e).recip().scale(e.mean());
        true // scalar equilibration
    }

    fn scale_units(&mut self, _e: &[T]) {
        // nothing to do
    }
}
