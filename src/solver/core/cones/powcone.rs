use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Power Cone and its dual
//
//   K_α  = { (x,y,z) : x^α y^{1-α} ≥ |z|, x,y ≥ 0 }
//   K_α* = { (u,v,w) : (u/α)^α (v/(1-α))^{1-α} ≥ |w|, u,v ≥ 0 }
//
// The projection follows the standard approach of bisecting on the
// magnitude r = |z*| of the third coordinate of the projection.
// -------------------------------------

pub struct PowerCone<T> {
    α: T,
    phantom: PhantomData<T>,
}

impl<T> PowerCone<T>
where
    T: FloatT,
{
    pub fn new(α: T) -> Self {
        assert!(
            α > T::zero() && α < T::one(),
            "Power cone requires 0 < α < 1"
        );
        Self {
            α,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for PowerCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        3
    }

    fn project(&mut self, x: &mut [T]) {
        project_pow_cone(x, self.α);
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        in_pow_cone_dual(y, self.α, tol)
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        in_pow_cone(x, self.α, tol)
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        let neg = [-y[0], -y[1], -y[2]];
        if in_pow_cone_dual(&neg, self.α, tol) {
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

pub struct DualPowerCone<T> {
    α: T,
    phantom: PhantomData<T>,
}

impl<T> DualPowerCone<T>
where
    T: FloatT,
{
    pub fn new(α: T) -> Self {
        assert!(
            α > T::zero() && α < T::one(),
            "Power cone requires 0 < α < 1"
        );
        Self {
            α,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for DualPowerCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        3
    }

    fn project(&mut self, x: &mut [T]) {
        // Moreau:  Π_{K*}(v) = v + Π_K(-v)
        let mut w = [-x[0], -x[1], -x[2]];
        project_pow_cone(&mut w, self.α);
        for (xi, wi) in x.iter_mut().zip(w) {
            *xi += wi;
        }
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        in_pow_cone(y, self.α, tol)
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        in_pow_cone_dual(x, self.α, tol)
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        let neg = [-y[0], -y[1], -y[2]];
        if in_pow_cone(&neg, self.α, tol) {
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

// ---------------------------------------------
// membership tests
// ---------------------------------------------

pub(crate) fn in_pow_cone<T: FloatT>(v: &[T], α: T, tol: T) -> bool {
    let (x, y, z) = (v[0], v[1], v[2]);
    if x < -tol || y < -tol {
        return false;
    }
    let xp = T::max(x, T::zero());
    let yp = T::max(y, T::zero());
    T::powf(xp, α) * T::powf(yp, T::one() - α) + tol >= T::abs(z)
}

pub(crate) fn in_pow_cone_dual<T: FloatT>(v: &[T], α: T, tol: T) -> bool {
    let (u, w, t) = (v[0], v[1], v[2]);
    if u < -tol || w < -tol {
        return false;
    }
    let up = T::max(u, T::zero()) / α;
    let wp = T::max(w, T::zero()) / (T::one() - α);
    T::powf(up, α) * T::powf(wp, T::one() - α) + tol >= T::abs(t)
}

// ---------------------------------------------
// projection
// ---------------------------------------------

fn project_pow_cone<T: FloatT>(v: &mut [T], α: T) {
    // point already in the cone
    if in_pow_cone(v, α, T::zero()) {
        return;
    }

    // point in the polar cone projects to the origin
    let neg = [-v[0], -v[1], -v[2]];
    if in_pow_cone_dual(&neg, α, T::zero()) {
        v.fill(T::zero());
        return;
    }

    let half = T::from_f64(0.5).unwrap();
    let (xh, yh) = (v[0], v[1]);
    let rh = T::abs(v[2]);

    // bisection on r = |z*| ∈ [0, rh]
    let mut lb = T::zero();
    let mut ub = rh;
    let (mut x, mut y) = (T::zero(), T::zero());

    for _ in 0..200 {
        let r = half * (lb + ub);
        x = pow_calc_coord(r, xh, rh, α);
        y = pow_calc_coord(r, yh, rh, T::one() - α);
        let f = T::powf(x, α) * T::powf(y, T::one() - α) - r;
        if f < T::zero() {
            ub = r;
        } else {
            lb = r;
        }
        if ub - lb <= T::epsilon() * T::max(rh, T::one()) {
            break;
        }
    }

    let r = half * (lb + ub);
    v[0] = x;
    v[1] = y;
    v[2] = if v[2] < T::zero() { -r } else { r };
}

// coordinate of the projection for a trial r, from the stationarity
// conditions of the projection problem
fn pow_calc_coord<T: FloatT>(r: T, vh: T, rh: T, a: T) -> T {
    let four: T = T::from_f64(4.0).unwrap();
    let half: T = T::from_f64(0.5).unwrap();
    let x = half * (vh + T::sqrt(vh * vh + four * a * (rh - r) * r));
    T::max(x, T::epsilon())
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_projection(v: &[f64; 3], p: &[f64; 3], α: f64) {
        let tol = 1e-6;
        assert!(in_pow_cone(p, α, tol), "p = {:?} not in cone", p);

        // residual in the polar cone
        let d = [v[0] - p[0], v[1] - p[1], v[2] - p[2]];
        let negd = [-d[0], -d[1], -d[2]];
        assert!(
            in_pow_cone_dual(&negd, α, tol),
            "residual {:?} not polar",
            d
        );

        let ip: f64 = p.iter().zip(&d).map(|(a, b)| a * b).sum();
        assert!(ip.abs() <= tol, "complementarity violated: {}", ip);
    }

    #[test]
    fn test_pow_projection_cases() {
        let α = 0.6;
        let cases: [[f64; 3]; 5] = [
            [1., 1., 4.],
            [0.5, 2., -3.],
            [-1., 1., 1.],
            [2., -0.5, 0.3],
            [0., 0., 1.],
        ];

        for v in cases.iter() {
            let mut p = *v;
            project_pow_cone(&mut p, α);
            assert_is_projection(v, &p, α);

            // idempotence
            let mut p2 = p;
            project_pow_cone(&mut p2, α);
            assert!(p.iter().zip(&p2).all(|(a, b)| (a - b).abs() < 1e-6));
        }
    }

    #[test]
    fn test_pow_membership() {
        assert!(in_pow_cone(&[1., 1., 1.], 0.5, 1e-12));
        assert!(in_pow_cone(&[4., 1., 2.], 0.5, 1e-12));
        assert!(!in_pow_cone(&[1., 1., 1.5], 0.5, 1e-12));
        assert!(in_pow_cone_dual(&[1., 1., 2.], 0.5, 1e-12));
        assert!(!in_pow_cone_dual(&[1., 1., 2.1], 0.5, 1e-12));
    }
}
