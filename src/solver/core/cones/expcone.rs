use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Exponential Cone and its dual
//
//   K_exp  = cl{ (x,y,z) : y > 0,  y e^{x/y} ≤ z }
//   K_exp* = cl{ (u,v,w) : u < 0, -u e^{v/u} ≤ e w }
//
// The projection handles the analytical cases (point already in the
// cone, point in the polar cone, third quadrant) directly, and solves
// the remaining case through the KKT system of the projection problem,
// reduced to a univariate root in the ratio ρ = x/y.
// -------------------------------------

pub struct ExponentialCone<T> {
    phantom: PhantomData<T>,
}

impl<T> ExponentialCone<T>
where
    T: FloatT,
{
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for ExponentialCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        3
    }

    fn project(&mut self, x: &mut [T]) {
        project_exp_cone(x);
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        in_exp_cone_dual(y, tol)
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        in_exp_cone(x, tol)
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        // polar cone is -K_exp*
        let neg = [-y[0], -y[1], -y[2]];
        if in_exp_cone_dual(&neg, tol) {
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

pub struct DualExponentialCone<T> {
    phantom: PhantomData<T>,
}

impl<T> DualExponentialCone<T>
where
    T: FloatT,
{
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for DualExponentialCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        3
    }

    fn project(&mut self, x: &mut [T]) {
        // Moreau:  Π_{K*}(v) = v + Π_K(-v)
        let mut w = [-x[0], -x[1], -x[2]];
        project_exp_cone(&mut w);
        for (xi, wi) in x.iter_mut().zip(w) {
            *xi += wi;
        }
    }

    fn in_dual(&mut self, y: &[T], tol: T) -> bool {
        // the dual of the dual is the primal cone
        in_exp_cone(y, tol)
    }

    fn in_recession(&mut self, x: &[T], tol: T) -> bool {
        in_exp_cone_dual(x, tol)
    }

    fn support_function(&mut self, y: &[T], tol: T) -> T {
        let neg = [-y[0], -y[1], -y[2]];
        if in_exp_cone(&neg, tol) {
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

pub(crate) fn in_exp_cone<T: FloatT>(v: &[T], tol: T) -> bool {
    let (x, y, z) = (v[0], v[1], v[2]);
    if y > T::zero() {
        y * safe_exp(x / y) - z <= tol
    } else {
        // boundary face { (x,0,z) : x ≤ 0, z ≥ 0 }
        x <= tol && T::abs(y) <= tol && z >= -tol
    }
}

pub(crate) fn in_exp_cone_dual<T: FloatT>(v: &[T], tol: T) -> bool {
    let (u, w, t) = (v[0], v[1], v[2]);
    if u < T::zero() {
        -u * safe_exp(w / u) - T::E() * t <= tol
    } else {
        // boundary face { (0,v,w) : v ≥ 0, w ≥ 0 }
        T::abs(u) <= tol && w >= -tol && t >= -tol
    }
}

// exp with an overflow guard.  Arguments large enough to trip the
// guard correspond to points hopelessly far outside the cone.
fn safe_exp<T: FloatT>(x: T) -> T {
    let cap = T::from_f64(700.0).unwrap();
    T::exp(T::min(x, cap))
}

// ---------------------------------------------
// projection
// ---------------------------------------------

fn project_exp_cone<T: FloatT>(v: &mut [T]) {
    let (r, s, t) = (v[0], v[1], v[2]);

    // point already in the cone
    if in_exp_cone(v, T::zero()) {
        return;
    }

    // point in the polar cone projects to the origin
    let neg = [-r, -s, -t];
    if in_exp_cone_dual(&neg, T::zero()) {
        v.fill(T::zero());
        return;
    }

    // third quadrant face: analytic projection
    if r <= T::zero() && s <= T::zero() {
        v[1] = T::zero();
        v[2] = T::max(t, T::zero());
        return;
    }

    // remaining case: the projection (x,y,z) lies on the cone surface
    // with y > 0, and satisfies the stationarity system
    //    x - r + μ e^ρ           = 0
    //    y - s + μ e^ρ (1 - ρ)   = 0
    //    z - t - μ               = 0
    //    y e^ρ                   = z
    // where ρ = x/y and μ > 0 the multiplier.  Eliminating (x,z,μ)
    // leaves the univariate root problem g(ρ) = 0 below.
    let (ρa, ρb) = exp_bracket(r, s, t);
    let ρ = exp_bisect(r, s, t, ρa, ρb);

    let (y, _g) = exp_g(r, s, t, ρ);
    let y = T::max(y, T::zero());
    let α = safe_exp(ρ);
    v[0] = ρ * y;
    v[1] = y;
    v[2] = y * α;
}

// evaluate y(ρ) and the root function g(ρ)
fn exp_g<T: FloatT>(r: T, s: T, t: T, ρ: T) -> (T, T) {
    let α = safe_exp(ρ);
    let d = T::one() + α * α * (T::one() - ρ);
    let y = (s + t * α * (T::one() - ρ)) / d;
    let g = y * (ρ + α * α) - r - α * t;
    (y, g)
}

// a candidate ρ is admissible when it corresponds to a point on the
// cone surface with positive y and positive multiplier
fn exp_valid<T: FloatT>(r: T, s: T, t: T, ρ: T) -> bool {
    let α = safe_exp(ρ);
    let d = T::one() + α * α * (T::one() - ρ);
    if d <= T::zero() {
        return false;
    }
    let (y, _) = exp_g(r, s, t, ρ);
    y > T::zero() && y * α - t > T::zero()
}

// expanding scan for a sign change of g over admissible ρ
fn exp_bracket<T: FloatT>(r: T, s: T, t: T) -> (T, T) {
    let mut width = T::one();
    let cap = T::from_f64(700.0).unwrap();

    loop {
        let nsteps = 120;
        let step = (width + width) / T::from_usize(nsteps).unwrap();

        let mut prev: Option<(T, T)> = None;
        let mut ρ = -width;
        for _ in 0..=nsteps {
            if exp_valid(r, s, t, ρ) {
                let (_, g) = exp_g(r, s, t, ρ);
                if let Some((ρp, gp)) = prev {
                    if (gp <= T::zero() && g >= T::zero()) || (gp >= T::zero() && g <= T::zero()) {
                        return (ρp, ρ);
                    }
                }
                prev = Some((ρ, g));
            } else {
                prev = None;
            }
            ρ += step;
        }

        if width >= cap {
            // no admissible bracket: degenerate data.  Fall back to a
            // wide interval and let bisection settle on the boundary.
            return (-cap, cap);
        }
        width = T::min(width * T::from_f64(4.0).unwrap(), cap);
    }
}

fn exp_bisect<T: FloatT>(r: T, s: T, t: T, mut ρa: T, mut ρb: T) -> T {
    let (_, mut ga) = exp_g(r, s, t, ρa);

    for _ in 0..200 {
        let ρm = (ρa + ρb) * T::from_f64(0.5).unwrap();
        let (_, gm) = exp_g(r, s, t, ρm);

        if (ga <= T::zero()) == (gm <= T::zero()) {
            ρa = ρm;
            ga = gm;
        } else {
            ρb = ρm;
        }
        if T::abs(ρb - ρa) <= T::epsilon() * T::max(T::one(), T::abs(ρa)) {
            break;
        }
    }
    (ρa + ρb) * T::from_f64(0.5).unwrap()
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    // verify the Moreau conditions of an exact projection:
    // p ∈ K, (p - v) ∈ K*, ⟨p, p - v⟩ = 0
    fn assert_is_projection(v: &[f64; 3], p: &[f64; 3]) {
        let tol = 1e-7;
        assert!(in_exp_cone(p, tol), "p = {:?} not in cone", p);

        let d = [p[0] - v[0], p[1] - v[1], p[2] - v[2]];
        assert!(in_exp_cone_dual(&d, tol), "residual {:?} not dual", d);

        let ip: f64 = p.iter().zip(&d).map(|(a, b)| a * b).sum();
        assert!(ip.abs() <= tol, "complementarity violated: {}", ip);
    }

    #[test]
    fn test_exp_projection_cases() {
        let cases: [[f64; 3]; 6] = [
            [1., 1., 1.],
            [5., 0.1, 1.],
            [-2., 3., -1.],
            [0.5, 2., 10.],
            [1., 2., -3.],
            [-0.5, -0.5, 2.],
        ];

        for v in cases.iter() {
            let mut p = *v;
            project_exp_cone(&mut p);
            assert_is_projection(v, &p);

            // idempotence
            let mut p2 = p;
            project_exp_cone(&mut p2);
            assert!(p.iter().zip(&p2).all(|(a, b)| (a - b).abs() < 1e-7));
        }
    }

    #[test]
    fn test_exp_membership() {
        assert!(in_exp_cone(&[1., 1., std::f64::consts::E], 1e-12));
        assert!(in_exp_cone(&[-1., 0., 1.], 1e-12));
        assert!(!in_exp_cone(&[1., 1., 1.], 1e-12));

        assert!(in_exp_cone_dual(&[-1., 1., 1.], 1e-9));
        assert!(in_exp_cone_dual(&[0., 1., 1.], 1e-12));
        assert!(!in_exp_cone_dual(&[1., 1., 1.], 1e-12));
    }
}
