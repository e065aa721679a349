#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::solver::core::cones::{Cone, CompositeCone};

// ---------------
// Ruiz equilibration
// ---------------

/// Data from the Ruiz equilibration procedure.
///
/// Fields d, e and their inverses are vectors of scaling values to be
/// treated as diagonal scaling matrices; c is the overall scaling of
/// the objective.
pub struct DefaultEquilibrationData<T> {
    /// variable scaling
    pub d: Vec<T>,
    /// inverse variable scaling
    pub dinv: Vec<T>,
    /// constraint row scaling
    pub e: Vec<T>,
    /// inverse constraint row scaling
    pub einv: Vec<T>,
    /// cost scaling
    pub c: T,
    /// inverse cost scaling
    pub cinv: T,
}

impl<T> DefaultEquilibrationData<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            dinv: vec![T::one(); n],
            e: vec![T::one(); m],
            einv: vec![T::one(); m],
            c: T::one(),
            cinv: T::one(),
        }
    }
}

// Iterative diagonal scaling that asymptotically equalizes the row and
// column ∞-norms of [P A'; A 0], together with a scalar scaling of the
// cost terms.  Mutates the problem data in place and accumulates the
// applied scalings into `data.equilibration`.

pub(crate) fn equilibrate_ruiz<T: FloatT>(
    data: &mut DefaultProblemData<T>,
    cones: &mut CompositeCone<T>,
    settings: &DefaultSettings<T>,
) {
    let (n, m) = (data.n, data.m);
    let eq = &mut data.equilibration;

    let min_s = settings.min_scaling;
    let max_s = settings.max_scaling;

    let mut dwork = vec![T::one(); n];
    let mut ework = vec![T::one(); m];

    for _ in 0..settings.scaling {
        // column ∞-norms of [P; A], with P treated as symmetric
        dwork.fill(T::zero());
        data.P.sym().col_norms_no_reset(&mut dwork);
        data.A.col_norms_no_reset(&mut dwork);

        // row ∞-norms of A
        data.A.row_norms(&mut ework);

        // clamp into the allowed scaling range, mapping vanishing
        // norms to one, then take the inverse square roots
        dwork.clip(min_s, max_s, T::one(), max_s);
        ework.clip(min_s, max_s, T::one(), max_s);
        dwork.rsqrt();
        ework.rsqrt();

        // apply the scalings and accumulate
        data.P.lrscale(&dwork, &dwork);
        data.A.lrscale(&ework, &dwork);
        data.q.hadamard(&dwork);
        data.b.hadamard(&ework);
        eq.d.hadamard(&dwork);
        eq.e.hadamard(&ework);

        // scalar scaling of the cost: mean column norm of the freshly
        // scaled P against the norm of q
        dwork.fill(T::zero());
        data.P.sym().col_norms_no_reset(&mut dwork);
        let γ = dwork.mean();
        let η = data.q.norm_inf().clip(min_s, max_s, T::one(), max_s);

        let scale_cost = T::max(γ, η).clip(min_s, max_s, T::one(), max_s);
        let c_tmp = T::recip(scale_cost);

        data.P.scale(c_tmp);
        data.q.scale(c_tmp);
        eq.c *= c_tmp;
    }

    // rectify the scalings of cone blocks that only admit a scalar:
    // replace e on those blocks by its blockwise mean
    let mut δ = vec![T::one(); m];
    if cones.rectify_equilibration(&mut δ, &eq.e) {
        // reapply only the E part of the correction
        data.A.lscale(&δ);
        data.b.hadamard(&δ);
        eq.e.hadamard(&δ);
    }

    // let cones carrying data in problem units rescale themselves
    cones.scale_units(&eq.e);

    eq.dinv.scalarop_from(T::recip, &eq.d);
    eq.einv.scalarop_from(T::recip, &eq.e);
    eq.cinv = T::recip(eq.c);
}

// undo the equilibration on a solved iterate, returning the variables
// to the units of the original problem

pub(crate) fn reverse_scaling<T: FloatT>(
    eq: &DefaultEquilibrationData<T>,
    variables: &mut DefaultVariables<T>,
) {
    variables.x.hadamard(&eq.d);
    variables.s.hadamard(&eq.einv);

    variables.μ.hadamard(&eq.e);
    variables.μ.scale(eq.cinv);
    variables.ν.hadamard(&eq.e);
    variables.ν.scale(eq.cinv);
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SupportedConeT::*;

    #[test]
    fn test_scaling_round_trip() {
        let P = CscMatrix::from(&[
            [100., 1.], //
            [0., 0.01], //
        ]);
        let A = CscMatrix::from(&[
            [10., -3.], //
            [0., 5.],   //
            [2., 2.],   //
        ]);
        let q = vec![1., -20.];
        let b = vec![1., 2., 3.];

        let mut cones = CompositeCone::new(&[NonnegativeConeT(3)]);
        let mut data = DefaultProblemData::new(&P, &q, &A, &b, &cones).unwrap();
        let settings = DefaultSettings::<f64>::default();

        equilibrate_ruiz(&mut data, &mut cones, &settings);
        let eq = &data.equilibration;

        // scalings are positive and mutually inverse
        assert!(eq.d.iter().all(|&v| v > 0.0));
        assert!(eq.e.iter().all(|&v| v > 0.0));
        assert!(eq.c > 0.0);
        for (d, dinv) in eq.d.iter().zip(eq.dinv.iter()) {
            assert!((d * dinv - 1.0).abs() < 1e-14);
        }
        for (e, einv) in eq.e.iter().zip(eq.einv.iter()) {
            assert!((e * einv - 1.0).abs() < 1e-14);
        }

        // scaled data reproduces the original data when unscaled:
        // A_orig = E⁻¹ Â D⁻¹
        let mut Aun = data.A.clone();
        Aun.lrscale(&eq.einv, &eq.dinv);
        assert!((Aun.get_entry((0, 0)).unwrap() - 10.).abs() < 1e-12);
        assert!((Aun.get_entry((2, 1)).unwrap() - 2.).abs() < 1e-12);

        // P_orig = c⁻¹ D⁻¹ P̂ D⁻¹
        let mut Pun = data.P.clone();
        Pun.lrscale(&eq.dinv, &eq.dinv);
        Pun.scale(eq.cinv);
        assert!((Pun.get_entry((0, 0)).unwrap() - 100.).abs() < 1e-10);
        assert!((Pun.get_entry((1, 1)).unwrap() - 0.01).abs() < 1e-12);

        // iterate round trip: scale then reverse
        let mut vars = DefaultVariables::<f64>::new(2, 3);
        vars.x.copy_from(&[1., 2.]);
        vars.s.copy_from(&[3., 4., 5.]);
        vars.μ.copy_from(&[6., 7., 8.]);
        vars.ν.copy_from(&[9., 10., 11.]);

        // into scaled units, as a warm start would be
        vars.x.hadamard(&eq.dinv);
        vars.s.hadamard(&eq.e);
        vars.μ.hadamard(&eq.einv);
        vars.μ.scale(eq.c);
        vars.ν.hadamard(&eq.einv);
        vars.ν.scale(eq.c);

        reverse_scaling(eq, &mut vars);

        assert!(vars.x.norm_inf_diff(&[1., 2.]) < 1e-12);
        assert!(vars.s.norm_inf_diff(&[3., 4., 5.]) < 1e-12);
        assert!(vars.μ.norm_inf_diff(&[6., 7., 8.]) < 1e-12);
        assert!(vars.ν.norm_inf_diff(&[9., 10., 11.]) < 1e-12);
    }

    #[test]
    fn test_scalar_rectification_for_soc() {
        let P = CscMatrix::<f64>::zeros((2, 2));
        let A = CscMatrix::from(&[
            [100., 0.], //
            [0., 0.1],  //
            [1., 1.],   //
        ]);
        let q = vec![1., 1.];
        let b = vec![0., 0., 0.];

        let mut cones = CompositeCone::new(&[SecondOrderConeT(3)]);
        let mut data = DefaultProblemData::new(&P, &q, &A, &b, &cones).unwrap();
        let settings = DefaultSettings::<f64>::default();

        equilibrate_ruiz(&mut data, &mut cones, &settings);

        // the cone block of e must have collapsed to a single value
        let e = &data.equilibration.e;
        assert!((e[0] - e[1]).abs() < 1e-12);
        assert!((e[1] - e[2]).abs() < 1e-12);
    }
}
