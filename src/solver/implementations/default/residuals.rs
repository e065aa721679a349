#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use itertools::izip;

// ---------------
// residuals of the optimality conditions
// ---------------

/// Primal and dual residuals, reported in the units of the original
/// (unscaled) problem.
pub struct DefaultResiduals<T> {
    /// ∞-norm of Ax + s - b
    pub r_prim: T,
    /// ∞-norm of Px + q + A'μ
    pub r_dual: T,

    // reference norms for relative termination and for the
    // residual-balancing penalty update
    pub(crate) max_norm_prim: T,
    pub(crate) max_norm_dual: T,

    // objective value, unscaled
    pub(crate) cost: T,

    // workspaces
    vn: Vec<T>,
    vm: Vec<T>,
}

impl<T> DefaultResiduals<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            r_prim: T::infinity(),
            r_dual: T::infinity(),
            max_norm_prim: T::one(),
            max_norm_dual: T::one(),
            cost: T::zero(),
            vn: vec![T::zero(); n],
            vm: vec![T::zero(); m],
        }
    }

    // recompute all residual information from the current iterate.
    // The data is held in equilibrated form, so every norm is taken
    // through the inverse scalings.
    pub fn update(&mut self, variables: &DefaultVariables<T>, data: &DefaultProblemData<T>) {
        let eq = &data.equilibration;

        // primal residual:  r_prim = ‖E⁻¹(Ax + s - b)‖∞
        // with reference norms of the individual terms
        data.A.gemv(&mut self.vm, &variables.x, T::one(), T::zero());
        let norm_Ax = self.vm.norm_inf_scaled(&eq.einv);

        let norm_s = variables.s.norm_inf_scaled(&eq.einv);
        let norm_b = data.b.norm_inf_scaled(&eq.einv);

        for (vmi, &si, &bi) in izip!(self.vm.iter_mut(), &variables.s, &data.b) {
            *vmi += si - bi;
        }
        self.r_prim = self.vm.norm_inf_scaled(&eq.einv);
        self.max_norm_prim = T::max(norm_Ax, T::max(norm_s, norm_b));

        // dual residual:  r_dual = c⁻¹‖D⁻¹(Px + q + A'μ)‖∞
        data.P
            .sym()
            .symv(&mut self.vn, &variables.x, T::one(), T::zero());
        let xPx = self.vn.dot(&variables.x);
        let norm_Px = self.vn.norm_inf_scaled(&eq.dinv) * eq.cinv;

        let qx = data.q.dot(&variables.x);
        let norm_q = data.q.norm_inf_scaled(&eq.dinv) * eq.cinv;

        for (vni, &qi) in self.vn.iter_mut().zip(data.q.iter()) {
            *vni += qi;
        }

        // vn += A'(-μ), tracking the norm of the product on its own.
        // The splitting iterate carries the dual with reversed sign
        // relative to the reported multiplier, for which
        // Px + q + A'μ = 0 holds at optimality.
        let mut norm_Atμ = T::zero();
        {
            let A = &data.A;
            for (col, vni) in self.vn.iter_mut().enumerate() {
                let mut acc = T::zero();
                for ptr in A.colptr[col]..A.colptr[col + 1] {
                    acc += A.nzval[ptr] * variables.μ[A.rowval[ptr]];
                }
                norm_Atμ = T::max(norm_Atμ, T::abs(acc * eq.dinv[col]));
                *vni -= acc;
            }
            norm_Atμ *= eq.cinv;
        }

        self.r_dual = self.vn.norm_inf_scaled(&eq.dinv) * eq.cinv;
        self.max_norm_dual = T::max(norm_Px, T::max(norm_q, norm_Atμ));

        // unscaled objective
        let half = T::from_f64(0.5).unwrap();
        self.cost = (half * xPx + qx) * eq.cinv;
    }

    pub fn has_converged(&self, settings: &DefaultSettings<T>) -> bool {
        let eps_prim = settings.eps_abs + settings.eps_rel * self.max_norm_prim;
        let eps_dual = settings.eps_abs + settings.eps_rel * self.max_norm_dual;
        self.r_prim <= eps_prim && self.r_dual <= eps_dual
    }

    // normalized residual ratio used by the residual balancing
    // penalty update
    pub(crate) fn rho_adaptation_ratio(&self) -> Option<T> {
        let tiny = T::epsilon();
        if self.max_norm_prim <= tiny || self.max_norm_dual <= tiny {
            return None;
        }
        let rp = self.r_prim / self.max_norm_prim;
        let rd = self.r_dual / self.max_norm_dual;
        if rp <= tiny || rd <= tiny {
            return None;
        }
        Some(T::sqrt(rp / rd))
    }
}
