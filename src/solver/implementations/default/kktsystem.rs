#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::ldl::LdlError;
use crate::solver::core::cones::CompositeCone;
use crate::solver::core::kktsolvers::{DirectLdlKKTSolver, KKTSolver};

// ---------------
// KKT system driver for the splitting iteration
// ---------------

// factor in excess of the base penalty applied to equality rows,
// enforcing them more strictly
const EQUALITY_RHO_FACTOR: f64 = 1e3;

pub struct DefaultKKTSystem<T> {
    kktsolver: DirectLdlKKTSolver<T>,

    /// per-row penalty, piecewise constant over the cone blocks
    pub(crate) rho_vec: Vec<T>,
}

impl<T> DefaultKKTSystem<T>
where
    T: FloatT,
{
    pub fn new(
        data: &DefaultProblemData<T>,
        cones: &CompositeCone<T>,
        settings: &DefaultSettings<T>,
    ) -> Result<Self, LdlError> {
        let mut rho_vec = vec![T::zero(); data.m];
        fill_rho_vec(&mut rho_vec, settings.rho, cones, settings);

        let kktsolver = DirectLdlKKTSolver::new(&data.P, &data.A, settings.sigma, &rho_vec)?;

        Ok(Self { kktsolver, rho_vec })
    }

    // One linear system solve of the splitting iteration: assemble
    //   rhs = [σx - q;  b - s + μ/ρ]
    // and solve in place, leaving [x̃; ν] in variables.sol.
    pub(crate) fn solve_step(
        &mut self,
        variables: &mut DefaultVariables<T>,
        data: &DefaultProblemData<T>,
        settings: &DefaultSettings<T>,
    ) {
        let (n, m) = (data.n, data.m);
        let σ = settings.sigma;

        let (rhs_x, rhs_z) = variables.sol.split_at_mut(n);
        for i in 0..n {
            rhs_x[i] = σ * variables.x[i] - data.q[i];
        }
        for i in 0..m {
            rhs_z[i] = data.b[i] - variables.s[i] + variables.μ[i] / self.rho_vec[i];
        }

        self.kktsolver.solve(&mut variables.sol);

        variables.x_tl.copy_from(&variables.sol[0..n]);
        variables.ν.copy_from(&variables.sol[n..]);
    }

    // Replace the penalty and refactor the system.  The equality-row
    // multiplier is preserved.
    pub(crate) fn update_rho(
        &mut self,
        rho_new: T,
        cones: &CompositeCone<T>,
        settings: &DefaultSettings<T>,
    ) -> Result<(), LdlError> {
        fill_rho_vec(&mut self.rho_vec, rho_new, cones, settings);
        self.kktsolver.update_rho(&self.rho_vec)
    }
}

fn fill_rho_vec<T: FloatT>(
    rho_vec: &mut [T],
    rho: T,
    cones: &CompositeCone<T>,
    settings: &DefaultSettings<T>,
) {
    let rho = T::min(T::max(rho, settings.rho_min), settings.rho_max);
    let eq_factor: T = EQUALITY_RHO_FACTOR.as_T();

    for (i, rng) in cones.rng_cones.iter().enumerate() {
        let val = {
            if cones.is_zero_cone(i) {
                rho * eq_factor
            } else {
                rho
            }
        };
        rho_vec[rng.clone()].fill(val);
    }
}

// -------------
// testing

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SupportedConeT::*;

    #[test]
    fn test_rho_vec_equality_rows() {
        let cones = CompositeCone::new(&[ZeroConeT(2), NonnegativeConeT(3)]);
        let settings = DefaultSettings::<f64>::default();
        let mut rho_vec = vec![0.0; 5];
        fill_rho_vec(&mut rho_vec, 0.1, &cones, &settings);

        assert_eq!(rho_vec[0..2], [100.0, 100.0]);
        assert_eq!(rho_vec[2..5], [0.1, 0.1, 0.1]);
    }
}
