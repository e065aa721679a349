#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::solver::core::cones::{Cone, CompositeCone};

// ---------------
// infeasibility certificates from iterate differences
// ---------------

// A diverging dual sequence certifies primal infeasibility when the
// difference direction δy satisfies, in the units of the original
// problem,
//
//   ‖A'δy‖∞ ≤ ε,     ⟨b, δy⟩ + σ_𝒦(-δy) ≤ -ε
//
// with δy normalized.  The support term reduces to a dual cone
// membership test for proper cones and to a finite sum for boxes.
//
// All arithmetic below runs on the equilibrated data, with the inverse
// scalings folded into each norm and inner product.

pub(crate) fn is_primal_infeasible<T: FloatT>(
    variables: &mut DefaultVariables<T>,
    data: &DefaultProblemData<T>,
    cones: &mut CompositeCone<T>,
    settings: &DefaultSettings<T>,
) -> bool {
    let eq = &data.equilibration;
    let eps = settings.eps_prim_inf;
    let δy = &mut variables.δy;

    // unscaled magnitude of the direction: ‖c⁻¹ E δy‖∞
    let norm_δy = δy.norm_inf_scaled(&eq.e) * eq.cinv;
    if !(norm_δy > eps) {
        return false;
    }
    δy.scale(T::recip(norm_δy));

    // ‖A'δy‖∞ in original units is c⁻¹‖D⁻¹ Â'δy‖∞
    data.A
        .t()
        .gemv(&mut variables.x_tl, δy, T::one(), T::zero());
    let norm_Atδy = variables.x_tl.norm_inf_scaled(&eq.dinv) * eq.cinv;
    if norm_Atδy > eps {
        return false;
    }

    // ⟨b, δy⟩ + σ_𝒦(-δy), evaluated in the scaled frame where both
    // terms pick up the same factor of c⁻¹
    let bδy = data.b.dot(δy) * eq.cinv;

    variables.ls.scalarop_from(|v| -v, δy);
    let support = cones.support_function(&variables.ls, eps) * eq.cinv;

    if support == T::infinity() {
        return false;
    }

    bδy + support <= -eps
}

// A diverging primal sequence certifies dual infeasibility when the
// difference direction δx satisfies, in original units,
//
//   ‖P δx‖∞ ≤ ε,    ⟨q, δx⟩ ≤ -ε,    -A δx ∈ 𝒦^∞
//
// with δx normalized and 𝒦^∞ the recession cone of 𝒦.  The slack
// moves along -A δx since s = b - Ax on the feasible manifold.

pub(crate) fn is_dual_infeasible<T: FloatT>(
    variables: &mut DefaultVariables<T>,
    data: &DefaultProblemData<T>,
    cones: &mut CompositeCone<T>,
    settings: &DefaultSettings<T>,
) -> bool {
    let eq = &data.equilibration;
    let eps = settings.eps_dual_inf;
    let δx = &mut variables.δx;

    // unscaled magnitude: ‖D δx‖∞
    let norm_δx = δx.norm_inf_scaled(&eq.d);
    if !(norm_δx > eps) {
        return false;
    }
    δx.scale(T::recip(norm_δx));

    // ⟨q, δx⟩ in original units
    let qδx = data.q.dot(δx) * eq.cinv;
    if !(qδx <= -eps) {
        return false;
    }

    // ‖P δx‖∞ in original units is c⁻¹‖D⁻¹ P̂ δx‖∞
    data.P
        .sym()
        .symv(&mut variables.x_tl, δx, T::one(), T::zero());
    let norm_Pδx = variables.x_tl.norm_inf_scaled(&eq.dinv) * eq.cinv;
    if norm_Pδx > eps {
        return false;
    }

    // the slack direction -A δx must lie in the recession cone of
    // the constraint set
    data.A.gemv(&mut variables.ls, δx, -T::one(), T::zero());
    cones.in_recession(&variables.ls, eps)
}
