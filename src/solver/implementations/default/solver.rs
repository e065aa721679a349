#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use itertools::izip;
use crate::solver::chordal::ChordalInfo;
use crate::solver::core::cones::{Cone, CompositeCone, SupportedConeT};
use crate::solver::core::{SolverError, SolverStatus};
use crate::timers::Timers;

// ---------------
// the main solver type
// ---------------

/// ADMM solver for conic quadratic programs
///
/// Solves problems of the form
/// ```text
///   minimize    ½ x'Px + q'x
///   subject to  Ax + s = b,  s ∈ 𝒦
/// ```
/// with P symmetric positive semidefinite and 𝒦 a Cartesian product
/// of supported cones.
pub struct DefaultSolver<T = f64>
where
    T: FloatT,
{
    pub data: DefaultProblemData<T>,
    pub cones: CompositeCone<T>,
    pub variables: DefaultVariables<T>,
    pub residuals: DefaultResiduals<T>,
    pub kktsystem: DefaultKKTSystem<T>,
    pub solution: DefaultSolution<T>,
    pub settings: DefaultSettings<T>,

    // decomposition data when PSD cones were chordally decomposed
    chordal_info: Option<ChordalInfo<T>>,

    // (n, m) of the problem as provided by the user
    orig_dims: (usize, usize),

    // current scalar penalty
    rho: T,

    timers: Timers,
}

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    /// Set up a new solver instance from problem data.
    ///
    /// Configuration and dimension errors are rejected here; no solve
    /// is attempted on malformed input.
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        b: &[T],
        cones: &[SupportedConeT<T>],
        settings: DefaultSettings<T>,
    ) -> Result<Self, SolverError> {
        settings.validate().map_err(SolverError::BadSettings)?;

        let (m, n) = A.size();
        check_dimensions(P, q, b, cones, n, m)?;

        let mut timers = Timers::new();
        timers.start("setup");

        // chordal decomposition of PSD triangle cones, where enabled
        // and where decomposable sparsity exists
        if settings.decompose
            && cones
                .iter()
                .any(|c| matches!(c, SupportedConeT::PSDTriangleConeT(_)))
        {
            let mut info = ChordalInfo::new(A, b, cones, &settings);
            if info.is_decomposed() {
                let (P2, q2, A2, b2, cones2) = info.decomp_augment(P, q, A, b);
                return Self::finish_setup(
                    P2,
                    q2,
                    A2,
                    b2,
                    cones2,
                    settings,
                    Some(info),
                    (n, m),
                    timers,
                );
            }
        }

        Self::finish_setup(
            P.clone(),
            q.to_vec(),
            A.clone(),
            b.to_vec(),
            cones.to_vec(),
            settings,
            None,
            (n, m),
            timers,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_setup(
        P: CscMatrix<T>,
        q: Vec<T>,
        A: CscMatrix<T>,
        b: Vec<T>,
        cones: Vec<SupportedConeT<T>>,
        settings: DefaultSettings<T>,
        chordal_info: Option<ChordalInfo<T>>,
        orig_dims: (usize, usize),
        mut timers: Timers,
    ) -> Result<Self, SolverError> {
        let mut cones = CompositeCone::new(&cones);
        let mut data = DefaultProblemData::new(&P, &q, &A, &b, &cones)?;

        if settings.scaling > 0 {
            equilibrate_ruiz(&mut data, &mut cones, &settings);
        }

        let kktsystem = DefaultKKTSystem::new(&data, &cones, &settings)?;

        let variables = DefaultVariables::new(data.n, data.m);
        let residuals = DefaultResiduals::new(data.n, data.m);
        let solution = DefaultSolution::new(orig_dims.0, orig_dims.1);
        let rho = settings.rho;

        timers.stop("setup");

        Ok(Self {
            data,
            cones,
            variables,
            residuals,
            kktsystem,
            solution,
            settings,
            chordal_info,
            orig_dims,
            rho,
            timers,
        })
    }

    /// Provide a starting point for the iteration, in the units of the
    /// original problem.  For decomposed problems only the primal part
    /// is warm started.
    pub fn warm_start(&mut self, x0: &[T], μ0: &[T]) {
        let (n_orig, m_orig) = self.orig_dims;
        assert!(x0.len() == n_orig && μ0.len() == m_orig);

        let eq = &self.data.equilibration;

        // x̂ = D⁻¹ x
        for i in 0..n_orig {
            self.variables.x[i] = x0[i] * eq.dinv[i];
        }

        // μ̂ = c E⁻¹ μ, negated into the iterate's sign convention.
        // Available only when the internal rows match the user's rows
        if m_orig == self.data.m {
            for i in 0..m_orig {
                self.variables.μ[i] = -μ0[i] * eq.einv[i] * eq.c;
            }
        }
    }

    /// Run the splitting iteration until a terminal status is reached.
    pub fn solve(&mut self) {
        let settings = self.settings.clone();
        let mut timers = std::mem::take(&mut self.timers);

        timers.start("solve");

        print_banner(settings.verbose);
        print_configuration(&settings, &self.data, self.cones.len());
        print_status_header(settings.verbose);

        let (n, m) = (self.data.n, self.data.m);
        let α = settings.alpha;
        let one = T::one();
        let start = std::time::Instant::now();

        let mut status = SolverStatus::Max_iter_reached;
        let mut iter_count = 0_u32;

        timers.start("iteration");

        for iter in 1..=settings.max_iter {
            iter_count = iter;

            // stow the previous iterate for the infeasibility deltas
            {
                let v = &mut self.variables;
                v.x_prev.copy_from(&v.x);
                v.μ_prev.copy_from(&v.μ);
            }

            // linear system solve: x̃ and ν
            self.kktsystem
                .solve_step(&mut self.variables, &self.data, &settings);

            {
                let v = &mut self.variables;
                let ρ = &self.kktsystem.rho_vec;

                // over-relaxed primal update
                v.x.axpby(α, &v.x_tl, one - α);

                // s̃ = s - (ν + μ)/ρ, then over-relaxed
                for (st, &si, &νi, &μi, &ρi) in izip!(v.s_tl.iter_mut(), &v.s, &v.ν, &v.μ, ρ) {
                    *st = si - (νi + μi) / ρi;
                }
                v.s_tl.axpby(one - α, &v.s, α);

                // project the shifted slack back onto the cone
                for (si, &st, &μi, &ρi) in izip!(v.s.iter_mut(), &v.s_tl, &v.μ, ρ) {
                    *si = st + μi / ρi;
                }
                self.cones.project(&mut v.s);

                // dual ascent
                for (μi, &st, &si, &ρi) in izip!(v.μ.iter_mut(), &v.s_tl, &v.s, ρ) {
                    *μi += ρi * (st - si);
                }
            }

            // cooperative time limit, at iteration boundaries only
            if settings.time_limit > 0.0 && start.elapsed().as_secs_f64() > settings.time_limit {
                status = SolverStatus::Time_limit_reached;
                break;
            }

            // convergence check
            if settings.check_termination > 0 && iter % settings.check_termination == 0 {
                self.residuals.update(&self.variables, &self.data);
                print_status(settings.verbose, iter, &self.residuals, self.rho);

                if self.residuals.has_converged(&settings) {
                    status = SolverStatus::Solved;
                    break;
                }
                if T::abs(self.residuals.cost) > T::from_f64(1e20).unwrap() {
                    status = SolverStatus::Unsolved;
                    break;
                }
            }

            // infeasibility certificates
            if settings.check_infeasibility > 0 && iter % settings.check_infeasibility == 0 {
                {
                    let v = &mut self.variables;
                    for i in 0..n {
                        v.δx[i] = v.x[i] - v.x_prev[i];
                    }
                    for i in 0..m {
                        v.δy[i] = v.μ_prev[i] - v.μ[i];
                    }
                }

                if is_primal_infeasible(&mut self.variables, &self.data, &mut self.cones, &settings)
                {
                    status = SolverStatus::Primal_infeasible;
                    let v = &mut self.variables;
                    v.μ.copy_from(&v.δy);
                    DefaultVariables::fill_nan(&mut v.x);
                    DefaultVariables::fill_nan(&mut v.s);
                    DefaultVariables::fill_nan(&mut v.ν);
                    break;
                }

                if is_dual_infeasible(&mut self.variables, &self.data, &mut self.cones, &settings) {
                    status = SolverStatus::Dual_infeasible;
                    let v = &mut self.variables;
                    v.x.copy_from(&v.δx);
                    DefaultVariables::fill_nan(&mut v.s);
                    DefaultVariables::fill_nan(&mut v.μ);
                    DefaultVariables::fill_nan(&mut v.ν);
                    break;
                }
            }

            // residual balancing penalty update
            if settings.adaptive_rho
                && settings.adaptive_rho_interval > 0
                && iter % settings.adaptive_rho_interval == 0
            {
                self.residuals.update(&self.variables, &self.data);
                if let Some(ratio) = self.residuals.rho_adaptation_ratio() {
                    let rho_new =
                        T::min(T::max(self.rho * ratio, settings.rho_min), settings.rho_max);
                    let tol = settings.adaptive_rho_tolerance;

                    if rho_new > self.rho * tol || rho_new < self.rho / tol {
                        self.rho = rho_new;
                        if self
                            .kktsystem
                            .update_rho(rho_new, &self.cones, &settings)
                            .is_err()
                        {
                            status = SolverStatus::Unsolved;
                            break;
                        }
                    }
                }
            }
        }

        timers.stop("iteration");

        // residuals for reporting when the loop ran out before a check
        if matches!(
            status,
            SolverStatus::Max_iter_reached | SolverStatus::Time_limit_reached
        ) {
            self.residuals.update(&self.variables, &self.data);
        }

        // the splitting iterate carries the dual with reversed sign;
        // report the conventional multiplier.  Certificate exits have
        // already replaced μ with a correctly oriented direction
        if !matches!(
            status,
            SolverStatus::Primal_infeasible | SolverStatus::Dual_infeasible
        ) {
            self.variables.μ.negate();
        }

        // return the iterate to the units of the original problem
        reverse_scaling(&self.data.equilibration, &mut self.variables);

        // reassemble the user's variables from the decomposed blocks
        let complete_dual = settings.complete_dual && status == SolverStatus::Solved;
        if let Some(ref chordal_info) = self.chordal_info {
            let orig_vars = chordal_info.decomp_reverse(&self.variables, complete_dual);
            self.solution.x.copy_from(&orig_vars.x);
            self.solution.s.copy_from(&orig_vars.s);
            self.solution.μ.copy_from(&orig_vars.μ);
            self.solution.ν.copy_from(&orig_vars.ν);
        } else {
            self.solution.x.copy_from(&self.variables.x);
            self.solution.s.copy_from(&self.variables.s);
            self.solution.μ.copy_from(&self.variables.μ);
            self.solution.ν.copy_from(&self.variables.ν);
        }

        timers.stop("solve");

        self.solution.status = status;
        self.solution.iterations = iter_count;
        self.solution.r_prim = self.residuals.r_prim;
        self.solution.r_dual = self.residuals.r_dual;
        self.solution.obj_val = match status {
            SolverStatus::Solved
            | SolverStatus::Max_iter_reached
            | SolverStatus::Time_limit_reached => self.residuals.cost,
            SolverStatus::Primal_infeasible => T::infinity(),
            SolverStatus::Dual_infeasible => -T::infinity(),
            SolverStatus::Unsolved => T::nan(),
        };
        self.solution.setup_time = timers.elapsed("setup");
        self.solution.solve_time = timers.elapsed("solve");
        self.solution.iter_time = timers.elapsed("iteration");

        print_footer(
            settings.verbose,
            status,
            iter_count,
            self.solution.solve_time,
        );

        self.timers = timers;
    }
}

fn check_dimensions<T: FloatT>(
    P: &CscMatrix<T>,
    q: &[T],
    b: &[T],
    cones: &[SupportedConeT<T>],
    n: usize,
    m: usize,
) -> Result<(), SolverError> {
    if !P.is_square() || P.n != n {
        return Err(SolverError::DimensionMismatch(format!(
            "P must be {0} x {0} to match A",
            n
        )));
    }
    if q.len() != n {
        return Err(SolverError::DimensionMismatch(format!(
            "q has length {}, expected {}",
            q.len(),
            n
        )));
    }
    if b.len() != m {
        return Err(SolverError::DimensionMismatch(format!(
            "b has length {}, expected {}",
            b.len(),
            m
        )));
    }
    let conedim: usize = cones.iter().map(|c| c.nvars()).sum();
    if conedim != m {
        return Err(SolverError::DimensionMismatch(format!(
            "cone dimensions sum to {}, expected {}",
            conedim, m
        )));
    }
    Ok(())
}
