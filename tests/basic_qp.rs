#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[allow(clippy::type_complexity)]
fn basic_box_qp_data() -> (
    CscMatrix<f64>,
    Vec<f64>,
    CscMatrix<f64>,
    Vec<f64>,
    Vec<SupportedConeT<f64>>,
) {
    // minimize ½ x'x - [1 1]'x  subject to  x ∈ [0,1]²
    let P = CscMatrix::identity(2);
    let q = vec![-1., -1.];
    let A = CscMatrix::identity(2);
    let b = vec![0., 0.];

    let cones = vec![BoxConeT(vec![0., 0.], vec![1., 1.])];

    (P, q, A, b, cones)
}

#[test]
fn test_box_qp() {
    let (P, q, A, b, cones) = basic_box_qp_data();

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);

    // unconstrained minimizer (1,1) is feasible, so it is the solution
    assert!(solver.solution.x.norm_inf_diff(&[1., 1.]) <= 1e-3);
    assert!((solver.solution.obj_val - (-1.5)).abs() <= 1e-3);

    // residuals meet the advertised tolerances
    let settings = &solver.settings;
    assert!(solver.solution.r_prim <= settings.eps_abs * 10.);
    assert!(solver.solution.r_dual <= settings.eps_abs * 10.);
}

#[test]
fn test_qp_with_equalities_and_inequalities() {
    // minimize ½ x'Px + q'x  s.t.  x1 + x2 = 1, x ≥ 0
    // P = [4 1; 1 2], q = [1, 1]
    let P = CscMatrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let q: Vec<f64> = vec![1., 1.];
    let A = CscMatrix::from(&[
        [1., 1.],  //
        [-1., 0.], //
        [0., -1.], //
    ]);
    let b = vec![1., 0., 0.];

    let cones = vec![ZeroConeT(1), NonnegativeConeT(2)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(10000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);

    // known optimum of this standard test problem
    let refsol = [0.25, 0.75];
    assert!(solver.solution.x.norm_inf_diff(&refsol) <= 1e-3);

    let refobj = 1.875;
    assert!((solver.solution.obj_val - refobj).abs() <= 1e-3);

    // equality row is satisfied tightly
    assert!((solver.solution.x[0] + solver.solution.x[1] - 1.).abs() <= 1e-4);
}

#[test]
fn test_qp_warm_start_converges() {
    let (P, q, A, b, cones) = basic_box_qp_data();

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    // start at the known solution
    solver.warm_start(&[1., 1.], &[0., 0.]);
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[1., 1.]) <= 1e-3);
}

#[test]
fn test_qp_unscaled_matches_scaled() {
    // disabling equilibration must not change the answer
    let (P, q, A, b, cones) = basic_box_qp_data();

    let settings = DefaultSettingsBuilder::default()
        .scaling(0u32)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[1., 1.]) <= 1e-3);
}

#[test]
fn test_qp_max_iter() {
    let (P, q, A, b, cones) = basic_box_qp_data();

    let settings = DefaultSettingsBuilder::default()
        .max_iter(1u32)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Max_iter_reached);
    assert_eq!(solver.solution.iterations, 1);
}
