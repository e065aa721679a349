#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[test]
fn test_expcone_feasible() {
    // minimize t  subject to  (1, 1, t) ∈ K_exp
    // optimal at t = 1·e^{1/1} = e
    let P = CscMatrix::zeros((1, 1));
    let q = vec![1.];

    let A = CscMatrix::from(&[
        [0.],  //
        [0.],  //
        [-1.], //
    ]);
    let b = vec![1., 1., 0.];

    let cones = vec![ExponentialConeT()];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!((solver.solution.x[0] - std::f64::consts::E).abs() <= 1e-3);
}

#[test]
fn test_dual_expcone_feasible() {
    // minimize w  subject to  (-1, 1, w) ∈ K_exp*
    // the dual cone requires -u e^{v/u} ≤ e w, i.e. w ≥ e^{-1}/e = e^{-2}
    let P = CscMatrix::zeros((1, 1));
    let q = vec![1.];

    let A = CscMatrix::from(&[
        [0.],  //
        [0.],  //
        [-1.], //
    ]);
    let b = vec![-1., 1., 0.];

    let cones = vec![DualExponentialConeT()];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    let expected = (-2.0f64).exp();
    assert!((solver.solution.x[0] - expected).abs() <= 1e-3);
}
