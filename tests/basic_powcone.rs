#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[test]
fn test_powcone_feasible() {
    // minimize x  subject to  (x, 1, 2) ∈ K_{0.5}
    // the cone requires √x·√1 ≥ 2, so x* = 4
    let P = CscMatrix::zeros((1, 1));
    let q: Vec<f64> = vec![1.];

    let A = CscMatrix::from(&[
        [-1.], //
        [0.],  //
        [0.],  //
    ]);
    let b = vec![0., 1., 2.];

    let cones = vec![PowerConeT(0.5)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!((solver.solution.x[0] - 4.0).abs() <= 1e-2);
}

#[test]
fn test_dual_powcone_feasible() {
    // minimize u  subject to  (u, 1, 1) ∈ K_{0.5}*
    // the dual cone requires (2u)^0.5 (2)^0.5 = 2√u ≥ 1, so u* = 1/4
    let P = CscMatrix::zeros((1, 1));
    let q: Vec<f64> = vec![1.];

    let A = CscMatrix::from(&[
        [-1.], //
        [0.],  //
        [0.],  //
    ]);
    let b = vec![0., 1., 1.];

    let cones = vec![DualPowerConeT(0.5)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!((solver.solution.x[0] - 0.25).abs() <= 1e-2);
}
