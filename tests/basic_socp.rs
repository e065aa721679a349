#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[test]
fn test_socp_feasible() {
    // variables z = (t, x1, x2)
    // minimize x'x  subject to  (t, x) ∈ SOC³ and t = 1
    let P = CscMatrix::from(&[
        [0., 0., 0.], //
        [0., 2., 0.], //
        [0., 0., 2.], //
    ]);
    let q: Vec<f64> = vec![0., 0., 0.];

    // row 1: t = 1 (zero cone); rows 2-4: s = z ∈ SOC³
    let A = CscMatrix::from(&[
        [1., 0., 0.],  //
        [-1., 0., 0.], //
        [0., -1., 0.], //
        [0., 0., -1.], //
    ]);
    let b = vec![1., 0., 0., 0.];

    let cones = vec![ZeroConeT(1), SecondOrderConeT(3)];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[1., 0., 0.]) <= 1e-3);
    assert!(solver.solution.obj_val.abs() <= 1e-3);

    // the slack block of the second order cone is a cone member
    let s = &solver.solution.s[1..4];
    let t = s[0];
    let nx = (s[1] * s[1] + s[2] * s[2]).sqrt();
    assert!(t >= nx - 1e-6);
}

#[test]
fn test_socp_least_norm_with_offset() {
    // minimize t subject to (t, x - c) ∈ SOC³ with x free: optimum
    // at x = c, t = 0.  Variables z = (t, x1, x2)
    let P = CscMatrix::zeros((3, 3));
    let q: Vec<f64> = vec![1., 0., 0.];

    // s = (t, x - c) ∈ SOC³:  -z + s = (0, -c1, -c2)
    let A = CscMatrix::from(&[
        [-1., 0., 0.], //
        [0., -1., 0.], //
        [0., 0., -1.], //
    ]);
    let c = [0.3, -0.7];
    let b = vec![0., -c[0], -c[1]];

    let cones = vec![SecondOrderConeT(3)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(10000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!((solver.solution.x[1] - c[0]).abs() <= 1e-3);
    assert!((solver.solution.x[2] - c[1]).abs() <= 1e-3);
    assert!(solver.solution.x[0].abs() <= 1e-3);
}
