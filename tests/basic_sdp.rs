#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

const RT2: f64 = std::f64::consts::SQRT_2;

#[test]
fn test_sdp_triangle_feasible() {
    // minimize x1 + x2 subject to
    //   [x1   0.5]
    //   [0.5  x2 ]  ⪰ 0
    //
    // optimum at x1 = x2 = 0.5 with objective 1.
    let P = CscMatrix::zeros((2, 2));
    let q = vec![1., 1.];

    // s = svec(X) = (x1, 0.5·√2, x2)
    let A = CscMatrix::from(&[
        [-1., 0.], //
        [0., 0.],  //
        [0., -1.], //
    ]);
    let b = vec![0., 0.5 * RT2, 0.];

    let cones = vec![PSDTriangleConeT(2)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[0.5, 0.5]) <= 1e-3);
    assert!((solver.solution.obj_val - 1.0).abs() <= 1e-3);

    // the slack must be (numerically) a PSD matrix:
    // check via its determinant and trace
    let s = &solver.solution.s;
    let (x11, x12, x22) = (s[0], s[1] / RT2, s[2]);
    assert!(x11 + x22 >= -1e-6);
    assert!(x11 * x22 - x12 * x12 >= -1e-6);
}

#[test]
fn test_sdp_full_storage_cone() {
    // same problem in full (square) storage:
    // s = vec(X) = (x1, 0.5, 0.5, x2) columnwise
    let P = CscMatrix::zeros((2, 2));
    let q = vec![1., 1.];

    let A = CscMatrix::from(&[
        [-1., 0.], //
        [0., 0.],  //
        [0., 0.],  //
        [0., -1.], //
    ]);
    let b = vec![0., 0.5, 0.5, 0.];

    let cones = vec![PSDConeT(2)];

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[0.5, 0.5]) <= 1e-3);
}
