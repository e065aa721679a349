#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[test]
fn test_lp_feasible() {
    // minimize x1 + x2  subject to  x ≥ 1 componentwise
    let P = CscMatrix::zeros((2, 2));
    let q: Vec<f64> = vec![1., 1.];
    let A = CscMatrix::from(&[
        [-1., 0.], //
        [0., -1.], //
    ]);
    let b = vec![-1., -1.];
    let cones = vec![NonnegativeConeT(2)];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[1., 1.]) <= 1e-3);
    assert!((solver.solution.obj_val - 2.0).abs() <= 1e-3);
}

#[test]
fn test_lp_primal_infeasible() {
    // feasibility problem with x ≥ 1 and x ≤ 0: primal infeasible
    //   row 1:  x + s1 = -1, s1 ≥ 0   (x ≤ -1)
    //   row 2: -x + s2 =  0, s2 ≥ 0   (x ≥ 0)
    let P = CscMatrix::zeros((1, 1));
    let q: Vec<f64> = vec![1.];
    let A = CscMatrix::from(&[
        [1.],  //
        [-1.], //
    ]);
    let b = vec![-1., 0.];
    let cones = vec![NonnegativeConeT(2)];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Primal_infeasible);

    // the iterate is meaningless and flagged as such
    assert!(solver.solution.x.iter().all(|v| v.is_nan()));
    assert!(solver.solution.obj_val.is_infinite());
}

#[test]
fn test_lp_dual_infeasible() {
    // minimize -x subject to x ≥ 0: unbounded below
    let P = CscMatrix::zeros((1, 1));
    let q = vec![-1.];
    let A = CscMatrix::from(&[
        [-1.], //
    ]);
    let b = vec![0.];
    let cones = vec![NonnegativeConeT(1)];

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();

    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Dual_infeasible);

    // x holds the unbounded direction certificate
    assert!(solver.solution.x[0] > 0.0);
    assert_eq!(solver.solution.obj_val, f64::NEG_INFINITY);
}
