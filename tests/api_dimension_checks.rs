#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

fn valid_data() -> (CscMatrix<f64>, Vec<f64>, CscMatrix<f64>, Vec<f64>) {
    let P = CscMatrix::identity(2);
    let q = vec![1., 1.];
    let A = CscMatrix::identity(2);
    let b = vec![1., 1.];
    (P, q, A, b)
}

#[test]
fn test_accepts_valid_problem() {
    let (P, q, A, b) = valid_data();
    let cones = [NonnegativeConeT(2)];
    assert!(DefaultSolver::new(&P, &q, &A, &b, &cones, DefaultSettings::default()).is_ok());
}

#[test]
fn test_rejects_bad_P_dimension() {
    let (_, q, A, b) = valid_data();
    let P = CscMatrix::<f64>::identity(3);
    let cones = [NonnegativeConeT(2)];

    let result = DefaultSolver::new(&P, &q, &A, &b, &cones, DefaultSettings::default());
    assert!(matches!(result, Err(SolverError::DimensionMismatch(_))));
}

#[test]
fn test_rejects_bad_q_length() {
    let (P, _, A, b) = valid_data();
    let q = vec![1.; 3];
    let cones = [NonnegativeConeT(2)];

    let result = DefaultSolver::new(&P, &q, &A, &b, &cones, DefaultSettings::default());
    assert!(matches!(result, Err(SolverError::DimensionMismatch(_))));
}

#[test]
fn test_rejects_bad_b_length() {
    let (P, q, A, _) = valid_data();
    let b = vec![1.; 5];
    let cones = [NonnegativeConeT(2)];

    let result = DefaultSolver::new(&P, &q, &A, &b, &cones, DefaultSettings::default());
    assert!(matches!(result, Err(SolverError::DimensionMismatch(_))));
}

#[test]
fn test_rejects_bad_cone_dimensions() {
    let (P, q, A, b) = valid_data();
    let cones = [NonnegativeConeT(1), ZeroConeT(3)];

    let result = DefaultSolver::new(&P, &q, &A, &b, &cones, DefaultSettings::default());
    assert!(matches!(result, Err(SolverError::DimensionMismatch(_))));
}

#[test]
fn test_rejects_bad_settings() {
    let (P, q, A, b) = valid_data();
    let cones = [NonnegativeConeT(2)];

    // circumvent the builder validation by editing a built object
    let mut settings = DefaultSettings::default();
    settings.alpha = 2.7;

    let result = DefaultSolver::new(&P, &q, &A, &b, &cones, settings);
    assert!(matches!(result, Err(SolverError::BadSettings(_))));
}
