#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

const RT2: f64 = std::f64::consts::SQRT_2;

// minimum trace problem over a tridiagonal 5x5 pattern:
//
//   minimize  Σ X_ii
//   s.t.      X_{i,i+1} = 1,  X ⪰ 0,  X supported on the band
//
// with only the band of X appearing in the data, the aggregate
// sparsity is chordal with cliques {0,1},{1,2},{2,3},{3,4} and the
// solver decomposes the constraint into four order-2 blocks.  Every
// feasible X splits into clique-supported PSD blocks [[a 1];[1 b]]
// with ab ≥ 1, so the trace is minimized by unit blocks:
// X_ii = (1, 2, 2, 2, 1) and objective 8.

#[allow(clippy::type_complexity)]
fn banded_sdp_data() -> (
    CscMatrix<f64>,
    Vec<f64>,
    CscMatrix<f64>,
    Vec<f64>,
    Vec<SupportedConeT<f64>>,
) {
    let n = 5usize;
    let tri = n * (n + 1) / 2;

    // index of entry (r, c), r <= c, in packed column-stacked storage
    let tidx = |r: usize, c: usize| c * (c + 1) / 2 + r;

    let P = CscMatrix::zeros((n, n));
    let q = vec![1.; n];

    // s = svec(X) with X = diag(x) + ones on the first off-diagonal
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    for i in 0..n {
        rows.push(tidx(i, i));
        cols.push(i);
        vals.push(-1.0);
    }
    let A = CscMatrix::new_from_triplets(tri, n, rows, cols, vals);

    let mut b = vec![0.; tri];
    for i in 0..(n - 1) {
        b[tidx(i, i + 1)] = RT2;
    }

    let cones = vec![PSDTriangleConeT(n)];

    (P, q, A, b, cones)
}

fn solve_banded(merge_method: &str, complete_dual: bool) -> DefaultSolution<f64> {
    let (P, q, A, b, cones) = banded_sdp_data();

    let settings = DefaultSettingsBuilder::default()
        .eps_abs(1e-6)
        .eps_rel(1e-6)
        .max_iter(20000)
        .merge_method(merge_method.to_string())
        .complete_dual(complete_dual)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings).unwrap();
    solver.solve();
    solver.solution.clone()
}

// LDL-based PSD check for a small dense symmetric matrix
fn is_psd(M: &[[f64; 5]; 5], tol: f64) -> bool {
    let mut a = *M;
    for k in 0..5 {
        if a[k][k] < -tol {
            return false;
        }
        if a[k][k].abs() <= tol {
            continue;
        }
        for i in (k + 1)..5 {
            let f = a[i][k] / a[k][k];
            for j in k..5 {
                a[i][j] -= f * a[k][j];
            }
        }
    }
    (0..5).all(|k| a[k][k] >= -tol)
}

fn unpack_dual(μ: &[f64]) -> [[f64; 5]; 5] {
    let tidx = |r: usize, c: usize| c * (c + 1) / 2 + r;
    let mut Y = [[0.0; 5]; 5];
    for c in 0..5 {
        for r in 0..=c {
            let v = if r == c {
                μ[tidx(r, c)]
            } else {
                μ[tidx(r, c)] / RT2
            };
            Y[r][c] = v;
            Y[c][r] = v;
        }
    }
    Y
}

#[test]
fn test_chordal_decomposition_solves() {
    for merge_method in ["clique_graph", "parent_child", "none"] {
        let solution = solve_banded(merge_method, true);

        assert_eq!(
            solution.status,
            SolverStatus::Solved,
            "failed with merge method {}",
            merge_method
        );

        // the user-facing solution has the original dimensions
        assert_eq!(solution.x.len(), 5);
        assert_eq!(solution.s.len(), 15);

        assert!(solution.x.norm_inf_diff(&[1., 2., 2., 2., 1.]) <= 5e-3);
        assert!((solution.obj_val - 8.0).abs() <= 5e-3);
    }
}

#[test]
fn test_psd_completion_of_dual() {
    let solution = solve_banded("clique_graph", true);
    assert_eq!(solution.status, SolverStatus::Solved);

    // the completed dual must be a PSD 5x5 matrix
    let Y = unpack_dual(&solution.μ);
    assert!(is_psd(&Y, 1e-5), "completed dual is not PSD: {:?}", Y);

    // completion only fills entries outside the aggregate sparsity
    // pattern: entries on the band agree with the uncompleted dual
    let raw = solve_banded("clique_graph", false);
    let Yraw = unpack_dual(&raw.μ);

    for i in 0..5 {
        assert!((Y[i][i] - Yraw[i][i]).abs() <= 1e-6);
        if i < 4 {
            assert!((Y[i][i + 1] - Yraw[i][i + 1]).abs() <= 1e-6);
        }
    }
}
