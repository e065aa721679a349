// projection and membership tests over all cone variants

use crate::algebra::*;
use crate::solver::core::cones::*;
use crate::solver::SupportedConeT::*;

fn make_all_cones() -> Vec<(SupportedConeT<f64>, Vec<f64>)> {
    // each variant paired with a generic non-member test point
    vec![
        (ZeroConeT(3), vec![1., -2., 3.]),
        (NonnegativeConeT(4), vec![1., -2., 0.5, -0.01]),
        (
            BoxConeT(vec![-1., 0., 2.], vec![1., 3., 5.]),
            vec![-4., 1.5, 7.],
        ),
        (SecondOrderConeT(3), vec![0.5, -2., 1.]),
        (PSDConeT(2), vec![1., 3., 3., -2.]),
        (PSDTriangleConeT(3), vec![1., 0.4, -2., 0.3, 0.1, 1.5]),
        (ExponentialConeT(), vec![1., 1., 1.]),
        (DualExponentialConeT(), vec![1., 1., 1.]),
        (PowerConeT(0.7), vec![1., 1., 4.]),
        (DualPowerConeT(0.3), vec![0.5, 0.5, 2.]),
    ]
}

#[test]
fn test_projection_idempotence() {
    for (conet, v) in make_all_cones() {
        let mut cone = make_cone(&conet);

        let mut p = v.clone();
        cone.project(&mut p);

        let mut pp = p.clone();
        cone.project(&mut pp);

        assert!(
            p.norm_inf_diff(&pp) <= 1e-7,
            "projection not idempotent for {:?}",
            conet
        );
    }
}

#[test]
fn test_projection_lands_in_recession_cone() {
    // for the unbounded variants the projected point must be a member
    // of the set itself, which coincides with its recession cone
    for (conet, v) in make_all_cones() {
        if matches!(conet, BoxConeT(_, _)) {
            continue; // compact set, recession cone is the origin
        }
        let mut cone = make_cone(&conet);

        let mut p = v.clone();
        cone.project(&mut p);

        assert!(
            cone.in_recession(&p, 1e-7),
            "projection not in cone for {:?}",
            conet
        );
    }
}

#[test]
fn test_box_projection_respects_bounds() {
    let l = vec![-1., 0., 2.];
    let u = vec![1., 3., 5.];
    let mut cone = make_cone(&BoxConeT(l.clone(), u.clone()));

    let mut p = vec![-4., 1.5, 7.];
    cone.project(&mut p);
    assert_eq!(p, vec![-1., 1.5, 5.]);
}

#[test]
fn test_soc_projection_cases() {
    let mut cone = make_cone::<f64>(&SecondOrderConeT(3));

    // already inside
    let mut p = vec![2., 1., 1.];
    cone.project(&mut p);
    assert_eq!(p, vec![2., 1., 1.]);

    // in the polar cone: projects to zero
    let mut p = vec![-2., 1., 1.];
    cone.project(&mut p);
    assert!(p.norm_inf() <= 1e-15);

    // shell case: result lies on the boundary
    let mut p = vec![0., 3., 4.];
    cone.project(&mut p);
    let t = p[0];
    let nx = p[1..].to_vec().norm();
    assert!((t - nx).abs() < 1e-12);
}

#[test]
fn test_psd_triangle_projection() {
    // svec of the indefinite matrix [1 2; 2 1] is (1, 2√2, 1);
    // its projection clips the negative eigenvalue -1 at zero
    let mut cone = make_cone::<f64>(&PSDTriangleConeT(2));

    let rt2 = std::f64::consts::SQRT_2;
    let mut p = vec![1., 2. * rt2, 1.];
    cone.project(&mut p);

    // expected matrix is [1.5 1.5; 1.5 1.5]
    assert!((p[0] - 1.5).abs() < 1e-9);
    assert!((p[1] - 1.5 * rt2).abs() < 1e-9);
    assert!((p[2] - 1.5).abs() < 1e-9);

    assert!(cone.in_dual(&p, 1e-9));
}

#[test]
fn test_composite_cone_partitions_rows() {
    let cones = [ZeroConeT(2), NonnegativeConeT(3), SecondOrderConeT(3)];
    let mut composite = CompositeCone::<f64>::new(&cones);

    assert_eq!(composite.numel(), 8);
    assert_eq!(composite.rng_cones[0], 0..2);
    assert_eq!(composite.rng_cones[1], 2..5);
    assert_eq!(composite.rng_cones[2], 5..8);

    // composite projection acts blockwise
    let mut v = vec![1., -1., -2., 3., -4., -1., 0., 0.];
    composite.project(&mut v);

    assert_eq!(&v[0..2], &[0., 0.]);
    assert_eq!(&v[2..5], &[0., 3., 0.]);
    // the SOC block (-1, 0, 0) is polar: projects to zero
    assert_eq!(&v[5..8], &[0., 0., 0.]);
}

#[test]
fn test_membership_after_projection_random_blocks() {
    // composite membership test: after projection every block is a
    // member of its cone
    let cones = [
        NonnegativeConeT(2),
        SecondOrderConeT(3),
        PSDTriangleConeT(2),
        ExponentialConeT(),
        PowerConeT(0.4),
    ];
    let mut composite = CompositeCone::<f64>::new(&cones);

    let mut v: Vec<f64> = vec![
        -1.0, 0.3, // nonnegative
        0.2, -0.7, 0.5, // soc
        1.0, -2.0, 0.4, // psd triangle
        0.6, -0.2, -1.0, // exp
        -0.3, 0.8, 0.9, // pow
    ];

    composite.project(&mut v);
    assert!(composite.in_recession(&v, 1e-7));

    // and the projection is idempotent blockwise
    let mut v2 = v.clone();
    composite.project(&mut v2);
    assert!(v.norm_inf_diff(&v2) <= 1e-7);
}
