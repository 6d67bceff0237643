// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
//
// Concrete seed scenarios from `spec.md` §8, exercised end to end through
// the public surface: `start_recording`/`stop_recording` plus `forward`/
// `reverse` on the sealed `ADfn`.
use tapead::ad::cond::cond_exp_lt;
use tapead::ad::transcend::{atan2, cos, exp, pow, sin};
use tapead::ad::unary::abs;
use tapead::ad::AD;
use tapead::float::AzFloat;
use tapead::tape::{abort_recording, start_recording, stop_recording};

type V = AzFloat<f64>;

// S1: y[0] = |x - 1|, y[1] = |x|, y[2] = |x + 1| at x = 0.5.
#[test]
fn s1_abs_directional_derivatives() {
    let x = start_recording::<V>(vec![AzFloat(0.5)]);
    let one = AzFloat(1.0_f64);
    let y0 = abs(x[0] - one);
    let y1 = abs(x[0]);
    let y2 = abs(x[0] + one);
    let mut f = stop_recording(vec![y0, y1, y2]);

    let y = f.forward_zero(vec![AzFloat(0.5)]);
    assert_eq!(y[0].0, 0.5);
    assert_eq!(y[1].0, 0.5);
    assert_eq!(y[2].0, 1.5);

    let dy_plus = f.forward_one(vec![AzFloat(1.0)]);
    assert_eq!(dy_plus[0].0, -1.0);
    assert_eq!(dy_plus[1].0, 1.0);
    assert_eq!(dy_plus[2].0, 1.0);

    f.forward_zero(vec![AzFloat(0.5)]);
    let dy_minus = f.forward_one(vec![AzFloat(-1.0)]);
    assert_eq!(dy_minus[0].0, 1.0);
    assert_eq!(dy_minus[1].0, -1.0);
    assert_eq!(dy_minus[2].0, -1.0);
    abort_recording::<V>();
}

// S2: f(x) = exp(x) at x = 0.5.
#[test]
fn s2_exp_forward_and_reverse() {
    let x = start_recording::<V>(vec![AzFloat(0.5)]);
    let y = exp(x[0]);
    let mut f = stop_recording(vec![y]);

    let y0 = f.forward_zero(vec![AzFloat(0.5)]);
    let eps = 1e-9;
    assert!((y0[0].0 - 0.5_f64.exp()).abs() < eps);

    let y1 = f.forward_one(vec![AzFloat(1.0)]);
    assert!((y1[0].0 - 0.5_f64.exp()).abs() < eps);

    let dx = f.reverse_one(vec![AzFloat(1.0)]);
    assert!((dx[0].0 - 0.5_f64.exp()).abs() < eps);
    abort_recording::<V>();
}

// S3: f(x) = pow(x0, x1) at x = (0.5, 2.0).
#[test]
fn s3_pow_partials() {
    let x = start_recording::<V>(vec![AzFloat(0.5), AzFloat(2.0)]);
    let y = pow(x[0], x[1]);
    let mut f = stop_recording(vec![y]);

    let y0 = f.forward_zero(vec![AzFloat(0.5), AzFloat(2.0)]);
    let eps = 1e-9;
    assert!((y0[0].0 - 0.25).abs() < eps);

    let dx = f.reverse_one(vec![AzFloat(1.0)]);
    assert!((dx[0].0 - 1.0).abs() < eps);
    assert!((dx[1].0 - 0.5_f64.ln() * 0.25).abs() < 1e-9);
    abort_recording::<V>();
}

// S4: f(x) = atan2(sin(x), cos(x)) at x = 0.5, i.e. f(x) = x and f'(x) = 1
// on the principal branch.
#[test]
fn s4_atan2_of_sin_cos_is_identity() {
    let x = start_recording::<V>(vec![AzFloat(0.5)]);
    let y = atan2(sin(x[0]), cos(x[0]));
    let mut f = stop_recording(vec![y]);

    let y0 = f.forward_zero(vec![AzFloat(0.5)]);
    let eps = 1e-9;
    assert!((y0[0].0 - 0.5).abs() < eps);

    let y1 = f.forward_one(vec![AzFloat(1.0)]);
    assert!((y1[0].0 - 1.0).abs() < eps);
    abort_recording::<V>();
}

// S6: y = x < 0 ? -x : x (i.e. abs(x) via CExpOp) recorded at x = +0.5,
// then replayed at x = -0.5; the branch taken flips, so the second
// `forward_zero` call increments `compare_change_number` by one even
// though both evaluations return 0.5.
#[test]
fn s6_compare_change_on_branch_flip() {
    let x = start_recording::<V>(vec![AzFloat(0.5)]);
    let zero = AD::constant(AzFloat(0.0_f64));
    let y = cond_exp_lt(x[0], zero, -x[0], x[0]);
    let mut f = stop_recording(vec![y]);

    let y0 = f.forward_zero(vec![AzFloat(0.5)]);
    assert_eq!(y0[0].0, 0.5);
    assert_eq!(f.compare_change_number(), 0);

    let y1 = f.forward_zero(vec![AzFloat(-0.5)]);
    assert_eq!(y1[0].0, 0.5);
    assert_eq!(f.compare_change_number(), 1);

    // A third call back at the original sign does not matter for this
    // test's claim, but re-affirms the witness keeps tracking: flipping
    // branch again bumps the counter once more.
    let y2 = f.forward_zero(vec![AzFloat(0.5)]);
    assert_eq!(y2[0].0, 0.5);
    assert_eq!(f.compare_change_number(), 2);
    abort_recording::<V>();
}
