// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
//
// `spec.md` §8 S5: the 2x2 determinant `f(X) = x0 x3 - x1 x2` (`X` laid
// out as a flattened 2x2 matrix) has an antidiagonal +-1 Hessian, and
// `f.Jacobian`/`f.Hessian` (`adfn::derivative`) recover it from a single
// recording.
use tapead::float::AzFloat;
use tapead::tape::{abort_recording, start_recording, stop_recording};

type V = AzFloat<f64>;

#[test]
fn hessian_of_2x2_determinant_is_antidiagonal() {
    let x = start_recording::<V>(vec![
        AzFloat(1.0),
        AzFloat(2.0),
        AzFloat(3.0),
        AzFloat(4.0),
    ]);
    let term0 = tapead::ad::binary::mul(x[0], x[3]);
    let term1 = tapead::ad::binary::mul(x[1], x[2]);
    let y = tapead::ad::binary::sub(term0, term1);
    let mut f = stop_recording(vec![y]);

    let point = vec![AzFloat(1.0), AzFloat(2.0), AzFloat(3.0), AzFloat(4.0)];
    let hes = f.hessian(point.clone(), 0);
    let n = 4;
    let expect = [
        0.0, 0.0, 0.0, 1.0, //
        0.0, 0.0, -1.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 0.0,
    ];
    for (got, want) in hes.iter().zip(expect.iter()) {
        assert_eq!(got.0, *want);
    }

    // Jacobian of the same (scalar-valued) function is just its gradient.
    let jac = f.jacobian(point);
    assert_eq!(jac.len(), n);
    assert_eq!(jac[0].0, 4.0); // d/dx0 = x3
    assert_eq!(jac[1].0, -3.0); // d/dx1 = -x2
    assert_eq!(jac[2].0, -2.0); // d/dx2 = -x1
    assert_eq!(jac[3].0, 1.0); // d/dx3 = x0
    abort_recording::<V>();
}
