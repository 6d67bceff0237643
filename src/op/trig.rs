// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `SinCosOp`, `TanTanhOp`, `SinhCoshOp`; see `spec.md` §4.1. Each is a
//! two-result-slot operator: the primary value `w = f(u)` at `res` and an
//! auxiliary `a = f'(u)` at `res + 1` that makes the pair closed under
//! differentiation (`w' = a u'`, `a' = h(w, a) u'` for some operator-specific
//! `h`), following the classical sin/cos, tan/sec^2 and sinh/cosh coupling
//! (Griewank & Walther, "Evaluating Derivatives", chapter 10). Scoped to
//! orders 0/1 (see `DESIGN.md`).
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

/// `forward` for a two-slot pair whose order-0 values are `w0`/`a0` and
/// whose recurrence is `w1 = a0*u1`, `a1 = h*u1`.
fn two_slot_forward<V: Base>(q: usize, var: &mut [Vec<V>], u: usize, res: usize, w0: V, a0: V, h: V) {
    if q == 0 {
        var[res][0] = w0;
        var[res + 1][0] = a0;
    } else {
        let u1 = var[u][1];
        var[res][1] = a0 * u1;
        var[res + 1][1] = h * u1;
    }
}

/// `reverse` dual to [two_slot_forward]. `dh_du0` is only evaluated when
/// `d == 1`.
#[allow(clippy::too_many_arguments)]
fn two_slot_reverse<V: Base>(
    d: usize,
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    u: usize,
    res: usize,
    a0: V,
    h: V,
    dh_du0: V,
) {
    let pw0 = partial[res][0];
    let pa0 = partial[res + 1][0];
    if d == 0 {
        partial[u][0] = partial[u][0] + pw0 * a0 + pa0 * h;
    } else {
        let u1 = var[u][1];
        let a1 = var[res + 1][1];
        let pw1 = partial[res][1];
        let pa1 = partial[res + 1][1];
        partial[u][0] = partial[u][0] + pw0 * a0 + pa0 * h + pw1 * a1 + pa1 * u1 * dh_du0;
        partial[u][1] = partial[u][1] + pw1 * a0 + pa1 * h;
    }
}

fn sin_cos_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let (s0, c0) = (u0.sin(), u0.cos());
    two_slot_forward(q, var, u, res, s0, c0, -s0);
}
fn sin_cos_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("sin_cos: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let s0 = var[res][0];
    let c0 = var[res + 1][0];
    two_slot_reverse(d, var, partial, u, res, c0, -s0, -c0);
}
pub fn sin_cos_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sin_cos",
        n_arg: 1,
        n_res: 2,
        max_order: Some(1),
        forward: sin_cos_forward,
        reverse: sin_cos_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}

fn tan_tanh_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let t0 = u0.tan();
    let a0 = V::one() + t0 * t0;
    two_slot_forward(q, var, u, res, t0, a0, V::from(2.0) * t0 * a0);
}
fn tan_tanh_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("tan_tanh: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let t0 = var[res][0];
    let a0 = var[res + 1][0];
    let h = V::from(2.0) * t0 * a0;
    let dh_du0 = V::from(2.0) * (a0 * a0 + t0 * h);
    two_slot_reverse(d, var, partial, u, res, a0, h, dh_du0);
}
pub fn tan_tanh_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "tan_tanh",
        n_arg: 1,
        n_res: 2,
        max_order: Some(1),
        forward: tan_tanh_forward,
        reverse: tan_tanh_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}

fn tanh_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let t0 = u0.tanh();
    let a0 = V::one() - t0 * t0;
    two_slot_forward(q, var, u, res, t0, a0, V::from(-2.0) * t0 * a0);
}
fn tanh_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("tanh: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let t0 = var[res][0];
    let a0 = var[res + 1][0];
    let h = V::from(-2.0) * t0 * a0;
    let dh_du0 = V::from(-2.0) * (a0 * a0 + t0 * h);
    two_slot_reverse(d, var, partial, u, res, a0, h, dh_du0);
}
pub fn tanh_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "tanh",
        n_arg: 1,
        n_res: 2,
        max_order: Some(1),
        forward: tanh_forward,
        reverse: tanh_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}

fn sinh_cosh_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let (s0, c0) = (u0.sinh(), u0.cosh());
    two_slot_forward(q, var, u, res, s0, c0, s0);
}
fn sinh_cosh_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("sinh_cosh: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let s0 = var[res][0];
    let c0 = var[res + 1][0];
    two_slot_reverse(d, var, partial, u, res, c0, s0, c0);
}
pub fn sinh_cosh_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sinh_cosh",
        n_arg: 1,
        n_res: 2,
        max_order: Some(1),
        forward: sinh_cosh_forward,
        reverse: sinh_cosh_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}
