// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `PowVvOp` / `PowPvOp` / `PowVpOp`; see `spec.md` §4.1. Order-0/1 scope
//! (see `DESIGN.md`): `w = u^v` is evaluated directly via `Base::powf` at
//! order zero and linearized at order one.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::op::taylor::{unary_forward_01, unary_reverse_01};
use crate::tape::IndexT;

/// `vp`: `w = u^c`, `c` a parameter. `dw/du = c * u^(c-1)`.
fn pow_vp_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let c = con[args[1] as usize];
    let value = u0.powf(&c);
    let dvalue = c * u0.powf(&(c - V::one()));
    unary_forward_01(q, var, u, res, value, dvalue);
}
fn pow_vp_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("pow_vp: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let u0 = var[u][0];
    let c = con[args[1] as usize];
    let dvalue = c * u0.powf(&(c - V::one()));
    let ddvalue = c * (c - V::one()) * u0.powf(&(c - V::from(2.0)));
    unary_reverse_01(d, var, partial, u, res, dvalue, ddvalue);
}
pub fn pow_vp_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "pow_vp",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: pow_vp_forward,
        reverse: pow_vp_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}

/// `pv`: `w = c^v`, `c` a parameter. `dw/dv = ln(c) * c^v = ln(c) * w`.
fn pow_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let v = args[1] as usize;
    let c = con[args[0] as usize];
    let v0 = var[v][0];
    let value = c.powf(&v0);
    let dvalue = c.ln() * value;
    unary_forward_01(q, var, v, res, value, dvalue);
}
fn pow_pv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("pow_pv: reverse mode order > 1 is not supported");
    }
    let v = args[1] as usize;
    let c = con[args[0] as usize];
    let w0 = var[res][0];
    let ln_c = c.ln();
    let dvalue = ln_c * w0;
    let ddvalue = ln_c * ln_c * w0;
    unary_reverse_01(d, var, partial, v, res, dvalue, ddvalue);
}
pub fn pow_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "pow_pv",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: pow_pv_forward,
        reverse: pow_pv_reverse,
        depend: |args| vec![args[1]],
        hessian_pairs: |args| vec![(args[1], args[1])],
    }
}

/// `vv`: `w = u^v`, both variables. `dw/du = v * u^(v-1)`,
/// `dw/dv = ln(u) * u^v = ln(u) * w`, `d2w/dudv = w/u + v*ln(u)*u^(v-1)`.
fn pow_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (u, v) = (args[0] as usize, args[1] as usize);
    let (u0, v0) = (var[u][0], var[v][0]);
    if q == 0 {
        var[res][0] = u0.powf(&v0);
    } else {
        let w0 = var[res][0];
        let du = v0 * u0.powf(&(v0 - V::one()));
        let dv = u0.ln() * w0;
        var[res][1] = du * var[u][1] + dv * var[v][1];
    }
}
fn pow_vv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("pow_vv: reverse mode order > 1 is not supported");
    }
    let (u, v) = (args[0] as usize, args[1] as usize);
    let (u0, v0) = (var[u][0], var[v][0]);
    let w0 = var[res][0];
    let ln_u = u0.ln();
    let du = v0 * u0.powf(&(v0 - V::one()));
    let dv = ln_u * w0;
    let pw0 = partial[res][0];
    partial[u][0] = partial[u][0] + pw0 * du;
    partial[v][0] = partial[v][0] + pw0 * dv;
    if d == 1 {
        let u1 = var[u][1];
        let v1 = var[v][1];
        let w1 = var[res][1];
        let pw1 = partial[res][1];
        let duu = v0 * (v0 - V::one()) * u0.powf(&(v0 - V::from(2.0)));
        let duv = du / u0 + ln_u * du; // d/dv (v * u^(v-1)) = u^(v-1) + v*ln(u)*u^(v-1)
        let dvv = ln_u * ln_u * w0;
        partial[u][0] = partial[u][0] + pw1 * (duu * u1 + duv * v1);
        partial[v][0] = partial[v][0] + pw1 * (duv * u1 + dvv * v1);
        partial[u][1] = partial[u][1] + pw1 * du;
        partial[v][1] = partial[v][1] + pw1 * dv;
        let _ = w1;
    }
}
fn pow_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}
fn pow_vv_hessian(args: &[IndexT]) -> Vec<(IndexT, IndexT)> {
    vec![(args[0], args[0]), (args[0], args[1]), (args[1], args[1])]
}
pub fn pow_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "pow_vv",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: pow_vv_forward,
        reverse: pow_vv_reverse,
        depend: pow_vv_depend,
        hessian_pairs: pow_vv_hessian,
    }
}
