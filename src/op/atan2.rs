// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Atan2VvOp` / `Atan2PvOp` / `Atan2VpOp`; see `spec.md` §4.1 and
//! `F.2` (first-class `atan2` operator). Order-0/1 scope, same structure as
//! `op::pow`: `w = atan2(u, v)` has `dw/du = v/(u^2+v^2)`,
//! `dw/dv = -u/(u^2+v^2)`.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn atan2_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (u, v) = (args[0] as usize, args[1] as usize);
    let (u0, v0) = (var[u][0], var[v][0]);
    if q == 0 {
        var[res][0] = u0.atan2(&v0);
    } else {
        let denom = u0 * u0 + v0 * v0;
        let du = v0 / denom;
        let dv = -(u0 / denom);
        var[res][1] = du * var[u][1] + dv * var[v][1];
    }
}
fn atan2_vv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("atan2_vv: reverse mode order > 1 is not supported");
    }
    let (u, v) = (args[0] as usize, args[1] as usize);
    let (u0, v0) = (var[u][0], var[v][0]);
    let denom = u0 * u0 + v0 * v0;
    let du = v0 / denom;
    let dv = -(u0 / denom);
    let pw0 = partial[res][0];
    partial[u][0] = partial[u][0] + pw0 * du;
    partial[v][0] = partial[v][0] + pw0 * dv;
    if d == 1 {
        let pw1 = partial[res][1];
        partial[u][1] = partial[u][1] + pw1 * du;
        partial[v][1] = partial[v][1] + pw1 * dv;
    }
}
fn atan2_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}
fn atan2_vv_hessian(args: &[IndexT]) -> Vec<(IndexT, IndexT)> {
    vec![(args[0], args[0]), (args[0], args[1]), (args[1], args[1])]
}
pub fn atan2_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "atan2_vv",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: atan2_vv_forward,
        reverse: atan2_vv_reverse,
        depend: atan2_vv_depend,
        hessian_pairs: atan2_vv_hessian,
    }
}

/// `pv`: `w = atan2(c, v)`, `c` a parameter.
fn atan2_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let v = args[1] as usize;
    let c = con[args[0] as usize];
    let v0 = var[v][0];
    if q == 0 {
        var[res][0] = c.atan2(&v0);
    } else {
        let denom = c * c + v0 * v0;
        let dv = -(c / denom);
        var[res][1] = dv * var[v][1];
    }
}
fn atan2_pv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("atan2_pv: reverse mode order > 1 is not supported");
    }
    let v = args[1] as usize;
    let c = con[args[0] as usize];
    let v0 = var[v][0];
    let denom = c * c + v0 * v0;
    let dv = -(c / denom);
    for k in 0..=d {
        partial[v][k] = partial[v][k] + dv * partial[res][k];
    }
}
pub fn atan2_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "atan2_pv",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: atan2_pv_forward,
        reverse: atan2_pv_reverse,
        depend: |args| vec![args[1]],
        hessian_pairs: |args| vec![(args[1], args[1])],
    }
}

/// `vp`: `w = atan2(u, c)`, `c` a parameter.
fn atan2_vp_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let u0 = var[u][0];
    let c = con[args[1] as usize];
    if q == 0 {
        var[res][0] = u0.atan2(&c);
    } else {
        let denom = u0 * u0 + c * c;
        let du = c / denom;
        var[res][1] = du * var[u][1];
    }
}
fn atan2_vp_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    if d > 1 {
        crate::error::known("atan2_vp: reverse mode order > 1 is not supported");
    }
    let u = args[0] as usize;
    let u0 = var[u][0];
    let c = con[args[1] as usize];
    let denom = u0 * u0 + c * c;
    let du = c / denom;
    for k in 0..=d {
        partial[u][k] = partial[u][k] + du * partial[res][k];
    }
}
pub fn atan2_vp_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "atan2_vp",
        n_arg: 2,
        n_res: 1,
        max_order: Some(1),
        forward: atan2_vp_forward,
        reverse: atan2_vp_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |args| vec![(args[0], args[0])],
    }
}
