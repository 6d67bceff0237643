// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Divvv` / `Divpv` / `Divvp`; see `spec.md` §4.1.
//!
//! `w = u / v` satisfies `conv(w, v, k) = u_k` for every order `k`, so the
//! forward recurrence solves that identity for the newest coefficient
//! `w_k = (u_k - sum_{j<k} w_j v_{k-j}) / v_0`, and the reverse sweep walks
//! the same recurrence backwards, propagating each order's adjoint both to
//! the operand streams and, locally, to the lower orders of its own result
//! (since `w_k` for `k>0` depends on `w_j` for `j<k`).
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn div_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    let mut acc = var[lhs][q];
    for j in 0..q {
        acc = acc - var[res][j] * var[rhs][q - j];
    }
    var[res][q] = acc / var[rhs][0];
}
fn div_vv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    let v0 = var[rhs][0];
    let w: &[V] = &var[res][0..=d];
    let mut pw: Vec<V> = (0..=d).map(|k| partial[res][k]).collect();
    for k in (1..=d).rev() {
        let pwk = pw[k] / v0;
        partial[lhs][k] = partial[lhs][k] + pwk;
        for j in 0..k {
            pw[j] = pw[j] - pwk * var[rhs][k - j];
            partial[rhs][k - j] = partial[rhs][k - j] - pwk * w[j];
        }
        partial[rhs][0] = partial[rhs][0] - pwk * w[k];
    }
    let pw0 = pw[0] / v0;
    partial[lhs][0] = partial[lhs][0] + pw0;
    partial[rhs][0] = partial[rhs][0] - pw0 * w[0];
}
fn div_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}
fn div_vv_hessian(args: &[IndexT]) -> Vec<(IndexT, IndexT)> {
    vec![(args[0], args[1])]
}

pub fn div_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "div_vv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: div_vv_forward,
        reverse: div_vv_reverse,
        depend: div_vv_depend,
        hessian_pairs: div_vv_hessian,
    }
}

fn div_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let rhs = args[1] as usize;
    let u_q = if q == 0 { con[args[0] as usize] } else { V::zero() };
    let mut acc = u_q;
    for j in 0..q {
        acc = acc - var[res][j] * var[rhs][q - j];
    }
    var[res][q] = acc / var[rhs][0];
}
fn div_pv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let rhs = args[1] as usize;
    let v0 = var[rhs][0];
    let w: &[V] = &var[res][0..=d];
    let mut pw: Vec<V> = (0..=d).map(|k| partial[res][k]).collect();
    for k in (1..=d).rev() {
        let pwk = pw[k] / v0;
        for j in 0..k {
            pw[j] = pw[j] - pwk * var[rhs][k - j];
            partial[rhs][k - j] = partial[rhs][k - j] - pwk * w[j];
        }
        partial[rhs][0] = partial[rhs][0] - pwk * w[k];
    }
    let pw0 = pw[0] / v0;
    partial[rhs][0] = partial[rhs][0] - pw0 * w[0];
}
fn div_pv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[1]]
}

pub fn div_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "div_pv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: div_pv_forward,
        reverse: div_pv_reverse,
        depend: div_pv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

fn div_vp_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let lhs = args[0] as usize;
    var[res][q] = var[lhs][q] / con[args[1] as usize];
}
fn div_vp_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let lhs = args[0] as usize;
    let v0 = con[args[1] as usize];
    for k in 0..=d {
        partial[lhs][k] = partial[lhs][k] + partial[res][k] / v0;
    }
}
fn div_vp_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0]]
}

pub fn div_vp_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "div_vp",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: div_vp_forward,
        reverse: div_vp_reverse,
        depend: div_vp_depend,
        hessian_pairs: |_| Vec::new(),
    }
}
