// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Mulvv` / `Mulpv`; see `spec.md` §4.1. `w = u*v` is the Cauchy product
//! of the Taylor series of `u` and `v` (`op::taylor::conv`); its reverse
//! sweep is the transpose of that product, and its one Hessian pair is
//! `(lhs, rhs)` since `d^2(uv)/du dv = 1 != 0`.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::op::taylor::conv;
use crate::tape::IndexT;

fn mul_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    let value = {
        let u: Vec<V> = (0..=q).map(|k| var[lhs][k]).collect();
        let v: Vec<V> = (0..=q).map(|k| var[rhs][k]).collect();
        conv(&u, &v, q)
    };
    var[res][q] = value;
}
fn mul_vv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    for k in 0..=d {
        let pw = partial[res][k];
        for j in 0..=k {
            partial[lhs][j] = partial[lhs][j] + pw * var[rhs][k - j];
            partial[rhs][k - j] = partial[rhs][k - j] + pw * var[lhs][j];
        }
    }
}
fn mul_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}
fn mul_vv_hessian(args: &[IndexT]) -> Vec<(IndexT, IndexT)> {
    vec![(args[0], args[1])]
}

pub fn mul_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "mul_vv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: mul_vv_forward,
        reverse: mul_vv_reverse,
        depend: mul_vv_depend,
        hessian_pairs: mul_vv_hessian,
    }
}

fn mul_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let rhs = args[1] as usize;
    var[res][q] = con[args[0] as usize] * var[rhs][q];
}
fn mul_pv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let rhs = args[1] as usize;
    let scale = con[args[0] as usize];
    for k in 0..=d {
        partial[rhs][k] = partial[rhs][k] + scale * partial[res][k];
    }
}
fn mul_pv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[1]]
}

pub fn mul_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "mul_pv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: mul_pv_forward,
        reverse: mul_pv_reverse,
        depend: mul_pv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}
