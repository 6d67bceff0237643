// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Addvv` / `Addpv`; see `spec.md` §4.1. Addition is linear, so every
//! Taylor order uses the same recurrence as order zero and the Hessian
//! contribution is empty.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn add_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    var[res][q] = var[lhs][q] + var[rhs][q];
}
fn add_vv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    for k in 0..=d {
        let p = partial[res][k];
        partial[lhs][k] = partial[lhs][k] + p;
        partial[rhs][k] = partial[rhs][k] + p;
    }
}
fn add_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}

pub fn add_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "add_vv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: add_vv_forward,
        reverse: add_vv_reverse,
        depend: add_vv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

fn add_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let rhs = args[1] as usize;
    var[res][q] = if q == 0 {
        con[args[0] as usize] + var[rhs][0]
    } else {
        var[rhs][q]
    };
}
fn add_pv_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let rhs = args[1] as usize;
    for k in 0..=d {
        let p = partial[res][k];
        partial[rhs][k] = partial[rhs][k] + p;
    }
}
fn add_pv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[1]]
}

pub fn add_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "add_pv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: add_pv_forward,
        reverse: add_pv_reverse,
        depend: add_pv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}
