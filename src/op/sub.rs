// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Subvv` / `Subpv` / `Subvp`; see `spec.md` §4.1. Subtraction is not
//! symmetric under swap, so (unlike `add`/`mul`) both parameter-mixed forms
//! are kept.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn sub_vv_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let (lhs, rhs) = (args[0] as usize, args[1] as usize);
    var[res][q] = var[lhs][q] - var[rhs][q];
}
fn sub_vv_reverse<V: Base>(
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
        partial[rhs][k] = partial[rhs][k] - p;
    }
}
fn sub_vv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0], args[1]]
}

pub fn sub_vv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sub_vv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: sub_vv_forward,
        reverse: sub_vv_reverse,
        depend: sub_vv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

fn sub_pv_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let rhs = args[1] as usize;
    var[res][q] = if q == 0 {
        con[args[0] as usize] - var[rhs][0]
    } else {
        -var[rhs][q]
    };
}
fn sub_pv_reverse<V: Base>(
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
        partial[rhs][k] = partial[rhs][k] - p;
    }
}
fn sub_pv_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[1]]
}

pub fn sub_pv_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sub_pv",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: sub_pv_forward,
        reverse: sub_pv_reverse,
        depend: sub_pv_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

fn sub_vp_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let lhs = args[0] as usize;
    var[res][q] = if q == 0 {
        var[lhs][0] - con[args[1] as usize]
    } else {
        var[lhs][q]
    };
}
fn sub_vp_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let lhs = args[0] as usize;
    for k in 0..=d {
        let p = partial[res][k];
        partial[lhs][k] = partial[lhs][k] + p;
    }
}
fn sub_vp_depend(args: &[IndexT]) -> Vec<IndexT> {
    vec![args[0]]
}

pub fn sub_vp_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sub_vp",
        n_arg: 2,
        n_res: 1,
        max_order: None,
        forward: sub_vp_forward,
        reverse: sub_vp_reverse,
        depend: sub_vp_depend,
        hessian_pairs: |_| Vec::new(),
    }
}
