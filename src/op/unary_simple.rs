// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `NegOp`, `AbsOp`, `SignOp`; see `spec.md` §4.1. All three are linear in
//! the operand's Taylor series away from a kink at zero, so every order
//! follows the same rule as order zero: `neg` negates, `abs` scales by
//! `sign(u_0)`, and `sign` has zero derivative.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn neg_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    var[res][q] = -var[u][q];
}
fn neg_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let u = args[0] as usize;
    for k in 0..=d {
        partial[u][k] = partial[u][k] - partial[res][k];
    }
}
pub fn neg_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "neg",
        n_arg: 1,
        n_res: 1,
        max_order: None,
        forward: neg_forward,
        reverse: neg_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |_| Vec::new(),
    }
}

fn abs_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    let s = var[u][0].sign_value();
    var[res][q] = s * var[u][q];
}
fn abs_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    _con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let u = args[0] as usize;
    let s = var[u][0].sign_value();
    for k in 0..=d {
        partial[u][k] = partial[u][k] + s * partial[res][k];
    }
}
pub fn abs_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "abs",
        n_arg: 1,
        n_res: 1,
        max_order: None,
        forward: abs_forward,
        reverse: abs_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |_| Vec::new(),
    }
}

fn sign_forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
    let u = args[0] as usize;
    var[res][q] = if q == 0 { var[u][0].sign_value() } else { V::zero() };
}
fn sign_reverse<V: Base>(
    _d: usize,
    _args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    _partial: &mut [Vec<V>],
    _res: usize,
) {
    // sign() has zero derivative everywhere it is defined.
}
pub fn sign_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "sign",
        n_arg: 1,
        n_res: 1,
        max_order: None,
        forward: sign_forward,
        reverse: sign_reverse,
        depend: |args| vec![args[0]],
        hessian_pairs: |_| Vec::new(),
    }
}
