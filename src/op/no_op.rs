// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ParOp` and `NoOp`; see `spec.md` §4.1 "Markers".
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

fn par_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    var[res][q] = if q == 0 { con[args[0] as usize] } else { V::zero() };
}
fn par_reverse<V: Base>(
    _d: usize,
    _args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    _partial: &mut [Vec<V>],
    _res: usize,
) {
    // A parameter does not depend on any variable; nothing to accumulate.
}
fn par_depend(_args: &[IndexT]) -> Vec<IndexT> {
    Vec::new()
}

pub fn par_op_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "par",
        n_arg: 1,
        n_res: 1,
        max_order: None,
        forward: par_forward,
        reverse: par_reverse,
        depend: par_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

fn no_op_forward<V: Base>(_q: usize, _args: &[IndexT], _con: &[V], _var: &mut [Vec<V>], _res: usize) {}
fn no_op_reverse<V: Base>(
    _d: usize,
    _args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    _partial: &mut [Vec<V>],
    _res: usize,
) {
}

pub fn no_op_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "no_op",
        n_arg: 0,
        n_res: 0,
        max_order: None,
        forward: no_op_forward,
        reverse: no_op_reverse,
        depend: |_| Vec::new(),
        hessian_pairs: |_| Vec::new(),
    }
}
