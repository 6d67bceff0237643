// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `CExpOp(cop, flag, left, right, if_true, if_false)`; see `spec.md`
//! §4.1 "Conditional expression".
//!
//! `args` layout: `[cop, flag, left, right, if_true, if_false]`. `cop` is
//! one of [LT]/[LE]/[EQ]/[NE] (CppAD's `Ge`/`Gt` wrappers swap `left`/
//! `right` and negate at record time, per `F.2`). `flag` bit `i` is set
//! when operand `i` (in the order left, right, if_true, if_false) is a
//! variable address rather than a parameter-pool index.
//!
//! The branch is selected once, from the order-0 values of `left`/`right`,
//! and that selection is reused for every higher order computed by the
//! same `Forward`/`Reverse` call — consistent with `spec.md` §4.6's
//! `cskip_op`, except this port does not skip evaluating the dead branch's
//! *other* operators (those were already recorded, and computing them is
//! harmless); see `DESIGN.md` for that simplification.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::tape::IndexT;

pub const LT: IndexT = 0;
pub const LE: IndexT = 1;
pub const EQ: IndexT = 2;
pub const NE: IndexT = 3;

fn compare(cop: IndexT, left: f64, right: f64) -> bool {
    match cop {
        LT => left < right,
        LE => left <= right,
        EQ => left == right,
        NE => left != right,
        _ => {
            crate::error::unknown("cond: unknown comparison code");
            false
        }
    }
}

fn fetch<V: Base>(is_var: bool, addr: IndexT, order: usize, con: &[V], var: &[Vec<V>]) -> V {
    if is_var {
        var[addr as usize][order]
    } else if order == 0 {
        con[addr as usize]
    } else {
        V::zero()
    }
}

/// Decodes `flag` into `(left_is_var, right_is_var, true_is_var, false_is_var)`.
pub fn flag_bits(flag: IndexT) -> (bool, bool, bool, bool) {
    (flag & 1 != 0, flag & 2 != 0, flag & 4 != 0, flag & 8 != 0)
}

/// Evaluates the branch condition at order zero; exposed for
/// `adfn::forward`'s compare-change witness.
pub fn condition<V: Base>(args: &[IndexT], con: &[V], var: &[Vec<V>]) -> bool {
    let (left_v, right_v, _, _) = flag_bits(args[1]);
    let left0 = fetch(left_v, args[2], 0, con, var).to_f64();
    let right0 = fetch(right_v, args[3], 0, con, var).to_f64();
    compare(args[0], left0, right0)
}

fn cexp_forward<V: Base>(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize) {
    let (left_v, right_v, true_v, false_v) = flag_bits(args[1]);
    let left0 = fetch(left_v, args[2], 0, con, var).to_f64();
    let right0 = fetch(right_v, args[3], 0, con, var).to_f64();
    let value = if compare(args[0], left0, right0) {
        fetch(true_v, args[4], q, con, var)
    } else {
        fetch(false_v, args[5], q, con, var)
    };
    var[res][q] = value;
}
fn cexp_reverse<V: Base>(
    d: usize,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    res: usize,
) {
    let (left_v, right_v, true_v, false_v) = flag_bits(args[1]);
    let left0 = fetch(left_v, args[2], 0, con, var).to_f64();
    let right0 = fetch(right_v, args[3], 0, con, var).to_f64();
    let take_true = compare(args[0], left0, right0);
    let (is_var, addr) = if take_true { (true_v, args[4]) } else { (false_v, args[5]) };
    if is_var {
        for k in 0..=d {
            partial[addr as usize][k] = partial[addr as usize][k] + partial[res][k];
        }
    }
}
fn cexp_depend(args: &[IndexT]) -> Vec<IndexT> {
    let (_, _, true_v, false_v) = flag_bits(args[1]);
    let mut out = Vec::new();
    if true_v {
        out.push(args[4]);
    }
    if false_v {
        out.push(args[5]);
    }
    out
}

pub fn cexp_info<V: Base>() -> OpInfo<V> {
    OpInfo {
        name: "cexp",
        n_arg: 6,
        n_res: 1,
        max_order: None,
        forward: cexp_forward,
        reverse: cexp_reverse,
        depend: cexp_depend,
        hessian_pairs: |_| Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;

    #[test]
    fn selects_true_branch() {
        let con: Vec<AzFloat<f64>> = vec![AzFloat(0.0)];
        // left=var0 (-1.0), right=par0 (0.0), if_true=var1, if_false=var2
        let var = vec![
            vec![AzFloat(-1.0_f64)],
            vec![AzFloat(10.0)],
            vec![AzFloat(20.0)],
            vec![AzFloat(0.0)],
        ];
        let mut var = var;
        let args = [LT, 0b1110, 0, 0, 1, 2];
        cexp_forward(0, &args, &con, &mut var, 3);
        assert_eq!(var[3][0].0, 10.0);
    }
}
