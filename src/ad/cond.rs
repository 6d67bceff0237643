// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `cond_exp` and the `cond_exp_{lt,le,eq,ge,gt}` convenience wrappers;
//! see `spec.md` §4.1 "Conditional expression" and `F.2` (CppAD's
//! `CondExpLt`/`Le`/`Eq`/`Ge`/`Gt` family). `Ge`/`Gt` have no opcode of
//! their own: `cond_exp_ge(l,r,t,f)` is `cond_exp_le(r,l,t,f)` and
//! `cond_exp_gt` is `cond_exp_lt(r,l,t,f)`, matching `op::cond`'s four
//! comparison codes.
// ---------------------------------------------------------------------------
use crate::ad::{pool_addr, with_tape, AD};
use crate::ad_type::ADType;
use crate::base::Base;
use crate::op::{cond, id};
use crate::tape::{IndexT, ThisThreadTape, Tape};

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

fn select<V: Base>(cop: IndexT, left: V, right: V) -> bool {
    match cop {
        cond::LT => left < right,
        cond::LE => left <= right,
        cond::EQ => left == right,
        cond::NE => left != right,
        _ => {
            crate::error::unknown("ad::cond: unknown comparison code");
            false
        }
    }
}

/// `cop(left,right) ? if_true : if_false`, generalized over `Constant`,
/// `Dynamic` and `Variable` operands. Folds to a constant when none of the
/// four operands is active; otherwise records `CExpOp` into whichever
/// stream (variable or dynamic-parameter) the active operands belong to.
pub fn cond_exp<V>(cop: IndexT, left: AD<V>, right: AD<V>, if_true: AD<V>, if_false: AD<V>) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    let take_true = select(cop, left.value, right.value);
    let value = if take_true { if_true.value } else { if_false.value };

    let operands = [left, right, if_true, if_false];
    let any_variable = operands.iter().any(|x| x.is_variable());
    let any_dynamic = operands.iter().any(|x| x.is_dynamic());
    if !any_variable && !any_dynamic {
        return AD::constant(value);
    }
    let tape_id = operands
        .iter()
        .find(|x| x.is_variable())
        .or_else(|| operands.iter().find(|x| x.is_dynamic()))
        .unwrap()
        .tape_id;
    for x in &operands {
        if !x.is_constant() && x.tape_id != tape_id {
            crate::error::known("cond_exp: operands belong to different tapes");
        }
    }
    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        let mut flag: IndexT = 0;
        let mut addr = [0 as IndexT; 4];
        for (k, x) in operands.iter().enumerate() {
            if x.is_variable() {
                flag |= 1 << k;
                addr[k] = x.index as IndexT;
            } else {
                addr[k] = pool_addr(x, tape);
            }
        }
        let args = [cop, flag, addr[0], addr[1], addr[2], addr[3]];
        if any_variable {
            let res = tape.var.put_op(id::CEXP_OP, &args, 1);
            AD::new(tape_id, res as usize, ADType::Variable, value)
        } else {
            let res = tape.put_dyn(id::CEXP_OP, &args, value);
            AD::new(tape_id, res as usize, ADType::DynamicP, value)
        }
    })
}

pub fn cond_exp_lt<V: Base + ThisThreadTape>(l: AD<V>, r: AD<V>, t: AD<V>, f: AD<V>) -> AD<V> {
    cond_exp(cond::LT, l, r, t, f)
}
pub fn cond_exp_le<V: Base + ThisThreadTape>(l: AD<V>, r: AD<V>, t: AD<V>, f: AD<V>) -> AD<V> {
    cond_exp(cond::LE, l, r, t, f)
}
pub fn cond_exp_eq<V: Base + ThisThreadTape>(l: AD<V>, r: AD<V>, t: AD<V>, f: AD<V>) -> AD<V> {
    cond_exp(cond::EQ, l, r, t, f)
}
pub fn cond_exp_ge<V: Base + ThisThreadTape>(l: AD<V>, r: AD<V>, t: AD<V>, f: AD<V>) -> AD<V> {
    cond_exp(cond::LE, r, l, t, f)
}
pub fn cond_exp_gt<V: Base + ThisThreadTape>(l: AD<V>, r: AD<V>, t: AD<V>, f: AD<V>) -> AD<V> {
    cond_exp(cond::LT, r, l, t, f)
}

#[cfg(test)]
mod tests {
    use crate::ad::AD;
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn selects_true_branch_for_variable_condition() {
        let x = start_recording(vec![AzFloat(-1.0_f64), AzFloat(10.0), AzFloat(20.0)]);
        let y = super::cond_exp_lt(x[0], AD::constant(AzFloat(0.0_f64)), x[1], x[2]);
        assert_eq!(y.value.0, 10.0);
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 1);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn all_constant_folds_without_tape() {
        let y = super::cond_exp_ge(
            AD::constant(AzFloat(3.0_f64)),
            AD::constant(AzFloat(1.0_f64)),
            AD::constant(AzFloat(100.0_f64)),
            AD::constant(AzFloat(200.0_f64)),
        );
        assert!(y.is_constant());
        assert_eq!(y.value.0, 100.0);
    }
}
