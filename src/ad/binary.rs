// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `+ - * /` on `AD<V>`; see `spec.md` §4.4 "Contract for every overloaded
//! binary operator".
//!
//! Every operator: (1) always computes `c.value` in `Base`; (2) classifies
//! the result's [ADType] from its operands' types; (3) when the result is
//! `Variable`, appends a record to the main tape, canonicalizing operand
//! order for `+`/`*` so only the `Pv` opcode is ever stored (`spec.md`
//! §4.1, last paragraph); when the result is `Dynamic`, appends a record
//! to the dynamic-parameter stream instead (`spec.md` §4.2); the identity
//! folds of `spec.md` §4.3 are applied before either kind of record would
//! otherwise be emitted.
// ---------------------------------------------------------------------------
use crate::ad::{check_same_tape, pool_addr, with_tape, AD};
use crate::ad_type::ADType;
use crate::base::Base;
use crate::op::id;
use crate::tape::{IndexT, ThisThreadTape, Tape};

/// Fetches the tape that a dynamic-only computation must record into: the
/// (necessarily unique) active tape referenced by whichever of `a`/`b` is
/// dynamic.
fn active_tape_id<V: Base>(a: &AD<V>, b: &AD<V>) -> usize {
    if a.is_dynamic() {
        a.tape_id
    } else if b.is_dynamic() {
        b.tape_id
    } else {
        crate::error::unknown("ad::binary: no dynamic operand to locate the active tape");
        0
    }
}

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

/// Records a new dynamic parameter computed from `a`/`b` (neither a
/// variable) and returns the `Dynamic` result.
fn record_dyn<V>(a: AD<V>, b: AD<V>, op_id: id::OpId, value: V) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    let tape_id = active_tape_id(&a, &b);
    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        let left = pool_addr(&a, tape);
        let right = pool_addr(&b, tape);
        let addr = tape.put_dyn(op_id, &[left, right], value);
        AD::new(tape_id, addr as usize, ADType::DynamicP, value)
    })
}

/// Records a new variable computed from `a`/`b` (at least one a variable)
/// using the `Pv` form when `pv_only` (the operator is canonicalized) or
/// the full `Vv`/`Pv`/`Vp` family otherwise.
#[allow(clippy::too_many_arguments)]
fn record_var<V>(
    a: AD<V>,
    b: AD<V>,
    vv_op: id::OpId,
    pv_op: id::OpId,
    vp_op: Option<id::OpId>,
    value: V,
) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    check_same_tape(&a, &b);
    let tape_id = if a.is_variable() { a.tape_id } else { b.tape_id };
    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        let addr = if a.is_variable() && b.is_variable() {
            tape.var.put_op(vv_op, &[a.index as IndexT, b.index as IndexT], 1)
        } else if b.is_variable() {
            let left = pool_addr(&a, tape);
            tape.var.put_op(pv_op, &[left, b.index as IndexT], 1)
        } else {
            let right = pool_addr(&b, tape);
            match vp_op {
                Some(op) => tape.var.put_op(op, &[a.index as IndexT, right], 1),
                None => {
                    crate::error::unknown("ad::binary: operator has no Vp form");
                    0
                }
            }
        };
        AD::new(tape_id, addr as usize, ADType::Variable, value)
    })
}

/// Shared skeleton for `+ - * /`: handles the both-constant fast path and
/// dispatches to [record_var] / [record_dyn] once an identity fold has
/// been ruled out. `fold` implements the operator-specific identities of
/// `spec.md` §4.3 and returns `Some` when no tape record is needed.
#[allow(clippy::too_many_arguments)]
fn binary_op<V, Fold>(
    a: AD<V>,
    b: AD<V>,
    value: V,
    vv_op: id::OpId,
    pv_op: id::OpId,
    vp_op: Option<id::OpId>,
    fold: Fold,
) -> AD<V>
where
    V: Base + ThisThreadTape,
    Fold: FnOnce(&AD<V>, &AD<V>, V) -> Option<AD<V>>,
{
    if a.is_constant() && b.is_constant() {
        return AD::constant(value);
    }
    check_same_tape(&a, &b);
    if let Some(folded) = fold(&a, &b, value) {
        return folded;
    }
    if a.is_variable() || b.is_variable() {
        record_var(a, b, vv_op, pv_op, vp_op, value)
    } else {
        record_dyn(a, b, vv_op, value)
    }
}

fn add_fold<V: Base>(a: &AD<V>, b: &AD<V>, _value: V) -> Option<AD<V>> {
    if b.is_constant() && b.value.identical_zero() {
        return Some(*a);
    }
    if a.is_constant() && a.value.identical_zero() {
        return Some(*b);
    }
    None
}

fn sub_fold<V: Base>(a: &AD<V>, b: &AD<V>, _value: V) -> Option<AD<V>> {
    if b.is_constant() && b.value.identical_zero() {
        return Some(*a);
    }
    None
}

fn mul_fold<V: Base>(a: &AD<V>, b: &AD<V>, _value: V) -> Option<AD<V>> {
    if b.is_constant() && b.value.identical_one() {
        return Some(*a);
    }
    if a.is_constant() && a.value.identical_one() {
        return Some(*b);
    }
    // `spec.md` §9 Open Question: `v*0`/`0*v` fold to a *constant* zero
    // here (one of the two documented alternatives; see `DESIGN.md`).
    if (b.is_constant() && b.value.identical_zero()) || (a.is_constant() && a.value.identical_zero()) {
        return Some(AD::constant(V::zero()));
    }
    None
}

fn div_fold<V: Base>(a: &AD<V>, b: &AD<V>, _value: V) -> Option<AD<V>> {
    if b.is_constant() && b.value.identical_one() {
        return Some(*a);
    }
    if a.is_constant() && a.value.identical_zero() && b.is_variable() {
        return Some(AD::constant(V::zero()));
    }
    None
}

pub fn add<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value + b.value;
    binary_op(a, b, value, id::ADD_VV_OP, id::ADD_PV_OP, None, add_fold)
}
pub fn sub<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value - b.value;
    binary_op(a, b, value, id::SUB_VV_OP, id::SUB_PV_OP, Some(id::SUB_VP_OP), sub_fold)
}
pub fn mul<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value * b.value;
    binary_op(a, b, value, id::MUL_VV_OP, id::MUL_PV_OP, None, mul_fold)
}
pub fn div<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value / b.value;
    binary_op(a, b, value, id::DIV_VV_OP, id::DIV_PV_OP, Some(id::DIV_VP_OP), div_fold)
}

macro_rules! impl_ad_op {
    ($trait:ident, $method:ident, $func:path) => {
        impl<V: Base + ThisThreadTape> std::ops::$trait for AD<V> {
            type Output = AD<V>;
            fn $method(self, other: AD<V>) -> AD<V> {
                $func(self, other)
            }
        }
        impl<V: Base + ThisThreadTape> std::ops::$trait<V> for AD<V> {
            type Output = AD<V>;
            fn $method(self, other: V) -> AD<V> {
                $func(self, AD::constant(other))
            }
        }
    };
}
impl_ad_op!(Add, add, crate::ad::binary::add);
impl_ad_op!(Sub, sub, crate::ad::binary::sub);
impl_ad_op!(Mul, mul, crate::ad::binary::mul);
impl_ad_op!(Div, div, crate::ad::binary::div);

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn add_of_two_variables_emits_one_op() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0)]);
        let y = x[0] + x[1];
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 1);
        assert_eq!(y.value.0, 3.0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn add_zero_identity_is_not_recorded() {
        let x = start_recording(vec![AzFloat(5.0_f64)]);
        let y = x[0] + AzFloat(0.0_f64);
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn mul_by_zero_folds_to_constant() {
        let x = start_recording(vec![AzFloat(5.0_f64)]);
        let y = x[0] * AzFloat(0.0_f64);
        assert!(y.is_constant());
        let _ = stop_recording(vec![y]);
        abort_recording::<AzFloat<f64>>();
    }
}
