// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `PartialEq`/`PartialOrd` for `AD<V>`; see `spec.md` §4.1 "Comparisons"
//! and §4.6 "Compare-change counter".
//!
//! A comparison always returns the plain `bool` result of comparing the
//! underlying `Base` values; as a side effect, when at least one operand is
//! a variable or dynamic parameter, it appends a record-only (`n_res = 0`)
//! comparison opcode to the matching operator stream, so a later replay
//! under different independent values can detect that the same branch would
//! no longer be taken (`f.compare_change_number()`).
//!
//! `Gt`/`Ge` have no opcode of their own: `a > b` records as `b < a` and
//! `a >= b` as `b <= a`, swapping which operand lands in the `Pv` slot when
//! one side is a parameter (`F.2`, CppAD's `CondExpGt`/`CondExpGe`
//! convention generalized to plain boolean comparison).
// ---------------------------------------------------------------------------
use crate::ad::{check_same_tape, pool_addr, with_tape, AD};
use crate::base::Base;
use crate::op::id;
use crate::tape::{IndexT, ThisThreadTape, Tape};

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

/// Appends a comparison record (no result slot) to the main tape or the
/// dynamic-parameter stream, whichever `a`/`b` actually drive; a no-op when
/// both operands are constant. `vp_op = None` means the operator
/// canonicalizes into the `Pv` form only (`eq`/`ne`, `spec.md` §4.1).
fn record_compare<V>(a: AD<V>, b: AD<V>, vv_op: id::OpId, pv_op: id::OpId, vp_op: Option<id::OpId>)
where
    V: Base + ThisThreadTape,
{
    if a.is_constant() && b.is_constant() {
        return;
    }
    check_same_tape(&a, &b);
    let use_var = a.is_variable() || b.is_variable();
    let tape_id = if a.is_variable() {
        a.tape_id
    } else if b.is_variable() {
        b.tape_id
    } else if a.is_dynamic() {
        a.tape_id
    } else {
        b.tape_id
    };
    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        let is_driver = |x: &AD<V>| if use_var { x.is_variable() } else { x.is_dynamic() };
        let (op_id, args) = if is_driver(&a) && is_driver(&b) {
            (vv_op, [a.index as IndexT, b.index as IndexT])
        } else if is_driver(&b) {
            let left = pool_addr(&a, tape);
            (pv_op, [left, b.index as IndexT])
        } else if is_driver(&a) {
            match vp_op {
                Some(op) => {
                    let right = pool_addr(&b, tape);
                    (op, [a.index as IndexT, right])
                }
                None => {
                    let left = pool_addr(&b, tape);
                    (pv_op, [left, a.index as IndexT])
                }
            }
        } else {
            crate::error::unknown("ad::compare: neither operand drives the chosen stream");
            (vv_op, [0 as IndexT, 0 as IndexT])
        };
        let stream = if use_var { &mut tape.var } else { &mut tape.dyp };
        stream.put_op(op_id, &args, 0);
    });
}

impl<V: Base + ThisThreadTape> PartialEq for AD<V> {
    fn eq(&self, other: &Self) -> bool {
        record_compare(*self, *other, id::EQ_VV_OP, id::EQ_PV_OP, None);
        self.value == other.value
    }
    fn ne(&self, other: &Self) -> bool {
        record_compare(*self, *other, id::NE_VV_OP, id::NE_PV_OP, None);
        self.value != other.value
    }
}

impl<V: Base + ThisThreadTape> PartialOrd for AD<V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
    fn lt(&self, other: &Self) -> bool {
        record_compare(*self, *other, id::LT_VV_OP, id::LT_PV_OP, Some(id::LT_VP_OP));
        self.value < other.value
    }
    fn le(&self, other: &Self) -> bool {
        record_compare(*self, *other, id::LE_VV_OP, id::LE_PV_OP, Some(id::LE_VP_OP));
        self.value <= other.value
    }
    fn gt(&self, other: &Self) -> bool {
        record_compare(*other, *self, id::LT_VV_OP, id::LT_PV_OP, Some(id::LT_VP_OP));
        self.value > other.value
    }
    fn ge(&self, other: &Self) -> bool {
        record_compare(*other, *self, id::LE_VV_OP, id::LE_PV_OP, Some(id::LE_VP_OP));
        self.value >= other.value
    }
}

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn lt_of_two_variables_records_and_returns_bool() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0)]);
        assert!(x[0] < x[1]);
        assert!(!(x[1] < x[0]));
        let f = stop_recording(vec![x[0], x[1]]);
        // two record-only comparisons were appended, each with no result slot
        assert_eq!(f.size_op(), 2);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn gt_swaps_into_lt_of_swapped_operands() {
        let x = start_recording(vec![AzFloat(3.0_f64), AzFloat(1.0)]);
        assert!(x[0] > x[1]);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn eq_of_two_constants_is_not_recorded() {
        use crate::ad::AD;
        let a = AD::constant(AzFloat(1.0_f64));
        let b = AD::constant(AzFloat(1.0_f64));
        assert!(a == b);
    }
}
