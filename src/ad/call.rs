// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `call_atomic`, the recording-time entry point for component C8; see
//! `spec.md` §4.10 "Atomic/checkpoint extension".
//!
//! A call folds to constants when every operand is a parameter (the result
//! is computed once via `atom::forward_zero` and never touches the tape).
//! Otherwise every operand is recorded (`FunavOp` for a variable operand,
//! `FunapOp` for a parameter one, dynamic parameters included) and every
//! result is recorded as a new variable (`FunrvOp`): this port does not ask
//! the atomic for a per-output dependency pattern, so a call with at least
//! one variable operand conservatively marks all of its outputs variable
//! (see `DESIGN.md`, "atomic calls always produce variable outputs").
// ---------------------------------------------------------------------------
use crate::ad::{pool_addr, with_tape, AD};
use crate::ad_type::ADType;
use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op::id;
use crate::tape::{IndexT, ThisThreadTape, Tape};

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("call_atomic: no matching tape is currently recording");
    }
}

/// Records (or folds) a call to the atomic function registered at
/// `atom_index`; `call_id` distinguishes different call sites sharing the
/// same atomic, the way CppAD's `call_id` parameter does.
pub fn call_atomic<V>(atom_index: usize, call_id: usize, x: Vec<AD<V>>) -> Vec<AD<V>>
where
    V: Base + ThisThreadTape + AtomicRegistry,
{
    let x_value: Vec<V> = x.iter().map(|a| a.value).collect();
    let y_value = crate::atom::forward_zero::<V>(atom_index, call_id, &x_value);

    let any_variable = x.iter().any(|a| a.is_variable());
    if !any_variable {
        return y_value.into_iter().map(AD::constant).collect();
    }
    let tape_id = x.iter().find(|a| a.is_variable()).unwrap().tape_id;
    for a in &x {
        if a.is_variable() && a.tape_id != tape_id {
            crate::error::known("call_atomic: operands belong to different tapes");
        }
    }

    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        let n = x.len();
        let m = y_value.len();
        tape.var.put_op(id::AFUN_OP, &[atom_index as IndexT, call_id as IndexT, n as IndexT, m as IndexT], 0);
        for a in &x {
            if a.is_variable() {
                tape.var.put_op(id::FUNAV_OP, &[a.index as IndexT], 0);
            } else {
                let addr = pool_addr(a, tape);
                tape.var.put_op(id::FUNAP_OP, &[addr], 0);
            }
        }
        let mut result = Vec::with_capacity(m);
        for &value in &y_value {
            let addr = tape.var.put_op(id::FUNRV_OP, &[], 1);
            result.push(AD::new(tape_id, addr as usize, ADType::Variable, value));
        }
        tape.var.put_op(id::AFUN_OP, &[atom_index as IndexT, call_id as IndexT, n as IndexT, m as IndexT], 0);
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{impl_atomic_registry, register, AtomicFn};
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    struct Square;
    impl AtomicFn<AzFloat<f64>> for Square {
        fn name(&self) -> &str {
            "square"
        }
        fn forward_zero(&self, _call_id: usize, x: &[AzFloat<f64>]) -> Vec<AzFloat<f64>> {
            vec![x[0] * x[0]]
        }
        fn forward_one(&self, _call_id: usize, x: &[AzFloat<f64>], dx: &[AzFloat<f64>]) -> Vec<AzFloat<f64>> {
            vec![AzFloat(2.0) * x[0] * dx[0]]
        }
        fn reverse_one(&self, _call_id: usize, x: &[AzFloat<f64>], dy: &[AzFloat<f64>]) -> Vec<AzFloat<f64>> {
            vec![AzFloat(2.0) * x[0] * dy[0]]
        }
    }

    #[test]
    fn constant_operands_fold_without_recording() {
        let atom_index = register::<AzFloat<f64>>(Box::new(Square));
        let x = vec![AD::constant(AzFloat(3.0_f64))];
        let y = call_atomic(atom_index, 0, x);
        assert!(y[0].is_constant());
        assert_eq!(y[0].value.0, 9.0);
    }

    #[test]
    fn variable_operand_records_bracket() {
        let atom_index = register::<AzFloat<f64>>(Box::new(Square));
        let x = start_recording(vec![AzFloat(3.0_f64)]);
        let y = call_atomic(atom_index, 0, vec![x[0]]);
        assert!(y[0].is_variable());
        assert_eq!(y[0].value.0, 9.0);
        let f = stop_recording(y);
        assert_eq!(f.domain_len(), 1);
        abort_recording::<AzFloat<f64>>();
    }
}
