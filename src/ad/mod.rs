// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The differentiable scalar type `AD<Base>` (component C4); see
//! `spec.md` §3 "Differentiable scalar `AD<Base>`" and §4.4.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
pub mod binary;
pub mod call;
pub mod compare;
pub mod compound;
pub mod cond;
pub mod transcend;
pub mod unary;
pub mod vecad;

use crate::ad_type::ADType;
use crate::base::Base;
use crate::tape::{IndexT, ThisThreadTape};

/// A value carrying `(value, tape_id, taddr, ad_type)`; see `spec.md` §3.
///
/// `taddr` (here named `index` to match the field already used by
/// `tape::stop_recording`) is a variable-value-space address when
/// `ad_type = Variable`, a parameter-pool address when `ad_type =
/// DynamicP`, and unused (always 0) when `ad_type = ConstantP`.
#[derive(Clone, Copy, Debug)]
pub struct AD<V> {
    pub value: V,
    pub tape_id: usize,
    pub index: usize,
    pub ad_type: ADType,
}

impl<V: Base> AD<V> {
    pub fn new(tape_id: usize, index: usize, ad_type: ADType, value: V) -> Self {
        AD { value, tape_id, index, ad_type }
    }

    /// A `ConstantP` built directly from a `Base` value; see `spec.md` §3
    /// "An object built by construction from `Base` is always `constant`."
    pub fn constant(value: V) -> Self {
        AD { value, tape_id: 0, index: 0, ad_type: ADType::ConstantP }
    }

    pub fn is_constant(&self) -> bool {
        self.ad_type.is_constant()
    }
    pub fn is_dynamic(&self) -> bool {
        self.ad_type.is_dynamic()
    }
    pub fn is_variable(&self) -> bool {
        self.ad_type.is_variable()
    }
    pub fn is_parameter(&self) -> bool {
        self.ad_type.is_parameter()
    }

    /// `Value(x)`; requires `x` to be a parameter (`spec.md` §6).
    pub fn value(&self) -> V {
        if self.is_variable() {
            crate::error::known("Value: called on a variable AD object");
        }
        self.value
    }

    /// `Integer(x)`; the integer part of `x`'s value, matching CppAD's
    /// `Integer()` free function.
    pub fn integer(&self) -> i32 {
        self.value.to_f64() as i32
    }
}

impl<V: Base> From<V> for AD<V> {
    fn from(value: V) -> Self {
        AD::constant(value)
    }
}

impl<V: std::fmt::Display> std::fmt::Display for AD<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Verifies `a`/`b` may be combined: either is non-variable, or both are
/// variables of the *same* tape (`spec.md` §4.4 step 3,
/// `DifferentTapeError`).
pub(crate) fn check_same_tape<V>(a: &AD<V>, b: &AD<V>) {
    if a.is_variable() && b.is_variable() && a.tape_id != b.tape_id {
        crate::error::known("AD operator: operands belong to different tapes");
    }
}

/// Ensures a constant operand has an address in the *current* tape's
/// parameter pool (dynamic/variable operands already have one); allocates
/// a fresh entry when needed. Returns the parameter-pool address.
pub(crate) fn pool_addr<V>(operand: &AD<V>, tape: &mut crate::tape::Tape<V>) -> IndexT
where
    V: Base,
{
    if operand.is_constant() {
        tape.put_con(operand.value)
    } else {
        operand.index as IndexT
    }
}

/// Runs `f` with mutable access to this thread's active tape for `V`,
/// generic-friendly re-export of `tape::with_tape` for the `ad` submodules.
pub(crate) fn with_tape<V, R>(f: impl FnOnce(&mut crate::tape::Tape<V>) -> R) -> R
where
    V: Base + ThisThreadTape,
{
    crate::tape::with_tape(f)
}

fn require_recording_for<V: Base>(tape: &crate::tape::Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

/// Records a single-result unary operator: folds to a constant when `a`
/// is constant, otherwise appends one record to the main tape (`a`
/// variable) or the dynamic-parameter stream (`a` dynamic); see `spec.md`
/// §4.4 "Unary operators follow the analogous rule."
pub(crate) fn unary_record<V>(a: AD<V>, op_id: crate::op::id::OpId, value: V) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    if a.is_constant() {
        return AD::constant(value);
    }
    with_tape::<V, _>(|tape| {
        require_recording_for(tape, a.tape_id);
        if a.is_variable() {
            let addr = tape.var.put_op(op_id, &[a.index as IndexT], 1);
            AD::new(a.tape_id, addr as usize, ADType::Variable, value)
        } else {
            let addr = tape.put_dyn(op_id, &[a.index as IndexT], value);
            AD::new(a.tape_id, addr as usize, ADType::DynamicP, value)
        }
    })
}

/// Records a two-result-slot unary operator (`SinCosOp`/`TanTanhOp`/
/// `TanhOp`/`SinhCoshOp`); returns an `AD<V>` pointing at slot 0
/// (`want_second = false`) or slot 1 (`want_second = true`) of the record
/// just appended (`spec.md` §4.1 "produce two slots").
pub(crate) fn two_slot_record<V>(
    a: AD<V>,
    op_id: crate::op::id::OpId,
    value0: V,
    value1: V,
    want_second: bool,
) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    let value = if want_second { value1 } else { value0 };
    if a.is_constant() {
        return AD::constant(value);
    }
    with_tape::<V, _>(|tape| {
        require_recording_for(tape, a.tape_id);
        let first = if a.is_variable() {
            tape.var.put_op(op_id, &[a.index as IndexT], 2)
        } else {
            tape.put_dyn_multi(op_id, &[a.index as IndexT], &[value0, value1])
        };
        let addr = if want_second { first + 1 } else { first };
        let ad_type = if a.is_variable() { ADType::Variable } else { ADType::DynamicP };
        AD::new(a.tape_id, addr as usize, ad_type, value)
    })
}
