// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `VecAD<V>` (component C5); see `spec.md` §3 "VecAD" and §4.5.
//!
//! Unlike every other `AD<V>` producer, a `VecAD` element access is always
//! recorded as a fresh variable while a tape is open — the load's result
//! may alias a different element on replay (the index can itself be a
//! variable), so there is no way to fold it away at record time the way
//! `spec.md` §4.3's scalar identities can. `VecAD` keeps its own shadow
//! `values: Vec<V>` so indexing returns the right answer immediately during
//! recording, mirroring what `op::vecad`'s runtime array does on replay.
//! Scoped to order 0 (see `DESIGN.md`): a `VecAD` built from only constant
//! elements never touches the tape at all.
// ---------------------------------------------------------------------------
use crate::ad::{pool_addr, with_tape, AD};
use crate::ad_type::ADType;
use crate::base::Base;
use crate::op::id;
use crate::tape::{IndexT, ThisThreadTape, Tape};

pub struct VecAD<V> {
    tape_id: usize,
    vec_id: usize,
    len: usize,
    values: Vec<V>,
}

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

fn round_index<V: Base>(value: V) -> usize {
    let f = value.to_f64();
    if f < 0.0 {
        crate::error::known("VecAD: negative index");
    }
    f.round() as usize
}

impl<V: Base + ThisThreadTape> VecAD<V> {
    /// Builds a `VecAD` from its initial element values; registers a new
    /// entry in the active tape's `vecad_len`/`vecad_ind` pools only if at
    /// least one element is non-constant.
    pub fn new(initial: Vec<AD<V>>) -> Self {
        let len = initial.len();
        let values: Vec<V> = initial.iter().map(|x| x.value).collect();
        let active = initial.iter().find(|x| !x.is_constant());
        let Some(active) = active else {
            return VecAD { tape_id: 0, vec_id: 0, len, values };
        };
        let tape_id = active.tape_id;
        with_tape::<V, _>(|tape| {
            require_recording(tape, tape_id);
            let vec_id = tape.vecad_len.len();
            let ind: Vec<IndexT> = initial.iter().map(|x| pool_addr(x, tape)).collect();
            tape.vecad_len.push(len as IndexT);
            tape.vecad_ind.extend(ind);
            VecAD { tape_id, vec_id, len, values }
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_recording(&self) -> bool {
        self.tape_id != 0
    }

    /// `v[index]`; always a `Variable` while `v` is tape-backed.
    pub fn get(&self, index: AD<V>) -> AD<V> {
        let i = round_index(index.value);
        let value = self.values[i];
        if !self.is_recording() {
            return AD::constant(value);
        }
        with_tape::<V, _>(|tape| {
            require_recording(tape, self.tape_id);
            let (op_id, index_addr) = if index.is_variable() {
                (id::LDV_OP, index.index as IndexT)
            } else {
                (id::LDP_OP, pool_addr(&index, tape))
            };
            let addr = tape.var.put_op(op_id, &[self.vec_id as IndexT, index_addr], 1);
            AD::new(self.tape_id, addr as usize, ADType::Variable, value)
        })
    }

    /// `v[index] = value`.
    pub fn set(&mut self, index: AD<V>, value: AD<V>) {
        let i = round_index(index.value);
        self.values[i] = value.value;
        if !self.is_recording() {
            return;
        }
        with_tape::<V, _>(|tape| {
            require_recording(tape, self.tape_id);
            let op_id = match (index.is_variable(), value.is_variable()) {
                (false, false) => id::STPP_OP,
                (false, true) => id::STPV_OP,
                (true, false) => id::STVP_OP,
                (true, true) => id::STVV_OP,
            };
            let index_addr = if index.is_variable() { index.index as IndexT } else { pool_addr(&index, tape) };
            let value_addr = if value.is_variable() { value.index as IndexT } else { pool_addr(&value, tape) };
            tape.var.put_op(op_id, &[self.vec_id as IndexT, index_addr, value_addr], 0);
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::ad::AD;
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn store_then_load_with_constant_vecad_records_nothing() {
        let v = super::VecAD::new(vec![
            AD::constant(AzFloat(1.0_f64)),
            AD::constant(AzFloat(2.0)),
        ]);
        let y = v.get(AD::constant(AzFloat(1.0_f64)));
        assert!(y.is_constant());
        assert_eq!(y.value.0, 2.0);
    }

    #[test]
    fn store_then_load_with_variable_index_records_ops() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(7.0)]);
        let mut v = super::VecAD::new(vec![AD::constant(AzFloat(0.0_f64)), x[1]]);
        v.set(AD::constant(AzFloat(0.0_f64)), x[0]);
        let y = v.get(x[0]);
        assert_eq!(y.value.0, 1.0);
        assert!(y.is_variable());
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 2);
        abort_recording::<AzFloat<f64>>();
    }
}
