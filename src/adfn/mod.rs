// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ADfn<V>`, the sealed function object (component C7); see `spec.md` §3
//! "Function object `F`" and §6.
//!
//! `stop_recording` hands this module a tape whose `var`/`dyp` streams are
//! fully populated and whose `var.dep` already names the dependent
//! addresses (every dependent, parameter or variable, is bound to a
//! variable-value-space address by the time recording stops; see
//! `tape::stop_recording`'s `ParOp` binding). `ADfn::from_tape` takes
//! ownership of everything the tape recorded and owns, in addition, the
//! runtime state the sweeps in [forward] / [reverse] need: the Taylor
//! coefficient matrix, the reverse adjoint buffer, the VecAD runtime array,
//! and the compare-change witness (`spec.md` §4.6).
// ---------------------------------------------------------------------------
pub mod derivative;
pub mod forward;
pub mod graph;
pub mod optimize;
pub mod reverse;
pub mod sparsity;

use crate::base::Base;
use crate::tape::{IndexT, OpSequence, Tape};

/// A sealed, replayable operation sequence; see `spec.md` §3 "Function
/// object `F`".
pub struct ADfn<V> {
    pub(crate) dyp: OpSequence,
    pub(crate) var: OpSequence,
    pub(crate) par: Vec<V>,
    pub(crate) is_dyn: Vec<bool>,
    pub(crate) text: Vec<String>,
    pub(crate) vecad_len: Vec<IndexT>,
    pub(crate) vecad_ind: Vec<IndexT>,
    pub(crate) dyn_par_addr: Vec<IndexT>,

    /// `taylor[addr][k]` is the order-`k` Taylor coefficient of the
    /// variable at `addr`; row 0 is the unused phantom slot. Grows in the
    /// column direction as higher orders are requested.
    pub(crate) taylor: Vec<Vec<V>>,
    /// Highest order for which `taylor` holds a value, or `None` before the
    /// first `Forward(0, ·)` call.
    pub(crate) order_this: Option<usize>,
    /// Reverse-mode adjoint buffer, same shape as `taylor`; retained across
    /// calls only when `hold_reverse_mem` is set (`spec.md` §4.7).
    pub(crate) partial: Vec<Vec<V>>,

    pub(crate) vecad_runtime_value: Vec<V>,
    pub(crate) vecad_runtime_source: Vec<Option<IndexT>>,
    /// `ld_source[op_index]` is the variable address (if any) that supplied
    /// the value of a `LdpOp`/`LdvOp` *at the moment it was recorded*,
    /// captured during the last order-zero forward sweep; unlike
    /// `vecad_runtime_source` (which reflects only the final state of each
    /// VecAD slot) this lets `reverse` route a load's adjoint back to the
    /// store that was actually live for that particular read.
    pub(crate) ld_source: Vec<Option<IndexT>>,

    /// One slot per comparison/conditional encountered during a sweep, in
    /// sweep order; `None` until the first `Forward(0, ·)` populates it.
    pub(crate) compare_witness: Vec<Option<bool>>,
    pub(crate) compare_change_count: usize,

    pub(crate) check_for_nan: bool,
    pub(crate) hold_reverse_mem: bool,
    pub(crate) function_name: String,
}

impl<V: Base> ADfn<V> {
    /// Takes ownership of a just-sealed tape's recorded state; called by
    /// `tape::stop_recording` before it resets `tape.dyp`/`tape.var`.
    pub(crate) fn from_tape(tape: &mut Tape<V>, dep: Vec<IndexT>) -> Self {
        let dyp = std::mem::replace(&mut tape.dyp, OpSequence::new(0));
        let mut var = std::mem::replace(&mut tape.var, OpSequence::new(0));
        var.dep = dep;
        ADfn {
            dyp,
            var,
            par: std::mem::take(&mut tape.par),
            is_dyn: std::mem::take(&mut tape.is_dyn),
            text: std::mem::take(&mut tape.text),
            vecad_len: std::mem::take(&mut tape.vecad_len),
            vecad_ind: std::mem::take(&mut tape.vecad_ind),
            dyn_par_addr: std::mem::take(&mut tape.dyn_par_addr),
            taylor: Vec::new(),
            order_this: None,
            partial: Vec::new(),
            vecad_runtime_value: Vec::new(),
            vecad_runtime_source: Vec::new(),
            ld_source: Vec::new(),
            compare_witness: Vec::new(),
            compare_change_count: 0,
            check_for_nan: false,
            hold_reverse_mem: false,
            function_name: String::new(),
        }
    }

    /// `f.Domain()`: the number of independent variables.
    pub fn domain_len(&self) -> usize {
        self.var.n_domain
    }
    /// `f.Range()`: the number of dependent variables.
    pub fn range_len(&self) -> usize {
        self.var.dep.len()
    }
    /// `f.size_var()`: total number of variable-value-space addresses,
    /// excluding the reserved phantom slot 0.
    pub fn size_var(&self) -> usize {
        self.var.n_result - 1
    }
    /// `f.size_op()`: number of operators recorded in the main stream.
    pub fn size_op(&self) -> usize {
        self.var.n_op()
    }
    /// `f.size_par()`: number of parameter-pool entries (constants and
    /// dynamic parameters together).
    pub fn size_par(&self) -> usize {
        self.par.len()
    }
    /// `f.size_dyn_ind()`: number of independent dynamic parameters.
    pub fn size_dyn_ind(&self) -> usize {
        self.dyp.n_domain
    }
    pub fn size_text(&self) -> usize {
        self.text.len()
    }
    pub fn size_vecad(&self) -> usize {
        self.vecad_len.len()
    }

    /// `f.Parameter(i)`; errors if address `i` is not a parameter-pool
    /// address (`spec.md` §6).
    pub fn parameter(&self, i: usize) -> V {
        self.par[i]
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }
    pub fn set_function_name(&mut self, name: String) {
        self.function_name = name;
    }

    /// `f.compare_change_number()`: number of comparisons (and conditional
    /// selections) whose boolean outcome differs from the previous
    /// `Forward(0, ·)` call's outcome; `0` before any call has a
    /// predecessor to compare against (`spec.md` §4.6). This port compares
    /// each `Forward(0, ·)` against the *previous* one rather than against
    /// the value at the moment of recording, since the tape itself does not
    /// retain the domain values used when it was taped (`DESIGN.md`).
    pub fn compare_change_number(&self) -> usize {
        self.compare_change_count
    }

    pub fn check_for_nan(&mut self, flag: bool) {
        self.check_for_nan = flag;
    }
    pub fn hold_reverse_memory(&mut self, flag: bool) {
        self.hold_reverse_mem = flag;
        if !flag {
            self.partial.clear();
        }
    }

    /// `f.new_dynamic(p)`: replaces the dynamic-parameter independents and
    /// replays the `dyp` stream at order zero so every dynamic parameter in
    /// `self.par` reflects the new input (`spec.md` §4.2).
    pub fn new_dynamic(&mut self, p: Vec<V>)
    where
        V: crate::op::info::GlobalOpInfoVec,
    {
        if p.len() != self.dyp.n_domain {
            crate::error::known("f.new_dynamic: wrong number of dynamic parameters");
        }
        let op_info = <V as crate::op::info::GlobalOpInfoVec>::get();
        // Over-allocates by the number of record-only comparisons (each
        // consumes an id_seq slot but no result address); harmless.
        let n_dyp_var = self.dyp.n_domain + self.dyp.n_op();
        let mut dyp_val: Vec<Vec<V>> = vec![vec![V::nan(); 1]; n_dyp_var + 1];
        for (j, value) in p.into_iter().enumerate() {
            dyp_val[j + 1][0] = value;
        }
        let mut res = self.dyp.n_domain + 1;
        let mut dyn_par_idx = 0;
        for op_index in 0..self.dyp.id_seq.len() {
            let op_id = self.dyp.id_seq[op_index];
            let args = self.dyp.args(op_index);
            if crate::op::compare::is_compare_op(op_id) {
                // Record-only: no value produced, nothing to replay.
                continue;
            }
            let info = &op_info[op_id as usize];
            (info.forward)(0, args, &self.par, &mut dyp_val, res);
            let dst = self.dyn_par_addr[dyn_par_idx] as usize;
            dyn_par_idx += 1;
            for k in 0..info.n_res {
                self.par[dst + k] = dyp_val[res + k][0];
            }
            res += info.n_res;
        }
    }
}
