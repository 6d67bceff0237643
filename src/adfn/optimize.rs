// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ADfn::optimize`, the dead-code/common-subexpression pass (component C7);
//! see `spec.md` §4.9.
//!
//! One backward pass over `op_res_addr()` marks every variable-value-space
//! address that a kept dependent, store, print, or comparison can reach;
//! one forward pass then rebuilds `var` from scratch, dropping any operator
//! whose every result address goes unmarked and folding two operators into
//! one whenever they share an opcode and (already-remapped) operand set.
//! Because the rebuild runs forward and every operand of operator `k` was
//! already assigned its final address by the time `k` is visited
//! (`spec.md` §3 "topological order equals sequential order"), a single
//! pass already reaches the fixed point that dedicated constant-folding,
//! CSE, and dense-renumbering sub-passes would otherwise need several
//! rounds to reach; see `DESIGN.md` for the scope this simplifies away
//! (record-time constant folding already prevents a table operator from
//! ever having every operand constant, a literal `CSumOp` opcode, and
//! `cskip_info` annotations are not implemented).
//!
//! Comparisons and `CExpOp` are never merged or dropped: each occurrence
//! keeps its own slot in the compare-change witness, so collapsing
//! duplicates would change `compare_change_number()` (`spec.md` §4.6).
//! VecAD loads are never merged, since their value depends on the runtime
//! store history rather than purely on their operand addresses; VecAD
//! stores, prints, and atomic-call brackets are always kept verbatim
//! (side-effecting) whenever any of their own result addresses is needed.
// ---------------------------------------------------------------------------
use rustc_hash::FxHashMap;

use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op;
use crate::op::id::OpId;
use crate::op::info::GlobalOpInfoVec;
use crate::tape::{IndexT, OpSequence};

use super::ADfn;

/// Operand positions (into `args`) that name a variable-value-space address
/// for every opcode dispatched generically through `op::info::op_info_vec`;
/// every other position in `args` is a parameter-pool index and must be
/// copied through unchanged. `Pv`/`Vp` suffixes fix the position; every
/// remaining table entry (the unary family, including the two-slot ones)
/// takes its single operand at position 0.
fn var_arg_positions(op_id: OpId) -> &'static [usize] {
    use crate::op::id::*;
    match op_id {
        x if x == ADD_PV_OP
            || x == SUB_PV_OP
            || x == MUL_PV_OP
            || x == DIV_PV_OP
            || x == POW_PV_OP
            || x == ATAN2_PV_OP =>
        {
            &[1]
        }
        x if x == SUB_VP_OP || x == DIV_VP_OP || x == POW_VP_OP || x == ATAN2_VP_OP => &[0],
        x if x == ADD_VV_OP
            || x == SUB_VV_OP
            || x == MUL_VV_OP
            || x == DIV_VV_OP
            || x == POW_VV_OP
            || x == ATAN2_VV_OP =>
        {
            &[0, 1]
        }
        x if x == PAR_OP || x == NO_OP => &[],
        _ => &[0],
    }
}

impl<V> ADfn<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry,
{
    /// Marks every address that a kept operator (dependent, comparison,
    /// print, VecAD store, or the operand side of an atomic-call bracket
    /// with at least one needed result) can reach, walking `var` back to
    /// front exactly like [super::reverse], except recording reachability
    /// instead of adjoints.
    fn needed_addrs(&self, res_addr: &[IndexT]) -> Vec<bool> {
        let op_info = <V as GlobalOpInfoVec>::get();
        let n_var = self.size_var() + 1;
        let mut needed = vec![false; n_var];
        for &addr in &self.var.dep {
            needed[addr as usize] = true;
        }

        let mut op_index = self.var.id_seq.len();
        while op_index > 0 {
            op_index -= 1;
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);

            if op::compare::is_compare_op(op_id) {
                for a in op::compare::depend(op_id, args) {
                    needed[a as usize] = true;
                }
                continue;
            }
            if op_id == op::id::CEXP_OP {
                let (left_v, right_v, true_v, false_v) = op::cond::flag_bits(args[1]);
                for (is_var, addr) in
                    [(left_v, args[2]), (right_v, args[3]), (true_v, args[4]), (false_v, args[5])]
                {
                    if is_var {
                        needed[addr as usize] = true;
                    }
                }
                continue;
            }
            if op_id == op::id::STPV_OP || op_id == op::id::STVV_OP {
                needed[args[2] as usize] = true;
                if op_id == op::id::STVV_OP {
                    needed[args[1] as usize] = true;
                }
                continue;
            }
            if op_id == op::id::STVP_OP {
                needed[args[1] as usize] = true;
                continue;
            }
            if op_id == op::id::STPP_OP {
                continue;
            }
            if op_id == op::id::PRIP_OP {
                continue;
            }
            if op_id == op::id::PRIV_OP {
                needed[args[1] as usize] = true;
                continue;
            }
            if op_id == op::id::LDP_OP {
                continue;
            }
            if op_id == op::id::LDV_OP {
                if needed[res_addr[op_index] as usize] {
                    needed[args[1] as usize] = true;
                }
                continue;
            }
            if op_id == op::id::AFUN_OP {
                let (n, m) = (args[2] as usize, args[3] as usize);
                let open_index = op_index - (n + m + 1);
                let mut any_needed = false;
                for k in 0..m {
                    let idx = open_index + 1 + n + k;
                    if self.var.id_seq[idx] == op::id::FUNRV_OP && needed[res_addr[idx] as usize] {
                        any_needed = true;
                    }
                }
                if any_needed {
                    for k in 0..n {
                        let idx = open_index + 1 + k;
                        if self.var.id_seq[idx] == op::id::FUNAV_OP {
                            needed[self.var.args(idx)[0] as usize] = true;
                        }
                    }
                }
                op_index = open_index;
                continue;
            }

            let info = &op_info[op_id as usize];
            let any_res_needed = (0..info.n_res).any(|k| needed[res_addr[op_index] as usize + k]);
            if any_res_needed {
                for &p in var_arg_positions(op_id) {
                    needed[args[p] as usize] = true;
                }
            }
        }
        needed
    }

    /// Dead-code-eliminates and common-subexpression-eliminates the main
    /// operator stream, returning a fresh function object with the same
    /// domain, range, and `Forward`/`Reverse` behavior (`spec.md` §4.9
    /// "semantics-preserving"). The parameter pool, dynamic-parameter
    /// stream, VecAD pool, and text pool are carried over unchanged: only
    /// `var` (and the variable-value-space addresses embedded in `dep`) are
    /// rewritten.
    pub fn optimize(&self) -> Self {
        let res_addr = self.op_res_addr();
        let needed = self.needed_addrs(&res_addr);
        let op_info = <V as GlobalOpInfoVec>::get();

        let mut out = OpSequence::new(self.var.n_domain);
        let mut addr_map: Vec<Option<IndexT>> = vec![None; self.size_var() + 1];
        for j in 0..=self.var.n_domain {
            addr_map[j] = Some(j as IndexT);
        }
        let mut cse: FxHashMap<(OpId, Vec<IndexT>), IndexT> = FxHashMap::default();

        let remap = |addr_map: &[Option<IndexT>], addr: IndexT| -> IndexT {
            addr_map[addr as usize].expect("optimize: operand address used before it was produced")
        };

        let mut op_index = 0usize;
        while op_index < self.var.id_seq.len() {
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index).to_vec();
            let res = res_addr[op_index] as usize;

            if op::compare::is_compare_op(op_id) {
                let mut new_args = args.clone();
                let positions: &[usize] = match op_id {
                    x if x == op::id::LT_VV_OP
                        || x == op::id::LE_VV_OP
                        || x == op::id::EQ_VV_OP
                        || x == op::id::NE_VV_OP =>
                    {
                        &[0, 1]
                    }
                    x if x == op::id::LT_PV_OP
                        || x == op::id::LE_PV_OP
                        || x == op::id::EQ_PV_OP
                        || x == op::id::NE_PV_OP =>
                    {
                        &[1]
                    }
                    _ => &[0],
                };
                for &p in positions {
                    new_args[p] = remap(&addr_map, args[p]);
                }
                out.put_op(op_id, &new_args, 0);
                op_index += 1;
                continue;
            }

            if op_id == op::id::CEXP_OP {
                let (left_v, right_v, true_v, false_v) = op::cond::flag_bits(args[1]);
                let mut new_args = args.clone();
                for (is_var, pos) in [(left_v, 2), (right_v, 3), (true_v, 4), (false_v, 5)] {
                    if is_var {
                        new_args[pos] = remap(&addr_map, args[pos]);
                    }
                }
                let new_res = out.put_op(op_id, &new_args, 1);
                addr_map[res] = Some(new_res);
                op_index += 1;
                continue;
            }

            if op_id == op::id::STPP_OP {
                out.put_op(op_id, &args, 0);
                op_index += 1;
                continue;
            }
            if op_id == op::id::STPV_OP {
                let mut new_args = args.clone();
                new_args[2] = remap(&addr_map, args[2]);
                out.put_op(op_id, &new_args, 0);
                op_index += 1;
                continue;
            }
            if op_id == op::id::STVP_OP {
                let mut new_args = args.clone();
                new_args[1] = remap(&addr_map, args[1]);
                out.put_op(op_id, &new_args, 0);
                op_index += 1;
                continue;
            }
            if op_id == op::id::STVV_OP {
                let mut new_args = args.clone();
                new_args[1] = remap(&addr_map, args[1]);
                new_args[2] = remap(&addr_map, args[2]);
                out.put_op(op_id, &new_args, 0);
                op_index += 1;
                continue;
            }
            if op_id == op::id::PRIP_OP {
                out.put_op(op_id, &args, 0);
                op_index += 1;
                continue;
            }
            if op_id == op::id::PRIV_OP {
                let mut new_args = args.clone();
                new_args[1] = remap(&addr_map, args[1]);
                out.put_op(op_id, &new_args, 0);
                op_index += 1;
                continue;
            }

            if op_id == op::id::LDP_OP {
                if needed[res] {
                    let new_res = out.put_op(op_id, &args, 1);
                    addr_map[res] = Some(new_res);
                }
                op_index += 1;
                continue;
            }
            if op_id == op::id::LDV_OP {
                if needed[res] {
                    let mut new_args = args.clone();
                    new_args[1] = remap(&addr_map, args[1]);
                    let new_res = out.put_op(op_id, &new_args, 1);
                    addr_map[res] = Some(new_res);
                }
                op_index += 1;
                continue;
            }

            if op_id == op::id::AFUN_OP {
                let (n, m) = (args[2] as usize, args[3] as usize);
                let any_needed = (0..m).any(|k| {
                    let idx = op_index + 1 + n + k;
                    self.var.id_seq[idx] == op::id::FUNRV_OP && needed[res_addr[idx] as usize]
                });
                if any_needed {
                    out.put_op(op_id, &args, 0);
                    for k in 0..n {
                        let idx = op_index + 1 + k;
                        let a_op = self.var.id_seq[idx];
                        let a_args = self.var.args(idx);
                        if a_op == op::id::FUNAV_OP {
                            let new_addr = remap(&addr_map, a_args[0]);
                            out.put_op(a_op, &[new_addr], 0);
                        } else {
                            out.put_op(a_op, a_args, 0);
                        }
                    }
                    for k in 0..m {
                        let idx = op_index + 1 + n + k;
                        let r_op = self.var.id_seq[idx];
                        let r_args = self.var.args(idx);
                        if r_op == op::id::FUNRV_OP {
                            let old_res = res_addr[idx];
                            let new_res = out.put_op(r_op, r_args, 1);
                            addr_map[old_res as usize] = Some(new_res);
                        } else {
                            out.put_op(r_op, r_args, 0);
                        }
                    }
                    out.put_op(op_id, &args, 0);
                }
                op_index += n + m + 2;
                continue;
            }

            // Every remaining opcode is dispatched generically.
            let info = &op_info[op_id as usize];
            let any_res_needed = (0..info.n_res).any(|k| needed[res + k]);
            if !any_res_needed {
                op_index += 1;
                continue;
            }
            let mut new_args = args.clone();
            for &p in var_arg_positions(op_id) {
                new_args[p] = remap(&addr_map, args[p]);
            }
            let key = (op_id, new_args.clone());
            let new_res = if let Some(&existing) = cse.get(&key) {
                existing
            } else {
                let first = out.put_op(op_id, &new_args, info.n_res);
                cse.insert(key, first);
                first
            };
            for k in 0..info.n_res {
                addr_map[res + k] = Some(new_res + k as IndexT);
            }
            op_index += 1;
        }

        out.dep = self.var.dep.iter().map(|&a| remap(&addr_map, a)).collect();

        ADfn {
            dyp: self.dyp.clone(),
            var: out,
            par: self.par.clone(),
            is_dyn: self.is_dyn.clone(),
            text: self.text.clone(),
            vecad_len: self.vecad_len.clone(),
            vecad_ind: self.vecad_ind.clone(),
            dyn_par_addr: self.dyn_par_addr.clone(),
            taylor: Vec::new(),
            order_this: None,
            partial: Vec::new(),
            vecad_runtime_value: Vec::new(),
            vecad_runtime_source: Vec::new(),
            ld_source: Vec::new(),
            compare_witness: Vec::new(),
            compare_change_count: 0,
            check_for_nan: self.check_for_nan,
            hold_reverse_mem: self.hold_reverse_mem,
            function_name: self.function_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    #[test]
    fn drops_unused_computation() {
        let x = start_recording(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        let unused = crate::ad::binary::mul(x[0], x[1]);
        let _ = unused;
        let y = crate::ad::binary::add(x[0], x[1]);
        let mut f = stop_recording(vec![y]);
        let mut g = f.optimize();

        assert!(g.size_op() < f.size_op());
        let x0 = f.forward_zero(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        let x1 = g.forward_zero(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        assert_eq!(x0[0].0, x1[0].0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn merges_duplicate_subexpression() {
        let x = start_recording(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        let a = crate::ad::binary::add(x[0], x[1]);
        let b = crate::ad::binary::add(x[0], x[1]);
        let y = crate::ad::binary::mul(a, b);
        let mut f = stop_recording(vec![y]);
        let mut g = f.optimize();

        assert!(g.size_op() < f.size_op());
        let x0 = f.forward_zero(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        let x1 = g.forward_zero(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        assert_eq!(x0[0].0, x1[0].0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn optimize_is_idempotent() {
        let x = start_recording(vec![AzFloat(1.5_f64), AzFloat(2.5)]);
        let a = crate::ad::binary::add(x[0], x[1]);
        let b = crate::ad::binary::add(x[0], x[1]);
        let unused = crate::ad::binary::mul(x[0], x[1]);
        let _ = unused;
        let y = crate::ad::binary::mul(a, b);
        let f = stop_recording(vec![y]);
        let g = f.optimize();
        let h = g.optimize();
        assert_eq!(g.size_op(), h.size_op());
        assert_eq!(g.size_var(), h.size_var());
        abort_recording::<AzFloat<f64>>();
    }
}
