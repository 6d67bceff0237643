// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `for_jac_sparsity` / `rev_jac_sparsity` / `for_hes_sparsity` /
//! `rev_hes_sparsity`; see `spec.md` §4.8.
//!
//! Both sparsity backends (`sparse::{BitMatrix, ListSet}`) are driven
//! through one generic sweep via `sparse::SparsityPattern`
//! ("the choice of backend is orthogonal to the playback algorithm").
//! Every sweep here addresses a variable's result slot through
//! `reverse::op_res_addr` rather than a running counter, since the
//! `AFunOp` bracket's reverse walk must jump straight from the closing
//! bracket to the opening one (`reverse.rs`'s own doc comment explains why
//! a running counter cannot survive that jump).
//!
//! VecAD is treated as a single unit per vector (an index that is itself a
//! variable makes per-element tracking unsound at pattern-propagation
//! time), so a load's column set is the union of every store that
//! precedes it in the stream (`DESIGN.md`). An atomic call conservatively
//! makes every result depend on every variable operand, the same
//! simplification `ad::call` makes for recording (`DESIGN.md`, "atomic
//! calls always produce variable outputs").
// ---------------------------------------------------------------------------
use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op;
use crate::op::info::GlobalOpInfoVec;
use crate::sparse::SparsityPattern;
use crate::tape::IndexT;

use super::ADfn;

impl<V> ADfn<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry,
{
    /// Per-variable forward sparsity: `work[addr]` is the set of columns of
    /// `r` that variable `addr`'s value can depend on. Shared by
    /// `for_jac_sparsity` and `for_hes_sparsity`.
    fn for_jac_work<P: SparsityPattern>(&self, r: &P, dependency: bool) -> P {
        if r.n_row() != self.var.n_domain {
            crate::error::known("sparsity: r has the wrong number of rows");
        }
        let op_info = <V as GlobalOpInfoVec>::get();
        let res_addr = self.op_res_addr();
        let n_var = self.size_var() + 1;
        let mut work = P::new(n_var, r.n_col());
        for j in 0..self.var.n_domain {
            work.union_row_from(j + 1, r, j);
        }

        let mut vecad_acc: Vec<P> = self.vecad_len.iter().map(|_| P::new(1, r.n_col())).collect();
        let mut op_index = 0usize;
        while op_index < self.var.id_seq.len() {
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);
            let res = res_addr[op_index] as usize;

            if op::compare::is_compare_op(op_id) {
                op_index += 1;
                continue;
            }
            if op_id == op::id::LDP_OP || op_id == op::id::LDV_OP {
                let vec_id = args[0] as usize;
                for c in vecad_acc[vec_id].row_vec(0) {
                    work.insert(res, c);
                }
                op_index += 1;
                continue;
            }
            if op_id == op::id::STPV_OP || op_id == op::id::STVV_OP {
                let vec_id = args[0] as usize;
                let value_addr = args[2] as usize;
                for c in work.row_vec(value_addr) {
                    vecad_acc[vec_id].insert(0, c);
                }
                op_index += 1;
                continue;
            }
            if op_id == op::id::STPP_OP || op_id == op::id::STVP_OP || op_id == op::id::PRIP_OP || op_id == op::id::PRIV_OP
            {
                op_index += 1;
                continue;
            }
            if op_id == op::id::AFUN_OP {
                // The bracket opens and closes with an identical AFunOp
                // record (`op::call`'s doc comment); only the one at
                // `op_index` (the open) is processed, jumping past args,
                // results, and the close in one step, matching
                // `op_res_addr`'s own forward walk.
                let (n, m) = (args[2] as usize, args[3] as usize);
                let mut operand_cols: Vec<IndexT> = Vec::new();
                for k in 0..n {
                    let idx = op_index + 1 + k;
                    if self.var.id_seq[idx] == op::id::FUNAV_OP {
                        let addr = self.var.args(idx)[0] as usize;
                        operand_cols.extend(work.row_vec(addr));
                    }
                }
                for k in 0..m {
                    let idx = op_index + 1 + n + k;
                    if self.var.id_seq[idx] == op::id::FUNRV_OP {
                        let out_addr = res_addr[idx] as usize;
                        for &c in &operand_cols {
                            work.insert(out_addr, c);
                        }
                    }
                }
                op_index += n + m + 2;
                continue;
            }
            if op_id == op::id::FUNAP_OP || op_id == op::id::FUNAV_OP || op_id == op::id::FUNRP_OP || op_id == op::id::FUNRV_OP {
                op_index += 1;
                continue;
            }

            let info = &op_info[op_id as usize];
            for &addr in &(info.depend)(args) {
                for c in work.row_vec(addr as usize) {
                    work.insert(res, c);
                }
            }
            if op_id == op::id::CEXP_OP && dependency {
                let (left_v, right_v, _, _) = op::cond::flag_bits(args[1]);
                for (is_var, addr) in [(left_v, args[2]), (right_v, args[3])] {
                    if is_var {
                        for c in work.row_vec(addr as usize) {
                            work.insert(res, c);
                        }
                    }
                }
            }
            op_index += 1;
        }
        work
    }

    /// `f.for_jac_sparsity(r, dependency)`: given one row of `r` per
    /// independent, returns one row per dependent (`spec.md` §4.8).
    pub fn for_jac_sparsity<P: SparsityPattern>(&self, r: P, dependency: bool) -> P {
        let work = self.for_jac_work(&r, dependency);
        let mut out = P::new(self.range_len(), r.n_col());
        for (i, &addr) in self.var.dep.iter().enumerate() {
            out.union_row_from(i, &work, addr as usize);
        }
        out
    }

    /// Per-variable reverse sparsity: `work[addr]` is the set of columns of
    /// `s` that depend (downstream) on variable `addr`.
    fn rev_jac_work<P: SparsityPattern>(&self, s: &P, dependency: bool) -> P {
        if s.n_row() != self.range_len() {
            crate::error::known("sparsity: s has the wrong number of rows");
        }
        let op_info = <V as GlobalOpInfoVec>::get();
        let res_addr = self.op_res_addr();
        let n_var = self.size_var() + 1;
        let mut work = P::new(n_var, s.n_col());
        for (i, &addr) in self.var.dep.iter().enumerate() {
            work.union_row_from(addr as usize, s, i);
        }

        let mut vecad_acc: Vec<P> = self.vecad_len.iter().map(|_| P::new(1, s.n_col())).collect();
        let mut op_index = self.var.id_seq.len();
        while op_index > 0 {
            op_index -= 1;
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);
            let res = res_addr[op_index] as usize;

            if op::compare::is_compare_op(op_id) {
                continue;
            }
            if op_id == op::id::STPV_OP || op_id == op::id::STVV_OP {
                let vec_id = args[0] as usize;
                let value_addr = args[2] as usize;
                for c in vecad_acc[vec_id].row_vec(0) {
                    work.insert(value_addr, c);
                }
                continue;
            }
            if op_id == op::id::STPP_OP || op_id == op::id::STVP_OP || op_id == op::id::PRIP_OP || op_id == op::id::PRIV_OP
            {
                continue;
            }
            if op_id == op::id::LDP_OP || op_id == op::id::LDV_OP {
                let vec_id = args[0] as usize;
                for c in work.row_vec(res) {
                    vecad_acc[vec_id].insert(0, c);
                }
                continue;
            }
            if op_id == op::id::AFUN_OP {
                let (n, m) = (args[2] as usize, args[3] as usize);
                // Reverse order visits the closing bracket first; the
                // opening one (where `n`/`m` index correctly relative to
                // this position) is `n + m + 1` entries earlier.
                let open_index = op_index - (n + m + 1);
                let mut result_cols: Vec<IndexT> = Vec::new();
                for k in 0..m {
                    let idx = open_index + 1 + n + k;
                    if self.var.id_seq[idx] == op::id::FUNRV_OP {
                        result_cols.extend(work.row_vec(res_addr[idx] as usize));
                    }
                }
                for k in 0..n {
                    let idx = open_index + 1 + k;
                    if self.var.id_seq[idx] == op::id::FUNAV_OP {
                        let addr = self.var.args(idx)[0] as usize;
                        for &c in &result_cols {
                            work.insert(addr, c);
                        }
                    }
                }
                op_index = open_index;
                continue;
            }
            if op_id == op::id::FUNAP_OP || op_id == op::id::FUNAV_OP || op_id == op::id::FUNRP_OP || op_id == op::id::FUNRV_OP {
                continue;
            }

            let info = &op_info[op_id as usize];
            let cols = work.row_vec(res);
            for &addr in &(info.depend)(args) {
                for &c in &cols {
                    work.insert(addr as usize, c);
                }
            }
            if op_id == op::id::CEXP_OP && dependency {
                let (left_v, right_v, _, _) = op::cond::flag_bits(args[1]);
                for (is_var, addr) in [(left_v, args[2]), (right_v, args[3])] {
                    if is_var {
                        for &c in &cols {
                            work.insert(addr as usize, c);
                        }
                    }
                }
            }
        }
        work
    }

    /// `f.rev_jac_sparsity(s, dependency)`: given one row of `s` per
    /// dependent, returns one row per independent.
    pub fn rev_jac_sparsity<P: SparsityPattern>(&self, s: P, dependency: bool) -> P {
        let work = self.rev_jac_work(&s, dependency);
        let mut out = P::new(self.var.n_domain, s.n_col());
        for j in 0..self.var.n_domain {
            out.union_row_from(j, &work, j + 1);
        }
        out
    }

    /// Per-variable boolean "does this address's value feed a dependent
    /// named by `s`" flag, computed by running [Self::rev_jac_work] with a
    /// one-column pattern; used by [Self::for_hes_sparsity] to decide which
    /// operators' nonlinear (Hessian) contribution is relevant.
    fn relevant_vars(&self, s: &[bool]) -> Vec<bool> {
        let mut seed = crate::sparse::ListSet::new(self.range_len(), 1);
        for (i, &flag) in s.iter().enumerate() {
            if flag {
                seed.insert(i, 0);
            }
        }
        let work = self.rev_jac_work(&seed, false);
        (0..work.n_row()).map(|addr| !work.row(addr).is_empty()).collect()
    }

    /// `f.for_hes_sparsity(r, s)`: domain-by-domain Hessian pattern of
    /// `Σ_i s_i · y_i` (`spec.md` §4.8). Unions each relevant operator's
    /// `hessian_pairs` outer product of its operands' forward-Jacobian
    /// domain sets; this captures every operator's own nonlinearity but not
    /// cross terms introduced purely by composing two *linear* operators
    /// with a nonlinear one further downstream (`DESIGN.md`).
    pub fn for_hes_sparsity<P: SparsityPattern>(&self, r: P, s: Vec<bool>) -> P {
        if s.len() != self.range_len() {
            crate::error::known("sparsity: s has the wrong length");
        }
        let n_domain = self.var.n_domain;
        let res_addr = self.op_res_addr();
        let var_jac = self.for_jac_work(&r, false);
        let relevant = self.relevant_vars(&s);

        let op_info = <V as GlobalOpInfoVec>::get();
        let mut hes = P::new(n_domain, n_domain);
        for op_index in 0..self.var.id_seq.len() {
            let op_id = self.var.id_seq[op_index];
            if op::compare::is_compare_op(op_id)
                || op_id == op::id::STPP_OP
                || op_id == op::id::STPV_OP
                || op_id == op::id::STVP_OP
                || op_id == op::id::STVV_OP
                || op_id == op::id::PRIP_OP
                || op_id == op::id::PRIV_OP
                || op_id == op::id::AFUN_OP
                || op_id == op::id::FUNAP_OP
                || op_id == op::id::FUNAV_OP
                || op_id == op::id::FUNRP_OP
                || op_id == op::id::FUNRV_OP
                || op_id == op::id::LDP_OP
                || op_id == op::id::LDV_OP
                || op_id == op::id::CEXP_OP
            {
                continue;
            }
            let res = res_addr[op_index] as usize;
            if res >= relevant.len() || !relevant[res] {
                continue;
            }
            let args = self.var.args(op_index);
            let info = &op_info[op_id as usize];
            for (a, b) in (info.hessian_pairs)(args) {
                let cols_a = var_jac.row_vec(a as usize);
                let cols_b = var_jac.row_vec(b as usize);
                for &ca in &cols_a {
                    for &cb in &cols_b {
                        hes.insert(ca as usize, cb);
                        hes.insert(cb as usize, ca);
                    }
                }
            }
        }
        hes
    }

    /// `f.rev_hes_sparsity(r, s)`: the reverse-mode-initiated entry point
    /// the surface names separately (`spec.md` §6); identical result to
    /// [Self::for_hes_sparsity], since the Hessian sweep here is not itself
    /// direction-sensitive once [Self::relevant_vars] has been computed.
    pub fn rev_hes_sparsity<P: SparsityPattern>(&self, r: P, s: Vec<bool>) -> P {
        self.for_hes_sparsity(r, s)
    }
}

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;
    use crate::sparse::ListSet;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    fn identity(n: usize) -> ListSet {
        let mut p = ListSet::new(n, n);
        for i in 0..n {
            p.insert(i, i as u32);
        }
        p
    }

    #[test]
    fn jacobian_pattern_of_x0_x0x1_x1() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0)]);
        let y0 = x[0];
        let y1 = crate::ad::binary::mul(x[0], x[1]);
        let y2 = x[1];
        let f = stop_recording(vec![y0, y1, y2]);

        let pattern = f.for_jac_sparsity(identity(2), false);
        assert_eq!(pattern.row(0), &[0]);
        assert_eq!(pattern.row(1), &[0, 1]);
        assert_eq!(pattern.row(2), &[1]);

        let s = identity(3);
        let rev = f.rev_jac_sparsity(s, false);
        assert_eq!(rev.row(0), &[0, 1]);
        assert_eq!(rev.row(1), &[1, 2]);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn hessian_pattern_of_sin_plus_product() {
        let x = start_recording(vec![AzFloat(0.2_f64), AzFloat(0.3), AzFloat(0.4)]);
        let a = crate::ad::transcend::sin(x[2]);
        let b = crate::ad::binary::mul(x[0], x[1]);
        let y = crate::ad::binary::add(a, b);
        let f = stop_recording(vec![y]);

        let hes = f.for_hes_sparsity(identity(3), vec![true]);
        assert_eq!(hes.row(0), &[1]);
        assert_eq!(hes.row(1), &[0]);
        assert_eq!(hes.row(2), &[2]);
        abort_recording::<AzFloat<f64>>();
    }
}
