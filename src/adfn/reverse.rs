// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ADfn::reverse`, the `Reverse(q, w)` sweep; see `spec.md` §4.7.
//!
//! Address assignment in the variable value space is a deterministic
//! function of the operator stream alone (`spec.md` §3 "Topological order
//! equals sequential order"), so [ADfn::op_res_addr] replays that
//! bookkeeping once, forward, before the reverse walk — the same table
//! `adfn::forward` special-cases five opcode families outside
//! `op::info::op_info_vec`, and this sweep special-cases the same five.
// ---------------------------------------------------------------------------
use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op;
use crate::op::info::GlobalOpInfoVec;
use crate::tape::IndexT;

use super::ADfn;

impl<V> ADfn<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry,
{
    /// First variable-value-space address produced by the operator at each
    /// `op_index`; entries for result-less opcodes (compare, store, print,
    /// the atomic-call boundary's own brackets) are left at the running
    /// counter and unused by callers.
    pub(crate) fn op_res_addr(&self) -> Vec<IndexT> {
        let op_info = <V as GlobalOpInfoVec>::get();
        let mut out = Vec::with_capacity(self.var.id_seq.len());
        let mut res = self.var.n_domain + 1;
        let mut op_index = 0usize;
        while op_index < self.var.id_seq.len() {
            let op_id = self.var.id_seq[op_index];
            out.push(res as IndexT);
            if op::compare::is_compare_op(op_id) {
                op_index += 1;
                continue;
            }
            if op_id == op::id::LDP_OP || op_id == op::id::LDV_OP {
                res += 1;
                op_index += 1;
                continue;
            }
            if op_id == op::id::STPP_OP
                || op_id == op::id::STPV_OP
                || op_id == op::id::STVP_OP
                || op_id == op::id::STVV_OP
                || op_id == op::id::PRIP_OP
                || op_id == op::id::PRIV_OP
            {
                op_index += 1;
                continue;
            }
            if op_id == op::id::AFUN_OP {
                let open = self.var.args(op_index).to_vec();
                let (n, m) = (open[2] as usize, open[3] as usize);
                for k in 0..m {
                    let idx = op_index + 1 + n + k;
                    out.push(res as IndexT);
                    if self.var.id_seq[idx] == op::id::FUNRV_OP {
                        res += 1;
                    }
                }
                // open bracket, n args, m results (already pushed), close bracket
                for _ in 0..(n + 1) {
                    out.push(res as IndexT);
                }
                op_index += n + m + 2;
                continue;
            }
            let info = &op_info[op_id as usize];
            res += info.n_res;
            op_index += 1;
        }
        out
    }

    /// `Reverse(q, w)`: accumulates the adjoint of `Σ_i w_i · y_i^{(q-1)}`
    /// through every order `0..=q-1` of every variable, returning the
    /// `[n_independent × q]` result (flattened, independent-major). Requires
    /// `Forward(k, ·)` for `k = 0..=q-1` to have already been called
    /// (`spec.md` §4.7).
    pub fn reverse(&mut self, q: usize, w: Vec<V>) -> Vec<Vec<V>> {
        if q < 1 {
            crate::error::known("f.reverse: order must be at least one");
        }
        if w.len() != self.range_len() {
            crate::error::known("f.reverse: weight vector has wrong length");
        }
        let d = q.saturating_sub(1);
        match self.order_this {
            Some(order) if order >= d => {}
            _ => crate::error::known("f.reverse: Forward has not been called through this order"),
        }

        let op_info = <V as GlobalOpInfoVec>::get();
        let n_var = self.size_var() + 1;
        if self.partial.len() != n_var || self.partial[0].len() != d + 1 || !self.hold_reverse_mem {
            self.partial = (0..n_var).map(|_| vec![V::zero(); d + 1]).collect();
        } else {
            for row in self.partial.iter_mut() {
                for v in row.iter_mut() {
                    *v = V::zero();
                }
            }
        }
        for (i, &addr) in self.var.dep.iter().enumerate() {
            self.partial[addr as usize][d] = self.partial[addr as usize][d] + w[i];
        }

        let res_addr = self.op_res_addr();
        let mut op_index = self.var.id_seq.len();
        while op_index > 0 {
            op_index -= 1;
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);
            let res = res_addr[op_index] as usize;

            if op::compare::is_compare_op(op_id) {
                continue;
            }
            if op_id == op::id::STPP_OP
                || op_id == op::id::STPV_OP
                || op_id == op::id::STVP_OP
                || op_id == op::id::STVV_OP
                || op_id == op::id::PRIP_OP
                || op_id == op::id::PRIV_OP
            {
                continue;
            }
            if op_id == op::id::LDP_OP || op_id == op::id::LDV_OP {
                if let Some(src) = self.ld_source[op_index] {
                    for k in 0..=d {
                        self.partial[src as usize][k] = self.partial[src as usize][k] + self.partial[res][k];
                    }
                }
                continue;
            }
            if op_id == op::id::AFUN_OP {
                let n = args[2] as usize;
                let m = args[3] as usize;
                // `op_index` here is the bracket's *closing* AFunOp; the
                // opening one is n + m + 1 entries earlier.
                let open_index = op_index - (n + m + 1);
                self.reverse_afun(d, open_index, n, m, &res_addr);
                op_index = open_index;
                continue;
            }

            let info = &op_info[op_id as usize];
            if let Some(max_q) = info.max_order {
                if d > max_q {
                    crate::error::known("f.reverse: operator does not support this Taylor order");
                }
            }
            (info.reverse)(d, args, &self.par, &self.taylor, &mut self.partial, res);
        }

        let mut result = vec![vec![V::zero(); q]; self.var.n_domain];
        for (j, row) in result.iter_mut().enumerate() {
            for (k, slot) in row.iter_mut().enumerate() {
                *slot = self.partial[j + 1][k];
            }
        }
        result
    }

    /// `f.reverse_one(w)`: convenience wrapper for `Reverse(1, w)`, i.e.
    /// `J^T w` for the Jacobian `J` at the point of the last `forward_zero`.
    pub fn reverse_one(&mut self, w: Vec<V>) -> Vec<V> {
        self.reverse(1, w).into_iter().map(|row| row[0]).collect()
    }

    /// Undoes one `AFunOp` bracket during the reverse sweep: gathers `x`
    /// (order 0 of every operand) and `dy` (order-`d` partials of every
    /// result), invokes the atomic's `reverse_one` kernel, and scatters the
    /// resulting `dx` back into the variable operands' adjoints. Orders
    /// `d >= 1` are not supported (`atom::AtomicFn` is order-0/1 scoped, see
    /// `DESIGN.md`): the scatter only uses order 0 of `dx`.
    fn reverse_afun(&mut self, d: usize, open_index: usize, n: usize, m: usize, res_addr: &[IndexT]) {
        let open = self.var.args(open_index).to_vec();
        let (atom_index, call_id) = (open[0] as usize, open[1] as usize);

        let mut x = Vec::with_capacity(n);
        let mut operand_addr: Vec<Option<IndexT>> = Vec::with_capacity(n);
        for k in 0..n {
            let idx = open_index + 1 + k;
            let a_op = self.var.id_seq[idx];
            let addr = self.var.args(idx)[0];
            if a_op == op::id::FUNAP_OP {
                x.push(self.par[addr as usize]);
                operand_addr.push(None);
            } else {
                x.push(self.taylor[addr as usize][0]);
                operand_addr.push(Some(addr));
            }
        }

        let mut dy = Vec::with_capacity(m);
        for k in 0..m {
            let idx = open_index + 1 + n + k;
            if self.var.id_seq[idx] == op::id::FUNRV_OP {
                let res = res_addr[idx] as usize;
                dy.push(self.partial[res][d]);
            } else {
                dy.push(V::zero());
            }
        }

        let dx = crate::atom::reverse_one::<V>(atom_index, call_id, &x, &dy);
        for (k, addr) in operand_addr.into_iter().enumerate() {
            if let Some(addr) = addr {
                self.partial[addr as usize][0] = self.partial[addr as usize][0] + dx[k];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ad::AD;
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    #[test]
    fn reverse_one_matches_scalar_derivative_of_product() {
        let x = start_recording(vec![AzFloat(3.0_f64), AzFloat(4.0)]);
        let y = crate::ad::binary::mul(x[0], x[1]);
        let mut f = stop_recording(vec![y]);
        f.forward(0, vec![AzFloat(3.0_f64), AzFloat(4.0)]);
        let dw = f.reverse_one(vec![AzFloat(1.0_f64)]);
        assert_eq!(dw[0].0, 4.0); // d(xy)/dx = y
        assert_eq!(dw[1].0, 3.0); // d(xy)/dy = x
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn reverse_one_matches_exp_derivative() {
        let x = start_recording(vec![AzFloat(0.5_f64)]);
        let y = crate::ad::transcend::exp(x[0]);
        let mut f = stop_recording(vec![y]);
        f.forward(0, vec![AzFloat(0.5_f64)]);
        let dw = f.reverse_one(vec![AzFloat(1.0_f64)]);
        assert!((dw[0].0 - 0.5_f64.exp()).abs() < 1e-10);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn reverse_one_matches_jacobian_row() {
        let x = start_recording(vec![AzFloat(0.5_f64), AzFloat(2.0)]);
        let y0 = crate::ad::AD::constant(AzFloat(1.0_f64));
        let _ = y0;
        let y = crate::ad::transcend::pow(x[0], x[1]);
        let mut f = stop_recording(vec![y]);
        f.forward(0, vec![AzFloat(0.5_f64), AzFloat(2.0)]);
        let dw = f.reverse_one(vec![AzFloat(1.0_f64)]);
        // d(x0^x1)/dx0 = x1 * x0^(x1-1) = 2 * 0.5 = 1.0
        assert!((dw[0].0 - 1.0).abs() < 1e-9);
        let _ = AD::constant(AzFloat(0.0_f64));
    }
}
