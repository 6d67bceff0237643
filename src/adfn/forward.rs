// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ADfn::forward`, the `Forward(q, x_q)` sweep; see `spec.md` §4.6.
//!
//! Every table-dispatched opcode (component C1) is driven uniformly through
//! `op::info::GlobalOpInfoVec`; the five families that carry no entry in
//! that table (`op::{compare, cond's condition witness, vecad, print,
//! call}`) are special-cased directly here, matching `op::call`'s own doc
//! comment ("adfn::forward/reverse walk this bracket directly").
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
    /// `Forward(q, x_q)`: computes order `q` of every variable's Taylor
    /// coefficient from order `q` of the domain and orders `0..=q` of
    /// everything already on the tape; returns order `q` of the range
    /// vector. `q == 0` always starts a fresh Taylor expansion at a new
    /// point; any `q > 0` must be at most one past the highest order this
    /// expansion has reached so far — recomputing an order already reached
    /// (a new direction at the same point) or extending by exactly one are
    /// both legal, skipping ahead is not (`spec.md` §4.6 "order_this").
    pub fn forward(&mut self, q: usize, x_q: Vec<V>) -> Vec<V> {
        if x_q.len() != self.var.n_domain {
            crate::error::known("f.forward: domain vector length does not match f");
        }
        if q > 0 {
            let consecutive = matches!(self.order_this, Some(prev) if q <= prev + 1);
            if !consecutive {
                crate::error::known("f.forward: orders must be requested in consecutive order");
            }
        }
        let op_info = <V as GlobalOpInfoVec>::get();
        let n_var = self.size_var() + 1;
        if q == 0 {
            self.taylor = (0..n_var).map(|_| vec![V::nan()]).collect();
            self.vecad_runtime_value = self.vecad_ind.iter().map(|&a| self.par[a as usize]).collect();
            self.vecad_runtime_source = vec![None; self.vecad_ind.len()];
            self.ld_source = vec![None; self.var.id_seq.len()];
        } else {
            // Recomputing an order already reached (`q <= order_this`)
            // overwrites the existing column during the sweep below; only
            // extending past the highest order reached so far needs a new
            // column appended.
            if self.taylor[0].len() <= q {
                for row in self.taylor.iter_mut() {
                    row.push(V::nan());
                }
            }
        }
        for (j, v) in x_q.into_iter().enumerate() {
            self.taylor[j + 1][q] = v;
        }

        let mut compare_idx = 0usize;
        let mut res = self.var.n_domain + 1;
        let mut op_index = 0usize;
        while op_index < self.var.id_seq.len() {
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);

            if op::compare::is_compare_op(op_id) {
                if q == 0 {
                    let outcome = op::compare::eval(op_id, args, &self.par, &self.taylor);
                    self.note_witness(compare_idx, outcome);
                }
                compare_idx += 1;
                op_index += 1;
                continue;
            }

            if op_id == op::id::LDP_OP || op_id == op::id::LDV_OP {
                if q == 0 {
                    let (value, source) = if op_id == op::id::LDP_OP {
                        op::vecad::ldp_forward(
                            args,
                            &self.par,
                            &self.vecad_runtime_value,
                            &self.vecad_runtime_source,
                            &self.vecad_len,
                        )
                    } else {
                        op::vecad::ldv_forward(
                            args,
                            &self.taylor,
                            &self.vecad_runtime_value,
                            &self.vecad_runtime_source,
                            &self.vecad_len,
                        )
                    };
                    self.ld_source[op_index] = source;
                    self.taylor[res][0] = value;
                } else {
                    self.taylor[res][q] = V::zero();
                }
                res += 1;
                op_index += 1;
                continue;
            }

            if op_id == op::id::STPP_OP
                || op_id == op::id::STPV_OP
                || op_id == op::id::STVP_OP
                || op_id == op::id::STVV_OP
            {
                if q == 0 {
                    match op_id {
                        x if x == op::id::STPP_OP => op::vecad::stpp_forward(
                            args,
                            &self.par,
                            &mut self.vecad_runtime_value,
                            &mut self.vecad_runtime_source,
                            &self.vecad_len,
                        ),
                        x if x == op::id::STPV_OP => op::vecad::stpv_forward(
                            args,
                            &self.par,
                            &self.taylor,
                            &mut self.vecad_runtime_value,
                            &mut self.vecad_runtime_source,
                            &self.vecad_len,
                        ),
                        x if x == op::id::STVP_OP => op::vecad::stvp_forward(
                            args,
                            &self.par,
                            &self.taylor,
                            &mut self.vecad_runtime_value,
                            &mut self.vecad_runtime_source,
                            &self.vecad_len,
                        ),
                        _ => op::vecad::stvv_forward(
                            args,
                            &self.taylor,
                            &mut self.vecad_runtime_value,
                            &mut self.vecad_runtime_source,
                            &self.vecad_len,
                        ),
                    }
                }
                op_index += 1;
                continue;
            }

            if op_id == op::id::PRIP_OP || op_id == op::id::PRIV_OP {
                if q == 0 {
                    let is_variable = op_id == op::id::PRIV_OP;
                    if let Some(line) = op::print::render(is_variable, args, &self.par, &self.taylor, &self.text) {
                        print!("{line}");
                    }
                }
                op_index += 1;
                continue;
            }

            if op_id == op::id::AFUN_OP {
                let consumed = self.dispatch_afun(q, op_index, &mut res);
                op_index += consumed;
                continue;
            }

            if op_id == op::id::CEXP_OP && q == 0 {
                let outcome = op::cond::condition(args, &self.par, &self.taylor);
                self.note_witness(compare_idx, outcome);
                compare_idx += 1;
            } else if op_id == op::id::CEXP_OP {
                compare_idx += 1;
            }

            let info = &op_info[op_id as usize];
            if let Some(max_q) = info.max_order {
                if q > max_q {
                    crate::error::known("f.forward: operator does not support this Taylor order");
                }
            }
            (info.forward)(q, args, &self.par, &mut self.taylor, res);
            res += info.n_res;
            op_index += 1;
        }

        self.order_this = Some(q);
        self.var.dep.iter().map(|&addr| self.taylor[addr as usize][q]).collect()
    }

    /// `f.forward_zero(x)`: convenience wrapper for `Forward(0, x)`.
    pub fn forward_zero(&mut self, x: Vec<V>) -> Vec<V> {
        self.forward(0, x)
    }
    /// `f.forward_one(dx)`: the directional derivative `f'(x) * dx`,
    /// convenience wrapper for `Forward(1, dx)` after a preceding
    /// `forward_zero` at `x`.
    pub fn forward_one(&mut self, dx: Vec<V>) -> Vec<V> {
        self.forward(1, dx)
    }

    fn note_witness(&mut self, idx: usize, outcome: bool) {
        if idx >= self.compare_witness.len() {
            self.compare_witness.resize(idx + 1, None);
        }
        if let Some(prev) = self.compare_witness[idx] {
            if prev != outcome {
                self.compare_change_count += 1;
            }
        }
        self.compare_witness[idx] = Some(outcome);
    }

    /// Walks one complete `AFunOp` bracket starting at `op_index`
    /// (`op::call`'s doc comment spells out the layout), invoking the
    /// registered atomic function and writing its `Funrv` results into
    /// `taylor`; returns the number of `id_seq` entries consumed.
    /// `atom::AtomicFn` only implements orders zero and one, so orders two
    /// and up are left at zero (`DESIGN.md`).
    fn dispatch_afun(&mut self, q: usize, op_index: usize, res: &mut usize) -> usize {
        let open = self.var.args(op_index).to_vec();
        let (atom_index, call_id, n, m) = (open[0] as usize, open[1] as usize, open[2] as usize, open[3] as usize);

        let mut x = Vec::with_capacity(n);
        let mut dx = Vec::with_capacity(n);
        for k in 0..n {
            let idx = op_index + 1 + k;
            let a_op = self.var.id_seq[idx];
            let addr = self.var.args(idx)[0] as usize;
            if a_op == op::id::FUNAP_OP {
                x.push(self.par[addr]);
                dx.push(V::zero());
            } else {
                x.push(self.taylor[addr][0]);
                dx.push(if q >= 1 { self.taylor[addr][1] } else { V::zero() });
            }
        }

        let y = crate::atom::forward_zero::<V>(atom_index, call_id, &x);
        let dy = if q >= 1 {
            crate::atom::forward_one::<V>(atom_index, call_id, &x, &dx)
        } else {
            Vec::new()
        };

        let mut j = 0usize;
        for k in 0..m {
            let idx = op_index + 1 + n + k;
            let r_op = self.var.id_seq[idx];
            if r_op == op::id::FUNRV_OP {
                match q {
                    0 => self.taylor[*res][0] = y[j],
                    1 => self.taylor[*res][1] = dy[j],
                    _ => self.taylor[*res][q] = V::zero(),
                }
                *res += 1;
            }
            j += 1;
        }
        n + m + 2
    }
}

pub(crate) fn _assert_index_t_is_u32(_: IndexT) {}
