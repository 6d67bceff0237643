// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `ADfn::jacobian` / `ADfn::hessian`, convenience wrappers over
//! [forward](super::forward) / [reverse](super::reverse); see `spec.md` §6
//! "`f.Jacobian(x)`, `f.Hessian(x, i)` or `f.Hessian(x, w)` (convenience
//! over forward+reverse)."
//!
//! Grounded on `example/general/jacobian.cpp` / `example/general/hessian.cpp`
//! (`examples/original_source`): `Jacobian` re-evaluates at `x` then takes
//! one `reverse_one` sweep per range component; `Hessian` takes one
//! `forward_one` sweep per domain component followed by one order-2
//! `reverse` sweep, the classic forward-over-reverse construction.
// ---------------------------------------------------------------------------
use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op::info::GlobalOpInfoVec;

use super::ADfn;

impl<V> ADfn<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry,
{
    /// `f.Jacobian(x)`: the full `[range_len() x domain_len()]` Jacobian of
    /// `f` at `x`, flattened row-major (`jac[i * n + j] = dy_i/dx_j`).
    ///
    /// Implemented as one `forward_zero(x)` to evaluate at the new point,
    /// followed by one `reverse_one` call per range component — `spec.md`
    /// §8 property 10, `f.Reverse(1, e_i) = row_i(f.Jacobian(x))`.
    pub fn jacobian(&mut self, x: Vec<V>) -> Vec<V> {
        let n = self.domain_len();
        let m = self.range_len();
        self.forward_zero(x);
        let mut jac = vec![V::zero(); m * n];
        for i in 0..m {
            let mut w = vec![V::zero(); m];
            w[i] = V::one();
            let row = self.reverse_one(w);
            jac[i * n..(i + 1) * n].copy_from_slice(&row);
        }
        jac
    }

    /// `f.Hessian(x, w)`: the `[domain_len() x domain_len()]` Hessian of the
    /// weighted scalar `Σ_i w_i f_i` at `x`, flattened row-major.
    ///
    /// For each domain direction `e_j`, `forward_one(e_j)` supplies the
    /// order-1 Taylor coefficients that `reverse(2, w)` then differentiates
    /// a second time, so `reverse(2, w)`'s order-1 output column `j` is
    /// column `j` of the Hessian (requires every operator on the tape to
    /// support Taylor order 1 in both directions; see `op::info::OpInfo::
    /// max_order`).
    pub fn hessian_weighted(&mut self, x: Vec<V>, w: Vec<V>) -> Vec<V> {
        if w.len() != self.range_len() {
            crate::error::known("f.hessian: weight vector has wrong length");
        }
        let n = self.domain_len();
        self.forward_zero(x);
        let mut hes = vec![V::zero(); n * n];
        for j in 0..n {
            let mut dx = vec![V::zero(); n];
            dx[j] = V::one();
            self.forward_one(dx);
            let partial = self.reverse(2, w.clone());
            for (k, row) in partial.iter().enumerate() {
                hes[k * n + j] = row[1];
            }
        }
        hes
    }

    /// `f.Hessian(x, i)`: the Hessian of the single range component `i`,
    /// i.e. `hessian_weighted(x, e_i)`.
    pub fn hessian(&mut self, x: Vec<V>, i: usize) -> Vec<V> {
        let mut w = vec![V::zero(); self.range_len()];
        w[i] = V::one();
        self.hessian_weighted(x, w)
    }
}

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::tape::{start_recording, stop_recording};

    #[test]
    fn jacobian_matches_square_times_trig() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0_f64)]);
        let square = x[0] * x[0];
        let y0 = square * crate::ad::transcend::exp(x[1]);
        let y1 = square * crate::ad::transcend::sin(x[1]);
        let y2 = square * crate::ad::transcend::cos(x[1]);
        let mut f = stop_recording(vec![y0, y1, y2]);

        let x0 = 2.0_f64;
        let x1 = 1.0_f64;
        let jac = f.jacobian(vec![AzFloat(x0), AzFloat(x1)]);
        let eps = 1e-9;
        assert!((jac[0 * 2 + 0].0 - 2.0 * x0 * x1.exp()).abs() < eps);
        assert!((jac[1 * 2 + 0].0 - 2.0 * x0 * x1.sin()).abs() < eps);
        assert!((jac[2 * 2 + 0].0 - 2.0 * x0 * x1.cos()).abs() < eps);
        assert!((jac[0 * 2 + 1].0 - x0 * x0 * x1.exp()).abs() < eps);
        assert!((jac[1 * 2 + 1].0 - x0 * x0 * x1.cos()).abs() < eps);
        assert!((jac[2 * 2 + 1].0 - (-x0 * x0 * x1.sin())).abs() < eps);
    }

    #[test]
    fn hessian_of_square_times_sin() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0_f64)]);
        let square = x[0] * x[0];
        let y0 = square * crate::ad::transcend::exp(x[1]);
        let y1 = square * crate::ad::transcend::sin(x[1]);
        let y2 = square * crate::ad::transcend::cos(x[1]);
        let mut f = stop_recording(vec![y0, y1, y2]);

        let x0 = 2.0_f64;
        let x1 = 1.0_f64;
        let hes = f.hessian(vec![AzFloat(x0), AzFloat(x1)], 1);
        let n = 2;
        let eps = 1e-9;
        assert!((hes[0 * n + 0].0 - 2.0 * x1.sin()).abs() < eps);
        assert!((hes[0 * n + 1].0 - 2.0 * x0 * x1.cos()).abs() < eps);
        assert!((hes[1 * n + 0].0 - 2.0 * x0 * x1.cos()).abs() < eps);
        assert!((hes[1 * n + 1].0 - (-x0 * x0 * x1.sin())).abs() < eps);
    }
}
