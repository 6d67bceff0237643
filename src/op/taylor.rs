// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Shared Taylor-coefficient recurrence helpers used by the per-operator
//! forward kernels in `op::{add,sub,mul,div,sqrt,exp,log,sin_cos,tan_tanh}`.
//!
//! A Taylor coefficient sequence `x^(0), x^(1), ... ` represents
//! `x(t) = sum_k x^(k) t^k` locally (`spec.md` GLOSSARY "Taylor
//! coefficient"); these are the classical product/quotient/chain-rule
//! recurrences in that convention (Griewank & Walther, "Evaluating
//! Derivatives", chapter 10).
// ---------------------------------------------------------------------------
use crate::base::Base;

/// `sum_{j=0}^{k} a[j] * b[k-j]`, the Cauchy product coefficient of order
/// `k` for `a(t) * b(t)`.
pub fn conv<V: Base>(a: &[V], b: &[V], k: usize) -> V {
    let mut total = V::zero();
    for j in 0..=k {
        total = total + a[j] * b[k - j];
    }
    total
}

/// `sum_{j=1}^{k} j * a[j] * b[k-j]`, used by the exp/log/sin/cos/tan
/// chain-rule recurrences (where `a' = da` in coefficient form is `j * a[j]`
/// at order `j-1`, folded directly into the sum here).
pub fn dconv<V: Base>(a: &[V], b: &[V], k: usize) -> V {
    let mut total = V::zero();
    for j in 1..=k {
        let weight = V::from(j as f64);
        total = total + weight * a[j] * b[k - j];
    }
    total
}

/// Forward kernel shared by every order-0/1-scoped unary transcendental
/// (see `DESIGN.md` for the scope decision): `value` is `f(u_0)`,
/// `dvalue` is `f'(u_0)`.
pub fn unary_forward_01<V: Base>(
    q: usize,
    var: &mut [Vec<V>],
    u: usize,
    res: usize,
    value: V,
    dvalue: V,
) {
    if q == 0 {
        var[res][0] = value;
    } else {
        var[res][1] = dvalue * var[u][1];
    }
}

/// Reverse kernel dual to [unary_forward_01]. `dvalue`/`ddvalue` are
/// `f'(u_0)`/`f''(u_0)`; `ddvalue` is only evaluated when `d == 1`.
pub fn unary_reverse_01<V: Base>(
    d: usize,
    var: &[Vec<V>],
    partial: &mut [Vec<V>],
    u: usize,
    res: usize,
    dvalue: V,
    ddvalue: V,
) {
    if d == 0 {
        partial[u][0] = partial[u][0] + dvalue * partial[res][0];
    } else {
        let u1 = var[u][1];
        partial[u][0] = partial[u][0] + dvalue * partial[res][0] + ddvalue * u1 * partial[res][1];
        partial[u][1] = partial[u][1] + dvalue * partial[res][1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;

    #[test]
    fn conv_matches_polynomial_product() {
        // (1 + 2t) * (3 + 4t) = 3 + 10t + 8t^2
        let a = vec![AzFloat(1.0_f64), AzFloat(2.0)];
        let b = vec![AzFloat(3.0_f64), AzFloat(4.0)];
        assert_eq!(conv(&a, &b, 0).0, 3.0);
        assert_eq!(conv(&a, &b, 1).0, 10.0);
    }
}
