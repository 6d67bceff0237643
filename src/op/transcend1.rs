// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `SqrtOp`, `ExpOp`, `LogOp`, `Log10Op`, `Expm1Op`, `Log1pOp`; see
//! `spec.md` §4.1.
//!
//! These kernels are scoped to orders 0/1 (see `DESIGN.md`, "Open Question:
//! multi-order scope"): they reuse `op::taylor::unary_forward_01` /
//! `unary_reverse_01`, supplying each operator's value, first and second
//! derivative at the current operand value.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::op::taylor::{unary_forward_01, unary_reverse_01};
use crate::tape::IndexT;

macro_rules! unary_transcendental {
    ($name:ident, $info_fn:ident, $opname:literal, |$u0:ident| ($value:expr, $dvalue:expr, $ddvalue:expr) ) => {
        fn forward<V: Base>(q: usize, args: &[IndexT], _con: &[V], var: &mut [Vec<V>], res: usize) {
            let u = args[0] as usize;
            let $u0 = var[u][0];
            let value = $value;
            let dvalue = $dvalue;
            unary_forward_01(q, var, u, res, value, dvalue);
        }
        fn reverse<V: Base>(
            d: usize,
            args: &[IndexT],
            _con: &[V],
            var: &[Vec<V>],
            partial: &mut [Vec<V>],
            res: usize,
        ) {
            if d > 1 {
                crate::error::known(concat!($opname, ": reverse mode order > 1 is not supported"));
            }
            let u = args[0] as usize;
            let $u0 = var[u][0];
            let dvalue = $dvalue;
            let ddvalue = $ddvalue;
            unary_reverse_01(d, var, partial, u, res, dvalue, ddvalue);
        }
        pub fn $info_fn<V: Base>() -> OpInfo<V> {
            OpInfo {
                name: $opname,
                n_arg: 1,
                n_res: 1,
                max_order: Some(1),
                forward,
                reverse,
                depend: |args| vec![args[0]],
                hessian_pairs: |args| vec![(args[0], args[0])],
            }
        }
    };
}

mod sqrt_impl {
    use super::*;
    unary_transcendental!(sqrt, sqrt_info, "sqrt", |u0| {
        let value = u0.sqrt();
        let dvalue = V::from(0.5) / value;
        let ddvalue = V::from(-0.25) / (u0 * value);
        (value, dvalue, ddvalue)
    });
}
pub use sqrt_impl::sqrt_info;

mod exp_impl {
    use super::*;
    unary_transcendental!(exp, exp_info, "exp", |u0| {
        let value = u0.exp();
        let _ = u0;
        (value, value, value)
    });
}
pub use exp_impl::exp_info;

mod log_impl {
    use super::*;
    unary_transcendental!(log, log_info, "log", |u0| {
        let value = u0.ln();
        let dvalue = V::one() / u0;
        let ddvalue = -(dvalue * dvalue);
        (value, dvalue, ddvalue)
    });
}
pub use log_impl::log_info;

mod log10_impl {
    use super::*;
    unary_transcendental!(log10, log10_info, "log10", |u0| {
        let value = u0.log10();
        let ln10 = V::from(10.0).ln();
        let dvalue = V::one() / (u0 * ln10);
        let ddvalue = -(dvalue / u0);
        (value, dvalue, ddvalue)
    });
}
pub use log10_impl::log10_info;

mod expm1_impl {
    use super::*;
    unary_transcendental!(expm1, expm1_info, "expm1", |u0| {
        let value = u0.exp_m1();
        let dvalue = value + V::one();
        let ddvalue = dvalue;
        (value, dvalue, ddvalue)
    });
}
pub use expm1_impl::expm1_info;

mod log1p_impl {
    use super::*;
    unary_transcendental!(log1p, log1p_info, "log1p", |u0| {
        let value = u0.ln_1p();
        let dvalue = V::one() / (V::one() + u0);
        let ddvalue = -(dvalue * dvalue);
        (value, dvalue, ddvalue)
    });
}
pub use log1p_impl::log1p_info;
