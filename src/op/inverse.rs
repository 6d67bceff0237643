// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `AsinOp`, `AcosOp`, `AtanOp`, `AsinhOp`, `AcoshOp`, `AtanhOp`, `ErfOp`,
//! `ErfcOp`; see `spec.md` §4.1. Same order-0/1 scope and shared-helper
//! structure as `op::transcend1`.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::info::OpInfo;
use crate::op::taylor::{unary_forward_01, unary_reverse_01};
use crate::tape::IndexT;

macro_rules! unary_transcendental {
    ($info_fn:ident, $opname:literal, |$u0:ident| ($value:expr, $dvalue:expr, $ddvalue:expr) ) => {
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

mod asin_impl {
    use super::*;
    unary_transcendental!(asin_info, "asin", |u0| {
        let value = u0.asin();
        let w = V::one() - u0 * u0;
        let dvalue = V::one() / w.sqrt();
        let ddvalue = u0 * dvalue / w;
        (value, dvalue, ddvalue)
    });
}
pub use asin_impl::asin_info;

mod acos_impl {
    use super::*;
    unary_transcendental!(acos_info, "acos", |u0| {
        let value = u0.acos();
        let w = V::one() - u0 * u0;
        let dvalue = -(V::one() / w.sqrt());
        let ddvalue = u0 * dvalue / w;
        (value, dvalue, ddvalue)
    });
}
pub use acos_impl::acos_info;

mod atan_impl {
    use super::*;
    unary_transcendental!(atan_info, "atan", |u0| {
        let value = u0.atan();
        let w = V::one() + u0 * u0;
        let dvalue = V::one() / w;
        let ddvalue = V::from(-2.0) * u0 * dvalue / w;
        (value, dvalue, ddvalue)
    });
}
pub use atan_impl::atan_info;

mod asinh_impl {
    use super::*;
    unary_transcendental!(asinh_info, "asinh", |u0| {
        let value = u0.asinh();
        let w = u0 * u0 + V::one();
        let dvalue = V::one() / w.sqrt();
        let ddvalue = -(u0 * dvalue / w);
        (value, dvalue, ddvalue)
    });
}
pub use asinh_impl::asinh_info;

mod acosh_impl {
    use super::*;
    unary_transcendental!(acosh_info, "acosh", |u0| {
        let value = u0.acosh();
        let w = u0 * u0 - V::one();
        let dvalue = V::one() / w.sqrt();
        let ddvalue = -(u0 * dvalue / w);
        (value, dvalue, ddvalue)
    });
}
pub use acosh_impl::acosh_info;

mod atanh_impl {
    use super::*;
    unary_transcendental!(atanh_info, "atanh", |u0| {
        let value = u0.atanh();
        let w = V::one() - u0 * u0;
        let dvalue = V::one() / w;
        let ddvalue = V::from(2.0) * u0 * dvalue / w;
        (value, dvalue, ddvalue)
    });
}
pub use atanh_impl::atanh_info;

mod erf_impl {
    use super::*;
    unary_transcendental!(erf_info, "erf", |u0| {
        let value = u0.erf();
        let two_over_sqrt_pi = V::from(2.0 / std::f64::consts::PI.sqrt());
        let dvalue = two_over_sqrt_pi * (-(u0 * u0)).exp();
        let ddvalue = V::from(-2.0) * u0 * dvalue;
        (value, dvalue, ddvalue)
    });
}
pub use erf_impl::erf_info;

mod erfc_impl {
    use super::*;
    unary_transcendental!(erfc_info, "erfc", |u0| {
        let value = u0.erfc();
        let two_over_sqrt_pi = V::from(2.0 / std::f64::consts::PI.sqrt());
        let dvalue = -(two_over_sqrt_pi * (-(u0 * u0)).exp());
        let ddvalue = V::from(-2.0) * u0 * dvalue;
        (value, dvalue, ddvalue)
    });
}
pub use erfc_impl::erfc_info;
