// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Per-operator kernel table for every value-producing opcode (component
//! C1). Comparisons, print, VecAD store, and atomic-call-boundary opcodes
//! produce no value slot and are dispatched directly by `adfn::forward` /
//! `adfn::reverse` instead of through this table; see `op::{compare, print,
//! vecad, call}`.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::tape::IndexT;

/// `forward(q, args, con, var, res)` fills order `q` of `var[res][q]`
/// (and, for two-slot operators, `var[res+1][q]`) from orders `0..=q` of
/// the operand addresses named in `args` and from the constant pool `con`.
pub type ForwardKernel<V> = fn(q: usize, args: &[IndexT], con: &[V], var: &mut [Vec<V>], res: usize);

/// `reverse(d, args, con, var, partial, res)` accumulates the adjoints of
/// *every* order `0..=d` of the result (`partial[res][0..=d]`, already
/// populated by the caller) into the operand adjoints, in one call — a
/// single `Reverse(q, w)` sweep visits each opcode exactly once and each
/// kernel is responsible for folding in all `d+1` orders itself
/// (`spec.md` §4.7).
pub type ReverseKernel<V> =
    fn(d: usize, args: &[IndexT], con: &[V], var: &[Vec<V>], partial: &mut [Vec<V>], res: usize);

/// Operand addresses (into the variable value space) that this operator's
/// result depends on; used by the forward/reverse Jacobian sparsity sweeps.
pub type DependFn = fn(args: &[IndexT]) -> Vec<IndexT>;

/// Pairs of operand addresses whose *product* contributes a second-order
/// (Hessian) term; empty for operators that are linear in their variable
/// operands (e.g. `add`, `sub`).
pub type HessianPairFn = fn(args: &[IndexT]) -> Vec<(IndexT, IndexT)>;

pub struct OpInfo<V> {
    pub name: &'static str,
    pub n_arg: usize,
    pub n_res: usize,
    /// `None`: general order. `Some(k)`: only orders `0..=k` are
    /// implemented; see `DESIGN.md` for which operators are scoped this way
    /// and why.
    pub max_order: Option<usize>,
    pub forward: ForwardKernel<V>,
    pub reverse: ReverseKernel<V>,
    pub depend: DependFn,
    pub hessian_pairs: HessianPairFn,
}

fn no_depend(_args: &[IndexT]) -> Vec<IndexT> {
    Vec::new()
}
fn no_hessian_pairs(_args: &[IndexT]) -> Vec<(IndexT, IndexT)> {
    Vec::new()
}
fn panic_forward<V>(_q: usize, _args: &[IndexT], _con: &[V], _var: &mut [Vec<V>], _res: usize) {
    crate::error::unknown("forward: operator has no forward kernel");
}
fn panic_reverse<V>(
    _q: usize,
    _args: &[IndexT],
    _con: &[V],
    _var: &[Vec<V>],
    _partial: &mut [Vec<V>],
    _res: usize,
) {
    crate::error::unknown("reverse: operator has no reverse kernel");
}

/// Placeholder entry for opcodes not dispatched through this table (kept so
/// the table is densely indexable by opcode id).
fn placeholder<V>(name: &'static str) -> OpInfo<V> {
    OpInfo {
        name,
        n_arg: 0,
        n_res: 0,
        max_order: Some(0),
        forward: panic_forward,
        reverse: panic_reverse,
        depend: no_depend,
        hessian_pairs: no_hessian_pairs,
    }
}

/// Builds the full, densely-indexed operator-kernel table for value type
/// `V`.
pub fn op_info_vec<V: Base>() -> Vec<OpInfo<V>> {
    use crate::op::id::*;
    let mut result: Vec<OpInfo<V>> = Vec::with_capacity(NUMBER_OP as usize);
    for id in 0..NUMBER_OP {
        result.push(placeholder(crate::op::id_name(id)));
    }
    macro_rules! set {
        ($id:expr, $info:expr) => {
            result[$id as usize] = $info;
        };
    }
    set!(PAR_OP, crate::op::no_op::par_op_info());
    set!(NO_OP, crate::op::no_op::no_op_info());

    set!(ADD_VV_OP, crate::op::add::add_vv_info());
    set!(ADD_PV_OP, crate::op::add::add_pv_info());
    set!(SUB_VV_OP, crate::op::sub::sub_vv_info());
    set!(SUB_PV_OP, crate::op::sub::sub_pv_info());
    set!(SUB_VP_OP, crate::op::sub::sub_vp_info());
    set!(MUL_VV_OP, crate::op::mul::mul_vv_info());
    set!(MUL_PV_OP, crate::op::mul::mul_pv_info());
    set!(DIV_VV_OP, crate::op::div::div_vv_info());
    set!(DIV_PV_OP, crate::op::div::div_pv_info());
    set!(DIV_VP_OP, crate::op::div::div_vp_info());

    set!(NEG_OP, crate::op::unary_simple::neg_info());
    set!(ABS_OP, crate::op::unary_simple::abs_info());
    set!(SIGN_OP, crate::op::unary_simple::sign_info());

    set!(SQRT_OP, crate::op::transcend1::sqrt_info());
    set!(EXP_OP, crate::op::transcend1::exp_info());
    set!(EXPM1_OP, crate::op::transcend1::expm1_info());
    set!(LOG_OP, crate::op::transcend1::log_info());
    set!(LOG1P_OP, crate::op::transcend1::log1p_info());
    set!(LOG10_OP, crate::op::transcend1::log10_info());

    set!(SIN_COS_OP, crate::op::trig::sin_cos_info());
    set!(TAN_TANH_OP, crate::op::trig::tan_tanh_info());
    set!(TANH_OP, crate::op::trig::tanh_info());
    set!(SINH_COSH_OP, crate::op::trig::sinh_cosh_info());

    set!(ASIN_OP, crate::op::inverse::asin_info());
    set!(ACOS_OP, crate::op::inverse::acos_info());
    set!(ATAN_OP, crate::op::inverse::atan_info());
    set!(ASINH_OP, crate::op::inverse::asinh_info());
    set!(ACOSH_OP, crate::op::inverse::acosh_info());
    set!(ATANH_OP, crate::op::inverse::atanh_info());
    set!(ERF_OP, crate::op::inverse::erf_info());
    set!(ERFC_OP, crate::op::inverse::erfc_info());

    set!(POW_VV_OP, crate::op::pow::pow_vv_info());
    set!(POW_PV_OP, crate::op::pow::pow_pv_info());
    set!(POW_VP_OP, crate::op::pow::pow_vp_info());
    set!(ATAN2_VV_OP, crate::op::atan2::atan2_vv_info());
    set!(ATAN2_PV_OP, crate::op::atan2::atan2_pv_info());
    set!(ATAN2_VP_OP, crate::op::atan2::atan2_vp_info());

    set!(CEXP_OP, crate::op::cond::cexp_info());

    result
}

// ---------------------------------------------------------------------------
// GlobalOpInfoVec
/// `<V as GlobalOpInfoVec>::get()` is the process-wide, lazily-built kernel
/// table for value type `V` (immutable after first use; no lock needed for
/// reads).
pub trait GlobalOpInfoVec
where
    Self: Sized + 'static,
{
    fn get() -> &'static Vec<OpInfo<Self>>;
}

/// Instantiates the global kernel table for concrete value type `$V`.
#[macro_export]
macro_rules! impl_global_op_info_vec {
    ($V:ty) => {
        impl $crate::op::info::GlobalOpInfoVec for $V {
            fn get() -> &'static Vec<$crate::op::info::OpInfo<$V>> {
                static TABLE: std::sync::LazyLock<Vec<$crate::op::info::OpInfo<$V>>> =
                    std::sync::LazyLock::new($crate::op::info::op_info_vec::<$V>);
                &TABLE
            }
        }
    };
}
pub use impl_global_op_info_vec;
