// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The operator catalogue (component C1): one module per operator family,
//! plus the opcode ids (`id`), the generic kernel table (`info`), and the
//! shared Taylor-recurrence helpers (`taylor`).
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
pub mod id;
pub mod info;
pub mod taylor;

pub mod add;
pub mod atan2;
pub mod call;
pub mod compare;
pub mod cond;
pub mod div;
pub mod inverse;
pub mod mul;
pub mod no_op;
pub mod pow;
pub mod print;
pub mod sub;
pub mod trig;
pub mod transcend1;
pub mod unary_simple;
pub mod vecad;

/// Debug/placeholder name for an opcode id; used to label table entries
/// before `op_info_vec` overwrites them with the real kernel.
pub fn id_name(op_id: id::OpId) -> &'static str {
    use id::*;
    match op_id {
        x if x == PAR_OP => "par",
        x if x == NO_OP => "no_op",
        x if x == ADD_VV_OP => "add_vv",
        x if x == ADD_PV_OP => "add_pv",
        x if x == SUB_VV_OP => "sub_vv",
        x if x == SUB_PV_OP => "sub_pv",
        x if x == SUB_VP_OP => "sub_vp",
        x if x == MUL_VV_OP => "mul_vv",
        x if x == MUL_PV_OP => "mul_pv",
        x if x == DIV_VV_OP => "div_vv",
        x if x == DIV_PV_OP => "div_pv",
        x if x == DIV_VP_OP => "div_vp",
        x if x == NEG_OP => "neg",
        x if x == ABS_OP => "abs",
        x if x == SIGN_OP => "sign",
        x if x == SQRT_OP => "sqrt",
        x if x == EXP_OP => "exp",
        x if x == EXPM1_OP => "expm1",
        x if x == LOG_OP => "log",
        x if x == LOG1P_OP => "log1p",
        x if x == LOG10_OP => "log10",
        x if x == SIN_COS_OP => "sin_cos",
        x if x == TAN_TANH_OP => "tan_tanh",
        x if x == TANH_OP => "tanh",
        x if x == SINH_COSH_OP => "sinh_cosh",
        x if x == ASIN_OP => "asin",
        x if x == ACOS_OP => "acos",
        x if x == ATAN_OP => "atan",
        x if x == ASINH_OP => "asinh",
        x if x == ACOSH_OP => "acosh",
        x if x == ATANH_OP => "atanh",
        x if x == ERF_OP => "erf",
        x if x == ERFC_OP => "erfc",
        x if x == POW_VV_OP => "pow_vv",
        x if x == POW_PV_OP => "pow_pv",
        x if x == POW_VP_OP => "pow_vp",
        x if x == ATAN2_VV_OP => "atan2_vv",
        x if x == ATAN2_PV_OP => "atan2_pv",
        x if x == ATAN2_VP_OP => "atan2_vp",
        x if x == LT_VV_OP => "lt_vv",
        x if x == LT_PV_OP => "lt_pv",
        x if x == LT_VP_OP => "lt_vp",
        x if x == LE_VV_OP => "le_vv",
        x if x == LE_PV_OP => "le_pv",
        x if x == LE_VP_OP => "le_vp",
        x if x == EQ_VV_OP => "eq_vv",
        x if x == EQ_PV_OP => "eq_pv",
        x if x == NE_VV_OP => "ne_vv",
        x if x == NE_PV_OP => "ne_pv",
        x if x == CEXP_OP => "cexp",
        x if x == LDP_OP => "ldp",
        x if x == LDV_OP => "ldv",
        x if x == STPP_OP => "stpp",
        x if x == STPV_OP => "stpv",
        x if x == STVP_OP => "stvp",
        x if x == STVV_OP => "stvv",
        x if x == PRIP_OP => "prip",
        x if x == PRIV_OP => "priv",
        x if x == AFUN_OP => "afun",
        x if x == FUNAP_OP => "funap",
        x if x == FUNAV_OP => "funav",
        x if x == FUNRP_OP => "funrp",
        x if x == FUNRV_OP => "funrv",
        _ => "unknown_op",
    }
}

/// Inverse of [id_name]; used by `adfn::graph::from_graph` to resolve a
/// persisted opcode name back to its `OpId`. Returns `None` for a name that
/// is not one of the built-in opcodes (the caller then tries it as a
/// registered atomic function's name instead).
pub fn id_from_name(name: &str) -> Option<id::OpId> {
    (0..id::NUMBER_OP).find(|&op_id| id_name(op_id) == name)
}
