// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Operator catalogue ids (component C1); see `spec.md` §4.1.
//!
//! Binary operators that are symmetric under operand swap (`+`, `*`, `==`,
//! `!=`) canonicalize a parameter/variable pair into the `Pv` form at record
//! time, so no `Vp` opcode exists for them (`spec.md` §4.1, last sentence).
//!
//! `TAN_TANH_OP` covers only `tan` (the name is historical); `tanh` has its
//! own opcode, `TANH_OP`, since the two functions need different companion
//! recurrences (`1+tan^2` vs. `1-tanh^2`) and cannot share one kernel.
// ---------------------------------------------------------------------------
#![allow(dead_code)]

pub type OpId = u8;

macro_rules! op_ids {
    ( $( $name:ident ),* $(,)? ) => {
        op_ids!(@count 0; $( $name ),*);
    };
    (@count $n:expr; $name:ident $(, $rest:ident )*) => {
        pub const $name: OpId = $n;
        op_ids!(@count $n + 1; $( $rest ),*);
    };
    (@count $n:expr;) => {
        pub const NUMBER_OP: OpId = $n;
    };
}

op_ids!(
    // markers
    PAR_OP, NO_OP,
    // arithmetic, vv/pv/vp
    ADD_VV_OP, ADD_PV_OP,
    SUB_VV_OP, SUB_PV_OP, SUB_VP_OP,
    MUL_VV_OP, MUL_PV_OP,
    DIV_VV_OP, DIV_PV_OP, DIV_VP_OP,
    // unary
    NEG_OP, ABS_OP, SIGN_OP,
    SQRT_OP, EXP_OP, EXPM1_OP, LOG_OP, LOG1P_OP, LOG10_OP,
    // two-slot unary (value slot, companion slot)
    SIN_COS_OP, TAN_TANH_OP, TANH_OP, SINH_COSH_OP,
    // order-0/1-only unary (documented scope, see DESIGN.md)
    ASIN_OP, ACOS_OP, ATAN_OP, ASINH_OP, ACOSH_OP, ATANH_OP, ERF_OP, ERFC_OP,
    // binary transcendental
    POW_VV_OP, POW_PV_OP, POW_VP_OP, ATAN2_VV_OP, ATAN2_PV_OP, ATAN2_VP_OP,
    // comparisons, vv/pv/vp
    LT_VV_OP, LT_PV_OP, LT_VP_OP,
    LE_VV_OP, LE_PV_OP, LE_VP_OP,
    EQ_VV_OP, EQ_PV_OP,
    NE_VV_OP, NE_PV_OP,
    // conditional expression
    CEXP_OP,
    // VecAD
    LDP_OP, LDV_OP, STPP_OP, STPV_OP, STVP_OP, STVV_OP,
    // print
    PRIP_OP, PRIV_OP,
    // atomic-function call boundary
    AFUN_OP, FUNAP_OP, FUNAV_OP, FUNRP_OP, FUNRV_OP,
);
