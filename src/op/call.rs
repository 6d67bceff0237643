// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `AFunOp`/`FunapOp`/`FunavOp`/`FunrpOp`/`FunrvOp`; see `spec.md` §4.1
//! "Atomic call boundary" and §4.10.
//!
//! `AFunOp` brackets a call: `args = [atom_index, call_id, n, m]` both at
//! open and close. Between the two `AFunOp` records come exactly `n`
//! `Funa{p,v}Op` records (`args = [addr]`, parameter or variable) and then
//! exactly `m` `Funr{p,v}Op` records (`args = [addr]`; `Funrv` additionally
//! produces one new variable result slot, `Funrp` binds a parameter
//! address and produces none). `adfn::forward`/`reverse` walk this bracket
//! directly (it is not in `op::info::op_info_vec`) and hand off to
//! `atom`/`checkpoint` (component C8); any other opcode sequence between
//! the brackets is a tape-corruption error (`spec.md` §4.10 state machine).
// ---------------------------------------------------------------------------
use crate::op::id;

pub fn is_afun_op(op_id: id::OpId) -> bool {
    op_id == id::AFUN_OP
}
pub fn is_fun_arg_op(op_id: id::OpId) -> bool {
    op_id == id::FUNAP_OP || op_id == id::FUNAV_OP
}
pub fn is_fun_res_op(op_id: id::OpId) -> bool {
    op_id == id::FUNRP_OP || op_id == id::FUNRV_OP
}
