// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `LtOp`, `LeOp`, `EqOp`, `NeOp`; see `spec.md` §4.1 "Comparisons".
//!
//! Comparisons record no result slot, so they are not entries in
//! `op::info::op_info_vec`; `adfn::forward` dispatches them directly
//! through [eval] at order zero only, to populate the compare-change
//! witness (`spec.md` §4.6 "Compare-change counter"). Resolving the open
//! question in `spec.md` §9 ("the exact rules for when a comparison
//! opcode is suppressed vs. recorded ... vary"): this port always records
//! the comparison when at least one operand is a variable (see
//! `DESIGN.md`).
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::op::id;
use crate::tape::IndexT;

/// Evaluates a comparison opcode's boolean result at order zero.
pub fn eval<V: Base>(op_id: id::OpId, args: &[IndexT], con: &[V], var: &[Vec<V>]) -> bool {
    use id::*;
    let (lhs, rhs): (V, V) = match op_id {
        x if x == LT_VV_OP || x == LE_VV_OP || x == EQ_VV_OP || x == NE_VV_OP => {
            (var[args[0] as usize][0], var[args[1] as usize][0])
        }
        x if x == LT_PV_OP || x == LE_PV_OP || x == EQ_PV_OP || x == NE_PV_OP => {
            (con[args[0] as usize], var[args[1] as usize][0])
        }
        x if x == LT_VP_OP || x == LE_VP_OP => (var[args[0] as usize][0], con[args[1] as usize]),
        _ => {
            crate::error::unknown("compare::eval: not a comparison opcode");
            (V::nan(), V::nan())
        }
    };
    match op_id {
        x if x == LT_VV_OP || x == LT_PV_OP || x == LT_VP_OP => lhs < rhs,
        x if x == LE_VV_OP || x == LE_PV_OP || x == LE_VP_OP => lhs <= rhs,
        x if x == EQ_VV_OP || x == EQ_PV_OP => lhs == rhs,
        x if x == NE_VV_OP || x == NE_PV_OP => lhs != rhs,
        _ => {
            crate::error::unknown("compare::eval: not a comparison opcode");
            false
        }
    }
}

/// Operand addresses in the variable value space that this comparison
/// depends on; used when `for_jac_sparsity`/`rev_jac_sparsity` is run with
/// `dependency = true` (`spec.md` §4.8).
pub fn depend(op_id: id::OpId, args: &[IndexT]) -> Vec<IndexT> {
    use id::*;
    match op_id {
        x if x == LT_VV_OP || x == LE_VV_OP || x == EQ_VV_OP || x == NE_VV_OP => {
            vec![args[0], args[1]]
        }
        x if x == LT_PV_OP || x == LE_PV_OP || x == EQ_PV_OP || x == NE_PV_OP => {
            vec![args[1]]
        }
        x if x == LT_VP_OP || x == LE_VP_OP => vec![args[0]],
        _ => {
            crate::error::unknown("compare::depend: not a comparison opcode");
            Vec::new()
        }
    }
}

/// Name used by `op::id_name`/diagnostics.
pub fn is_compare_op(op_id: id::OpId) -> bool {
    use id::*;
    matches!(
        op_id,
        x if x == LT_VV_OP || x == LT_PV_OP || x == LT_VP_OP
            || x == LE_VV_OP || x == LE_PV_OP || x == LE_VP_OP
            || x == EQ_VV_OP || x == EQ_PV_OP
            || x == NE_VV_OP || x == NE_PV_OP
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;

    #[test]
    fn lt_vv_matches_operand_order() {
        let var = vec![vec![AzFloat(1.0_f64)], vec![AzFloat(2.0)]];
        let con: Vec<AzFloat<f64>> = Vec::new();
        assert!(eval(id::LT_VV_OP, &[0, 1], &con, &var));
        assert!(!eval(id::LT_VV_OP, &[1, 0], &con, &var));
    }
}
