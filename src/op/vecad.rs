// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `LdpOp`/`LdvOp` (load) and `St{pp,pv,vp,vv}Op` (store); see `spec.md`
//! §4.1 "VecAD ops" and §4.5.
//!
//! VecAD ops produce/consume a runtime array that is *separate* from the
//! tape's single-assignment variable value space (`spec.md` §3's
//! `vecad_ind` pool only records each vector's *initial* contents; the
//! element values as of any later point in the recording are whatever the
//! most recent `St*Op` wrote). `adfn::forward`/`adfn::reverse` own that
//! runtime array as scratch state (`runtime_value`, reset at the start of
//! every `Forward(0, ·)`) and a parallel `runtime_source` array recording,
//! for each slot, the variable address (if any) that last wrote it — which
//! `reverse` consults to route a load's adjoint back to its source.
//!
//! Scoped to order 0 (see `DESIGN.md`): a `Forward(q>0, ·)` call leaves
//! VecAD-derived variables at zero for `q>0`, matching the convention that
//! VecAD is predominantly used for table lookups whose derivative content
//! is already carried by the comparisons/values involved, not by the
//! lookup itself.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::tape::IndexT;

/// Base offset of vector `vec_id` within the flattened runtime array, given
/// each vector's recorded length.
pub fn base_offset(vecad_len: &[IndexT], vec_id: usize) -> usize {
    vecad_len[..vec_id].iter().map(|&n| n as usize).sum()
}

fn round_index<V: Base>(value: V) -> usize {
    let f = value.to_f64();
    if f < 0.0 {
        crate::error::known("vecad: negative index");
    }
    f.round() as usize
}

/// `LdpOp`: `args = [vec_id, index_par_addr]`; reads the runtime value at a
/// constant index.
pub fn ldp_forward<V: Base>(
    args: &[IndexT],
    con: &[V],
    runtime_value: &[V],
    runtime_source: &[Option<IndexT>],
    vecad_len: &[IndexT],
) -> (V, Option<IndexT>) {
    let vec_id = args[0] as usize;
    let index = round_index(con[args[1] as usize]);
    let slot = base_offset(vecad_len, vec_id) + index;
    (runtime_value[slot], runtime_source[slot])
}

/// `LdvOp`: `args = [vec_id, index_var_addr]`; reads the runtime value at
/// an index computed from a variable's order-0 value.
pub fn ldv_forward<V: Base>(
    args: &[IndexT],
    var: &[Vec<V>],
    runtime_value: &[V],
    runtime_source: &[Option<IndexT>],
    vecad_len: &[IndexT],
) -> (V, Option<IndexT>) {
    let vec_id = args[0] as usize;
    let index = round_index(var[args[1] as usize][0]);
    let slot = base_offset(vecad_len, vec_id) + index;
    (runtime_value[slot], runtime_source[slot])
}

/// Shared store implementation: writes `(value, source)` at the resolved
/// slot.
fn store<V: Base>(
    vec_id: usize,
    index: usize,
    value: V,
    source: Option<IndexT>,
    runtime_value: &mut [V],
    runtime_source: &mut [Option<IndexT>],
    vecad_len: &[IndexT],
) {
    let slot = base_offset(vecad_len, vec_id) + index;
    runtime_value[slot] = value;
    runtime_source[slot] = source;
}

/// `StppOp`: `args = [vec_id, index_par_addr, value_par_addr]`.
#[allow(clippy::too_many_arguments)]
pub fn stpp_forward<V: Base>(
    args: &[IndexT],
    con: &[V],
    runtime_value: &mut [V],
    runtime_source: &mut [Option<IndexT>],
    vecad_len: &[IndexT],
) {
    let index = round_index(con[args[1] as usize]);
    store(
        args[0] as usize,
        index,
        con[args[2] as usize],
        None,
        runtime_value,
        runtime_source,
        vecad_len,
    );
}

/// `StpvOp`: `args = [vec_id, index_par_addr, value_var_addr]`.
#[allow(clippy::too_many_arguments)]
pub fn stpv_forward<V: Base>(
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    runtime_value: &mut [V],
    runtime_source: &mut [Option<IndexT>],
    vecad_len: &[IndexT],
) {
    let index = round_index(con[args[1] as usize]);
    let value_addr = args[2];
    store(
        args[0] as usize,
        index,
        var[value_addr as usize][0],
        Some(value_addr),
        runtime_value,
        runtime_source,
        vecad_len,
    );
}

/// `StvpOp`: `args = [vec_id, index_var_addr, value_par_addr]`.
#[allow(clippy::too_many_arguments)]
pub fn stvp_forward<V: Base>(
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    runtime_value: &mut [V],
    runtime_source: &mut [Option<IndexT>],
    vecad_len: &[IndexT],
) {
    let index = round_index(var[args[1] as usize][0]);
    store(
        args[0] as usize,
        index,
        con[args[2] as usize],
        None,
        runtime_value,
        runtime_source,
        vecad_len,
    );
}

/// `StvvOp`: `args = [vec_id, index_var_addr, value_var_addr]`.
#[allow(clippy::too_many_arguments)]
pub fn stvv_forward<V: Base>(
    args: &[IndexT],
    var: &[Vec<V>],
    runtime_value: &mut [V],
    runtime_source: &mut [Option<IndexT>],
    vecad_len: &[IndexT],
) {
    let index = round_index(var[args[1] as usize][0]);
    let value_addr = args[2];
    store(
        args[0] as usize,
        index,
        var[value_addr as usize][0],
        Some(value_addr),
        runtime_value,
        runtime_source,
        vecad_len,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;

    #[test]
    fn store_then_load_round_trips() {
        let vecad_len = vec![3_u32];
        let mut runtime_value = vec![AzFloat(0.0_f64); 3];
        let mut runtime_source = vec![None; 3];
        let con = vec![AzFloat(1.0_f64)];
        stvp_forward(
            &[0, 0, 0],
            &con,
            &[vec![AzFloat(1.0_f64)]],
            &mut runtime_value,
            &mut runtime_source,
            &vecad_len,
        );
        let (value, source) = ldp_forward(&[0, 0], &con, &runtime_value, &runtime_source, &vecad_len);
        assert_eq!(value.0, 1.0);
        assert_eq!(source, None);
    }
}
