// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `Graph<V>`, a flat, human-readable persisted form of an [ADfn] (component
//! C7 extension); see `spec.md` §9 "a textual/graph form... for persistence
//! and interchange" and `DESIGN.md` for how this compares to CppAD's
//! `cpp_graph`.
//!
//! The node space is unified and 1-based, node 0 unused: dynamic
//! independents come first, then variable independents, then one node per
//! parameter-pool constant, then the results of every dynamic-parameter
//! operator (in recording order), then the results of every variable
//! operator (in recording order) — the same layering CppAD's `cpp_graph`
//! uses (`to_graph`/`from_graph`, `add_op.cpp`), generalized to a Rust
//! struct instead of a byte-oriented wire format.
//!
//! Only the operators dispatched through [crate::op::info::op_info_vec]
//! (arithmetic, unary/binary transcendentals, `cexp`) plus the comparison
//! opcodes are representable; a tape containing a `VecAD` load/store, a
//! `print`, or an atomic-function call is not (`to_graph` reports this via
//! [crate::error::known] and hands back an empty, unusable graph — see
//! `DESIGN.md`).
// ---------------------------------------------------------------------------
use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op;
use crate::op::id::OpId;
use crate::op::info::GlobalOpInfoVec;
use crate::tape::{IndexT, OpSequence};

use super::ADfn;

/// One persisted operator: `name` resolves back to an [OpId] via
/// [op::id_from_name]; `arg_start..arg_end` indexes into the owning
/// [Graph]'s `operator_arg`/`dynamic_operator_arg` stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphOp {
    pub name: String,
    pub n_result: usize,
    pub arg_start: usize,
    pub arg_end: usize,
}

/// A flattened, replayable view of an [ADfn]; see the module documentation
/// for the node-numbering scheme.
#[derive(Clone, Debug)]
pub struct Graph<V> {
    pub function_name: String,
    /// Always empty: atomic-function calls are out of scope for graph
    /// persistence (see module documentation). Kept so the struct shape
    /// matches CppAD's `cpp_graph` and can grow into this later.
    pub atomic_name_vec: Vec<String>,
    pub n_dynamic_ind: usize,
    pub n_variable_ind: usize,
    pub constant_vec: Vec<V>,
    pub dynamic_operator_vec: Vec<GraphOp>,
    pub dynamic_operator_arg: Vec<i64>,
    pub operator_vec: Vec<GraphOp>,
    pub operator_arg: Vec<i64>,
    pub dependent_vec: Vec<usize>,
}

/// Positions (into an operator's `args`) that are *stream-local* addresses
/// when the operator appears in the variable stream: a variable address in
/// `var`, or the corresponding dynamic-parameter-stream position in `dyp`.
/// Every other position up to the operator's arg count is a parameter-pool
/// address. `CEXP_OP`'s four address positions are decoded from its `flag`
/// argument instead (`op::cond::flag_bits`) and are not covered here.
fn local_positions(op_id: OpId) -> &'static [usize] {
    use crate::op::id::*;
    match op_id {
        x if x == PAR_OP || x == NO_OP || x == CEXP_OP => &[],
        x if x == ADD_PV_OP
            || x == SUB_PV_OP
            || x == MUL_PV_OP
            || x == DIV_PV_OP
            || x == POW_PV_OP
            || x == ATAN2_PV_OP
            || x == LT_PV_OP
            || x == LE_PV_OP
            || x == EQ_PV_OP
            || x == NE_PV_OP =>
        {
            &[1]
        }
        x if x == SUB_VP_OP
            || x == DIV_VP_OP
            || x == POW_VP_OP
            || x == ATAN2_VP_OP
            || x == LT_VP_OP
            || x == LE_VP_OP =>
        {
            &[0]
        }
        x if x == ADD_VV_OP
            || x == SUB_VV_OP
            || x == MUL_VV_OP
            || x == DIV_VV_OP
            || x == POW_VV_OP
            || x == ATAN2_VV_OP
            || x == LT_VV_OP
            || x == LE_VV_OP
            || x == EQ_VV_OP
            || x == NE_VV_OP =>
        {
            &[0, 1]
        }
        _ => &[0],
    }
}

/// Whether `to_graph`/`from_graph` know how to represent this opcode.
fn graph_supported(op_id: OpId) -> bool {
    use crate::op::id::*;
    if op::compare::is_compare_op(op_id) {
        return true;
    }
    matches!(
        op_id,
        x if x == PAR_OP
            || x == NO_OP
            || x == ADD_VV_OP || x == ADD_PV_OP
            || x == SUB_VV_OP || x == SUB_PV_OP || x == SUB_VP_OP
            || x == MUL_VV_OP || x == MUL_PV_OP
            || x == DIV_VV_OP || x == DIV_PV_OP || x == DIV_VP_OP
            || x == NEG_OP || x == ABS_OP || x == SIGN_OP
            || x == SQRT_OP || x == EXP_OP || x == EXPM1_OP
            || x == LOG_OP || x == LOG1P_OP || x == LOG10_OP
            || x == SIN_COS_OP || x == TAN_TANH_OP || x == TANH_OP || x == SINH_COSH_OP
            || x == ASIN_OP || x == ACOS_OP || x == ATAN_OP
            || x == ASINH_OP || x == ACOSH_OP || x == ATANH_OP
            || x == ERF_OP || x == ERFC_OP
            || x == POW_VV_OP || x == POW_PV_OP || x == POW_VP_OP
            || x == ATAN2_VV_OP || x == ATAN2_PV_OP || x == ATAN2_VP_OP
            || x == CEXP_OP
    )
}

impl<V> ADfn<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry,
{
    /// Flattens this function into a [Graph]; node numbering per the module
    /// documentation. Reports via [crate::error::known] and returns a
    /// degenerate (empty) graph if the tape uses an opcode outside the
    /// supported subset.
    pub fn to_graph(&self) -> Graph<V> {
        let n_dynamic_ind = self.dyp.n_domain;
        let n_variable_ind = self.var.n_domain;

        // Every pool address's node, filled in three passes: dynamic
        // independents (fixed formula), constants (address order), then
        // dynamic-parameter operator results (stream order, interleaved
        // with the constant pass below via `is_dyn`).
        let mut pool_node = vec![0usize; self.par.len()];
        for j in 0..n_dynamic_ind {
            pool_node[2 + j] = 1 + j;
        }
        let mut next_node = n_dynamic_ind + n_variable_ind;
        let mut constant_vec = Vec::new();
        for addr in 0..self.par.len() {
            if !self.is_dyn[addr] {
                next_node += 1;
                pool_node[addr] = next_node;
                constant_vec.push(self.par[addr]);
            }
        }

        let mut dynamic_operator_vec = Vec::new();
        let mut dynamic_operator_arg: Vec<i64> = Vec::new();
        let mut dyn_idx = 0usize;
        for op_index in 0..self.dyp.n_op() {
            let op_id = self.dyp.id_seq[op_index];
            let args = self.dyp.args(op_index);
            if !graph_supported(op_id) {
                crate::error::known("f.to_graph: dynamic-parameter stream uses an unsupported operator");
                return empty_graph(self.function_name.clone());
            }
            let arg_start = dynamic_operator_arg.len();
            if op::compare::is_compare_op(op_id) {
                for &a in args {
                    dynamic_operator_arg.push(pool_node[a as usize] as i64);
                }
                dynamic_operator_vec.push(GraphOp {
                    name: op::id_name(op_id).to_string(),
                    n_result: 0,
                    arg_start,
                    arg_end: dynamic_operator_arg.len(),
                });
                continue;
            }
            // Every address position in the dyp stream is a pool address.
            for &a in args {
                dynamic_operator_arg.push(pool_node[a as usize] as i64);
            }
            let addr = self.dyn_par_addr[dyn_idx] as usize;
            dyn_idx += 1;
            let n_result = <V as GlobalOpInfoVec>::get()[op_id as usize].n_res;
            for k in 0..n_result {
                next_node += 1;
                pool_node[addr + k] = next_node;
            }
            dynamic_operator_vec.push(GraphOp {
                name: op::id_name(op_id).to_string(),
                n_result,
                arg_start,
                arg_end: dynamic_operator_arg.len(),
            });
        }

        let mut var_node = vec![0usize; self.size_var() + 1];
        for j in 0..=n_variable_ind {
            var_node[j] = if j == 0 { 0 } else { n_dynamic_ind + j };
        }
        let mut operator_vec = Vec::new();
        let mut operator_arg: Vec<i64> = Vec::new();
        let mut res = n_variable_ind + 1;
        for op_index in 0..self.var.n_op() {
            let op_id = self.var.id_seq[op_index];
            let args = self.var.args(op_index);
            if !graph_supported(op_id) {
                crate::error::known("f.to_graph: variable stream uses an unsupported operator");
                return empty_graph(self.function_name.clone());
            }
            let arg_start = operator_arg.len();
            if op::compare::is_compare_op(op_id) {
                for (k, &a) in args.iter().enumerate() {
                    let is_local = local_positions(op_id).contains(&k);
                    let node = if is_local { var_node[a as usize] } else { pool_node[a as usize] };
                    operator_arg.push(node as i64);
                }
                operator_vec.push(GraphOp {
                    name: op::id_name(op_id).to_string(),
                    n_result: 0,
                    arg_start,
                    arg_end: operator_arg.len(),
                });
                continue;
            }
            if op_id == op::id::CEXP_OP {
                let (left_v, right_v, true_v, false_v) = op::cond::flag_bits(args[1]);
                operator_arg.push(args[0] as i64);
                operator_arg.push(args[1] as i64);
                for (is_var, &a) in [left_v, right_v, true_v, false_v].into_iter().zip(&args[2..6]) {
                    let node = if is_var { var_node[a as usize] } else { pool_node[a as usize] };
                    operator_arg.push(node as i64);
                }
                operator_vec.push(GraphOp {
                    name: op::id_name(op_id).to_string(),
                    n_result: 1,
                    arg_start,
                    arg_end: operator_arg.len(),
                });
                var_node[res] = { next_node += 1; next_node };
                res += 1;
                continue;
            }
            let local = local_positions(op_id);
            for (k, &a) in args.iter().enumerate() {
                let node = if local.contains(&k) { var_node[a as usize] } else { pool_node[a as usize] };
                operator_arg.push(node as i64);
            }
            let n_result = <V as GlobalOpInfoVec>::get()[op_id as usize].n_res;
            for k in 0..n_result {
                next_node += 1;
                var_node[res + k] = next_node;
            }
            operator_vec.push(GraphOp {
                name: op::id_name(op_id).to_string(),
                n_result,
                arg_start,
                arg_end: operator_arg.len(),
            });
            res += n_result;
        }

        let dependent_vec = self.var.dep.iter().map(|&a| var_node[a as usize]).collect();

        Graph {
            function_name: self.function_name.clone(),
            atomic_name_vec: Vec::new(),
            n_dynamic_ind,
            n_variable_ind,
            constant_vec,
            dynamic_operator_vec,
            dynamic_operator_arg,
            operator_vec,
            operator_arg,
            dependent_vec,
        }
    }

    /// Rebuilds an `ADfn` from a [Graph] produced by [ADfn::to_graph].
    /// Dynamic-parameter values (both independents and computed entries)
    /// come back as `NaN` placeholders: call `new_dynamic` (or `forward`)
    /// to populate them, exactly as for a freshly declared dynamic
    /// independent (`spec.md` §4.2).
    pub fn from_graph(graph: &Graph<V>) -> Self {
        let mut par = vec![V::nan(), V::one()];
        let mut is_dyn = vec![false, false];
        for _ in 0..graph.n_dynamic_ind {
            par.push(V::nan());
            is_dyn.push(true);
        }
        // node -> pool address, for nodes 1..=n_dynamic_ind and every
        // constant/dynamic-operator-result node that follows.
        let total_nodes = graph.n_dynamic_ind
            + graph.n_variable_ind
            + graph.constant_vec.len()
            + graph.dynamic_operator_vec.iter().map(|op| op.n_result).sum::<usize>()
            + graph.operator_vec.iter().map(|op| op.n_result).sum::<usize>();
        let mut node_pool_addr = vec![0u32; total_nodes + 1];
        for j in 0..graph.n_dynamic_ind {
            node_pool_addr[1 + j] = (2 + j) as IndexT;
        }
        let mut node = graph.n_dynamic_ind + graph.n_variable_ind;
        for &value in &graph.constant_vec {
            node += 1;
            node_pool_addr[node] = par.len() as IndexT;
            par.push(value);
            is_dyn.push(false);
        }

        let mut dyp = OpSequence::new(graph.n_dynamic_ind);
        let mut dyn_par_addr = Vec::new();
        for op in &graph.dynamic_operator_vec {
            let op_id = match op::id_from_name(&op.name) {
                Some(id) => id,
                None => {
                    crate::error::known("f.from_graph: unknown dynamic operator name");
                    0
                }
            };
            let args: Vec<IndexT> = graph.dynamic_operator_arg[op.arg_start..op.arg_end]
                .iter()
                .map(|&n| node_pool_addr[n as usize])
                .collect();
            if op.n_result == 0 {
                dyp.put_op(op_id, &args, 0);
                continue;
            }
            let addr = par.len() as IndexT;
            for _ in 0..op.n_result {
                par.push(V::nan());
                is_dyn.push(true);
            }
            dyp.put_op(op_id, &args, op.n_result);
            dyn_par_addr.push(addr);
            for k in 0..op.n_result {
                node += 1;
                node_pool_addr[node] = addr + k as IndexT;
            }
        }

        let mut var = OpSequence::new(graph.n_variable_ind);
        let mut node_var_addr = vec![0u32; total_nodes + 1];
        for j in 0..graph.n_variable_ind {
            node_var_addr[graph.n_dynamic_ind + 1 + j] = (1 + j) as IndexT;
        }
        for op in &graph.operator_vec {
            let op_id = match op::id_from_name(&op.name) {
                Some(id) => id,
                None => {
                    crate::error::known("f.from_graph: unknown variable operator name");
                    0
                }
            };
            if op::compare::is_compare_op(op_id) {
                let args: Vec<IndexT> = graph.operator_arg[op.arg_start..op.arg_end]
                    .iter()
                    .enumerate()
                    .map(|(k, &n)| {
                        if local_positions(op_id).contains(&k) {
                            node_var_addr[n as usize]
                        } else {
                            node_pool_addr[n as usize]
                        }
                    })
                    .collect();
                var.put_op(op_id, &args, 0);
                continue;
            }
            if op_id == op::id::CEXP_OP {
                let raw = &graph.operator_arg[op.arg_start..op.arg_end];
                let (cop, flag) = (raw[0] as IndexT, raw[1] as IndexT);
                let (left_v, right_v, true_v, false_v) = op::cond::flag_bits(flag);
                let vars = [left_v, right_v, true_v, false_v];
                let mut args = vec![cop, flag];
                for (is_var, &n) in vars.iter().zip(&raw[2..6]) {
                    args.push(if *is_var { node_var_addr[n as usize] } else { node_pool_addr[n as usize] });
                }
                let first = var.put_op(op_id, &args, 1);
                node += 1;
                assert!(node <= total_nodes, "f.from_graph: node count exceeds the graph's declared total");
                node_var_addr[node] = first;
                continue;
            }
            let local = local_positions(op_id);
            let args: Vec<IndexT> = graph.operator_arg[op.arg_start..op.arg_end]
                .iter()
                .enumerate()
                .map(|(k, &n)| {
                    if local.contains(&k) { node_var_addr[n as usize] } else { node_pool_addr[n as usize] }
                })
                .collect();
            let first = var.put_op(op_id, &args, op.n_result);
            for k in 0..op.n_result {
                node += 1;
                node_var_addr[node] = first + k as IndexT;
            }
        }
        var.dep = graph.dependent_vec.iter().map(|&n| node_var_addr[n]).collect();

        ADfn {
            dyp,
            var,
            par,
            is_dyn,
            text: Vec::new(),
            vecad_len: Vec::new(),
            vecad_ind: Vec::new(),
            dyn_par_addr,
            taylor: Vec::new(),
            order_this: None,
            partial: Vec::new(),
            vecad_runtime_value: Vec::new(),
            vecad_runtime_source: Vec::new(),
            ld_source: Vec::new(),
            compare_witness: Vec::new(),
            compare_change_count: 0,
            check_for_nan: false,
            hold_reverse_mem: false,
            function_name: graph.function_name.clone(),
        }
    }
}

fn empty_graph<V>(function_name: String) -> Graph<V> {
    Graph {
        function_name,
        atomic_name_vec: Vec::new(),
        n_dynamic_ind: 0,
        n_variable_ind: 0,
        constant_vec: Vec::new(),
        dynamic_operator_vec: Vec::new(),
        dynamic_operator_arg: Vec::new(),
        operator_vec: Vec::new(),
        operator_arg: Vec::new(),
        dependent_vec: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Display / FromStr
//
// A line-oriented text form (no serde, matching `DESIGN.md`'s ambient-stack
// decision): a header line, then one block per field. Every number is
// whitespace-separated; every `GraphOp` is written as `name n_result
// arg...`.
impl<V: Base> std::fmt::Display for Graph<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "function_name {}", self.function_name)?;
        writeln!(f, "n_dynamic_ind {}", self.n_dynamic_ind)?;
        writeln!(f, "n_variable_ind {}", self.n_variable_ind)?;
        writeln!(f, "n_atomic_name {}", self.atomic_name_vec.len())?;
        for name in &self.atomic_name_vec {
            writeln!(f, "{name}")?;
        }
        writeln!(f, "n_constant {}", self.constant_vec.len())?;
        for value in &self.constant_vec {
            writeln!(f, "{value}")?;
        }
        writeln!(f, "n_dynamic_operator {}", self.dynamic_operator_vec.len())?;
        for op in &self.dynamic_operator_vec {
            write_graph_op(f, op, &self.dynamic_operator_arg)?;
        }
        writeln!(f, "n_operator {}", self.operator_vec.len())?;
        for op in &self.operator_vec {
            write_graph_op(f, op, &self.operator_arg)?;
        }
        writeln!(f, "n_dependent {}", self.dependent_vec.len())?;
        for &n in &self.dependent_vec {
            writeln!(f, "{n}")?;
        }
        Ok(())
    }
}

fn write_graph_op(f: &mut std::fmt::Formatter<'_>, op: &GraphOp, arg: &[i64]) -> std::fmt::Result {
    write!(f, "{} {}", op.name, op.n_result)?;
    for &a in &arg[op.arg_start..op.arg_end] {
        write!(f, " {a}")?;
    }
    writeln!(f)
}

/// Error returned by `Graph::<V>::from_str` when the text is not
/// well-formed; `Display`ed for whatever the caller wants to report.
#[derive(Debug)]
pub struct GraphParseError(String);

impl std::fmt::Display for GraphParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph parse error: {}", self.0)
    }
}
impl std::error::Error for GraphParseError {}

fn bad(msg: impl Into<String>) -> GraphParseError {
    GraphParseError(msg.into())
}

impl<V: Base> std::str::FromStr for Graph<V> {
    type Err = GraphParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text.lines();
        let function_name = take_field(&mut lines, "function_name")?;
        let n_dynamic_ind: usize = take_count(&mut lines, "n_dynamic_ind")?;
        let n_variable_ind: usize = take_count(&mut lines, "n_variable_ind")?;
        let n_atomic_name = take_count(&mut lines, "n_atomic_name")?;
        let mut atomic_name_vec = Vec::with_capacity(n_atomic_name);
        for _ in 0..n_atomic_name {
            atomic_name_vec.push(next_line(&mut lines)?.to_string());
        }
        let n_constant = take_count(&mut lines, "n_constant")?;
        let mut constant_vec = Vec::with_capacity(n_constant);
        for _ in 0..n_constant {
            let raw = next_line(&mut lines)?;
            let parsed: f64 = raw.trim().parse().map_err(|_| bad(format!("bad constant {raw:?}")))?;
            constant_vec.push(V::from(parsed));
        }
        let n_dynamic_operator = take_count(&mut lines, "n_dynamic_operator")?;
        let (dynamic_operator_vec, dynamic_operator_arg) = read_graph_ops(&mut lines, n_dynamic_operator)?;
        let n_operator = take_count(&mut lines, "n_operator")?;
        let (operator_vec, operator_arg) = read_graph_ops(&mut lines, n_operator)?;
        let n_dependent = take_count(&mut lines, "n_dependent")?;
        let mut dependent_vec = Vec::with_capacity(n_dependent);
        for _ in 0..n_dependent {
            let raw = next_line(&mut lines)?;
            dependent_vec.push(raw.trim().parse().map_err(|_| bad(format!("bad dependent {raw:?}")))?);
        }
        Ok(Graph {
            function_name,
            atomic_name_vec,
            n_dynamic_ind,
            n_variable_ind,
            constant_vec,
            dynamic_operator_vec,
            dynamic_operator_arg,
            operator_vec,
            operator_arg,
            dependent_vec,
        })
    }
}

fn next_line<'a>(lines: &mut std::str::Lines<'a>) -> Result<&'a str, GraphParseError> {
    lines.next().ok_or_else(|| bad("unexpected end of input"))
}

fn take_field(lines: &mut std::str::Lines<'_>, tag: &str) -> Result<String, GraphParseError> {
    let line = next_line(lines)?;
    let rest = line
        .strip_prefix(tag)
        .and_then(|r| r.strip_prefix(' '))
        .ok_or_else(|| bad(format!("expected `{tag} ...`, got {line:?}")))?;
    Ok(rest.to_string())
}

fn take_count(lines: &mut std::str::Lines<'_>, tag: &str) -> Result<usize, GraphParseError> {
    take_field(lines, tag)?.trim().parse().map_err(|_| bad(format!("expected a count after `{tag}`")))
}

fn read_graph_ops(
    lines: &mut std::str::Lines<'_>,
    n: usize,
) -> Result<(Vec<GraphOp>, Vec<i64>), GraphParseError> {
    let mut ops = Vec::with_capacity(n);
    let mut arg = Vec::new();
    for _ in 0..n {
        let line = next_line(lines)?;
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| bad("missing operator name"))?.to_string();
        let n_result: usize =
            words.next().and_then(|w| w.parse().ok()).ok_or_else(|| bad("missing n_result"))?;
        let arg_start = arg.len();
        for word in words {
            arg.push(word.parse().map_err(|_| bad(format!("bad operator argument {word:?}")))?);
        }
        ops.push(GraphOp { name, n_result, arg_start, arg_end: arg.len() });
    }
    Ok((ops, arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    #[test]
    fn round_trips_a_polynomial_through_to_graph_and_from_graph() {
        let x = start_recording(vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        let y = x[0] * x[0] + crate::ad::AD::constant(AzFloat(1.0_f64)) * x[1];
        let mut f = stop_recording(vec![y]);
        let g = f.to_graph();
        assert_eq!(g.n_variable_ind, 2);
        assert_eq!(g.dependent_vec.len(), 1);

        let mut rebuilt = super::ADfn::from_graph(&g);
        let out = rebuilt.forward(0, vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        f.forward(0, vec![AzFloat(2.0_f64), AzFloat(3.0)]);
        assert!((out[0].0 - 7.0).abs() < 1e-10); // 2*2 + 1*3
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        let x = start_recording(vec![AzFloat(5.0_f64)]);
        let y = crate::ad::transcend::sqrt(x[0]);
        let mut f = stop_recording(vec![y]);
        let g = f.to_graph();
        let text = g.to_string();
        let g2: Graph<AzFloat<f64>> = text.parse().expect("graph text should parse back");
        assert_eq!(g2.operator_vec.len(), g.operator_vec.len());
        assert_eq!(g2.dependent_vec, g.dependent_vec);

        let mut rebuilt = super::ADfn::from_graph(&g2);
        let out = rebuilt.forward(0, vec![AzFloat(5.0_f64)]);
        assert!((out[0].0 - 5.0_f64.sqrt()).abs() < 1e-10);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn comparison_is_preserved_as_a_zero_result_operator() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0)]);
        let _ = x[0] < x[1];
        let f = stop_recording(vec![x[0]]);
        let g = f.to_graph();
        assert_eq!(g.operator_vec.len(), 1); // the comparison; x0 is already a variable dependent
        assert_eq!(g.operator_vec[0].n_result, 0);
    }
}
