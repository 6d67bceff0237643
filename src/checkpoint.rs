// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Checkpointing: wraps a stored [ADfn] as an [atom::AtomicFn] so a call to
//! it can be spliced into another recording as a single opaque opcode;
//! see `spec.md` §4.10 "A checkpoint is the special case where the user
//! built an `ADFun` for the sub-function".
//!
//! `store_checkpoint` registers the wrapper in the same per-`V` registry
//! `atom::register` uses for ordinary atomics (`spec.md` §4.10 draws no
//! distinction between the two at the registry level); `use_checkpoint` is
//! then just `ad::call::call_atomic` under the checkpoint's `atom_index`.
//!
//! `atom::AtomicFn`'s kernels take `&self`, but [ADfn::forward]/[ADfn::reverse_one]
//! need `&mut self` to mutate the stored Taylor-coefficient table, so the
//! function is kept behind a `Mutex`. `spec.md` §4.10 notes "a per-thread
//! copy of the sub-function is used when multi-threaded playback is
//! enabled"; this port keeps one shared copy and serializes concurrent
//! replays through the lock instead (see `DESIGN.md`).
// ---------------------------------------------------------------------------
use std::sync::Mutex;

use crate::adfn::ADfn;
use crate::atom::{self, AtomicFn, AtomicRegistry};
use crate::base::Base;
use crate::op::info::GlobalOpInfoVec;

struct Checkpoint<V> {
    name: String,
    fun: Mutex<ADfn<V>>,
}

impl<V> AtomicFn<V> for Checkpoint<V>
where
    V: Base + GlobalOpInfoVec + AtomicRegistry + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn forward_zero(&self, _call_id: usize, x: &[V]) -> Vec<V> {
        let mut fun = self.fun.lock().unwrap();
        fun.forward(0, x.to_vec())
    }

    fn forward_one(&self, _call_id: usize, x: &[V], dx: &[V]) -> Vec<V> {
        let mut fun = self.fun.lock().unwrap();
        fun.forward(0, x.to_vec());
        fun.forward(1, dx.to_vec())
    }

    fn reverse_one(&self, _call_id: usize, x: &[V], dy: &[V]) -> Vec<V> {
        let mut fun = self.fun.lock().unwrap();
        fun.forward(0, x.to_vec());
        fun.reverse_one(dy.to_vec())
    }
}

/// Converts `fun` into a checkpoint function, registering it under `name`
/// for this value type and returning the `atom_index` that [use_checkpoint]
/// (and, more generally, [crate::ad::call::call_atomic]) needs to call it.
///
/// `name` is only used for diagnostics (`AtomicFn::name`); unlike the
/// registry itself, nothing here rejects a name reused across calls.
pub fn store_checkpoint<V>(name: &str, fun: ADfn<V>) -> usize
where
    V: Base + GlobalOpInfoVec + AtomicRegistry + Send + Sync,
{
    atom::register::<V>(Box::new(Checkpoint {
        name: name.to_string(),
        fun: Mutex::new(fun),
    }))
}

/// Calls the checkpoint function registered at `atom_index` with domain
/// `x`, splicing the call into the currently-recording tape (if any) the
/// same way any other atomic call would be; see
/// [crate::ad::call::call_atomic].
///
/// `call_id` distinguishes call sites sharing the same checkpoint, exactly
/// as it does for a plain atomic.
pub fn use_checkpoint<V>(atom_index: usize, call_id: usize, x: Vec<crate::ad::AD<V>>) -> Vec<crate::ad::AD<V>>
where
    V: Base + crate::tape::ThisThreadTape + AtomicRegistry,
{
    crate::ad::call::call_atomic(atom_index, call_id, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad::AD;
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    fn make_inner_fun() -> ADfn<AzFloat<f64>> {
        // g(u0, u1) = u0 * u1 + u1
        let u = start_recording(vec![AzFloat(1.0_f64), AzFloat(1.0)]);
        let y = crate::ad::binary::add(crate::ad::binary::mul(u[0], u[1]), u[1]);
        let f = stop_recording(vec![y]);
        abort_recording::<AzFloat<f64>>();
        f
    }

    #[test]
    fn store_checkpoint_registers_and_folds_on_constant_operands() {
        let atom_index = store_checkpoint("g", make_inner_fun());
        let x = vec![AD::constant(AzFloat(3.0_f64)), AD::constant(AzFloat(4.0))];
        let y = use_checkpoint(atom_index, 0, x);
        assert!(y[0].is_constant());
        assert_eq!(y[0].value.0, 3.0 * 4.0 + 4.0);
    }

    #[test]
    fn use_checkpoint_splices_call_into_an_outer_recording() {
        let atom_index = store_checkpoint("g", make_inner_fun());
        let ax = start_recording(vec![AzFloat(2.0_f64), AzFloat(5.0)]);
        let ay = use_checkpoint(atom_index, 0, vec![ax[0], ax[1]]);
        assert!(ay[0].is_variable());
        let mut outer = stop_recording(ay);
        let y = outer.forward(0, vec![AzFloat(2.0_f64), AzFloat(5.0)]);
        assert_eq!(y[0].0, 2.0 * 5.0 + 5.0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn reverse_one_through_a_checkpoint_matches_the_inner_derivative() {
        let atom_index = store_checkpoint("g", make_inner_fun());
        let ax = start_recording(vec![AzFloat(2.0_f64), AzFloat(5.0)]);
        let ay = use_checkpoint(atom_index, 0, vec![ax[0], ax[1]]);
        let mut outer = stop_recording(ay);
        outer.forward(0, vec![AzFloat(2.0_f64), AzFloat(5.0)]);
        let dw = outer.reverse_one(vec![AzFloat(1.0_f64)]);
        // d(u0*u1 + u1)/du0 = u1 = 5, d/du1 = u0 + 1 = 3
        assert!((dw[0].0 - 5.0).abs() < 1e-10);
        assert!((dw[1].0 - 3.0).abs() < 1e-10);
        abort_recording::<AzFloat<f64>>();
    }
}
