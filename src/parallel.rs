// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Multi-threading enablement (component C9); see `spec.md` §5 "Scheduling
//! model" and "Multi-threading enablement".
//!
//! The core is single-threaded per tape: parallelism is expressed as
//! distinct tapes on distinct threads, one per `std::thread::LocalKey`
//! (`tape::ThisThreadTape`). Unlike CppAD's C++ statics, a Rust
//! `thread_local!` initializes itself lazily and independently on first
//! touch by each thread, so there is no actual data race for `parallel_ad`
//! to guard against here; the two entry points are kept anyway because
//! `spec.md` names them as the program's contract for "before going
//! parallel" — `parallel_setup` installs the callbacks the core uses to ask
//! "am I in parallel mode, and which thread am I", and `parallel_ad::<V>`
//! forces this thread's lazy statics for `V` to exist up front, matching
//! CppAD's `parallel_ad<Base>()` (`examples/original_source/cppad/local/parallel_ad.hpp`).
// ---------------------------------------------------------------------------
use std::sync::RwLock;

use crate::atom::AtomicRegistry;
use crate::base::Base;
use crate::op::info::GlobalOpInfoVec;
use crate::tape::ThisThreadTape;

struct Callbacks {
    max_num_threads: usize,
    in_parallel: fn() -> bool,
    thread_num: fn() -> usize,
}

static CALLBACKS: RwLock<Option<Callbacks>> = RwLock::new(None);

/// One-time initialiser that must run before any thread records or plays
/// back while `in_parallel_fn` can return `true`.
///
/// * `max_num_threads`: an upper bound on the number of threads that will
///   ever call into the core concurrently.
/// * `in_parallel_fn`: returns whether the calling thread is currently
///   executing in the program's parallel region.
/// * `thread_num_fn`: returns the calling thread's index, `0 .. max_num_threads`.
///
/// Calling this while `in_parallel_fn()` would currently report `true` is a
/// usage error (`spec.md` §5: "must be called before any ... objects are
/// used in parallel execution mode").
pub fn parallel_setup(max_num_threads: usize, in_parallel_fn: fn() -> bool, thread_num_fn: fn() -> usize) {
    if in_parallel_fn() {
        crate::error::known("parallel_setup: must be called before parallel execution");
        return;
    }
    let mut callbacks = CALLBACKS.write().unwrap();
    *callbacks = Some(Callbacks {
        max_num_threads,
        in_parallel: in_parallel_fn,
        thread_num: thread_num_fn,
    });
}

/// Whether the calling thread is currently executing in parallel mode;
/// `false` until [parallel_setup] has installed a callback.
pub fn in_parallel() -> bool {
    match &*CALLBACKS.read().unwrap() {
        Some(callbacks) => (callbacks.in_parallel)(),
        None => false,
    }
}

/// The calling thread's index, `0 .. max_num_threads()`; `0` until
/// [parallel_setup] has installed a callback.
pub fn thread_num() -> usize {
    match &*CALLBACKS.read().unwrap() {
        Some(callbacks) => (callbacks.thread_num)(),
        None => 0,
    }
}

/// The upper bound installed by the last [parallel_setup] call; `1` if it
/// has not been called.
pub fn max_num_threads() -> usize {
    match &*CALLBACKS.read().unwrap() {
        Some(callbacks) => callbacks.max_num_threads,
        None => 1,
    }
}

/// Primes this thread's per-`V` statics (its tape slot, the global op-info
/// table, the atomic registry) so first use inside a parallel region does
/// not pay lazy-initialization cost; must be called, on every thread that
/// will use `AD<V>`, before that thread enters parallel mode.
pub fn parallel_ad<V>()
where
    V: Base + GlobalOpInfoVec + AtomicRegistry + ThisThreadTape,
{
    assert!(!in_parallel(), "parallel_ad: must be called before parallel execution");
    <V as ThisThreadTape>::get().with(|_| {});
    let _ = <V as GlobalOpInfoVec>::get();
    let _ = V::registry().read().unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;
    use crate::impl_atomic_registry;
    use crate::impl_global_op_info_vec;
    use crate::impl_this_thread_tape;

    impl_this_thread_tape!(AzFloat<f64>);
    impl_global_op_info_vec!(AzFloat<f64>);
    impl_atomic_registry!(AzFloat<f64>);

    fn never_in_parallel() -> bool {
        false
    }
    fn always_thread_zero() -> usize {
        0
    }

    #[test]
    fn parallel_ad_primes_statics_without_panicking() {
        parallel_ad::<AzFloat<f64>>();
    }

    // CALLBACKS is a single process-wide static; both assertions live in
    // one test so they cannot interleave with another test's parallel_setup
    // call (cargo runs tests in this file concurrently by default).
    #[test]
    fn parallel_setup_installs_the_callbacks() {
        parallel_setup(4, never_in_parallel, always_thread_zero);
        assert!(!in_parallel());
        assert_eq!(thread_num(), 0);
        assert_eq!(max_num_threads(), 4);
    }
}
