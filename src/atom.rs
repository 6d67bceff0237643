// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Atomic function registry (component C8); see `spec.md` §4.10 "Atomic /
//! checkpoint extension".
//!
//! An atomic function is any `V`-valued callable registered once per
//! process and referenced from a tape by its `atom_index`; the tape only
//! ever records the `AFunOp`/`Funa{p,v}Op`/`Funr{p,v}Op` bracket
//! (`op::call`), never the atomic's internals, so the same recording can be
//! replayed against a different registration (e.g. after `checkpoint`
//! swaps in an optimized `ADfn`). Scoped to orders 0 and 1, matching most
//! of the built-in transcendentals (`op::transcend1`, `op::inverse`).
// ---------------------------------------------------------------------------
use std::sync::RwLock;

use crate::base::Base;

/// A registered atomic (or checkpointed) function over value type `V`.
pub trait AtomicFn<V>: Send + Sync {
    fn name(&self) -> &str;
    /// `y = f(x)`.
    fn forward_zero(&self, call_id: usize, x: &[V]) -> Vec<V>;
    /// `dy = f'(x) * dx`, given the same `x` as the matching `forward_zero`.
    fn forward_one(&self, call_id: usize, x: &[V], dx: &[V]) -> Vec<V>;
    /// `dx = dy * f'(x)`, given the same `x` as the matching `forward_zero`.
    fn reverse_one(&self, call_id: usize, x: &[V], dy: &[V]) -> Vec<V>;
}

/// Per-`V` process-wide registry; a sealed trait in the style of
/// `tape::ThisThreadTape` and `op::info::GlobalOpInfoVec`.
pub trait AtomicRegistry
where
    Self: Sized + 'static,
{
    fn registry() -> &'static RwLock<Vec<Box<dyn AtomicFn<Self>>>>;
}

/// Instantiates the global atomic-function registry for concrete value
/// type `$V`.
#[macro_export]
macro_rules! impl_atomic_registry {
    ($V:ty) => {
        impl $crate::atom::AtomicRegistry for $V {
            fn registry() -> &'static std::sync::RwLock<
                Vec<Box<dyn $crate::atom::AtomicFn<$V>>>,
            > {
                static REGISTRY: std::sync::RwLock<Vec<Box<dyn $crate::atom::AtomicFn<$V>>>> =
                    std::sync::RwLock::new(Vec::new());
                &REGISTRY
            }
        }
    };
}
pub use impl_atomic_registry;

/// Registers `f`, returning the `atom_index` future calls must pass to
/// [crate::ad::call_atomic].
pub fn register<V: Base + AtomicRegistry>(f: Box<dyn AtomicFn<V>>) -> usize {
    let mut reg = V::registry().write().unwrap();
    reg.push(f);
    reg.len() - 1
}

pub(crate) fn forward_zero<V: Base + AtomicRegistry>(atom_index: usize, call_id: usize, x: &[V]) -> Vec<V> {
    let reg = V::registry().read().unwrap();
    reg[atom_index].forward_zero(call_id, x)
}

pub(crate) fn forward_one<V: Base + AtomicRegistry>(
    atom_index: usize,
    call_id: usize,
    x: &[V],
    dx: &[V],
) -> Vec<V> {
    let reg = V::registry().read().unwrap();
    reg[atom_index].forward_one(call_id, x, dx)
}

pub(crate) fn reverse_one<V: Base + AtomicRegistry>(
    atom_index: usize,
    call_id: usize,
    x: &[V],
    dy: &[V],
) -> Vec<V> {
    let reg = V::registry().read().unwrap();
    reg[atom_index].reverse_one(call_id, x, dy)
}

pub(crate) fn name<V: Base + AtomicRegistry>(atom_index: usize) -> String {
    let reg = V::registry().read().unwrap();
    reg[atom_index].name().to_string()
}
