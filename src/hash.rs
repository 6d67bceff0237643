// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub(crate) module defines the hashing used by the common
//! sub-expression elimination pass in `adfn::optimize`.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
// TypeHash
/// Computes a stable hash for a value type using `rustc_hash::FxHasher`.
pub trait TypeHash {
    fn type_hash(&self) -> u64;
}
//
// impl_float_type_hash
/// Implement [TypeHash] for a primitive float `$F` via `ordered_float`,
/// which gives floats a total order/hash so `NaN`-free constants can be
/// deduplicated during CSE.
macro_rules! impl_float_type_hash {
    ($F:ident) => {
        impl crate::hash::TypeHash for $F {
            fn type_hash(&self) -> u64 {
                use std::hash::{Hash, Hasher};
                let mut state = rustc_hash::FxHasher::default();
                ordered_float::OrderedFloat(*self).hash(&mut state);
                state.finish()
            }
        }
    };
}
impl_float_type_hash!(f32);
impl_float_type_hash!(f64);
