// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Instantiates the per-`V` sealed-trait statics (`tape::ThisThreadTape`,
//! `op::info::GlobalOpInfoVec`, `atom::AtomicRegistry`) for every shipped
//! [crate::base::Base] implementation, so a caller can `use_recording`
//! against [crate::float::AzFloat] without wiring those macros itself.
//!
//! Every module's own test suite invokes the same three macros locally for
//! whatever scalar type that test needs (see e.g. `adfn::graph`'s test
//! module); this file is what makes the crate-level doctests in `lib.rs`
//! and any downstream user of `AzFloat<f32>`/`AzFloat<f64>` work without
//! repeating that boilerplate. `Base` has no direct implementation for the
//! bare primitives `f32`/`f64` (only for `AzFloat<f32>`/`AzFloat<f64>`), so
//! those are the only two instantiations here.
// ---------------------------------------------------------------------------
use crate::atom::impl_atomic_registry;
use crate::float::AzFloat;
use crate::op::info::impl_global_op_info_vec;
use crate::tape::impl_this_thread_tape;

impl_this_thread_tape!(AzFloat<f32>);
impl_this_thread_tape!(AzFloat<f64>);

impl_global_op_info_vec!(AzFloat<f32>);
impl_global_op_info_vec!(AzFloat<f64>);

impl_atomic_registry!(AzFloat<f32>);
impl_atomic_registry!(AzFloat<f64>);

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    #[test]
    fn azfloat_f64_is_wired_without_any_local_macro_invocation() {
        let x = start_recording(vec![AzFloat(2.0_f64)]);
        let y = crate::ad::transcend::sqrt(x[0]);
        let mut f = stop_recording(vec![y]);
        let y0 = f.forward(0, vec![AzFloat(2.0_f64)]);
        assert!((y0[0].0 - 2.0_f64.sqrt()).abs() < 1e-12);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn azfloat_f32_is_wired_without_any_local_macro_invocation() {
        let x = start_recording(vec![AzFloat(2.0_f32)]);
        let y = crate::ad::transcend::sqrt(x[0]);
        let mut f = stop_recording(vec![y]);
        let y0 = f.forward(0, vec![AzFloat(2.0_f32)]);
        assert!((y0[0].0 - 2.0_f32.sqrt()).abs() < 1e-6);
        abort_recording::<AzFloat<f32>>();
    }
}
