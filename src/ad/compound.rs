// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `+= -= *= /=` on `AD<V>`; thin wrappers over [crate::ad::binary] since
//! `AD<V>` is `Copy` and every compound assignment is just `*self = *self
//! op other` (`spec.md` §4.4).
// ---------------------------------------------------------------------------
use crate::ad::AD;
use crate::base::Base;
use crate::tape::ThisThreadTape;

macro_rules! impl_ad_op_assign {
    ($trait:ident, $method:ident, $func:path) => {
        impl<V: Base + ThisThreadTape> std::ops::$trait for AD<V> {
            fn $method(&mut self, other: AD<V>) {
                *self = $func(*self, other);
            }
        }
        impl<V: Base + ThisThreadTape> std::ops::$trait<V> for AD<V> {
            fn $method(&mut self, other: V) {
                *self = $func(*self, AD::constant(other));
            }
        }
    };
}
impl_ad_op_assign!(AddAssign, add_assign, crate::ad::binary::add);
impl_ad_op_assign!(SubAssign, sub_assign, crate::ad::binary::sub);
impl_ad_op_assign!(MulAssign, mul_assign, crate::ad::binary::mul);
impl_ad_op_assign!(DivAssign, div_assign, crate::ad::binary::div);

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn add_assign_of_two_variables() {
        let x = start_recording(vec![AzFloat(1.0_f64), AzFloat(2.0)]);
        let mut y = x[0];
        y += x[1];
        assert_eq!(y.value.0, 3.0);
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 1);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn mul_assign_by_base_constant() {
        let x = start_recording(vec![AzFloat(2.0_f64)]);
        let mut y = x[0];
        y *= AzFloat(3.0_f64);
        assert_eq!(y.value.0, 6.0);
        let _ = stop_recording(vec![y]);
        abort_recording::<AzFloat<f64>>();
    }
}
