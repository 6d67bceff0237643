// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `AzFloat<B>` ("absolute zero float") is the shipped `Base` implementation
//! for `B = f32` and `B = f64`.
//!
//! Ordinary IEEE multiplication has `0.0 * NaN = NaN`. The forward and
//! reverse sweeps in `adfn::forward`/`adfn::reverse` rely on the convention
//! that a conditional-expression branch that is inactive contributes a
//! Taylor coefficient of exactly zero when multiplied by a zero selector,
//! even if the inactive branch itself produced a `NaN` intermediate (e.g.
//! `1.0 / 0.0` on the untaken branch of `x != 0.0 ? 1.0/x : 0.0`). `AzFloat`
//! overrides `Mul` so that `zero * anything = zero` and `anything * zero =
//! zero`, absorbing a `NaN` factor instead of propagating it. All other
//! operators defer to `B`.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::hash::TypeHash;

/// A floating-point value with absolute-zero multiplication semantics.
#[derive(Clone, Copy, Debug)]
pub struct AzFloat<B>(pub B);

impl<B: std::fmt::Display> std::fmt::Display for AzFloat<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<B: PartialEq> PartialEq for AzFloat<B> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<B: PartialOrd> PartialOrd for AzFloat<B> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<B: std::ops::Add<Output = B>> std::ops::Add for AzFloat<B> {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        AzFloat(self.0 + other.0)
    }
}
impl<B: std::ops::Sub<Output = B>> std::ops::Sub for AzFloat<B> {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        AzFloat(self.0 - other.0)
    }
}
impl<B: std::ops::Neg<Output = B>> std::ops::Neg for AzFloat<B> {
    type Output = Self;
    fn neg(self) -> Self {
        AzFloat(-self.0)
    }
}
impl<B: std::ops::Div<Output = B>> std::ops::Div for AzFloat<B> {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        AzFloat(self.0 / other.0)
    }
}

/// `impl_az_float!(f64)` wires up the primitive-specific pieces: `identical_*`
/// predicates, `Mul` with absolute-zero semantics, and the transcendentals.
macro_rules! impl_az_float {
    ($F:ident) => {
        impl std::ops::Mul for AzFloat<$F> {
            type Output = Self;
            fn mul(self, other: Self) -> Self {
                if self.0 == 0.0 as $F || other.0 == 0.0 as $F {
                    AzFloat(0.0 as $F)
                } else {
                    AzFloat(self.0 * other.0)
                }
            }
        }
        impl From<f64> for AzFloat<$F> {
            fn from(value: f64) -> Self {
                AzFloat(value as $F)
            }
        }
        impl TypeHash for AzFloat<$F> {
            fn type_hash(&self) -> u64 {
                self.0.type_hash()
            }
        }
        impl Base for AzFloat<$F> {
            fn identical_zero(&self) -> bool {
                self.0 == 0.0 as $F
            }
            fn identical_one(&self) -> bool {
                self.0 == 1.0 as $F
            }
            fn less_than_zero(&self) -> bool {
                self.0 < 0.0 as $F
            }
            fn is_integer_valued(&self) -> bool {
                self.0 == self.0.trunc()
            }
            fn to_f64(&self) -> f64 {
                self.0 as f64
            }
            fn nan() -> Self {
                AzFloat(<$F>::NAN)
            }
            fn is_nan(&self) -> bool {
                self.0.is_nan()
            }
            fn sqrt(&self) -> Self {
                AzFloat(self.0.sqrt())
            }
            fn exp(&self) -> Self {
                AzFloat(self.0.exp())
            }
            fn ln(&self) -> Self {
                AzFloat(self.0.ln())
            }
            fn log10(&self) -> Self {
                AzFloat(self.0.log10())
            }
            fn exp_m1(&self) -> Self {
                AzFloat(self.0.exp_m1())
            }
            fn ln_1p(&self) -> Self {
                AzFloat(self.0.ln_1p())
            }
            fn sin(&self) -> Self {
                AzFloat(self.0.sin())
            }
            fn cos(&self) -> Self {
                AzFloat(self.0.cos())
            }
            fn tan(&self) -> Self {
                AzFloat(self.0.tan())
            }
            fn sinh(&self) -> Self {
                AzFloat(self.0.sinh())
            }
            fn cosh(&self) -> Self {
                AzFloat(self.0.cosh())
            }
            fn tanh(&self) -> Self {
                AzFloat(self.0.tanh())
            }
            fn asin(&self) -> Self {
                AzFloat(self.0.asin())
            }
            fn acos(&self) -> Self {
                AzFloat(self.0.acos())
            }
            fn atan(&self) -> Self {
                AzFloat(self.0.atan())
            }
            fn asinh(&self) -> Self {
                AzFloat(self.0.asinh())
            }
            fn acosh(&self) -> Self {
                AzFloat(self.0.acosh())
            }
            fn atanh(&self) -> Self {
                AzFloat(self.0.atanh())
            }
            fn erf(&self) -> Self {
                AzFloat(erf_series(self.0 as f64) as $F)
            }
            fn erfc(&self) -> Self {
                AzFloat((1.0 - erf_series(self.0 as f64)) as $F)
            }
            fn abs_value(&self) -> Self {
                AzFloat(self.0.abs())
            }
            fn sign_value(&self) -> Self {
                if self.0 < 0.0 as $F {
                    AzFloat(-1.0 as $F)
                } else if self.0 > 0.0 as $F {
                    AzFloat(1.0 as $F)
                } else {
                    AzFloat(0.0 as $F)
                }
            }
            fn powf(&self, exponent: &Self) -> Self {
                AzFloat(self.0.powf(exponent.0))
            }
            fn atan2(&self, other: &Self) -> Self {
                AzFloat(self.0.atan2(other.0))
            }
        }
    };
}
impl_az_float!(f32);
impl_az_float!(f64);

/// Abramowitz & Stegun 7.1.26 rational approximation, evaluated in `f64`
/// regardless of `$F` so that `AzFloat<f32>::erf` is not noticeably worse
/// than the built-in `f32` transcendentals above. Accurate to about 1.5e-7.
fn erf_series(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

#[cfg(test)]
mod tests {
    use super::AzFloat;

    #[test]
    fn absolute_zero_absorbs_nan() {
        let zero = AzFloat(0.0_f64);
        let nan = AzFloat(f64::NAN);
        assert_eq!((zero * nan).0, 0.0);
        assert_eq!((nan * zero).0, 0.0);
    }

    #[test]
    fn ordinary_multiply_unaffected() {
        let a = AzFloat(2.0_f64);
        let b = AzFloat(3.0_f64);
        assert_eq!((a * b).0, 6.0);
    }
}
