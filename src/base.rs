// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The `Base` trait bounds the scalar type that `AD<V>` wraps.
//!
//! `Base` is generic over what the teacher repo calls "the value type":
//! everything in this crate is written once, against this trait, and is
//! monomorphized per concrete `Base`. Composition `AD<AD<Base>>` works for
//! any `Base` whose `AD<Base>` also satisfies `Base` (it does, mechanically,
//! since `AD<V>` is `Copy` whenever `V` is).
// ---------------------------------------------------------------------------

/// Arithmetic, transcendental, comparison and predicate surface required of
/// a tape's value type; see `spec.md` §3 "Base type (external)".
pub trait Base:
    Copy
    + Clone
    + std::fmt::Display
    + std::fmt::Debug
    + PartialEq
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
    + From<f64>
    + crate::hash::TypeHash
    + 'static
{
    /// `value == 0` under `Base`'s own notion of equality.
    fn identical_zero(&self) -> bool;
    /// `value == 1` under `Base`'s own notion of equality.
    fn identical_one(&self) -> bool;
    /// `value < 0`.
    fn less_than_zero(&self) -> bool;
    /// `value` represents a mathematical integer.
    fn is_integer_valued(&self) -> bool;
    /// Lossy projection used only for diagnostics and seed-scenario tests.
    fn to_f64(&self) -> f64;
    fn nan() -> Self;
    fn is_nan(&self) -> bool;
    fn zero() -> Self {
        Self::from(0.0)
    }
    fn one() -> Self {
        Self::from(1.0)
    }
    fn from_i64(value: i64) -> Self {
        Self::from(value as f64)
    }

    fn sqrt(&self) -> Self;
    fn exp(&self) -> Self;
    fn ln(&self) -> Self;
    fn log10(&self) -> Self;
    fn exp_m1(&self) -> Self;
    fn ln_1p(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn tan(&self) -> Self;
    fn sinh(&self) -> Self;
    fn cosh(&self) -> Self;
    fn tanh(&self) -> Self;
    fn asin(&self) -> Self;
    fn acos(&self) -> Self;
    fn atan(&self) -> Self;
    fn asinh(&self) -> Self;
    fn acosh(&self) -> Self;
    fn atanh(&self) -> Self;
    fn erf(&self) -> Self;
    fn erfc(&self) -> Self;
    fn abs_value(&self) -> Self;
    /// -1, 0 or 1 depending on the sign; matches CppAD's `sign()`.
    fn sign_value(&self) -> Self;
    fn powf(&self, exponent: &Self) -> Self;
    fn atan2(&self, other: &Self) -> Self;
}
