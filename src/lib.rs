// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `tapead`: algorithmic (operator-overloading) differentiation of numerical
//! programs over a user-chosen scalar base type; see `spec.md` §1.
//!
//! A program written against [`ad::AD<V>`] instead of `V` silently records
//! every arithmetic/transcendental operation onto a per-thread tape
//! ([`tape`]). [`tape::stop_recording`] seals that tape into an [`adfn::ADfn`],
//! which can then be replayed forward (Taylor coefficients, [`adfn::forward`])
//! or backward (adjoints, [`adfn::reverse`]), queried for sparsity patterns
//! ([`adfn::sparsity`]), simplified ([`adfn::optimize`]), or persisted as text
//! ([`adfn::graph`]).
//!
//! ```
//! use tapead::float::AzFloat;
//! use tapead::tape::{start_recording, stop_recording};
//!
//! let x = start_recording(vec![AzFloat(0.5_f64)]);
//! let y = tapead::ad::transcend::exp(x[0]);
//! let mut f = stop_recording(vec![y]);
//!
//! let y0 = f.forward(0, vec![AzFloat(0.5_f64)]);
//! assert!((y0[0].0 - 0.5_f64.exp()).abs() < 1e-10);
//! ```
// ---------------------------------------------------------------------------
pub mod ad;
pub mod ad_type;
pub mod adfn;
pub mod atom;
pub mod base;
pub mod checkpoint;
pub mod error;
pub mod float;
pub mod hash;
pub mod op;
pub mod parallel;
pub mod setup;
pub mod sparse;
pub mod tape;

pub use ad::AD;
pub use adfn::ADfn;

/// The date corresponding to this version of the software as `year.month.day`.
///
/// # Example
/// ```
/// let version = tapead::YEAR_MONTH_DAY;
/// assert_eq!(version, "2026.7.29");
/// ```
pub const YEAR_MONTH_DAY: &str = "2026.7.29";
