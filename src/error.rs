// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! A process-wide, swappable error handler; see `spec.md` §6 "Errors" and
//! §7 "Error handling design".
//!
//! The CppAD original routes every user-visible error through a pluggable
//! `ErrorHandler` callback that, by default, prints a message and aborts.
//! This module is that callback, generalized to a `Box<dyn Fn>` behind a
//! `RwLock` so an embedder can install their own handler (to log, or to
//! convert into a `Result` at their own boundary) instead of the default
//! panic. Internal invariant violations (`unknown`) are always bugs in this
//! crate, never in caller input; `known` covers every precondition a caller
//! can violate (tape-state, tape-identity, order-mismatch, dimension
//! mismatch, parameter-only).
// ---------------------------------------------------------------------------
use std::sync::RwLock;

/// Whether an error is a documented precondition violation (`Known`, e.g.
/// `Value(x)` on a variable) or an internal invariant violation
/// (`Unknown`, e.g. a corrupted tape); see `spec.md` §7.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Known,
    Unknown,
}

/// `(kind, message)`; a future extension point for `(line, file,
/// expression)` as in `spec.md` §6 is deliberately not modeled here since
/// `panic!`'s own location capture already supplies it to the default
/// handler.
pub type Handler = dyn Fn(Kind, &str) + Send + Sync;

static HANDLER: RwLock<Option<Box<Handler>>> = RwLock::new(None);

fn default_handler(kind: Kind, message: &str) {
    match kind {
        Kind::Known => panic!("tapead error: {message}"),
        Kind::Unknown => panic!("tapead internal error: {message}"),
    }
}

/// Installs a replacement error handler, process-wide. Intended for
/// embedders that want to log and convert to a `Result` at their own API
/// boundary instead of unwinding through this crate.
pub fn install_handler(handler: Box<Handler>) {
    *HANDLER.write().unwrap() = Some(handler);
}

/// Restores the default (panicking) handler.
pub fn reset_handler() {
    *HANDLER.write().unwrap() = None;
}

fn dispatch(kind: Kind, message: &str) {
    let guard = HANDLER.read().unwrap();
    match guard.as_ref() {
        Some(handler) => handler(kind, message),
        None => default_handler(kind, message),
    }
}

/// Reports a documented precondition violation: tape-state, tape-identity,
/// parameter-only, order-mismatch, or dimension-mismatch (`spec.md` §7).
#[track_caller]
pub fn known(message: &str) {
    dispatch(Kind::Known, message);
}

/// Reports an internal invariant violation: a bug in this crate rather than
/// caller misuse (`spec.md` §7, "Internal").
#[track_caller]
pub fn unknown(message: &str) {
    dispatch(Kind::Unknown, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    // error handler is process-global; serialize the tests that touch it.
    static LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn custom_handler_replaces_panic() {
        let _guard = LOCK.lock().unwrap();
        static CALLED: AtomicBool = AtomicBool::new(false);
        install_handler(Box::new(|kind, _msg| {
            assert_eq!(kind, Kind::Known);
            CALLED.store(true, Ordering::SeqCst);
        }));
        known("example");
        assert!(CALLED.load(Ordering::SeqCst));
        reset_handler();
    }

    #[test]
    #[should_panic(expected = "tapead error")]
    fn default_handler_panics() {
        let _guard = LOCK.lock().unwrap();
        reset_handler();
        known("example");
    }
}
