// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `PripOp`/`PrivOp`; see `spec.md` §4.1 "Print" and §4.3 "`PrintFor`
//! opcodes are recorded unconditionally but carry a suppress-at-replay
//! flag."
//!
//! `args = [before_text_id, value_addr, after_text_id, suppress]`; `Prip`
//! reads `value_addr` from the parameter pool, `Priv` from the variable
//! value space at order zero. Dispatched directly by `adfn::forward`
//! (there is no result slot), which writes to the `std::io::Write` sink
//! configured on the function object (`SPEC_FULL.md` F.1, default
//! stdout) unless `suppress != 0`.
// ---------------------------------------------------------------------------
use crate::base::Base;
use crate::tape::IndexT;

/// Renders a `PripOp`/`PrivOp` record to its printed text, or `None` if the
/// record's suppress flag is set.
pub fn render<V: Base>(
    is_variable: bool,
    args: &[IndexT],
    con: &[V],
    var: &[Vec<V>],
    text: &[String],
) -> Option<String> {
    if args[3] != 0 {
        return None;
    }
    let before = &text[args[0] as usize];
    let after = &text[args[2] as usize];
    let value = if is_variable {
        var[args[1] as usize][0]
    } else {
        con[args[1] as usize]
    };
    Some(format!("{before}{value}{after}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::AzFloat;

    #[test]
    fn renders_value_between_prefix_and_suffix() {
        let text = vec!["x = ".to_string(), "\n".to_string()];
        let con: Vec<AzFloat<f64>> = Vec::new();
        let var = vec![vec![AzFloat(3.5_f64)]];
        let out = render(true, &[0, 0, 1, 0], &con, &var, &text);
        assert_eq!(out.as_deref(), Some("x = 3.5\n"));
    }

    #[test]
    fn suppressed_record_renders_nothing() {
        let text = vec!["x = ".to_string(), "\n".to_string()];
        let con: Vec<AzFloat<f64>> = Vec::new();
        let var = vec![vec![AzFloat(3.5_f64)]];
        assert_eq!(render(true, &[0, 0, 1, 1], &con, &var, &text), None);
    }
}
