// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Transcendental free functions on `AD<V>`: `sqrt`, `exp`, `log`, `log10`,
//! `expm1`, `log1p`, the trigonometric and hyperbolic families, `erf`/`erfc`,
//! `pow` and `atan2`; see `spec.md` §4.1 and `F.2` (first-class `atan2`/
//! `pow`, `erf`/`erfc`). Every single-result entry dispatches through
//! [crate::ad::unary_record]; `sin`/`cos`, `tan`/`tanh`, `sinh`/`cosh` share a
//! two-slot record via [crate::ad::two_slot_record].
// ---------------------------------------------------------------------------
use crate::ad::{check_same_tape, pool_addr, two_slot_record, unary_record, with_tape, AD};
use crate::ad_type::ADType;
use crate::base::Base;
use crate::op::id;
use crate::tape::{IndexT, ThisThreadTape, Tape};

macro_rules! unary_transcendental {
    ($name:ident, $op_id:path, |$a:ident| $value:expr) => {
        pub fn $name<V: Base + ThisThreadTape>($a: AD<V>) -> AD<V> {
            let value = { let $a = &$a; $value };
            unary_record($a, $op_id, value)
        }
    };
}

unary_transcendental!(sqrt, id::SQRT_OP, |a| a.value.sqrt());
unary_transcendental!(exp, id::EXP_OP, |a| a.value.exp());
unary_transcendental!(expm1, id::EXPM1_OP, |a| a.value.exp_m1());
unary_transcendental!(log, id::LOG_OP, |a| a.value.ln());
unary_transcendental!(log1p, id::LOG1P_OP, |a| a.value.ln_1p());
unary_transcendental!(log10, id::LOG10_OP, |a| a.value.log10());
unary_transcendental!(asin, id::ASIN_OP, |a| a.value.asin());
unary_transcendental!(acos, id::ACOS_OP, |a| a.value.acos());
unary_transcendental!(atan, id::ATAN_OP, |a| a.value.atan());
unary_transcendental!(asinh, id::ASINH_OP, |a| a.value.asinh());
unary_transcendental!(acosh, id::ACOSH_OP, |a| a.value.acosh());
unary_transcendental!(atanh, id::ATANH_OP, |a| a.value.atanh());
unary_transcendental!(erf, id::ERF_OP, |a| a.value.erf());
unary_transcendental!(erfc, id::ERFC_OP, |a| a.value.erfc());

/// `sin(x)`; companion slot holds `cos(x)` so the pair is closed under
/// differentiation (`spec.md` §4.1).
pub fn sin<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let (s, c) = (a.value.sin(), a.value.cos());
    two_slot_record(a, id::SIN_COS_OP, s, c, false)
}
/// `cos(x)`; shares its tape record with [sin] when both are taken of the
/// same operand, since each call independently records a `SinCosOp`.
pub fn cos<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let (s, c) = (a.value.sin(), a.value.cos());
    two_slot_record(a, id::SIN_COS_OP, s, c, true)
}

pub fn tan<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let t = a.value.tan();
    let companion = V::one() + t * t;
    two_slot_record(a, id::TAN_TANH_OP, t, companion, false)
}

pub fn tanh<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let t = a.value.tanh();
    let companion = V::one() - t * t;
    two_slot_record(a, id::TANH_OP, t, companion, false)
}

/// `sinh(x)`; companion slot holds `cosh(x)`.
pub fn sinh<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let (s, c) = (a.value.sinh(), a.value.cosh());
    two_slot_record(a, id::SINH_COSH_OP, s, c, false)
}
pub fn cosh<V: Base + ThisThreadTape>(a: AD<V>) -> AD<V> {
    let (s, c) = (a.value.sinh(), a.value.cosh());
    two_slot_record(a, id::SINH_COSH_OP, s, c, true)
}

fn active_tape_id<V: Base>(a: &AD<V>, b: &AD<V>) -> usize {
    if a.is_variable() {
        a.tape_id
    } else if b.is_variable() {
        b.tape_id
    } else if a.is_dynamic() {
        a.tape_id
    } else if b.is_dynamic() {
        b.tape_id
    } else {
        crate::error::unknown("ad::transcend: no variable/dynamic operand to locate the active tape");
        0
    }
}

fn require_recording<V: Base>(tape: &Tape<V>, tape_id: usize) {
    if !tape.recording || tape.tape_id != tape_id {
        crate::error::known("AD operator: no matching tape is currently recording");
    }
}

/// Shared skeleton for `pow`/`atan2`: neither is symmetric under operand
/// swap, so all three opcode forms (`vv`/`pv`/`vp`) are kept (`spec.md`
/// §4.1).
fn binary_transcend<V>(a: AD<V>, b: AD<V>, value: V, vv_op: id::OpId, pv_op: id::OpId, vp_op: id::OpId) -> AD<V>
where
    V: Base + ThisThreadTape,
{
    if a.is_constant() && b.is_constant() {
        return AD::constant(value);
    }
    check_same_tape(&a, &b);
    let tape_id = active_tape_id(&a, &b);
    with_tape::<V, _>(|tape| {
        require_recording(tape, tape_id);
        if a.is_variable() || b.is_variable() {
            let addr = if a.is_variable() && b.is_variable() {
                tape.var.put_op(vv_op, &[a.index as IndexT, b.index as IndexT], 1)
            } else if a.is_variable() {
                let right = pool_addr(&b, tape);
                tape.var.put_op(vp_op, &[a.index as IndexT, right], 1)
            } else {
                let left = pool_addr(&a, tape);
                tape.var.put_op(pv_op, &[left, b.index as IndexT], 1)
            };
            AD::new(tape_id, addr as usize, ADType::Variable, value)
        } else {
            let left = pool_addr(&a, tape);
            let right = pool_addr(&b, tape);
            let op_id = if a.is_dynamic() && b.is_dynamic() {
                vv_op
            } else if a.is_dynamic() {
                vp_op
            } else {
                pv_op
            };
            let addr = tape.put_dyn(op_id, &[left, right], value);
            AD::new(tape_id, addr as usize, ADType::DynamicP, value)
        }
    })
}

pub fn pow<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value.powf(&b.value);
    binary_transcend(a, b, value, id::POW_VV_OP, id::POW_PV_OP, id::POW_VP_OP)
}

pub fn atan2<V: Base + ThisThreadTape>(a: AD<V>, b: AD<V>) -> AD<V> {
    let value = a.value.atan2(&b.value);
    binary_transcend(a, b, value, id::ATAN2_VV_OP, id::ATAN2_PV_OP, id::ATAN2_VP_OP)
}

#[cfg(test)]
mod tests {
    use crate::float::AzFloat;
    use crate::impl_this_thread_tape;
    use crate::tape::{abort_recording, start_recording, stop_recording};

    impl_this_thread_tape!(AzFloat<f64>);

    #[test]
    fn sin_and_cos_of_same_variable_each_record() {
        let x = start_recording(vec![AzFloat(0.5_f64)]);
        let s = super::sin(x[0]);
        let c = super::cos(x[0]);
        let f = stop_recording(vec![s, c]);
        assert_eq!(f.size_op(), 2);
        assert!((s.value.0 - 0.5_f64.sin()).abs() < 1e-12);
        assert!((c.value.0 - 0.5_f64.cos()).abs() < 1e-12);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn pow_of_two_variables_emits_one_op() {
        let x = start_recording(vec![AzFloat(2.0_f64), AzFloat(3.0_f64)]);
        let y = super::pow(x[0], x[1]);
        let f = stop_recording(vec![y]);
        assert_eq!(f.size_op(), 1);
        assert_eq!(y.value.0, 8.0);
        abort_recording::<AzFloat<f64>>();
    }

    #[test]
    fn atan2_of_constants_folds() {
        use crate::ad::AD;
        let y = super::atan2(AD::constant(AzFloat(1.0_f64)), AD::constant(AzFloat(1.0_f64)));
        assert!(y.is_constant());
    }
}
