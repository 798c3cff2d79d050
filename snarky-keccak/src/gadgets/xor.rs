//! XOR of two field-encoded values of up to 255 bits.
//!
//! The values are split into groups of four nibbles.
//! Each group gets one `Xor16` row, which looks the nibbles up in the XOR table
//! and links every operand to the remainder stored in the following row:
//!
//! ```text
//! in1 = in1_nibble0 + in1_nibble1 * 2^w + in1_nibble2 * 2^(2w) + in1_nibble3 * 2^(3w) + in1_next * 2^(4w)
//! ```
//!
//! The chain ends with a `Zero` row holding the last remainders, which are asserted to be zero.

use crate::{
    circuits::asm::pretty,
    gadgets::{check_bit_length, check_constant_fits, constants},
    snarky::{
        constraint_system::KimchiConstraint,
        errors::{SnarkyCompilationError, SnarkyRuntimeError},
        prelude::*,
        runner::Constraint,
    },
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, BitwiseOps, FieldHelpers};
use num_bigint::BigUint;
use num_integer::Integer;
use std::array;

/// The width of a nibble, in bits, used by the Keccak gadgets.
pub const DEFAULT_NIBBLE_WIDTH: usize = 4;

/// Returns a new variable holding the XOR of the `length` low bits of `a` and `b`.
///
/// The operands are expected to fit in `length` bits.
/// This is only verified when generating the witness:
/// the circuit itself constrains them to the next multiple of `4 * nibble_width` bits.
pub fn xor<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    a: &FieldVar<F>,
    b: &FieldVar<F>,
    length: usize,
    nibble_width: usize,
) -> SnarkyResult<FieldVar<F>> {
    check_bit_length::<F>(length)?;
    if nibble_width == 0 {
        return Err(SnarkyCompilationError::ZeroNibbleWidth.into());
    }

    let group_width = 4 * nibble_width;
    let pad_length = Integer::div_ceil(&length, &group_width) * group_width;

    if let Some((a, b)) = constants(a, b) {
        check_constant_fits(a, length)?;
        check_constant_fits(b, length)?;
        let out = BigUint::bitwise_xor(&a.to_biguint(), &b.to_biguint());
        return Ok(FieldVar::constant(F::from(out)));
    }

    let in1 = a.seal(sys, loc)?;
    let in2 = b.seal(sys, loc)?;
    let out: FieldVar<F> = sys.compute(loc, |env| {
        let a = env.read_var(&in1).to_biguint();
        let b = env.read_var(&in2).to_biguint();
        F::from(BigUint::bitwise_xor(&a, &b))
    })?;

    sys.as_prover("xor", loc, |env| {
        for input in [&in1, &in2] {
            let value = env.read_var(input);
            if value.to_biguint().bitlen() > length {
                return Err(SnarkyRuntimeError::ValueTooLarge(pretty(value), length));
            }
        }
        Ok(())
    })?;

    xor_chain(sys, loc, [in1, in2, out.clone()], pad_length, nibble_width)?;

    Ok(out)
}

/// Emits the rows constraining `out = in1 ^ in2` over `pad_length` bits.
/// The three operands must be plain variables.
pub(crate) fn xor_chain<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    operands: [FieldVar<F>; 3],
    pad_length: usize,
    nibble_width: usize,
) -> SnarkyResult<()> {
    let group_width = 4 * nibble_width;

    let mut current = operands;
    for _ in 0..pad_length / group_width {
        let nibbles: [FieldVar<F>; 12] = sys.compute(loc, |env| {
            let values = [&current[0], &current[1], &current[2]].map(|x| env.read_var(x).to_biguint());
            array::from_fn(|i| {
                let (operand, k) = (i / 4, i % 4);
                let nibble =
                    values[operand].bits_between(k * nibble_width, (k + 1) * nibble_width);
                F::from(nibble)
            })
        })?;

        let next: [FieldVar<F>; 3] = sys.compute(loc, |env| {
            [&current[0], &current[1], &current[2]]
                .map(|x| F::from(env.read_var(x).to_biguint() >> group_width))
        })?;

        let [in1, in2, out] = current;
        let constraint = KimchiConstraint::Xor {
            in1,
            in2,
            out,
            in1_nibbles: array::from_fn(|k| nibbles[k].clone()),
            in2_nibbles: array::from_fn(|k| nibbles[4 + k].clone()),
            out_nibbles: array::from_fn(|k| nibbles[8 + k].clone()),
            next: next.clone(),
            nibble_width,
        };
        sys.add_constraint(Constraint::KimchiConstraint(constraint), Some("xor"), loc)?;

        current = next;
    }

    sys.add_constraint(
        Constraint::KimchiConstraint(KimchiConstraint::Zero(current.clone())),
        Some("xor end"),
        loc,
    )?;
    for remainder in current {
        sys.assert_eq(Some("xor remainder"), loc, remainder, FieldVar::zero())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        circuits::gate::GateType,
        field::Fp,
        snarky::{errors::SnarkyError, runner::Mode},
    };
    use proptest::prelude::*;

    fn witnessing() -> RunState<Fp> {
        let mut sys = RunState::new(0, 0, Mode::Witnessing);
        sys.eval_constraints = true;
        sys
    }

    fn xor_values(a: &BigUint, b: &BigUint, length: usize, nibble_width: usize) -> BigUint {
        let mut sys = witnessing();
        let a: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(a.clone())).unwrap();
        let b: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(b.clone())).unwrap();
        let out = xor(&mut sys, &loc!(), &a, &b, length, nibble_width).unwrap();
        sys.read_var(&out).to_biguint()
    }

    #[test]
    fn test_xor_rows() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        let a: FieldVar<Fp> = sys.compute(&loc!(), |_| unreachable!()).unwrap();
        let b: FieldVar<Fp> = sys.compute(&loc!(), |_| unreachable!()).unwrap();
        xor(&mut sys, &loc!(), &a, &b, 64, DEFAULT_NIBBLE_WIDTH).unwrap();

        let gates = sys.system.finalize_and_get_gates();
        let types: Vec<_> = gates.iter().map(|g| g.typ).collect();
        // four groups of 16 bits, the end of the chain, and the three remainders
        let mut expected = vec![GateType::Xor16; 4];
        expected.push(GateType::Zero);
        expected.extend([GateType::Generic; 3]);
        assert_eq!(types, expected);
    }

    #[test]
    fn test_xor_pads_length() {
        let a = BigUint::from(0b1011u8);
        let b = BigUint::from(0b0110u8);
        assert_eq!(xor_values(&a, &b, 4, 4), BigUint::from(0b1101u8));
        assert_eq!(xor_values(&a, &b, 4, 1), BigUint::from(0b1101u8));

        let a = BigUint::from(u64::MAX) << 190;
        let b = BigUint::from(0xf0f0u32);
        assert_eq!(xor_values(&a, &b, 254, 4), &a ^ &b);
    }

    #[test]
    fn test_xor_constants() {
        let mut sys = witnessing();
        let a = FieldVar::constant(Fp::from(0b1100u64));
        let b = FieldVar::constant(Fp::from(0b1010u64));
        let out = xor(&mut sys, &loc!(), &a, &b, 4, DEFAULT_NIBBLE_WIDTH).unwrap();
        assert_eq!(out, FieldVar::constant(Fp::from(0b0110u64)));
        assert_eq!(sys.system.num_rows(), 0);
    }

    #[test]
    fn test_constant_operands_are_bounded_by_length() {
        // the same bound as the prover check on variables
        let mut sys = witnessing();
        let a = FieldVar::constant(Fp::from(0x1ffu64));
        let b = FieldVar::constant(Fp::from(1u64));
        let err = xor(&mut sys, &loc!(), &a, &b, 8, DEFAULT_NIBBLE_WIDTH).unwrap_err();
        assert!(matches!(
            err,
            SnarkyError::CompilationError(SnarkyCompilationError::ConstantOutOfRange(ref value, 8))
                if value == "511"
        ));
        let out = xor(&mut sys, &loc!(), &a, &b, 9, DEFAULT_NIBBLE_WIDTH).unwrap();
        assert_eq!(out, FieldVar::constant(Fp::from(0x1feu64)));
    }

    #[test]
    fn test_xor_invalid_parameters() {
        let mut sys = witnessing();
        let a = FieldVar::constant(Fp::from(1u64));
        let err = xor(&mut sys, &loc!(), &a, &a, 0, 4).unwrap_err();
        assert!(matches!(
            err,
            SnarkyError::CompilationError(SnarkyCompilationError::InvalidBitLength(0, 255))
        ));
        let err = xor(&mut sys, &loc!(), &a, &a, 256, 4).unwrap_err();
        assert!(matches!(
            err,
            SnarkyError::CompilationError(SnarkyCompilationError::InvalidBitLength(256, 255))
        ));
        let err = xor(&mut sys, &loc!(), &a, &a, 8, 0).unwrap_err();
        assert!(matches!(
            err,
            SnarkyError::CompilationError(SnarkyCompilationError::ZeroNibbleWidth)
        ));
    }

    #[test]
    fn test_xor_operands_too_large() {
        let mut sys = witnessing();
        let a: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(0x1ffu64)).unwrap();
        let b: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(1u64)).unwrap();
        let err = xor(&mut sys, &loc!(), &a, &b, 8, DEFAULT_NIBBLE_WIDTH).unwrap_err();
        match err {
            SnarkyError::RuntimeError { error, label, .. } => {
                assert_eq!(label, "xor");
                assert_eq!(error, SnarkyRuntimeError::ValueTooLarge("511".into(), 8));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_tampered_output_is_rejected() {
        let mut sys = witnessing();
        let a: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(0xabcdu64)).unwrap();
        let b: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(0x1234u64)).unwrap();
        let wrong: FieldVar<Fp> = sys
            .compute(&loc!(), |_| Fp::from((0xabcdu64 ^ 0x1234) + 1))
            .unwrap();
        let err = xor_chain(&mut sys, &loc!(), [a, b, wrong], 16, DEFAULT_NIBBLE_WIDTH)
            .unwrap_err();
        assert!(matches!(
            err.runtime_error(),
            Some(SnarkyRuntimeError::LookupMiss(..))
        ));
    }

    proptest! {
        #[test]
        fn test_xor_matches_bitwise_xor(a: u64, b: u64) {
            let out = xor_values(&BigUint::from(a), &BigUint::from(b), 64, DEFAULT_NIBBLE_WIDTH);
            prop_assert_eq!(out, BigUint::from(a ^ b));
        }

        #[test]
        fn test_xor_identities(a: u64, b: u64, length in 1usize..=64) {
            let mask = if length == 64 { u64::MAX } else { (1u64 << length) - 1 };
            let (a, b) = (BigUint::from(a & mask), BigUint::from(b & mask));
            prop_assert_eq!(xor_values(&a, &BigUint::from(0u8), length, DEFAULT_NIBBLE_WIDTH), a.clone());
            let ab = xor_values(&a, &b, length, DEFAULT_NIBBLE_WIDTH);
            prop_assert_eq!(xor_values(&ab, &b, length, DEFAULT_NIBBLE_WIDTH), a);
        }
    }
}
