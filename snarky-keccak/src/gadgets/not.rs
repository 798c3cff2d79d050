//! Bitwise negation of a field-encoded value.

use crate::{
    gadgets::{check_constant_fits, xor, DEFAULT_NIBBLE_WIDTH},
    snarky::{errors::SnarkyCompilationError, prelude::*},
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, BitwiseOps, FieldHelpers};
use num_bigint::BigUint;

/// Negates the `length` low bits of `a`.
///
/// The checked version goes through [xor] with `2^length - 1`, which also constrains `a` to `length` bits.
/// The unchecked version is the linear combination `2^length - 1 - a`, without any row,
/// and is only correct if `a` is already known to fit in `length` bits.
pub fn not<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    a: &FieldVar<F>,
    length: usize,
    checked: bool,
) -> SnarkyResult<FieldVar<F>> {
    // 2^length - 1 must be a field element
    let max = F::size_in_bits() - 1;
    if length == 0 || length > max {
        return Err(SnarkyCompilationError::InvalidBitLength(length, max).into());
    }

    let all_ones = F::from(BigUint::two_pow(length) - 1u32);

    if let Some(a) = a.to_constant() {
        check_constant_fits(a, length)?;
        let negated = BigUint::bitwise_not(&a.to_biguint(), Some(length));
        return Ok(FieldVar::constant(F::from(negated)));
    }

    if checked {
        let all_ones = FieldVar::constant(all_ones);
        xor(sys, loc, a, &all_ones, length, DEFAULT_NIBBLE_WIDTH)
    } else {
        Ok(FieldVar::constant(all_ones) - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{circuits::gate::GateType, field::Fp, snarky::runner::Mode};

    #[test]
    fn test_not() {
        for checked in [true, false] {
            let mut sys = RunState::<Fp>::new(0, 0, Mode::Witnessing);
            sys.eval_constraints = true;
            let a: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(0x0f0fu64)).unwrap();
            let out = not(&mut sys, &loc!(), &a, 16, checked).unwrap();
            assert_eq!(sys.read_var(&out), Fp::from(0xf0f0u64));

            let gates = sys.system.finalize_and_get_gates();
            let has_xor = gates.iter().any(|g| g.typ == GateType::Xor16);
            assert_eq!(has_xor, checked);
        }
    }

    #[test]
    fn test_not_64_bits() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Witnessing);
        let a: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(0u64)).unwrap();
        let out = not(&mut sys, &loc!(), &a, 64, false).unwrap();
        assert_eq!(sys.read_var(&out), Fp::from(u64::MAX));
        assert_eq!(sys.system.num_rows(), 0);
    }

    #[test]
    fn test_not_lengths() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        let a = FieldVar::constant(Fp::from(0u64));
        assert!(not(&mut sys, &loc!(), &a, 0, true).is_err());
        assert!(not(&mut sys, &loc!(), &a, 255, true).is_err());
        assert_eq!(
            not(&mut sys, &loc!(), &a, 254, true).unwrap(),
            FieldVar::constant(Fp::from(BigUint::two_pow(254) - 1u32))
        );

        let a = FieldVar::constant(Fp::from(0x0fu64));
        assert_eq!(
            not(&mut sys, &loc!(), &a, 8, false).unwrap(),
            FieldVar::constant(Fp::from(0xf0u64))
        );
        assert!(not(&mut sys, &loc!(), &a, 3, false).is_err());
        assert_eq!(sys.system.num_rows(), 0);
    }
}
