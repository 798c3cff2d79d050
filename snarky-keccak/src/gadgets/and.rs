//! Bitwise conjunction of two field-encoded values.

use crate::{
    gadgets::{check_bit_length, check_constant_fits, constants, xor, DEFAULT_NIBBLE_WIDTH},
    snarky::prelude::*,
};
use ark_ff::PrimeField;
use field_utils::{BitwiseOps, FieldHelpers};
use num_bigint::BigUint;

/// Returns a new variable holding the AND of the `length` low bits of `a` and `b`.
///
/// It relies on `a + b = (a ^ b) + 2 * (a & b)`:
/// the XOR goes through [xor], and the relation is one generic row.
pub fn and<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    a: &FieldVar<F>,
    b: &FieldVar<F>,
    length: usize,
) -> SnarkyResult<FieldVar<F>> {
    check_bit_length::<F>(length)?;

    if let Some((a, b)) = constants(a, b) {
        check_constant_fits(a, length)?;
        check_constant_fits(b, length)?;
        let out = BigUint::bitwise_and(&a.to_biguint(), &b.to_biguint());
        return Ok(FieldVar::constant(F::from(out)));
    }

    let a = a.seal(sys, loc)?;
    let b = b.seal(sys, loc)?;

    let and: FieldVar<F> = sys.compute(loc, |env| {
        let a = env.read_var(&a).to_biguint();
        let b = env.read_var(&b).to_biguint();
        F::from(BigUint::bitwise_and(&a, &b))
    })?;

    let xor = xor(sys, loc, &a, &b, length, DEFAULT_NIBBLE_WIDTH)?;

    let sum = &a + &b;
    let expected = &xor + &and.scale(F::from(2u64));
    sys.assert_eq(Some("and"), loc, sum, expected)?;

    Ok(and)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Fp, snarky::runner::Mode};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_and_matches_bitwise_and(a: u64, b: u64) {
            let mut sys = RunState::<Fp>::new(0, 0, Mode::Witnessing);
            sys.eval_constraints = true;
            let x: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(a)).unwrap();
            let y: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(b)).unwrap();
            let out = and(&mut sys, &loc!(), &x, &y, 64).unwrap();
            prop_assert_eq!(sys.read_var(&out), Fp::from(a & b));
        }
    }

    #[test]
    fn test_and_constants() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        let a = FieldVar::constant(Fp::from(0b1100u64));
        let b = FieldVar::constant(Fp::from(0b1010u64));
        let out = and(&mut sys, &loc!(), &a, &b, 4).unwrap();
        assert_eq!(out, FieldVar::constant(Fp::from(0b1000u64)));
        assert!(and(&mut sys, &loc!(), &a, &b, 3).is_err());
    }
}
