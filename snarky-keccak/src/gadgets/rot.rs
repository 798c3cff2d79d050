//! Rotations and shifts of 64-bit words.
//!
//! A left rotation by `r` bits splits `word * 2^r` into its low 64 bits (`shifted`)
//! and the overflowing bits (`excess`):
//!
//! ```text
//! word * 2^r = excess * 2^64 + shifted
//! rotated    = shifted + excess
//! ```
//!
//! A `Rot64` row holds this relation, along with the decomposition of `excess - 2^r + 2^64`
//! that bounds `excess` below `2^r`. The two following `RangeCheck0` rows bound `shifted` and `excess`.

use crate::{
    gadgets::{check_constant_fits, range_check::decompose64, range_check64},
    snarky::{
        constraint_system::KimchiConstraint, errors::SnarkyCompilationError, prelude::*,
        runner::Constraint,
    },
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, FieldHelpers};
use num_bigint::BigUint;

/// The direction of a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotMode {
    Left,
    Right,
}

/// The three words produced by a rotation.
struct Rotation<F: PrimeField> {
    rotated: FieldVar<F>,
    excess: FieldVar<F>,
    shifted: FieldVar<F>,
}

/// Splits `word * 2^rot` into `(rotated, excess, shifted)`.
fn rotation_values(word: &BigUint, rot: usize) -> [BigUint; 3] {
    let big = word << rot;
    let excess = &big >> 64;
    let shifted = big.bits_between(0, 64);
    [&shifted + &excess, excess, shifted]
}

fn rot64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    word: &FieldVar<F>,
    bits: u32,
    mode: RotMode,
) -> SnarkyResult<Rotation<F>> {
    if bits > 64 {
        return Err(SnarkyCompilationError::RotationTooLarge(bits).into());
    }
    let rot = match mode {
        RotMode::Left => bits as usize,
        RotMode::Right => 64 - bits as usize,
    };

    if let Some(word) = word.to_constant() {
        check_constant_fits(word, 64)?;
        let [rotated, excess, shifted] =
            rotation_values(&word.to_biguint(), rot).map(|x| FieldVar::constant(F::from(x)));
        return Ok(Rotation {
            rotated,
            excess,
            shifted,
        });
    }

    let word = word.seal(sys, loc)?;
    let [rotated, excess, shifted]: [FieldVar<F>; 3] = sys.compute(loc, |env| {
        let word = env.read_var(&word).to_biguint();
        rotation_values(&word, rot).map(F::from)
    })?;

    // excess < 2^rot
    let two_to_rot = F::from(BigUint::two_pow(rot));
    let two_to_64 = F::from(BigUint::two_pow(64));
    let bound = &excess + &FieldVar::constant(two_to_64 - two_to_rot);
    let (bound_limbs, bound_crumbs) = decompose64(sys, loc, &bound)?;

    let constraint = KimchiConstraint::Rot64 {
        word,
        rotated: rotated.clone(),
        excess: excess.clone(),
        shifted: shifted.clone(),
        bound_limbs,
        bound_crumbs,
        two_to_rot,
    };
    sys.add_constraint(Constraint::KimchiConstraint(constraint), Some("rot64"), loc)?;

    // the shifted word is in the row following the rotation
    range_check64(sys, loc, &shifted)?;
    range_check64(sys, loc, &excess)?;

    Ok(Rotation {
        rotated,
        excess,
        shifted,
    })
}

/// Rotates a 64-bit word by `bits` bits, with `bits <= 64`.
pub fn rotate<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    word: &FieldVar<F>,
    bits: u32,
    mode: RotMode,
) -> SnarkyResult<FieldVar<F>> {
    Ok(rot64(sys, loc, word, bits, mode)?.rotated)
}

/// Shifts a 64-bit word left by `bits` bits, dropping the bits above 64.
pub fn left_shift64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    word: &FieldVar<F>,
    bits: u32,
) -> SnarkyResult<FieldVar<F>> {
    Ok(rot64(sys, loc, word, bits, RotMode::Left)?.shifted)
}

/// Shifts a 64-bit word right by `bits` bits.
pub fn right_shift64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    word: &FieldVar<F>,
    bits: u32,
) -> SnarkyResult<FieldVar<F>> {
    Ok(rot64(sys, loc, word, bits, RotMode::Right)?.excess)
}
