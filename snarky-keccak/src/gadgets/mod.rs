//! Bitwise gadgets over field-encoded words.
//!
//! Every gadget takes the [RunState] it builds the circuit with and the
//! location of its caller (see [crate::loc]).
//! Constant inputs are folded without emitting any row.

use crate::{
    circuits::asm::pretty,
    snarky::{errors::SnarkyCompilationError, prelude::*},
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, FieldHelpers};

pub mod and;
pub mod not;
pub mod range_check;
pub mod rot;
pub mod xor;

pub use and::and;
pub use not::not;
pub use range_check::{range_check64, range_check8};
pub use rot::{left_shift64, right_shift64, rotate, RotMode};
pub use xor::{xor, DEFAULT_NIBBLE_WIDTH};

/// Checks that `length` is a usable bit length for a value of the field.
pub(crate) fn check_bit_length<F: PrimeField>(length: usize) -> SnarkyResult<()> {
    let max = F::size_in_bits();
    if length == 0 || length > max {
        return Err(SnarkyCompilationError::InvalidBitLength(length, max).into());
    }
    Ok(())
}

/// Checks that a constant fits in `bits` bits.
pub(crate) fn check_constant_fits<F: PrimeField>(value: F, bits: usize) -> SnarkyResult<()> {
    if value.to_biguint().bitlen() > bits {
        return Err(SnarkyCompilationError::ConstantOutOfRange(pretty(value), bits).into());
    }
    Ok(())
}

/// Returns both values if the two variables are constants.
pub(crate) fn constants<F: PrimeField>(a: &FieldVar<F>, b: &FieldVar<F>) -> Option<(F, F)> {
    a.to_constant().zip(b.to_constant())
}
