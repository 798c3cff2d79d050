//! This module provides a set of functions to perform bit operations on big integers.
//! In particular, it gives XOR, AND and NOT for BigUint.
use num_bigint::BigUint;

/// Bitwise operations
pub trait BitwiseOps<Rhs = Self> {
    /// Bitwise XOR of two BigUint inputs
    fn bitwise_xor(input1: &Rhs, input2: &Rhs) -> Rhs;

    /// Conjunction of the bits of two BigUint inputs
    fn bitwise_and(input1: &Rhs, input2: &Rhs) -> Rhs;

    /// Negation of the bits of a BigUint input.
    /// The input is negated over `bits` bits, or over its own length if it is longer.
    fn bitwise_not(input: &Rhs, bits: Option<usize>) -> Rhs;
}

impl BitwiseOps for BigUint {
    fn bitwise_xor(input1: &BigUint, input2: &BigUint) -> BigUint {
        input1 ^ input2
    }

    fn bitwise_and(input1: &BigUint, input2: &BigUint) -> BigUint {
        input1 & input2
    }

    fn bitwise_not(input: &BigUint, bits: Option<usize>) -> BigUint {
        let len = std::cmp::max(input.bits() as usize, bits.unwrap_or(0));
        all_ones(len) ^ input
    }
}

// Returns 2^len - 1
fn all_ones(len: usize) -> BigUint {
    (BigUint::from(1u8) << len) - BigUint::from(1u8)
}
