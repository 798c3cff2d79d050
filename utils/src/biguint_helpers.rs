//! Bit-level accessors on BigUint used to slice witness values into limbs.
use num_bigint::BigUint;

/// Helpers for BigUint
pub trait BigUintHelpers<Rhs = Self> {
    /// Returns the minimum number of bits required to represent a BigUint
    /// As opposed to BigUint::bits, this function returns 1 for the input zero
    fn bitlen(&self) -> usize;

    /// Returns the bits in the range `[start, end)` as a new BigUint
    fn bits_between(&self, start: usize, end: usize) -> Rhs;

    /// Returns `2^exp`
    fn two_pow(exp: usize) -> Rhs;
}

impl BigUintHelpers for BigUint {
    fn bitlen(&self) -> usize {
        if self.bits() == 0 {
            1
        } else {
            self.bits() as usize
        }
    }

    fn bits_between(&self, start: usize, end: usize) -> BigUint {
        if end <= start {
            return BigUint::from(0u8);
        }
        let mask = BigUint::two_pow(end - start) - BigUint::from(1u8);
        (self >> start) & mask
    }

    fn two_pow(exp: usize) -> BigUint {
        BigUint::from(1u8) << exp
    }
}
