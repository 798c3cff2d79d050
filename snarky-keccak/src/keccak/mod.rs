//! Keccak and SHA-3 as circuits.
//!
//! Messages are sequences of [Byte]s, and the state is made of 64-bit words,
//! each encoded as a single field element.
//! The sponge supports a single squeeze, which covers all the standard output lengths.

use crate::snarky::{byte::Byte, errors::SnarkyCompilationError, prelude::*};
use ark_ff::PrimeField;

pub mod circuit;
pub mod codec;
pub mod permutation;
pub mod sponge;
pub mod state;

pub use sponge::hash;

/// Length of the square matrix side of Keccak states
pub const MATRIX_DIM: usize = 5;
/// Number of words in a Keccak state
pub const STATE_WORDS: usize = MATRIX_DIM * MATRIX_DIM;
/// Number of bytes in a word
pub const WORD_BYTES: usize = 8;
/// Number of bytes in a Keccak state
pub const STATE_BYTES: usize = STATE_WORDS * WORD_BYTES;
/// Length of a word, in bits
pub const WORD: usize = 64;
/// Number of rounds of the permutation
pub const ROUNDS: usize = 24;

/// Creates the 5x5 table of rotation offset for Keccak modulo 64
/// | x \ y |  0 |  1 |  2 |  3 |  4 |
/// | ----- | -- | -- | -- | -- | -- |
/// | 0     |  0 | 36 |  3 | 41 | 18 |
/// | 1     |  1 | 44 | 10 | 45 |  2 |
/// | 2     | 62 |  6 | 43 | 15 | 61 |
/// | 3     | 28 | 55 | 25 | 21 | 56 |
/// | 4     | 27 | 20 | 39 |  8 | 14 |
pub const ROT_TAB: [[u32; MATRIX_DIM]; MATRIX_DIM] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

/// Round constants for the 24 rounds of Keccak for the iota algorithm
pub const RC: [u64; ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808A,
    0x8000000080008000,
    0x000000000000808B,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008A,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000A,
    0x000000008000808B,
    0x800000000000008B,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800A,
    0x800000008000000A,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Digest lengths, in bits, of the standard instances
pub const DIGEST_LENGTHS: [usize; 4] = [224, 256, 384, 512];

fn check_digest_length(length: usize) -> SnarkyResult<()> {
    if !DIGEST_LENGTHS.contains(&length) {
        return Err(SnarkyCompilationError::UnsupportedDigestLength(length).into());
    }
    Ok(())
}

/// SHA-3 as standardized by NIST, with a digest of `length` bits.
///
/// The capacity is twice the digest length.
/// 224-bit digests are rejected, as 28 bytes is not a whole number of words.
pub fn nist_sha3<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    length: usize,
    message: &[Byte<F>],
) -> SnarkyResult<Vec<Byte<F>>> {
    check_digest_length(length)?;
    hash(sys, loc, message, length / 8, 2 * length / 8, true)
}

/// Keccak as submitted to the SHA-3 competition (before the NIST padding change),
/// with a digest of `length` bits.
pub fn pre_nist<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    length: usize,
    message: &[Byte<F>],
) -> SnarkyResult<Vec<Byte<F>>> {
    check_digest_length(length)?;
    hash(sys, loc, message, length / 8, 2 * length / 8, false)
}

/// Keccak-256, as used by Ethereum.
pub fn ethereum<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    message: &[Byte<F>],
) -> SnarkyResult<Vec<Byte<F>>> {
    pre_nist(sys, loc, 256, message)
}
