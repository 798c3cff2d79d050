//! The sponge construction: padding, absorption and a single squeeze.

use crate::{
    keccak::{
        codec::{bytes_to_words, chunk, words_to_bytes},
        permutation::permutation,
        state::KeccakState,
        RC, STATE_BYTES, STATE_WORDS, WORD_BYTES,
    },
    snarky::{byte::Byte, errors::SnarkyCompilationError, prelude::*},
};
use ark_ff::PrimeField;
use log::{debug, trace};

/// First padding byte of SHA-3, which appends the `01` domain separation bits
const NIST_PAD: u8 = 0x06;
/// First padding byte of the original Keccak
const PRE_NIST_PAD: u8 = 0x01;
/// Bit set in the last padding byte
const PAD_END: u8 = 0x80;

/// Pads a message to a multiple of `rate_bytes` bytes.
///
/// At least one byte is always appended, so an aligned message gets a full block of padding.
/// A single padding byte is `0x86` (NIST) or `0x81` (pre-NIST).
pub fn pad<F: PrimeField>(
    message: &[Byte<F>],
    rate_bytes: usize,
    nist: bool,
) -> SnarkyResult<Vec<Byte<F>>> {
    if rate_bytes == 0 {
        return Err(SnarkyCompilationError::ChunkSize(message.len(), rate_bytes).into());
    }

    let extra = rate_bytes - message.len() % rate_bytes;
    let mut pad = vec![0u8; extra];
    pad[0] = if nist { NIST_PAD } else { PRE_NIST_PAD };
    pad[extra - 1] += PAD_END;

    let mut padded = message.to_vec();
    padded.extend(pad.into_iter().map(Byte::constant));
    Ok(padded)
}

/// Absorbs padded words, one block of `rate` words at a time, into a zero state.
pub fn absorb<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    padded: &[FieldVar<F>],
    capacity: usize,
    rate: usize,
    round_constants: &[u64],
) -> SnarkyResult<KeccakState<F>> {
    if rate + capacity != STATE_WORDS {
        return Err(SnarkyCompilationError::RateCapacityMismatch(rate, capacity).into());
    }
    if rate == 0 || padded.len() % rate != 0 {
        return Err(SnarkyCompilationError::PaddedLengthMismatch(padded.len(), rate).into());
    }

    let blocks = chunk(padded, rate)?;
    let mut state = KeccakState::zero();
    for (i, block) in blocks.iter().enumerate() {
        // the capacity part of the block is zero
        let mut words = block.clone();
        words.resize(STATE_WORDS, FieldVar::zero());
        let block = KeccakState::from_words(&words)?;

        state = state.xor(sys, loc, &block)?;
        state = permutation(sys, loc, state, round_constants)?;
        trace!("absorbed block {}/{}", i + 1, blocks.len());
    }
    Ok(state)
}

/// Returns the first `length` words of the state.
/// Only a single squeeze is supported: `length` must be smaller than `rate`.
pub fn squeeze<F: PrimeField>(
    state: &KeccakState<F>,
    length: usize,
    rate: usize,
) -> SnarkyResult<Vec<FieldVar<F>>> {
    if rate == 0 || length / rate + 1 != 1 {
        return Err(SnarkyCompilationError::MultipleSqueezes(length, rate).into());
    }
    let mut words = state.to_words();
    words.truncate(length);
    Ok(words)
}

/// Keccak sponge with a digest of `length` bytes and a capacity of `capacity` bytes.
/// The `nist` flag selects the SHA-3 padding over the original Keccak padding.
pub fn hash<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    message: &[Byte<F>],
    length: usize,
    capacity: usize,
    nist: bool,
) -> SnarkyResult<Vec<Byte<F>>> {
    if capacity == 0 || capacity >= STATE_BYTES || capacity % WORD_BYTES != 0 {
        return Err(SnarkyCompilationError::InvalidCapacity(capacity).into());
    }
    if length == 0 || length % WORD_BYTES != 0 {
        return Err(SnarkyCompilationError::InvalidOutputLength(length).into());
    }

    let capacity_words = capacity / WORD_BYTES;
    let rate = STATE_WORDS - capacity_words;
    let start = sys.system.num_rows();

    let padded = pad(message, rate * WORD_BYTES, nist)?;
    let words = bytes_to_words(&padded)?;
    let state = absorb(sys, loc, &words, capacity_words, rate, &RC)?;
    let hashed = squeeze(&state, length / WORD_BYTES, rate)?;
    let digest = words_to_bytes(sys, loc, &hashed)?;

    debug!(
        "hashed {} bytes into {} bytes with {} rows",
        message.len(),
        length,
        sys.system.num_rows() - start
    );
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        field::Fp,
        snarky::{errors::SnarkyError, runner::Mode},
    };

    fn constant_bytes(bytes: &[u8]) -> Vec<Byte<Fp>> {
        bytes.iter().copied().map(Byte::constant).collect()
    }

    fn compilation_error<T: std::fmt::Debug>(res: SnarkyResult<T>) -> SnarkyCompilationError {
        match res.unwrap_err() {
            SnarkyError::CompilationError(err) => err,
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_pad() {
        let padded = pad(&constant_bytes(&[1, 2, 3]), 4, true).unwrap();
        assert_eq!(padded, constant_bytes(&[1, 2, 3, 0x86]));

        let padded = pad(&constant_bytes(&[1, 2, 3]), 4, false).unwrap();
        assert_eq!(padded, constant_bytes(&[1, 2, 3, 0x81]));

        let padded = pad(&constant_bytes(&[1, 2, 3, 4]), 4, true).unwrap();
        assert_eq!(padded, constant_bytes(&[1, 2, 3, 4, 0x06, 0, 0, 0x80]));

        let padded = pad(&constant_bytes(&[]), 136, false).unwrap();
        assert_eq!(padded.len(), 136);
        assert_eq!(padded[0], Byte::constant(0x01));
        assert_eq!(padded[135], Byte::constant(0x80));
    }

    #[test]
    fn test_absorb_checks_dimensions() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        let words = vec![FieldVar::zero(); 17];
        assert_eq!(
            compilation_error(absorb(&mut sys, &loc!(), &words, 8, 16, &RC)),
            SnarkyCompilationError::RateCapacityMismatch(16, 8)
        );
        assert_eq!(
            compilation_error(absorb(&mut sys, &loc!(), &words, 9, 16, &RC)),
            SnarkyCompilationError::PaddedLengthMismatch(17, 16)
        );
    }

    #[test]
    fn test_single_squeeze() {
        let state = KeccakState::<Fp>::zero();
        assert_eq!(squeeze(&state, 4, 17).unwrap().len(), 4);
        assert_eq!(
            compilation_error(squeeze(&state, 17, 17)),
            SnarkyCompilationError::MultipleSqueezes(17, 17)
        );
        assert_eq!(
            compilation_error(squeeze(&state, 20, 17)),
            SnarkyCompilationError::MultipleSqueezes(20, 17)
        );
    }

    #[test]
    fn test_hash_parameters() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        for capacity in [0, 12, 200, 256] {
            assert_eq!(
                compilation_error(hash(&mut sys, &loc!(), &[], 32, capacity, true)),
                SnarkyCompilationError::InvalidCapacity(capacity)
            );
        }
        for length in [0, 20] {
            assert_eq!(
                compilation_error(hash(&mut sys, &loc!(), &[], length, 64, true)),
                SnarkyCompilationError::InvalidOutputLength(length)
            );
        }
    }
}
