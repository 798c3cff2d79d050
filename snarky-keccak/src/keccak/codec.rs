//! Conversions between bytes and 64-bit words, in little-endian order.

use crate::{
    keccak::WORD_BYTES,
    snarky::{byte::Byte, errors::SnarkyCompilationError, prelude::*},
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, FieldHelpers};
use num_bigint::BigUint;
use std::array;

/// Splits `items` into chunks of `size` elements.
/// Fails if the length is not a multiple of `size`.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> SnarkyResult<Vec<Vec<T>>> {
    if size == 0 || items.len() % size != 0 {
        return Err(SnarkyCompilationError::ChunkSize(items.len(), size).into());
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Packs up to 8 bytes into a word. This is a linear combination, without any row.
pub fn bytes_to_word<F: PrimeField>(bytes: &[Byte<F>]) -> FieldVar<F> {
    let terms: Vec<_> = bytes
        .iter()
        .enumerate()
        .map(|(i, byte)| (F::from(BigUint::two_pow(8 * i)), byte.as_var().clone()))
        .collect();
    FieldVar::linear_combination(&terms)
}

/// Unpacks a word into 8 range-checked bytes, constrained to add up to the word.
pub fn word_to_bytes<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    word: &FieldVar<F>,
) -> SnarkyResult<[Byte<F>; WORD_BYTES]> {
    let bytes: [Byte<F>; WORD_BYTES] = sys.compute(loc, |env| {
        let word = env.read_var(word).to_biguint().to_bytes_le();
        array::from_fn(|i| word.get(i).copied().unwrap_or_default())
    })?;
    sys.assert_eq(
        Some("word to bytes"),
        loc,
        bytes_to_word(&bytes),
        word.clone(),
    )?;
    Ok(bytes)
}

/// Packs bytes into words. The number of bytes must be a multiple of 8.
pub fn bytes_to_words<F: PrimeField>(bytes: &[Byte<F>]) -> SnarkyResult<Vec<FieldVar<F>>> {
    Ok(chunk(bytes, WORD_BYTES)?
        .iter()
        .map(|word| bytes_to_word(word))
        .collect())
}

/// Unpacks words into bytes.
pub fn words_to_bytes<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    words: &[FieldVar<F>],
) -> SnarkyResult<Vec<Byte<F>>> {
    let mut bytes = Vec::with_capacity(words.len() * WORD_BYTES);
    for word in words {
        bytes.extend(word_to_bytes(sys, loc, word)?);
    }
    Ok(bytes)
}
