//! The Keccak state: a 5x5 matrix of 64-bit words.

use crate::{
    gadgets::{xor, DEFAULT_NIBBLE_WIDTH},
    keccak::{MATRIX_DIM, STATE_WORDS, WORD},
    snarky::{errors::SnarkyCompilationError, prelude::*},
};
use ark_ff::PrimeField;
use std::{
    array,
    ops::{Index, IndexMut},
};

/// Representation of the Keccak state.
/// The first index is the x coordinate and the second is the y coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeccakState<F: PrimeField> {
    pub state: [[FieldVar<F>; MATRIX_DIM]; MATRIX_DIM],
}

impl<F: PrimeField> KeccakState<F> {
    /// Creates a new Keccak state with an input matrix of 5x5 elements
    pub fn new(state: [[FieldVar<F>; MATRIX_DIM]; MATRIX_DIM]) -> Self {
        KeccakState { state }
    }

    /// The all-zero state
    pub fn zero() -> Self {
        Self::new(array::from_fn(|_| array::from_fn(|_| FieldVar::zero())))
    }

    /// Creates a state from rows of words.
    /// Fails unless there are exactly 5 rows of 5 words.
    pub fn from_matrix(matrix: Vec<Vec<FieldVar<F>>>) -> SnarkyResult<Self> {
        if matrix.len() != MATRIX_DIM {
            return Err(
                SnarkyCompilationError::StateDimensions(format!("{} rows", matrix.len())).into(),
            );
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != MATRIX_DIM) {
            return Err(SnarkyCompilationError::StateDimensions(format!(
                "a row of {} words",
                row.len()
            ))
            .into());
        }
        Ok(Self::new(array::from_fn(|x| {
            array::from_fn(|y| matrix[x][y].clone())
        })))
    }

    /// Creates a state from 25 words, the word at `(x, y)` being `words[5y + x]`.
    pub fn from_words(words: &[FieldVar<F>]) -> SnarkyResult<Self> {
        if words.len() != STATE_WORDS {
            return Err(
                SnarkyCompilationError::StateDimensions(format!("{} words", words.len())).into(),
            );
        }
        Ok(Self::new(array::from_fn(|x| {
            array::from_fn(|y| words[MATRIX_DIM * y + x].clone())
        })))
    }

    /// Returns the 25 words of the state, in the order of [Self::from_words].
    pub fn to_words(&self) -> Vec<FieldVar<F>> {
        (0..STATE_WORDS)
            .map(|i| self.state[i % MATRIX_DIM][i / MATRIX_DIM].clone())
            .collect()
    }

    /// Lane-wise XOR of two states.
    pub fn xor(&self, sys: &mut RunState<F>, loc: &str, other: &Self) -> SnarkyResult<Self> {
        let mut res = self.clone();
        for x in 0..MATRIX_DIM {
            for y in 0..MATRIX_DIM {
                res[(x, y)] = xor(sys, loc, &self[(x, y)], &other[(x, y)], WORD, DEFAULT_NIBBLE_WIDTH)?;
            }
        }
        Ok(res)
    }
}

impl<F: PrimeField> Index<(usize, usize)> for KeccakState<F> {
    type Output = FieldVar<F>;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.state[x][y]
    }
}

impl<F: PrimeField> IndexMut<(usize, usize)> for KeccakState<F> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.state[x][y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Fp, snarky::errors::SnarkyError};

    fn words() -> Vec<FieldVar<Fp>> {
        (0..STATE_WORDS as u64)
            .map(|i| FieldVar::constant(Fp::from(i)))
            .collect()
    }

    #[test]
    fn test_words_layout() {
        let state = KeccakState::from_words(&words()).unwrap();
        assert_eq!(state[(1, 0)], FieldVar::constant(Fp::from(1u64)));
        assert_eq!(state[(0, 1)], FieldVar::constant(Fp::from(5u64)));
        assert_eq!(state[(4, 4)], FieldVar::constant(Fp::from(24u64)));
        assert_eq!(state.to_words(), words());
    }

    #[test]
    fn test_dimensions() {
        let rows: Vec<Vec<FieldVar<Fp>>> = words().chunks(5).map(<[_]>::to_vec).collect();
        assert!(KeccakState::from_matrix(rows.clone()).is_ok());

        let err = KeccakState::from_matrix(rows[..4].to_vec()).unwrap_err();
        assert!(matches!(
            err,
            SnarkyError::CompilationError(SnarkyCompilationError::StateDimensions(_))
        ));

        let mut ragged = rows;
        ragged[2].pop();
        assert!(KeccakState::from_matrix(ragged).is_err());
        assert!(KeccakState::from_words(&words()[1..]).is_err());
    }
}
