//! The Keccak-f\[1600\] permutation over a [KeccakState].

use crate::{
    gadgets::{and, not, rotate, xor, RotMode, DEFAULT_NIBBLE_WIDTH},
    keccak::{state::KeccakState, MATRIX_DIM, ROT_TAB, WORD},
    snarky::prelude::*,
};
use ark_ff::PrimeField;
use log::trace;

fn xor64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    a: &FieldVar<F>,
    b: &FieldVar<F>,
) -> SnarkyResult<FieldVar<F>> {
    xor(sys, loc, a, b, WORD, DEFAULT_NIBBLE_WIDTH)
}

// First algorithm in the compression step of Keccak for 64-bit words.
// C[x] = A[x,0] xor A[x,1] xor A[x,2] xor A[x,3] xor A[x,4]
// D[x] = C[x-1] xor ROT(C[x+1], 1)
// E[x,y] = A[x,y] xor D[x]
fn theta<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state_a: &KeccakState<F>,
) -> SnarkyResult<KeccakState<F>> {
    let mut state_c = Vec::with_capacity(MATRIX_DIM);
    for x in 0..MATRIX_DIM {
        let mut c = state_a[(x, 0)].clone();
        for y in 1..MATRIX_DIM {
            c = xor64(sys, loc, &c, &state_a[(x, y)])?;
        }
        state_c.push(c);
    }

    let mut state_e = state_a.clone();
    for x in 0..MATRIX_DIM {
        let x_minus_one = (x + MATRIX_DIM - 1) % MATRIX_DIM;
        let x_plus_one = (x + 1) % MATRIX_DIM;
        let rotated = rotate(sys, loc, &state_c[x_plus_one], 1, RotMode::Left)?;
        let d = xor64(sys, loc, &state_c[x_minus_one], &rotated)?;
        for y in 0..MATRIX_DIM {
            state_e[(x, y)] = xor64(sys, loc, &state_a[(x, y)], &d)?;
        }
    }
    Ok(state_e)
}

// Second and third steps in the compression step of Keccak for 64-bit words.
// B[y,2x+3y] = ROT(E[x,y], r[x,y])
fn pi_rho<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state_e: &KeccakState<F>,
) -> SnarkyResult<KeccakState<F>> {
    let mut state_b = KeccakState::zero();
    for x in 0..MATRIX_DIM {
        for y in 0..MATRIX_DIM {
            let two_x_plus_three_y = (2 * x + 3 * y) % MATRIX_DIM;
            state_b[(y, two_x_plus_three_y)] =
                rotate(sys, loc, &state_e[(x, y)], ROT_TAB[x][y], RotMode::Left)?;
        }
    }
    Ok(state_b)
}

// Fourth step of the compression function of Keccak for 64-bit words.
// F[x,y] = B[x,y] xor ((not B[x+1,y]) and B[x+2,y])
// The words of B are 64-bit words, so the negation needs no check.
fn chi<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state_b: &KeccakState<F>,
) -> SnarkyResult<KeccakState<F>> {
    let mut state_f = state_b.clone();
    for y in 0..MATRIX_DIM {
        for x in 0..MATRIX_DIM {
            let x_plus_one = (x + 1) % MATRIX_DIM;
            let x_plus_two = (x + 2) % MATRIX_DIM;
            let negated = not(sys, loc, &state_b[(x_plus_one, y)], WORD, false)?;
            let conjunction = and(sys, loc, &negated, &state_b[(x_plus_two, y)], WORD)?;
            state_f[(x, y)] = xor64(sys, loc, &state_b[(x, y)], &conjunction)?;
        }
    }
    Ok(state_f)
}

// Fifth step of the permutation function of Keccak for 64-bit words.
// It takes the word located at the position (0,0) of the state and XORs it with the round constant.
fn iota<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state_f: KeccakState<F>,
    round_constant: u64,
) -> SnarkyResult<KeccakState<F>> {
    let mut state_g = state_f;
    let rc = FieldVar::constant(F::from(round_constant));
    state_g[(0, 0)] = xor64(sys, loc, &state_g[(0, 0)], &rc)?;
    Ok(state_g)
}

/// One round of the permutation.
pub fn round<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state: &KeccakState<F>,
    round_constant: u64,
) -> SnarkyResult<KeccakState<F>> {
    let state_e = theta(sys, loc, state)?;
    let state_b = pi_rho(sys, loc, &state_e)?;
    let state_f = chi(sys, loc, &state_b)?;
    iota(sys, loc, state_f, round_constant)
}

/// The permutation, with one round per round constant.
pub fn permutation<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    state: KeccakState<F>,
    round_constants: &[u64],
) -> SnarkyResult<KeccakState<F>> {
    let mut state = state;
    for (i, rc) in round_constants.iter().enumerate() {
        state = round(sys, loc, &state, *rc)?;
        trace!("keccak round {i} ends at row {}", sys.system.num_rows());
    }
    Ok(state)
}
