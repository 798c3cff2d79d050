//! Fixed lookup tables used by the bitwise gates.
//!
//! Membership is checked arithmetically while generating a witness,
//! the tables are only materialized on demand (e.g. to be committed to by a backend).

use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, FieldHelpers};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The id of the XOR table
pub const XOR_TABLE_ID: i32 = 0;

/// The id of the 12-bit range check table
pub const RANGE_CHECK_TABLE_ID: i32 = 1;

/// The range check will be performed on 12-bit values, i.e. those in `[0, 2^12)`
pub const RANGE_CHECK_BITS: usize = 12;

/// Exclusive upper bound of the range check table
pub const RANGE_CHECK_UPPERBOUND: u32 = 1 << RANGE_CHECK_BITS;

/// The fixed tables a gate can look values up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateLookupTable {
    /// `(a, b, a ^ b)` for all `a, b < 2^nibble_width`
    Xor { nibble_width: usize },
    /// all values in `[0, 2^12)`
    RangeCheck,
}

/// A materialized lookup table, one vector per column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTable<F> {
    pub id: i32,
    pub data: Vec<Vec<F>>,
}

impl GateLookupTable {
    /// The id of the table
    pub fn id(&self) -> i32 {
        match self {
            GateLookupTable::Xor { .. } => XOR_TABLE_ID,
            GateLookupTable::RangeCheck => RANGE_CHECK_TABLE_ID,
        }
    }

    /// The number of columns of an entry of the table
    pub fn width(&self) -> usize {
        match self {
            GateLookupTable::Xor { .. } => 3,
            GateLookupTable::RangeCheck => 1,
        }
    }

    /// Returns `true` if `entry` is a row of the table.
    pub fn contains<F: PrimeField>(&self, entry: &[F]) -> bool {
        if entry.len() != self.width() {
            return false;
        }
        match self {
            GateLookupTable::Xor { nibble_width } => {
                let bound = BigUint::two_pow(*nibble_width);
                let [a, b, out] = [entry[0], entry[1], entry[2]].map(|x| x.to_biguint());
                a < bound && b < bound && (a ^ b) == out
            }
            GateLookupTable::RangeCheck => {
                entry[0].to_biguint() < BigUint::from(RANGE_CHECK_UPPERBOUND)
            }
        }
    }

    /// Materializes the table. Only sensible for small XOR nibble widths.
    pub fn table<F: PrimeField>(&self) -> LookupTable<F> {
        match self {
            GateLookupTable::Xor { nibble_width } => xor_table(*nibble_width),
            GateLookupTable::RangeCheck => range_check_table(),
        }
    }
}

impl fmt::Display for GateLookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateLookupTable::Xor { nibble_width } => write!(f, "xor{nibble_width}"),
            GateLookupTable::RangeCheck => write!(f, "range_check{RANGE_CHECK_BITS}"),
        }
    }
}

/// Returns the XOR lookup table over `nibble_width`-bit arguments.
/// It is constructed so that `(0, 0, 0)` is the last position in the table,
/// as tables are padded with their final value.
pub fn xor_table<F: PrimeField>(nibble_width: usize) -> LookupTable<F> {
    let mut data = vec![vec![]; 3];
    let max = (1u64 << nibble_width) - 1;
    for i in 0..=max {
        for j in 0..=max {
            data[0].push(F::from(i));
            data[1].push(F::from(j));
            data[2].push(F::from(i ^ j));
        }
    }
    for column in &mut data {
        column.reverse();
    }
    LookupTable {
        id: XOR_TABLE_ID,
        data,
    }
}

/// A single-column table containing the numbers from 0 to [`RANGE_CHECK_UPPERBOUND`] (exclusive)
pub fn range_check_table<F: PrimeField>() -> LookupTable<F> {
    let table = vec![(0..RANGE_CHECK_UPPERBOUND).map(|x| F::from(x as u64)).collect()];
    LookupTable {
        id: RANGE_CHECK_TABLE_ID,
        data: table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Fp;
    use ark_ff::Zero;

    #[test]
    fn test_xor_table_matches_membership() {
        let xor4 = GateLookupTable::Xor { nibble_width: 4 };
        let table: LookupTable<Fp> = xor4.table();
        assert_eq!(table.id, XOR_TABLE_ID);
        assert_eq!(table.data[0].len(), 256);
        for column in &table.data {
            assert!(column[column.len() - 1].is_zero());
        }
        for row in 0..256 {
            let entry = [table.data[0][row], table.data[1][row], table.data[2][row]];
            assert!(xor4.contains(&entry));
        }

        assert!(!xor4.contains(&[Fp::from(16u64), Fp::from(0u64), Fp::from(16u64)]));
        assert!(!xor4.contains(&[Fp::from(3u64), Fp::from(5u64), Fp::from(7u64)]));
        assert!(!xor4.contains(&[Fp::from(3u64), Fp::from(5u64)]));
    }

    #[test]
    fn test_range_check_table() {
        let table: LookupTable<Fp> = range_check_table();
        assert_eq!(table.data[0].len(), 4096);
        assert!(GateLookupTable::RangeCheck.contains(&[Fp::from(4095u64)]));
        assert!(!GateLookupTable::RangeCheck.contains(&[Fp::from(4096u64)]));
        assert!(!GateLookupTable::RangeCheck.contains(&[-Fp::from(1u64)]));
    }
}
