//! This module implements the circuit gate primitive.

use crate::circuits::wires::{GateWires, Wire, PERMUTS};
use ark_ff::PrimeField;
use field_utils::serialization::HexField;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The different types of gates the system supports.
/// Note that all the gates are mutually exclusive:
/// they cannot be used at the same time on single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GateType {
    /// Zero gate
    Zero = 0,
    /// Generic arithmetic gate
    Generic = 1,
    /// Bitwise XOR of 4 nibbles per operand, chained through the next row
    Xor16 = 2,
    /// 64-bit rotation, followed by the range check of the shifted word
    Rot64 = 3,
    /// 64-bit range check through 12-bit limbs and 2-bit crumbs
    RangeCheck0 = 4,
    /// Lookup of the first cells of the row into a fixed table
    Lookup = 5,
}

/// Number of coefficients of a generic row:
/// `cl * l + cr * r + co * o + m * l * r + c`.
pub const GENERIC_COEFFS: usize = 5;

/// Number of registers read by a generic row.
pub const GENERIC_REGISTERS: usize = 3;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A single gate in a circuit.
pub struct CircuitGate<F: PrimeField> {
    /// type of the gate
    pub typ: GateType,
    /// gate wiring (for each cell, what cell it is wired to)
    pub wires: GateWires,
    /// public selector polynomials that can used as handy coefficients in gates
    #[serde_as(as = "Vec<HexField>")]
    pub coeffs: Vec<F>,
}

impl<F: PrimeField> CircuitGate<F> {
    /// Creates a gate whose cells are wired to themselves.
    pub fn new(typ: GateType, row: usize, coeffs: Vec<F>) -> Self {
        Self {
            typ,
            wires: Wire::for_row(row),
            coeffs,
        }
    }

    /// Returns `true` if the cell `col` of this gate (at `row`) is wired to another cell.
    pub fn is_wired(&self, row: usize, col: usize) -> bool {
        col < PERMUTS && self.wires[col] != Wire::new(row, col)
    }
}

/// A circuit: its gates, the first `public_input_size` of which hold the public input.
#[derive(Clone, Copy, Debug)]
pub struct Circuit<'a, F: PrimeField> {
    pub public_input_size: usize,
    pub gates: &'a [CircuitGate<F>],
}

impl<'a, F: PrimeField> Circuit<'a, F> {
    pub fn new(public_input_size: usize, gates: &'a [CircuitGate<F>]) -> Self {
        Self {
            public_input_size,
            gates,
        }
    }
}
