//! This module implements the circuit gate wires primitive.

use serde::{Deserialize, Serialize};
use std::array;

/// Number of registers
pub const COLUMNS: usize = 15;

/// Number of registers that can be wired (participating in the permutation)
pub const PERMUTS: usize = 7;

/// Wire documents the other cell that is wired to this one.
/// If the cell represents an internal wire, an input to the circuit,
/// or a final output of the circuit, the cell references itself.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Wire {
    pub row: usize,
    pub col: usize,
}

impl Wire {
    /// Creates a new [Wire].
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Creates a new set of wires for a given row, each pointing to itself.
    pub fn for_row(row: usize) -> [Self; PERMUTS] {
        array::from_fn(|col| Self { row, col })
    }
}

/// GateWires document the wiring of a gate. More specifically, each value either
/// represents the same cell (row and column) or a different cell in another row.
/// (This is to help the permutation argument.)
pub type GateWires = [Wire; PERMUTS];
