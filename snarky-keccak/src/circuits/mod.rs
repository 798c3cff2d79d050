//! The gate vocabulary produced when compiling a circuit.

pub mod asm;
pub mod gate;
pub mod lookup;
pub mod wires;
