//! Snarky is the front end used to write circuits and convert them to gates.
//!
//! A circuit is written once, as a function over a [runner::RunState].
//! It is run a first time to emit its gates,
//! and a second time over concrete inputs to produce the witness.
//!
//! See the `tests.rs` file for examples of how to use snarky.

pub mod api;
pub mod byte;
pub mod constraint_system;
pub mod cvar;
pub mod errors;
pub mod runner;
pub mod snarky_type;


/// A handy module that you can import the content of to easily use snarky.
pub mod prelude {
    use super::*;
    pub use crate::loc;
    pub use byte::Byte;
    pub use cvar::FieldVar;
    pub use errors::SnarkyResult;
    pub use runner::{RunState, WitnessGeneration};
}
