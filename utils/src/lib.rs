//! Helpers extending [arkworks](http://arkworks.rs/) prime fields and `num-bigint`
//! integers with the bit-level operations used to witness bitwise circuit gadgets.

pub mod biguint_helpers;
pub mod bitwise_operations;
pub mod field_helpers;
pub mod serialization;

pub use biguint_helpers::BigUintHelpers;
pub use bitwise_operations::BitwiseOps;
pub use field_helpers::{FieldHelpers, FieldHelpersError, Two};
