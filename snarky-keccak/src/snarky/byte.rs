//! A field element constrained to hold a byte.

use crate::{
    gadgets::range_check::range_check8,
    loc,
    snarky::{cvar::FieldVar, errors::SnarkyResult, runner::RunState, snarky_type::SnarkyType},
};
use ark_ff::PrimeField;
use field_utils::FieldHelpers;

/// A byte in a circuit. Witnessing a [Byte] range-checks it to `[0, 256)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Byte<F: PrimeField>(FieldVar<F>);

impl<F: PrimeField> Byte<F> {
    /// A constant byte, which needs no range check.
    pub fn constant(value: u8) -> Self {
        Byte(FieldVar::constant(F::from(value as u64)))
    }

    pub fn as_var(&self) -> &FieldVar<F> {
        &self.0
    }

    pub fn into_var(self) -> FieldVar<F> {
        self.0
    }
}

impl<F> SnarkyType<F> for Byte<F>
where
    F: PrimeField,
{
    type OutOfCircuit = u8;

    const SIZE_IN_FIELD_ELEMENTS: usize = 1;

    fn to_cvars(&self) -> Vec<FieldVar<F>> {
        vec![self.0.clone()]
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>) -> Self {
        assert_eq!(cvars.len(), 1);
        Byte(cvars[0].clone())
    }

    fn check(&self, cs: &mut RunState<F>) -> SnarkyResult<()> {
        range_check8(cs, &loc!(), &self.0)
    }

    fn value_to_field_elements(value: &Self::OutOfCircuit) -> Vec<F> {
        vec![F::from(*value as u64)]
    }

    fn value_of_field_elements(fields: Vec<F>) -> Self::OutOfCircuit {
        assert_eq!(fields.len(), 1);
        // the low byte, which is the whole value for a range-checked byte
        fields[0].to_biguint().to_bytes_le()[0]
    }
}
