//! Types that can be allocated in, and read back from, a circuit.

use crate::snarky::{
    cvar::FieldVar,
    errors::SnarkyResult,
    runner::{RunState, WitnessGeneration},
};
use ark_ff::PrimeField;
use std::array;

/// A snarky type is a type that can be used in a circuit.
/// It references an equivalent "out-of-circuit" type that one can use outside of the circuit.
/// (For example, to construct private or public inputs, or a public output, to the circuit.)
pub trait SnarkyType<F>: Sized
where
    F: PrimeField,
{
    /// The equivalent "out-of-circuit" type.
    /// For example, the [super::byte::Byte] snarky type has an out-of-circuit type of [u8].
    type OutOfCircuit;

    /// The number of field elements that this type takes.
    const SIZE_IN_FIELD_ELEMENTS: usize;

    /// Returns the circuit variables behind this type.
    fn to_cvars(&self) -> Vec<FieldVar<F>>;

    /// Creates a new instance of this type from the given circuit variables.
    /// The caller is responsible for passing [Self::SIZE_IN_FIELD_ELEMENTS] variables.
    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>) -> Self;

    /// Checks that the circuit variables behind this type are valid.
    /// For some definition of valid.
    /// For example, a Byte snarky type would check that the field element representing it is smaller than 256.
    /// The function does this by adding constraints to your constraint system.
    fn check(&self, cs: &mut RunState<F>) -> SnarkyResult<()>;

    /// Converts an out-of-circuit value to field elements.
    fn value_to_field_elements(value: &Self::OutOfCircuit) -> Vec<F>;

    /// Converts field elements back to an out-of-circuit value.
    fn value_of_field_elements(fields: Vec<F>) -> Self::OutOfCircuit;

    /// Reads the out-of-circuit value behind this type (witness generation only).
    fn read<G>(&self, g: G) -> Self::OutOfCircuit
    where
        G: WitnessGeneration<F>,
    {
        let values = self.to_cvars().iter().map(|cvar| g.read_var(cvar)).collect();
        Self::value_of_field_elements(values)
    }
}

//
// Auto traits
//

impl<F> SnarkyType<F> for ()
where
    F: PrimeField,
{
    type OutOfCircuit = ();

    const SIZE_IN_FIELD_ELEMENTS: usize = 0;

    fn to_cvars(&self) -> Vec<FieldVar<F>> {
        vec![]
    }

    fn from_cvars_unsafe(_cvars: Vec<FieldVar<F>>) -> Self {}

    fn check(&self, _cs: &mut RunState<F>) -> SnarkyResult<()> {
        Ok(())
    }

    fn value_to_field_elements(_value: &Self::OutOfCircuit) -> Vec<F> {
        vec![]
    }

    fn value_of_field_elements(_fields: Vec<F>) -> Self::OutOfCircuit {}
}

impl<F, T1, T2> SnarkyType<F> for (T1, T2)
where
    F: PrimeField,
    T1: SnarkyType<F>,
    T2: SnarkyType<F>,
{
    type OutOfCircuit = (T1::OutOfCircuit, T2::OutOfCircuit);

    const SIZE_IN_FIELD_ELEMENTS: usize = T1::SIZE_IN_FIELD_ELEMENTS + T2::SIZE_IN_FIELD_ELEMENTS;

    fn to_cvars(&self) -> Vec<FieldVar<F>> {
        let mut cvars = self.0.to_cvars();
        cvars.extend(self.1.to_cvars());
        cvars
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>) -> Self {
        assert_eq!(cvars.len(), Self::SIZE_IN_FIELD_ELEMENTS);
        let (cvars1, cvars2) = cvars.split_at(T1::SIZE_IN_FIELD_ELEMENTS);
        (
            T1::from_cvars_unsafe(cvars1.to_vec()),
            T2::from_cvars_unsafe(cvars2.to_vec()),
        )
    }

    fn check(&self, cs: &mut RunState<F>) -> SnarkyResult<()> {
        self.0.check(cs)?;
        self.1.check(cs)
    }

    fn value_to_field_elements(value: &Self::OutOfCircuit) -> Vec<F> {
        let mut fields = T1::value_to_field_elements(&value.0);
        fields.extend(T2::value_to_field_elements(&value.1));
        fields
    }

    fn value_of_field_elements(fields: Vec<F>) -> Self::OutOfCircuit {
        let (fields1, fields2) = fields.split_at(T1::SIZE_IN_FIELD_ELEMENTS);
        (
            T1::value_of_field_elements(fields1.to_vec()),
            T2::value_of_field_elements(fields2.to_vec()),
        )
    }
}

impl<F, T, const N: usize> SnarkyType<F> for [T; N]
where
    F: PrimeField,
    T: SnarkyType<F>,
{
    type OutOfCircuit = [T::OutOfCircuit; N];

    const SIZE_IN_FIELD_ELEMENTS: usize = N * T::SIZE_IN_FIELD_ELEMENTS;

    fn to_cvars(&self) -> Vec<FieldVar<F>> {
        self.iter().flat_map(|t| t.to_cvars()).collect()
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>) -> Self {
        assert_eq!(cvars.len(), Self::SIZE_IN_FIELD_ELEMENTS);
        let size = T::SIZE_IN_FIELD_ELEMENTS;
        array::from_fn(|i| T::from_cvars_unsafe(cvars[i * size..(i + 1) * size].to_vec()))
    }

    fn check(&self, cs: &mut RunState<F>) -> SnarkyResult<()> {
        for t in self {
            t.check(cs)?;
        }
        Ok(())
    }

    fn value_to_field_elements(value: &Self::OutOfCircuit) -> Vec<F> {
        value.iter().flat_map(T::value_to_field_elements).collect()
    }

    fn value_of_field_elements(fields: Vec<F>) -> Self::OutOfCircuit {
        let size = T::SIZE_IN_FIELD_ELEMENTS;
        array::from_fn(|i| T::value_of_field_elements(fields[i * size..(i + 1) * size].to_vec()))
    }
}
