//! The main interface to using Snarky.
//!
//! To use Snarky, simply implement the [SnarkyCircuit] trait.

use crate::{
    circuits::{
        asm::pretty,
        gate::{Circuit, CircuitGate},
        wires::COLUMNS,
    },
    snarky::{
        cvar::FieldVar,
        errors::{SnarkyError, SnarkyResult, SnarkyRuntimeError},
        runner::{Mode, RunState},
        snarky_type::SnarkyType,
    },
};
use ark_ff::PrimeField;
use itertools::Itertools;
use log::debug;

/// A witness represents the execution trace of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness<F>(pub [Vec<F>; COLUMNS]);

impl<F> Witness<F>
where
    F: PrimeField,
{
    /// The number of rows of the execution trace.
    pub fn num_rows(&self) -> usize {
        self.0[0].len()
    }

    /// Returns the values of a row.
    pub fn row(&self, row: usize) -> [F; COLUMNS] {
        std::array::from_fn(|col| self.0[col][row])
    }

    /// Logs the execution trace, one row per line.
    pub fn debug(&self) {
        for row in 0..self.num_rows() {
            let values = self.row(row).iter().map(|v| pretty(*v)).join(" | ");
            debug!("{row} - {values}");
        }
    }
}

type PublicInputValue<C> =
    <<C as SnarkyCircuit>::PublicInput as SnarkyType<<C as SnarkyCircuit>::Field>>::OutOfCircuit;

//
// Compilation
//

/// A compiled circuit.
pub struct CompiledCircuit<C>
where
    C: SnarkyCircuit,
{
    /// The snarky circuit itself.
    circuit: C,

    /// The public input size, which includes the public output.
    public_input_size: usize,

    /// The public output size.
    public_output_size: usize,

    /// The gates obtained after compilation.
    pub gates: Vec<CircuitGate<C::Field>>,

    /// If set, witness generation checks every constraint as it is added.
    pub eval_constraints: bool,
}

impl<C> CompiledCircuit<C>
where
    C: SnarkyCircuit,
{
    /// The circuit that was compiled.
    pub fn circuit(&self) -> &C {
        &self.circuit
    }

    /// The number of public input rows, the public output included.
    pub fn public_input_size(&self) -> usize {
        self.public_input_size
    }

    /// Produces an assembly-like encoding of the circuit.
    pub fn asm(&self) -> String {
        Circuit::new(self.public_input_size, &self.gates).generate_asm()
    }

    /// Runs the circuit on concrete inputs.
    /// Returns the witness and the values of the public output.
    ///
    /// The run is replayed over the same code path as compilation,
    /// and it is an error if it produces different gates.
    pub fn generate_witness(
        &self,
        public_input: PublicInputValue<C>,
        private_input: &C::PrivateInput,
    ) -> SnarkyResult<(Witness<C::Field>, Vec<C::Field>)> {
        let mut sys = RunState::new(
            C::PublicInput::SIZE_IN_FIELD_ELEMENTS,
            self.public_output_size,
            Mode::Witnessing,
        );
        sys.eval_constraints = self.eval_constraints;

        // init
        let public_input = C::PublicInput::value_to_field_elements(&public_input);
        sys.generate_witness_init(public_input)?;

        // run circuit and get return var
        let public_input_var: C::PublicInput = sys.public_input();
        let return_vars = self
            .circuit
            .circuit(&mut sys, public_input_var, Some(private_input))?;

        // create constraint between public output var and return var
        sys.wire_public_output(return_vars)?;

        // both runs must agree on the circuit
        let gates = sys.system.finalize_and_get_gates();
        if let Some(row) = first_mismatch(&gates, &self.gates) {
            return Err(SnarkyError::runtime(
                SnarkyRuntimeError::NonReproducibleCircuit(row),
                "witness generation",
                crate::loc!(),
            ));
        }

        let witness = Witness(sys.witness());
        debug!(
            "generated a witness of {} rows ({} public)",
            witness.num_rows(),
            self.public_input_size
        );

        Ok((witness, sys.public_output_values()))
    }
}

/// Returns the first row at which two lists of gates differ.
fn first_mismatch<F: PrimeField>(left: &[CircuitGate<F>], right: &[CircuitGate<F>]) -> Option<usize> {
    left.iter()
        .zip(right)
        .position(|(l, r)| l != r)
        .or_else(|| (left.len() != right.len()).then(|| left.len().min(right.len())))
}

/// Compiles a circuit to a [CompiledCircuit].
fn compile<C: SnarkyCircuit>(circuit: C) -> SnarkyResult<CompiledCircuit<C>> {
    let public_output_size = circuit.public_output_size();
    let public_input_size = C::PublicInput::SIZE_IN_FIELD_ELEMENTS + public_output_size;

    // create snarky constraint system
    let mut sys = RunState::new(
        C::PublicInput::SIZE_IN_FIELD_ELEMENTS,
        public_output_size,
        Mode::Emitting,
    );

    // run circuit and get return var
    let public_input: C::PublicInput = sys.public_input();
    let return_vars = circuit.circuit(&mut sys, public_input, None)?;

    // create constraint between public output var and return var
    sys.wire_public_output(return_vars)?;

    // compile to gates
    let gates = sys.system.finalize_and_get_gates();
    debug!(
        "compiled a circuit of {} gates ({} public)",
        gates.len(),
        public_input_size
    );

    Ok(CompiledCircuit {
        circuit,
        public_input_size,
        public_output_size,
        gates,
        eval_constraints: true,
    })
}

//
// The main user-facing trait for constructing circuits.
//

/// The main trait. Implement this on your circuit to get access to [Self::compile].
pub trait SnarkyCircuit: Sized {
    /// A circuit must be defined for a specific field,
    /// as it might be incorrect to use a different field.
    type Field: PrimeField;

    /// The private input used by the circuit.
    type PrivateInput;

    /// The public input used by the circuit.
    type PublicInput: SnarkyType<Self::Field>;

    /// The number of field elements returned by the circuit.
    /// It can depend on how the circuit is parameterized.
    fn public_output_size(&self) -> usize;

    /// The circuit. It takes:
    ///
    /// - `self`: to parameterize it at compile time.
    /// - `sys`: to construct the circuit or generate the witness (depending on mode)
    /// - `public_input`: the public input (as defined above)
    /// - `private_input`: the private input as an option, set to `None` for compilation.
    ///
    /// It returns a [SnarkyResult] containing the public output.
    fn circuit(
        &self,
        sys: &mut RunState<Self::Field>,
        public_input: Self::PublicInput,
        private_input: Option<&Self::PrivateInput>,
    ) -> SnarkyResult<Vec<FieldVar<Self::Field>>>;

    /// Compiles the circuit to a list of gates.
    fn compile(self) -> SnarkyResult<CompiledCircuit<Self>> {
        compile(self)
    }
}
