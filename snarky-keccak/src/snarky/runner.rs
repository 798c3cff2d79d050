//! The circuit-generation and witness-generation logic.

use crate::{
    circuits::{asm::pretty, wires::COLUMNS},
    snarky::{
        constraint_system::{BasicSnarkyConstraint, KimchiConstraint, SnarkyConstraintSystem},
        cvar::FieldVar,
        errors::{
            SnarkyCompilationError, SnarkyError, SnarkyResult, SnarkyRuntimeError,
            SnarkyRuntimeResult,
        },
        snarky_type::SnarkyType,
    },
};
use ark_ff::PrimeField;
use std::borrow::Cow;

/// The two phases a circuit is run in.
/// The same code path is replayed in both, and must produce the same gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Closures run over concrete values, which are stored as the witness.
    Witnessing,
    /// Closures never run, variables are only allocated.
    Emitting,
}

/// A wrapper around [BasicSnarkyConstraint] and [KimchiConstraint] that allows for an optional label (for debugging).
#[derive(Debug)]
pub struct AnnotatedConstraint<F: PrimeField> {
    pub annotation: Option<&'static str>,
    pub loc: Cow<'static, str>,
    pub constraint: Constraint<F>,
}

impl<F> AnnotatedConstraint<F>
where
    F: PrimeField,
{
    /// In witness generation, this checks if the constraint is satisfied by some witness values.
    pub fn check_constraint(&self, env: &impl WitnessGeneration<F>) -> SnarkyRuntimeResult<()> {
        match &self.constraint {
            Constraint::BasicSnarkyConstraint(c) => c.check_constraint(env),
            Constraint::KimchiConstraint(c) => c.check_constraint(env),
        }
    }
}

/// An enum that wraps either a [BasicSnarkyConstraint] or a [KimchiConstraint].
#[derive(Debug)]
pub enum Constraint<F: PrimeField> {
    /// R1CS-like constraints, turned into generic rows.
    BasicSnarkyConstraint(BasicSnarkyConstraint<FieldVar<F>>),

    /// Custom gates.
    KimchiConstraint(KimchiConstraint<FieldVar<F>, F>),
}

/// The state used when compiling a circuit in snarky, or used in witness generation as well.
#[derive(Debug)]
pub struct RunState<F>
where
    F: PrimeField,
{
    /// The constraint system used to build the circuit.
    /// It is built in both modes, so that the two runs can be compared.
    pub system: SnarkyConstraintSystem<F>,

    /// The public input of the circuit used in witness generation.
    /// The public output part is filled once the circuit has returned.
    public_input: Vec<F>,

    pub(crate) public_output: Vec<FieldVar<F>>,

    /// The values of the variables created after the public input, used in witness generation.
    private_input: Vec<F>,

    /// If set, the witness generation will check if the constraints are satisfied.
    /// This is useful to simulate running the circuit and return an error if an assertion fails.
    pub eval_constraints: bool,

    /// The size of the public input part. This contains the public output as well.
    num_public_inputs: usize,

    /// A counter used to track variables (this includes public inputs) as they're being created.
    pub next_var: usize,

    mode: Mode,
}

//
// witness generation
//

/// A witness generation environment.
/// This is passed to any closure in [RunState::compute] so that they can access the witness generation environment.
pub trait WitnessGeneration<F>
where
    F: PrimeField,
{
    /// Allows the caller to obtain the value behind a circuit variable.
    fn read_var(&self, var: &FieldVar<F>) -> F;
}

impl<F: PrimeField, G: WitnessGeneration<F>> WitnessGeneration<F> for &G {
    fn read_var(&self, var: &FieldVar<F>) -> F {
        G::read_var(*self, var)
    }
}

impl<F: PrimeField> WitnessGeneration<F> for &dyn WitnessGeneration<F> {
    fn read_var(&self, var: &FieldVar<F>) -> F {
        (**self).read_var(var)
    }
}

impl<F> WitnessGeneration<F> for RunState<F>
where
    F: PrimeField,
{
    fn read_var(&self, var: &FieldVar<F>) -> F {
        var.eval(&|idx| self.read_var_idx(idx))
    }
}

//
// circuit generation
//

impl<F> RunState<F>
where
    F: PrimeField,
{
    /// Creates a new [Self], allocating the public input and then the public output.
    pub fn new(public_input_size: usize, public_output_size: usize, mode: Mode) -> Self {
        // init
        let num_public_inputs = public_input_size + public_output_size;

        // create the runner
        let mut sys = Self {
            system: SnarkyConstraintSystem::create(num_public_inputs),
            public_input: Vec::with_capacity(num_public_inputs),
            public_output: Vec::with_capacity(public_output_size),
            private_input: vec![],
            eval_constraints: false,
            num_public_inputs,
            next_var: 0,
            mode,
        };

        // allocate the public inputs
        for _ in 0..public_input_size {
            sys.alloc_var();
        }

        // allocate the public output and store it
        for _ in 0..public_output_size {
            let cvar = sys.alloc_var();
            sys.public_output.push(cvar);
        }

        sys
    }

    /// Used internaly to evaluate variables.
    /// Can panic if used with a wrong index.
    pub fn read_var_idx(&self, idx: usize) -> F {
        if idx < self.num_public_inputs {
            self.public_input[idx]
        } else {
            self.private_input[idx - self.num_public_inputs]
        }
    }

    /// Returns the public input, as allocated by [Self::new].
    pub fn public_input<T: SnarkyType<F>>(&self) -> T {
        let cvars = (0..T::SIZE_IN_FIELD_ELEMENTS).map(FieldVar::Var).collect();
        T::from_cvars_unsafe(cvars)
    }

    /// Allocates a new var representing a private input.
    fn alloc_var(&mut self) -> FieldVar<F> {
        let v = self.next_var;
        self.next_var += 1;
        FieldVar::Var(v)
    }

    /// Stores a field element as an unconstrained private input.
    fn store_field_elt(&mut self, x: F) -> FieldVar<F> {
        let v = self.next_var;
        self.next_var += 1;
        self.private_input.push(x);
        FieldVar::Var(v)
    }

    /// Creates a new non-deterministic variable associated to a value type ([SnarkyType]),
    /// and a closure that can compute it when in witness generation mode.
    /// If the type has a [SnarkyType::check], it is applied to the new variables.
    // TODO: attach `_loc` to the errors raised by `check`
    pub fn compute<T, FUNC>(&mut self, _loc: &str, to_compute_value: FUNC) -> SnarkyResult<T>
    where
        T: SnarkyType<F>,
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> T::OutOfCircuit,
    {
        let snarky_type = match self.mode {
            Mode::Witnessing => {
                // compute the value by running the closure
                let value: T::OutOfCircuit = to_compute_value(&*self);

                // convert each field element into a circuit var
                let field_vars = T::value_to_field_elements(&value)
                    .into_iter()
                    .map(|field| self.store_field_elt(field))
                    .collect();

                T::from_cvars_unsafe(field_vars)
            }
            Mode::Emitting => {
                // create enough variables to store the given type
                let cvars = (0..T::SIZE_IN_FIELD_ELEMENTS)
                    .map(|_| self.alloc_var())
                    .collect();

                T::from_cvars_unsafe(cvars)
            }
        };

        // constrain the created circuit variables
        snarky_type.check(self)?;

        Ok(snarky_type)
    }

    /// Runs a prover-only block: it is skipped when emitting, and cannot create constraints.
    /// Its failures are reported as runtime errors.
    pub fn as_prover<FUNC>(&self, label: &'static str, loc: &str, f: FUNC) -> SnarkyResult<()>
    where
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> SnarkyRuntimeResult<()>,
    {
        match self.mode {
            Mode::Witnessing => f(self).map_err(|e| SnarkyError::runtime(e, label, loc.to_string())),
            Mode::Emitting => Ok(()),
        }
    }

    /// Creates a constraint for `assert_eq!(a * b, c)`.
    pub fn assert_r1cs(
        &mut self,
        annotation: Option<&'static str>,
        loc: &str,
        a: FieldVar<F>,
        b: FieldVar<F>,
        c: FieldVar<F>,
    ) -> SnarkyResult<()> {
        if let (Some(a), Some(b), Some(c)) = (a.to_constant(), b.to_constant(), c.to_constant()) {
            return if a * b == c {
                Ok(())
            } else {
                Err(SnarkyCompilationError::ConstantAssertEquals(
                    pretty(a * b),
                    pretty(c),
                )
                .into())
            };
        }
        let constraint = BasicSnarkyConstraint::R1CS(a, b, c);
        self.add_constraint(
            Constraint::BasicSnarkyConstraint(constraint),
            annotation,
            loc,
        )
    }

    /// Creates a constraint for `assert_eq!(x, y)`.
    /// Two constants are compared right away.
    pub fn assert_eq(
        &mut self,
        annotation: Option<&'static str>,
        loc: &str,
        x: FieldVar<F>,
        y: FieldVar<F>,
    ) -> SnarkyResult<()> {
        if let (Some(x), Some(y)) = (x.to_constant(), y.to_constant()) {
            return if x == y {
                Ok(())
            } else {
                Err(SnarkyCompilationError::ConstantAssertEquals(pretty(x), pretty(y)).into())
            };
        }
        let constraint = BasicSnarkyConstraint::Equal(x, y);
        self.add_constraint(
            Constraint::BasicSnarkyConstraint(constraint),
            annotation,
            loc,
        )
    }

    /// Adds a list of [AnnotatedConstraint]s to the circuit.
    pub fn add_constraints(&mut self, constraints: Vec<AnnotatedConstraint<F>>) -> SnarkyResult<()> {
        // We can't evaluate the constraints if we are not computing over a value.
        if self.eval_constraints && self.mode == Mode::Witnessing {
            for constraint in &constraints {
                constraint.check_constraint(&*self).map_err(|error| {
                    SnarkyError::runtime(
                        error,
                        constraint.annotation.unwrap_or("<unknown>"),
                        constraint.loc.clone(),
                    )
                })?;
            }
        }

        for constraint in constraints {
            match constraint.constraint {
                Constraint::BasicSnarkyConstraint(c) => {
                    self.system.add_basic_snarky_constraint(c);
                }
                Constraint::KimchiConstraint(c) => {
                    self.system.add_constraint(c);
                }
            }
        }

        Ok(())
    }

    pub fn add_constraint(
        &mut self,
        constraint: Constraint<F>,
        annotation: Option<&'static str>,
        loc: &str,
    ) -> SnarkyResult<()> {
        self.add_constraints(vec![AnnotatedConstraint {
            annotation,
            loc: Cow::Owned(loc.to_string()),
            constraint,
        }])
    }

    /// Wires the variables returned by the circuit to the public output.
    /// In witness generation, this is also where the public output values are set.
    pub(crate) fn wire_public_output(&mut self, return_cvars: Vec<FieldVar<F>>) -> SnarkyResult<()> {
        // obtain the vars involved in the public output part of the public input
        let public_output_cvars = self.public_output.clone();
        if return_cvars.len() != public_output_cvars.len() {
            return Err(SnarkyError::runtime(
                SnarkyRuntimeError::CircuitReturnVar(return_cvars.len(), public_output_cvars.len()),
                "wiring public output",
                crate::loc!(),
            ));
        }

        if self.mode == Mode::Witnessing {
            let start = self.num_public_inputs - self.public_output.len();
            for (idx, cvar) in return_cvars.iter().enumerate() {
                let value = self.read_var(cvar);
                self.public_input[start + idx] = value;
            }
        }

        // wire these to the public output part of the public input
        for (a, b) in return_cvars.into_iter().zip(public_output_cvars) {
            self.assert_eq(Some("wiring public output"), &crate::loc!(), a, b)?;
        }

        Ok(())
    }

    /// Sets the public input values, before running a circuit in witness generation.
    pub fn generate_witness_init(&mut self, mut public_input: Vec<F>) -> SnarkyResult<()> {
        let obtained = public_input.len();
        let expected = self.num_public_inputs - self.public_output.len();
        if expected != obtained {
            return Err(SnarkyError::runtime(
                SnarkyRuntimeError::PubInputMismatch(obtained, expected),
                "public input",
                crate::loc!(),
            ));
        }

        // pad with zeros for the public output part
        public_input.extend(std::iter::repeat(F::zero()).take(self.public_output.len()));
        self.public_input = public_input;

        Ok(())
    }

    /// Returns the witness table of the circuit, once it has been run in witness generation.
    pub fn witness(&self) -> [Vec<F>; COLUMNS] {
        self.system.compute_witness(|idx| self.read_var_idx(idx))
    }

    /// Returns the values of the public output, once the circuit has been run in witness generation.
    pub fn public_output_values(&self) -> Vec<F> {
        let start = self.num_public_inputs - self.public_output.len();
        self.public_input[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Fp, loc};

    #[test]
    fn test_emitting_never_runs_closures() {
        let mut sys = RunState::<Fp>::new(1, 0, Mode::Emitting);
        let x: FieldVar<Fp> = sys
            .compute(&loc!(), |_| panic!("closures do not run when emitting"))
            .unwrap();
        assert_eq!(x, FieldVar::Var(1));
        sys.as_prover("never", &loc!(), |_| panic!("prover blocks do not run when emitting"))
            .unwrap();
    }

    #[test]
    fn test_witnessing_checks_constraints() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Witnessing);
        sys.eval_constraints = true;
        let x: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(3u64)).unwrap();
        let y: FieldVar<Fp> = sys.compute(&loc!(), |_| Fp::from(4u64)).unwrap();

        let z = x.mul(&y, None, &loc!(), &mut sys).unwrap();
        assert_eq!(sys.read_var(&z), Fp::from(12u64));

        sys.assert_eq(Some("x + y = 7"), &loc!(), &x + &y, FieldVar::constant(Fp::from(7u64)))
            .unwrap();
        let err = sys
            .assert_eq(Some("x = y"), &loc!(), x.clone(), y.clone())
            .unwrap_err();
        match err {
            SnarkyError::RuntimeError { error, label, .. } => {
                assert_eq!(label, "x = y");
                assert_eq!(
                    error,
                    SnarkyRuntimeError::UnsatisfiedEqualConstraint("3".into(), "4".into())
                );
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_constant_assertions_fail_at_compile_time() {
        let mut sys = RunState::<Fp>::new(0, 0, Mode::Emitting);
        let one = FieldVar::constant(Fp::from(1u64));
        let two = FieldVar::constant(Fp::from(2u64));
        sys.assert_eq(None, &loc!(), one.clone(), one.clone()).unwrap();
        assert!(matches!(
            sys.assert_eq(None, &loc!(), one.clone(), two.clone()),
            Err(SnarkyError::CompilationError(
                SnarkyCompilationError::ConstantAssertEquals(..)
            ))
        ));
        sys.assert_r1cs(None, &loc!(), two.clone(), two.clone(), FieldVar::constant(Fp::from(4u64)))
            .unwrap();
        assert_eq!(sys.system.num_rows(), 0);
    }

    #[test]
    fn test_as_prover_errors_carry_location() {
        let sys = RunState::<Fp>::new(0, 0, Mode::Witnessing);
        let err = sys
            .as_prover("sanity", "here.rs:1", |_| {
                Err(SnarkyRuntimeError::ValueTooLarge("256".into(), 8))
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "a runtime error occurred in `sanity` at here.rs:1: the value 256 does not fit in 8 bits"
        );
    }
}
