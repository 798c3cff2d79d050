use snarky_keccak::{
    field::Fp,
    gadgets::{xor, DEFAULT_NIBBLE_WIDTH},
    snarky::{api::SnarkyCircuit, errors::SnarkyRuntimeError, prelude::*},
};

/// XORs its two private inputs, with an extra row when the private input is known.
struct Branching {
    branch_on_input: bool,
}

impl SnarkyCircuit for Branching {
    type Field = Fp;
    type PrivateInput = (u64, u64);
    type PublicInput = ();

    fn public_output_size(&self) -> usize {
        1
    }

    fn circuit(
        &self,
        sys: &mut RunState<Fp>,
        _public_input: (),
        private_input: Option<&(u64, u64)>,
    ) -> SnarkyResult<Vec<FieldVar<Fp>>> {
        let a: FieldVar<Fp> =
            sys.compute(&loc!(), |_| Fp::from(private_input.map(|p| p.0).unwrap_or_default()))?;
        let b: FieldVar<Fp> =
            sys.compute(&loc!(), |_| Fp::from(private_input.map(|p| p.1).unwrap_or_default()))?;

        if self.branch_on_input && private_input.is_some() {
            sys.assert_eq(Some("extra"), &loc!(), a.clone(), a.clone())?;
        }

        let out = xor(sys, &loc!(), &a, &b, 64, DEFAULT_NIBBLE_WIDTH)?;
        Ok(vec![out])
    }
}

#[test]
fn test_witness_replays_compiled_gates() {
    let compiled = Branching {
        branch_on_input: false,
    }
    .compile()
    .unwrap();
    let (witness, output) = compiled.generate_witness((), &(0xff00, 0x0ff0)).unwrap();
    assert_eq!(output, vec![Fp::from(0xf0f0u64)]);
    assert_eq!(witness.num_rows(), compiled.gates.len());
}

#[test]
fn test_non_reproducible_circuit_is_rejected() {
    let compiled = Branching {
        branch_on_input: true,
    }
    .compile()
    .unwrap();
    let err = compiled.generate_witness((), &(1, 2)).unwrap_err();
    assert!(matches!(
        err.runtime_error(),
        Some(SnarkyRuntimeError::NonReproducibleCircuit(_))
    ));
}
