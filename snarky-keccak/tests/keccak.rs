use rand::{rngs::StdRng, Rng, SeedableRng};
use sha3::{Digest, Keccak256, Keccak512, Sha3_256, Sha3_384, Sha3_512};
use snarky_keccak::{
    circuits::gate::{CircuitGate, GateType},
    field::Fp,
    keccak::circuit::{KeccakCircuit, Sha3Variant},
    snarky::api::SnarkyCircuit,
};

fn circuit_digest(variant: Sha3Variant, message: &[u8]) -> Vec<Fp> {
    let compiled = KeccakCircuit::new(variant, message.len())
        .compile()
        .unwrap();
    let (witness, digest) = compiled.generate_witness((), &message.to_vec()).unwrap();
    assert_eq!(witness.num_rows(), compiled.gates.len());
    digest
}

fn to_field(bytes: &[u8]) -> Vec<Fp> {
    bytes.iter().map(|b| Fp::from(*b as u64)).collect()
}

fn random_message(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

#[test]
fn test_empty_message_vectors() {
    let expected =
        hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470").unwrap();
    assert_eq!(circuit_digest(Sha3Variant::Ethereum, &[]), to_field(&expected));

    let expected =
        hex::decode("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a").unwrap();
    assert_eq!(
        circuit_digest(Sha3Variant::Nist { output_bits: 256 }, &[]),
        to_field(&expected)
    );
}

#[test]
fn test_ethereum_matches_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    // one block, a message filling the rate exactly, and two blocks
    for len in [1, 136, 200] {
        let message = random_message(&mut rng, len);
        let expected = Keccak256::digest(&message);
        assert_eq!(
            circuit_digest(Sha3Variant::Ethereum, &message),
            to_field(&expected),
            "message of {len} bytes"
        );
    }
}

#[test]
fn test_nist_matches_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    let message = random_message(&mut rng, 71);

    let digest = circuit_digest(Sha3Variant::Nist { output_bits: 256 }, &message);
    assert_eq!(digest, to_field(&Sha3_256::digest(&message)));

    let digest = circuit_digest(Sha3Variant::Nist { output_bits: 384 }, &message);
    assert_eq!(digest, to_field(&Sha3_384::digest(&message)));

    let digest = circuit_digest(Sha3Variant::Nist { output_bits: 512 }, &message);
    assert_eq!(digest, to_field(&Sha3_512::digest(&message)));
}

#[test]
fn test_pre_nist_matches_reference() {
    let mut rng = StdRng::seed_from_u64(11);
    let message = random_message(&mut rng, 72);
    let digest = circuit_digest(Sha3Variant::PreNist { output_bits: 512 }, &message);
    assert_eq!(digest, to_field(&Keccak512::digest(&message)));
}

#[test]
fn test_unsupported_variant_fails_to_compile() {
    assert!(KeccakCircuit::new(Sha3Variant::Nist { output_bits: 224 }, 0)
        .compile()
        .is_err());
    assert!(KeccakCircuit::new(Sha3Variant::PreNist { output_bits: 160 }, 0)
        .compile()
        .is_err());
}

#[test]
fn test_gates_export() {
    let compiled = KeccakCircuit::new(Sha3Variant::Ethereum, 1)
        .compile()
        .unwrap();
    assert_eq!(compiled.public_input_size(), 32);
    assert!(compiled.gates[..32]
        .iter()
        .all(|gate| gate.typ == GateType::Generic));
    for typ in [
        GateType::Xor16,
        GateType::Zero,
        GateType::Rot64,
        GateType::RangeCheck0,
        GateType::Lookup,
    ] {
        assert!(compiled.gates.iter().any(|gate| gate.typ == typ), "{typ:?}");
    }

    let json = serde_json::to_value(&compiled.gates).unwrap();
    // coefficients are hex-encoded field elements
    assert!(json[0]["coeffs"][0].is_string());

    let gates: Vec<CircuitGate<Fp>> = serde_json::from_value(json).unwrap();
    assert_eq!(gates, compiled.gates);
}

#[test]
fn test_compilation_is_deterministic() {
    let variant = Sha3Variant::Nist { output_bits: 256 };
    let first = KeccakCircuit::new(variant, 5).compile().unwrap();
    let second = KeccakCircuit::new(variant, 5).compile().unwrap();
    assert_eq!(first.gates, second.gates);
    assert_eq!(first.asm(), second.asm());
}
