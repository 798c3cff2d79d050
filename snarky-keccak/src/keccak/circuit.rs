//! A ready-made circuit hashing a private message of a fixed length.

use crate::{
    field::Fp,
    keccak::{ethereum, nist_sha3, pre_nist},
    snarky::{
        api::SnarkyCircuit,
        byte::Byte,
        errors::{SnarkyError, SnarkyRuntimeError},
        prelude::*,
    },
};
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

/// The instances of Keccak the circuit can compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "variant")]
pub enum Sha3Variant {
    /// SHA-3 as standardized by NIST
    Nist { output_bits: usize },
    /// Keccak with its original padding
    PreNist { output_bits: usize },
    /// Keccak-256
    Ethereum,
}

impl Sha3Variant {
    /// The length of the digest, in bytes.
    pub fn output_bytes(&self) -> usize {
        match self {
            Sha3Variant::Nist { output_bits } | Sha3Variant::PreNist { output_bits } => {
                output_bits / 8
            }
            Sha3Variant::Ethereum => 32,
        }
    }

    /// Hashes `message` with this instance.
    pub fn digest<F: PrimeField>(
        &self,
        sys: &mut RunState<F>,
        loc: &str,
        message: &[Byte<F>],
    ) -> SnarkyResult<Vec<Byte<F>>> {
        match self {
            Sha3Variant::Nist { output_bits } => nist_sha3(sys, loc, *output_bits, message),
            Sha3Variant::PreNist { output_bits } => pre_nist(sys, loc, *output_bits, message),
            Sha3Variant::Ethereum => ethereum(sys, loc, message),
        }
    }
}

/// Hashes a private message of `message_length` bytes.
/// The digest bytes are the public output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeccakCircuit {
    pub variant: Sha3Variant,
    pub message_length: usize,
}

impl KeccakCircuit {
    pub fn new(variant: Sha3Variant, message_length: usize) -> Self {
        Self {
            variant,
            message_length,
        }
    }
}

impl SnarkyCircuit for KeccakCircuit {
    type Field = Fp;
    type PrivateInput = Vec<u8>;
    type PublicInput = ();

    fn public_output_size(&self) -> usize {
        self.variant.output_bytes()
    }

    fn circuit(
        &self,
        sys: &mut RunState<Fp>,
        _public_input: Self::PublicInput,
        private_input: Option<&Self::PrivateInput>,
    ) -> SnarkyResult<Vec<FieldVar<Fp>>> {
        if let Some(message) = private_input {
            if message.len() != self.message_length {
                return Err(SnarkyError::runtime(
                    SnarkyRuntimeError::PrivateInputMismatch(message.len(), self.message_length),
                    "keccak message",
                    loc!(),
                ));
            }
        }

        let mut message = Vec::with_capacity(self.message_length);
        for i in 0..self.message_length {
            let byte: Byte<Fp> = sys.compute(&loc!(), |_| {
                private_input
                    .and_then(|message| message.get(i).copied())
                    .unwrap_or_default()
            })?;
            message.push(byte);
        }

        let digest = self.variant.digest(sys, &loc!(), &message)?;
        Ok(digest.into_iter().map(Byte::into_var).collect())
    }
}
