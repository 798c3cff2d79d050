use ark_ff::PrimeField;
use num_bigint::BigUint;
use thiserror::Error;

// Field helpers error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHelpersError {
    #[error("failed to deserialize field bytes")]
    DeserializeBytes,
    #[error("failed to decode hex")]
    DecodeHex,
}
pub type Result<T> = std::result::Result<T, FieldHelpersError>;

/// Field element helpers
pub trait FieldHelpers<F> {
    /// Deserialize from little-endian bytes
    fn from_bytes(bytes: &[u8]) -> Result<F>;

    /// Deserialize from hex
    fn from_hex(hex: &str) -> Result<F>;

    /// Serialize to bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Serialize to hex
    fn to_hex(&self) -> String;

    /// Serialize to BigUint
    fn to_biguint(&self) -> BigUint;

    /// Field size in bits
    fn size_in_bits() -> usize;

    /// Get the modulus as `BigUint`
    fn modulus_biguint() -> BigUint;
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn from_bytes(bytes: &[u8]) -> Result<F> {
        F::deserialize_compressed(bytes).map_err(|_| FieldHelpersError::DeserializeBytes)
    }

    fn from_hex(hex: &str) -> Result<F> {
        let bytes: Vec<u8> = hex::decode(hex).map_err(|_| FieldHelpersError::DecodeHex)?;
        F::from_bytes(&bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![];
        self.serialize_compressed(&mut bytes)
            .expect("Failed to serialize field");
        bytes
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn to_biguint(&self) -> BigUint {
        (*self).into()
    }

    fn size_in_bits() -> usize {
        F::MODULUS_BIT_SIZE as usize
    }

    fn modulus_biguint() -> BigUint {
        F::MODULUS.into()
    }
}

/// Powers of two as field elements
pub trait Two<F> {
    /// Returns `2^exp`
    fn two_pow(exp: u64) -> F;
}

impl<F: PrimeField> Two<F> for F {
    fn two_pow(exp: u64) -> F {
        F::from(2u64).pow([exp])
    }
}
