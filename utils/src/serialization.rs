//! Serialization of [arkworks](http://arkworks.rs/) field elements with [serde].
//!
//! Field elements are written as the hex encoding of their canonical little-endian bytes,
//! which keeps exported circuits readable as JSON.
//! Simply add annotations like `#[serde_as(as = "Vec<field_utils::serialization::HexField>")]`.

use crate::field_helpers::FieldHelpers;
use ark_ff::PrimeField;
use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// [serde_with] adapter encoding a prime field element as a hex string
pub struct HexField;

impl<F> SerializeAs<F> for HexField
where
    F: PrimeField,
{
    fn serialize_as<S>(val: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&val.to_hex())
    }
}

impl<'de, F> DeserializeAs<'de, F> for HexField
where
    F: PrimeField,
{
    fn deserialize_as<D>(deserializer: D) -> Result<F, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        F::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
