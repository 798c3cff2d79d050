use ark_ff::{
    fields::{Fp256, MontBackend, MontConfig},
    One, Zero,
};
use field_utils::{
    serialization::HexField, BigUintHelpers, FieldHelpers, FieldHelpersError, Two,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[derive(MontConfig)]
#[modulus = "28948022309329048855892746252171976963363056481941560715954676764349967630337"]
#[generator = "5"]
pub struct FqConfig;
pub type BaseField = Fp256<MontBackend<FqConfig, 4>>;

#[test]
fn field_sizes() {
    assert_eq!(BaseField::size_in_bits(), 255);
    assert_eq!(
        BaseField::modulus_biguint().to_string(),
        "28948022309329048855892746252171976963363056481941560715954676764349967630337"
    );
}

#[test]
fn field_hex() {
    assert_eq!(
        BaseField::from_hex(""),
        Err(FieldHelpersError::DeserializeBytes)
    );
    assert_eq!(
        BaseField::from_hex("1428fadcf0c02396e620f14f176fddb5d769b7de2027469d027a80142ef8f07"),
        Err(FieldHelpersError::DecodeHex)
    );
    assert_eq!(
        BaseField::from_hex("g64244176fddb5d769b7de2027469d027ad428fadcf0c02396e6280142efb7d8"),
        Err(FieldHelpersError::DecodeHex)
    );
    // top byte 0xff is above the modulus
    assert_eq!(
        BaseField::from_hex("00000000000000000000000000000000000000000000000000000000000000ff"),
        Err(FieldHelpersError::DeserializeBytes)
    );

    let field_hex = "f2eee8d8f6e5fb182c610cae6c5393fce69dc4d900e7b4923b074e54ad00fb36";
    assert_eq!(
        BaseField::from_hex(field_hex)
            .expect("Failed to deserialize field hex")
            .to_hex(),
        field_hex
    );
}

#[test]
fn field_bytes() {
    let fe =
        BaseField::from_hex("2cc3342ad3cd516175b8f0d0189bc3bdcb7947a4cc96c7cfc8d5df10cc443832")
            .expect("Failed to deserialize field hex");

    let bytes = fe.to_bytes();
    assert_eq!(bytes.len(), 32);
    assert_eq!(
        BaseField::from_bytes(&bytes).expect("Failed to deserialize field bytes"),
        fe
    );
    assert_eq!(
        BaseField::from_bytes(&bytes[..31]),
        Err(FieldHelpersError::DeserializeBytes)
    );

    assert_eq!(BaseField::one().to_bytes()[0], 1);
    assert_eq!(BaseField::zero().to_bytes(), vec![0; 32]);
}

#[test]
fn field_biguint() {
    let big = BigUint::from(0xdead_beef_u64);
    assert_eq!(BaseField::from(big.clone()).to_biguint(), big);
    assert_eq!(
        (-BaseField::one()).to_biguint(),
        BaseField::modulus_biguint() - 1u8
    );
}

#[test]
fn field_two_pow() {
    assert_eq!(BaseField::two_pow(0), BaseField::one());
    assert_eq!(BaseField::two_pow(10), BaseField::from(1024u64));
    assert_eq!(
        BaseField::two_pow(200).to_biguint(),
        BigUint::two_pow(200)
    );
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Coefficients {
    #[serde_as(as = "Vec<HexField>")]
    coeffs: Vec<BaseField>,
}

#[test]
fn field_hex_serde() {
    let value = Coefficients {
        coeffs: vec![BaseField::one(), BaseField::from(256u64)],
    };
    let json = serde_json::to_string(&value).expect("Failed to serialize");
    assert_eq!(
        json,
        r#"{"coeffs":["0100000000000000000000000000000000000000000000000000000000000000","0001000000000000000000000000000000000000000000000000000000000000"]}"#
    );
    let back: Coefficients = serde_json::from_str(&json).expect("Failed to deserialize");
    assert_eq!(back, value);

    let bad = r#"{"coeffs":["zz"]}"#;
    assert!(serde_json::from_str::<Coefficients>(bad).is_err());
}
