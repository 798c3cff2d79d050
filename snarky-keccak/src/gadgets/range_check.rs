//! Range checks: 64-bit values through a `RangeCheck0` row, bytes through a lookup.

use crate::{
    circuits::lookup::GateLookupTable,
    gadgets::check_constant_fits,
    snarky::{
        constraint_system::{KimchiConstraint, CRUMBS, CRUMBS_BITS, LIMBS},
        prelude::*,
        runner::Constraint,
    },
};
use ark_ff::PrimeField;
use field_utils::{BigUintHelpers, FieldHelpers};
use std::array;

/// Witnesses the decomposition of a value of up to 64 bits:
/// eight 2-bit crumbs for the low 16 bits, then four 12-bit limbs.
pub(crate) fn decompose64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    value: &FieldVar<F>,
) -> SnarkyResult<([FieldVar<F>; LIMBS], [FieldVar<F>; CRUMBS])> {
    sys.compute(loc, |env| {
        let value = env.read_var(value).to_biguint();
        let limbs = array::from_fn(|j| {
            let start = CRUMBS_BITS + 12 * j;
            F::from(value.bits_between(start, start + 12))
        });
        let crumbs = array::from_fn(|i| F::from(value.bits_between(2 * i, 2 * i + 2)));
        (limbs, crumbs)
    })
}

/// Constrains `x` to fit in 64 bits.
pub fn range_check64<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    x: &FieldVar<F>,
) -> SnarkyResult<()> {
    if let Some(x) = x.to_constant() {
        return check_constant_fits(x, 64);
    }

    let value = x.seal(sys, loc)?;
    let (limbs, crumbs) = decompose64(sys, loc, &value)?;
    let constraint = KimchiConstraint::RangeCheck0 {
        value,
        limbs,
        crumbs,
    };
    sys.add_constraint(
        Constraint::KimchiConstraint(constraint),
        Some("range_check64"),
        loc,
    )
}

/// Constrains `x` to fit in 8 bits,
/// by looking up both `x` and `16 * x` in the 12-bit range table.
pub fn range_check8<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: &str,
    x: &FieldVar<F>,
) -> SnarkyResult<()> {
    if let Some(x) = x.to_constant() {
        return check_constant_fits(x, 8);
    }

    let x = x.seal(sys, loc)?;
    let x16 = x.scale(F::from(16u64)).seal(sys, loc)?;
    let constraint = KimchiConstraint::Lookup {
        table: GateLookupTable::RangeCheck,
        values: vec![x, x16],
    };
    sys.add_constraint(
        Constraint::KimchiConstraint(constraint),
        Some("range_check8"),
        loc,
    )
}
