//! The constraint system: turns constraints on circuit variables into gate rows,
//! then into gates (with their copy constraints) and a witness table.

use crate::{
    circuits::{
        asm::pretty,
        gate::{CircuitGate, GateType, GENERIC_COEFFS},
        lookup::GateLookupTable,
        wires::{Wire, COLUMNS, PERMUTS},
    },
    snarky::{
        cvar::FieldVar,
        errors::{SnarkyRuntimeError, SnarkyRuntimeResult},
        runner::WitnessGeneration,
    },
};
use ark_ff::PrimeField;
use field_utils::{FieldHelpers, Two};
use itertools::Itertools;
use std::{array, collections::HashMap};

/// Number of 12-bit limbs in a 64-bit decomposition.
pub const LIMBS: usize = 4;

/// Number of 2-bit crumbs in a 64-bit decomposition.
pub const CRUMBS: usize = 8;

/// Bits covered by the crumbs, which hold the low part of the value.
pub const CRUMBS_BITS: usize = 2 * CRUMBS;

/// R1CS-like constraints.
#[derive(Clone, Debug)]
pub enum BasicSnarkyConstraint<Var> {
    Equal(Var, Var),
    R1CS(Var, Var, Var),
}

/// Custom gate constraints.
/// The cells of a custom gate should be sealed variables,
/// so that no generic row gets inserted in the middle of a chain of gates.
#[derive(Clone, Debug)]
pub enum KimchiConstraint<Var, Field> {
    /// One row of a XOR chain:
    /// each of `in1`, `in2` and `out` is equal to its four nibbles plus `2^(4w)` times its value in `next`,
    /// and each triple of nibbles is in the XOR table.
    /// `next` lives in the following row.
    Xor {
        in1: Var,
        in2: Var,
        out: Var,
        in1_nibbles: [Var; 4],
        in2_nibbles: [Var; 4],
        out_nibbles: [Var; 4],
        next: [Var; 3],
        nibble_width: usize,
    },
    /// A row without constraints, holding the end of a XOR chain.
    Zero([Var; 3]),
    /// `value = sum(crumbs[i] * 2^(2i)) + sum(limbs[j] * 2^(16 + 12j))`,
    /// with 12-bit limbs (lookups) and 2-bit crumbs.
    RangeCheck0 {
        value: Var,
        limbs: [Var; LIMBS],
        crumbs: [Var; CRUMBS],
    },
    /// `word * 2^r = excess * 2^64 + shifted`, `rotated = shifted + excess`,
    /// and `excess - 2^r + 2^64` decomposes into 64 bits.
    /// `shifted` lives in the following row.
    Rot64 {
        word: Var,
        rotated: Var,
        excess: Var,
        shifted: Var,
        bound_limbs: [Var; LIMBS],
        bound_crumbs: [Var; CRUMBS],
        two_to_rot: Field,
    },
    /// Each group of `table.width()` values is an entry of the table.
    Lookup {
        table: GateLookupTable,
        values: Vec<Var>,
    },
}

impl<F: PrimeField> BasicSnarkyConstraint<FieldVar<F>> {
    /// Checks the constraint against the values of the witness.
    pub fn check_constraint(&self, env: &impl WitnessGeneration<F>) -> SnarkyRuntimeResult<()> {
        match self {
            BasicSnarkyConstraint::Equal(x, y) => {
                let x = env.read_var(x);
                let y = env.read_var(y);
                if x != y {
                    return Err(SnarkyRuntimeError::UnsatisfiedEqualConstraint(
                        pretty(x),
                        pretty(y),
                    ));
                }
            }
            BasicSnarkyConstraint::R1CS(a, b, c) => {
                let a = env.read_var(a);
                let b = env.read_var(b);
                let c = env.read_var(c);
                if a * b != c {
                    return Err(SnarkyRuntimeError::UnsatisfiedR1CSConstraint(
                        pretty(a),
                        pretty(b),
                        pretty(c),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Recombines a 64-bit decomposition.
fn compose64<F: PrimeField>(limbs: &[F; LIMBS], crumbs: &[F; CRUMBS]) -> F {
    let low = crumbs
        .iter()
        .rev()
        .fold(F::zero(), |acc, crumb| acc * F::from(4u64) + crumb);
    let high = limbs
        .iter()
        .rev()
        .fold(F::zero(), |acc, limb| acc * F::two_pow(12) + limb);
    low + high * F::two_pow(CRUMBS_BITS as u64)
}

/// Checks that `value` is decomposed by the limbs and crumbs,
/// that the limbs are in the range check table and that the crumbs have 2 bits.
fn check_decomposition64<F: PrimeField>(
    value: F,
    limbs: &[F; LIMBS],
    crumbs: &[F; CRUMBS],
) -> SnarkyRuntimeResult<()> {
    for limb in limbs {
        if !GateLookupTable::RangeCheck.contains(&[*limb]) {
            return Err(SnarkyRuntimeError::LookupMiss(
                GateLookupTable::RangeCheck.to_string(),
                pretty(*limb),
            ));
        }
    }
    for crumb in crumbs {
        if crumb.to_biguint().bits() > 2 {
            return Err(SnarkyRuntimeError::ValueTooLarge(pretty(*crumb), 2));
        }
    }
    let sum = compose64(limbs, crumbs);
    if sum != value {
        return Err(SnarkyRuntimeError::UnsatisfiedDecomposition(
            pretty(value),
            pretty(sum),
        ));
    }
    Ok(())
}

impl<F: PrimeField> KimchiConstraint<FieldVar<F>, F> {
    /// Checks the constraint against the values of the witness.
    pub fn check_constraint(&self, env: &impl WitnessGeneration<F>) -> SnarkyRuntimeResult<()> {
        let read = |var: &FieldVar<F>| env.read_var(var);
        let read_all = |vars: &[FieldVar<F>]| vars.iter().map(read).collect_vec();

        match self {
            KimchiConstraint::Xor {
                in1,
                in2,
                out,
                in1_nibbles,
                in2_nibbles,
                out_nibbles,
                next,
                nibble_width,
            } => {
                let base = F::two_pow(*nibble_width as u64);
                let operands = [
                    (in1, in1_nibbles, &next[0]),
                    (in2, in2_nibbles, &next[1]),
                    (out, out_nibbles, &next[2]),
                ];
                for (value, nibbles, next) in operands {
                    let value = read(value);
                    let sum = nibbles
                        .iter()
                        .rev()
                        .fold(read(next), |acc, nibble| acc * base + read(nibble));
                    if value != sum {
                        return Err(SnarkyRuntimeError::UnsatisfiedDecomposition(
                            pretty(value),
                            pretty(sum),
                        ));
                    }
                }

                let table = GateLookupTable::Xor {
                    nibble_width: *nibble_width,
                };
                for k in 0..4 {
                    let entry = [
                        read(&in1_nibbles[k]),
                        read(&in2_nibbles[k]),
                        read(&out_nibbles[k]),
                    ];
                    if !table.contains(&entry) {
                        return Err(SnarkyRuntimeError::LookupMiss(
                            table.to_string(),
                            entry.iter().map(|x| pretty(*x)).join(", "),
                        ));
                    }
                }
                Ok(())
            }
            KimchiConstraint::Zero(_) => Ok(()),
            KimchiConstraint::RangeCheck0 {
                value,
                limbs,
                crumbs,
            } => {
                let limbs = array::from_fn(|i| read(&limbs[i]));
                let crumbs = array::from_fn(|i| read(&crumbs[i]));
                check_decomposition64(read(value), &limbs, &crumbs)
            }
            KimchiConstraint::Rot64 {
                word,
                rotated,
                excess,
                shifted,
                bound_limbs,
                bound_crumbs,
                two_to_rot,
            } => {
                let [word, rotated, excess, shifted] = [word, rotated, excess, shifted].map(read);
                let two_to_64 = F::two_pow(64);
                if word * two_to_rot != excess * two_to_64 + shifted {
                    return Err(SnarkyRuntimeError::UnsatisfiedRotation(
                        pretty(word),
                        pretty(*two_to_rot),
                        pretty(excess),
                        pretty(shifted),
                    ));
                }
                if rotated != shifted + excess {
                    return Err(SnarkyRuntimeError::UnsatisfiedRotatedWord(
                        pretty(rotated),
                        pretty(shifted),
                        pretty(excess),
                    ));
                }
                let limbs = array::from_fn(|i| read(&bound_limbs[i]));
                let crumbs = array::from_fn(|i| read(&bound_crumbs[i]));
                check_decomposition64(excess - two_to_rot + two_to_64, &limbs, &crumbs)
            }
            KimchiConstraint::Lookup { table, values } => {
                for entry in read_all(values).chunks(table.width()) {
                    if !table.contains(entry) {
                        return Err(SnarkyRuntimeError::LookupMiss(
                            table.to_string(),
                            entry.iter().map(|x| pretty(*x)).join(", "),
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

//
// Rows
//

/// A variable of the constraint system.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum V {
    /// An external variable (generated by snarky, via [crate::snarky::runner::RunState::compute]).
    External(usize),
    /// An internal variable is generated to hold an intermediate value
    /// (e.g., in reducing linear combinations to single positions).
    Internal(usize),
}

/// A row of the constraint system, before wiring.
#[derive(Clone, Debug)]
struct Row<F> {
    typ: GateType,
    cells: [Option<V>; COLUMNS],
    coeffs: Vec<F>,
}

/// A scaled variable in a generic row.
type Cell<F> = Option<(F, V)>;

/// The constraint system.
#[derive(Debug)]
pub struct SnarkyConstraintSystem<F>
where
    F: PrimeField,
{
    /// The size of the public input (which fills the first rows of our constraint system).
    public_input_size: usize,
    /// The rows added after the public input rows.
    rows: Vec<Row<F>>,
    /// How to compute each internal variable (as a linear combination of other variables).
    internal_vars: Vec<(Vec<(F, V)>, F)>,
    /// [V]s corresponding to constant values. We reuse them so we don't need to
    /// use a fresh generic constraint each time to create a constant.
    cached_constants: HashMap<F, V>,
}

impl<F> SnarkyConstraintSystem<F>
where
    F: PrimeField,
{
    /// Creates an empty constraint system with `public_input_size` public input rows.
    pub fn create(public_input_size: usize) -> Self {
        Self {
            public_input_size,
            rows: vec![],
            internal_vars: vec![],
            cached_constants: HashMap::new(),
        }
    }

    /// The number of rows, including the public input rows.
    pub fn num_rows(&self) -> usize {
        self.public_input_size + self.rows.len()
    }

    pub fn public_input_size(&self) -> usize {
        self.public_input_size
    }

    fn create_internal(&mut self, terms: Vec<(F, V)>, constant: F) -> V {
        self.internal_vars.push((terms, constant));
        V::Internal(self.internal_vars.len() - 1)
    }

    fn add_row(&mut self, typ: GateType, cells: &[Option<V>], coeffs: Vec<F>) {
        let mut row = [None; COLUMNS];
        row[..cells.len()].copy_from_slice(cells);
        self.rows.push(Row {
            typ,
            cells: row,
            coeffs,
        });
    }

    /// Adds `cl * l + cr * r + co * o + m * l * r + c = 0`.
    fn add_generic_row(&mut self, l: Cell<F>, r: Cell<F>, o: Cell<F>, m: F, c: F) {
        let coeff = |cell: Cell<F>| cell.map(|(s, _)| s).unwrap_or_else(F::zero);
        let var = |cell: Cell<F>| cell.map(|(_, v)| v);
        let coeffs = vec![coeff(l), coeff(r), coeff(o), m, c];
        debug_assert_eq!(coeffs.len(), GENERIC_COEFFS);
        self.add_row(GateType::Generic, &[var(l), var(r), var(o)], coeffs);
    }

    /// Reduces a linear combination to a constant and at most one scaled variable,
    /// adding one generic row per intermediate sum.
    fn reduce_lincom(&mut self, x: &FieldVar<F>) -> (F, Cell<F>) {
        let (constant, terms) = x.to_constant_and_terms();
        let constant = constant.unwrap_or_else(F::zero);

        // merge duplicated variables, keeping the order of first appearance
        let mut merged: Vec<(F, usize)> = vec![];
        for (scale, var) in terms {
            match merged.iter_mut().find(|(_, v)| *v == var) {
                Some((s, _)) => *s += scale,
                None => merged.push((scale, var)),
            }
        }
        merged.retain(|(s, _)| !s.is_zero());

        let mut terms = merged.into_iter().map(|(s, v)| (s, V::External(v)));
        let Some(first) = terms.next() else {
            return (constant, None);
        };

        let mut acc = first;
        for term in terms {
            let res = self.create_internal(vec![acc, term], F::zero());
            self.add_generic_row(
                Some(acc),
                Some(term),
                Some((-F::one(), res)),
                F::zero(),
                F::zero(),
            );
            acc = (F::one(), res);
        }
        (constant, Some(acc))
    }

    /// Returns a single variable holding the value of `x`.
    fn reduce_to_v(&mut self, x: &FieldVar<F>) -> V {
        if let Some(v) = x.to_var_index() {
            return V::External(v);
        }
        match self.reduce_lincom(x) {
            (constant, Some((scale, var))) if constant.is_zero() && scale.is_one() => var,
            (constant, Some((scale, var))) => {
                let res = self.create_internal(vec![(scale, var)], constant);
                self.add_generic_row(
                    Some((scale, var)),
                    None,
                    Some((-F::one(), res)),
                    F::zero(),
                    constant,
                );
                res
            }
            (constant, None) => {
                if let Some(v) = self.cached_constants.get(&constant) {
                    return *v;
                }
                let res = self.create_internal(vec![], constant);
                self.add_generic_row(None, None, Some((-F::one(), res)), F::zero(), constant);
                self.cached_constants.insert(constant, res);
                res
            }
        }
    }

    /// Adds the generic rows enforcing a [BasicSnarkyConstraint].
    pub fn add_basic_snarky_constraint(&mut self, constraint: BasicSnarkyConstraint<FieldVar<F>>) {
        match constraint {
            BasicSnarkyConstraint::Equal(x, y) => {
                let (cx, x) = self.reduce_lincom(&x);
                let (cy, y) = self.reduce_lincom(&y);
                let y = y.map(|(s, v)| (-s, v));
                match (x, y) {
                    (Some(_), _) => self.add_generic_row(x, y, None, F::zero(), cx - cy),
                    (None, Some(_)) => self.add_generic_row(y, None, None, F::zero(), cx - cy),
                    // both sides are constants, compared when the constraint was created
                    (None, None) => (),
                }
            }
            BasicSnarkyConstraint::R1CS(a, b, c) => {
                // (ca + sa * a) * (cb + sb * b) = cc + sc * c
                let (ca, a) = self.reduce_lincom(&a);
                let (cb, b) = self.reduce_lincom(&b);
                let (cc, c) = self.reduce_lincom(&c);
                let m = match (a, b) {
                    (Some((sa, _)), Some((sb, _))) => sa * sb,
                    _ => F::zero(),
                };
                let l = a.map(|(sa, va)| (sa * cb, va));
                let r = b.map(|(sb, vb)| (sb * ca, vb));
                let o = c.map(|(sc, vc)| (-sc, vc));
                self.add_generic_row(l, r, o, m, ca * cb - cc);
            }
        }
    }

    /// Adds the row of a [KimchiConstraint].
    pub fn add_constraint(&mut self, constraint: KimchiConstraint<FieldVar<F>, F>) {
        match constraint {
            KimchiConstraint::Xor {
                in1,
                in2,
                out,
                in1_nibbles,
                in2_nibbles,
                out_nibbles,
                next: _,
                nibble_width,
            } => {
                let vars = [&in1, &in2, &out]
                    .into_iter()
                    .chain(&in1_nibbles)
                    .chain(&in2_nibbles)
                    .chain(&out_nibbles)
                    .map(|x| Some(self.reduce_to_v(x)))
                    .collect_vec();
                let coeffs = vec![F::two_pow(nibble_width as u64)];
                self.add_row(GateType::Xor16, &vars, coeffs);
            }
            KimchiConstraint::Zero(vars) => {
                let vars = vars.iter().map(|x| Some(self.reduce_to_v(x))).collect_vec();
                self.add_row(GateType::Zero, &vars, vec![]);
            }
            KimchiConstraint::RangeCheck0 {
                value,
                limbs,
                crumbs,
            } => {
                let value = Some(self.reduce_to_v(&value));
                let mut vars = vec![value, None, None];
                vars.extend(limbs.iter().chain(&crumbs).map(|x| Some(self.reduce_to_v(x))));
                self.add_row(GateType::RangeCheck0, &vars, vec![F::zero()]);
            }
            KimchiConstraint::Rot64 {
                word,
                rotated,
                excess,
                shifted: _,
                bound_limbs,
                bound_crumbs,
                two_to_rot,
            } => {
                let vars = [&word, &rotated, &excess]
                    .into_iter()
                    .chain(&bound_limbs)
                    .chain(&bound_crumbs)
                    .map(|x| Some(self.reduce_to_v(x)))
                    .collect_vec();
                self.add_row(GateType::Rot64, &vars, vec![two_to_rot]);
            }
            KimchiConstraint::Lookup { table, values } => {
                let vars = values
                    .iter()
                    .map(|x| Some(self.reduce_to_v(x)))
                    .collect_vec();
                self.add_row(GateType::Lookup, &vars, vec![F::from(table.id() as u64)]);
            }
        }
    }

    /// The rows of the whole circuit: the public input rows first, then the other rows.
    fn all_rows(&self) -> impl Iterator<Item = Row<F>> + '_ {
        let public_rows = (0..self.public_input_size).map(|i| {
            let mut cells = [None; COLUMNS];
            cells[0] = Some(V::External(i));
            let mut coeffs = vec![F::zero(); GENERIC_COEFFS];
            coeffs[0] = F::one();
            Row {
                typ: GateType::Generic,
                cells,
                coeffs,
            }
        });
        public_rows.chain(self.rows.iter().cloned())
    }

    /// Produces the gates of the circuit.
    /// Cells of the permutable columns holding the same variable are wired in a cycle,
    /// in the order in which they appear.
    pub fn finalize_and_get_gates(&self) -> Vec<CircuitGate<F>> {
        let mut gates = vec![];
        let mut positions: HashMap<V, Vec<Wire>> = HashMap::new();

        for (row_idx, row) in self.all_rows().enumerate() {
            for (col, cell) in row.cells.iter().take(PERMUTS).enumerate() {
                if let Some(var) = cell {
                    positions
                        .entry(*var)
                        .or_default()
                        .push(Wire::new(row_idx, col));
                }
            }
            gates.push(CircuitGate::new(row.typ, row_idx, row.coeffs));
        }

        for cycle in positions.values().filter(|cycle| cycle.len() > 1) {
            for (from, to) in cycle.iter().zip(cycle.iter().cycle().skip(1)) {
                let gate: &mut CircuitGate<F> = &mut gates[from.row];
                gate.wires[from.col] = *to;
            }
        }

        gates
    }

    /// Computes the witness table, given the values of the external variables.
    pub fn compute_witness<FUNC>(&self, external_values: FUNC) -> [Vec<F>; COLUMNS]
    where
        FUNC: Fn(usize) -> F,
    {
        // internal variables only refer to variables created before them
        let mut internal_values: Vec<F> = Vec::with_capacity(self.internal_vars.len());
        for (terms, constant) in &self.internal_vars {
            let value = terms.iter().fold(*constant, |acc, (scale, var)| {
                let value = match var {
                    V::External(v) => external_values(*v),
                    V::Internal(v) => internal_values[*v],
                };
                acc + *scale * value
            });
            internal_values.push(value);
        }

        let mut witness: [Vec<F>; COLUMNS] = array::from_fn(|_| Vec::with_capacity(self.num_rows()));
        for row in self.all_rows() {
            for (col, cell) in row.cells.iter().enumerate() {
                let value = match cell {
                    Some(V::External(v)) => external_values(*v),
                    Some(V::Internal(v)) => internal_values[*v],
                    None => F::zero(),
                };
                witness[col].push(value);
            }
        }
        witness
    }
}
