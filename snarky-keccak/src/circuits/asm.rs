//! An ASM-like language to print a human-friendly version of a circuit.

use crate::circuits::{
    gate::{Circuit, CircuitGate, GateType, GENERIC_REGISTERS},
    wires::Wire,
};
use ark_ff::PrimeField;
use core::{fmt::Write, hash::Hash};
use field_utils::FieldHelpers;
use itertools::Itertools;
use std::collections::HashMap;

/// Print a field in a negative form if it's past the half point.
pub fn pretty<F: PrimeField>(ff: F) -> String {
    let bigint = ff.to_biguint();
    let inv = (-ff).to_biguint();
    if inv < bigint {
        format!("-{inv}")
    } else {
        bigint.to_string()
    }
}

impl<'a, F> Circuit<'a, F>
where
    F: PrimeField,
{
    pub fn generate_asm(&self) -> String {
        let mut res = String::new();

        // large coefficients are printed once, as named constants
        let mut vars = OrderedHashSet::default();
        for CircuitGate { coeffs, .. } in self.gates {
            for coeff in coeffs {
                if pretty(*coeff).len() >= 5 {
                    vars.insert(*coeff);
                }
            }
        }
        for (idx, var) in vars.iter().enumerate() {
            let _ = writeln!(res, "c{idx} = {}", pretty(*var));
        }
        if !vars.is_empty() {
            res.push('\n');
        }

        for (row, gate) in self.gates.iter().enumerate() {
            let CircuitGate { typ, coeffs, wires } = gate;
            let is_pub = if row < self.public_input_size {
                "pub."
            } else {
                ""
            };
            let coeffs = coeffs
                .iter()
                .map(|x| {
                    let s = pretty(*x);
                    match vars.pos(x) {
                        Some(idx) if s.len() >= 5 => format!("c{idx}"),
                        _ => s,
                    }
                })
                .join(",");
            let _ = writeln!(res, "row{row}.{is_pub}{typ:?}<{coeffs}>");

            let wired = wires
                .iter()
                .enumerate()
                .filter(|(col, _)| gate.is_wired(row, *col))
                .map(|(col, Wire { row: to_row, col: to_col })| {
                    let from = self.cell_name(row, col);
                    let to = self.cell_name(*to_row, *to_col);
                    if row != *to_row {
                        format!("{from} -> row{to_row}{to}")
                    } else {
                        format!("{from} -> {to}")
                    }
                })
                .join(", ");
            if !wired.is_empty() {
                res.push_str(&wired);
                res.push('\n');
            }

            res.push('\n');
        }

        res
    }

    fn cell_name(&self, row: usize, col: usize) -> String {
        let generic = matches!(
            self.gates.get(row).map(|g| g.typ),
            Some(GateType::Generic)
        );
        match col {
            0 if generic => ".l".to_string(),
            1 if generic => ".r".to_string(),
            2 if generic => ".o".to_string(),
            _ if generic && col >= GENERIC_REGISTERS => format!(".x{col}"),
            _ => format!("[{col}]"),
        }
    }
}

/// Very dumb way to write an ordered hash set.
#[derive(Debug)]
pub struct OrderedHashSet<T> {
    map: HashMap<T, usize>,
    ordered: Vec<T>,
}

impl<T> Default for OrderedHashSet<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            ordered: vec![],
        }
    }
}

impl<T> OrderedHashSet<T>
where
    T: Eq + Hash + Clone,
{
    pub fn insert(&mut self, value: T) -> bool {
        if self.map.contains_key(&value) {
            return false;
        }
        self.map.insert(value.clone(), self.ordered.len());
        self.ordered.push(value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ordered.iter()
    }

    pub fn pos(&self, value: &T) -> Option<usize> {
        self.map.get(value).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Fp;

    #[test]
    fn test_simple_circuit_asm() {
        let public_input_size = 1;
        let mut gates: Vec<CircuitGate<Fp>> = vec![
            CircuitGate::new(GateType::Generic, 0, vec![1u64.into(), 0u64.into()]),
            CircuitGate::new(GateType::Xor16, 1, vec![16u64.into()]),
            CircuitGate::new(GateType::Generic, 2, vec![-Fp::from(1u64), 123456u64.into()]),
        ];
        gates[0].wires[0] = Wire::new(2, 1);
        gates[2].wires[1] = Wire::new(0, 0);

        let circuit = Circuit::new(public_input_size, &gates);

        const EXPECTED: &str = r#"c0 = 123456

row0.pub.Generic<1,0>
.l -> row2.r

row1.Xor16<16>

row2.Generic<-1,c0>
.r -> row0.l"#;

        let asm = circuit.generate_asm();

        if EXPECTED.trim() != asm.trim() {
            eprintln!("expected:\n{EXPECTED}\n");
            eprintln!("obtained:\n{asm}");
            panic!("obtained asm does not match expected asm")
        }
    }
}
