use crate::snarky::{errors::SnarkyResult, runner::RunState, snarky_type::SnarkyType};
use ark_ff::PrimeField;
use std::ops::{Add, Neg, Sub};

/// A circuit variable represents a field element in the circuit.
/// Note that a [`FieldVar`] currently represents a small AST that can hold constants, references to witness values, and additions or scalings of variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldVar<F>
where
    F: PrimeField,
{
    /// A constant (a value that will be hardcoded in the circuit).
    Constant(F),

    /// A variable that can be referred to via a `usize`.
    Var(usize),

    /// The addition of two other [`FieldVar`]s.
    Add(Box<FieldVar<F>>, Box<FieldVar<F>>),

    /// Scaling of a [`FieldVar`].
    Scale(F, Box<FieldVar<F>>),
}

/// A scaled variable index.
pub type Term<F> = (F, usize);

/// A [`FieldVar`] scaled by a constant.
pub type ScaledCVar<F> = (F, FieldVar<F>);

impl<F> FieldVar<F>
where
    F: PrimeField,
{
    /// Converts a field element `c` into a [`FieldVar`].
    pub fn constant(c: F) -> Self {
        FieldVar::Constant(c)
    }

    /// Returns the zero constant.
    pub fn zero() -> Self {
        Self::constant(F::zero())
    }

    /// Returns the value behind a constant, if this is a constant.
    pub fn to_constant(&self) -> Option<F> {
        match self {
            FieldVar::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the index of the variable, if this is a plain variable.
    pub fn to_var_index(&self) -> Option<usize> {
        match self {
            FieldVar::Var(v) => Some(*v),
            _ => None,
        }
    }

    fn eval_inner(&self, context: &impl Fn(usize) -> F, scale: F, res: &mut F) {
        match self {
            FieldVar::Constant(c) => {
                *res += scale * c;
            }
            FieldVar::Var(v) => {
                let v = context(*v);
                *res += scale * v;
            }
            FieldVar::Add(a, b) => {
                a.eval_inner(context, scale, res);
                b.eval_inner(context, scale, res);
            }
            FieldVar::Scale(s, v) => {
                v.eval_inner(context, scale * s, res);
            }
        }
    }

    /// Evaluate the field element associated to a variable (used during witness generation)
    pub fn eval(&self, context: &impl Fn(usize) -> F) -> F {
        let mut res = F::zero();
        self.eval_inner(context, F::one(), &mut res);
        res
    }

    fn to_constant_and_terms_inner(
        &self,
        scale: F,
        constant: F,
        terms: Vec<Term<F>>,
    ) -> (F, Vec<Term<F>>) {
        match self {
            FieldVar::Constant(c) => (constant + (scale * c), terms),
            FieldVar::Var(v) => {
                let mut new_terms = vec![(scale, *v)];
                new_terms.extend(terms);
                (constant, new_terms)
            }
            FieldVar::Scale(s, t) => t.to_constant_and_terms_inner(scale * s, constant, terms),
            FieldVar::Add(x1, x2) => {
                let (c1, terms1) = x1.to_constant_and_terms_inner(scale, constant, terms);
                x2.to_constant_and_terms_inner(scale, c1, terms1)
            }
        }
    }

    /// Flattens the AST into a constant (if non-zero) and a list of scaled variables.
    pub fn to_constant_and_terms(&self) -> (Option<F>, Vec<Term<F>>) {
        let (constant, terms) = self.to_constant_and_terms_inner(F::one(), F::zero(), vec![]);
        let constant = if constant.is_zero() {
            None
        } else {
            Some(constant)
        };
        (constant, terms)
    }

    pub fn scale(&self, scalar: F) -> Self {
        if scalar.is_zero() {
            return FieldVar::Constant(scalar);
        } else if scalar.is_one() {
            return self.clone();
        }

        match self {
            FieldVar::Constant(x) => FieldVar::Constant(*x * scalar),
            FieldVar::Scale(s, v) => FieldVar::Scale(*s * scalar, v.clone()),
            FieldVar::Var(_) | FieldVar::Add(..) => FieldVar::Scale(scalar, Box::new(self.clone())),
        }
    }

    pub fn linear_combination(terms: &[ScaledCVar<F>]) -> Self {
        let mut res = FieldVar::zero();
        for (cst, term) in terms {
            res = res.add(&term.scale(*cst));
        }
        res
    }

    pub fn sum(vs: &[&Self]) -> Self {
        let terms: Vec<_> = vs.iter().map(|v| (F::one(), (*v).clone())).collect();
        Self::linear_combination(&terms)
    }

    /// Multiplies two variables, adding one generic row unless one of them is a constant.
    pub fn mul(
        &self,
        other: &Self,
        label: Option<&'static str>,
        loc: &str,
        sys: &mut RunState<F>,
    ) -> SnarkyResult<Self> {
        let res = match (self, other) {
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x * y),

            (FieldVar::Constant(cst), cvar) | (cvar, FieldVar::Constant(cst)) => cvar.scale(*cst),

            (_, _) => {
                let self_clone = self.clone();
                let other_clone = other.clone();
                let res: FieldVar<F> = sys.compute(loc, move |env| {
                    let x: F = env.read_var(&self_clone);
                    let y: F = env.read_var(&other_clone);
                    x * y
                })?;

                let label = label.or(Some("checked_mul"));

                sys.assert_r1cs(label, loc, self.clone(), other.clone(), res.clone())?;
                res
            }
        };
        Ok(res)
    }

    /// Returns a plain variable holding the same value.
    /// Constants and linear combinations get a new variable and a generic row,
    /// so that they can be placed in the cells of custom gates.
    pub fn seal(&self, sys: &mut RunState<F>, loc: &str) -> SnarkyResult<Self> {
        if self.to_var_index().is_some() {
            return Ok(self.clone());
        }
        let self_clone = self.clone();
        let sealed: FieldVar<F> = sys.compute(loc, move |env| env.read_var(&self_clone))?;
        sys.assert_eq(Some("seal"), loc, self.clone(), sealed.clone())?;
        Ok(sealed)
    }
}

//
// Our Traits
//

impl<F> SnarkyType<F> for FieldVar<F>
where
    F: PrimeField,
{
    type OutOfCircuit = F;

    const SIZE_IN_FIELD_ELEMENTS: usize = 1;

    fn to_cvars(&self) -> Vec<FieldVar<F>> {
        vec![self.clone()]
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>) -> Self {
        assert_eq!(cvars.len(), 1);
        cvars[0].clone()
    }

    fn check(&self, _cs: &mut RunState<F>) -> SnarkyResult<()> {
        // do nothing
        Ok(())
    }

    fn value_to_field_elements(x: &Self::OutOfCircuit) -> Vec<F> {
        vec![*x]
    }

    fn value_of_field_elements(fields: Vec<F>) -> Self::OutOfCircuit {
        assert_eq!(fields.len(), 1);
        fields[0]
    }
}

//
// Operations
//

impl<F> Add for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (FieldVar::Constant(x), y) | (y, FieldVar::Constant(x)) if x.is_zero() => y.clone(),
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x + y),
            (_, _) => FieldVar::Add(Box::new(self.clone()), Box::new(other.clone())),
        }
    }
}

impl<'a, F> Add<&'a Self> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: &Self) -> Self::Output {
        (&self).add(other)
    }
}

impl<F> Add<FieldVar<F>> for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: FieldVar<F>) -> Self::Output {
        self.add(&other)
    }
}

impl<F> Add<FieldVar<F>> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: FieldVar<F>) -> Self::Output {
        (&self).add(&other)
    }
}

impl<F> Sub for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: Self) -> Self::Output {
        match (self, other) {
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x - y),
            _ => self.add(&other.scale(-F::one())),
        }
    }
}

impl<'a, F> Sub<&'a FieldVar<F>> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: &Self) -> Self::Output {
        (&self).sub(other)
    }
}

impl<F> Sub<FieldVar<F>> for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: FieldVar<F>) -> Self::Output {
        self.sub(&other)
    }
}

impl<F> Sub<FieldVar<F>> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: FieldVar<F>) -> Self::Output {
        (&self).sub(&other)
    }
}

impl<F> Neg for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn neg(self) -> Self::Output {
        self.scale(-F::one())
    }
}
