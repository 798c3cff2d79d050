use std::borrow::Cow;
use thiserror::Error;

/// A result type for Snarky errors.
pub type SnarkyResult<T> = std::result::Result<T, SnarkyError>;

/// A result type for Snarky runtime errors.
pub type SnarkyRuntimeResult<T> = std::result::Result<T, SnarkyRuntimeError>;

/// Snarky errors can come from either a compilation or runtime error.
#[derive(Debug, Clone, Error)]
pub enum SnarkyError {
    #[error("a compilation error occurred: {0}")]
    CompilationError(SnarkyCompilationError),

    #[error("a runtime error occurred in `{label}` at {loc}: {error}")]
    RuntimeError {
        error: SnarkyRuntimeError,
        label: Cow<'static, str>,
        loc: Cow<'static, str>,
    },
}

impl SnarkyError {
    /// Attaches a label and a location to a runtime error.
    pub fn runtime(
        error: SnarkyRuntimeError,
        label: impl Into<Cow<'static, str>>,
        loc: impl Into<Cow<'static, str>>,
    ) -> Self {
        SnarkyError::RuntimeError {
            error,
            label: label.into(),
            loc: loc.into(),
        }
    }

    /// Returns the runtime error behind this error, if any.
    pub fn runtime_error(&self) -> Option<&SnarkyRuntimeError> {
        match self {
            SnarkyError::RuntimeError { error, .. } => Some(error),
            SnarkyError::CompilationError(_) => None,
        }
    }
}

impl From<SnarkyCompilationError> for SnarkyError {
    fn from(error: SnarkyCompilationError) -> Self {
        SnarkyError::CompilationError(error)
    }
}

/// Errors that can occur during compilation of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnarkyCompilationError {
    #[error("the two values were not equal: {0} != {1}")]
    ConstantAssertEquals(String, String),

    #[error("the constant {0} does not fit in {1} bits")]
    ConstantOutOfRange(String, usize),

    #[error("invalid bit length {0}: it must be positive and at most {1}")]
    InvalidBitLength(usize, usize),

    #[error("the nibble width must be positive")]
    ZeroNibbleWidth,

    #[error("cannot rotate a 64-bit word by {0} bits")]
    RotationTooLarge(u32),

    #[error("invalid capacity of {0} bytes: it must be a positive multiple of 8 below 200")]
    InvalidCapacity(usize),

    #[error("invalid output length of {0} bytes: it must be a positive multiple of 8")]
    InvalidOutputLength(usize),

    #[error("unsupported digest length of {0} bits")]
    UnsupportedDigestLength(usize),

    #[error("rate ({0} words) and capacity ({1} words) do not add up to the 25 words of the state")]
    RateCapacityMismatch(usize, usize),

    #[error("the padded message ({0} words) is not a multiple of the rate ({1} words)")]
    PaddedLengthMismatch(usize, usize),

    #[error("squeezing {0} words at rate {1} needs more than one squeeze")]
    MultipleSqueezes(usize, usize),

    #[error("a keccak state has 5x5 lanes, found {0}")]
    StateDimensions(String),

    #[error("cannot split {0} elements in chunks of {1}")]
    ChunkSize(usize, usize),
}

/// Errors that can occur during runtime (witness generation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnarkyRuntimeError {
    #[error("unsatisfied constraint: {0} is not equal to {1}")]
    UnsatisfiedEqualConstraint(String, String),

    #[error("unsatisfied constraint: {0} * {1} is not equal to {2}")]
    UnsatisfiedR1CSConstraint(String, String, String),

    #[error("unsatisfied constraint: {0} is not equal to the sum of its limbs {1}")]
    UnsatisfiedDecomposition(String, String),

    #[error("unsatisfied constraint: {0} * {1} is not equal to {2} * 2^64 + {3}")]
    UnsatisfiedRotation(String, String, String, String),

    #[error("unsatisfied constraint: the rotated word {0} is not equal to {1} + {2}")]
    UnsatisfiedRotatedWord(String, String, String),

    #[error("lookup of [{1}] in the {0} table failed")]
    LookupMiss(String, String),

    #[error("the value {0} does not fit in {1} bits")]
    ValueTooLarge(String, usize),

    #[error("the number of public inputs passed ({0}) does not match the number of public inputs expected ({1})")]
    PubInputMismatch(usize, usize),

    #[error("the private input has {0} elements, the circuit was compiled for {1}")]
    PrivateInputMismatch(usize, usize),

    #[error("the value returned by the circuit has an incorrect number of field variables. It hardcoded {1} field variables, but returned {0}")]
    CircuitReturnVar(usize, usize),

    #[error("the circuit is not reproducible: generating the witness produced a different gate at row {0}")]
    NonReproducibleCircuit(usize),
}
