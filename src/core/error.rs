use std::fmt;

pub type Result<T> = std::result::Result<T, TitanError>;

/// Errors raised by the Titan numeric engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TitanError {
    /// Two matrices whose shapes are incompatible for `op`.
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Two parallel sequences of different length.
    LengthMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },
    EmptyInput(&'static str),
    QubitOutOfRange { qubit: usize, num_qubits: usize },
    InvalidArgument(String),
}

impl fmt::Display for TitanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitanError::DimensionMismatch { op, left, right } => write!(
                f,
                "Dimension mismatch in {}: {}x{} vs {}x{}",
                op, left.0, left.1, right.0, right.1
            ),
            TitanError::LengthMismatch { op, left, right } => {
                write!(f, "Length mismatch in {}: {} vs {}", op, left, right)
            }
            TitanError::EmptyInput(op) => write!(f, "Empty input: {} requires at least one value", op),
            TitanError::QubitOutOfRange { qubit, num_qubits } => write!(
                f,
                "Qubit index out of range: {} (state has {} qubits)",
                qubit, num_qubits
            ),
            TitanError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for TitanError {}

impl TitanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TitanError::InvalidArgument(message.into())
    }

    pub fn lengths(op: &'static str, left: usize, right: usize) -> Self {
        TitanError::LengthMismatch { op, left, right }
    }
}

/// Fails with `LengthMismatch` unless both slices have the same length, and
/// with `EmptyInput` when they are empty.
pub(crate) fn check_parallel(op: &'static str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(TitanError::lengths(op, a.len(), b.len()));
    }
    if a.is_empty() {
        return Err(TitanError::EmptyInput(op));
    }
    Ok(())
}
