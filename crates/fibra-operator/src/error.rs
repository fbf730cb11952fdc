//! Error types for operator construction.

use std::fmt;

/// Errors from coupling-operator construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    /// A cell-indexed input does not match the topology's cell count.
    LengthMismatch {
        /// Which input ("tensor", "diffusivity", "orientation").
        field: &'static str,
        /// Expected length (the cell count).
        expected: usize,
        /// Supplied length.
        got: usize,
    },
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                field,
                expected,
                got,
            } => {
                write!(f, "{field} covers {got} cells, topology has {expected}")
            }
        }
    }
}

impl std::error::Error for OperatorError {}
