//! Error types for orientation and tensor assembly.

use fibra_core::CellType;
use std::fmt;

/// Errors from orientation, diffusivity, or tensor construction.
///
/// All fatal at setup: the time loop never starts on a partially
/// assembled tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorError {
    /// A cell-indexed array has the wrong length.
    LengthMismatch {
        /// Which array ("orientation", "d1", ...).
        field: &'static str,
        /// Expected length (the cell count).
        expected: usize,
        /// Supplied length.
        got: usize,
    },
    /// A vector or scalar entry is NaN or infinite.
    NonFinite {
        /// Which array.
        field: &'static str,
        /// Offending cell index.
        cell: usize,
    },
    /// A diffusivity entry is negative.
    NegativeDiffusivity {
        /// Which array ("d1", "d2").
        field: &'static str,
        /// Offending cell index.
        cell: usize,
        /// The value supplied.
        value: f64,
    },
    /// A scale factor is NaN, infinite, or negative.
    InvalidScale {
        /// The offending factor.
        value: f64,
    },
    /// A scale map references a celltype outside the declared range.
    CelltypeOutOfRange {
        /// The referenced celltype.
        value: CellType,
        /// The largest celltype present in the mask.
        max: CellType,
    },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                field,
                expected,
                got,
            } => {
                write!(f, "{field} has {got} entries, expected {expected}")
            }
            Self::NonFinite { field, cell } => {
                write!(f, "{field} is non-finite at cell {cell}")
            }
            Self::NegativeDiffusivity { field, cell, value } => {
                write!(f, "{field} is negative at cell {cell}: {value}")
            }
            Self::InvalidScale { value } => {
                write!(f, "scale factor must be finite and non-negative, got {value}")
            }
            Self::CelltypeOutOfRange { value, max } => {
                write!(
                    f,
                    "scale map references celltype {value} but the mask declares at most {max}"
                )
            }
        }
    }
}

impl std::error::Error for TensorError {}
