//! Error types for lattice construction and topology assembly.

use fibra_core::CellType;
use std::fmt;

/// Errors arising from lattice, mask, or topology construction.
///
/// All of these are fatal at setup and never recovered from:
/// continuing past any of them would silently simulate an undefined
/// topology.
#[derive(Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// A lattice dimension is zero.
    EmptyDimension {
        /// Which axis ("nx", "ny", "nz").
        name: &'static str,
    },
    /// A lattice dimension exceeds the `i32` coordinate range.
    DimensionTooLarge {
        /// Which axis.
        name: &'static str,
        /// The offending value.
        value: u32,
        /// The maximum supported value.
        max: u32,
    },
    /// A grid spacing is non-finite or non-positive.
    InvalidSpacing {
        /// Which axis ("hx", "hy", "hz").
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The geometry mask length does not match the lattice point count.
    MaskSizeMismatch {
        /// Expected number of entries (`nx * ny * nz`).
        expected: usize,
        /// Number of entries supplied.
        got: usize,
    },
    /// A positive mask value does not fit the celltype range.
    CelltypeTooLarge {
        /// The offending mask value.
        value: i32,
    },
    /// The mask contains zero real cells; dependent stages are undefined.
    EmptyTissue,
    /// The real-cell count exceeds the compact id range.
    TooManyCells {
        /// The number of real cells found.
        count: usize,
    },
    /// A disconnect pair references a celltype outside the declared range.
    CelltypeOutOfRange {
        /// The referenced celltype.
        value: CellType,
        /// The largest celltype present in the mask.
        max: CellType,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { name } => {
                write!(f, "lattice dimension {name} must be at least 1")
            }
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "lattice dimension {name} = {value} exceeds maximum {max}")
            }
            Self::InvalidSpacing { name, value } => {
                write!(f, "spacing {name} must be finite and positive, got {value}")
            }
            Self::MaskSizeMismatch { expected, got } => {
                write!(f, "geometry mask has {got} entries, lattice has {expected} points")
            }
            Self::CelltypeTooLarge { value } => {
                write!(f, "mask value {value} exceeds the supported celltype range")
            }
            Self::EmptyTissue => write!(f, "geometry mask contains no tissue cells"),
            Self::TooManyCells { count } => {
                write!(f, "{count} tissue cells exceed the compact cell id range")
            }
            Self::CelltypeOutOfRange { value, max } => {
                write!(
                    f,
                    "disconnect pair references celltype {value} but the mask declares at most {max}"
                )
            }
        }
    }
}

impl std::error::Error for LatticeError {}
