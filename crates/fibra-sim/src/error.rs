//! Configuration error types for simulation assembly.

use fibra_lattice::LatticeError;
use fibra_operator::OperatorError;
use fibra_tensor::TensorError;
use std::error::Error;
use std::fmt;

/// Errors detected while assembling a simulation.
///
/// Everything here is fatal at setup: the integrator is never
/// constructed over a configuration that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Topology or mask construction failed.
    Lattice(LatticeError),
    /// Orientation/diffusivity/tensor assembly failed.
    Tensor(TensorError),
    /// Operator construction failed.
    Operator(OperatorError),
    /// No diffusivity was supplied.
    MissingDiffusivity,
    /// dt is NaN, infinite, zero, or negative.
    InvalidDt {
        /// The invalid value.
        value: f64,
    },
    /// dt exceeds the selected operator's stability bound.
    DtTooLarge {
        /// The dt that was requested.
        configured_dt: f64,
        /// The operator's conservative bound.
        max_supported: f64,
        /// Which operator constrains it.
        operator: String,
    },
    /// A stimulus pulse's region mask has the wrong length.
    StimulusRegionLength {
        /// Index of the pulse in the protocol.
        pulse: usize,
        /// Expected length (the cell count).
        expected: usize,
        /// Supplied length.
        got: usize,
    },
    /// A stimulus pulse's timing or amplitude is invalid.
    InvalidStimulus {
        /// Index of the pulse in the protocol.
        pulse: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The initial voltage array has the wrong length.
    InitialVoltageLength {
        /// Expected length (the cell count).
        expected: usize,
        /// Supplied length.
        got: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lattice(e) => write!(f, "lattice: {e}"),
            Self::Tensor(e) => write!(f, "tensor: {e}"),
            Self::Operator(e) => write!(f, "operator: {e}"),
            Self::MissingDiffusivity => write!(f, "no diffusivity configured"),
            Self::InvalidDt { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::DtTooLarge {
                configured_dt,
                max_supported,
                operator,
            } => {
                write!(
                    f,
                    "dt {configured_dt} exceeds stability bound {max_supported} \
                     (constrained by '{operator}')"
                )
            }
            Self::StimulusRegionLength {
                pulse,
                expected,
                got,
            } => {
                write!(
                    f,
                    "stimulus pulse {pulse} region covers {got} cells, expected {expected}"
                )
            }
            Self::InvalidStimulus { pulse, reason } => {
                write!(f, "stimulus pulse {pulse}: {reason}")
            }
            Self::InitialVoltageLength { expected, got } => {
                write!(f, "initial voltages cover {got} cells, expected {expected}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            Self::Tensor(e) => Some(e),
            Self::Operator(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for ConfigError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<TensorError> for ConfigError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

impl From<OperatorError> for ConfigError {
    fn from(e: OperatorError) -> Self {
        Self::Operator(e)
    }
}
