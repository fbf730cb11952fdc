//! Spatial coupling operators for fibra simulations.
//!
//! Three interchangeable strategies turn the neighbor topology and the
//! diffusion tensor into a per-cell coupling term:
//!
//! - [`FdmOperator`]: the direct 19-point anisotropic finite-difference
//!   stencil, re-derived from the tensor every step. No precomputation,
//!   highest per-step cost, simplest to verify against analytic cases.
//! - [`StencilOperator`]: a precomputed per-cell weight cache (with
//!   upwinded advective weights and boundary-zeroed mixed terms)
//!   multiplied against the voltage field each step. Algebraically
//!   matches the direct stencil on homogeneous tensors; cheaper per
//!   step, more memory.
//! - [`NetworkModel`]: a discrete gap-junction rendering: coupling as a
//!   sparse list of conductances between adjacent cells, derived by
//!   decomposing the fiber orientation over the 13 unique lattice
//!   directions.
//!
//! All three implement [`CouplingOperator`] and read only the
//! *previous* step's voltages, so the integrator may evaluate cells in
//! parallel with no ordering between them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fdm;
pub mod network;
pub mod operator;
pub mod stencil;

pub use error::OperatorError;
pub use fdm::FdmOperator;
pub use network::{Junction, JunctionKind, NetworkModel, NetworkReport};
pub use operator::CouplingOperator;
pub use stencil::StencilOperator;
