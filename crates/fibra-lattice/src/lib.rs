//! Lattice indexing and neighbor topology for fibra simulations.
//!
//! This crate owns every piece of index arithmetic in the workspace:
//! the [`Lattice`] flat-index bijection, the [`Slot`] table of 26
//! signed neighbor directions (13 unique directions and their
//! opposites), the scan-order [`GeoMask`], and the compacted
//! [`Topology`] that maps real tissue cells to their neighbors with
//! the self-referencing no-flux boundary convention.
//!
//! # Boundary convention
//!
//! A neighbor lookup that would leave the lattice or land on non-tissue
//! space returns the querying cell's own id. Differencing code relies
//! on this: a folded neighbor contributes `V[self]`, which zeroes the
//! corresponding flux term without branching in the hot loop. Use
//! [`Topology::is_folded`] where the distinction matters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod disconnect;
pub mod error;
pub mod lattice;
pub mod mask;
pub mod topology;

pub use direction::{DirectionClass, Slot};
pub use disconnect::DisconnectSet;
pub use error::LatticeError;
pub use lattice::Lattice;
pub use mask::GeoMask;
pub use topology::{Topology, TopologyReport};
