//! Test fixtures and reaction stubs for fibra development.
//!
//! Canned topologies (strand, slab, block, a slab with a hole) and
//! minimal [`ReactionModel`] implementations used across the
//! workspace's unit and integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod reactions;

pub use fixtures::{block, slab, slab_with_hole, strand, two_cell_pair};
pub use reactions::{LinearLeak, ZeroReaction};
