//! Benchmark support crate.
//!
//! Holds no library code; the benches under `benches/` pull the
//! workspace crates directly.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
