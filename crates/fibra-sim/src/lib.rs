//! Explicit time integration and simulation assembly.
//!
//! [`TissueBuilder`] is the SETUP phase: it turns the configuration
//! layer's outputs (mask, diffusivities, orientation, disconnect
//! pairs, stimulus protocol) into an immutable topology, tensor, and
//! coupling operator, validating everything once. The resulting
//! [`TissueIntegrator`] is the STEADY-LOOP: each step computes every
//! cell's new voltage from the previous step's field in parallel
//! (Phase A, into a staging buffer), then publishes the staged field
//! at a barrier (Phase B, a buffer swap). There is no transition back
//! to setup; teardown is `drop`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod integrator;
pub mod stimulus;

pub use builder::{SetupReport, TissueBuilder};
pub use config::{OperatorKind, SimConfig};
pub use error::ConfigError;
pub use integrator::{StepEvent, TissueIntegrator};
pub use stimulus::{StimPulse, StimulusProtocol};
