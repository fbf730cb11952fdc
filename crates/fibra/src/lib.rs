//! Cardiac tissue excitation propagation engine.
//!
//! `fibra` couples per-cell membrane kinetics (supplied by the caller
//! through [`ReactionModel`]) to a spatial diffusion operator over a
//! 1D/2D/3D/anatomical grid. The workspace splits along the data
//! flow: topology ([`fibra_lattice`]) feeds the diffusion tensor
//! ([`fibra_tensor`]), which feeds one of three interchangeable
//! coupling operators ([`fibra_operator`]), driven by the explicit
//! time loop ([`fibra_sim`]).
//!
//! # Quick start
//!
//! ```
//! use fibra::{
//!     GeoMask, Lattice, OperatorKind, SimConfig, TissueBuilder, ZeroReaction,
//! };
//!
//! // A 10-cell strand, isotropic D = 0.2 mm^2/ms, dx = 0.2 mm.
//! let lattice = Lattice::new(10, 1, 1, 0.2).unwrap();
//! let mask = GeoMask::solid(&lattice);
//! let mut initial = vec![0.0; 10];
//! initial[0] = 1.0;
//!
//! let (mut sim, report) = TissueBuilder::new(lattice, mask)
//!     .uniform_diffusivity(0.2, 0.2)
//!     .operator(OperatorKind::CachedStencil)
//!     .config(SimConfig::new(0.02).with_workers(1))
//!     .initial_voltages(initial)
//!     .build(ZeroReaction)
//!     .unwrap();
//!
//! assert_eq!(report.topology.cells, 10);
//! sim.run_until(1.0);
//! assert!(sim.voltages()[1] > 0.0, "excitation spreads down the strand");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use fibra_core::{CellId, CellType, ReactionModel, StepId};
pub use fibra_lattice::{
    DirectionClass, DisconnectSet, GeoMask, Lattice, LatticeError, Slot, Topology, TopologyReport,
};
pub use fibra_operator::{
    CouplingOperator, FdmOperator, Junction, JunctionKind, NetworkModel, NetworkReport,
    OperatorError, StencilOperator,
};
pub use fibra_sim::{
    ConfigError, OperatorKind, SetupReport, SimConfig, StepEvent, StimPulse, StimulusProtocol,
    TissueBuilder, TissueIntegrator,
};
pub use fibra_tensor::{Diffusivity, DiffusionTensor, OrientationField, TensorError};

/// Reaction stub that injects no membrane current; the integrator
/// reduces to pure diffusion. Mostly useful for examples and
/// validation runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroReaction;

impl ReactionModel for ZeroReaction {
    fn membrane_current(&self, _cell: CellId, _voltage: f64, _time: f64, _dt: f64) -> f64 {
        0.0
    }
}
