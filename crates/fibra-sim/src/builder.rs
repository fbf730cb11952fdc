//! Simulation assembly: the SETUP phase.

use crate::config::{OperatorKind, SimConfig};
use crate::error::ConfigError;
use crate::integrator::TissueIntegrator;
use crate::stimulus::StimulusProtocol;
use fibra_core::{CellType, ReactionModel};
use fibra_lattice::{DisconnectSet, GeoMask, Lattice, Topology, TopologyReport};
use fibra_operator::{
    CouplingOperator, FdmOperator, NetworkModel, NetworkReport, StencilOperator,
};
use fibra_tensor::{DiffusionTensor, Diffusivity, OrientationField};
use indexmap::IndexMap;
use std::sync::Arc;

/// Diffusivity input: scalars expanded once the cell count is known,
/// or caller-supplied per-cell arrays.
#[derive(Debug, Clone)]
enum DiffusivitySpec {
    Uniform { d1: f64, d2: f64 },
    PerCell(Diffusivity),
}

#[derive(Debug, Clone)]
enum InitialVoltage {
    Uniform(f64),
    PerCell(Vec<f64>),
}

/// Aggregate setup summary returned beside the integrator.
///
/// Silent per-cell corrections surface here as counters, so callers
/// can print one summary line instead of a warning per cell.
#[derive(Debug, Clone, Copy)]
pub struct SetupReport {
    /// Topology assembly counters.
    pub topology: TopologyReport,
    /// Unordered pairs severed by region disconnection.
    pub severed_pairs: usize,
    /// Network assembly counters, when the network operator is selected.
    pub network: Option<NetworkReport>,
}

/// Builder producing an immutable simulation setup.
///
/// Consumes the configuration layer's outputs, validates everything
/// once, and hands back a ready [`TissueIntegrator`] plus a
/// [`SetupReport`]. Every failure is a typed [`ConfigError`]; nothing
/// is retried or silently defaulted except the documented
/// zero-orientation fallback.
pub struct TissueBuilder {
    lattice: Lattice,
    mask: GeoMask,
    orientation: Option<OrientationField>,
    diffusivity: Option<DiffusivitySpec>,
    celltype_scales: IndexMap<CellType, f64>,
    disconnect: DisconnectSet,
    operator: OperatorKind,
    stimulus: StimulusProtocol,
    config: SimConfig,
    initial: InitialVoltage,
}

impl TissueBuilder {
    /// Start from a lattice and its finalized geometry mask.
    pub fn new(lattice: Lattice, mask: GeoMask) -> Self {
        Self {
            lattice,
            mask,
            orientation: None,
            diffusivity: None,
            celltype_scales: IndexMap::new(),
            disconnect: DisconnectSet::empty(),
            operator: OperatorKind::default(),
            stimulus: StimulusProtocol::none(),
            config: SimConfig::new(0.02),
            initial: InitialVoltage::Uniform(0.0),
        }
    }

    /// Per-cell fiber orientation. Default: isotropic everywhere.
    pub fn orientation(mut self, orientation: OrientationField) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Uniform longitudinal/transverse diffusivities.
    pub fn uniform_diffusivity(mut self, d1: f64, d2: f64) -> Self {
        self.diffusivity = Some(DiffusivitySpec::Uniform { d1, d2 });
        self
    }

    /// Caller-supplied per-cell diffusivities (length `N`).
    pub fn diffusivity(mut self, diffusivity: Diffusivity) -> Self {
        self.diffusivity = Some(DiffusivitySpec::PerCell(diffusivity));
        self
    }

    /// Celltype-keyed diffusivity scale factors, applied before tensor
    /// assembly.
    pub fn scale_celltypes(mut self, factors: IndexMap<CellType, f64>) -> Self {
        self.celltype_scales = factors;
        self
    }

    /// Celltype pairs whose junctions are severed.
    pub fn disconnect(mut self, set: DisconnectSet) -> Self {
        self.disconnect = set;
        self
    }

    /// Spatial-coupling strategy. Default: direct FDM.
    pub fn operator(mut self, kind: OperatorKind) -> Self {
        self.operator = kind;
        self
    }

    /// Stimulus protocol. Default: none.
    pub fn stimulus(mut self, stimulus: StimulusProtocol) -> Self {
        self.stimulus = stimulus;
        self
    }

    /// Timestep and worker configuration. Default: dt 0.02, auto workers.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Uniform initial voltage. Default: 0.
    pub fn initial_voltage(mut self, v: f64) -> Self {
        self.initial = InitialVoltage::Uniform(v);
        self
    }

    /// Per-cell initial voltages (length `N`).
    pub fn initial_voltages(mut self, v: Vec<f64>) -> Self {
        self.initial = InitialVoltage::PerCell(v);
        self
    }

    /// Validate everything and assemble the integrator.
    pub fn build<R: ReactionModel>(
        self,
        reaction: R,
    ) -> Result<(TissueIntegrator<R>, SetupReport), ConfigError> {
        let dt = self.config.dt;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidDt { value: dt });
        }

        let (mut topology, topo_report) = Topology::build(self.lattice, &self.mask)?;
        let severed_pairs = topology.sever(&self.disconnect)?;
        let n = topology.cell_count();

        let mut diffusivity = match self.diffusivity {
            None => return Err(ConfigError::MissingDiffusivity),
            Some(DiffusivitySpec::Uniform { d1, d2 }) => Diffusivity::uniform(n, d1, d2)?,
            Some(DiffusivitySpec::PerCell(d)) => d,
        };
        if !self.celltype_scales.is_empty() {
            diffusivity.scale_celltype(&topology, &self.celltype_scales)?;
        }

        let orientation = match self.orientation {
            Some(o) => o,
            None => OrientationField::isotropic(n),
        };

        validate_stimulus(&self.stimulus, n)?;

        let voltages = match self.initial {
            InitialVoltage::Uniform(v) => vec![v; n],
            InitialVoltage::PerCell(v) => {
                if v.len() != n {
                    return Err(ConfigError::InitialVoltageLength {
                        expected: n,
                        got: v.len(),
                    });
                }
                v
            }
        };

        let topology = Arc::new(topology);
        let mut network_report = None;
        let mut network = None;
        let operator: Arc<dyn CouplingOperator> = match self.operator {
            OperatorKind::DirectFdm => {
                let tensor = DiffusionTensor::assemble(&topology, &diffusivity, &orientation)?;
                Arc::new(FdmOperator::new(Arc::clone(&topology), Arc::new(tensor))?)
            }
            OperatorKind::CachedStencil => {
                let tensor = DiffusionTensor::assemble(&topology, &diffusivity, &orientation)?;
                Arc::new(StencilOperator::build(Arc::clone(&topology), &tensor)?)
            }
            OperatorKind::Network => {
                let (model, report) =
                    NetworkModel::build(Arc::clone(&topology), &diffusivity, &orientation)?;
                network_report = Some(report);
                let model = Arc::new(model);
                network = Some(Arc::clone(&model));
                model
            }
        };

        if let Some(max) = operator.max_stable_dt() {
            if dt > max {
                return Err(ConfigError::DtTooLarge {
                    configured_dt: dt,
                    max_supported: max,
                    operator: operator.name().to_string(),
                });
            }
        }

        let workers = self.config.resolved_workers();
        let report = SetupReport {
            topology: topo_report,
            severed_pairs,
            network: network_report,
        };
        Ok((
            TissueIntegrator::new(
                topology,
                operator,
                network,
                reaction,
                self.stimulus,
                voltages,
                dt,
                workers,
            ),
            report,
        ))
    }
}

/// Shape and timing validation for a stimulus protocol.
fn validate_stimulus(stimulus: &StimulusProtocol, cells: usize) -> Result<(), ConfigError> {
    for (i, pulse) in stimulus.pulses().iter().enumerate() {
        if pulse.region.len() != cells {
            return Err(ConfigError::StimulusRegionLength {
                pulse: i,
                expected: cells,
                got: pulse.region.len(),
            });
        }
        if !pulse.start.is_finite() || pulse.start < 0.0 {
            return Err(ConfigError::InvalidStimulus {
                pulse: i,
                reason: format!("start must be finite and non-negative, got {}", pulse.start),
            });
        }
        if !pulse.duration.is_finite() || pulse.duration <= 0.0 {
            return Err(ConfigError::InvalidStimulus {
                pulse: i,
                reason: format!("duration must be finite and positive, got {}", pulse.duration),
            });
        }
        if !pulse.amplitude.is_finite() {
            return Err(ConfigError::InvalidStimulus {
                pulse: i,
                reason: format!("amplitude must be finite, got {}", pulse.amplitude),
            });
        }
        if let Some(p) = pulse.period {
            if !p.is_finite() || p < pulse.duration {
                return Err(ConfigError::InvalidStimulus {
                    pulse: i,
                    reason: format!(
                        "period {p} must be finite and at least the duration {}",
                        pulse.duration
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::StimPulse;
    use fibra_test_utils::ZeroReaction;

    fn strand_builder(n: u32) -> TissueBuilder {
        let lattice = Lattice::new(n, 1, 1, 0.2).unwrap();
        let mask = GeoMask::solid(&lattice);
        TissueBuilder::new(lattice, mask).uniform_diffusivity(0.2, 0.2)
    }

    #[test]
    fn missing_diffusivity_rejected() {
        let lattice = Lattice::new(4, 1, 1, 0.2).unwrap();
        let mask = GeoMask::solid(&lattice);
        let result = TissueBuilder::new(lattice, mask).build(ZeroReaction);
        assert!(matches!(result, Err(ConfigError::MissingDiffusivity)));
    }

    #[test]
    fn invalid_dt_rejected() {
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result = strand_builder(4)
                .config(SimConfig::new(bad))
                .build(ZeroReaction);
            assert!(matches!(result, Err(ConfigError::InvalidDt { .. })), "dt {bad}");
        }
    }

    #[test]
    fn unstable_dt_rejected_with_operator_name() {
        // 1D bound is h^2 / (2 D) = 0.1; ask for 0.2.
        let result = strand_builder(10)
            .config(SimConfig::new(0.2))
            .build(ZeroReaction);
        match result {
            Err(ConfigError::DtTooLarge {
                configured_dt,
                max_supported,
                operator,
            }) => {
                assert_eq!(configured_dt, 0.2);
                assert!((max_supported - 0.1).abs() < 1e-12);
                assert_eq!(operator, "direct-fdm");
            }
            other => panic!("expected DtTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn stimulus_region_length_checked() {
        let pulse = StimPulse {
            start: 0.0,
            duration: 1.0,
            amplitude: -2.0,
            period: None,
            region: vec![true; 3],
        };
        let result = strand_builder(10)
            .stimulus(StimulusProtocol::new(vec![pulse]))
            .build(ZeroReaction);
        assert!(matches!(
            result,
            Err(ConfigError::StimulusRegionLength {
                pulse: 0,
                expected: 10,
                got: 3,
            })
        ));
    }

    #[test]
    fn stimulus_timing_checked() {
        let pulse = StimPulse {
            start: 0.0,
            duration: 2.0,
            amplitude: -2.0,
            period: Some(1.0),
            region: vec![true; 10],
        };
        let result = strand_builder(10)
            .stimulus(StimulusProtocol::new(vec![pulse]))
            .build(ZeroReaction);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidStimulus { pulse: 0, .. })
        ));
    }

    #[test]
    fn initial_voltage_length_checked() {
        let result = strand_builder(10)
            .initial_voltages(vec![0.0; 4])
            .build(ZeroReaction);
        assert!(matches!(
            result,
            Err(ConfigError::InitialVoltageLength {
                expected: 10,
                got: 4,
            })
        ));
    }

    #[test]
    fn build_reports_setup_counters() {
        let (sim, report) = strand_builder(10)
            .config(SimConfig::new(0.02).with_workers(2))
            .build(ZeroReaction)
            .unwrap();
        assert_eq!(report.topology.cells, 10);
        assert_eq!(report.severed_pairs, 0);
        assert!(report.network.is_none());
        assert_eq!(sim.cell_count(), 10);
    }

    #[test]
    fn network_build_reports_unoriented_cells() {
        let (_, report) = strand_builder(10)
            .operator(OperatorKind::Network)
            .build(ZeroReaction)
            .unwrap();
        let net = report.network.unwrap();
        assert_eq!(net.junctions, 9);
        assert_eq!(net.undefined_orientation_cells, 10);
    }
}
