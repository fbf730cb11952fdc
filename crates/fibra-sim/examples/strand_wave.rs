//! Paced 1D strand demo.
//!
//! Builds a 50-cell strand, paces the left end, and prints the voltage
//! profile every millisecond. Run with:
//!
//! ```sh
//! cargo run --example strand_wave
//! ```

use fibra_lattice::{GeoMask, Lattice};
use fibra_sim::{OperatorKind, SimConfig, StimPulse, StimulusProtocol, TissueBuilder};

struct Passive;

impl fibra_core::ReactionModel for Passive {
    fn membrane_current(&self, _cell: fibra_core::CellId, v: f64, _t: f64, _dt: f64) -> f64 {
        0.05 * v
    }
}

fn main() {
    let cells = 50u32;
    let lattice = Lattice::new(cells, 1, 1, 0.2).expect("valid lattice");
    let mask = GeoMask::solid(&lattice);

    let mut region = vec![false; cells as usize];
    region[0] = true;
    region[1] = true;
    let pacing = StimPulse {
        start: 0.0,
        duration: 1.0,
        amplitude: -2.0,
        period: Some(20.0),
        region,
    };

    let (mut sim, report) = TissueBuilder::new(lattice, mask)
        .uniform_diffusivity(0.2, 0.05)
        .operator(OperatorKind::CachedStencil)
        .stimulus(StimulusProtocol::new(vec![pacing]))
        .config(SimConfig::new(0.02))
        .build(Passive)
        .expect("valid configuration");

    println!(
        "strand: {} cells, {} boundary folds, operator {}",
        report.topology.cells,
        report.topology.boundary_folds,
        sim.operator_name()
    );

    for ms in 1..=10 {
        sim.run_until(f64::from(ms));
        let profile: Vec<String> = sim
            .voltages()
            .iter()
            .step_by(5)
            .map(|v| format!("{v:6.3}"))
            .collect();
        println!("t = {ms:2} ms  [{}]", profile.join(" "));
    }
}
