//! Gap-junction network discretization.
//!
//! Instead of a tensor field, inter-cell coupling is a sparse list of
//! junctions between adjacent cells. Each cell first gets a *nodal*
//! conductance per unique lattice direction, blending transverse and
//! longitudinal conductance by how closely the direction aligns with
//! the local fiber; a junction's conductance is then the arithmetic
//! mean of its two endpoints' directional values.
//!
//! The alignment weighting works per orthogonal plane (xy, xz, yz):
//! the projected orientation's angle against the 45° diagonal splits
//! into axis-ness and diagonal-ness. An axis direction takes the
//! product of its two adjoining planes' axis weights, a face diagonal
//! takes its single plane's diagonal weight (on the sign-matching
//! diagonal only), and a corner takes the product of all three planes'
//! diagonal weights. These formulas are heuristic and load-bearing:
//! downstream conduction-velocity results depend on them, so any
//! change needs domain-expert review.

use crate::error::OperatorError;
use crate::operator::CouplingOperator;
use fibra_core::CellId;
use fibra_lattice::{Slot, Topology};
use fibra_tensor::{Diffusivity, OrientationField};
use std::f64::consts::FRAC_PI_4;
use std::sync::Arc;

/// Connection classification for a junction or a nodal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JunctionKind {
    /// Predominantly along the fiber.
    Axial,
    /// Predominantly across the fiber.
    Transverse,
    /// Oblique, or endpoints disagree.
    Mixed,
    /// No defined orientation at either endpoint.
    Unoriented,
}

/// A directed gap junction between two adjacent cells.
///
/// `minus` owns the junction (it is the cell the positive-direction
/// step starts from); `plus` is its neighbor. The flux convention is
/// `IGap = conductance · (V[plus] − V[minus])`, added to the minus
/// cell's accumulator and subtracted from the plus cell's — equal and
/// opposite, so every junction conserves total charge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Junction {
    /// The owning endpoint.
    pub minus: CellId,
    /// The positive-direction endpoint.
    pub plus: CellId,
    /// Mean of the endpoints' directional nodal conductances.
    pub conductance: f64,
    /// Connection classification from both endpoints.
    pub kind: JunctionKind,
}

/// Aggregate counters from network assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkReport {
    /// Junctions instantiated.
    pub junctions: usize,
    /// Cells with no defined orientation, defaulted to full conductance
    /// in every direction. One aggregate count, not a per-cell warning.
    pub undefined_orientation_cells: usize,
}

/// The gap-junction network model.
pub struct NetworkModel {
    topology: Arc<Topology>,
    /// Per-cell per-slot junction conductance, symmetric across each
    /// junction so cells can sum their own flux with no shared writes.
    slot_conductance: Vec<f64>,
    junctions: Vec<Junction>,
}

/// Split a plane-projected orientation into (first-axis, second-axis,
/// diagonal) alignment weights. `theta` is measured from the plane's
/// first axis; the three weights partition unity.
fn plane_split(a: f64, b: f64) -> (f64, f64, f64) {
    let theta = b.abs().atan2(a.abs());
    let axis_first = ((FRAC_PI_4 - theta) / FRAC_PI_4).max(0.0);
    let axis_second = ((theta - FRAC_PI_4) / FRAC_PI_4).max(0.0);
    let diag = 1.0 - (theta - FRAC_PI_4).abs() / FRAC_PI_4;
    (axis_first, axis_second, diag)
}

/// Alignment weight of each unique lattice direction with a unit fiber
/// vector, in [`Slot::UNIQUE`] order. Weights lie in `[0, 1]`: 1 means
/// fully longitudinal, 0 fully transverse.
fn direction_weights(o: [f64; 3]) -> [f64; 13] {
    let [ox, oy, oz] = o;
    let (x_xy, y_xy, d_xy) = plane_split(ox, oy);
    let (x_xz, z_xz, d_xz) = plane_split(ox, oz);
    let (y_yz, z_yz, d_yz) = plane_split(oy, oz);
    let sxy = ox * oy;
    let sxz = ox * oz;
    let syz = oy * oz;

    let mut w = [0.0; 13];
    w[Slot::Xp.unique_index()] = x_xy * x_xz;
    w[Slot::Yp.unique_index()] = y_xy * y_yz;
    w[Slot::Zp.unique_index()] = z_xz * z_yz;

    w[Slot::XpYp.unique_index()] = if sxy >= 0.0 { d_xy } else { 0.0 };
    w[Slot::XpYm.unique_index()] = if sxy <= 0.0 { d_xy } else { 0.0 };
    w[Slot::XpZp.unique_index()] = if sxz >= 0.0 { d_xz } else { 0.0 };
    w[Slot::XpZm.unique_index()] = if sxz <= 0.0 { d_xz } else { 0.0 };
    w[Slot::YpZp.unique_index()] = if syz >= 0.0 { d_yz } else { 0.0 };
    w[Slot::YpZm.unique_index()] = if syz <= 0.0 { d_yz } else { 0.0 };

    let corner = d_xy * d_xz * d_yz;
    w[Slot::XpYpZp.unique_index()] = if sxy >= 0.0 && sxz >= 0.0 { corner } else { 0.0 };
    w[Slot::XpYpZm.unique_index()] = if sxy >= 0.0 && sxz <= 0.0 { corner } else { 0.0 };
    w[Slot::XpYmZp.unique_index()] = if sxy <= 0.0 && sxz >= 0.0 { corner } else { 0.0 };
    w[Slot::XpYmZm.unique_index()] = if sxy <= 0.0 && sxz <= 0.0 { corner } else { 0.0 };
    w
}

/// Classify a nodal direction by its alignment weight.
fn classify(weight: f64) -> JunctionKind {
    if weight >= 2.0 / 3.0 {
        JunctionKind::Axial
    } else if weight <= 1.0 / 3.0 {
        JunctionKind::Transverse
    } else {
        JunctionKind::Mixed
    }
}

/// Merge the two endpoints' classifications into the junction tag.
fn combine(a: JunctionKind, b: JunctionKind) -> JunctionKind {
    match (a, b) {
        (x, y) if x == y => x,
        (JunctionKind::Unoriented, y) => y,
        (x, JunctionKind::Unoriented) => x,
        _ => JunctionKind::Mixed,
    }
}

impl NetworkModel {
    /// Decompose nodal conductances and instantiate the junction list.
    ///
    /// Region disconnection must already be applied to the topology
    /// (via [`Topology::sever`]): a severed slot folds to self, so no
    /// junction is instantiated across it and the finite-difference
    /// operators see the identical cut.
    pub fn build(
        topology: Arc<Topology>,
        diffusivity: &Diffusivity,
        orientation: &OrientationField,
    ) -> Result<(Self, NetworkReport), OperatorError> {
        let n = topology.cell_count();
        if diffusivity.len() != n {
            return Err(OperatorError::LengthMismatch {
                field: "diffusivity",
                expected: n,
                got: diffusivity.len(),
            });
        }
        if orientation.len() != n {
            return Err(OperatorError::LengthMismatch {
                field: "orientation",
                expected: n,
                got: orientation.len(),
            });
        }

        let (hx, hy, hz) = topology.lattice().spacing();
        let step_len: Vec<f64> = Slot::UNIQUE
            .iter()
            .map(|s| s.step_length(hx, hy, hz))
            .collect();

        // Nodal pass: per-cell directional conductance and class.
        let mut nodal = vec![0.0f64; n * 13];
        let mut nodal_kind = vec![JunctionKind::Unoriented; n * 13];
        let mut undefined = 0usize;
        for cell in 0..n {
            let d1 = diffusivity.d1(cell);
            let d2 = diffusivity.d2(cell);
            if orientation.is_undefined(cell) {
                // No orientation: full conductance everywhere rather
                // than artificially reducing coupling.
                undefined += 1;
                for d in 0..13 {
                    nodal[cell * 13 + d] = d1 / step_len[d];
                }
                continue;
            }
            let weights = direction_weights(orientation.primary(cell));
            for (d, &w) in weights.iter().enumerate() {
                let w = w.clamp(0.0, 1.0);
                nodal[cell * 13 + d] = (d2 + (d1 - d2) * w) / step_len[d];
                nodal_kind[cell * 13 + d] = classify(w);
            }
        }

        // Junction pass: one junction per unordered adjacent pair,
        // owner = the positive-direction endpoint's minus side.
        let mut slot_conductance = vec![0.0f64; n * Slot::COUNT];
        let mut junctions = Vec::new();
        for cell in 0..n {
            for slot in Slot::UNIQUE {
                let plus = topology.neighbour_index(cell, slot);
                if plus == cell {
                    continue;
                }
                let d = slot.unique_index();
                let conductance = 0.5 * (nodal[cell * 13 + d] + nodal[plus * 13 + d]);
                let kind = combine(nodal_kind[cell * 13 + d], nodal_kind[plus * 13 + d]);
                slot_conductance[cell * Slot::COUNT + slot.index()] = conductance;
                slot_conductance[plus * Slot::COUNT + slot.opposite().index()] = conductance;
                junctions.push(Junction {
                    minus: CellId(cell as u32),
                    plus: CellId(plus as u32),
                    conductance,
                    kind,
                });
            }
        }

        let report = NetworkReport {
            junctions: junctions.len(),
            undefined_orientation_cells: undefined,
        };
        Ok((
            Self {
                topology,
                slot_conductance,
                junctions,
            },
            report,
        ))
    }

    /// The instantiated junction list, in owner-id order.
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Per-junction conductances, for the visualization layer.
    pub fn conductance_array(&self) -> Vec<f64> {
        self.junctions.iter().map(|j| j.conductance).collect()
    }

    /// Per-junction connection tags, for the visualization layer.
    pub fn kind_array(&self) -> Vec<JunctionKind> {
        self.junctions.iter().map(|j| j.kind).collect()
    }

    /// The junction conductance seen from `cell` through `slot`
    /// (zero for folded or severed slots).
    pub fn slot_conductance(&self, cell: usize, slot: Slot) -> f64 {
        self.slot_conductance[cell * Slot::COUNT + slot.index()]
    }
}

impl CouplingOperator for NetworkModel {
    fn name(&self) -> &str {
        "network"
    }

    fn coupling(&self, cell: usize, v: &[f64]) -> f64 {
        // Each cell sums the gap flux of its own junctions only; the
        // conductance table is symmetric per junction, so the two
        // endpoint sums apply IGap equal and opposite without any
        // shared accumulator.
        let base = cell * Slot::COUNT;
        let mut sum = 0.0;
        for slot in Slot::ALL {
            let g = self.slot_conductance[base + slot.index()];
            if g != 0.0 {
                sum += g * (v[self.topology.neighbour_index(cell, slot)] - v[cell]);
            }
        }
        sum
    }

    fn max_stable_dt(&self) -> Option<f64> {
        let worst = (0..self.topology.cell_count())
            .map(|cell| {
                Slot::ALL
                    .iter()
                    .map(|s| self.slot_conductance(cell, *s))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max);
        (worst > 0.0).then(|| 1.0 / worst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibra_core::CellType;
    use fibra_lattice::{DisconnectSet, GeoMask, Lattice};
    use fibra_test_utils::{block, strand, two_cell_pair};
    use proptest::prelude::*;

    fn uniform_network(
        topology: Topology,
        d1: f64,
        d2: f64,
        orientation: OrientationField,
    ) -> (NetworkModel, NetworkReport) {
        let n = topology.cell_count();
        let diff = Diffusivity::uniform(n, d1, d2).unwrap();
        NetworkModel::build(Arc::new(topology), &diff, &orientation).unwrap()
    }

    // ── Decomposition ─────────────────────────────────────────────

    #[test]
    fn fiber_along_x_is_axial_on_x_transverse_elsewhere() {
        let w = direction_weights([1.0, 0.0, 0.0]);
        assert!((w[Slot::Xp.unique_index()] - 1.0).abs() < 1e-12);
        assert_eq!(w[Slot::Yp.unique_index()], 0.0);
        assert_eq!(w[Slot::Zp.unique_index()], 0.0);
        assert_eq!(w[Slot::XpYp.unique_index()], 0.0);
        assert_eq!(w[Slot::XpYpZp.unique_index()], 0.0);
    }

    #[test]
    fn diagonal_fiber_weights_its_diagonal_only() {
        let inv = 1.0 / 2f64.sqrt();
        let w = direction_weights([inv, inv, 0.0]);
        assert!((w[Slot::XpYp.unique_index()] - 1.0).abs() < 1e-12);
        assert_eq!(w[Slot::XpYm.unique_index()], 0.0);
        assert!(w[Slot::Xp.unique_index()].abs() < 1e-12);
        // Anti-diagonal fiber flips the assignment.
        let w = direction_weights([inv, -inv, 0.0]);
        assert_eq!(w[Slot::XpYp.unique_index()], 0.0);
        assert!((w[Slot::XpYm.unique_index()] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn corner_fiber_takes_the_matching_corner() {
        let inv = 1.0 / 3f64.sqrt();
        let w = direction_weights([inv, inv, inv]);
        assert!((w[Slot::XpYpZp.unique_index()] - 1.0).abs() < 1e-12);
        assert_eq!(w[Slot::XpYmZm.unique_index()], 0.0);
        let w = direction_weights([inv, -inv, inv]);
        assert!((w[Slot::XpYmZp.unique_index()] - 1.0).abs() < 1e-12);
        assert_eq!(w[Slot::XpYpZp.unique_index()], 0.0);
    }

    proptest! {
        /// Alignment weights stay within [0, 1] for arbitrary fibers.
        #[test]
        fn weights_bounded(ox in -1.0f64..1.0, oy in -1.0f64..1.0, oz in -1.0f64..1.0) {
            let norm = (ox * ox + oy * oy + oz * oz).sqrt();
            prop_assume!(norm > 1e-6);
            let w = direction_weights([ox / norm, oy / norm, oz / norm]);
            for (d, &x) in w.iter().enumerate() {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&x), "w[{d}] = {x}");
            }
        }
    }

    // ── Nodal conductance and junctions ───────────────────────────

    #[test]
    fn isotropic_strand_junction_count_and_conductance() {
        // 10 cells in a line: 9 junctions, each g = D / h (unoriented
        // cells default to full conductance).
        let (net, report) = uniform_network(
            strand(10, 0.2),
            0.2,
            0.05,
            OrientationField::isotropic(10),
        );
        assert_eq!(report.junctions, 9);
        assert_eq!(report.undefined_orientation_cells, 10);
        for j in net.junctions() {
            assert!((j.conductance - 0.2 / 0.2).abs() < 1e-12);
            assert_eq!(j.kind, JunctionKind::Unoriented);
        }
    }

    #[test]
    fn one_junction_per_unordered_pair() {
        let (net, _) = uniform_network(
            block(3, 3, 3, 0.2),
            0.2,
            0.05,
            OrientationField::isotropic(27),
        );
        for (i, a) in net.junctions().iter().enumerate() {
            assert_ne!(a.minus, a.plus);
            for b in &net.junctions()[i + 1..] {
                let same = a.minus == b.minus && a.plus == b.plus;
                let reversed = a.minus == b.plus && a.plus == b.minus;
                assert!(!same && !reversed, "duplicate junction {a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn junction_conductance_averages_endpoints() {
        // Two cells with different D1: the junction blends them.
        let topo = two_cell_pair(0.2);
        let diff = Diffusivity::per_cell(vec![0.2, 0.1], vec![0.05, 0.05]).unwrap();
        let orient = OrientationField::isotropic(2);
        let (net, _) = NetworkModel::build(Arc::new(topo), &diff, &orient).unwrap();
        assert_eq!(net.junctions().len(), 1);
        let expect = 0.5 * (0.2 / 0.2 + 0.1 / 0.2);
        assert!((net.junctions()[0].conductance - expect).abs() < 1e-12);
    }

    #[test]
    fn axial_and_transverse_tags() {
        // Fiber along x on a 3x3x1 slab: x junctions axial, y junctions
        // transverse.
        let topo = block(3, 3, 1, 0.2);
        let n = topo.cell_count();
        let orient = OrientationField::from_primary(vec![[1.0, 0.0, 0.0]; n]).unwrap();
        let (net, report) = uniform_network(topo, 0.2, 0.05, orient);
        assert_eq!(report.undefined_orientation_cells, 0);
        for j in net.junctions() {
            let (mi, mj, _) = net.topology.coords(j.minus);
            let (pi, pj, _) = net.topology.coords(j.plus);
            if mj == pj && (pi - mi).abs() == 1 {
                assert_eq!(j.kind, JunctionKind::Axial, "x junction {j:?}");
            }
            if mi == pi && (pj - mj).abs() == 1 {
                assert_eq!(j.kind, JunctionKind::Transverse, "y junction {j:?}");
            }
        }
    }

    #[test]
    fn diagonal_step_length_scales_conductance() {
        let (net, _) = uniform_network(
            block(2, 2, 1, 0.2),
            0.2,
            0.2,
            OrientationField::isotropic(4),
        );
        // Axis junctions: g = D/h; diagonal junctions: g = D/(h*sqrt(2)).
        let axis = net.slot_conductance(0, Slot::Xp);
        let diag = net.slot_conductance(0, Slot::XpYp);
        assert!((axis - 1.0).abs() < 1e-12);
        assert!((diag - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    // ── Flux ──────────────────────────────────────────────────────

    #[test]
    fn gap_flux_is_equal_and_opposite() {
        // Isolated two-cell junction: the update moves charge, never
        // creates it.
        let (net, _) =
            uniform_network(two_cell_pair(0.2), 0.2, 0.05, OrientationField::isotropic(2));
        let v = vec![0.0, 1.0];
        let minus = net.coupling(0, &v);
        let plus = net.coupling(1, &v);
        assert!(minus > 0.0, "minus cell gains");
        assert!(plus < 0.0, "plus cell loses");
        assert!((minus + plus).abs() < 1e-12);
        // dt-scaled sum of voltages is invariant under the junction pass.
        let dt = 0.02;
        let sum_after = (v[0] + dt * minus) + (v[1] + dt * plus);
        assert!((sum_after - 1.0).abs() < 1e-12);
    }

    #[test]
    fn severed_pair_has_no_junction_and_no_flux() {
        let l = Lattice::new(4, 1, 1, 0.2).unwrap();
        let m = GeoMask::new(&l, vec![1, 1, 2, 2]).unwrap();
        let (mut topo, _) = Topology::build(l, &m).unwrap();
        topo.sever(&DisconnectSet::new([(CellType(1), CellType(2))]))
            .unwrap();
        let (net, report) = uniform_network(topo, 0.2, 0.05, OrientationField::isotropic(4));
        // Only 0-1 and 2-3 remain.
        assert_eq!(report.junctions, 2);
        let v = vec![0.0, 0.0, 1.0, 1.0];
        assert_eq!(net.coupling(1, &v), 0.0, "no flux across the cut");
        assert_eq!(net.coupling(2, &v), 0.0);
    }

    #[test]
    fn stability_bound_is_per_cell_total_rate() {
        let (net, _) = uniform_network(strand(3, 0.2), 0.2, 0.2, OrientationField::isotropic(3));
        // Middle cell carries two g = 1 junctions.
        let dt = net.max_stable_dt().unwrap();
        assert!((dt - 0.5).abs() < 1e-12);
    }
}
