//! Precomputed upwinded Laplacian stencil operator.

use crate::error::OperatorError;
use crate::operator::CouplingOperator;
use fibra_lattice::{Slot, Topology};
use fibra_tensor::DiffusionTensor;
use std::sync::Arc;

/// Weight table stride: 26 neighbor slots plus the self weight.
const STRIDE: usize = Slot::COUNT + 1;
/// Index of the self weight within each cell's table row.
const SELF_W: usize = Slot::COUNT;

/// The cached-weight rendering of the anisotropic Laplacian.
///
/// One signed weight per cell for self and each of the 26 neighbor
/// slots, synthesized once per tensor; each step is then a single
/// weighted sum over the voltage field. Synthesis rules:
///
/// - Principal second derivatives contribute symmetric central weights
///   (`D/h²` to both axis slots, `-2D/h²` to self). Folded slots
///   resolve to self at evaluation time, which reproduces the no-flux
///   collapse of the direct stencil exactly.
/// - Advective terms are upwinded: the sign of the tensor-derivative
///   coefficient routes the flux to the upstream or downstream axis
///   slot, with the matching self weight so the term's weights sum to
///   zero (conservation). A folded target cancels against self,
///   zeroing the term at boundaries.
/// - Mixed second derivatives contribute the 4-point alternating-sign
///   corner pattern, disabled entirely when any required diagonal slot
///   is folded (zero rather than a biased half-stencil).
///
/// The cache is valid for exactly the tensor it was built from.
/// Rebuild via [`rebuild`](StencilOperator::rebuild) after any
/// diffusivity rescaling; evaluating against a stale cache is a
/// correctness bug, not a performance issue.
pub struct StencilOperator {
    topology: Arc<Topology>,
    weights: Vec<f64>,
}

impl StencilOperator {
    /// Synthesize the weight cache from a finalized tensor.
    pub fn build(
        topology: Arc<Topology>,
        tensor: &DiffusionTensor,
    ) -> Result<Self, OperatorError> {
        let mut op = Self {
            weights: Vec::new(),
            topology,
        };
        op.rebuild(tensor)?;
        Ok(op)
    }

    /// Recompute every weight from a (new) tensor over the same topology.
    pub fn rebuild(&mut self, tensor: &DiffusionTensor) -> Result<(), OperatorError> {
        let n = self.topology.cell_count();
        if tensor.len() != n {
            return Err(OperatorError::LengthMismatch {
                field: "tensor",
                expected: n,
                got: tensor.len(),
            });
        }
        let (hx, hy, hz) = self.topology.lattice().spacing();
        let mut weights = vec![0.0f64; n * STRIDE];

        for cell in 0..n {
            let w = &mut weights[cell * STRIDE..(cell + 1) * STRIDE];

            // Principal second derivatives: symmetric central weights.
            for (d, plus, h) in [
                (tensor.dxx(cell), Slot::Xp, hx),
                (tensor.dyy(cell), Slot::Yp, hy),
                (tensor.dzz(cell), Slot::Zp, hz),
            ] {
                let c = d / (h * h);
                w[plus.index()] += c;
                w[plus.opposite().index()] += c;
                w[SELF_W] -= 2.0 * c;
            }

            // Advective terms: upwind on the coefficient sign, weights
            // summing to zero per term.
            let (ax, ay, az) = tensor.advect(cell);
            for (a, plus, h) in [(ax, Slot::Xp, hx), (ay, Slot::Yp, hy), (az, Slot::Zp, hz)] {
                if a > 0.0 {
                    w[plus.index()] += a / h;
                    w[SELF_W] -= a / h;
                } else if a < 0.0 {
                    w[plus.opposite().index()] -= a / h;
                    w[SELF_W] += a / h;
                }
            }

            // Mixed second derivatives: 4-point cross-partials over the
            // face diagonals, skipped when any corner of the quad folds.
            for (d, pp, pm, mp, mm, ha, hb) in [
                (
                    tensor.dxy(cell),
                    Slot::XpYp,
                    Slot::XpYm,
                    Slot::XmYp,
                    Slot::XmYm,
                    hx,
                    hy,
                ),
                (
                    tensor.dxz(cell),
                    Slot::XpZp,
                    Slot::XpZm,
                    Slot::XmZp,
                    Slot::XmZm,
                    hx,
                    hz,
                ),
                (
                    tensor.dyz(cell),
                    Slot::YpZp,
                    Slot::YpZm,
                    Slot::YmZp,
                    Slot::YmZm,
                    hy,
                    hz,
                ),
            ] {
                if d == 0.0 {
                    continue;
                }
                let quad = [pp, pm, mp, mm];
                if quad
                    .iter()
                    .any(|&s| self.topology.neighbour_index(cell, s) == cell)
                {
                    continue;
                }
                let c = 2.0 * d / (4.0 * ha * hb);
                w[pp.index()] += c;
                w[mm.index()] += c;
                w[pm.index()] -= c;
                w[mp.index()] -= c;
            }
        }

        self.weights = weights;
        Ok(())
    }

    /// The weight applied to a neighbor slot at a cell.
    pub fn weight(&self, cell: usize, slot: Slot) -> f64 {
        self.weights[cell * STRIDE + slot.index()]
    }

    /// The self weight at a cell.
    pub fn self_weight(&self, cell: usize) -> f64 {
        self.weights[cell * STRIDE + SELF_W]
    }
}

impl CouplingOperator for StencilOperator {
    fn name(&self) -> &str {
        "cached-stencil"
    }

    fn coupling(&self, cell: usize, v: &[f64]) -> f64 {
        let w = &self.weights[cell * STRIDE..(cell + 1) * STRIDE];
        let mut sum = w[SELF_W] * v[cell];
        for slot in Slot::ALL {
            let wi = w[slot.index()];
            if wi != 0.0 {
                sum += wi * v[self.topology.neighbour_index(cell, slot)];
            }
        }
        sum
    }

    fn max_stable_dt(&self) -> Option<f64> {
        // 1 + dt * w_eff must stay non-negative for every cell, where
        // w_eff is the self weight plus every folded slot's weight
        // (folded slots multiply V[self] at evaluation time).
        let worst = (0..self.topology.cell_count())
            .map(|cell| {
                let mut eff = self.self_weight(cell);
                for slot in Slot::ALL {
                    if self.topology.neighbour_index(cell, slot) == cell {
                        eff += self.weight(cell, slot);
                    }
                }
                eff.abs()
            })
            .fold(0.0, f64::max);
        (worst > 0.0).then(|| 1.0 / worst)
    }
}
