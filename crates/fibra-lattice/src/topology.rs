//! Compact cell indexing and the 26-slot neighbor map.

use crate::direction::Slot;
use crate::disconnect::DisconnectSet;
use crate::error::LatticeError;
use crate::lattice::Lattice;
use crate::mask::GeoMask;
use fibra_core::{CellId, CellType};
use smallvec::SmallVec;

/// Sentinel for lattice points with no cell.
const NO_CELL: u32 = u32::MAX;

/// Aggregate counters from topology assembly.
///
/// Boundary folding is expected and silent per cell; the report lets
/// callers surface one summary line instead of per-cell warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyReport {
    /// Number of real tissue cells (`N`).
    pub cells: usize,
    /// Neighbor slots folded back to self (domain edge or non-tissue).
    pub boundary_folds: usize,
}

/// The computational grid: cell index bijection plus neighbor map.
///
/// Built once from a finalized [`GeoMask`] and immutable thereafter,
/// except for [`sever`](Topology::sever), which edits the neighbor map
/// before the time loop begins. Cell ids run `0..N` in z-outer / y /
/// x-inner scan order over the mask.
///
/// # Neighbor folding
///
/// `neighbour(cell, slot)` is the id of the cell one `slot` step away
/// when that target is in-bounds *and* tissue; otherwise it is `cell`
/// itself. Each slot is resolved independently — one usable direction
/// never depends on the opposite one — and always against the original
/// lattice bounds.
#[derive(Debug, Clone)]
pub struct Topology {
    lattice: Lattice,
    cell_coords: Vec<[i32; 3]>,
    cell_types: Vec<CellType>,
    cell_of: Vec<u32>,
    neighbours: Vec<u32>,
    max_celltype: CellType,
}

impl Topology {
    /// Build the cell index and neighbor map from a mask.
    ///
    /// Returns `Err(LatticeError::EmptyTissue)` when the mask holds no
    /// real cells; every dependent stage is undefined in that case.
    pub fn build(lattice: Lattice, mask: &GeoMask) -> Result<(Self, TopologyReport), LatticeError> {
        if mask.tissue_count() == 0 {
            return Err(LatticeError::EmptyTissue);
        }
        if mask.tissue_count() > NO_CELL as usize {
            return Err(LatticeError::TooManyCells {
                count: mask.tissue_count(),
            });
        }
        // The mask was validated against some lattice; re-check against
        // this one so mismatched pairs fail instead of misindexing.
        if mask.point_count() != lattice.point_count() {
            return Err(LatticeError::MaskSizeMismatch {
                expected: lattice.point_count(),
                got: mask.point_count(),
            });
        }

        let n = mask.tissue_count();
        let mut cell_of = vec![NO_CELL; lattice.point_count()];
        let mut cell_coords = Vec::with_capacity(n);
        let mut cell_types = Vec::with_capacity(n);

        // Pass 1: assign compact ids in scan order.
        for k in 0..lattice.nz() as i32 {
            for j in 0..lattice.ny() as i32 {
                for i in 0..lattice.nx() as i32 {
                    let flat = lattice.flat(i, j, k);
                    if let Some(ct) = mask.celltype(flat) {
                        cell_of[flat] = cell_coords.len() as u32;
                        cell_coords.push([i, j, k]);
                        cell_types.push(ct);
                    }
                }
            }
        }
        debug_assert_eq!(cell_coords.len(), n);

        // Pass 2: resolve all 26 slots per cell, folding to self.
        let mut neighbours = vec![0u32; n * Slot::COUNT];
        let mut boundary_folds = 0usize;
        for (id, &[i, j, k]) in cell_coords.iter().enumerate() {
            let base = id * Slot::COUNT;
            for slot in Slot::ALL {
                let target = lattice
                    .step(i, j, k, slot)
                    .map(|(ti, tj, tk)| cell_of[lattice.flat(ti, tj, tk)])
                    .filter(|&c| c != NO_CELL);
                neighbours[base + slot.index()] = match target {
                    Some(c) => c,
                    None => {
                        boundary_folds += 1;
                        id as u32
                    }
                };
            }
        }

        let max_celltype = mask.max_celltype().unwrap_or(CellType(0));
        let report = TopologyReport {
            cells: n,
            boundary_folds,
        };
        Ok((
            Self {
                lattice,
                cell_coords,
                cell_types,
                cell_of,
                neighbours,
                max_celltype,
            },
            report,
        ))
    }

    /// The underlying lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of real cells (`N`).
    pub fn cell_count(&self) -> usize {
        self.cell_coords.len()
    }

    /// Largest celltype present in the mask.
    pub fn max_celltype(&self) -> CellType {
        self.max_celltype
    }

    /// Cell id at a lattice coordinate, `None` for non-tissue or
    /// out-of-bounds.
    pub fn cell_at(&self, i: i32, j: i32, k: i32) -> Option<CellId> {
        if !self.lattice.contains(i, j, k) {
            return None;
        }
        let c = self.cell_of[self.lattice.flat(i, j, k)];
        (c != NO_CELL).then_some(CellId(c))
    }

    /// Lattice coordinate of a cell.
    pub fn coords(&self, cell: CellId) -> (i32, i32, i32) {
        let [i, j, k] = self.cell_coords[cell.index()];
        (i, j, k)
    }

    /// Celltype of a cell.
    pub fn celltype(&self, cell: CellId) -> CellType {
        self.cell_types[cell.index()]
    }

    /// The neighbor in `slot`, or `cell` itself at a no-flux boundary.
    pub fn neighbour(&self, cell: CellId, slot: Slot) -> CellId {
        CellId(self.neighbours[cell.index() * Slot::COUNT + slot.index()])
    }

    /// Hot-path variant of [`neighbour`](Self::neighbour) over raw indices.
    #[inline]
    pub fn neighbour_index(&self, cell: usize, slot: Slot) -> usize {
        self.neighbours[cell * Slot::COUNT + slot.index()] as usize
    }

    /// Whether `slot` folds back to `cell` (boundary, non-tissue, or severed).
    pub fn is_folded(&self, cell: CellId, slot: Slot) -> bool {
        self.neighbour(cell, slot) == cell
    }

    /// All distinct real neighbors of a cell, in slot order.
    pub fn neighbours(&self, cell: CellId) -> SmallVec<[CellId; 26]> {
        let mut out = SmallVec::new();
        for slot in Slot::ALL {
            let nb = self.neighbour(cell, slot);
            if nb != cell {
                out.push(nb);
            }
        }
        out
    }

    /// Sever junctions between every adjacent pair whose celltypes match
    /// the disconnect set, in either order.
    ///
    /// This is a hard topology edit: both slots of both endpoints fold
    /// to self, so the finite-difference operators and the network model
    /// observe the same disconnection. Applying the same set twice is a
    /// no-op. Returns the number of unordered pairs severed.
    ///
    /// Returns `Err(LatticeError::CelltypeOutOfRange)` when a pair
    /// references a celltype larger than any the mask declares.
    pub fn sever(&mut self, set: &DisconnectSet) -> Result<usize, LatticeError> {
        if let Some(max) = set.max_celltype() {
            if max > self.max_celltype {
                return Err(LatticeError::CelltypeOutOfRange {
                    value: max,
                    max: self.max_celltype,
                });
            }
        }
        if set.is_empty() {
            return Ok(0);
        }

        let mut severed = 0usize;
        for cell in 0..self.cell_count() {
            for slot in Slot::UNIQUE {
                let nb = self.neighbours[cell * Slot::COUNT + slot.index()] as usize;
                if nb == cell {
                    continue;
                }
                if set.matches(self.cell_types[cell], self.cell_types[nb]) {
                    self.neighbours[cell * Slot::COUNT + slot.index()] = cell as u32;
                    self.neighbours[nb * Slot::COUNT + slot.opposite().index()] = nb as u32;
                    severed += 1;
                }
            }
        }
        Ok(severed)
    }
}
