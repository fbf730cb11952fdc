//! The scan-order geometry mask.

use crate::error::LatticeError;
use crate::lattice::Lattice;
use fibra_core::CellType;

/// Per-lattice-point tissue classification in scan order.
///
/// One integer per lattice point, z-outer / y / x-inner: `0` (or any
/// non-positive value) marks non-tissue space and may appear anywhere
/// in the scan; `1..=K` is a celltype id. The mask is produced by the
/// excluded geometry layer; this type only validates shape and exposes
/// typed accessors.
#[derive(Debug, Clone)]
pub struct GeoMask {
    values: Vec<i32>,
    tissue_count: usize,
    max_celltype: u16,
}

impl GeoMask {
    /// Wrap a scan-order value vector for the given lattice.
    ///
    /// Returns `Err` if the length does not match the lattice point
    /// count or a positive value exceeds the celltype range.
    pub fn new(lattice: &Lattice, values: Vec<i32>) -> Result<Self, LatticeError> {
        if values.len() != lattice.point_count() {
            return Err(LatticeError::MaskSizeMismatch {
                expected: lattice.point_count(),
                got: values.len(),
            });
        }
        let mut tissue_count = 0usize;
        let mut max_celltype = 0u16;
        for &v in &values {
            if v > 0 {
                let ct = u16::try_from(v).map_err(|_| LatticeError::CelltypeTooLarge { value: v })?;
                tissue_count += 1;
                max_celltype = max_celltype.max(ct);
            }
        }
        Ok(Self {
            values,
            tissue_count,
            max_celltype,
        })
    }

    /// A mask where every lattice point is tissue of celltype 1.
    pub fn solid(lattice: &Lattice) -> Self {
        Self {
            values: vec![1; lattice.point_count()],
            tissue_count: lattice.point_count(),
            max_celltype: 1,
        }
    }

    /// Raw mask value at a flat index.
    pub fn value(&self, idx: usize) -> i32 {
        self.values[idx]
    }

    /// Number of lattice points the mask covers.
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    /// Whether the point at a flat index is real tissue.
    pub fn is_tissue(&self, idx: usize) -> bool {
        self.values[idx] > 0
    }

    /// Celltype at a flat index, `None` for non-tissue.
    pub fn celltype(&self, idx: usize) -> Option<CellType> {
        let v = self.values[idx];
        (v > 0).then(|| CellType(v as u16))
    }

    /// Number of real tissue points.
    pub fn tissue_count(&self) -> usize {
        self.tissue_count
    }

    /// The largest celltype present, `None` for an all-empty mask.
    pub fn max_celltype(&self) -> Option<CellType> {
        (self.max_celltype > 0).then_some(CellType(self.max_celltype))
    }
}
