//! Per-cell scalar diffusivities with regional scaling.

use crate::error::TensorError;
use fibra_core::CellType;
use fibra_lattice::Topology;
use indexmap::IndexMap;

/// Per-cell longitudinal (`D1`) and transverse (`D2`) diffusivities.
///
/// Regional modifiers — celltype-keyed or masked scale factors — apply
/// here, before tensor assembly; the tensor itself never changes once
/// the time loop starts. Construct the `Diffusivity`, scale it, then
/// assemble.
#[derive(Debug, Clone)]
pub struct Diffusivity {
    d1: Vec<f64>,
    d2: Vec<f64>,
}

fn check(field: &'static str, values: &[f64]) -> Result<(), TensorError> {
    for (cell, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(TensorError::NonFinite { field, cell });
        }
        if v < 0.0 {
            return Err(TensorError::NegativeDiffusivity {
                field,
                cell,
                value: v,
            });
        }
    }
    Ok(())
}

impl Diffusivity {
    /// Uniform diffusivities across all cells.
    pub fn uniform(cells: usize, d1: f64, d2: f64) -> Result<Self, TensorError> {
        Self::per_cell(vec![d1; cells], vec![d2; cells])
    }

    /// Isotropic uniform diffusivity (`D1 == D2 == d`).
    pub fn isotropic(cells: usize, d: f64) -> Result<Self, TensorError> {
        Self::uniform(cells, d, d)
    }

    /// Per-cell diffusivity arrays. Both must have equal length and
    /// hold finite, non-negative values.
    pub fn per_cell(d1: Vec<f64>, d2: Vec<f64>) -> Result<Self, TensorError> {
        if d2.len() != d1.len() {
            return Err(TensorError::LengthMismatch {
                field: "d2",
                expected: d1.len(),
                got: d2.len(),
            });
        }
        check("d1", &d1)?;
        check("d2", &d2)?;
        Ok(Self { d1, d2 })
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.d1.len()
    }

    /// Whether the arrays cover zero cells.
    pub fn is_empty(&self) -> bool {
        self.d1.is_empty()
    }

    /// Longitudinal diffusivity at a cell.
    pub fn d1(&self, cell: usize) -> f64 {
        self.d1[cell]
    }

    /// Transverse diffusivity at a cell.
    pub fn d2(&self, cell: usize) -> f64 {
        self.d2[cell]
    }

    /// Largest longitudinal diffusivity, for stability estimates.
    pub fn max_d1(&self) -> f64 {
        self.d1.iter().copied().fold(0.0, f64::max)
    }

    /// Scale `D1`/`D2` for every cell of the listed celltypes.
    ///
    /// Factors apply to both scalars. A map entry naming a celltype the
    /// mask never declares is a configuration error (fail fast rather
    /// than silently scaling nothing).
    pub fn scale_celltype(
        &mut self,
        topology: &Topology,
        factors: &IndexMap<CellType, f64>,
    ) -> Result<(), TensorError> {
        for (&ct, &factor) in factors {
            if ct > topology.max_celltype() || ct.0 == 0 {
                return Err(TensorError::CelltypeOutOfRange {
                    value: ct,
                    max: topology.max_celltype(),
                });
            }
            if !factor.is_finite() || factor < 0.0 {
                return Err(TensorError::InvalidScale { value: factor });
            }
        }
        for cell in 0..self.len() {
            if let Some(&factor) = factors.get(&topology.celltype(fibra_core::CellId(cell as u32)))
            {
                self.d1[cell] *= factor;
                self.d2[cell] *= factor;
            }
        }
        Ok(())
    }

    /// Scale `D1`/`D2` wherever a per-cell overlay mask is set.
    pub fn scale_masked(&mut self, mask: &[bool], factor: f64) -> Result<(), TensorError> {
        if mask.len() != self.len() {
            return Err(TensorError::LengthMismatch {
                field: "scale mask",
                expected: self.len(),
                got: mask.len(),
            });
        }
        if !factor.is_finite() || factor < 0.0 {
            return Err(TensorError::InvalidScale { value: factor });
        }
        for (cell, &hit) in mask.iter().enumerate() {
            if hit {
                self.d1[cell] *= factor;
                self.d2[cell] *= factor;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibra_lattice::{GeoMask, Lattice};

    fn two_type_strand() -> Topology {
        let l = Lattice::new(4, 1, 1, 0.2).unwrap();
        let m = GeoMask::new(&l, vec![1, 1, 2, 2]).unwrap();
        Topology::build(l, &m).unwrap().0
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(matches!(
            Diffusivity::uniform(3, -0.1, 0.05),
            Err(TensorError::NegativeDiffusivity { field: "d1", .. })
        ));
        assert!(matches!(
            Diffusivity::per_cell(vec![0.1, f64::NAN], vec![0.05, 0.05]),
            Err(TensorError::NonFinite {
                field: "d1",
                cell: 1
            })
        ));
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(matches!(
            Diffusivity::per_cell(vec![0.1; 3], vec![0.05; 2]),
            Err(TensorError::LengthMismatch { field: "d2", .. })
        ));
    }

    #[test]
    fn celltype_scaling_hits_only_listed_cells() {
        let topo = two_type_strand();
        let mut d = Diffusivity::uniform(4, 0.2, 0.1).unwrap();
        let factors: IndexMap<CellType, f64> = [(CellType(2), 0.5)].into_iter().collect();
        d.scale_celltype(&topo, &factors).unwrap();
        assert_eq!(d.d1(0), 0.2);
        assert_eq!(d.d1(1), 0.2);
        assert_eq!(d.d1(2), 0.1);
        assert_eq!(d.d2(3), 0.05);
    }

    #[test]
    fn celltype_scaling_rejects_undeclared_type() {
        let topo = two_type_strand();
        let mut d = Diffusivity::uniform(4, 0.2, 0.1).unwrap();
        let factors: IndexMap<CellType, f64> = [(CellType(7), 0.5)].into_iter().collect();
        assert!(matches!(
            d.scale_celltype(&topo, &factors),
            Err(TensorError::CelltypeOutOfRange {
                value: CellType(7),
                ..
            })
        ));
    }

    #[test]
    fn masked_scaling_checks_length() {
        let mut d = Diffusivity::uniform(4, 0.2, 0.1).unwrap();
        assert!(d.scale_masked(&[true, false, false], 0.5).is_err());
        d.scale_masked(&[true, false, false, true], 0.5).unwrap();
        assert_eq!(d.d1(0), 0.1);
        assert_eq!(d.d1(1), 0.2);
        assert_eq!(d.d2(3), 0.05);
    }
}
