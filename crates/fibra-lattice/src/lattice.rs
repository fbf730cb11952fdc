//! The [`Lattice`]: dimensions, spacing, and flat-index arithmetic.

use crate::direction::Slot;
use crate::error::LatticeError;

/// A regular 3D lattice with per-axis physical spacing.
///
/// 1D and 2D simulations are lattices with `ny == nz == 1` or
/// `nz == 1`; nothing downstream special-cases dimensionality, because
/// out-of-bounds neighbor steps fold to self and zero the
/// corresponding flux terms.
///
/// All flat-index arithmetic in the workspace goes through
/// [`flat`](Lattice::flat) / [`coords`](Lattice::coords): the scan
/// order is z-outer, then y, then x, so
/// `flat(i, j, k) = i + nx * (j + ny * k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    nx: u32,
    ny: u32,
    nz: u32,
    hx: f64,
    hy: f64,
    hz: f64,
}

impl Lattice {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a lattice with uniform spacing `h` on all axes.
    pub fn new(nx: u32, ny: u32, nz: u32, h: f64) -> Result<Self, LatticeError> {
        Self::with_spacing(nx, ny, nz, h, h, h)
    }

    /// Create a lattice with per-axis spacing.
    ///
    /// Returns `Err` if any dimension is zero or exceeds
    /// [`MAX_DIM`](Self::MAX_DIM), or any spacing is non-finite or
    /// non-positive.
    pub fn with_spacing(
        nx: u32,
        ny: u32,
        nz: u32,
        hx: f64,
        hy: f64,
        hz: f64,
    ) -> Result<Self, LatticeError> {
        for (name, val) in [("nx", nx), ("ny", ny), ("nz", nz)] {
            if val == 0 {
                return Err(LatticeError::EmptyDimension { name });
            }
            if val > Self::MAX_DIM {
                return Err(LatticeError::DimensionTooLarge {
                    name,
                    value: val,
                    max: Self::MAX_DIM,
                });
            }
        }
        for (name, val) in [("hx", hx), ("hy", hy), ("hz", hz)] {
            if !val.is_finite() || val <= 0.0 {
                return Err(LatticeError::InvalidSpacing { name, value: val });
            }
        }
        Ok(Self {
            nx,
            ny,
            nz,
            hx,
            hy,
            hz,
        })
    }

    /// Extent along x.
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Extent along y.
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Extent along z.
    pub fn nz(&self) -> u32 {
        self.nz
    }

    /// Per-axis spacing `(hx, hy, hz)`.
    pub fn spacing(&self) -> (f64, f64, f64) {
        (self.hx, self.hy, self.hz)
    }

    /// Total lattice point count (`nx * ny * nz`), tissue or not.
    pub fn point_count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    /// Whether `(i, j, k)` lies inside the lattice bounds.
    pub fn contains(&self, i: i32, j: i32, k: i32) -> bool {
        i >= 0
            && i < self.nx as i32
            && j >= 0
            && j < self.ny as i32
            && k >= 0
            && k < self.nz as i32
    }

    /// Flat scan-order index of an in-bounds coordinate.
    pub fn flat(&self, i: i32, j: i32, k: i32) -> usize {
        debug_assert!(self.contains(i, j, k), "flat({i},{j},{k}) out of bounds");
        i as usize + self.nx as usize * (j as usize + self.ny as usize * k as usize)
    }

    /// Coordinate of a flat index, inverting [`flat`](Self::flat).
    pub fn coords(&self, idx: usize) -> (i32, i32, i32) {
        debug_assert!(idx < self.point_count(), "coords({idx}) out of bounds");
        let nx = self.nx as usize;
        let ny = self.ny as usize;
        let i = idx % nx;
        let j = (idx / nx) % ny;
        let k = idx / (nx * ny);
        (i as i32, j as i32, k as i32)
    }

    /// Step one slot from `(i, j, k)`, or `None` when the target leaves
    /// the lattice. Bounds are the *original* lattice extents, never
    /// the compacted cell count.
    pub fn step(&self, i: i32, j: i32, k: i32, slot: Slot) -> Option<(i32, i32, i32)> {
        let (di, dj, dk) = slot.offset();
        let (ti, tj, tk) = (i + di, j + dj, k + dk);
        if self.contains(ti, tj, tk) {
            Some((ti, tj, tk))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_zero_dimension() {
        assert!(matches!(
            Lattice::new(0, 4, 4, 0.1),
            Err(LatticeError::EmptyDimension { name: "nx" })
        ));
        assert!(matches!(
            Lattice::new(4, 0, 4, 0.1),
            Err(LatticeError::EmptyDimension { name: "ny" })
        ));
        assert!(matches!(
            Lattice::new(4, 4, 0, 0.1),
            Err(LatticeError::EmptyDimension { name: "nz" })
        ));
    }

    #[test]
    fn rejects_bad_spacing() {
        assert!(matches!(
            Lattice::new(4, 4, 4, 0.0),
            Err(LatticeError::InvalidSpacing { name: "hx", .. })
        ));
        assert!(matches!(
            Lattice::with_spacing(4, 4, 4, 0.1, f64::NAN, 0.1),
            Err(LatticeError::InvalidSpacing { name: "hy", .. })
        ));
        assert!(matches!(
            Lattice::with_spacing(4, 4, 4, 0.1, 0.1, -1.0),
            Err(LatticeError::InvalidSpacing { name: "hz", .. })
        ));
    }

    #[test]
    fn scan_order_is_z_outer_x_inner() {
        let l = Lattice::new(3, 2, 2, 1.0).unwrap();
        assert_eq!(l.flat(0, 0, 0), 0);
        assert_eq!(l.flat(1, 0, 0), 1);
        assert_eq!(l.flat(0, 1, 0), 3);
        assert_eq!(l.flat(0, 0, 1), 6);
        assert_eq!(l.flat(2, 1, 1), 11);
    }

    #[test]
    fn step_leaves_lattice_at_edges() {
        let l = Lattice::new(3, 3, 1, 1.0).unwrap();
        assert_eq!(l.step(0, 0, 0, Slot::Xm), None);
        assert_eq!(l.step(0, 0, 0, Slot::Zp), None);
        assert_eq!(l.step(0, 0, 0, Slot::XpYp), Some((1, 1, 0)));
        assert_eq!(l.step(2, 2, 0, Slot::Xp), None);
    }

    proptest! {
        #[test]
        fn flat_coords_roundtrip(
            nx in 1u32..12, ny in 1u32..12, nz in 1u32..12,
            idx in 0usize..1728,
        ) {
            let l = Lattice::new(nx, ny, nz, 0.2).unwrap();
            let idx = idx % l.point_count();
            let (i, j, k) = l.coords(idx);
            prop_assert!(l.contains(i, j, k));
            prop_assert_eq!(l.flat(i, j, k), idx);
        }
    }
}
