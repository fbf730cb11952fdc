//! Diffusion tensor component assembly and derivative pass.

use crate::diffusivity::Diffusivity;
use crate::error::TensorError;
use crate::orientation::OrientationField;
use fibra_lattice::{Slot, Topology};

/// The six symmetric diffusion tensor components per cell plus their
/// first spatial derivatives.
///
/// Assembled once at setup from the fiber orientation and the (already
/// scaled) diffusivities; immutable during integration. Any operator
/// cache derived from this tensor must be rebuilt if a new tensor is
/// assembled.
///
/// Components follow the standard fiber construction: with unit fiber
/// `(ox, oy, oz)`, `Dαα = D2 + (D1 − D2)·oα²` and
/// `Dαβ = |(D1 − D2)·oα·oβ|`. The cross terms take their absolute value
/// because the discretization requires non-negative cross-diffusion
/// coefficients. A zero orientation reduces every principal term to
/// `D2` and every cross term to zero.
#[derive(Debug, Clone)]
pub struct DiffusionTensor {
    dxx: Vec<f64>,
    dyy: Vec<f64>,
    dzz: Vec<f64>,
    dxy: Vec<f64>,
    dxz: Vec<f64>,
    dyz: Vec<f64>,
    dxx_dx: Vec<f64>,
    dyy_dy: Vec<f64>,
    dzz_dz: Vec<f64>,
    dxy_dx: Vec<f64>,
    dxy_dy: Vec<f64>,
    dxz_dx: Vec<f64>,
    dxz_dz: Vec<f64>,
    dyz_dy: Vec<f64>,
    dyz_dz: Vec<f64>,
}

/// One spatial derivative of a cell-indexed field.
///
/// Central difference where both axis neighbors are distinct real
/// cells, one-sided where only one is, zero where the cell is isolated
/// along that axis.
fn derive(topology: &Topology, field: &[f64], plus: Slot, h: f64) -> Vec<f64> {
    let minus = plus.opposite();
    (0..field.len())
        .map(|cell| {
            let p = topology.neighbour_index(cell, plus);
            let m = topology.neighbour_index(cell, minus);
            match (p != cell, m != cell) {
                (true, true) => (field[p] - field[m]) / (2.0 * h),
                (true, false) => (field[p] - field[cell]) / h,
                (false, true) => (field[cell] - field[m]) / h,
                (false, false) => 0.0,
            }
        })
        .collect()
}

impl DiffusionTensor {
    /// Assemble tensor components and derivatives.
    ///
    /// `diffusivity` and `orientation` must both cover exactly the
    /// topology's cell count.
    pub fn assemble(
        topology: &Topology,
        diffusivity: &Diffusivity,
        orientation: &OrientationField,
    ) -> Result<Self, TensorError> {
        let n = topology.cell_count();
        if diffusivity.len() != n {
            return Err(TensorError::LengthMismatch {
                field: "diffusivity",
                expected: n,
                got: diffusivity.len(),
            });
        }
        if orientation.len() != n {
            return Err(TensorError::LengthMismatch {
                field: "orientation",
                expected: n,
                got: orientation.len(),
            });
        }

        let mut dxx = Vec::with_capacity(n);
        let mut dyy = Vec::with_capacity(n);
        let mut dzz = Vec::with_capacity(n);
        let mut dxy = Vec::with_capacity(n);
        let mut dxz = Vec::with_capacity(n);
        let mut dyz = Vec::with_capacity(n);

        for cell in 0..n {
            let d1 = diffusivity.d1(cell);
            let d2 = diffusivity.d2(cell);
            let [ox, oy, oz] = orientation.primary(cell);
            let dd = d1 - d2;
            dxx.push(d2 + dd * ox * ox);
            dyy.push(d2 + dd * oy * oy);
            dzz.push(d2 + dd * oz * oz);
            dxy.push((dd * ox * oy).abs());
            dxz.push((dd * ox * oz).abs());
            dyz.push((dd * oy * oz).abs());
        }

        let (hx, hy, hz) = topology.lattice().spacing();
        let dxx_dx = derive(topology, &dxx, Slot::Xp, hx);
        let dyy_dy = derive(topology, &dyy, Slot::Yp, hy);
        let dzz_dz = derive(topology, &dzz, Slot::Zp, hz);
        let dxy_dx = derive(topology, &dxy, Slot::Xp, hx);
        let dxy_dy = derive(topology, &dxy, Slot::Yp, hy);
        let dxz_dx = derive(topology, &dxz, Slot::Xp, hx);
        let dxz_dz = derive(topology, &dxz, Slot::Zp, hz);
        let dyz_dy = derive(topology, &dyz, Slot::Yp, hy);
        let dyz_dz = derive(topology, &dyz, Slot::Zp, hz);

        Ok(Self {
            dxx,
            dyy,
            dzz,
            dxy,
            dxz,
            dyz,
            dxx_dx,
            dyy_dy,
            dzz_dz,
            dxy_dx,
            dxy_dy,
            dxz_dx,
            dxz_dz,
            dyz_dy,
            dyz_dz,
        })
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.dxx.len()
    }

    /// Whether the tensor covers zero cells.
    pub fn is_empty(&self) -> bool {
        self.dxx.is_empty()
    }

    /// `Dxx` at a cell.
    pub fn dxx(&self, cell: usize) -> f64 {
        self.dxx[cell]
    }

    /// `Dyy` at a cell.
    pub fn dyy(&self, cell: usize) -> f64 {
        self.dyy[cell]
    }

    /// `Dzz` at a cell.
    pub fn dzz(&self, cell: usize) -> f64 {
        self.dzz[cell]
    }

    /// `Dxy` at a cell (non-negative by construction).
    pub fn dxy(&self, cell: usize) -> f64 {
        self.dxy[cell]
    }

    /// `Dxz` at a cell (non-negative by construction).
    pub fn dxz(&self, cell: usize) -> f64 {
        self.dxz[cell]
    }

    /// `Dyz` at a cell (non-negative by construction).
    pub fn dyz(&self, cell: usize) -> f64 {
        self.dyz[cell]
    }

    /// `∂Dxx/∂x` at a cell.
    pub fn dxx_dx(&self, cell: usize) -> f64 {
        self.dxx_dx[cell]
    }

    /// `∂Dyy/∂y` at a cell.
    pub fn dyy_dy(&self, cell: usize) -> f64 {
        self.dyy_dy[cell]
    }

    /// `∂Dzz/∂z` at a cell.
    pub fn dzz_dz(&self, cell: usize) -> f64 {
        self.dzz_dz[cell]
    }

    /// `∂Dxy/∂x` at a cell.
    pub fn dxy_dx(&self, cell: usize) -> f64 {
        self.dxy_dx[cell]
    }

    /// `∂Dxy/∂y` at a cell.
    pub fn dxy_dy(&self, cell: usize) -> f64 {
        self.dxy_dy[cell]
    }

    /// `∂Dxz/∂x` at a cell.
    pub fn dxz_dx(&self, cell: usize) -> f64 {
        self.dxz_dx[cell]
    }

    /// `∂Dxz/∂z` at a cell.
    pub fn dxz_dz(&self, cell: usize) -> f64 {
        self.dxz_dz[cell]
    }

    /// `∂Dyz/∂y` at a cell.
    pub fn dyz_dy(&self, cell: usize) -> f64 {
        self.dyz_dy[cell]
    }

    /// `∂Dyz/∂z` at a cell.
    pub fn dyz_dz(&self, cell: usize) -> f64 {
        self.dyz_dz[cell]
    }

    /// The advective coefficients `(ax, ay, az)` at a cell:
    /// `ax = ∂Dxx/∂x + ∂Dxy/∂y + ∂Dxz/∂z` and its permutations. These
    /// multiply the first derivatives of voltage in the flux expansion.
    pub fn advect(&self, cell: usize) -> (f64, f64, f64) {
        (
            self.dxx_dx[cell] + self.dxy_dy[cell] + self.dxz_dz[cell],
            self.dxy_dx[cell] + self.dyy_dy[cell] + self.dyz_dz[cell],
            self.dxz_dx[cell] + self.dyz_dy[cell] + self.dzz_dz[cell],
        )
    }
}
