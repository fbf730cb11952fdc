//! Canned lattices and topologies.

use fibra_lattice::{GeoMask, Lattice, Topology};

/// A 1D strand of `n` cells with spacing `h`.
pub fn strand(n: u32, h: f64) -> Topology {
    let lattice = Lattice::new(n, 1, 1, h).unwrap();
    let mask = GeoMask::solid(&lattice);
    Topology::build(lattice, &mask).unwrap().0
}

/// A 2D `nx x ny` slab with spacing `h`.
pub fn slab(nx: u32, ny: u32, h: f64) -> Topology {
    block(nx, ny, 1, h)
}

/// A 3D `nx x ny x nz` block with spacing `h`.
pub fn block(nx: u32, ny: u32, nz: u32, h: f64) -> Topology {
    let lattice = Lattice::new(nx, ny, nz, h).unwrap();
    let mask = GeoMask::solid(&lattice);
    Topology::build(lattice, &mask).unwrap().0
}

/// An isolated pair of adjacent cells, the smallest junction fixture.
pub fn two_cell_pair(h: f64) -> Topology {
    strand(2, h)
}

/// A `nx x ny` slab with the center lattice point carved out,
/// exercising interior non-tissue folding.
pub fn slab_with_hole(nx: u32, ny: u32, h: f64) -> Topology {
    let lattice = Lattice::new(nx, ny, 1, h).unwrap();
    let mut values = vec![1i32; lattice.point_count()];
    let ci = (nx / 2) as i32;
    let cj = (ny / 2) as i32;
    values[lattice.flat(ci, cj, 0)] = 0;
    let mask = GeoMask::new(&lattice, values).unwrap();
    Topology::build(lattice, &mask).unwrap().0
}
