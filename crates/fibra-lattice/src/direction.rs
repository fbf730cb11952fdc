//! The 26-neighborhood direction table.
//!
//! A 3D lattice cell has up to 26 geometric neighbors: 6 across faces
//! (axis steps), 12 across edges (face-diagonal steps), and 8 across
//! corners. Opposite steps pair up into 13 unique directions; the
//! network model decomposes conductance per unique direction while the
//! finite-difference stencils address individual signed slots.
//!
//! Slots are laid out so that a slot and its opposite differ only in
//! the lowest bit (`opposite = slot ^ 1`), with the positive
//! representative on the even index. `Slot::UNIQUE` lists the 13
//! positive representatives in axis / face-diagonal / corner order.

use std::fmt;

/// Geometric class of a neighbor direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionClass {
    /// A single-axis step (6 slots).
    Axis,
    /// A two-axis diagonal step (12 slots).
    FaceDiagonal,
    /// A three-axis corner step (8 slots).
    Corner,
}

/// One of the 26 signed neighbor directions.
///
/// Variant names spell the signed axis steps: `XpYm` is `(+1, -1, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Slot {
    Xp = 0,
    Xm = 1,
    Yp = 2,
    Ym = 3,
    Zp = 4,
    Zm = 5,
    XpYp = 6,
    XmYm = 7,
    XpYm = 8,
    XmYp = 9,
    XpZp = 10,
    XmZm = 11,
    XpZm = 12,
    XmZp = 13,
    YpZp = 14,
    YmZm = 15,
    YpZm = 16,
    YmZp = 17,
    XpYpZp = 18,
    XmYmZm = 19,
    XpYpZm = 20,
    XmYmZp = 21,
    XpYmZp = 22,
    XmYpZm = 23,
    XpYmZm = 24,
    XmYpZp = 25,
}

/// Signed offsets indexed by slot discriminant.
const OFFSETS: [(i32, i32, i32); Slot::COUNT] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
    (1, 1, 0),
    (-1, -1, 0),
    (1, -1, 0),
    (-1, 1, 0),
    (1, 0, 1),
    (-1, 0, -1),
    (1, 0, -1),
    (-1, 0, 1),
    (0, 1, 1),
    (0, -1, -1),
    (0, 1, -1),
    (0, -1, 1),
    (1, 1, 1),
    (-1, -1, -1),
    (1, 1, -1),
    (-1, -1, 1),
    (1, -1, 1),
    (-1, 1, -1),
    (1, -1, -1),
    (-1, 1, 1),
];

impl Slot {
    /// Number of signed slots.
    pub const COUNT: usize = 26;

    /// All 26 slots in discriminant order.
    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::Xp,
        Slot::Xm,
        Slot::Yp,
        Slot::Ym,
        Slot::Zp,
        Slot::Zm,
        Slot::XpYp,
        Slot::XmYm,
        Slot::XpYm,
        Slot::XmYp,
        Slot::XpZp,
        Slot::XmZm,
        Slot::XpZm,
        Slot::XmZp,
        Slot::YpZp,
        Slot::YmZm,
        Slot::YpZm,
        Slot::YmZp,
        Slot::XpYpZp,
        Slot::XmYmZm,
        Slot::XpYpZm,
        Slot::XmYmZp,
        Slot::XpYmZp,
        Slot::XmYpZm,
        Slot::XpYmZm,
        Slot::XmYpZp,
    ];

    /// The 13 unique directions (positive representatives): 3 axis,
    /// 6 face-diagonal, 4 corner.
    pub const UNIQUE: [Slot; 13] = [
        Slot::Xp,
        Slot::Yp,
        Slot::Zp,
        Slot::XpYp,
        Slot::XpYm,
        Slot::XpZp,
        Slot::XpZm,
        Slot::YpZp,
        Slot::YpZm,
        Slot::XpYpZp,
        Slot::XpYpZm,
        Slot::XpYmZp,
        Slot::XpYmZm,
    ];

    /// The slot as a flat table index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The signed lattice step `(di, dj, dk)`.
    pub fn offset(self) -> (i32, i32, i32) {
        OFFSETS[self as usize]
    }

    /// The slot pointing the opposite way.
    pub fn opposite(self) -> Slot {
        Slot::ALL[self as usize ^ 1]
    }

    /// `true` for the positive representative of each unique direction.
    pub fn is_positive(self) -> bool {
        self as usize % 2 == 0
    }

    /// Index of this slot's unique direction in `0..13`.
    ///
    /// A slot and its opposite share the same unique index.
    pub fn unique_index(self) -> usize {
        self as usize / 2
    }

    /// Geometric class by the number of non-zero offset components.
    pub fn class(self) -> DirectionClass {
        let (di, dj, dk) = self.offset();
        match di.abs() + dj.abs() + dk.abs() {
            1 => DirectionClass::Axis,
            2 => DirectionClass::FaceDiagonal,
            _ => DirectionClass::Corner,
        }
    }

    /// Physical step length for per-axis spacings `(hx, hy, hz)`.
    ///
    /// Axis slots give the plain spacing, diagonals the Euclidean
    /// combination (`h√2` / `h√3` on a uniform grid).
    pub fn step_length(self, hx: f64, hy: f64, hz: f64) -> f64 {
        let (di, dj, dk) = self.offset();
        let x = f64::from(di) * hx;
        let y = f64::from(dj) * hy;
        let z = f64::from(dk) * hz;
        (x * x + y * y + z * z).sqrt()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (di, dj, dk) = self.offset();
        write!(f, "({di:+},{dj:+},{dk:+})")
    }
}
