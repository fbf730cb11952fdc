//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one real tissue cell within a simulation.
///
/// Cell ids are compact: they run `0..N` where `N` is the number of
/// lattice points with a positive geometry-mask value, assigned in
/// z-outer / y / x-inner scan order when the topology is built. Every
/// cell-indexed array in the workspace has length exactly `N` and is
/// indexed via [`CellId::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// The id as a `usize` array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A tissue region / celltype id from the geometry mask.
///
/// Mask values `1..=K` map to `CellType(1)..=CellType(K)`; mask values
/// `<= 0` denote non-tissue space and never become a `CellType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellType(pub u16);

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for CellType {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Monotonically increasing time-step counter.
///
/// Incremented each time the integrator advances one explicit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
