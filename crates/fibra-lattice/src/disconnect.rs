//! Region-disconnection pair sets.

use fibra_core::CellType;
use indexmap::IndexSet;

/// An unordered set of celltype pairs whose shared junctions are severed.
///
/// Pairs are normalized to `(min, max)` at insertion, so `(2, 5)` and
/// `(5, 2)` describe the same disconnection and [`matches`](Self::matches)
/// answers for either argument order. Iteration order is insertion
/// order, kept deterministic for reporting.
#[derive(Debug, Clone, Default)]
pub struct DisconnectSet {
    pairs: IndexSet<(u16, u16)>,
}

impl DisconnectSet {
    /// Build a set from (possibly reversed, possibly duplicated) pairs.
    pub fn new(pairs: impl IntoIterator<Item = (CellType, CellType)>) -> Self {
        let pairs = pairs
            .into_iter()
            .map(|(a, b)| (a.0.min(b.0), a.0.max(b.0)))
            .collect();
        Self { pairs }
    }

    /// An empty set: nothing is severed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of distinct unordered pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether the junction between celltypes `a` and `b` is severed,
    /// in either order.
    pub fn matches(&self, a: CellType, b: CellType) -> bool {
        self.pairs.contains(&(a.0.min(b.0), a.0.max(b.0)))
    }

    /// The largest celltype referenced by any pair.
    pub fn max_celltype(&self) -> Option<CellType> {
        self.pairs.iter().map(|&(_, b)| CellType(b)).max()
    }

    /// Iterate the normalized pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CellType, CellType)> + '_ {
        self.pairs.iter().map(|&(a, b)| (CellType(a), CellType(b)))
    }
}
