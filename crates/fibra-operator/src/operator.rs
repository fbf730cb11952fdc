//! The [`CouplingOperator`] trait.

/// A spatial coupling strategy evaluated once per cell per step.
///
/// # Contract
///
/// - `coupling()` MUST be a pure function of the supplied voltage
///   slice: it reads neighbors' *previous* voltages only and never
///   mutates shared state, so the integrator can fan cells out across
///   worker threads with no per-cell locking.
/// - `voltages` is the full cell-indexed field of length `N`; neighbor
///   lookups go through the topology captured at construction.
/// - Operators are immutable after construction. A changed diffusion
///   tensor means constructing (or explicitly rebuilding) the operator;
///   evaluating against a stale cache is a correctness bug.
///
/// # Object safety
///
/// The trait is object-safe; the integrator stores the selected
/// strategy as `Arc<dyn CouplingOperator>`.
///
/// # Examples
///
/// A toy operator coupling every cell to a fixed sink:
///
/// ```
/// use fibra_operator::CouplingOperator;
///
/// struct SinkCoupling {
///     rate: f64,
/// }
///
/// impl CouplingOperator for SinkCoupling {
///     fn name(&self) -> &str { "sink" }
///
///     fn coupling(&self, cell: usize, voltages: &[f64]) -> f64 {
///         -self.rate * voltages[cell]
///     }
/// }
///
/// let op = SinkCoupling { rate: 0.5 };
/// assert_eq!(op.coupling(0, &[2.0]), -1.0);
/// ```
pub trait CouplingOperator: Send + Sync {
    /// Human-readable strategy name for error reporting.
    fn name(&self) -> &str;

    /// The spatial coupling contribution for `cell`, given the full
    /// previous-step voltage field.
    fn coupling(&self, cell: usize, voltages: &[f64]) -> f64;

    /// Conservative largest stable explicit timestep, or `None` when
    /// the operator imposes no constraint (e.g. zero diffusivity).
    fn max_stable_dt(&self) -> Option<f64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zero;

    impl CouplingOperator for Zero {
        fn name(&self) -> &str {
            "zero"
        }
        fn coupling(&self, _cell: usize, _voltages: &[f64]) -> f64 {
            0.0
        }
    }

    #[test]
    fn default_max_dt_is_unconstrained() {
        let op: std::sync::Arc<dyn CouplingOperator> = std::sync::Arc::new(Zero);
        assert_eq!(op.max_stable_dt(), None);
        assert_eq!(op.name(), "zero");
    }
}
