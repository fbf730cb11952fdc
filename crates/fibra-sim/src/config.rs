//! Simulation configuration.

/// Which spatial-coupling strategy the integrator runs.
///
/// A closed enum, validated once at assembly; no string dispatch in
/// the loop or at the call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OperatorKind {
    /// Direct 19-point anisotropic FDM evaluation every step.
    #[default]
    DirectFdm,
    /// Precomputed upwinded Laplacian weight cache.
    CachedStencil,
    /// Discrete gap-junction network.
    Network,
}

/// Time-step and worker configuration.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Explicit Euler timestep. Must be finite, positive, and within
    /// the selected operator's stability bound.
    pub dt: f64,
    /// Worker count for the per-step cell loop. `None` = auto-detect
    /// from available parallelism.
    pub workers: Option<usize>,
}

impl SimConfig {
    /// A config with the given dt and auto-detected workers.
    pub fn new(dt: f64) -> Self {
        Self { dt, workers: None }
    }

    /// Override the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Resolve the actual worker count.
    ///
    /// Explicit values are clamped to `[1, 64]`; auto-detection takes
    /// half the available parallelism, clamped to `[1, 16]`.
    pub fn resolved_workers(&self) -> usize {
        match self.workers {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(1, 16)
            }
        }
    }
}
