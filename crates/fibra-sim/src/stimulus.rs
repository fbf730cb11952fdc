//! Stimulus protocols: pure functions of elapsed time.

/// One stimulus pulse (or pacing train) over a cell region.
#[derive(Debug, Clone)]
pub struct StimPulse {
    /// Time the first pulse switches on.
    pub start: f64,
    /// How long each pulse stays on.
    pub duration: f64,
    /// Current injected while on. The integrator applies `-amplitude`
    /// in the voltage update, so a depolarizing stimulus is negative.
    pub amplitude: f64,
    /// Pacing period for a repeating train (S1). `None` = fire once.
    pub period: Option<f64>,
    /// Per-cell region mask, length `N`.
    pub region: Vec<bool>,
}

impl StimPulse {
    /// Whether the pulse is on at time `t`.
    pub fn active(&self, t: f64) -> bool {
        if t < self.start {
            return false;
        }
        let elapsed = t - self.start;
        match self.period {
            Some(p) => elapsed % p < self.duration,
            None => elapsed < self.duration,
        }
    }
}

/// An ordered collection of stimulus pulses.
///
/// Multi-site and timed protocols (S1–S2 cross-field) are just several
/// pulses with their own regions and start times. The protocol is a
/// pure function of elapsed time: no state advances between steps.
#[derive(Debug, Clone, Default)]
pub struct StimulusProtocol {
    pulses: Vec<StimPulse>,
}

impl StimulusProtocol {
    /// No stimulus anywhere, ever.
    pub fn none() -> Self {
        Self::default()
    }

    /// A protocol from explicit pulses. Shape validation (region
    /// lengths, timing sanity) happens at simulation assembly, where
    /// the cell count is known.
    pub fn new(pulses: Vec<StimPulse>) -> Self {
        Self { pulses }
    }

    /// The configured pulses.
    pub fn pulses(&self) -> &[StimPulse] {
        &self.pulses
    }

    /// Whether the protocol holds no pulses.
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Total stimulus current for `cell` at time `t`; zero outside
    /// every pulse window and outside every region.
    pub fn current(&self, cell: usize, t: f64) -> f64 {
        let mut sum = 0.0;
        for pulse in &self.pulses {
            if pulse.region[cell] && pulse.active(t) {
                sum += pulse.amplitude;
            }
        }
        sum
    }
}
