//! The explicit time-stepping loop.

use crate::stimulus::StimulusProtocol;
use crossbeam_channel::Sender;
use fibra_core::{CellId, ReactionModel, StepId};
use fibra_lattice::Topology;
use fibra_operator::{CouplingOperator, NetworkModel};
use std::sync::Arc;

/// Progress notification emitted by
/// [`run_with_events`](TissueIntegrator::run_with_events).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Step counter after the published step.
    pub step: StepId,
    /// Simulation time after the published step.
    pub time: f64,
}

/// The STEADY-LOOP state machine.
///
/// Owns the only mutable per-step state: the voltage field and its
/// staging twin. Topology, tensor-derived operator, stimulus, and
/// reaction are read-only from here on; there is no way back to setup.
///
/// # Step anatomy
///
/// Phase A computes, for every cell, the new voltage
/// `V + dt * (-I_ion - I_stim + coupling)` into the staging buffer.
/// Cells are partitioned into disjoint contiguous chunks, one scoped
/// worker thread per chunk; each worker reads any cell's *previous*
/// voltage but writes only its own chunk, so the phase needs no
/// locking. Phase B runs strictly after every worker has joined: the
/// staged buffer is swapped in as the field the next step reads.
/// Interleaving the publish with Phase A would let a cell's coupling
/// read a mix of old and new neighbor voltages nondeterministically,
/// which is why the barrier is structural (the scope join), not
/// advisory.
pub struct TissueIntegrator<R: ReactionModel> {
    topology: Arc<Topology>,
    operator: Arc<dyn CouplingOperator>,
    network: Option<Arc<NetworkModel>>,
    reaction: R,
    stimulus: StimulusProtocol,
    voltages: Vec<f64>,
    staging: Vec<f64>,
    dt: f64,
    time: f64,
    step: StepId,
    workers: usize,
}

impl<R: ReactionModel> std::fmt::Debug for TissueIntegrator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TissueIntegrator")
            .field("dt", &self.dt)
            .field("time", &self.time)
            .field("step", &self.step)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

/// Phase A kernel over one contiguous chunk of cells.
fn advance_chunk<R: ReactionModel>(
    voltages: &[f64],
    out: &mut [f64],
    start: usize,
    operator: &dyn CouplingOperator,
    reaction: &R,
    stimulus: &StimulusProtocol,
    time: f64,
    dt: f64,
) {
    for (offset, staged) in out.iter_mut().enumerate() {
        let cell = start + offset;
        let v = voltages[cell];
        let coupling = operator.coupling(cell, voltages);
        let i_ion = reaction.membrane_current(CellId(cell as u32), v, time, dt);
        let i_stim = stimulus.current(cell, time);
        *staged = v + dt * (-i_ion - i_stim + coupling);
    }
}

impl<R: ReactionModel> TissueIntegrator<R> {
    /// Wire up a validated setup. Called by
    /// [`TissueBuilder::build`](crate::TissueBuilder::build).
    pub(crate) fn new(
        topology: Arc<Topology>,
        operator: Arc<dyn CouplingOperator>,
        network: Option<Arc<NetworkModel>>,
        reaction: R,
        stimulus: StimulusProtocol,
        voltages: Vec<f64>,
        dt: f64,
        workers: usize,
    ) -> Self {
        let staging = vec![0.0; voltages.len()];
        Self {
            topology,
            operator,
            network,
            reaction,
            stimulus,
            voltages,
            staging,
            dt,
            time: 0.0,
            step: StepId(0),
            workers,
        }
    }

    /// Advance one explicit step.
    pub fn step(&mut self) {
        let n = self.voltages.len();
        let time = self.time;
        let dt = self.dt;
        let voltages = &self.voltages;
        let operator = &*self.operator;
        let reaction = &self.reaction;
        let stimulus = &self.stimulus;

        if self.workers <= 1 || n < self.workers {
            advance_chunk(voltages, &mut self.staging, 0, operator, reaction, stimulus, time, dt);
        } else {
            let chunk = n.div_ceil(self.workers);
            std::thread::scope(|scope| {
                for (w, out) in self.staging.chunks_mut(chunk).enumerate() {
                    let start = w * chunk;
                    scope.spawn(move || {
                        advance_chunk(voltages, out, start, operator, reaction, stimulus, time, dt);
                    });
                }
            });
        }

        // Phase B: all workers have joined; publish the staged field.
        std::mem::swap(&mut self.voltages, &mut self.staging);
        self.time += dt;
        self.step = StepId(self.step.0 + 1);
    }

    /// Run until simulation time reaches `t_end`; returns the number
    /// of steps executed. Steps whose midpoint lies past `t_end` are
    /// not taken, keeping the count robust to accumulated rounding.
    pub fn run_until(&mut self, t_end: f64) -> u64 {
        let mut executed = 0;
        while self.time + 0.5 * self.dt < t_end {
            self.step();
            executed += 1;
        }
        executed
    }

    /// Run a fixed number of steps.
    pub fn run_steps(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Like [`run_until`](Self::run_until), reporting a [`StepEvent`]
    /// every `every` steps over the channel. Snapshot readers sit on
    /// the receiving end between steps; a dropped receiver stops the
    /// reporting but not the run.
    pub fn run_with_events(&mut self, t_end: f64, every: u64, events: &Sender<StepEvent>) -> u64 {
        let every = every.max(1);
        let mut executed = 0;
        let mut reporting = true;
        while self.time + 0.5 * self.dt < t_end {
            self.step();
            executed += 1;
            if reporting && executed % every == 0 {
                let event = StepEvent {
                    step: self.step,
                    time: self.time,
                };
                reporting = events.send(event).is_ok();
            }
        }
        executed
    }

    /// Read-only snapshot of the voltage field at the step boundary.
    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    /// Voltage of one cell.
    pub fn voltage(&self, cell: CellId) -> f64 {
        self.voltages[cell.index()]
    }

    /// Simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Completed step count.
    pub fn step_id(&self) -> StepId {
        self.step
    }

    /// Configured timestep.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of real cells.
    pub fn cell_count(&self) -> usize {
        self.voltages.len()
    }

    /// The severed/folded topology the operator runs over.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The selected coupling strategy's name.
    pub fn operator_name(&self) -> &str {
        self.operator.name()
    }

    /// The gap-junction model, when the network strategy is selected.
    ///
    /// Gives the visualization layer the per-junction conductance and
    /// connection-type arrays of the exact model the loop is running.
    pub fn network(&self) -> Option<&NetworkModel> {
        self.network.as_deref()
    }
}
