//! Run orchestration: one algorithm run at a time over the current sequence.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{clamp_array_size, AlgorithmId, RunId, RunState, Speed},
    protocol::EngineEvent,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::info;

use crate::{
    algorithms::{self, StepContext},
    config::EngineSettings,
    emitter::{StepEmitter, StepSink},
    pacing::{Pacer, RunControl},
    sequence::{SequenceHandle, SequenceStore},
};

struct ActiveRun {
    id: RunId,
    algorithm: AlgorithmId,
    control: Arc<RunControl>,
    operations: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

pub struct RunController {
    settings: EngineSettings,
    events: broadcast::Sender<EngineEvent>,
    speed: watch::Sender<Speed>,
    sequence: SequenceHandle,
    array_size: usize,
    rng: StdRng,
    next_run_id: u64,
    /// State reported while no run is attached to the current sequence.
    detached_state: RunState,
    active: Option<ActiveRun>,
}

impl RunController {
    pub fn new(settings: EngineSettings) -> Self {
        let settings = settings.normalized();
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sequence =
            SequenceHandle::new(SequenceStore::generate(settings.array_size, &mut rng));
        let (events, _) = broadcast::channel(settings.event_buffer);
        let (speed, _) = watch::channel(settings.speed);

        Self {
            array_size: settings.array_size,
            settings,
            events,
            speed,
            sequence,
            rng,
            next_run_id: 1,
            detached_state: RunState::Idle,
            active: None,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> RunState {
        self.active
            .as_ref()
            .map(|run| run.control.state())
            .unwrap_or(self.detached_state)
    }

    pub fn operations(&self) -> u64 {
        self.active
            .as_ref()
            .map(|run| run.operations.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    pub fn current_run(&self) -> Option<(RunId, AlgorithmId)> {
        self.active.as_ref().map(|run| (run.id, run.algorithm))
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.sequence.snapshot()
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }

    pub fn speed(&self) -> Speed {
        *self.speed.borrow()
    }

    /// Applies from the next suspension of the active run on.
    pub fn set_speed(&self, speed: Speed) {
        self.speed.send_replace(speed);
    }

    /// Starts `algorithm` over the current sequence. A no-op returning `None`
    /// while another run is active. Must be called inside a Tokio runtime.
    pub fn start(&mut self, algorithm: AlgorithmId) -> Option<RunId> {
        let state = self.state();
        if !state.can_start() {
            tracing::debug!(?state, %algorithm, "start ignored: a run is already active");
            return None;
        }

        let id = RunId(self.next_run_id);
        self.next_run_id += 1;
        let control = Arc::new(RunControl::new());
        let operations = Arc::new(AtomicU64::new(0));
        let sink: Arc<dyn StepSink> = Arc::new(self.events.clone());

        let values = self.sequence.snapshot();
        info!(run_id = id.0, %algorithm, len = values.len(), "run started");
        sink.publish(EngineEvent::RunStarted {
            run_id: id,
            algorithm,
            values,
        });

        let ctx = StepContext::new(
            self.sequence.clone(),
            StepEmitter::new(id, sink, operations.clone()),
            Pacer::new(
                control.clone(),
                self.speed.subscribe(),
                self.settings.pause_poll_interval(),
            ),
        );
        let task = tokio::spawn(execute_run(algorithm, ctx, control.clone()));

        self.active = Some(ActiveRun {
            id,
            algorithm,
            control,
            operations,
            task: Some(task),
        });
        Some(id)
    }

    pub fn pause(&self) -> bool {
        let Some(run) = &self.active else {
            return false;
        };
        let changed = run.control.pause();
        if changed {
            info!(run_id = run.id.0, "run paused");
            self.publish_state(run);
        }
        changed
    }

    pub fn resume(&self) -> bool {
        let Some(run) = &self.active else {
            return false;
        };
        let changed = run.control.resume();
        if changed {
            info!(run_id = run.id.0, "run resumed");
            self.publish_state(run);
        }
        changed
    }

    /// Pause/resume toggle; returns the resulting state.
    pub fn toggle_pause(&self) -> RunState {
        match self.state() {
            RunState::Running => {
                self.pause();
            }
            RunState::Paused => {
                self.resume();
            }
            _ => {}
        }
        self.state()
    }

    /// Cancels any run, draws a fresh sequence of the configured size and
    /// zeroes the counter. The cancelled run keeps its own (now detached)
    /// sequence and exits at its next checkpoint.
    pub fn reset(&mut self) {
        self.cancel_active();
        self.regenerate();
        self.detached_state = RunState::Cancelled;
    }

    /// Changes the array size and regenerates the sequence. Refused while a
    /// run is active.
    pub fn set_array_size(&mut self, size: usize) -> bool {
        if self.state().is_active() {
            return false;
        }
        self.array_size = clamp_array_size(size);
        self.active = None;
        self.regenerate();
        self.detached_state = RunState::Idle;
        true
    }

    /// Replaces the sequence with the given values. Refused while a run is
    /// active.
    pub fn load_values(&mut self, values: Vec<u32>) -> bool {
        if self.state().is_active() {
            return false;
        }
        self.active = None;
        self.sequence = SequenceHandle::new(SequenceStore::from_values(values));
        self.detached_state = RunState::Idle;
        self.events.publish(EngineEvent::SequenceReset {
            values: self.sequence.snapshot(),
        });
        true
    }

    /// Waits for the current run's task to finish and returns its final state.
    pub async fn wait_for_run(&mut self) -> RunState {
        let task = self.active.as_mut().and_then(|run| run.task.take());
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::error!("run task failed: {err}");
            }
        }
        self.state()
    }

    fn cancel_active(&mut self) {
        if let Some(run) = self.active.take() {
            if run.control.cancel() {
                info!(run_id = run.id.0, "run cancelled");
                self.publish_state(&run);
            }
        }
    }

    fn regenerate(&mut self) {
        let store = SequenceStore::generate(self.array_size, &mut self.rng);
        self.sequence = SequenceHandle::new(store);
        info!(len = self.array_size, "sequence regenerated");
        self.events.publish(EngineEvent::SequenceReset {
            values: self.sequence.snapshot(),
        });
    }

    fn publish_state(&self, run: &ActiveRun) {
        self.events.publish(EngineEvent::RunStateChanged {
            run_id: run.id,
            state: run.control.state(),
        });
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

async fn execute_run(algorithm: AlgorithmId, ctx: StepContext, control: Arc<RunControl>) {
    let started = Instant::now();
    if algorithms::run(algorithm, &ctx).await.is_ok() {
        debug_assert!(
            ctx.sequence().lock().is_sorted(),
            "{algorithm} completed on an unsorted sequence"
        );
        control.complete();
    }

    let emitter = ctx.emitter();
    let state = control.state();
    let operations = emitter.operations();
    info!(
        run_id = emitter.run_id().0,
        %algorithm,
        ?state,
        operations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run finished"
    );
    emitter.publish(EngineEvent::RunFinished {
        run_id: emitter.run_id(),
        state,
        operations,
        values: ctx.sequence().snapshot(),
    });
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
