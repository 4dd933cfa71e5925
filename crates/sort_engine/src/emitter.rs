//! Step emission: every observable action of a run leaves the engine as an
//! [`EngineEvent`] through a [`StepSink`].

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{Focus, RunId},
    protocol::{EngineEvent, StepEvent, StepKind},
};
use tokio::sync::broadcast;

pub trait StepSink: Send + Sync {
    fn publish(&self, event: EngineEvent);
}

impl StepSink for broadcast::Sender<EngineEvent> {
    fn publish(&self, event: EngineEvent) {
        // No subscribers is a valid headless setup.
        let _ = self.send(event);
    }
}

/// Per-run emitter: tags events with the run id and owns the run's operation
/// counter.
#[derive(Clone)]
pub struct StepEmitter {
    run_id: RunId,
    sink: Arc<dyn StepSink>,
    operations: Arc<AtomicU64>,
}

impl StepEmitter {
    pub fn new(run_id: RunId, sink: Arc<dyn StepSink>, operations: Arc<AtomicU64>) -> Self {
        Self {
            run_id,
            sink,
            operations,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::Acquire)
    }

    /// Reports a step. Counted steps bump the operation counter before the
    /// event leaves, so the event carries the post-step count.
    pub fn emit(
        &self,
        kind: StepKind,
        indices: Vec<usize>,
        values: Vec<u32>,
        focus: Focus,
        counted: bool,
    ) {
        let operations = if counted {
            self.operations.fetch_add(1, Ordering::AcqRel) + 1
        } else {
            self.operations()
        };
        self.sink.publish(EngineEvent::Step {
            run_id: self.run_id,
            operations,
            step: StepEvent {
                kind,
                indices,
                values,
                focus,
            },
        });
    }

    pub fn publish(&self, event: EngineEvent) {
        self.sink.publish(event);
    }
}
