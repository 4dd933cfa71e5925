use serde::{Deserialize, Serialize};

use crate::domain::{AlgorithmId, Focus, RunId, RunState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Compare,
    Swap,
    Overwrite,
    Highlight,
}

/// One observable action of a running algorithm.
///
/// `values[k]` is the value held at `indices[k]` after the step was applied,
/// so a renderer can apply the event without reading the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub kind: StepKind,
    pub indices: Vec<usize>,
    pub values: Vec<u32>,
    pub focus: Focus,
}

impl StepEvent {
    pub fn is_mutation(&self) -> bool {
        matches!(self.kind, StepKind::Swap | StepKind::Overwrite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A fresh sequence replaced the previous one; any run is gone.
    SequenceReset { values: Vec<u32> },
    RunStarted {
        run_id: RunId,
        algorithm: AlgorithmId,
        values: Vec<u32>,
    },
    Step {
        run_id: RunId,
        operations: u64,
        step: StepEvent,
    },
    RunStateChanged { run_id: RunId, state: RunState },
    /// Terminal event of a run, carrying the full sequence it left behind.
    RunFinished {
        run_id: RunId,
        state: RunState,
        operations: u64,
        values: Vec<u32>,
    },
}

impl EngineEvent {
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            EngineEvent::SequenceReset { .. } => None,
            EngineEvent::RunStarted { run_id, .. }
            | EngineEvent::Step { run_id, .. }
            | EngineEvent::RunStateChanged { run_id, .. }
            | EngineEvent::RunFinished { run_id, .. } => Some(*run_id),
        }
    }
}
