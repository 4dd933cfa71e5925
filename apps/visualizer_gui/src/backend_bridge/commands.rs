//! Backend commands queued from UI to backend worker.

use shared::domain::{AlgorithmId, Speed};

#[derive(Debug)]
pub enum BackendCommand {
    Start { algorithm: AlgorithmId },
    TogglePause,
    Reset,
    SetSpeed(Speed),
    SetArraySize(usize),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Start { .. } => "start",
            BackendCommand::TogglePause => "toggle_pause",
            BackendCommand::Reset => "reset",
            BackendCommand::SetSpeed(_) => "set_speed",
            BackendCommand::SetArraySize(_) => "set_array_size",
        }
    }
}
