//! Animated sorting engine: runs one sorting algorithm at a time, step by
//! step, paced by a user-selected speed and pausable/cancellable between
//! steps. Every step is reported as a [`shared::protocol::EngineEvent`].

pub mod algorithms;
pub mod config;
pub mod controller;
pub mod emitter;
pub mod pacing;
pub mod sequence;

pub use config::{load_settings, EngineSettings, SettingsError};
pub use controller::RunController;
pub use emitter::{StepEmitter, StepSink};
pub use pacing::{delay_for, Cancelled, Pacer, RunControl, PAUSE_POLL_INTERVAL};
pub use sequence::{SequenceHandle, SequenceStore};
