//! Backend-to-UI events and error modeling for the visualizer window.

use shared::{domain::RunState, protocol::EngineEvent};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    /// Controller state after a command that changes it without a run event
    /// (reset, array size change).
    Status {
        state: RunState,
        array_size: usize,
    },
    Engine(EngineEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Startup failures leave the window without an engine.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn banner_text(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Sorting engine failed to start: {}", self.message)
            }
            UiErrorContext::CommandQueue => format!("Command not delivered: {}", self.message),
        }
    }
}
