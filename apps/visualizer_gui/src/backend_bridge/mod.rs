//! Bridge between the UI thread and the worker thread that owns the engine.

pub mod commands;
pub mod runtime;
