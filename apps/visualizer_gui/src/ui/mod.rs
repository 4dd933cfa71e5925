//! UI layer: app shell, bar renderer, and theme.

pub mod app;
pub mod bars;
pub mod theme;

pub use app::{StartupConfig, VisualizerApp};
