use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::{AlgorithmId, Speed};
use sort_engine::{
    config::{apply_env_overrides, load_settings_from},
    load_settings, EngineSettings,
};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, VisualizerApp};

#[derive(Parser, Debug)]
#[command(about = "Animated sorting algorithm visualizer")]
struct Args {
    /// Number of bars (10..=200).
    #[arg(long)]
    size: Option<usize>,
    /// Animation speed, 1 (slowest) to 100 (fastest).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    speed: Option<u8>,
    /// Preselected algorithm, e.g. `quick_sort` or `heap`.
    #[arg(long)]
    algorithm: Option<AlgorithmId>,
    /// Seed for reproducible sequences.
    #[arg(long)]
    seed: Option<u64>,
    /// Settings file to use instead of `visualizer.toml`.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve_settings(&self) -> anyhow::Result<EngineSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let mut settings = load_settings_from(path)
                    .with_context(|| format!("loading settings from '{}'", path.display()))?;
                apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
                settings
            }
            None => load_settings(),
        };

        if let Some(size) = self.size {
            settings.array_size = size;
        }
        if let Some(speed) = self.speed {
            settings.speed = Speed::saturating(i64::from(speed));
        }
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        Ok(settings.normalized())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = args.resolve_settings()?;
    let startup = StartupConfig::from(&settings);
    tracing::info!(?settings, "starting sorting visualizer");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(8192);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sorting Visualizer")
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Sorting Visualizer",
        options,
        Box::new(move |_cc| Ok(Box::new(VisualizerApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("visualizer window failed: {err}"))
}
