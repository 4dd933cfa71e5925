use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{AlgorithmId, Focus, RunState, Speed, ARRAY_SIZE_MAX, ARRAY_SIZE_MIN};
use sort_engine::EngineSettings;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::{
    bars::{self, BarModel},
    theme,
};

const LEGEND: [(Focus, &str); 5] = [
    (Focus::None, "Idle"),
    (Focus::Compared, "Compared"),
    (Focus::Scanning, "Scanning"),
    (Focus::Pivot, "Key / pivot"),
    (Focus::Swapped, "Moved"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupConfig {
    pub algorithm: AlgorithmId,
    pub speed: Speed,
    pub array_size: usize,
}

impl From<&EngineSettings> for StartupConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            algorithm: settings.algorithm,
            speed: settings.speed,
            array_size: settings.array_size,
        }
    }
}

pub struct VisualizerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    bars: BarModel,
    algorithm: AlgorithmId,
    speed: u8,
    array_size: usize,
    status: String,
    status_banner: Option<UiError>,
    theme_applied: bool,
}

impl VisualizerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            bars: BarModel::default(),
            algorithm: startup.algorithm,
            speed: startup.speed.get(),
            array_size: startup.array_size,
            status: "Starting".to_string(),
            status_banner: None,
            theme_applied: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => self.report_error(err),
                UiEvent::Status { state, array_size } => {
                    self.bars.set_state(state);
                    self.array_size = array_size;
                }
                UiEvent::Engine(event) => {
                    self.bars.apply(event);
                }
            }
        }
    }

    fn engine_available(&self) -> bool {
        !self
            .status_banner
            .as_ref()
            .is_some_and(|banner| banner.is_fatal())
    }

    fn report_error(&mut self, err: UiError) {
        tracing::error!(context = ?err.context(), "{}", err.message());
        self.status = err.banner_text();
        self.status_banner = Some(err);
    }

    fn send(&mut self, cmd: BackendCommand) {
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => {
                // A delivered command supersedes an earlier delivery failure.
                if self.engine_available() {
                    self.status_banner = None;
                }
            }
            Err(err) => self.report_error(err),
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.theme_applied {
            return;
        }
        let mut style = (*ctx.style()).clone();
        style.visuals = theme::visuals();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        ctx.set_style(style);
        self.theme_applied = true;
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let state = self.bars.state();
        let active = state.is_active();
        let available = self.engine_available();

        ui.horizontal_wrapped(|ui| {
            ui.add_enabled_ui(!active && available, |ui| {
                egui::ComboBox::from_id_salt("algorithm_select")
                    .selected_text(self.algorithm.label())
                    .show_ui(ui, |ui| {
                        for algorithm in AlgorithmId::ALL {
                            ui.selectable_value(&mut self.algorithm, algorithm, algorithm.label());
                        }
                    });
            });

            let size = ui.add_enabled(
                !active && available,
                egui::Slider::new(&mut self.array_size, ARRAY_SIZE_MIN..=ARRAY_SIZE_MAX)
                    .text("Array size"),
            );
            if size.drag_stopped() || (size.changed() && !size.dragged()) {
                self.send(BackendCommand::SetArraySize(self.array_size));
            }

            let speed = ui.add_enabled(
                available,
                egui::Slider::new(&mut self.speed, Speed::MIN.get()..=Speed::MAX.get())
                    .text("Speed"),
            );
            if speed.changed() {
                if let Ok(speed) = Speed::new(self.speed) {
                    self.send(BackendCommand::SetSpeed(speed));
                }
            }

            ui.separator();
            if active {
                let label = if state == RunState::Paused {
                    "Resume"
                } else {
                    "Pause"
                };
                if ui.button(label).clicked() {
                    self.send(BackendCommand::TogglePause);
                }
            } else if ui
                .add_enabled(available, egui::Button::new("Start"))
                .clicked()
            {
                self.send(BackendCommand::Start {
                    algorithm: self.algorithm,
                });
            }
            if ui
                .add_enabled(available, egui::Button::new("Reset"))
                .clicked()
            {
                self.send(BackendCommand::Reset);
            }
        });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        if let Some(banner) = &self.status_banner {
            ui.colored_label(egui::Color32::from_rgb(220, 53, 69), banner.banner_text());
        }
        ui.horizontal(|ui| {
            ui.strong(self.bars.state().label());
            ui.separator();
            ui.label(format!("Operations: {}", self.bars.operations()));
            if let Some((run_id, algorithm)) = self.bars.current_run() {
                ui.separator();
                ui.label(format!("{} (run {})", algorithm.label(), run_id.0));
            }
            ui.separator();
            ui.small(&self.status);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for (focus, label) in LEGEND.iter().rev() {
                    ui.small(*label);
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(
                        swatch,
                        egui::CornerRadius::same(2),
                        theme::bar_color(*focus),
                    );
                }
            });
        });
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        egui::TopBottomPanel::top("run_controls").show(ctx, |ui| self.show_controls(ui));
        egui::TopBottomPanel::bottom("run_status").show(ctx, |ui| self.show_status(ui));
        egui::CentralPanel::default().show(ctx, |ui| bars::show_bars(ui, &self.bars));

        if self.bars.state().is_active() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::{domain::RunId, protocol::EngineEvent};

    use super::*;
    use crate::controller::events::UiErrorContext;

    fn app() -> (VisualizerApp, Sender<UiEvent>, Receiver<BackendCommand>) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let startup = StartupConfig::from(&EngineSettings::default());
        (VisualizerApp::new(cmd_tx, ui_rx, startup), ui_tx, cmd_rx)
    }

    #[test]
    fn startup_config_mirrors_engine_settings() {
        let (app, _, _) = app();
        assert_eq!(app.algorithm, AlgorithmId::BubbleSort);
        assert_eq!(app.speed, 50);
        assert_eq!(app.array_size, 50);
    }

    #[test]
    fn backend_events_drive_bars_and_status() {
        let (mut app, ui_tx, _) = app();
        ui_tx
            .try_send(UiEvent::Engine(EngineEvent::RunStarted {
                run_id: RunId(1),
                algorithm: AlgorithmId::QuickSort,
                values: vec![2, 1],
            }))
            .expect("queue");
        ui_tx.try_send(UiEvent::Info("Ready".to_string())).expect("queue");
        app.process_ui_events();
        assert_eq!(app.bars.state(), RunState::Running);
        assert_eq!(app.bars.values(), &[2, 1]);
        assert_eq!(app.status, "Ready");

        ui_tx
            .try_send(UiEvent::Status {
                state: RunState::Cancelled,
                array_size: 80,
            })
            .expect("queue");
        app.process_ui_events();
        assert_eq!(app.bars.state(), RunState::Cancelled);
        assert_eq!(app.array_size, 80);
    }

    #[test]
    fn startup_failure_disables_the_engine_controls() {
        let (mut app, ui_tx, _) = app();
        assert!(app.engine_available());
        ui_tx
            .try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "no runtime",
            )))
            .expect("queue");
        app.process_ui_events();
        assert!(!app.engine_available());
        assert!(app.status.contains("no runtime"));
    }

    #[test]
    fn send_queues_commands_for_the_backend() {
        let (mut app, _, cmd_rx) = app();
        app.algorithm = AlgorithmId::MergeSort;
        app.send(BackendCommand::Start {
            algorithm: app.algorithm,
        });
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::Start {
                algorithm: AlgorithmId::MergeSort
            })
        ));
    }

    #[test]
    fn undelivered_commands_raise_a_banner_until_the_next_delivery() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded(1);
        let startup = StartupConfig::from(&EngineSettings::default());
        let mut app = VisualizerApp::new(cmd_tx, ui_rx, startup);

        app.send(BackendCommand::Reset);
        app.send(BackendCommand::TogglePause);
        let banner = app.status_banner.clone().expect("queue full banner");
        assert_eq!(banner.context(), UiErrorContext::CommandQueue);
        assert!(app.status.starts_with("Command not delivered"));
        assert!(app.engine_available());

        assert!(cmd_rx.try_recv().is_ok());
        app.send(BackendCommand::TogglePause);
        assert!(app.status_banner.is_none());
    }
}
