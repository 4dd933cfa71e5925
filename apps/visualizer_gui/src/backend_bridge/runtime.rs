//! Backend worker: owns the tokio runtime and the run controller, applies UI
//! commands and forwards engine events to the UI queue.

use std::{thread, time::Duration};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::protocol::EngineEvent;
use sort_engine::{EngineSettings, RunController};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// How long a status or notice may wait for the UI to drain a full queue.
const NOTICE_SEND_TIMEOUT: Duration = Duration::from_millis(250);

pub fn launch(settings: EngineSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        deliver(&ui_tx, UiEvent::Info("Sorting engine starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                deliver(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut controller = RunController::new(settings);
            let event_task = tokio::spawn(forward_engine_events(
                controller.subscribe_events(),
                ui_tx.clone(),
            ));

            deliver(
                &ui_tx,
                UiEvent::Engine(EngineEvent::SequenceReset {
                    values: controller.snapshot(),
                }),
            );
            send_status(&controller, &ui_tx);
            deliver(&ui_tx, UiEvent::Info("Ready".to_string()));
            tracing::info!(
                array_size = controller.array_size(),
                speed = controller.speed().get(),
                "sorting engine ready"
            );

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&mut controller, cmd, &ui_tx);
            }

            tracing::info!("ui command queue closed; stopping sorting engine");
            drop(controller);
            event_task.abort();
        });
    });
}

pub(crate) fn handle_command(
    controller: &mut RunController,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    match cmd {
        BackendCommand::Start { algorithm } => {
            if controller.start(algorithm).is_none() {
                deliver(
                    ui_tx,
                    UiEvent::Info("A run is already active; reset it first".to_string()),
                );
            }
        }
        BackendCommand::TogglePause => {
            let state = controller.toggle_pause();
            tracing::debug!(?state, "pause toggled");
        }
        BackendCommand::Reset => {
            controller.reset();
            send_status(controller, ui_tx);
        }
        BackendCommand::SetSpeed(speed) => controller.set_speed(speed),
        BackendCommand::SetArraySize(size) => {
            if controller.set_array_size(size) {
                send_status(controller, ui_tx);
            } else {
                deliver(
                    ui_tx,
                    UiEvent::Info("Array size is locked while a run is active".to_string()),
                );
            }
        }
    }
}

fn send_status(controller: &RunController, ui_tx: &Sender<UiEvent>) {
    deliver(
        ui_tx,
        UiEvent::Status {
            state: controller.state(),
            array_size: controller.array_size(),
        },
    );
}

/// Queues a non-step event for the UI. Unlike step events these are not
/// superseded by a later resync, so a full queue gets a bounded wait.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Full(event)) => {
            tracing::debug!("ui queue full; waiting to deliver notice");
            event
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui queue closed; dropped notice");
            return;
        }
    };
    if let Err(err) = ui_tx.send_timeout(event, NOTICE_SEND_TIMEOUT) {
        tracing::warn!("dropped ui notice: {err}");
    }
}

async fn forward_engine_events(
    mut events: broadcast::Receiver<EngineEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => match ui_tx.try_send(UiEvent::Engine(event)) {
                Ok(()) => {}
                // The next terminal event carries the full sequence.
                Err(TrySendError::Full(_)) => tracing::debug!("ui queue full; dropped engine event"),
                Err(TrySendError::Disconnected(_)) => return,
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "engine event forwarder lagged");
            }
            Err(RecvError::Closed) => return,
        }
    }
}
