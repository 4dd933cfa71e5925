//! Bar model mirrored from engine events, plus the painter that draws it.

use eframe::egui;
use shared::{
    domain::{AlgorithmId, Focus, RunId, RunState, VALUE_MAX},
    protocol::EngineEvent,
};

use crate::ui::theme;

#[derive(Debug, Default)]
pub struct BarModel {
    values: Vec<u32>,
    focus: Vec<Focus>,
    run: Option<(RunId, AlgorithmId)>,
    state: RunState,
    operations: u64,
}

impl BarModel {
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn focus(&self) -> &[Focus] {
        &self.focus
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    pub fn current_run(&self) -> Option<(RunId, AlgorithmId)> {
        self.run
    }

    /// Controller state reported outside of a run event.
    pub fn set_state(&mut self, state: RunState) {
        self.state = state;
    }

    /// Applies one engine event. Events of runs other than the one currently
    /// shown are dropped; returns whether the event was applied.
    pub fn apply(&mut self, event: EngineEvent) -> bool {
        let starts_run = matches!(event, EngineEvent::RunStarted { .. });
        if let Some(run_id) = event.run_id() {
            if !starts_run && !self.is_current(run_id) {
                return false;
            }
        }

        match event {
            EngineEvent::SequenceReset { values } => {
                self.replace_values(values);
                self.run = None;
                self.operations = 0;
                true
            }
            EngineEvent::RunStarted {
                run_id,
                algorithm,
                values,
            } => {
                self.replace_values(values);
                self.run = Some((run_id, algorithm));
                self.state = RunState::Running;
                self.operations = 0;
                true
            }
            EngineEvent::Step {
                operations, step, ..
            } => {
                let mutates = step.is_mutation();
                for (slot, &index) in step.indices.iter().enumerate() {
                    if let Some(focus) = self.focus.get_mut(index) {
                        *focus = step.focus;
                    }
                    if mutates {
                        if let (Some(value), Some(&new_value)) =
                            (self.values.get_mut(index), step.values.get(slot))
                        {
                            *value = new_value;
                        }
                    }
                }
                self.operations = operations;
                true
            }
            EngineEvent::RunStateChanged { state, .. } => {
                self.state = state;
                true
            }
            EngineEvent::RunFinished {
                state,
                operations,
                values,
                ..
            } => {
                self.replace_values(values);
                self.state = state;
                self.operations = operations;
                true
            }
        }
    }

    fn is_current(&self, run_id: RunId) -> bool {
        matches!(self.run, Some((current, _)) if current == run_id)
    }

    fn replace_values(&mut self, values: Vec<u32>) {
        self.focus = vec![Focus::None; values.len()];
        self.values = values;
    }
}

/// Paints one bar per value, heights scaled to the largest possible value.
pub fn show_bars(ui: &mut egui::Ui, model: &BarModel) {
    let size = ui.available_size();
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::CornerRadius::same(6), theme::CANVAS);

    let count = model.values().len();
    if count == 0 {
        return;
    }

    let slot = rect.width() / count as f32;
    let gap = if slot > 4.0 { 1.0 } else { 0.0 };
    for (index, (&value, &focus)) in model.values().iter().zip(model.focus()).enumerate() {
        let height = rect.height() * value as f32 / VALUE_MAX as f32;
        let left = rect.left() + slot * index as f32;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left + gap, rect.bottom() - height),
            egui::pos2(left + slot - gap, rect.bottom()),
        );
        painter.rect_filled(bar, egui::CornerRadius::ZERO, theme::bar_color(focus));
    }
}
