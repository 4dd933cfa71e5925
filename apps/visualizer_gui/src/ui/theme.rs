use eframe::egui::{self, Color32};
use shared::domain::Focus;

pub const CANVAS: Color32 = Color32::from_rgb(24, 26, 31);
pub const ACCENT: Color32 = Color32::from_rgb(52, 152, 219);

const BAR_IDLE: Color32 = Color32::from_rgb(0, 128, 128);
const BAR_COMPARED: Color32 = Color32::from_rgb(220, 53, 69);
const BAR_SCANNING: Color32 = Color32::from_rgb(241, 196, 15);
const BAR_PIVOT: Color32 = Color32::from_rgb(155, 89, 182);
const BAR_SWAPPED: Color32 = Color32::from_rgb(46, 204, 113);

pub fn bar_color(focus: Focus) -> Color32 {
    match focus {
        Focus::None => BAR_IDLE,
        Focus::Compared => BAR_COMPARED,
        Focus::Scanning => BAR_SCANNING,
        Focus::Pivot => BAR_PIVOT,
        Focus::Swapped => BAR_SWAPPED,
    }
}

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = Color32::from_rgb(40, 44, 52);
    visuals.panel_fill = Color32::from_rgb(33, 37, 43);
    visuals.extreme_bg_color = CANVAS;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.hovered.bg_fill = ACCENT.gamma_multiply(0.85);
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_focus_has_a_distinct_color() {
        let all = [
            Focus::None,
            Focus::Compared,
            Focus::Scanning,
            Focus::Pivot,
            Focus::Swapped,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(bar_color(*a), bar_color(*b), "{a:?} vs {b:?}");
            }
        }
    }
}
