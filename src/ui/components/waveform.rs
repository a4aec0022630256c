//! Waveform visualization
//!
//! Decorative animated bars shown while a session is active; a fixed-height
//! spacer otherwise so the layout does not jump.

use crate::ui::theme::Theme;
use egui::{self, Pos2, Stroke, Vec2};

const BAR_COUNT: usize = 12;
const HEIGHT: f32 = 56.0;

pub struct Waveform<'a> {
    active: bool,
    theme: &'a Theme,
}

impl<'a> Waveform<'a> {
    pub fn new(active: bool, theme: &'a Theme) -> Self {
        Self { active, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let desired_size = Vec2::new(ui.available_width(), HEIGHT);
        let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

        if !self.active {
            return response;
        }

        let painter = ui.painter();
        let time = ui.ctx().input(|i| i.time);

        let spacing = 10.0;
        let total = BAR_COUNT as f32 * spacing;
        let left = rect.center().x - total / 2.0;
        let center_y = rect.center().y;
        let max_height = rect.height() * 0.8;

        for i in 0..BAR_COUNT {
            // Staggered pulse per bar, same cadence as the session feel.
            let phase = time * 2.5 + i as f64 * 0.5;
            let level = (phase.sin() * 0.5 + 0.5) as f32;
            let height = 6.0 + level * (max_height - 6.0);
            let x = left + i as f32 * spacing;

            painter.line_segment(
                [
                    Pos2::new(x, center_y - height / 2.0),
                    Pos2::new(x, center_y + height / 2.0),
                ],
                Stroke::new(4.0, self.theme.waveform_active),
            );
        }

        ui.ctx().request_repaint();
        response
    }
}
