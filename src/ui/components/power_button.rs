//! Session power button
//!
//! Large circular toggle: dark ring when idle, sky glow while active, a
//! spinner while connecting. Clicking toggles the session.

use crate::session::SessionState;
use crate::ui::theme::Theme;
use egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Stroke, Vec2};

const BUTTON_DIAMETER: f32 = 160.0;

pub struct PowerButton<'a> {
    session_state: SessionState,
    theme: &'a Theme,
}

impl<'a> PowerButton<'a> {
    pub fn new(session_state: SessionState, theme: &'a Theme) -> Self {
        Self {
            session_state,
            theme,
        }
    }

    /// Returns `true` when the button was clicked
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(
            Vec2::splat(BUTTON_DIAMETER + 16.0),
            Sense::click(),
        );
        let painter = ui.painter();
        let center = rect.center();
        let radius = BUTTON_DIAMETER / 2.0;

        let active = self.session_state == SessionState::Active;
        let connecting = self.session_state == SessionState::Connecting;

        let ring = if active {
            self.theme.primary
        } else {
            self.theme.bg_tertiary
        };

        if active {
            // Soft glow behind the ring.
            painter.circle_filled(center, radius + 8.0, self.theme.primary.gamma_multiply(0.15));
        }
        painter.circle_filled(center, radius, self.theme.assistant_bubble);
        painter.circle_stroke(center, radius, Stroke::new(6.0, ring));

        if connecting {
            self.draw_spinner(ui, center, radius * 0.45);
        } else {
            let label = if active { "ON" } else { "OFF" };
            let label_color = if active {
                Color32::WHITE
            } else {
                self.theme.text_muted
            };
            painter.text(
                center - Vec2::new(0.0, 6.0),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(42.0),
                label_color,
            );
            painter.text(
                center + Vec2::new(0.0, 30.0),
                Align2::CENTER_CENTER,
                if active { "UNIT ACTIVE" } else { "POWER" },
                FontId::proportional(11.0),
                if active {
                    self.theme.primary
                } else {
                    self.theme.text_muted
                },
            );
        }

        ui.vertical_centered(|ui| {
            if active {
                ui.label(
                    RichText::new("LIVE")
                        .size(11.0)
                        .strong()
                        .color(self.theme.error),
                );
            }
        });

        if connecting {
            ui.ctx().request_repaint();
        }

        response.clicked() && !connecting
    }

    fn draw_spinner(&self, ui: &egui::Ui, center: Pos2, radius: f32) {
        let time = ui.ctx().input(|i| i.time);
        let painter = ui.painter();

        for i in 0..8 {
            let angle = time as f32 * 4.0 + i as f32 * std::f32::consts::TAU / 8.0;
            let pos = center + Vec2::angled(angle) * radius;
            let alpha = (i as f32 + 1.0) / 8.0;
            painter.circle_filled(pos, 4.0, self.theme.primary.gamma_multiply(alpha));
        }
    }
}
