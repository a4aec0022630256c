//! Live transcript feed
//!
//! Role-aligned conversation bubbles: assistant on the left in slate with a
//! sky accent, caller on the right in sky. Streams grow in place as
//! fragments merge into the latest turn.

use crate::transcript::{Message, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct TranscriptFeed<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> TranscriptFeed<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.state.store.get_all();

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("LIVE COMM FEED")
                    .size(11.0)
                    .strong()
                    .color(self.theme.text_muted),
            );
            if self.state.is_active() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new("● MONITORING")
                            .size(10.0)
                            .strong()
                            .color(self.theme.error),
                    );
                });
            }
        });
        ui.add_space(self.theme.spacing_sm);

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_min_height(220.0);
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if messages.is_empty() {
                            self.show_empty_state(ui);
                        } else {
                            for message in &messages {
                                self.show_message(ui, message);
                                ui.add_space(self.theme.spacing_sm);
                            }
                        }
                    });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(70.0);
            ui.label(RichText::new("🎙").size(32.0));
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("SYSTEM STANDING BY FOR CLIENT LINK")
                    .size(12.0)
                    .strong()
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.role == Role::User;
        let (bubble_color, text_color) = if is_user {
            (self.theme.user_bubble, Color32::WHITE)
        } else {
            (self.theme.assistant_bubble, self.theme.primary)
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            let max_width = ui.available_width() * 0.85;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.card_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(&message.text).color(text_color));
                });

            let label = if is_user {
                "<<< CLIENT INBOUND"
            } else {
                ">>> AI DISPATCH"
            };
            ui.label(
                RichText::new(format!(
                    "{}  {}",
                    label,
                    message.timestamp.format("%H:%M")
                ))
                .size(9.0)
                .color(self.theme.text_muted),
            );
        });
    }
}
