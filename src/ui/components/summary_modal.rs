//! End-of-call summary modal
//!
//! Shows the extracted call record (placeholders until a structured
//! extraction backend exists) and a phone-number form. Submission goes to
//! the mocked SMS seam, flips to a confirmation view, and the modal
//! dismisses itself after a fixed delay.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText, Vec2};

const FIELD_PLACEHOLDER: &str = "DETECTED";

pub struct SummaryModal<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> SummaryModal<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        if !self.state.summary.open {
            return;
        }

        let theme = self.theme;
        let now = ctx.input(|i| i.time);

        egui::Window::new("call_summary")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -24.0))
            .fixed_size(Vec2::new(360.0, 0.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    let title = if self.state.summary.submitted {
                        "DISPATCH LOG SENT"
                    } else {
                        "CALL COMPLETE"
                    };
                    ui.label(
                        RichText::new(title)
                            .size(20.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    let subtitle = if self.state.summary.submitted {
                        "SMS confirmed"
                    } else {
                        "AI processed while you slept"
                    };
                    ui.label(RichText::new(subtitle).size(10.0).color(theme.text_muted));
                });
                ui.add_space(theme.spacing);

                self.show_summary_card(ui, theme);
                ui.add_space(theme.spacing);

                if self.state.summary.submitted {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("✔").size(36.0).color(theme.success));
                        ui.label(
                            RichText::new("MISSION SUCCESS")
                                .size(14.0)
                                .strong()
                                .color(theme.text_primary),
                        );
                    });
                } else {
                    self.show_form(ui, theme, now);
                }
            });
    }

    fn show_summary_card(&self, ui: &mut egui::Ui, theme: &Theme) {
        let summary = &self.state.summary.summary;

        egui::Frame::none()
            .fill(theme.assistant_bubble)
            .rounding(theme.card_rounding)
            .inner_margin(theme.spacing)
            .stroke(egui::Stroke::new(2.0, theme.primary))
            .show(ui, |ui| {
                ui.label(
                    RichText::new("EXTRACTED INTEL")
                        .size(10.0)
                        .strong()
                        .color(theme.primary),
                );
                ui.add_space(theme.spacing_sm);

                for (label, value) in [
                    ("Customer", &summary.name),
                    ("Vehicle", &summary.vehicle),
                    ("Location", &summary.location),
                ] {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(label).size(10.0).color(theme.text_muted));
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                let shown = if value.is_empty() {
                                    FIELD_PLACEHOLDER
                                } else {
                                    value.as_str()
                                };
                                ui.label(
                                    RichText::new(shown)
                                        .size(14.0)
                                        .strong()
                                        .color(theme.text_primary),
                                );
                            },
                        );
                    });
                    ui.separator();
                }
            });
    }

    fn show_form(self, ui: &mut egui::Ui, theme: &Theme, now: f64) {
        ui.label(
            RichText::new("SMS TARGET NUMBER")
                .size(10.0)
                .color(theme.text_muted),
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.state.summary.phone)
                .hint_text("+1 (555) 000-0000")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(theme.spacing_sm);

        ui.horizontal(|ui| {
            let confirm = egui::Button::new(
                RichText::new("CONFIRM SMS DISPATCH")
                    .strong()
                    .color(egui::Color32::WHITE),
            )
            .fill(theme.user_bubble)
            .rounding(theme.button_rounding);

            if ui.add(confirm).clicked() {
                self.state.summary.submit(self.state.sms.as_ref(), now);
            }

            if ui.button("Dismiss").clicked() {
                self.state.summary.dismiss();
            }
        });
    }
}
