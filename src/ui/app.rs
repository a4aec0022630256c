//! Main application struct and eframe integration
//!
//! This module contains the DispatcherApp that implements eframe::App.

use crate::ui::components::{PowerButton, SummaryModal, TranscriptFeed, Waveform};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align2, CentralPanel, Color32, FontId, Id, LayerId, Order, Pos2, RichText,
    TopBottomPanel};

/// Main dispatcher application
pub struct DispatcherApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
}

impl DispatcherApp {
    /// Create a new dispatcher application
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    /// Show the top header bar
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("SO SO EASY DISPATCHER")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("Roadside AI Unit")
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(error) = &self.state.last_error {
                            ui.label(
                                RichText::new(error)
                                    .size(11.0)
                                    .color(self.theme.error),
                            );
                        } else {
                            let (label, color) = if self.state.is_active() {
                                ("ON DUTY", self.theme.primary)
                            } else if self.state.is_connecting() {
                                ("LINKING", self.theme.text_secondary)
                            } else {
                                ("OFF DUTY", self.theme.text_muted)
                            };
                            ui.label(RichText::new(label).size(11.0).strong().color(color));
                        }
                    });
                });
            });
    }

    /// Show the main content area: power button, waveform, transcript
    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(self.theme.spacing_lg);
                    if PowerButton::new(self.state.session_state, &self.theme).show(ui) {
                        self.state.toggle_session();
                    }
                    ui.add_space(self.theme.spacing);
                    Waveform::new(self.state.is_active(), &self.theme).show(ui);
                });

                ui.add_space(self.theme.spacing);
                TranscriptFeed::new(&self.state, &self.theme).show(ui);
            });
    }

    /// Draw the particle bursts on a foreground layer over everything else
    fn show_particles(&self, ctx: &egui::Context, now: f64) {
        if self.state.particles.is_empty() {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("particles")));
        let screen = ctx.screen_rect();

        for particle in self.state.particles.iter() {
            let t = particle.progress(now);

            // Rise from the bottom edge, drifting sideways and fading out.
            let x = screen.width() * particle.x / 100.0 + particle.drift * t;
            let y = screen.bottom() - (screen.height() + 60.0) * t;
            let alpha = (1.0 - t) * 255.0;
            let size = 20.0 + 12.0 * t;

            let base = match particle.kind {
                crate::ui::particles::ParticleKind::Money => self.theme.particle_money,
                crate::ui::particles::ParticleKind::Zzz => self.theme.particle_zzz,
            };
            let color = Color32::from_rgba_unmultiplied(
                base.r(),
                base.g(),
                base.b(),
                alpha as u8,
            );

            painter.text(
                Pos2::new(x, y),
                Align2::CENTER_CENTER,
                particle.kind.symbol(),
                FontId::proportional(size),
                color,
            );
        }
    }
}

impl eframe::App for DispatcherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        // Poll backend events and advance time-driven state
        self.state.poll_events(now);

        // Render UI
        self.show_header(ctx);
        self.show_content(ctx);
        self.show_particles(ctx, now);
        SummaryModal::new(&mut self.state, &self.theme).show(ctx);

        // Request repaint for animations
        if self.state.is_active()
            || self.state.is_connecting()
            || !self.state.particles.is_empty()
            || self.state.summary.open
        {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        #[cfg(feature = "audio-io")]
        if let Some(handle) = &self.state.handle {
            handle.shutdown();
        }
    }
}
