//! So So Easy Dispatcher
//!
//! Main entry point: wires the session worker to the UI and launches eframe.

use dispatcher::ui::{AppState, DispatcherApp};
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dispatcher=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting dispatcher");

    let state = build_state();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 820.0])
            .with_min_inner_size([360.0, 600.0])
            .with_title("So So Easy Dispatcher"),
        ..Default::default()
    };

    eframe::run_native(
        "So So Easy Dispatcher",
        options,
        Box::new(|cc| Ok(Box::new(DispatcherApp::new(cc, state)))),
    )
}

#[cfg(feature = "audio-io")]
fn build_state() -> AppState {
    use dispatcher::config::SessionConfig;
    use dispatcher::session::SessionController;

    let config = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config incomplete, sessions will fail to start: {e}");
            SessionConfig::default()
        }
    };

    let (controller, handle) = SessionController::new(config);
    match controller.start() {
        Ok(_) => AppState::with_handle(handle),
        Err(e) => {
            tracing::error!("Session worker failed to start: {e}");
            AppState::new()
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn build_state() -> AppState {
    tracing::warn!("Built without audio-io, running in display-only mode");
    AppState::new()
}
