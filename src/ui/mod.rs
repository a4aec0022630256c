pub mod app;
pub mod components;
pub mod particles;
pub mod state;
pub mod theme;

pub use app::DispatcherApp;
pub use particles::{ParticleField, ParticleKind};
pub use state::AppState;
pub use theme::Theme;
