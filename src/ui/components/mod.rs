pub mod power_button;
pub mod summary_modal;
pub mod transcript_feed;
pub mod waveform;

pub use power_button::PowerButton;
pub use summary_modal::SummaryModal;
pub use transcript_feed::TranscriptFeed;
pub use waveform::Waveform;
