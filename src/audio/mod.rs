#[cfg(feature = "audio-io")]
pub mod capture;
pub mod codec;
pub mod playback;

#[cfg(feature = "audio-io")]
pub use capture::AudioCapture;
pub use codec::AudioClip;
#[cfg(feature = "audio-io")]
pub use playback::AudioOutput;
pub use playback::PlaybackScheduler;

/// Microphone capture rate expected by the live API
pub const INPUT_SAMPLE_RATE: u32 = 16_000;

/// Playback rate of the audio the live API streams back
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;
