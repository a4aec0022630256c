//! Live voice-service connection
//!
//! Bidirectional streaming session with the Gemini Live API: microphone PCM
//! goes out as base64 media chunks, and reply audio, transcript fragments,
//! and barge-in signals come back as server-content messages.

pub mod client;
pub mod protocol;

pub use client::LiveHandle;

/// Inbound traffic from the live connection, in arrival order
#[derive(Debug, Clone)]
pub enum LiveEvent {
    /// Setup acknowledged; the session is live
    Opened,

    /// Reply audio chunk, already base64-decoded to raw PCM16 bytes
    Audio(Vec<u8>),

    /// Partial transcript of the assistant's speech
    OutputTranscript(String),

    /// Partial transcript of the caller's speech
    InputTranscript(String),

    /// The caller started speaking over the assistant; queued playback
    /// must stop immediately
    Interrupted,

    /// The connection closed (remote close or local shutdown)
    Closed,

    /// The connection failed
    Error(String),
}
