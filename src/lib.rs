//! Voice-driven roadside dispatcher
//!
//! Streams microphone audio to a live voice model, plays the replies back
//! gaplessly, and mirrors the conversation as a running transcript.

pub mod audio;
pub mod config;
pub mod live;
pub mod session;
pub mod sms;
pub mod transcript;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DispatcherError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio codec error: {0}")]
    CodecError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl DispatcherError {
    /// Check if this error is recoverable without restarting the app
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            DispatcherError::AudioDeviceError(_) => false,
            // A torn audio chunk only loses that chunk
            DispatcherError::CodecError(_) => true,
            // The user can retry the session
            DispatcherError::ConnectionError(_) => true,
            DispatcherError::SessionError(_) => true,
            DispatcherError::ConfigError(_) => false,
            DispatcherError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            DispatcherError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            DispatcherError::CodecError(_) => {
                "Audio data could not be decoded. Please try again.".to_string()
            }
            DispatcherError::ConnectionError(_) => {
                "Could not reach the voice service. Please check your connection.".to_string()
            }
            DispatcherError::SessionError(_) => {
                "The call ended unexpectedly. Please start a new session.".to_string()
            }
            DispatcherError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            DispatcherError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatcherError>;
