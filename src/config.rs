//! Session configuration
//!
//! Centralized configuration for the voice session: model selection,
//! dispatcher persona, and the fixed audio transport rates.

use crate::{DispatcherError, Result};

/// Environment variable holding the live API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default live model
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-09-2025";

/// System prompt describing the dispatcher persona and its data-collection goal
pub const DISPATCHER_PROMPT: &str = "You are an AI dispatcher for a towing service. \
Your mission is to collect the caller's name, vehicle details, and pickup location. \
Be professional, comforting, and fast.";

/// Configuration for one voice session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// API key for the live voice service
    pub api_key: String,

    /// Live model identifier
    pub model: String,

    /// System prompt sent with the session setup
    pub system_prompt: String,

    /// Sample rate for microphone capture
    pub input_sample_rate: u32,

    /// Sample rate for reply playback
    pub output_sample_rate: u32,

    /// Samples per outbound capture frame
    pub capture_frame_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DISPATCHER_PROMPT.to_string(),
            input_sample_rate: crate::audio::INPUT_SAMPLE_RATE,
            output_sample_rate: crate::audio::OUTPUT_SAMPLE_RATE,
            capture_frame_size: 4096,
        }
    }
}

impl SessionConfig {
    /// Build a configuration with the API key read from the environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            DispatcherError::ConfigError(format!("{} is not set", API_KEY_ENV))
        })?;

        Ok(Self {
            api_key,
            ..Self::default()
        })
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(DispatcherError::ConfigError(
                "API key is required".to_string(),
            ));
        }
        if self.model.is_empty() {
            return Err(DispatcherError::ConfigError(
                "Model identifier is required".to_string(),
            ));
        }
        if self.input_sample_rate == 0 || self.output_sample_rate == 0 {
            return Err(DispatcherError::ConfigError(
                "Sample rates must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.input_sample_rate, 16000);
        assert_eq!(config.output_sample_rate, 24000);
        assert_eq!(config.capture_frame_size, 4096);
        assert!(config.validate().is_err()); // no API key
    }

    #[test]
    fn test_validation_passes_with_key() {
        let mut config = SessionConfig::default();
        config.api_key = "test-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SessionConfig::default()
            .with_model("models/test")
            .with_system_prompt("Be terse.");
        assert_eq!(config.model, "models/test");
        assert_eq!(config.system_prompt, "Be terse.");
    }
}
