//! SMS dispatch seam
//!
//! Submitting the end-of-call summary is meant to hand a phone number and
//! the extracted `CallSummary` to an external SMS service. This repo ships
//! only the seam and a mock that logs the payload.

use crate::transcript::CallSummary;
use crate::{DispatcherError, Result};
use tracing::info;

pub trait SmsDispatch: Send {
    /// Send the call summary to `phone`
    fn dispatch(&self, phone: &str, summary: &CallSummary) -> Result<()>;
}

/// Mock dispatcher: validates the number shape and logs instead of sending
#[derive(Debug, Default)]
pub struct MockSmsDispatch;

impl SmsDispatch for MockSmsDispatch {
    fn dispatch(&self, phone: &str, summary: &CallSummary) -> Result<()> {
        if phone.trim().is_empty() {
            return Err(DispatcherError::ConfigError(
                "Phone number is required".to_string(),
            ));
        }

        info!(
            phone,
            name = %summary.name,
            vehicle = %summary.vehicle,
            location = %summary.location,
            "Mock SMS dispatch"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_accepts_number() {
        let result = MockSmsDispatch.dispatch("+1 555 000 0000", &CallSummary::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_mock_rejects_empty_number() {
        let result = MockSmsDispatch.dispatch("   ", &CallSummary::default());
        assert!(result.is_err());
    }
}
