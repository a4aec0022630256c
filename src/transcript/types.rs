use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One conversational turn of the live transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// End-of-call summary for the SMS dispatch seam.
///
/// Never populated from real extraction in this demo; it waits on a
/// structured-extraction backend and defaults to empty fields, which the
/// UI renders as placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallSummary {
    pub name: String,
    pub vehicle: String,
    pub location: String,
}

impl CallSummary {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.vehicle.is_empty() && self.location.is_empty()
    }
}
