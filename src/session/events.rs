/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session; resources released
    Idle,
    /// Acquiring devices and opening the live connection
    Connecting,
    /// Streaming in both directions
    Active,
}

/// Commands the UI sends to the session worker
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Begin a session; no-op unless idle
    Start,

    /// End the session; idempotent
    Stop,

    /// Tear down and exit the worker
    Shutdown,
}

/// Events the session worker emits for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session start was accepted; devices and connection are opening
    Connecting,

    /// The live connection acknowledged setup; streaming has begun
    Started,

    /// The assistant began a new conversational turn
    AssistantTurnStarted,

    /// The caller began a new conversational turn
    UserTurnStarted,

    /// A transcript fragment was folded into the message store
    TranscriptUpdated,

    /// Queued assistant playback was cancelled by a barge-in
    Interrupted,

    /// The session ended; `message_count` is the accumulated transcript size
    Stopped { message_count: usize },

    /// Session start failed or the connection broke
    Error(String),
}
