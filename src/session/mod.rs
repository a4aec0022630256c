//! Voice session lifecycle
//!
//! The session is an explicit state machine (`Idle -> Connecting -> Active
//! -> Idle`) driven by live-connection events, with the controller owning
//! every transient resource (microphone, output device, connection) so that
//! teardown is guaranteed and idempotent on any exit path.

#[cfg(feature = "audio-io")]
pub mod controller;
pub mod events;
pub mod machine;

#[cfg(feature = "audio-io")]
pub use controller::{SessionController, SessionHandle};
pub use events::{SessionCommand, SessionEvent, SessionState};
pub use machine::SessionMachine;
