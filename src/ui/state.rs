//! Application state management
//!
//! Central state for the dispatcher UI: a mirror of the session lifecycle,
//! the shared transcript view, the particle field, and the summary modal.

#[cfg(feature = "audio-io")]
use crate::session::SessionHandle;
use crate::session::{SessionEvent, SessionState};
use crate::sms::{MockSmsDispatch, SmsDispatch};
use crate::transcript::{CallSummary, TranscriptStore};
use crate::ui::particles::{ParticleField, ParticleKind};

/// How long the submitted confirmation stays up before the modal dismisses
const SUBMIT_DISMISS_SECS: f64 = 3.0;

/// State of the end-of-call summary modal
#[derive(Debug, Default)]
pub struct SummaryState {
    pub open: bool,
    pub summary: CallSummary,
    pub phone: String,
    pub submitted: bool,
    submitted_at: Option<f64>,
}

impl SummaryState {
    /// Present the modal for a freshly ended call
    pub fn present(&mut self, summary: CallSummary) {
        self.open = true;
        self.summary = summary;
        self.phone.clear();
        self.submitted = false;
        self.submitted_at = None;
    }

    /// Mock submission: hand the payload to the SMS seam, flip the
    /// submitted flag, and schedule the auto-dismiss
    pub fn submit(&mut self, sms: &dyn SmsDispatch, now: f64) -> bool {
        if sms.dispatch(&self.phone, &self.summary).is_err() {
            return false;
        }
        self.submitted = true;
        self.submitted_at = Some(now);
        true
    }

    /// Close the modal once the confirmation has been shown long enough
    pub fn maybe_auto_close(&mut self, now: f64) {
        if let Some(at) = self.submitted_at {
            if now - at >= SUBMIT_DISMISS_SECS {
                self.open = false;
                self.submitted_at = None;
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.open = false;
        self.submitted_at = None;
    }
}

/// Central application state
pub struct AppState {
    /// Handle to the session worker
    #[cfg(feature = "audio-io")]
    pub handle: Option<SessionHandle>,

    /// Shared view of the running transcript
    pub store: TranscriptStore,

    /// Mirror of the session lifecycle, kept current by `poll_events`
    pub session_state: SessionState,

    /// Cosmetic particle bursts
    pub particles: ParticleField,

    /// End-of-call summary modal
    pub summary: SummaryState,

    /// SMS dispatch seam (mocked)
    pub sms: Box<dyn SmsDispatch>,

    /// Last error message for the status line
    pub last_error: Option<String>,
}

impl AppState {
    /// Standalone state with no session worker attached
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "audio-io")]
            handle: None,
            store: TranscriptStore::new(),
            session_state: SessionState::Idle,
            particles: ParticleField::new(),
            summary: SummaryState::default(),
            sms: Box::new(MockSmsDispatch),
            last_error: None,
        }
    }

    /// State wired to a session worker
    #[cfg(feature = "audio-io")]
    pub fn with_handle(handle: SessionHandle) -> Self {
        let store = handle.store().clone();
        Self {
            handle: Some(handle),
            store,
            ..Self::new()
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_state == SessionState::Active
    }

    pub fn is_connecting(&self) -> bool {
        self.session_state == SessionState::Connecting
    }

    /// Power button action: stop when live, start when idle
    pub fn toggle_session(&mut self) {
        #[cfg(feature = "audio-io")]
        if let Some(handle) = &self.handle {
            match self.session_state {
                SessionState::Idle => handle.start(),
                SessionState::Connecting | SessionState::Active => handle.stop(),
            }
        }
    }

    /// Drain session events and advance time-driven state
    pub fn poll_events(&mut self, now: f64) {
        #[cfg(feature = "audio-io")]
        while let Some(event) = self
            .handle
            .as_ref()
            .and_then(|handle| handle.try_recv_event())
        {
            self.apply_event(event, now);
        }

        self.particles.sweep(now);
        self.summary.maybe_auto_close(now);
    }

    /// Fold one session event into UI state
    pub fn apply_event(&mut self, event: SessionEvent, now: f64) {
        match event {
            SessionEvent::Connecting => {
                self.session_state = SessionState::Connecting;
                self.last_error = None;
            }
            SessionEvent::Started => {
                self.session_state = SessionState::Active;
                // Entry celebration.
                self.particles.burst(ParticleKind::Money, 20, now);
                self.particles.burst(ParticleKind::Zzz, 20, now);
            }
            SessionEvent::AssistantTurnStarted => {
                self.particles.burst(ParticleKind::Money, 3, now);
            }
            SessionEvent::UserTurnStarted => {
                self.particles.burst(ParticleKind::Zzz, 2, now);
            }
            SessionEvent::TranscriptUpdated => {}
            SessionEvent::Interrupted => {}
            SessionEvent::Stopped { message_count } => {
                self.session_state = SessionState::Idle;
                if message_count > 0 {
                    // Summary extraction is mocked; fields stay empty and
                    // render as placeholders.
                    self.summary.present(CallSummary::default());
                }
            }
            SessionEvent::Error(e) => {
                self.last_error = Some(e);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_event_celebrates() {
        let mut state = AppState::new();
        state.apply_event(SessionEvent::Connecting, 0.0);
        assert!(state.is_connecting());

        state.apply_event(SessionEvent::Started, 0.0);
        assert!(state.is_active());
        assert_eq!(state.particles.len(), 40);
    }

    #[test]
    fn test_turn_bursts() {
        let mut state = AppState::new();
        state.apply_event(SessionEvent::AssistantTurnStarted, 0.0);
        assert_eq!(state.particles.len(), 3);
        state.apply_event(SessionEvent::UserTurnStarted, 0.0);
        assert_eq!(state.particles.len(), 5);
    }

    #[test]
    fn test_stop_without_messages_keeps_summary_closed() {
        let mut state = AppState::new();
        state.apply_event(SessionEvent::Stopped { message_count: 0 }, 0.0);
        assert!(!state.summary.open);
        assert_eq!(state.session_state, SessionState::Idle);
    }

    #[test]
    fn test_stop_with_messages_opens_summary() {
        let mut state = AppState::new();
        state.apply_event(SessionEvent::Stopped { message_count: 3 }, 0.0);
        assert!(state.summary.open);
        assert!(state.summary.summary.is_empty());
    }

    #[test]
    fn test_submit_flips_flag_and_auto_dismisses() {
        let mut state = AppState::new();
        state.summary.present(CallSummary::default());
        state.summary.phone = "+1 555 000 0000".to_string();

        assert!(state.summary.submit(state.sms.as_ref(), 10.0));
        assert!(state.summary.submitted);
        assert!(state.summary.open);

        state.summary.maybe_auto_close(12.0);
        assert!(state.summary.open);
        state.summary.maybe_auto_close(13.1);
        assert!(!state.summary.open);
    }

    #[test]
    fn test_submit_requires_phone() {
        let mut state = AppState::new();
        state.summary.present(CallSummary::default());
        assert!(!state.summary.submit(state.sms.as_ref(), 0.0));
        assert!(!state.summary.submitted);
    }

    #[test]
    fn test_error_event_is_surfaced() {
        let mut state = AppState::new();
        state.apply_event(SessionEvent::Error("mic denied".to_string()), 0.0);
        assert_eq!(state.last_error.as_deref(), Some("mic denied"));
    }
}
