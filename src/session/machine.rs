//! Session state machine
//!
//! Pure event-processing core of the session: folds live-connection events
//! into the transcript store and the playback scheduler and reports what
//! happened as session events. Holds no devices or sockets, so the whole
//! audio-session/transcript behavior is testable headless.

use crate::audio::codec;
use crate::audio::PlaybackScheduler;
use crate::live::LiveEvent;
use crate::session::events::{SessionEvent, SessionState};
use crate::transcript::{Role, TranscriptStore};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SessionMachine {
    state: SessionState,
    store: TranscriptStore,
    scheduler: Arc<Mutex<PlaybackScheduler>>,
    output_sample_rate: u32,
}

impl SessionMachine {
    pub fn new(
        store: TranscriptStore,
        scheduler: Arc<Mutex<PlaybackScheduler>>,
        output_sample_rate: u32,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            store,
            scheduler,
            output_sample_rate,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Try to move `Idle -> Connecting`; returns `false` when a session is
    /// already connecting or active (start is a no-op then)
    pub fn begin_connecting(&mut self) -> bool {
        if self.state != SessionState::Idle {
            debug!("Ignoring start: session already {:?}", self.state);
            return false;
        }
        self.state = SessionState::Connecting;
        // The transcript is scoped to one session.
        self.store.clear();
        true
    }

    /// Return to `Idle` from any state; reports the accumulated message
    /// count so the caller can decide whether to present a summary
    pub fn finish(&mut self) -> usize {
        self.state = SessionState::Idle;
        self.store.len()
    }

    /// Fold one live-connection event into session state.
    ///
    /// Events are processed strictly in arrival order; everything here runs
    /// on the single session worker, so transcript, scheduler, and state
    /// updates are atomic with respect to each other.
    ///
    /// Events that arrive while idle are late traffic from a connection that
    /// was already torn down and are dropped: the ended session's transcript
    /// must not grow and the UI must not flip back to active.
    pub fn on_live_event(&mut self, event: LiveEvent) -> Vec<SessionEvent> {
        if self.state == SessionState::Idle {
            debug!("Dropping live event received while idle");
            return Vec::new();
        }

        match event {
            LiveEvent::Opened => {
                if self.state != SessionState::Connecting {
                    debug!("Ignoring duplicate session open");
                    return Vec::new();
                }
                self.state = SessionState::Active;
                vec![SessionEvent::Started]
            }

            LiveEvent::Audio(bytes) => {
                match codec::decode_audio_frames(&bytes, self.output_sample_rate, 1) {
                    Ok(clip) if !clip.is_empty() => {
                        self.scheduler.lock().schedule(&clip);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Skipping audio chunk: {}", e),
                }
                Vec::new()
            }

            LiveEvent::OutputTranscript(fragment) => {
                self.transcript_events(Role::Assistant, &fragment)
            }

            LiveEvent::InputTranscript(fragment) => self.transcript_events(Role::User, &fragment),

            LiveEvent::Interrupted => {
                self.scheduler.lock().interrupt();
                vec![SessionEvent::Interrupted]
            }

            // Connection lifecycle is the controller's concern.
            LiveEvent::Closed => Vec::new(),
            LiveEvent::Error(e) => vec![SessionEvent::Error(e)],
        }
    }

    fn transcript_events(&mut self, role: Role, fragment: &str) -> Vec<SessionEvent> {
        let started_turn = self.store.push_fragment(role, fragment);

        let mut events = Vec::with_capacity(2);
        if started_turn {
            events.push(match role {
                Role::Assistant => SessionEvent::AssistantTurnStarted,
                Role::User => SessionEvent::UserTurnStarted,
            });
        }
        events.push(SessionEvent::TranscriptUpdated);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::codec::encode_pcm16;

    fn machine() -> SessionMachine {
        SessionMachine::new(
            TranscriptStore::new(),
            Arc::new(Mutex::new(PlaybackScheduler::new(24000))),
            24000,
        )
    }

    fn audio_event(frames: usize) -> LiveEvent {
        LiveEvent::Audio(encode_pcm16(&vec![0.25; frames]))
    }

    #[test]
    fn test_start_is_noop_unless_idle() {
        let mut m = machine();
        assert!(m.begin_connecting());
        assert!(!m.begin_connecting());
        assert_eq!(m.state(), SessionState::Connecting);

        m.on_live_event(LiveEvent::Opened);
        assert_eq!(m.state(), SessionState::Active);
        assert!(!m.begin_connecting());

        m.finish();
        assert!(m.begin_connecting());
    }

    #[test]
    fn test_opened_marks_active() {
        let mut m = machine();
        m.begin_connecting();
        let events = m.on_live_event(LiveEvent::Opened);
        assert!(matches!(events.as_slice(), [SessionEvent::Started]));
        assert_eq!(m.state(), SessionState::Active);
    }

    #[test]
    fn test_audio_is_scheduled() {
        let m = machine();
        let scheduler = Arc::clone(&m.scheduler);
        let mut m = m;
        m.begin_connecting();
        m.on_live_event(LiveEvent::Opened);
        m.on_live_event(audio_event(128));
        m.on_live_event(audio_event(64));
        assert_eq!(scheduler.lock().in_flight(), 2);
    }

    #[test]
    fn test_stale_open_after_finish_stays_idle() {
        let mut m = machine();
        m.begin_connecting();
        m.on_live_event(LiveEvent::Opened);
        m.finish();

        // A setup acknowledgement still queued when the user stopped.
        let events = m.on_live_event(LiveEvent::Opened);
        assert!(events.is_empty());
        assert_eq!(m.state(), SessionState::Idle);
    }

    #[test]
    fn test_late_traffic_after_finish_is_dropped() {
        let m = machine();
        let scheduler = Arc::clone(&m.scheduler);
        let mut m = m;
        m.begin_connecting();
        m.on_live_event(LiveEvent::Opened);
        m.on_live_event(LiveEvent::InputTranscript("I need a tow".to_string()));
        m.finish();

        assert!(m
            .on_live_event(LiveEvent::OutputTranscript("late".to_string()))
            .is_empty());
        m.on_live_event(audio_event(128));

        let messages = m.store().get_all();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "I need a tow");
        assert_eq!(scheduler.lock().in_flight(), 0);
    }

    #[test]
    fn test_duplicate_open_while_active_is_ignored() {
        let mut m = machine();
        m.begin_connecting();
        m.on_live_event(LiveEvent::Opened);

        let events = m.on_live_event(LiveEvent::Opened);
        assert!(events.is_empty());
        assert_eq!(m.state(), SessionState::Active);
    }

    #[test]
    fn test_new_session_clears_previous_transcript() {
        let mut m = machine();
        m.begin_connecting();
        m.on_live_event(LiveEvent::OutputTranscript("stale".to_string()));
        m.finish();

        m.begin_connecting();
        assert!(m.store().is_empty());
    }
}
