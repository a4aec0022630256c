//! Session worker and UI-facing handle
//!
//! The controller runs on its own thread and owns every transient resource
//! of one session: the microphone capture, the output device, and the live
//! connection. Teardown happens through a single release path on success,
//! error, or user stop, so stopping is always idempotent.

use crate::audio::{AudioCapture, AudioOutput, PlaybackScheduler};
use crate::config::SessionConfig;
use crate::live::{LiveEvent, LiveHandle};
use crate::session::events::{SessionCommand, SessionEvent};
use crate::session::machine::SessionMachine;
use crate::transcript::TranscriptStore;
use crate::{audio::codec, DispatcherError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Handle for controlling the session from the UI
pub struct SessionHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    store: TranscriptStore,
}

impl SessionHandle {
    /// Request a session start; a no-op while one is connecting or active
    pub fn start(&self) {
        let _ = self.command_tx.send(SessionCommand::Start);
    }

    /// Request a session stop; idempotent
    pub fn stop(&self) {
        let _ = self.command_tx.send(SessionCommand::Stop);
    }

    /// Tear everything down and exit the worker
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown);
    }

    /// Try to receive the next session event
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Shared view of the running transcript
    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }
}

/// Session worker coordinating devices, connection, and transcript
pub struct SessionController {
    config: SessionConfig,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
    store: TranscriptStore,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = unbounded();
        let store = TranscriptStore::new();

        let handle = SessionHandle {
            command_tx,
            event_rx,
            store: store.clone(),
        };

        let controller = Self {
            config,
            command_rx,
            event_tx,
            store,
        };

        (controller, handle)
    }

    /// Start the worker thread, consuming the controller
    pub fn start(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || self.run())
            .map_err(|e| {
                DispatcherError::SessionError(format!("Failed to spawn session worker: {}", e))
            })
    }

    fn run(self) {
        info!("Session worker started");

        let scheduler = Arc::new(Mutex::new(PlaybackScheduler::new(
            self.config.output_sample_rate,
        )));
        let mut machine = SessionMachine::new(
            self.store.clone(),
            Arc::clone(&scheduler),
            self.config.output_sample_rate,
        );

        let (live_event_tx, live_event_rx) = unbounded::<LiveEvent>();
        let mut resources: Option<SessionResources> = None;

        loop {
            match self.command_rx.recv_timeout(Duration::from_millis(10)) {
                Ok(SessionCommand::Start) => {
                    self.start_session(&mut machine, &mut resources, &scheduler, &live_event_tx);
                }
                Ok(SessionCommand::Stop) => {
                    self.stop_session(&mut machine, &mut resources, &scheduler);
                }
                Ok(SessionCommand::Shutdown) => {
                    self.stop_session(&mut machine, &mut resources, &scheduler);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.stop_session(&mut machine, &mut resources, &scheduler);
                    break;
                }
            }

            // Inbound events, strictly in arrival order.
            loop {
                match live_event_rx.try_recv() {
                    Ok(LiveEvent::Closed) => {
                        self.stop_session(&mut machine, &mut resources, &scheduler);
                    }
                    Ok(LiveEvent::Error(e)) => {
                        self.emit_error(&DispatcherError::ConnectionError(e));
                        self.stop_session(&mut machine, &mut resources, &scheduler);
                    }
                    Ok(event) => {
                        for out in machine.on_live_event(event) {
                            if matches!(out, SessionEvent::Started) {
                                if let Err(e) = self.begin_streaming(&mut resources) {
                                    // An unusable microphone ends the session;
                                    // the acknowledgement is never surfaced.
                                    self.fail_streaming(
                                        e,
                                        &mut machine,
                                        &mut resources,
                                        &scheduler,
                                    );
                                    break;
                                }
                            }
                            let _ = self.event_tx.send(out);
                        }
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
        }

        info!("Session worker stopped");
    }

    fn start_session(
        &self,
        machine: &mut SessionMachine,
        resources: &mut Option<SessionResources>,
        scheduler: &Arc<Mutex<PlaybackScheduler>>,
        live_event_tx: &Sender<LiveEvent>,
    ) {
        if !machine.begin_connecting() {
            return;
        }
        let _ = self.event_tx.send(SessionEvent::Connecting);

        match self.acquire_resources(scheduler, live_event_tx) {
            Ok(acquired) => {
                *resources = Some(acquired);
            }
            Err(e) => {
                self.emit_error(&e);
                let message_count = machine.finish();
                let _ = self.event_tx.send(SessionEvent::Stopped { message_count });
            }
        }
    }

    fn acquire_resources(
        &self,
        scheduler: &Arc<Mutex<PlaybackScheduler>>,
        live_event_tx: &Sender<LiveEvent>,
    ) -> Result<SessionResources> {
        self.config.validate()?;

        let mut output = AudioOutput::new(self.config.output_sample_rate, Arc::clone(scheduler))?;
        output.start()?;

        let capture = AudioCapture::new(
            self.config.input_sample_rate,
            self.config.capture_frame_size,
        )?;

        let live = LiveHandle::connect(self.config.clone(), live_event_tx.clone());

        Ok(SessionResources {
            capture,
            output,
            live,
            forwarder: None,
        })
    }

    /// The connection is acknowledged: start continuous microphone capture
    /// and forward each frame to the live connection, best-effort
    fn begin_streaming(&self, resources: &mut Option<SessionResources>) -> Result<()> {
        let Some(res) = resources.as_mut() else {
            return Ok(());
        };
        if res.forwarder.is_some() {
            return Ok(());
        }

        let (frame_tx, frame_rx) = bounded::<Vec<f32>>(32);
        res.capture.start(frame_tx)?;

        let live_frames = res.live.frame_sender();
        let forwarder = thread::spawn(move || {
            while let Ok(frame) = frame_rx.recv() {
                if live_frames.send(codec::encode_frame(&frame)).is_err() {
                    break;
                }
            }
            debug!("Capture forwarder exited");
        });
        res.forwarder = Some(forwarder);
        Ok(())
    }

    /// A session that cannot stream is torn down like any other stop; the
    /// user gets the error and an idle UI, not a deaf active call
    fn fail_streaming(
        &self,
        error: DispatcherError,
        machine: &mut SessionMachine,
        resources: &mut Option<SessionResources>,
        scheduler: &Arc<Mutex<PlaybackScheduler>>,
    ) {
        self.emit_error(&error);
        self.stop_session(machine, resources, scheduler);
    }

    /// Log the detailed error and send the user-facing message to the UI
    fn emit_error(&self, err: &DispatcherError) {
        if err.is_recoverable() {
            warn!("Session error: {}", err);
        } else {
            error!("Session error: {}", err);
        }
        let _ = self.event_tx.send(SessionEvent::Error(err.user_message()));
    }

    fn stop_session(
        &self,
        machine: &mut SessionMachine,
        resources: &mut Option<SessionResources>,
        scheduler: &Arc<Mutex<PlaybackScheduler>>,
    ) {
        use crate::session::events::SessionState;
        if machine.state() == SessionState::Idle && resources.is_none() {
            return;
        }

        if let Some(mut res) = resources.take() {
            res.release();
        }
        scheduler.lock().interrupt();

        let message_count = machine.finish();
        info!("Session stopped with {} messages", message_count);
        let _ = self.event_tx.send(SessionEvent::Stopped { message_count });
    }
}

/// Transient resources of one session; released together, in order
struct SessionResources {
    capture: AudioCapture,
    output: AudioOutput,
    live: LiveHandle,
    forwarder: Option<JoinHandle<()>>,
}

impl SessionResources {
    /// Idempotent teardown: microphone first (stops the frame source), then
    /// the forwarder drains, then the connection and output close. Close
    /// errors are ignored.
    fn release(&mut self) {
        self.capture.stop();
        if let Some(forwarder) = self.forwarder.take() {
            let _ = forwarder.join();
        }
        self.live.close();
        self.output.stop();
    }
}

impl Drop for SessionResources {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_plumbing() {
        let (controller, handle) = SessionController::new(SessionConfig::default());

        handle.stop();
        handle.shutdown();

        // Worker drains both commands and exits; stop before start is a no-op
        // and emits nothing.
        let worker = controller.start().unwrap();
        worker.join().unwrap();

        assert!(handle.try_recv_event().is_none());
        assert!(handle.store().is_empty());
    }

    #[test]
    fn test_start_without_api_key_reports_error_and_idles() {
        let (controller, handle) = SessionController::new(SessionConfig::default());
        handle.start();
        handle.shutdown();

        let worker = controller.start().unwrap();
        worker.join().unwrap();

        let mut events = Vec::new();
        while let Some(event) = handle.try_recv_event() {
            events.push(event);
        }

        assert!(matches!(events.first(), Some(SessionEvent::Connecting)));
        // The UI gets the friendly description, not the raw config error.
        let friendly = DispatcherError::ConfigError(String::new()).user_message();
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::Error(msg) if *msg == friendly)));
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::Stopped { message_count: 0 })));
    }

    #[test]
    fn test_streaming_failure_tears_the_session_down() {
        use crate::session::events::SessionState;

        let (controller, handle) = SessionController::new(SessionConfig::default());
        let scheduler = Arc::new(Mutex::new(PlaybackScheduler::new(24000)));
        let mut machine =
            SessionMachine::new(controller.store.clone(), Arc::clone(&scheduler), 24000);
        machine.begin_connecting();
        machine.on_live_event(LiveEvent::Opened);
        assert_eq!(machine.state(), SessionState::Active);

        let mut resources = None;
        controller.fail_streaming(
            DispatcherError::AudioDeviceError("input stream died".to_string()),
            &mut machine,
            &mut resources,
            &scheduler,
        );

        assert_eq!(machine.state(), SessionState::Idle);

        let mut events = Vec::new();
        while let Some(event) = handle.try_recv_event() {
            events.push(event);
        }
        let friendly = DispatcherError::AudioDeviceError(String::new()).user_message();
        assert!(matches!(events.first(), Some(SessionEvent::Error(msg)) if *msg == friendly));
        assert!(matches!(
            events.last(),
            Some(SessionEvent::Stopped { message_count: 0 })
        ));
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Started)));
    }
}
