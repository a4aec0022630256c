//! Live connection worker
//!
//! Runs the WebSocket session on its own thread with a current-thread tokio
//! runtime. Inbound messages are flattened to [`LiveEvent`]s and forwarded
//! in arrival order; outbound capture frames are best-effort and a failed
//! send drops the frame without retry.

use crate::config::SessionConfig;
use crate::live::{protocol, LiveEvent};
use crossbeam_channel::Sender;
use futures::{SinkExt, StreamExt};
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Handle to an open (or opening) live connection
pub struct LiveHandle {
    frame_tx: mpsc::UnboundedSender<String>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl LiveHandle {
    /// Open a connection in the background. Progress and failures surface
    /// as [`LiveEvent`]s on `event_tx`; the caller never blocks here.
    pub fn connect(config: SessionConfig, event_tx: Sender<LiveEvent>) -> Self {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let thread = std::thread::Builder::new()
            .name("live-session".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = event_tx.send(LiveEvent::Error(format!(
                            "Failed to start connection runtime: {}",
                            e
                        )));
                        return;
                    }
                };

                runtime.block_on(run_session(config, event_tx, frame_rx, shutdown_rx));
            })
            .ok();

        if thread.is_none() {
            warn!("Failed to spawn live session thread");
        }

        Self {
            frame_tx,
            shutdown_tx: Some(shutdown_tx),
            thread,
        }
    }

    /// Sender the capture forwarder can own; frames are base64 PCM.
    /// Frames queued while the connection is down are silently discarded.
    pub fn frame_sender(&self) -> mpsc::UnboundedSender<String> {
        self.frame_tx.clone()
    }

    /// Close the connection and join the worker; idempotent
    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_session(
    config: SessionConfig,
    event_tx: Sender<LiveEvent>,
    mut frame_rx: mpsc::UnboundedReceiver<String>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let url = protocol::endpoint_url(&config.api_key);

    let (ws, _) = match connect_async(&url).await {
        Ok(connection) => connection,
        Err(e) => {
            let _ = event_tx.send(LiveEvent::Error(format!("Connection failed: {}", e)));
            return;
        }
    };
    info!("Live connection established");

    let (mut sink, mut stream) = ws.split();

    let setup = protocol::ClientMessage::Setup(protocol::Setup::new(
        &config.model,
        &config.system_prompt,
    ));
    match serde_json::to_string(&setup) {
        Ok(json) => {
            if let Err(e) = sink.send(Message::text(json)).await {
                let _ = event_tx.send(LiveEvent::Error(format!("Setup send failed: {}", e)));
                return;
            }
        }
        Err(e) => {
            let _ = event_tx.send(LiveEvent::Error(format!("Setup encoding failed: {}", e)));
            return;
        }
    }

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    forward_server_message(text.as_bytes(), &event_tx);
                }
                // The service also delivers JSON envelopes as binary frames
                Some(Ok(Message::Binary(bytes))) => {
                    forward_server_message(&bytes, &event_tx);
                }
                Some(Ok(Message::Close(_))) | None => {
                    let _ = event_tx.send(LiveEvent::Closed);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = event_tx.send(LiveEvent::Error(format!("Connection error: {}", e)));
                    break;
                }
            },
            frame = frame_rx.recv() => match frame {
                Some(data) => {
                    let chunk = protocol::audio_chunk(data, config.input_sample_rate);
                    match serde_json::to_string(&chunk) {
                        Ok(json) => {
                            // Best-effort: a dropped frame is not retried.
                            if let Err(e) = sink.send(Message::text(json)).await {
                                debug!("Dropped outbound frame: {}", e);
                            }
                        }
                        Err(e) => debug!("Dropped unencodable frame: {}", e),
                    }
                }
                None => break,
            },
            _ = &mut shutdown_rx => {
                // Close errors are ignored; the session is over either way.
                let _ = sink.send(Message::Close(None)).await;
                let _ = event_tx.send(LiveEvent::Closed);
                break;
            }
        }
    }

    info!("Live connection closed");
}

fn forward_server_message(raw: &[u8], event_tx: &Sender<LiveEvent>) {
    match serde_json::from_slice::<protocol::ServerMessage>(raw) {
        Ok(message) => {
            for event in protocol::live_events(&message) {
                let _ = event_tx.send(event);
            }
        }
        Err(e) => warn!("Unparseable server message: {}", e),
    }
}
