//! Connection lifecycle and command routing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::BridgeConfig;
use crate::host::{DisplayMetrics, DocumentContext};
use crate::mapping::HighlightMode;
use crate::notify::Notifier;
use crate::protocol::{classify, Command, LineAssembler};
use crate::session::SessionController;
use crate::sink::SinkFactory;

use super::socket::{socket_worker, SocketEvent};
use super::state::ConnectionState;

struct SocketLink {
    generation: u64,
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

/// Owns the socket to the tracking core, the connection state machine, and
/// the routing of decoded commands into the session controller.
///
/// All socket activity funnels through one ordered event channel into
/// [`handle_event`](Self::handle_event), so state mutations follow
/// event-arrival order exactly: a gaze behind a `session_end` in the same
/// chunk is dropped, never attributed to the ended session.
#[derive(Clone)]
pub struct ConnectionManager {
    config: BridgeConfig,
    state: Arc<Mutex<ConnectionState>>,
    sessions: SessionController,
    highlight_mode: Arc<Mutex<HighlightMode>>,
    notifier: Arc<dyn Notifier>,
    link: Arc<Mutex<Option<SocketLink>>>,
    // Bumped on every connect and disconnect; events carrying an older
    // generation belong to a superseded attempt and are dropped.
    generation: Arc<AtomicU64>,
    assembler: Arc<Mutex<LineAssembler>>,
    connect_failed: Arc<Mutex<bool>>,
}

impl ConnectionManager {
    pub fn new(
        document: Arc<dyn DocumentContext>,
        display: Arc<dyn DisplayMetrics>,
        sinks: Arc<dyn SinkFactory>,
        notifier: Arc<dyn Notifier>,
        config: BridgeConfig,
    ) -> Self {
        let sessions = SessionController::new(document, display, sinks, config.clone());
        Self {
            config,
            state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
            sessions,
            highlight_mode: Arc::new(Mutex::new(HighlightMode::Off)),
            notifier,
            link: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            assembler: Arc::new(Mutex::new(LineAssembler::new())),
            connect_failed: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    /// Operator trigger: open the socket to the core and start pumping
    /// events. Fails when locked or already connected.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            match *state {
                ConnectionState::Locked => bail!("bridge is locked"),
                ConnectionState::Connecting
                | ConnectionState::Connected
                | ConnectionState::Started => bail!("already connected"),
                ConnectionState::Disconnected | ConnectionState::Stopped => {}
            }
            *state = ConnectionState::Connecting;
        }
        *self.connect_failed.lock().await = false;
        self.assembler.lock().await.reset();
        self.notifier.info("Connecting to tracking core...");

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let reader = tokio::spawn(socket_worker(
            self.config.endpoint(),
            cancel.clone(),
            events_tx,
        ));
        *self.link.lock().await = Some(SocketLink {
            generation,
            cancel,
            reader,
        });

        let manager = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                manager.handle_event_from(generation, event).await;
            }
        });
        Ok(())
    }

    /// Operator trigger: tear the socket down and force-terminate any active
    /// session. No further gaze records are emitted once this returns.
    pub async fn disconnect(&self) {
        // Invalidate anything still queued from the current attempt so a
        // follow-up connect is not stomped by its leftovers.
        self.generation.fetch_add(1, Ordering::SeqCst);
        let link = self.link.lock().await.take();
        if let Some(link) = link {
            link.cancel.cancel();
            let _ = link.reader.await;
        }
        if self.sessions.end_session().await.is_some() {
            self.notifier.warning("Stopped logging...");
        }
        *self.state.lock().await = ConnectionState::Disconnected;
        self.assembler.lock().await.reset();
    }

    /// Operator trigger: choose the highlight mode for the next session.
    pub async fn set_highlight_mode(&self, mode: HighlightMode) {
        *self.highlight_mode.lock().await = mode;
        match mode {
            HighlightMode::Word => self.notifier.success("Word highlight on"),
            HighlightMode::Mesh => self.notifier.success("Mesh highlight on"),
            HighlightMode::Off => self.notifier.success("Highlight off"),
        }
    }

    /// The state-machine transition function. One call per socket event, in
    /// arrival order. Events are taken as belonging to the current attempt.
    pub async fn handle_event(&self, event: SocketEvent) {
        let generation = self.generation.load(Ordering::SeqCst);
        self.handle_event_from(generation, event).await;
    }

    async fn handle_event_from(&self, generation: u64, event: SocketEvent) {
        if generation != self.generation.load(Ordering::SeqCst) {
            // A newer attempt owns the connection now.
            return;
        }
        match event {
            SocketEvent::Connected => {
                if !*self.connect_failed.lock().await {
                    *self.state.lock().await = ConnectionState::Connected;
                }
                self.assembler.lock().await.reset();
                self.notifier
                    .success("Connected to tracking core, listening for tracking start");
            }
            SocketEvent::Error(message) => {
                // Reported once per attempt; the subsequent Closed event
                // drives the state transition.
                let mut failed = self.connect_failed.lock().await;
                if !*failed {
                    *failed = true;
                    self.notifier
                        .error(&format!("Unable to reach the tracking core: {message}"));
                }
            }
            SocketEvent::Closed => {
                {
                    let mut link = self.link.lock().await;
                    match link.as_ref() {
                        // Only release a link this attempt still owns.
                        Some(current) if current.generation != generation => return,
                        Some(_) => {
                            link.take();
                        }
                        None => {}
                    }
                }
                self.stop_listening().await;
                *self.state.lock().await = ConnectionState::Disconnected;
                self.notifier.warning("Tracking core disconnected.");
            }
            SocketEvent::Data(chunk) => {
                let received_ms = Utc::now().timestamp_millis();
                if *self.state.lock().await == ConnectionState::Disconnected {
                    // Stragglers queued behind an explicit disconnect.
                    return;
                }
                let payloads = self.assembler.lock().await.push(&chunk);
                for payload in payloads {
                    self.dispatch(classify(&payload), received_ms).await;
                }
            }
        }
    }

    async fn dispatch(&self, command: Command, received_ms: i64) {
        match command {
            Command::SessionStart {
                session_id,
                timestamp,
                data_root,
            } => {
                let mode = *self.highlight_mode.lock().await;
                match self
                    .sessions
                    .start_session(&data_root, &timestamp, &session_id, mode)
                    .await
                {
                    Ok(()) => {
                        *self.state.lock().await = ConnectionState::Started;
                        self.notifier.success("Logging started by tracking core.");
                    }
                    Err(err) => self
                        .notifier
                        .error(&format!("Failed to start logging session: {err:#}")),
                }
            }
            Command::SessionEnd => {
                self.notifier.info("Logging ended by tracking core.");
                self.stop_listening().await;
                // Closing the socket drives the machine on to Disconnected
                // through the worker's final Closed event.
                if let Some(link) = self.link.lock().await.as_ref() {
                    link.cancel.cancel();
                }
            }
            Command::Gaze { event_id, x, y } => {
                // Samples outside an active session are dropped silently; the
                // session controller is never asked to log for an absent
                // session.
                if self.sessions.is_active().await {
                    self.sessions.log_point(&x, &y, &event_id, received_ms).await;
                }
            }
            Command::Unknown => {}
        }
    }

    async fn stop_listening(&self) {
        if self.sessions.is_active().await {
            self.notifier.warning("Stopped logging...");
            self.sessions.end_session().await;
        }
        *self.state.lock().await = ConnectionState::Stopped;
    }
}
