//! Session lifecycle and gaze-record assembly.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::BridgeConfig;
use crate::host::{DisplayMetrics, DocumentContext};
use crate::mapping::{CoordinateMapper, HighlightController, HighlightMode, WordLocator};
use crate::sink::{RecordSink, SinkFactory, SinkSpec};

use super::model::{GazeRecord, Session, UNRESOLVED_ROW_COLUMN};

struct ActiveSession {
    session: Session,
    mapper: CoordinateMapper,
    locator: WordLocator,
    highlight: HighlightController,
    writer_tx: mpsc::UnboundedSender<GazeRecord>,
    writer: JoinHandle<Option<PathBuf>>,
}

/// Owns the at-most-one active logging session.
///
/// Records are queued to a spawned writer task, so a slow sink never stalls
/// the caller; nothing in `log_point` can fail past this boundary — every
/// mapper or locator failure degrades to sentinel values and the record is
/// still emitted.
#[derive(Clone)]
pub struct SessionController {
    document: Arc<dyn DocumentContext>,
    display: Arc<dyn DisplayMetrics>,
    sinks: Arc<dyn SinkFactory>,
    config: BridgeConfig,
    inner: Arc<Mutex<Option<ActiveSession>>>,
}

impl SessionController {
    pub fn new(
        document: Arc<dyn DocumentContext>,
        display: Arc<dyn DisplayMetrics>,
        sinks: Arc<dyn SinkFactory>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            document,
            display,
            sinks,
            config,
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Begin a session: snapshot document state, open the sink, spawn the
    /// record writer. Rejects a start while another session is active.
    pub async fn start_session(
        &self,
        output_dir: &str,
        timestamp: &str,
        session_id: &str,
        highlight_mode: HighlightMode,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.is_some() {
            bail!("logging session already active");
        }

        let display = self.display.primary_display();
        let spec = SinkSpec {
            output_dir: PathBuf::from(output_dir),
            timestamp: timestamp.to_string(),
            session_id: session_id.to_string(),
            display_width_px: display.bounds_width * display.scale_factor,
            display_height_px: display.bounds_height * display.scale_factor,
        };
        let sink = self
            .sinks
            .open(&spec)
            .context("failed to open record sink")?;

        let session = Session {
            session_id: session_id.to_string(),
            output_dir: spec.output_dir,
            start_timestamp: timestamp.to_string(),
            highlight_mode,
            active: true,
            language: self.document.active_language(),
            font_size: self.document.active_font_width(),
            line_height: self.document.active_line_height(),
            started_at: Utc::now(),
        };

        let mapper = CoordinateMapper::new(
            self.display.clone(),
            self.document.clone(),
            self.config.fixed_border_px,
        );
        let locator = WordLocator::new(self.document.clone(), self.config.word_scan_limit);
        let highlight = HighlightController::new(
            self.document.clone(),
            WordLocator::new(self.document.clone(), self.config.word_scan_limit),
        );

        let (writer_tx, writer_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(writer_loop(sink, writer_rx));

        info!("logging session {} started", session.session_id);
        *inner = Some(ActiveSession {
            session,
            mapper,
            locator,
            highlight,
            writer_tx,
            writer,
        });
        Ok(())
    }

    pub async fn is_active(&self) -> bool {
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|active| active.session.active)
            .unwrap_or(false)
    }

    /// Enrich one gaze sample and queue the record. No-op when no session is
    /// active; never returns an error.
    pub async fn log_point(&self, x: &str, y: &str, event_id: &str, received_ms: i64) {
        let mut inner = self.inner.lock().await;
        let Some(active) = inner.as_mut() else {
            return;
        };
        if !active.session.active {
            return;
        }

        // Informational refresh; session validity is never re-checked against
        // these.
        active.session.language = self.document.active_language();
        active.session.font_size = self.document.active_font_width();
        active.session.line_height = self.document.active_line_height();

        let parsed = x.parse::<f64>().ok().zip(y.parse::<f64>().ok());
        let position = parsed.and_then(|(px, py)| active.mapper.map_point(px, py));

        let word = position
            .as_ref()
            .and_then(|p| active.locator.word_at(p))
            .map(|span| span.value)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_default();

        active
            .highlight
            .apply(position.as_ref(), active.session.highlight_mode);

        let (row, column) = position
            .map(|p| (p.row, p.column))
            .unwrap_or((UNRESOLVED_ROW_COLUMN, UNRESOLVED_ROW_COLUMN));

        let record = GazeRecord {
            event_id: event_id.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            row,
            column,
            filename: self.document.active_file_base_name(),
            language: active.session.language.clone(),
            font_size: active.session.font_size,
            line_height: active.session.line_height,
            plugin_time_ms: received_ms,
            word,
        };

        if active.writer_tx.send(record).is_err() {
            warn!(
                "record writer for session {} is gone; dropping gaze sample",
                active.session.session_id
            );
        }
    }

    /// End the active session, flushing and closing its sink. Safe to call
    /// with no session active; a sink failure is logged and yields `None`
    /// rather than an error.
    pub async fn end_session(&self) -> Option<PathBuf> {
        let taken = self.inner.lock().await.take();
        let mut active = taken?;
        active.session.active = false;

        let ActiveSession {
            session,
            writer_tx,
            writer,
            ..
        } = active;

        // Closing the channel drains the queue and closes the sink.
        drop(writer_tx);
        match writer.await {
            Ok(Some(path)) => {
                info!(
                    "logging session {} closed -> {}",
                    session.session_id,
                    path.display()
                );
                Some(path)
            }
            Ok(None) => None,
            Err(err) => {
                error!("record writer task failed to join: {err}");
                None
            }
        }
    }
}

async fn writer_loop(
    mut sink: Box<dyn RecordSink>,
    mut records: mpsc::UnboundedReceiver<GazeRecord>,
) -> Option<PathBuf> {
    while let Some(record) = records.recv().await {
        if let Err(err) = sink.write(&record) {
            error!("failed to persist gaze record: {err:?}");
        }
    }
    match sink.close() {
        Ok(path) => Some(path),
        Err(err) => {
            error!("failed to close gaze log: {err:?}");
            None
        }
    }
}
