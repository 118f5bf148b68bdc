//! Record persistence behind a narrow sink interface.
//!
//! The pipeline hands each finished [`GazeRecord`] to a sink and never looks
//! at it again. The bundled [`JsonLinesSink`] is a convenience
//! implementation; the persisted format is otherwise outside this crate's
//! contract.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::session::GazeRecord;

/// Everything a sink needs to open an output for one session.
#[derive(Debug, Clone)]
pub struct SinkSpec {
    pub output_dir: PathBuf,
    /// Opaque timestamp string from the `session_start` command; derives the
    /// output name.
    pub timestamp: String,
    pub session_id: String,
    pub display_width_px: f64,
    pub display_height_px: f64,
}

/// Durably persists one record at a time for a single session.
pub trait RecordSink: Send {
    fn write(&mut self, record: &GazeRecord) -> Result<()>;
    /// Finish the stream and return where it was written.
    fn close(&mut self) -> Result<PathBuf>;
}

/// Opens a fresh sink per session.
pub trait SinkFactory: Send + Sync {
    fn open(&self, spec: &SinkSpec) -> Result<Box<dyn RecordSink>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionHeader<'a> {
    session_id: &'a str,
    timestamp: &'a str,
    display_width_px: f64,
    display_height_px: f64,
}

/// JSON-lines sink: a session-header object on the first line, then one
/// record object per line, written to
/// `<output_dir>/gaze_bridge-<timestamp>.jsonl`.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn open(spec: &SinkSpec) -> Result<Self> {
        let path = spec
            .output_dir
            .join(format!("gaze_bridge-{}.jsonl", spec.timestamp));
        let file = File::create(&path)
            .with_context(|| format!("failed to create gaze log at {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        let header = SessionHeader {
            session_id: &spec.session_id,
            timestamp: &spec.timestamp,
            display_width_px: spec.display_width_px,
            display_height_px: spec.display_height_px,
        };
        write_line(&mut writer, &header, &path)?;

        Ok(Self {
            path,
            writer: Some(writer),
        })
    }
}

fn write_line<T: Serialize>(writer: &mut BufWriter<File>, value: &T, path: &Path) -> Result<()> {
    let line = serde_json::to_string(value)?;
    writer
        .write_all(line.as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .with_context(|| format!("failed to write gaze log at {}", path.display()))
}

impl RecordSink for JsonLinesSink {
    fn write(&mut self, record: &GazeRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .context("gaze log already closed")?;
        write_line(writer, record, &self.path)
    }

    fn close(&mut self) -> Result<PathBuf> {
        let mut writer = self.writer.take().context("gaze log already closed")?;
        writer
            .flush()
            .with_context(|| format!("failed to flush gaze log at {}", self.path.display()))?;
        Ok(self.path.clone())
    }
}

/// Factory for the bundled JSON-lines sink.
pub struct JsonLinesSinkFactory;

impl SinkFactory for JsonLinesSinkFactory {
    fn open(&self, spec: &SinkSpec) -> Result<Box<dyn RecordSink>> {
        Ok(Box::new(JsonLinesSink::open(spec)?))
    }
}
