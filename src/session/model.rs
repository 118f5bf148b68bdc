//! Session and gaze-record data models.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::HighlightMode;

/// Row/column value recorded when a gaze point cannot be resolved to a text
/// position. The record is still emitted; the sentinel marks the failed
/// mapping.
pub const UNRESOLVED_ROW_COLUMN: i64 = -100;

/// One bounded recording interval between a `session_start` and
/// `session_end` command.
///
/// `language`, `font_size` and `line_height` are snapshotted at construction.
/// They refresh on every gaze sample for the record being assembled, but the
/// session-level values are informational only and never re-validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Protocol-supplied identifier, not generated locally.
    pub session_id: String,
    pub output_dir: PathBuf,
    /// Opaque timestamp string from the core; derives the output name.
    pub start_timestamp: String,
    pub highlight_mode: HighlightMode,
    pub active: bool,
    pub language: String,
    pub font_size: f64,
    pub line_height: f64,
    pub started_at: DateTime<Utc>,
}

/// One enriched gaze sample, immutable once assembled and handed straight to
/// the sink.
///
/// `x` and `y` keep the raw trimmed feed values; the parsed coordinates only
/// exist transiently inside the mapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GazeRecord {
    /// May be empty; the feed does not guarantee event identifiers.
    pub event_id: String,
    pub x: String,
    pub y: String,
    pub row: i64,
    pub column: i64,
    pub filename: String,
    pub language: String,
    pub font_size: f64,
    pub line_height: f64,
    /// Monotonic receive timestamp in epoch milliseconds, captured when the
    /// chunk arrived — not the device timestamp.
    pub plugin_time_ms: i64,
    /// Empty when no token resolves at the mapped position.
    pub word: String,
}
