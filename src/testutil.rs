//! Shared fakes for exercising the pipeline without a real editor, display,
//! socket peer, or output file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::host::{
    DisplayInfo, DisplayMetrics, DocumentContext, MarkerId, PointTarget, Position, TextRange,
};
use crate::notify::Notifier;
use crate::session::GazeRecord;
use crate::sink::{RecordSink, SinkFactory, SinkSpec};

/// 1920x1080 display with a 1912x1072 work area: 16px of overscan per axis
/// once the 8px fixed border is added.
pub(crate) struct FakeDisplay {
    pub info: DisplayInfo,
}

impl Default for FakeDisplay {
    fn default() -> Self {
        Self {
            info: DisplayInfo {
                bounds_width: 1920.0,
                bounds_height: 1080.0,
                work_area_width: 1912.0,
                work_area_height: 1072.0,
                scale_factor: 2.0,
            },
        }
    }
}

impl DisplayMetrics for FakeDisplay {
    fn primary_display(&self) -> DisplayInfo {
        self.info
    }
}

/// In-memory document: 56px line height, 8px columns, a 20px dock and one
/// 34px gutter. Screen rows map straight onto buffer rows.
pub(crate) struct FakeDocument {
    lines: Vec<String>,
    font_width: Mutex<f64>,
    scroll_left: Mutex<f64>,
    forced_target: Mutex<Option<PointTarget>>,
    markers: Mutex<HashMap<MarkerId, TextRange>>,
}

impl FakeDocument {
    pub fn with_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            font_width: Mutex::new(8.0),
            scroll_left: Mutex::new(0.0),
            forced_target: Mutex::new(None),
            markers: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_font_width(&self, width: f64) {
        *self.font_width.lock().unwrap() = width;
    }

    pub fn set_scroll_left(&self, offset: f64) {
        *self.scroll_left.lock().unwrap() = offset;
    }

    /// Make every point resolve to `target`, regardless of geometry.
    pub fn force_target(&self, target: PointTarget) {
        *self.forced_target.lock().unwrap() = Some(target);
    }

    pub fn marker_range(&self, marker: MarkerId) -> Option<TextRange> {
        self.markers.lock().unwrap().get(&marker).copied()
    }

    pub fn marker_ranges(&self) -> Vec<TextRange> {
        self.markers.lock().unwrap().values().copied().collect()
    }
}

impl DocumentContext for FakeDocument {
    fn active_language(&self) -> String {
        "Rust".into()
    }

    fn active_font_width(&self) -> f64 {
        *self.font_width.lock().unwrap()
    }

    fn active_line_height(&self) -> f64 {
        56.0
    }

    fn scroll_offset_left(&self) -> f64 {
        *self.scroll_left.lock().unwrap()
    }

    fn gutter_widths(&self) -> Vec<f64> {
        vec![34.0]
    }

    fn left_dock_width(&self) -> f64 {
        20.0
    }

    fn active_file_base_name(&self) -> String {
        "main.rs".into()
    }

    fn text_in_range(&self, range: &TextRange) -> String {
        let row = range.start.row;
        if row < 0 || row as usize >= self.lines.len() {
            return String::new();
        }
        let line = &self.lines[row as usize];
        let len = line.chars().count() as i64;
        let start = range.start.column.clamp(0, len);
        let end = range.end.column.clamp(0, len);
        if end <= start {
            return String::new();
        }
        line.chars()
            .skip(start as usize)
            .take((end - start) as usize)
            .collect()
    }

    fn current_word_range(&self) -> TextRange {
        TextRange {
            start: Position { row: 0, column: 0 },
            end: Position { row: 0, column: 0 },
        }
    }

    fn element_at_point(&self, x: f64, y: f64) -> PointTarget {
        if let Some(target) = *self.forced_target.lock().unwrap() {
            return target;
        }
        if x < 0.0 || y < 0.0 {
            return PointTarget::Outside;
        }
        let row = (y / self.active_line_height()).floor() as usize;
        if row >= self.lines.len() {
            return PointTarget::Outside;
        }
        PointTarget::TextLine { row: row as u32 }
    }

    fn create_marker(&self, range: &TextRange) -> MarkerId {
        let id = MarkerId::new();
        self.markers.lock().unwrap().insert(id, *range);
        id
    }

    fn move_marker(&self, marker: MarkerId, range: &TextRange) {
        if let Some(entry) = self.markers.lock().unwrap().get_mut(&marker) {
            *entry = *range;
        }
    }

    fn destroy_marker(&self, marker: MarkerId) {
        self.markers.lock().unwrap().remove(&marker);
    }
}

#[derive(Default)]
struct MemorySinkState {
    records: Vec<GazeRecord>,
    close_calls: usize,
    fail_writes: bool,
    fail_close: bool,
}

/// Sink factory whose sinks share one observable in-memory state.
#[derive(Default)]
pub(crate) struct MemorySinkFactory {
    state: std::sync::Arc<Mutex<MemorySinkState>>,
    last_spec: Mutex<Option<SinkSpec>>,
}

impl MemorySinkFactory {
    pub fn records(&self) -> Vec<GazeRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_close(&self, fail: bool) {
        self.state.lock().unwrap().fail_close = fail;
    }

    pub fn last_spec(&self) -> Option<SinkSpec> {
        self.last_spec.lock().unwrap().clone()
    }
}

impl SinkFactory for MemorySinkFactory {
    fn open(&self, spec: &SinkSpec) -> Result<Box<dyn RecordSink>> {
        *self.last_spec.lock().unwrap() = Some(spec.clone());
        Ok(Box::new(MemorySink {
            state: self.state.clone(),
            path: spec.output_dir.join(format!("memory-{}.jsonl", spec.timestamp)),
        }))
    }
}

struct MemorySink {
    state: std::sync::Arc<Mutex<MemorySinkState>>,
    path: PathBuf,
}

impl RecordSink for MemorySink {
    fn write(&mut self, record: &GazeRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            bail!("simulated write failure");
        }
        state.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<PathBuf> {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        if state.fail_close {
            bail!("simulated close failure");
        }
        Ok(self.path.clone())
    }
}

/// Notifier that records every message per level.
#[derive(Default)]
pub(crate) struct CapturingNotifier {
    infos: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CapturingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for CapturingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
