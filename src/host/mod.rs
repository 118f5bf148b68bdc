//! Capability interfaces onto the host editor and display environment.
//!
//! The core never talks to a concrete editor; everything it needs — buffer
//! metadata, text reads, point-to-element resolution, highlight markers,
//! display geometry — comes through these two narrow traits so the pipeline
//! can be exercised against fakes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text-grid coordinate. Rows and columns are non-negative whenever they
/// refer to a resolved location; the word scan uses signed math internally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub row: i64,
    pub column: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// One-column range at `position`, the shape both the word scan seed and
    /// the mesh highlight use.
    pub fn single_column(position: &Position) -> Self {
        Self {
            start: Position {
                row: position.row,
                column: position.column,
            },
            end: Position {
                row: position.row,
                column: position.column + 1,
            },
        }
    }
}

/// A lexical token and the exact range it occupies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordSpan {
    pub value: String,
    pub range: TextRange,
}

/// What the host resolved under an (already overscan-adjusted) screen point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTarget {
    /// A text-line container; the host knows its logical screen row directly.
    TextLine { row: u32 },
    /// Syntax or leading-whitespace content inside a line. The host reports
    /// the nearest enclosing line container's row, or `None` when there is no
    /// enclosing line.
    Syntax { line_row: Option<u32> },
    /// Anything else, including no element at all (gaze outside the window).
    Outside,
}

/// Handle of one highlight marker. Identity matters: clearing a highlight
/// destroys the marker and creates a fresh one, and callers can observe the
/// handle change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MarkerId(pub Uuid);

impl MarkerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary-display geometry as reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub bounds_width: f64,
    pub bounds_height: f64,
    pub work_area_width: f64,
    pub work_area_height: f64,
    pub scale_factor: f64,
}

/// Display metrics provider.
pub trait DisplayMetrics: Send + Sync {
    fn primary_display(&self) -> DisplayInfo;
}

/// Queries against the active buffer and its on-screen rendering.
///
/// Marker operations carry highlight decoration with them: `move_marker`
/// re-renders the marker as a highlight over the new range, so the pipeline
/// never issues a separate decorate call.
pub trait DocumentContext: Send + Sync {
    fn active_language(&self) -> String;
    /// Default (monospace) character width in pixels; doubles as the column
    /// width for coordinate mapping.
    fn active_font_width(&self) -> f64;
    fn active_line_height(&self) -> f64;
    fn scroll_offset_left(&self) -> f64;
    fn gutter_widths(&self) -> Vec<f64>;
    fn left_dock_width(&self) -> f64;
    fn active_file_base_name(&self) -> String;

    /// Text currently inside `range`. Out-of-bounds columns clip to the line;
    /// the result never spans rows.
    fn text_in_range(&self, range: &TextRange) -> String;

    /// Range of the word under the cursor, used to seed fresh markers.
    fn current_word_range(&self) -> TextRange;

    /// Resolve the UI element under an overscan-adjusted screen point.
    fn element_at_point(&self, x: f64, y: f64) -> PointTarget;

    fn create_marker(&self, range: &TextRange) -> MarkerId;
    fn move_marker(&self, marker: MarkerId, range: &TextRange);
    fn destroy_marker(&self, marker: MarkerId);
}
