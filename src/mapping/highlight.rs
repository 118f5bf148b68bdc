//! On-screen highlight tracking the current gaze position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::host::{DocumentContext, MarkerId, Position, TextRange};

use super::WordLocator;

/// What, if anything, gets highlighted for each gaze sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HighlightMode {
    Off,
    /// Highlight the whole token under the gaze.
    Word,
    /// Highlight a single-column cell at the gaze position, independent of
    /// word boundaries.
    Mesh,
}

impl Default for HighlightMode {
    fn default() -> Self {
        HighlightMode::Off
    }
}

/// Owns the one highlight marker a session keeps on screen.
///
/// Clearing is deliberately a destroy/recreate cycle rather than an in-place
/// hide: the marker handle changes every time the highlight resets, matching
/// the original client's observable behavior.
pub struct HighlightController {
    document: Arc<dyn DocumentContext>,
    locator: WordLocator,
    marker: MarkerId,
}

impl HighlightController {
    pub fn new(document: Arc<dyn DocumentContext>, locator: WordLocator) -> Self {
        let marker = document.create_marker(&document.current_word_range());
        Self {
            document,
            locator,
            marker,
        }
    }

    /// Update the highlight for one gaze sample. An unresolved position or
    /// mode `Off` clears it.
    pub fn apply(&mut self, position: Option<&Position>, mode: HighlightMode) {
        match (position, mode) {
            (None, _) | (_, HighlightMode::Off) => self.reset_marker(),
            (Some(position), HighlightMode::Word) => {
                if let Some(word) = self.locator.word_at(position) {
                    self.document.move_marker(self.marker, &word.range);
                }
            }
            (Some(position), HighlightMode::Mesh) => {
                let range = TextRange::single_column(position);
                self.document.move_marker(self.marker, &range);
            }
        }
    }

    fn reset_marker(&mut self) {
        self.document.destroy_marker(self.marker);
        self.marker = self.document.create_marker(&self.document.current_word_range());
    }

    /// Current marker handle; changes whenever the highlight resets.
    pub fn marker(&self) -> MarkerId {
        self.marker
    }
}
