//! Word-boundary search around a resolved text position.

use std::sync::Arc;

use crate::host::{DocumentContext, Position, TextRange, WordSpan};

/// Characters that end a token: whitespace plus the punctuation and operator
/// set the original tracer treated as word boundaries.
const NON_WORD_CHARS: [char; 33] = [
    ' ', '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '-', '=', '+', '[', ']', '{',
    '}', '|', ';', '<', ',', '.', '>', '/', '?', ':', '`', '"', '\'', '\\',
];

fn contains_delimiter(text: &str) -> bool {
    text.chars().any(|c| NON_WORD_CHARS.contains(&c))
}

/// Expands a single position into the enclosing lexical token by re-reading
/// ever larger ranges from the document.
pub struct WordLocator {
    document: Arc<dyn DocumentContext>,
    /// Per-direction scan cap. Defends against pathological lines with no
    /// delimiter at all; on overrun the affected boundary truncates to one
    /// column past the origin instead of erroring.
    scan_limit: u32,
}

impl WordLocator {
    pub fn new(document: Arc<dyn DocumentContext>, scan_limit: u32) -> Self {
        Self {
            document,
            scan_limit,
        }
    }

    /// The token spanning `position`, or `None` when the position sits on a
    /// lone space. A non-space delimiter is its own single-character token,
    /// never merged with its neighbors.
    pub fn word_at(&self, position: &Position) -> Option<WordSpan> {
        let mut range = TextRange::single_column(position);
        let mut text = self.document.text_in_range(&range);

        let mut chars = text.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            if NON_WORD_CHARS.contains(&only) {
                if only == ' ' {
                    return None;
                }
                return Some(WordSpan { value: text, range });
            }
        }

        // Walk the end rightward until a delimiter enters the window, then
        // step back off it.
        let mut steps = 0u32;
        while !contains_delimiter(&text) {
            range.end.column += 1;
            text = self.document.text_in_range(&range);
            steps += 1;
            if steps > self.scan_limit {
                range.end.column = position.column + 1;
                break;
            }
        }
        range.end.column -= 1;
        text = self.document.text_in_range(&range);

        // Same walk for the start, stopping at column 0.
        let mut steps = 0u32;
        while !contains_delimiter(&text) {
            range.start.column -= 1;
            if range.start.column == -1 {
                break;
            }
            text = self.document.text_in_range(&range);
            steps += 1;
            if steps > self.scan_limit {
                range.start.column = position.column - 1;
                break;
            }
        }
        range.start.column += 1;
        text = self.document.text_in_range(&range);

        Some(WordSpan { value: text, range })
    }
}
