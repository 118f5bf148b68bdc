//! Screen-pixel to document row/column mapping.

use std::sync::Arc;

use crate::host::{DisplayMetrics, DocumentContext, PointTarget, Position};

/// Maps a raw screen point from the gaze feed onto the text grid of the
/// active buffer. Deterministic: the same point against the same display and
/// document metrics always yields the same answer.
pub struct CoordinateMapper {
    display: Arc<dyn DisplayMetrics>,
    document: Arc<dyn DocumentContext>,
    fixed_border_px: f64,
}

impl CoordinateMapper {
    pub fn new(
        display: Arc<dyn DisplayMetrics>,
        document: Arc<dyn DocumentContext>,
        fixed_border_px: f64,
    ) -> Self {
        Self {
            display,
            document,
            fixed_border_px,
        }
    }

    /// Resolve a screen point, or `None` when the point lands on nothing the
    /// editor can attribute to a line (outside the window, over chrome, over
    /// the gutter).
    pub fn map_point(&self, x: f64, y: f64) -> Option<Position> {
        let display = self.display.primary_display();

        // Work-area metrics omit host chrome; the bounds/work-area delta plus
        // a fixed border recovers the true inset per axis.
        let overscan_x = display.bounds_width - display.work_area_width + self.fixed_border_px;
        let overscan_y = display.bounds_height - display.work_area_height + self.fixed_border_px;

        let adjusted_x = x - overscan_x;
        let adjusted_y = y - overscan_y;

        let row = match self.document.element_at_point(adjusted_x, adjusted_y) {
            PointTarget::TextLine { row } => row,
            PointTarget::Syntax { line_row } => line_row?,
            PointTarget::Outside => return None,
        };

        let column_width = self.document.active_font_width();
        if column_width <= 0.0 {
            return None;
        }

        // Every fixed-width decoration left of column 0 comes off before
        // dividing by column width.
        let offset_x = self.document.left_dock_width()
            + self.document.gutter_widths().iter().sum::<f64>();

        let column = ((adjusted_x - offset_x + self.document.scroll_offset_left()) / column_width)
            .floor() as i64;
        if column < 0 {
            return None;
        }

        Some(Position {
            row: i64::from(row),
            column,
        })
    }
}
