//! Row height estimation
//!
//! Heights are predicted before a row is drawn so that every cell of the row
//! can be painted at the same final height. Nested tables are measured by
//! simulating their rows with the reduced nested font.

use crate::canvas::{Canvas, CanvasGuard};
use crate::constants::*;
use crate::layout::Grid;
use crate::nested::nested_font_size;
use crate::span::{Slot, SpanTracker, plan_row};
use crate::table::Table;
use crate::value::Row;
use tracing::trace;

/// Row height for a table: the configured height, or one derived from the
/// current font size when none is configured
pub fn base_row_height(configured: f64, font_size: f64) -> f64 {
    if configured > 0.0 {
        configured
    } else {
        font_size * ROW_HEIGHT_FACTOR
    }
}

/// Whether text of `text_width` must be wrapped in a cell offering `usable`
pub fn needs_wrap(text_width: f64, usable: f64, max_width: Option<f64>) -> bool {
    text_width > usable || max_width.is_some_and(|max| text_width > max)
}

/// Estimated line count for wrapped text, between one and the line cap.
///
/// The count is padded by [`WRAP_ESTIMATE_FACTOR`] to cover word breaks; text
/// needing more than [`MAX_WRAPPED_LINES`] lines is clipped instead of
/// growing the row further.
pub fn estimate_wrapped_lines(text_width: f64, usable: f64) -> f64 {
    if usable <= 0.0 {
        return MAX_WRAPPED_LINES;
    }
    let raw = (text_width / usable * WRAP_ESTIMATE_FACTOR).ceil();
    if raw.is_nan() {
        1.0
    } else {
        raw.clamp(1.0, MAX_WRAPPED_LINES)
    }
}

/// Final height of a planned row: the largest of the base height, the
/// tallest nested table and the tallest wrapped text.
///
/// Nested tables in cells that span rows do not count towards this row.
pub(crate) fn estimate_row_height(
    canvas: &mut dyn Canvas,
    grid: &Grid<'_>,
    slots: &[Slot],
    row: &Row,
    base: f64,
) -> f64 {
    let mut nested_max: f64 = 0.0;
    let mut wrapped_max: f64 = 0.0;

    for slot in slots {
        let Slot::Cell {
            column,
            row_span,
            width,
            ..
        } = *slot
        else {
            continue;
        };
        let column = &grid.columns[column];

        if let Some(child) = row.nested(&column.key) {
            if row_span == 1 {
                let inner = width - 2.0 * NESTED_PADDING;
                let required = nested_table_height(canvas, child, inner) + 2.0 * NESTED_PADDING;
                nested_max = nested_max.max(required);
            }
            continue;
        }

        let text = row.text(&column.key);
        if text.is_empty() {
            continue;
        }
        let usable = width - CELL_WRAP_MARGIN;
        let text_width = canvas.string_width(&text);
        if needs_wrap(text_width, usable, column.effective_max_width()) {
            let lines = estimate_wrapped_lines(text_width, usable);
            if lines > 1.0 {
                wrapped_max = wrapped_max.max(base * lines);
            }
        }
    }

    let height = base.max(nested_max).max(wrapped_max);
    trace!(
        "Row height {} (base {}, nested {}, wrapped {})",
        height, base, nested_max, wrapped_max
    );
    height
}

/// Height a child table needs when rendered into a cell `available_width`
/// wide: its rows at the nested font size plus the spacing between them,
/// and never less than one row.
pub(crate) fn nested_table_height(
    canvas: &mut dyn Canvas,
    child: &Table,
    available_width: f64,
) -> f64 {
    let mut guard = CanvasGuard::new(canvas);
    let parent_size = guard.font_size();
    guard.set_font_size(nested_font_size(parent_size));
    child.data_style().apply(&mut *guard);
    let base = base_row_height(child.row_height(), guard.font_size());

    let rows = child.stored_rows();
    if rows.is_empty() {
        return base;
    }

    let grid = Grid::fitted(child.columns(), available_width);
    let mut spans = SpanTracker::new();
    let mut total = 0.0;
    for (ordinal, row) in rows.iter().enumerate() {
        let slots = plan_row(&grid, row, &mut spans, ordinal);
        total += estimate_row_height(&mut *guard, &grid, &slots, row, base);
    }
    total += child.spacing() * (rows.len() - 1) as f64;

    trace!(
        "Nested table of {} rows needs {} at width {}",
        rows.len(),
        total,
        available_width
    );
    total.max(base)
}
