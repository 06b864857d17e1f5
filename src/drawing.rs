//! Cell drawing for one table row

use crate::canvas::{Canvas, RectMode};
use crate::constants::*;
use crate::height::needs_wrap;
use crate::layout::Grid;
use crate::nested::render_nested;
use crate::span::Slot;
use crate::style::{Alignment, Border, CellStyle};
use crate::value::Row;
use tracing::trace;

/// Vertical measurements shared by every cell of a row
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowMetrics {
    /// Unadjusted row height; row spans and wrapped line pitch use it
    pub base: f64,
    /// Final height of this row
    pub height: f64,
    pub spacing: f64,
    pub fill: bool,
}

impl RowMetrics {
    /// Height of a cell spanning `span` rows, measured on the base grid
    pub fn span_height(&self, span: usize) -> f64 {
        if span > 1 {
            self.base * span as f64 + self.spacing * (span - 1) as f64
        } else {
            self.height
        }
    }
}

/// Stroke the requested edges of a rectangle
pub(crate) fn draw_border(
    canvas: &mut dyn Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    border: Border,
) {
    if border.is_all() {
        canvas.rect(x, y, width, height, RectMode::Stroke);
        return;
    }
    if border.left {
        canvas.line(x, y, x, y + height);
    }
    if border.top {
        canvas.line(x, y, x + width, y);
    }
    if border.right {
        canvas.line(x + width, y, x + width, y + height);
    }
    if border.bottom {
        canvas.line(x, y + height, x + width, y + height);
    }
}

/// Only the vertical edges of `border`, for cells continuing a row span
fn continuation_border(border: Border) -> Border {
    Border {
        left: border.left,
        right: border.right,
        ..Border::NONE
    }
}

/// Draw every slot of a planned row starting at the cursor.
///
/// The cursor ends at the right edge of the row on the same Y; moving down
/// is left to the caller.
pub(crate) fn draw_row(
    canvas: &mut dyn Canvas,
    grid: &Grid<'_>,
    slots: &[Slot],
    row: &Row,
    metrics: &RowMetrics,
    style: &CellStyle,
) {
    let y = canvas.y();
    let mut x = canvas.x();

    for slot in slots {
        canvas.set_xy(x, y);
        match *slot {
            Slot::Continuation { width, .. } => {
                canvas.cell(
                    width,
                    metrics.height,
                    "",
                    continuation_border(style.border),
                    Alignment::Left,
                    false,
                );
            }
            Slot::Cell {
                column,
                row_span,
                width,
                ..
            } => {
                let column = &grid.columns[column];
                let align = row
                    .align(&column.key)
                    .or(style.align)
                    .unwrap_or(column.align);
                let height = metrics.span_height(row_span);

                if let Some(child) = row.nested(&column.key) {
                    if metrics.fill {
                        canvas.rect(x, y, width, height, RectMode::Fill);
                    }
                    if !style.border.is_none() {
                        draw_border(canvas, x, y, width, height, style.border);
                    }
                    render_nested(
                        canvas,
                        child,
                        x + NESTED_PADDING,
                        y + NESTED_PADDING,
                        width - 2.0 * NESTED_PADDING,
                        height - 2.0 * NESTED_PADDING,
                    );
                } else {
                    let text = row.text(&column.key);
                    let text_width = canvas.string_width(&text);
                    let usable = width - CELL_WRAP_MARGIN;
                    if !text.is_empty()
                        && needs_wrap(text_width, usable, column.effective_max_width())
                    {
                        draw_wrapped(canvas, x, y, width, height, &text, align, metrics, style);
                    } else {
                        canvas.cell(width, height, &text, style.border, align, metrics.fill);
                    }
                }
            }
        }
        x += slot.width();
    }

    canvas.set_xy(x, y);
    trace!("Drew {} slots at y={}", slots.len(), y);
}

/// Paint fill and border at the full cell height, then the wrapped text
/// inside the padded cell. Lines beyond the cell are clipped.
#[allow(clippy::too_many_arguments)]
fn draw_wrapped(
    canvas: &mut dyn Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: &str,
    align: Alignment,
    metrics: &RowMetrics,
    style: &CellStyle,
) {
    if metrics.fill {
        canvas.rect(x, y, width, height, RectMode::Fill);
    }
    if !style.border.is_none() {
        draw_border(canvas, x, y, width, height, style.border);
    }

    canvas.clip_rect(x, y, width, height);
    canvas.set_xy(x + WRAPPED_TEXT_PADDING, y + WRAPPED_TEXT_PADDING);
    canvas.multi_cell(
        width - 2.0 * WRAPPED_TEXT_PADDING,
        metrics.base,
        text,
        Border::NONE,
        align,
        false,
    );
    canvas.clip_end();
    canvas.set_xy(x + width, y);
}
