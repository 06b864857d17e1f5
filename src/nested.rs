//! Tables rendered inside a parent table's cell
//!
//! A child table is drawn from its buffered rows at an absolute origin, at a
//! reduced font size, clipped to the cell. The child is never modified: its
//! columns are fitted into a local [`Grid`] and its spans are tracked in a
//! fresh [`SpanTracker`] for every placement. All canvas state the render
//! touches is restored by a [`CanvasGuard`] on every exit path.

use crate::canvas::{Canvas, CanvasGuard};
use crate::constants::{NESTED_FONT_SCALE, NESTED_MIN_FONT_SIZE};
use crate::drawing::{RowMetrics, draw_row};
use crate::height::{base_row_height, estimate_row_height};
use crate::layout::Grid;
use crate::span::{SpanTracker, plan_row};
use crate::table::Table;
use tracing::{debug, trace};

/// Font size for a nested table inside a parent drawn at `parent_size`
pub fn nested_font_size(parent_size: f64) -> f64 {
    (parent_size * NESTED_FONT_SCALE).max(NESTED_MIN_FONT_SIZE)
}

/// Draw `child`'s buffered rows with their top-left corner at `(x, y)`,
/// inside a `max_width` x `max_height` box.
///
/// Rows that would start below the box are skipped; anything else that
/// overflows is clipped. Never adds a page. The parent's cursor, font and
/// page-break setting are unchanged afterwards.
pub(crate) fn render_nested(
    canvas: &mut dyn Canvas,
    child: &Table,
    x: f64,
    y: f64,
    max_width: f64,
    max_height: f64,
) {
    let rows = child.stored_rows();
    if rows.is_empty() {
        return;
    }

    let mut guard = CanvasGuard::new(canvas);
    let (_, break_margin) = guard.auto_page_break();
    guard.set_auto_page_break(false, break_margin);
    let font_size = nested_font_size(guard.saved().font_size);
    guard.set_font_size(font_size);
    guard.clip_to(x, y, max_width, max_height);

    let grid = Grid::fitted(child.columns(), max_width);
    let mut spans = SpanTracker::new();
    let bottom = y + max_height;
    let mut current_y = y;
    let mut drawn = 0;

    debug!(
        "Nested table of {} rows at ({}, {}) in {}x{}",
        rows.len(),
        x,
        y,
        max_width,
        max_height
    );

    for (ordinal, row) in rows.iter().enumerate() {
        child.data_style().apply(&mut *guard);
        let base = base_row_height(child.row_height(), guard.font_size());
        if current_y + base > bottom {
            trace!("Nested row {} starts below the cell; stopping", ordinal);
            break;
        }

        guard.set_xy(x, current_y);
        let slots = plan_row(&grid, row, &mut spans, ordinal);
        let height = estimate_row_height(&mut *guard, &grid, &slots, row, base);
        let fill = child.row_fill(ordinal);
        if let Some(color) = fill {
            guard.set_fill_color(color);
        }
        let metrics = RowMetrics {
            base,
            height,
            spacing: child.spacing(),
            fill: fill.is_some(),
        };
        draw_row(&mut *guard, &grid, &slots, row, &metrics, child.data_style());
        drawn += 1;

        current_y += height + child.spacing();
        if current_y > bottom {
            break;
        }
    }

    trace!("Drew {} of {} nested rows", drawn, rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Command, PdfCanvas};
    use crate::layout::Column;
    use crate::style::CellStyle;
    use crate::value::Row;
    use std::rc::Rc;

    fn child(canvas: &PdfCanvas, rows: usize) -> Table {
        let mut table = Table::new(
            canvas,
            vec![
                Column::new("sku", "SKU").with_width(50.0),
                Column::new("qty", "Qty").with_width(50.0),
            ],
        )
        .unwrap()
        .with_row_height(5.0);
        table.add_rows((0..rows).map(|i| Row::new().with("sku", format!("S-{i}")).with("qty", i)));
        table
    }

    #[test]
    fn test_nested_font_size_floor() {
        assert!((nested_font_size(12.0) - 8.4).abs() < 1e-9);
        assert_eq!(nested_font_size(7.0), NESTED_MIN_FONT_SIZE);
    }

    #[test]
    fn test_restores_parent_state() {
        let mut canvas = PdfCanvas::a4();
        canvas.set_xy(33.0, 44.0);
        CellStyle::header().apply(&mut canvas);
        let table = child(&canvas, 2);

        render_nested(&mut canvas, &table, 20.0, 20.0, 60.0, 30.0);

        assert_eq!((canvas.x(), canvas.y()), (33.0, 44.0));
        assert_eq!(canvas.font_size(), 12.0);
        assert!(canvas.font_style().bold);
        assert_eq!(canvas.auto_page_break(), (true, 20.0));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_reused_child_keeps_its_columns() {
        let mut canvas = PdfCanvas::a4();
        let table = Rc::new(child(&canvas, 3));
        let before: Vec<f64> = table.columns().iter().map(|c| c.width).collect();

        render_nested(&mut canvas, &table, 10.0, 10.0, 40.0, 30.0);
        render_nested(&mut canvas, &table, 60.0, 10.0, 40.0, 30.0);

        let after: Vec<f64> = table.columns().iter().map(|c| c.width).collect();
        assert_eq!(before, after);
        assert!(table.pending_spans().is_empty());
        // Both placements drew every row
        assert_eq!(canvas.pages()[0].texts().filter(|t| t.starts_with("S-")).count(), 6);
    }

    #[test]
    fn test_rows_past_the_box_are_skipped() {
        let mut canvas = PdfCanvas::a4();
        let table = child(&canvas, 10);

        render_nested(&mut canvas, &table, 10.0, 10.0, 100.0, 12.0);

        // Two 5mm rows fit in 12mm, the third would start at 20
        let texts: Vec<_> = canvas.pages()[0].texts().collect();
        assert_eq!(texts, vec!["S-0", "0", "S-1", "1"]);
    }

    #[test]
    fn test_draws_inside_a_clip() {
        let mut canvas = PdfCanvas::a4();
        let table = child(&canvas, 1);

        render_nested(&mut canvas, &table, 10.0, 10.0, 100.0, 12.0);

        let commands = canvas.pages()[0].commands();
        assert!(matches!(commands.first(), Some(Command::PushClip { .. })));
        assert_eq!(commands.last(), Some(&Command::PopClip));
    }

    #[test]
    fn test_nested_text_is_fitted_and_smaller() {
        let mut canvas = PdfCanvas::a4();
        let table = child(&canvas, 1);

        render_nested(&mut canvas, &table, 10.0, 10.0, 50.0, 12.0);

        let sizes: Vec<f64> = canvas.pages()[0]
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                Command::Text { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        assert!(sizes.iter().all(|s| (s - 8.4).abs() < 1e-9));
        let strokes: Vec<f64> = canvas.pages()[0]
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                Command::StrokeRect { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(strokes, vec![25.0, 25.0]);
    }
}
