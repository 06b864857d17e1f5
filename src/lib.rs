//! Paginated PDF tables with spans and nested tables, built on lopdf
//!
//! A [`Table`] is bound to a [`Canvas`] and streamed onto it one row at a
//! time. Row heights grow for wrapped text and nested tables, cells may span
//! rows and columns, and rows that may not fit start a new page (redrawing
//! the header). [`PdfCanvas`] is the lopdf-backed canvas.
//!
//! ```no_run
//! use lopdf_grid::{Canvas, Column, PdfCanvas, Row, Table};
//!
//! let mut canvas = PdfCanvas::a4();
//! let mut table = Table::new(&canvas, vec![Column::new("item", "Item"), Column::new("qty", "Qty")])?
//!     .with_row_height(8.0);
//! table.render(&mut canvas, true, &[Row::new().with("item", "Bolts").with("qty", 40)]);
//! if let Some(err) = canvas.error() {
//!     eprintln!("degraded output: {err}");
//! }
//! canvas.save("table.pdf")?;
//! # Ok::<(), lopdf_grid::TableError>(())
//! ```

pub mod canvas;
pub mod constants;
pub mod document;
mod drawing;
mod drawing_utils;
pub mod error;
pub mod font;
pub mod height;
pub mod layout;
pub mod nested;
pub mod pagination;
pub mod span;
pub mod style;
pub mod table;
pub mod text;
pub mod value;

pub use canvas::{Canvas, CanvasGuard, CanvasState, PageGeometry, RectMode};
pub use document::{Command, Page, PdfCanvas};
pub use error::{Result, TableError};
pub use font::{FontMetrics, StandardFontMetrics};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use layout::Column;
pub use pagination::{BreakState, PageBreakController};
pub use span::SpanTracker;
pub use style::{Alignment, Border, CellStyle, Color, FontStyle, RowStyle};
pub use table::{HeaderCallback, Table};
pub use value::{Row, TableRef, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_basic_table_document() {
        let mut canvas = PdfCanvas::a4();
        let mut items = Table::new(
            &canvas,
            vec![Column::new("part", "Part"), Column::new("qty", "Qty")],
        )
        .unwrap();
        items.add_rows(vec![Row::new().with("part", "Nut").with("qty", 2)]);

        let mut table = Table::new(
            &canvas,
            vec![
                Column::new("order", "Order").with_width(40.0),
                Column::new("items", "Items"),
            ],
        )
        .unwrap()
        .with_row_height(8.0);
        table.render(
            &mut canvas,
            true,
            &[Row::new()
                .with("order", "A-1")
                .with("items", Value::Nested(Rc::new(items)))],
        );

        assert!(canvas.error().is_none());
        let doc = canvas.to_document().unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
