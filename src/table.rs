//! Table orchestration: headers, rows, summaries and pagination

use std::fmt;

use crate::Result;
use crate::canvas::{Canvas, CanvasGuard};
use crate::constants::PAGE_BREAK_ESTIMATE_ROWS;
use crate::drawing::{RowMetrics, draw_row};
use crate::error::TableError;
use crate::height::{base_row_height, estimate_row_height};
use crate::layout::{Column, Grid, resolve_column_widths};
use crate::pagination::PageBreakController;
use crate::span::{SpanTracker, plan_row};
use crate::style::{Alignment, CellStyle, Color, RowStyle};
use crate::value::Row;
use tracing::{debug, instrument, trace};

/// Draws the header on a fresh page and returns the Y where rows continue
pub type HeaderCallback = Box<dyn FnMut(&mut dyn Canvas) -> f64>;

/// A table streamed onto a canvas row by row
pub struct Table {
    columns: Vec<Column>,
    header_style: CellStyle,
    data_style: CellStyle,
    row_style: RowStyle,
    start_x: Option<f64>,
    /// Applied once, by whichever of header or row is drawn first
    start_y: Option<f64>,
    row_height: f64,
    spacing: f64,
    repeat_header: bool,
    page_break: PageBreakController,
    header_callback: Option<HeaderCallback>,
    spans: SpanTracker,
    row_counter: usize,
    stored_rows: Vec<Row>,
}

impl Table {
    /// Create a table on `canvas`, resolving auto column widths against the
    /// canvas's usable page width.
    ///
    /// Fails when the canvas geometry leaves no usable width.
    pub fn new(canvas: &dyn Canvas, mut columns: Vec<Column>) -> Result<Self> {
        let usable = canvas.geometry().usable_width();
        if !usable.is_finite() || usable <= 0.0 {
            return Err(TableError::InvalidCanvas(format!(
                "canvas has no usable width ({usable})"
            )));
        }
        resolve_column_widths(&mut columns, usable);
        debug!("Created table with {} columns", columns.len());

        Ok(Self {
            columns,
            header_style: CellStyle::header(),
            data_style: CellStyle::data(),
            row_style: RowStyle::default(),
            start_x: None,
            start_y: None,
            row_height: 0.0,
            spacing: 0.0,
            repeat_header: true,
            page_break: PageBreakController::default(),
            header_callback: None,
            spans: SpanTracker::new(),
            row_counter: 0,
            stored_rows: Vec::new(),
        })
    }

    /// Set the top-left corner of the table; non-positive coordinates are
    /// left to the canvas cursor
    pub fn with_start_position(mut self, x: f64, y: f64) -> Self {
        self.start_x = (x > 0.0).then_some(x);
        self.start_y = (y > 0.0).then_some(y);
        self
    }

    /// Set a fixed row height; zero derives it from the font size
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Set the vertical gap between rows
    pub fn with_row_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Style for the header row
    pub fn with_header_style(mut self, style: CellStyle) -> Self {
        self.header_style = style;
        self
    }

    /// Style for data rows; nested renders of this table use it too
    pub fn with_data_style(mut self, style: CellStyle) -> Self {
        self.data_style = style;
        self
    }

    /// Set the row striping
    pub fn with_row_style(mut self, style: RowStyle) -> Self {
        self.row_style = style;
        self
    }

    /// Stripe odd rows with `color`, or with the data fill when None
    pub fn with_alternating_rows(mut self, color: Option<Color>) -> Self {
        self.row_style = RowStyle {
            alternating: true,
            fill_color: color,
        };
        self
    }

    /// Redraw the header at the top of every new page
    pub fn with_repeat_header(mut self, repeat: bool) -> Self {
        self.repeat_header = repeat;
        self
    }

    /// Turn automatic page breaks between rows on or off
    pub fn with_page_break_mode(mut self, enabled: bool) -> Self {
        self.page_break.enabled = enabled;
        self
    }

    /// Clearance kept above the bottom margin before a row may start
    pub fn with_page_break_margin(mut self, margin: f64) -> Self {
        self.page_break.margin = margin;
        self
    }

    /// Replace the header redraw after a page break with `callback`. The
    /// returned Y becomes the cursor position for the next row.
    pub fn with_header_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut dyn Canvas) -> f64 + 'static,
    {
        self.header_callback = Some(Box::new(callback));
        self
    }

    /// Columns with their resolved widths
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows buffered with [`Table::add_rows`]
    pub fn stored_rows(&self) -> &[Row] {
        &self.stored_rows
    }

    /// Style applied to data rows
    pub fn data_style(&self) -> &CellStyle {
        &self.data_style
    }

    /// Configured row height; zero means derived from the font
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Vertical gap between rows
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of data rows drawn so far
    pub fn rows_drawn(&self) -> usize {
        self.row_counter
    }

    /// Row-span continuations not yet drawn
    pub fn pending_spans(&self) -> &SpanTracker {
        &self.spans
    }

    /// Fill for the data row with logical index `ordinal`, if it is filled
    pub(crate) fn row_fill(&self, ordinal: usize) -> Option<Color> {
        if self.row_style.alternating {
            (ordinal % 2 == 1).then(|| {
                self.row_style
                    .fill_color
                    .or(self.data_style.fill_color)
                    .unwrap_or_else(Color::light_gray)
            })
        } else {
            self.data_style.fill_color
        }
    }

    fn apply_start_position(&mut self, canvas: &mut dyn Canvas) {
        if let Some(x) = self.start_x {
            canvas.set_x(x);
        }
        if let Some(y) = self.start_y.take() {
            canvas.set_y(y);
        }
    }

    /// Draw the column labels as one row
    #[instrument(skip(self, canvas))]
    pub fn add_header(&mut self, canvas: &mut dyn Canvas) {
        if self.columns.is_empty() {
            return;
        }
        self.apply_start_position(canvas);
        self.draw_header(canvas);
    }

    fn draw_header(&self, canvas: &mut dyn Canvas) {
        self.header_style.apply(canvas);
        let height = base_row_height(self.row_height, canvas.font_size());
        let fill = self.header_style.fill_color.is_some();
        let grid = Grid::natural(&self.columns);
        let count = grid.len();
        let y = canvas.y();
        let mut x = canvas.x();
        let mut index = 0;

        while index < count {
            let column = &self.columns[index];
            let span = column.col_span.clamp(1, count - index);
            let width = grid.span_width(index, span);
            let align = column
                .header_align
                .or(self.header_style.align)
                .unwrap_or(column.align);

            canvas.set_xy(x, y);
            canvas.cell(width, height, &column.label, self.header_style.border, align, fill);
            x += width;
            index += span;
        }

        canvas.ln(height);
        trace!("Drew header of height {}", height);
    }

    /// Restore the header after the page-break controller added a page
    fn after_page_break(&mut self, canvas: &mut dyn Canvas) {
        if let Some(callback) = self.header_callback.as_mut() {
            let y = callback(canvas);
            canvas.set_y(y);
        } else if self.repeat_header {
            if let Some(x) = self.start_x {
                canvas.set_x(x);
            }
            self.draw_header(canvas);
        }
        self.page_break.settle();
        let x = self.start_x.unwrap_or(canvas.geometry().margin_left);
        canvas.set_x(x);
    }

    /// Draw one data row, breaking the page first if it may not fit
    #[instrument(skip(self, canvas, row), fields(ordinal = self.row_counter))]
    pub fn add_row(&mut self, canvas: &mut dyn Canvas, row: &Row) {
        if self.columns.is_empty() {
            return;
        }
        self.apply_start_position(canvas);

        let estimate = base_row_height(self.row_height, canvas.font_size()) * PAGE_BREAK_ESTIMATE_ROWS;
        let broke = self.page_break.check(canvas, estimate);
        if broke {
            self.after_page_break(canvas);
        }

        self.data_style.apply(canvas);
        let base = base_row_height(self.row_height, canvas.font_size());
        let ordinal = self.row_counter;
        let (slots, height) = {
            let grid = Grid::natural(&self.columns);
            let slots = plan_row(&grid, row, &mut self.spans, ordinal);
            let height = estimate_row_height(canvas, &grid, &slots, row, base);
            (slots, height)
        };

        // A row taller than the coarse estimate moves to the next page whole,
        // unless it already starts a page.
        if !broke
            && canvas.y() > canvas.geometry().margin_top
            && self.page_break.check(canvas, height)
        {
            self.after_page_break(canvas);
            self.data_style.apply(canvas);
        }

        let fill = self.row_fill(ordinal);
        if let Some(color) = fill {
            canvas.set_fill_color(color);
        }
        let metrics = RowMetrics {
            base,
            height,
            spacing: self.spacing,
            fill: fill.is_some(),
        };
        {
            // Pages are added by the controller only, never mid-row
            let mut guard = CanvasGuard::new(canvas);
            let (_, margin) = guard.auto_page_break();
            guard.set_auto_page_break(false, margin);
            let grid = Grid::natural(&self.columns);
            draw_row(&mut *guard, &grid, &slots, row, &metrics, &self.data_style);
        }

        canvas.ln(height + self.spacing);
        self.row_counter += 1;
    }

    /// Buffer rows without drawing them, for use as a nested table
    pub fn add_rows<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Row>,
    {
        let before = self.stored_rows.len();
        self.stored_rows.extend(rows);
        trace!("Buffered {} rows", self.stored_rows.len() - before);
    }

    /// Draw a label cell across the first `label_span` columns followed by
    /// one total per remaining column
    #[instrument(skip(self, canvas, totals, style))]
    pub fn add_summary_row(
        &mut self,
        canvas: &mut dyn Canvas,
        label: &str,
        label_span: usize,
        totals: &Row,
        style: &CellStyle,
    ) {
        if self.columns.is_empty() {
            return;
        }
        self.apply_start_position(canvas);

        let estimate = base_row_height(self.row_height, canvas.font_size()) * PAGE_BREAK_ESTIMATE_ROWS;
        if self.page_break.check(canvas, estimate) {
            self.after_page_break(canvas);
        }

        style.apply(canvas);
        let height = base_row_height(self.row_height, canvas.font_size());
        let border = if style.border.is_none() {
            self.data_style.border
        } else {
            style.border
        };
        let fill = style.fill_color.is_some();
        let grid = Grid::natural(&self.columns);
        let count = grid.len();
        let label_span = label_span.clamp(1, count);
        let y = canvas.y();
        let mut x = canvas.x();

        let label_width = grid.span_width(0, label_span);
        canvas.cell(label_width, height, label, border, Alignment::Left, fill);
        x += label_width;

        for (index, column) in self.columns.iter().enumerate().skip(label_span) {
            let align = totals
                .align(&column.key)
                .or(style.align)
                .unwrap_or(column.align);
            canvas.set_xy(x, y);
            canvas.cell(grid.widths[index], height, &totals.text(&column.key), border, align, fill);
            x += grid.widths[index];
        }

        canvas.ln(height + self.spacing);
    }

    /// Summary row whose label spans every column
    pub fn add_total_row(
        &mut self,
        canvas: &mut dyn Canvas,
        label: &str,
        totals: &Row,
        style: &CellStyle,
    ) {
        let count = self.columns.len();
        self.add_summary_row(canvas, label, count, totals, style);
    }

    /// Draw the header (optionally) and then every row. With no rows given,
    /// the buffered rows are drawn instead.
    #[instrument(skip(self, canvas, rows), fields(rows = rows.len()))]
    pub fn render(&mut self, canvas: &mut dyn Canvas, with_header: bool, rows: &[Row]) {
        if with_header {
            self.add_header(canvas);
        }

        if rows.is_empty() {
            let stored = std::mem::take(&mut self.stored_rows);
            for row in &stored {
                self.add_row(canvas, row);
            }
            self.stored_rows = stored;
        } else {
            for row in rows {
                self.add_row(canvas, row);
            }
        }
        self.start_y = None;
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("header_style", &self.header_style)
            .field("data_style", &self.data_style)
            .field("row_style", &self.row_style)
            .field("start_x", &self.start_x)
            .field("start_y", &self.start_y)
            .field("row_height", &self.row_height)
            .field("spacing", &self.spacing)
            .field("repeat_header", &self.repeat_header)
            .field("page_break", &self.page_break)
            .field("header_callback", &self.header_callback.is_some())
            .field("row_counter", &self.row_counter)
            .field("stored_rows", &self.stored_rows.len())
            .finish()
    }
}
