//! Column definitions and width resolution

use crate::style::Alignment;
use tracing::{trace, warn};

/// One table column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Key used to look up row values
    pub key: String,
    /// Header text
    pub label: String,
    /// Width in canvas units; zero (or any non-positive value) means auto
    pub width: f64,
    /// Text wider than this wraps even if it would fit the cell
    pub max_width: Option<f64>,
    pub align: Alignment,
    /// Header alignment, ahead of every other alignment source
    pub header_align: Option<Alignment>,
    pub col_span: usize,
    pub row_span: usize,
    /// Legacy merge flag, folded into `col_span` during resolution
    pub merge_cell: bool,
}

impl Column {
    pub fn new<K: Into<String>, L: Into<String>>(key: K, label: L) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: 0.0,
            max_width: None,
            align: Alignment::Left,
            header_align: None,
            col_span: 1,
            row_span: 1,
            merge_cell: false,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_header_align(mut self, align: Alignment) -> Self {
        self.header_align = Some(align);
        self
    }

    pub fn with_col_span(mut self, span: usize) -> Self {
        self.col_span = span;
        self
    }

    pub fn with_row_span(mut self, span: usize) -> Self {
        self.row_span = span;
        self
    }

    /// Wrap threshold, ignoring non-positive values
    pub fn effective_max_width(&self) -> Option<f64> {
        self.max_width.filter(|w| *w > 0.0)
    }

    fn is_auto(&self) -> bool {
        !(self.width.is_finite() && self.width > 0.0)
    }
}

/// Assign a concrete width to every auto column.
///
/// Auto columns split whatever the fixed columns leave of `usable_width`
/// evenly; fixed columns are untouched. Spans of zero become one. Runs once,
/// when a table is constructed.
pub fn resolve_column_widths(columns: &mut [Column], usable_width: f64) {
    let mut fixed_width = 0.0;
    let mut auto_columns = 0usize;

    for column in columns.iter_mut() {
        if column.is_auto() {
            auto_columns += 1;
        } else {
            fixed_width += column.width;
        }
        if column.col_span == 0 || column.merge_cell {
            column.col_span = column.col_span.max(1);
            column.merge_cell = false;
        }
        column.row_span = column.row_span.max(1);
    }

    if auto_columns == 0 {
        trace!("All {} columns have fixed widths", columns.len());
        return;
    }

    let mut remaining = usable_width - fixed_width;
    if remaining < 0.0 {
        warn!(
            "Fixed column widths ({}) exceed usable width ({}); auto columns get no width",
            fixed_width, usable_width
        );
        remaining = 0.0;
    }

    let share = remaining / auto_columns as f64;
    for column in columns.iter_mut().filter(|c| c.is_auto()) {
        column.width = share;
    }

    trace!(
        "Resolved column widths: {:?}",
        columns.iter().map(|c| c.width).collect::<Vec<_>>()
    );
}

/// Factor that shrinks `columns` to fit `available`; 1.0 when they already fit
pub fn scale_factor(columns: &[Column], available: f64) -> f64 {
    let total: f64 = columns.iter().map(|c| c.width).filter(|w| *w > 0.0).sum();
    if total > 0.0 && total > available {
        available / total
    } else {
        1.0
    }
}

/// Effective column geometry for one render pass
#[derive(Debug, Clone)]
pub(crate) struct Grid<'a> {
    pub columns: &'a [Column],
    pub widths: Vec<f64>,
}

impl<'a> Grid<'a> {
    /// The columns at their resolved widths
    pub fn natural(columns: &'a [Column]) -> Self {
        Self {
            columns,
            widths: columns.iter().map(|c| c.width).collect(),
        }
    }

    /// The columns shrunk to fit `available`, leaving the definitions untouched
    pub fn fitted(columns: &'a [Column], available: f64) -> Self {
        let factor = scale_factor(columns, available);
        Self {
            columns,
            widths: columns
                .iter()
                .map(|c| if c.width > 0.0 { c.width * factor } else { c.width })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Width of `span` columns starting at `index`, clipped to the table edge
    pub fn span_width(&self, index: usize, span: usize) -> f64 {
        let end = (index + span.max(1)).min(self.widths.len());
        self.widths.get(index..end).map_or(0.0, |w| w.iter().sum())
    }

    pub fn total_width(&self) -> f64 {
        self.widths.iter().sum()
    }
}
