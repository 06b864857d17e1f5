//! Row- and column-span bookkeeping
//!
//! Spans are tracked by logical row ordinal rather than by page position, so a
//! span keeps its shape across page breaks and header repeats.

use std::collections::HashMap;

use crate::layout::Grid;
use crate::value::Row;
use tracing::trace;

/// A reserved continuation of a row-spanning cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanEntry {
    /// Rows still covered by the span, counting the row holding this entry
    pub remaining: usize,
    /// Columns covered by the spanning cell
    pub col_span: usize,
}

/// Pending row-span continuations keyed by `(column index, row ordinal)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanTracker {
    entries: HashMap<(usize, usize), SpanEntry>,
}

impl SpanTracker {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the rows after `row` that a cell spanning `span` rows covers
    pub fn reserve(&mut self, column: usize, row: usize, span: usize, col_span: usize) {
        for i in 1..span {
            self.entries.insert(
                (column, row + i),
                SpanEntry {
                    remaining: span - i,
                    col_span: col_span.max(1),
                },
            );
        }
        trace!(
            "Reserved {} continuation rows for column {} from row {}",
            span.saturating_sub(1),
            column,
            row
        );
    }

    /// Take the continuation reserved for this cell, if any.
    /// Each entry is consumed by exactly the row it was reserved for.
    pub fn consume(&mut self, column: usize, row: usize) -> Option<SpanEntry> {
        self.entries.remove(&(column, row))
    }

    /// Look at a reserved continuation without consuming it
    pub fn peek(&self, column: usize, row: usize) -> Option<SpanEntry> {
        self.entries.get(&(column, row)).copied()
    }

    /// True when no continuations are pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pending continuations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every pending continuation
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// What occupies one horizontal slot of a row
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Slot {
    /// Covered by a row span from above: border-only, no content
    Continuation {
        column: usize,
        col_span: usize,
        width: f64,
    },
    /// A cell that owns its content
    Cell {
        column: usize,
        col_span: usize,
        row_span: usize,
        width: f64,
    },
}

impl Slot {
    pub fn width(&self) -> f64 {
        match *self {
            Slot::Continuation { width, .. } | Slot::Cell { width, .. } => width,
        }
    }
}

/// Lay out one row's slots left to right, consuming continuations reserved
/// for `ordinal` and reserving new ones for cells that span rows.
///
/// Columns inside a column span are absorbed by the spanning slot. A column
/// span stops short of any column that is still under a row span.
pub(crate) fn plan_row(
    grid: &Grid<'_>,
    row: &Row,
    spans: &mut SpanTracker,
    ordinal: usize,
) -> Vec<Slot> {
    let count = grid.len();
    let mut slots = Vec::with_capacity(count);
    let mut index = 0;

    while index < count {
        if let Some(entry) = spans.consume(index, ordinal) {
            let col_span = entry.col_span.clamp(1, count - index);
            slots.push(Slot::Continuation {
                column: index,
                col_span,
                width: grid.span_width(index, col_span),
            });
            index += col_span;
            continue;
        }

        let column = &grid.columns[index];
        let mut col_span = row
            .col_span(&column.key)
            .unwrap_or(column.col_span)
            .clamp(1, count - index);
        if let Some(blocked) = (1..col_span).find(|j| spans.peek(index + j, ordinal).is_some()) {
            col_span = blocked;
        }
        let row_span = row.row_span(&column.key).unwrap_or(column.row_span).max(1);

        if row_span > 1 {
            spans.reserve(index, ordinal, row_span, col_span);
        }

        slots.push(Slot::Cell {
            column: index,
            col_span,
            row_span,
            width: grid.span_width(index, col_span),
        });
        index += col_span;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Column;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("a", "A").with_width(10.0),
            Column::new("b", "B").with_width(20.0),
            Column::new("c", "C").with_width(30.0),
        ]
    }

    #[test]
    fn test_reserve_and_consume() {
        let mut tracker = SpanTracker::new();
        tracker.reserve(1, 4, 3, 1);
        assert_eq!(tracker.len(), 2);

        assert_eq!(tracker.consume(1, 4), None);
        assert_eq!(
            tracker.consume(1, 5),
            Some(SpanEntry {
                remaining: 2,
                col_span: 1
            })
        );
        assert_eq!(tracker.consume(1, 6).map(|e| e.remaining), Some(1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_span_of_one_reserves_nothing() {
        let mut tracker = SpanTracker::new();
        tracker.reserve(0, 0, 1, 1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_row_span_symmetry() {
        let columns = columns();
        let grid = Grid::natural(&columns);
        let mut tracker = SpanTracker::new();

        let first = plan_row(&grid, &Row::new().with_row_span("b", 3), &mut tracker, 0);
        assert!(matches!(first[1], Slot::Cell { row_span: 3, .. }));

        for ordinal in 1..3 {
            let slots = plan_row(&grid, &Row::new(), &mut tracker, ordinal);
            assert_eq!(slots.len(), 3);
            assert!(matches!(slots[1], Slot::Continuation { column: 1, .. }));
            assert!(matches!(slots[0], Slot::Cell { .. }));
        }
        assert!(tracker.is_empty());

        let after = plan_row(&grid, &Row::new(), &mut tracker, 3);
        assert!(after.iter().all(|s| matches!(s, Slot::Cell { .. })));
    }

    #[test]
    fn test_col_span_absorbs_columns() {
        let columns = columns();
        let grid = Grid::natural(&columns);
        let mut tracker = SpanTracker::new();

        let slots = plan_row(&grid, &Row::new().with_col_span("a", 2), &mut tracker, 0);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].width(), 30.0);
        assert_eq!(slots[1].width(), 30.0);
        let total: f64 = slots.iter().map(Slot::width).sum();
        assert_eq!(total, grid.total_width());
    }

    #[test]
    fn test_col_span_clipped_at_table_edge() {
        let columns = columns();
        let grid = Grid::natural(&columns);
        let mut tracker = SpanTracker::new();

        let slots = plan_row(&grid, &Row::new().with_col_span("b", 9), &mut tracker, 0);
        assert_eq!(slots.len(), 2);
        assert!(matches!(slots[1], Slot::Cell { col_span: 2, .. }));
    }

    #[test]
    fn test_merged_row_span_continues_as_one_block() {
        let columns = columns();
        let grid = Grid::natural(&columns);
        let mut tracker = SpanTracker::new();

        let row = Row::new().with_col_span("a", 2).with_row_span("a", 2);
        plan_row(&grid, &row, &mut tracker, 0);
        let next = plan_row(&grid, &Row::new(), &mut tracker, 1);

        assert_eq!(next.len(), 2);
        assert!(matches!(
            next[0],
            Slot::Continuation { col_span: 2, width, .. } if width == 30.0
        ));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_col_span_stops_at_pending_row_span() {
        let columns = columns();
        let grid = Grid::natural(&columns);
        let mut tracker = SpanTracker::new();

        plan_row(&grid, &Row::new().with_row_span("b", 2), &mut tracker, 0);
        let next = plan_row(&grid, &Row::new().with_col_span("a", 3), &mut tracker, 1);

        assert!(matches!(next[0], Slot::Cell { col_span: 1, .. }));
        assert!(matches!(next[1], Slot::Continuation { column: 1, .. }));
        assert!(tracker.is_empty());
    }
}
