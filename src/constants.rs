//! Constants for page geometry and layout defaults
//!
//! Lengths are in millimetres unless noted otherwise; font sizes are in points.

/// Points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Standard A4 page width in millimetres
pub const A4_WIDTH: f64 = 210.0;

/// Standard A4 page height in millimetres
pub const A4_HEIGHT: f64 = 297.0;

/// US Letter page width in millimetres
pub const LETTER_WIDTH: f64 = 215.9;

/// US Letter page height in millimetres
pub const LETTER_HEIGHT: f64 = 279.4;

/// Default left, top and right page margin
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Default automatic page-break margin at the bottom of the page
pub const DEFAULT_BREAK_MARGIN: f64 = 20.0;

/// Default font size in points
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Horizontal text inset inside a canvas cell
pub const CELL_TEXT_MARGIN: f64 = 1.0;

/// Default line width for borders
pub const DEFAULT_LINE_WIDTH: f64 = 0.2;

/// Average character advance as a fraction of the font size
pub const DEFAULT_CHAR_WIDTH_RATIO: f64 = 0.5;

/// Average bold character advance as a fraction of the font size
pub const BOLD_CHAR_WIDTH_RATIO: f64 = 0.55;

/// Row height per point of font size when no explicit row height is set
pub const ROW_HEIGHT_FACTOR: f64 = 0.4;

/// Width subtracted from a cell before deciding whether its text wraps
pub const CELL_WRAP_MARGIN: f64 = 2.0;

/// Over-estimation applied to the wrapped line count
pub const WRAP_ESTIMATE_FACTOR: f64 = 1.2;

/// Most lines a wrapped cell may grow its row by; longer text is clipped
pub const MAX_WRAPPED_LINES: f64 = 3.0;

/// Padding between a wrapped cell's border and its text
pub const WRAPPED_TEXT_PADDING: f64 = 0.5;

/// Padding between a parent cell's border and its nested table
pub const NESTED_PADDING: f64 = 1.0;

/// Nested tables render at this fraction of the parent font size
pub const NESTED_FONT_SCALE: f64 = 0.7;

/// Smallest font size a nested table is rendered at, in points
pub const NESTED_MIN_FONT_SIZE: f64 = 6.0;

/// Multiple of the base row height used for the pre-draw page-break check
pub const PAGE_BREAK_ESTIMATE_ROWS: f64 = 3.0;

/// Default clearance kept above the bottom margin before a row may start
pub const DEFAULT_PAGE_BREAK_MARGIN: f64 = 20.0;
