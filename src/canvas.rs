//! The drawing surface the table engine renders onto
//!
//! [`Canvas`] is the narrow capability the layout engine consumes: a cursor,
//! cell and paragraph primitives, rectangles and lines, clipping, page
//! geometry and page-break control. Coordinates are in user units with the
//! origin at the top-left corner of the page and Y growing downwards.

use std::ops::{Deref, DerefMut};

use crate::error::TableError;
use crate::style::{Alignment, Border, Color, FontStyle};
use tracing::trace;

/// Page size and margins in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    /// Bottom margin; doubles as the automatic page-break margin
    pub margin_bottom: f64,
}

impl PageGeometry {
    /// Width between the left and right margins
    pub fn usable_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Height between the top and bottom margins
    pub fn usable_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// How a rectangle is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectMode {
    Fill,
    Stroke,
    FillStroke,
}

/// Mutable drawing surface with a text cursor.
///
/// Implementations record failures (for example text that cannot be encoded)
/// in an accumulated error slot instead of interrupting the caller; check
/// [`Canvas::error`] once the document is complete.
pub trait Canvas {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn set_x(&mut self, x: f64);
    fn set_y(&mut self, y: f64);

    fn set_xy(&mut self, x: f64, y: f64) {
        self.set_x(x);
        self.set_y(y);
    }

    /// Move to the left margin and down by `height`
    fn ln(&mut self, height: f64);

    /// Draw a single-line cell at the cursor and move the cursor right by `width`
    fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Border,
        align: Alignment,
        fill: bool,
    );

    /// Draw wrapped text at the cursor, one `line_height` per line.
    /// Leaves the cursor at the left margin below the last line.
    fn multi_cell(
        &mut self,
        width: f64,
        line_height: f64,
        text: &str,
        border: Border,
        align: Alignment,
        fill: bool,
    );

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, mode: RectMode);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Restrict drawing to a rectangle until the matching [`Canvas::clip_end`]
    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clip_end(&mut self);

    fn geometry(&self) -> PageGeometry;

    /// Whether cells start a new page on overflow, and the trigger margin
    fn auto_page_break(&self) -> (bool, f64);
    fn set_auto_page_break(&mut self, enabled: bool, margin: f64);

    /// Start a new page and move the cursor to its top-left margin
    fn add_page(&mut self);

    /// Current font size in points
    fn font_size(&self) -> f64;
    fn set_font_size(&mut self, size: f64);
    fn font_style(&self) -> FontStyle;
    fn set_font_style(&mut self, style: FontStyle);

    fn fill_color(&self) -> Color;
    fn set_fill_color(&mut self, color: Color);
    fn text_color(&self) -> Color;
    fn set_text_color(&mut self, color: Color);
    fn draw_color(&self) -> Color;
    fn set_draw_color(&mut self, color: Color);

    /// Width of `text` in user units with the current font
    fn string_width(&self, text: &str) -> f64;

    fn page_count(&self) -> usize;

    /// First error recorded by a drawing primitive, if any
    fn error(&self) -> Option<&TableError>;
}

/// Snapshot of the ambient canvas state a nested render may disturb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasState {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_style: FontStyle,
    pub fill_color: Color,
    pub text_color: Color,
    pub draw_color: Color,
    pub auto_page_break: (bool, f64),
}

impl CanvasState {
    pub fn capture(canvas: &dyn Canvas) -> Self {
        Self {
            x: canvas.x(),
            y: canvas.y(),
            font_size: canvas.font_size(),
            font_style: canvas.font_style(),
            fill_color: canvas.fill_color(),
            text_color: canvas.text_color(),
            draw_color: canvas.draw_color(),
            auto_page_break: canvas.auto_page_break(),
        }
    }

    pub fn restore(&self, canvas: &mut dyn Canvas) {
        let (enabled, margin) = self.auto_page_break;
        canvas.set_auto_page_break(enabled, margin);
        canvas.set_font_style(self.font_style);
        canvas.set_font_size(self.font_size);
        canvas.set_fill_color(self.fill_color);
        canvas.set_text_color(self.text_color);
        canvas.set_draw_color(self.draw_color);
        canvas.set_xy(self.x, self.y);
    }
}

/// Scope guard that restores the canvas state captured on creation, and
/// closes any clip regions opened through it, when dropped.
///
/// Derefs to the canvas so the guarded canvas is used in its place.
pub struct CanvasGuard<'c> {
    canvas: &'c mut dyn Canvas,
    saved: CanvasState,
    clips: usize,
}

impl<'c> CanvasGuard<'c> {
    pub fn new(canvas: &'c mut dyn Canvas) -> Self {
        let saved = CanvasState::capture(canvas);
        Self {
            canvas,
            saved,
            clips: 0,
        }
    }

    pub fn saved(&self) -> &CanvasState {
        &self.saved
    }

    /// Open a clip region that is closed when the guard drops
    pub fn clip_to(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.canvas.clip_rect(x, y, width, height);
        self.clips += 1;
    }
}

impl<'c> Deref for CanvasGuard<'c> {
    type Target = dyn Canvas + 'c;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl<'c> DerefMut for CanvasGuard<'c> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for CanvasGuard<'_> {
    fn drop(&mut self) {
        for _ in 0..self.clips {
            self.canvas.clip_end();
        }
        self.saved.restore(&mut *self.canvas);
        trace!("Restored canvas state {:?}", self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PdfCanvas;

    #[test]
    fn test_geometry_usable_area() {
        let geometry = PageGeometry {
            width: 210.0,
            height: 297.0,
            margin_left: 10.0,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 20.0,
        };
        assert_eq!(geometry.usable_width(), 190.0);
        assert_eq!(geometry.usable_height(), 267.0);
    }

    #[test]
    fn test_guard_restores_state_on_drop() {
        let mut canvas = PdfCanvas::a4();
        canvas.set_xy(42.0, 84.0);
        {
            let mut guard = CanvasGuard::new(&mut canvas);
            guard.set_auto_page_break(false, 0.0);
            guard.set_font_size(6.0);
            guard.set_font_style(FontStyle {
                bold: true,
                italic: false,
            });
            guard.set_fill_color(Color::white());
            guard.clip_to(0.0, 0.0, 10.0, 10.0);
            guard.set_xy(1.0, 2.0);
        }

        assert_eq!((canvas.x(), canvas.y()), (42.0, 84.0));
        assert_eq!(canvas.font_size(), 12.0);
        assert_eq!(canvas.font_style(), FontStyle::REGULAR);
        assert_eq!(canvas.auto_page_break(), (true, 20.0));
        // The clip opened through the guard was closed again
        canvas.add_page();
        assert_eq!(
            canvas.pages()[0].commands().last(),
            Some(&crate::document::Command::PopClip)
        );
    }

    #[test]
    fn test_guard_restores_when_unwinding() {
        let mut canvas = PdfCanvas::a4();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = CanvasGuard::new(&mut canvas);
            guard.set_font_size(7.0);
            guard.set_auto_page_break(false, 0.0);
            panic!("render step failed");
        }));

        assert!(result.is_err());
        assert_eq!(canvas.font_size(), 12.0);
        assert!(canvas.auto_page_break().0);
    }
}
