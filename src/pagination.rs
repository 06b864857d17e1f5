//! Page-break decisions made before each row is drawn

use crate::canvas::Canvas;
use crate::constants::DEFAULT_PAGE_BREAK_MARGIN;
use tracing::debug;

/// Where the controller is in its break cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakState {
    #[default]
    Normal,
    /// A page was just added and the header has not been restored yet
    JustBroke,
}

/// Decides when a table starts a new page
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreakController {
    pub enabled: bool,
    /// Clearance kept above the bottom margin
    pub margin: f64,
    state: BreakState,
}

impl Default for PageBreakController {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: DEFAULT_PAGE_BREAK_MARGIN,
            state: BreakState::Normal,
        }
    }
}

impl PageBreakController {
    pub fn new(enabled: bool, margin: f64) -> Self {
        Self {
            enabled,
            margin,
            state: BreakState::Normal,
        }
    }

    pub fn state(&self) -> BreakState {
        self.state
    }

    /// Vertical space left for rows below the cursor
    pub fn available_space(&self, canvas: &dyn Canvas) -> f64 {
        let geometry = canvas.geometry();
        geometry.height - geometry.margin_bottom - self.margin - canvas.y()
    }

    pub fn should_break(&self, canvas: &dyn Canvas, estimated_height: f64) -> bool {
        self.enabled && estimated_height > self.available_space(canvas)
    }

    /// Start a new page when a row of `estimated_height` does not fit.
    /// Returns true if a page was added; the caller restores the header and
    /// then calls [`PageBreakController::settle`].
    pub fn check(&mut self, canvas: &mut dyn Canvas, estimated_height: f64) -> bool {
        if !self.should_break(canvas, estimated_height) {
            return false;
        }
        debug!(
            "Page break at y={} (needs {}, has {})",
            canvas.y(),
            estimated_height,
            self.available_space(canvas)
        );
        canvas.add_page();
        self.state = BreakState::JustBroke;
        true
    }

    pub fn settle(&mut self) {
        self.state = BreakState::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PdfCanvas;

    #[test]
    fn test_available_space() {
        let mut canvas = PdfCanvas::a4();
        canvas.set_y(100.0);
        let controller = PageBreakController::default();
        // 297 - 20 (bottom margin) - 20 (break margin) - 100
        assert!((controller.available_space(&canvas) - 157.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_threshold() {
        let mut canvas = PdfCanvas::a4();
        let mut controller = PageBreakController::default();

        canvas.set_y(233.0);
        assert!(!controller.check(&mut canvas, 24.0));
        assert_eq!(canvas.page_count(), 1);

        canvas.set_y(233.5);
        assert!(controller.check(&mut canvas, 24.0));
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(controller.state(), BreakState::JustBroke);
        assert_eq!(canvas.y(), 10.0);

        controller.settle();
        assert_eq!(controller.state(), BreakState::Normal);
    }

    #[test]
    fn test_disabled_never_breaks() {
        let mut canvas = PdfCanvas::a4();
        canvas.set_y(290.0);
        let mut controller = PageBreakController::new(false, 20.0);
        assert!(!controller.check(&mut canvas, 50.0));
        assert_eq!(canvas.page_count(), 1);
    }
}
