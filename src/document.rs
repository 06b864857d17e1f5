//! lopdf-backed canvas
//!
//! [`PdfCanvas`] keeps a gofpdf-style cursor in millimetres (origin top-left)
//! and records every primitive as a [`Command`] on the current [`Page`]. The
//! recorded pages are converted into lopdf content streams on demand, so a
//! canvas can be inspected, rendered to a [`Document`] or saved repeatedly.

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::canvas::{Canvas, PageGeometry, RectMode};
use crate::constants::*;
use crate::drawing_utils::{self, STANDARD_FONTS, font_resource_name};
use crate::error::TableError;
use crate::font::{FontMetrics, StandardFontMetrics};
use crate::style::{Alignment, Border, Color, FontStyle};
use crate::text::wrap_text;
use lopdf::{
    Dictionary, Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, trace, warn};

/// A recorded drawing primitive, in canvas units with a top-left origin
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
    /// Text run with its baseline at `y`
    Text {
        x: f64,
        y: f64,
        text: String,
        style: FontStyle,
        size: f64,
        color: Color,
    },
    PushClip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    PopClip,
}

/// The commands drawn on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    commands: Vec<Command>,
}

impl Page {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Text runs on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Canvas that renders into a PDF document through lopdf
pub struct PdfCanvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    x: f64,
    y: f64,
    font_style: FontStyle,
    font_size: f64,
    fill_color: Color,
    text_color: Color,
    draw_color: Color,
    line_width: f64,
    auto_page_break: bool,
    clip_depth: usize,
    metrics: Box<dyn FontMetrics>,
    bold_metrics: Box<dyn FontMetrics>,
    error: Option<TableError>,
}

impl PdfCanvas {
    /// Create a canvas with one empty page of the given geometry.
    ///
    /// Automatic page breaks are enabled with the geometry's bottom margin.
    pub fn new(geometry: PageGeometry) -> Self {
        debug!("Creating canvas {}x{}", geometry.width, geometry.height);
        Self {
            geometry,
            pages: vec![Page::default()],
            x: geometry.margin_left,
            y: geometry.margin_top,
            font_style: FontStyle::REGULAR,
            font_size: DEFAULT_FONT_SIZE,
            fill_color: Color::white(),
            text_color: Color::black(),
            draw_color: Color::black(),
            line_width: DEFAULT_LINE_WIDTH,
            auto_page_break: true,
            clip_depth: 0,
            metrics: Box::new(StandardFontMetrics::regular()),
            bold_metrics: Box::new(StandardFontMetrics::bold()),
            error: None,
        }
    }

    /// A4 portrait with 10 mm margins and a 20 mm page-break margin
    pub fn a4() -> Self {
        Self::new(PageGeometry {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: DEFAULT_MARGIN,
            margin_top: DEFAULT_MARGIN,
            margin_right: DEFAULT_MARGIN,
            margin_bottom: DEFAULT_BREAK_MARGIN,
        })
    }

    /// US Letter portrait with the default margins
    pub fn letter() -> Self {
        Self::new(PageGeometry {
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
            margin_left: DEFAULT_MARGIN,
            margin_top: DEFAULT_MARGIN,
            margin_right: DEFAULT_MARGIN,
            margin_bottom: DEFAULT_BREAK_MARGIN,
        })
    }

    /// Measure regular text with custom metrics
    pub fn with_metrics(mut self, metrics: Box<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Measure bold text with separate metrics
    pub fn with_bold_metrics(mut self, metrics: Box<dyn FontMetrics>) -> Self {
        self.bold_metrics = metrics;
        self
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn metrics_for_style(&self) -> &dyn FontMetrics {
        if self.font_style.bold {
            self.bold_metrics.as_ref()
        } else {
            self.metrics.as_ref()
        }
    }

    fn push(&mut self, command: Command) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }

    fn record_error(&mut self, error: TableError) {
        warn!("Canvas error: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn font_size_units(&self) -> f64 {
        self.font_size / POINTS_PER_MM
    }

    fn stroke_border(&mut self, x: f64, y: f64, width: f64, height: f64, border: Border) {
        let color = self.draw_color;
        let line_width = self.line_width;
        if border.is_all() {
            self.push(Command::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            });
            return;
        }

        let edges = [
            (border.left, (x, y, x, y + height)),
            (border.top, (x, y, x + width, y)),
            (border.right, (x + width, y, x + width, y + height)),
            (border.bottom, (x, y + height, x + width, y + height)),
        ];
        for (enabled, (x1, y1, x2, y2)) in edges {
            if enabled {
                self.push(Command::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    line_width,
                });
            }
        }
    }

    fn draw_text_run(&mut self, x: f64, y: f64, text: &str) {
        if let (_, Some(ch)) = drawing_utils::encode_latin1(text) {
            self.record_error(TableError::TextError(format!(
                "character U+{:04X} cannot be painted with the standard fonts",
                u32::from(ch)
            )));
        }
        self.push(Command::Text {
            x,
            y,
            text: text.to_string(),
            style: self.font_style,
            size: self.font_size,
            color: self.text_color,
        });
    }

    fn break_trigger(&self) -> f64 {
        self.geometry.height - self.geometry.margin_bottom
    }

    /// Convert the recorded pages into a standalone lopdf document
    pub fn to_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for (name, base_font) in STANDARD_FONTS {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font,
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(name, font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: self.page_operations(page),
            };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real((self.geometry.width * POINTS_PER_MM) as f32),
            Object::Real((self.geometry.height * POINTS_PER_MM) as f32),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.pages.len() as i64,
                "MediaBox" => media_box,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        debug!("Assembled document with {} pages", self.pages.len());
        Ok(doc)
    }

    /// Write the document as PDF bytes
    pub fn save_to<W: Write>(&self, target: &mut W) -> Result<()> {
        let mut doc = self.to_document()?;
        doc.save_to(target)?;
        Ok(())
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        self.save_to(&mut file)
    }

    fn page_operations(&self, page: &Page) -> Vec<Operation> {
        let k = POINTS_PER_MM;
        let h = self.geometry.height;
        let mut ops = Vec::new();

        for command in &page.commands {
            match command {
                Command::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => ops.extend(drawing_utils::draw_rectangle_fill(
                    x * k,
                    (h - y - height) * k,
                    width * k,
                    height * k,
                    *color,
                )),
                Command::StrokeRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                    line_width,
                } => ops.extend(drawing_utils::draw_rectangle_stroke(
                    x * k,
                    (h - y - height) * k,
                    width * k,
                    height * k,
                    *color,
                    line_width * k,
                )),
                Command::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    line_width,
                } => ops.extend(drawing_utils::draw_line(
                    x1 * k,
                    (h - y1) * k,
                    x2 * k,
                    (h - y2) * k,
                    *color,
                    line_width * k,
                )),
                Command::Text {
                    x,
                    y,
                    text,
                    style,
                    size,
                    color,
                } => {
                    let (encoded, _) = drawing_utils::encode_latin1(text);
                    ops.extend(drawing_utils::draw_text(
                        x * k,
                        (h - y) * k,
                        encoded,
                        font_resource_name(*style),
                        *size,
                        *color,
                    ));
                }
                Command::PushClip {
                    x,
                    y,
                    width,
                    height,
                } => ops.extend(drawing_utils::push_clip(
                    x * k,
                    (h - y - height) * k,
                    width * k,
                    height * k,
                )),
                Command::PopClip => ops.extend(drawing_utils::pop_clip()),
            }
        }

        trace!("Page converted to {} operations", ops.len());
        ops
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::a4()
    }
}

impl std::fmt::Debug for PdfCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfCanvas")
            .field("geometry", &self.geometry)
            .field("pages", &self.pages.len())
            .field("x", &self.x)
            .field("y", &self.y)
            .field("font_size", &self.font_size)
            .field("auto_page_break", &self.auto_page_break)
            .field("error", &self.error)
            .finish()
    }
}

impl Canvas for PdfCanvas {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    fn ln(&mut self, height: f64) {
        self.x = self.geometry.margin_left;
        self.y += height;
    }

    fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Border,
        align: Alignment,
        fill: bool,
    ) {
        let width = if width > 0.0 {
            width
        } else {
            self.geometry.width - self.geometry.margin_right - self.x
        };

        if self.auto_page_break
            && self.clip_depth == 0
            && self.y + height > self.break_trigger()
            && self.y > self.geometry.margin_top
        {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let (x, y) = (self.x, self.y);
        if fill {
            self.push(Command::FillRect {
                x,
                y,
                width,
                height,
                color: self.fill_color,
            });
        }
        if !border.is_none() {
            self.stroke_border(x, y, width, height, border);
        }
        if !text.is_empty() {
            let text_width = self.string_width(text);
            let text_x = match align {
                Alignment::Left => x + CELL_TEXT_MARGIN,
                Alignment::Center => x + (width - text_width) / 2.0,
                Alignment::Right => x + width - CELL_TEXT_MARGIN - text_width,
            };
            let baseline = y + 0.5 * height + 0.3 * self.font_size_units();
            self.draw_text_run(text_x, baseline, text);
        }

        self.x += width;
    }

    fn multi_cell(
        &mut self,
        width: f64,
        line_height: f64,
        text: &str,
        border: Border,
        align: Alignment,
        fill: bool,
    ) {
        let width = if width > 0.0 {
            width
        } else {
            self.geometry.width - self.geometry.margin_right - self.x
        };
        let max_width_pt = (width - 2.0 * CELL_TEXT_MARGIN).max(0.0) * POINTS_PER_MM;
        let lines = wrap_text(text, max_width_pt, self.font_size, self.metrics_for_style());
        let start_x = self.x;
        let last = lines.len().saturating_sub(1);

        for (i, line) in lines.iter().enumerate() {
            let edges = Border {
                left: border.left,
                right: border.right,
                top: border.top && i == 0,
                bottom: border.bottom && i == last,
            };
            self.x = start_x;
            self.cell(width, line_height, line, edges, align, fill);
            self.y += line_height;
        }

        self.x = self.geometry.margin_left;
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, mode: RectMode) {
        if matches!(mode, RectMode::Fill | RectMode::FillStroke) {
            self.push(Command::FillRect {
                x,
                y,
                width,
                height,
                color: self.fill_color,
            });
        }
        if matches!(mode, RectMode::Stroke | RectMode::FillStroke) {
            self.stroke_border(x, y, width, height, Border::ALL);
        }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(Command::Line {
            x1,
            y1,
            x2,
            y2,
            color: self.draw_color,
            line_width: self.line_width,
        });
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.clip_depth += 1;
        self.push(Command::PushClip {
            x,
            y,
            width,
            height,
        });
    }

    fn clip_end(&mut self) {
        if self.clip_depth == 0 {
            warn!("clip_end without a matching clip_rect");
            return;
        }
        self.clip_depth -= 1;
        self.push(Command::PopClip);
    }

    fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn auto_page_break(&self) -> (bool, f64) {
        (self.auto_page_break, self.geometry.margin_bottom)
    }

    fn set_auto_page_break(&mut self, enabled: bool, margin: f64) {
        self.auto_page_break = enabled;
        self.geometry.margin_bottom = margin;
    }

    fn add_page(&mut self) {
        if self.clip_depth > 0 {
            warn!("Closing {} open clip regions at page end", self.clip_depth);
            for _ in 0..self.clip_depth {
                self.push(Command::PopClip);
            }
            self.clip_depth = 0;
        }
        self.pages.push(Page::default());
        self.x = self.geometry.margin_left;
        self.y = self.geometry.margin_top;
        debug!("Started page {}", self.pages.len());
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f64) {
        if size > 0.0 {
            self.font_size = size;
        }
    }

    fn font_style(&self) -> FontStyle {
        self.font_style
    }

    fn set_font_style(&mut self, style: FontStyle) {
        self.font_style = style;
    }

    fn fill_color(&self) -> Color {
        self.fill_color
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn text_color(&self) -> Color {
        self.text_color
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn draw_color(&self) -> Color {
        self.draw_color
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn string_width(&self, text: &str) -> f64 {
        self.metrics_for_style().text_width(text, self.font_size) / POINTS_PER_MM
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn error(&self) -> Option<&TableError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_starts_at_margins() {
        let canvas = PdfCanvas::a4();
        assert_eq!(canvas.page_count(), 1);
        assert_eq!((canvas.x(), canvas.y()), (10.0, 10.0));
        assert_eq!(canvas.geometry().usable_width(), 190.0);
        assert_eq!(canvas.auto_page_break(), (true, 20.0));
    }

    #[test]
    fn test_cell_advances_cursor_and_records_text() {
        let mut canvas = PdfCanvas::a4();
        canvas.cell(40.0, 8.0, "Hello", Border::ALL, Alignment::Left, false);

        assert_eq!(canvas.x(), 50.0);
        assert_eq!(canvas.y(), 10.0);
        let page = &canvas.pages()[0];
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["Hello"]);
        assert!(matches!(
            page.commands()[0],
            Command::StrokeRect { width, height, .. } if width == 40.0 && height == 8.0
        ));
    }

    #[test]
    fn test_cell_alignment_positions_text() {
        let mut canvas = PdfCanvas::a4();
        let width = canvas.string_width("abc");
        canvas.cell(50.0, 8.0, "abc", Border::NONE, Alignment::Right, false);

        match &canvas.pages()[0].commands()[0] {
            Command::Text { x, .. } => {
                assert!((x - (10.0 + 50.0 - CELL_TEXT_MARGIN - width)).abs() < 1e-9)
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_border_draws_lines() {
        let mut canvas = PdfCanvas::a4();
        canvas.cell(20.0, 5.0, "", Border::SIDES, Alignment::Left, false);
        let lines = canvas.pages()[0]
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, Command::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_cell_triggers_auto_page_break() {
        let mut canvas = PdfCanvas::a4();
        canvas.set_xy(30.0, 270.0);
        canvas.cell(20.0, 10.0, "x", Border::NONE, Alignment::Left, false);
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.x(), 50.0);
        assert_eq!(canvas.y(), 10.0);

        canvas.set_auto_page_break(false, 0.0);
        canvas.set_y(290.0);
        canvas.cell(20.0, 10.0, "y", Border::NONE, Alignment::Left, false);
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_multi_cell_wraps_lines() {
        let mut canvas = PdfCanvas::a4();
        canvas.multi_cell(
            30.0,
            5.0,
            "one two three four five six",
            Border::NONE,
            Alignment::Left,
            false,
        );
        let texts: Vec<_> = canvas.pages()[0].texts().collect();
        assert!(texts.len() > 1);
        assert_eq!(canvas.y(), 10.0 + 5.0 * texts.len() as f64);
        assert_eq!(canvas.x(), 10.0);
    }

    #[test]
    fn test_unencodable_text_is_recorded_not_fatal() {
        let mut canvas = PdfCanvas::a4();
        canvas.cell(40.0, 8.0, "\u{4f60}\u{597d}", Border::NONE, Alignment::Left, false);
        canvas.cell(40.0, 8.0, "after", Border::NONE, Alignment::Left, false);

        assert!(matches!(canvas.error(), Some(TableError::TextError(_))));
        assert_eq!(canvas.pages()[0].texts().count(), 2);
    }

    #[test]
    fn test_unbalanced_clip_end_is_ignored() {
        let mut canvas = PdfCanvas::a4();
        canvas.clip_end();
        assert!(canvas.pages()[0].commands().is_empty());

        canvas.clip_rect(0.0, 0.0, 10.0, 10.0);
        canvas.add_page();
        assert_eq!(canvas.pages()[0].commands().last(), Some(&Command::PopClip));
    }

    #[test]
    fn test_to_document_builds_page_tree() {
        let mut canvas = PdfCanvas::a4();
        canvas.cell(40.0, 8.0, "Page one", Border::ALL, Alignment::Left, true);
        canvas.add_page();
        canvas.cell(40.0, 8.0, "Page two", Border::ALL, Alignment::Left, false);

        let doc = canvas.to_document().unwrap();
        assert_eq!(doc.get_pages().len(), 2);

        let mut bytes = Vec::new();
        canvas.save_to(&mut bytes).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
