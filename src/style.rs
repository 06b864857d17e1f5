//! Styling structures for headers, data cells and rows

use std::str::FromStr;

use crate::canvas::Canvas;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from 0-255 channel values
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }

    /// Light gray
    pub fn light_gray() -> Self {
        Self::rgb8(200, 200, 200)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parse a legacy alignment code, falling back to left for anything unknown
    pub fn parse_lenient(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "Left" | "left" => Ok(Self::Left),
            "C" | "Center" | "center" => Ok(Self::Center),
            "R" | "Right" | "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

/// Which edges of a cell get a border line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Border {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Border {
    /// No edges
    pub const NONE: Border = Border {
        left: false,
        top: false,
        right: false,
        bottom: false,
    };

    /// All four edges
    pub const ALL: Border = Border {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };

    /// Left and right edges only, used for span continuations
    pub const SIDES: Border = Border {
        left: true,
        top: false,
        right: true,
        bottom: false,
    };

    /// Parse a legacy border string: "1" for all edges, "0" or "" for none,
    /// otherwise any combination of `L`, `T`, `R` and `B`.
    pub fn parse(code: &str) -> Self {
        match code {
            "1" => Self::ALL,
            "" | "0" => Self::NONE,
            _ => Self {
                left: code.contains('L'),
                top: code.contains('T'),
                right: code.contains('R'),
                bottom: code.contains('B'),
            },
        }
    }

    pub fn is_none(&self) -> bool {
        !(self.left || self.top || self.right || self.bottom)
    }

    pub fn is_all(&self) -> bool {
        self.left && self.top && self.right && self.bottom
    }
}

/// Font variant within the current family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
}

/// Styling for header, data or summary cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub fill_color: Option<Color>,
    pub text_color: Option<Color>,
    pub border: Border,
    pub bold: bool,
    pub italic: bool,
    /// Font size override in points. If None, keeps the canvas font size.
    pub font_size: Option<f64>,
    /// Alignment override, ahead of the column's own alignment
    pub align: Option<Alignment>,
}

impl CellStyle {
    /// Default header style: bold, grey fill, full border
    pub fn header() -> Self {
        Self {
            fill_color: Some(Color::light_gray()),
            border: Border::ALL,
            bold: true,
            ..Default::default()
        }
    }

    /// Default data style: full border
    pub fn data() -> Self {
        Self {
            border: Border::ALL,
            ..Default::default()
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set font size; non-positive sizes are ignored
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = (size > 0.0).then_some(size);
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn font_style(&self) -> FontStyle {
        FontStyle {
            bold: self.bold,
            italic: self.italic,
        }
    }

    /// Make this style current on the canvas. Unset fields keep the canvas's
    /// current font size and colors.
    pub fn apply(&self, canvas: &mut dyn Canvas) {
        canvas.set_font_style(self.font_style());
        if let Some(size) = self.font_size {
            canvas.set_font_size(size);
        }
        if let Some(color) = self.fill_color {
            canvas.set_fill_color(color);
        }
        if let Some(color) = self.text_color {
            canvas.set_text_color(color);
        }
    }
}

/// Styling for whole data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowStyle {
    /// Zebra striping keyed on the logical row counter
    pub alternating: bool,
    /// Fill used for the striped rows
    pub fill_color: Option<Color>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_codes() {
        assert_eq!(Alignment::parse_lenient("R"), Alignment::Right);
        assert_eq!(Alignment::parse_lenient("Center"), Alignment::Center);
        assert_eq!(Alignment::parse_lenient("L"), Alignment::Left);
        assert_eq!(Alignment::parse_lenient("justify"), Alignment::Left);
        assert!("X".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_border_parsing() {
        assert!(Border::parse("1").is_all());
        assert!(Border::parse("0").is_none());
        assert!(Border::parse("").is_none());
        assert_eq!(Border::parse("LR"), Border::SIDES);

        let top_left = Border::parse("LT");
        assert!(top_left.left && top_left.top);
        assert!(!top_left.right && !top_left.bottom);
    }

    #[test]
    fn test_cell_style_builder() {
        let style = CellStyle::data()
            .bold()
            .with_font_size(9.0)
            .with_align(Alignment::Right)
            .with_fill(Color::rgb8(240, 240, 240));

        assert!(style.bold);
        assert!(!style.italic);
        assert_eq!(style.font_size, Some(9.0));
        assert_eq!(style.align, Some(Alignment::Right));
        assert!(style.border.is_all());
        assert!(style.fill_color.is_some());

        assert_eq!(CellStyle::data().with_font_size(0.0).font_size, None);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        use crate::document::PdfCanvas;

        let mut canvas = PdfCanvas::a4();
        canvas.set_font_size(11.0);
        CellStyle::header().apply(&mut canvas);
        assert!(canvas.font_style().bold);
        assert_eq!(canvas.font_size(), 11.0);
        assert_eq!(canvas.fill_color(), Color::light_gray());

        CellStyle::data().with_font_size(8.0).apply(&mut canvas);
        assert!(!canvas.font_style().bold);
        assert_eq!(canvas.font_size(), 8.0);
        assert_eq!(canvas.fill_color(), Color::light_gray());
    }

    #[test]
    fn test_header_style_defaults() {
        let header = CellStyle::header();
        assert!(header.bold);
        assert_eq!(header.fill_color, Some(Color::rgb8(200, 200, 200)));
    }
}
