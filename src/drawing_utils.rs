//! lopdf content-stream builders used when a canvas is turned into a document
//!
//! All coordinates here are PDF user space: points, origin bottom-left.

use crate::style::{Color, FontStyle};
use lopdf::{Object, StringFormat, content::Operation};

/// Resource name of the standard font registered for a style
pub fn font_resource_name(style: FontStyle) -> &'static str {
    match (style.bold, style.italic) {
        (false, false) => "F1",
        (true, false) => "F1-Bold",
        (false, true) => "F1-Italic",
        (true, true) => "F1-BoldItalic",
    }
}

/// Standard base font backing each resource name
pub const STANDARD_FONTS: [(&str, &str); 4] = [
    ("F1", "Helvetica"),
    ("F1-Bold", "Helvetica-Bold"),
    ("F1-Italic", "Helvetica-Oblique"),
    ("F1-BoldItalic", "Helvetica-BoldOblique"),
];

/// Encode text as Latin-1 for the standard fonts.
///
/// Characters outside Latin-1 become `?`; the first one is returned so the
/// caller can report it.
pub fn encode_latin1(text: &str) -> (Vec<u8>, Option<char>) {
    let mut unencodable = None;
    let bytes = text
        .chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(b) => b,
            Err(_) => {
                unencodable.get_or_insert(ch);
                b'?'
            }
        })
        .collect();
    (bytes, unencodable)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

/// Draw a filled rectangle
pub fn draw_rectangle_fill(x: f64, y: f64, width: f64, height: f64, color: Color) -> Vec<Operation> {
    vec![
        Operation::new("rg", color_operands(color)),
        Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
        Operation::new("f", vec![]),
    ]
}

/// Set stroke color and width for drawing operations
pub fn set_stroke_style(color: Color, width: f64) -> Vec<Operation> {
    vec![
        Operation::new("RG", color_operands(color)),
        Operation::new("w", vec![real(width)]),
    ]
}

/// Draw a stroked rectangle (outline only)
pub fn draw_rectangle_stroke(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
    line_width: f64,
) -> Vec<Operation> {
    let mut ops = set_stroke_style(color, line_width);
    ops.push(Operation::new(
        "re",
        vec![real(x), real(y), real(width), real(height)],
    ));
    ops.push(Operation::new("S", vec![]));
    ops
}

/// Draw a straight line
pub fn draw_line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: Color,
    line_width: f64,
) -> Vec<Operation> {
    let mut ops = set_stroke_style(color, line_width);
    ops.push(Operation::new("m", vec![real(x1), real(y1)]));
    ops.push(Operation::new("l", vec![real(x2), real(y2)]));
    ops.push(Operation::new("S", vec![]));
    ops
}

/// Show a run of already-encoded text with its baseline at (x, y)
pub fn draw_text(
    x: f64,
    y: f64,
    encoded: Vec<u8>,
    font_name: &str,
    font_size: f64,
    color: Color,
) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(font_name.as_bytes().to_vec()), real(font_size)],
        ),
        Operation::new("rg", color_operands(color)),
        Operation::new("Td", vec![real(x), real(y)]),
        Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ]
}

/// Save the graphics state and intersect the clip path with a rectangle
pub fn push_clip(x: f64, y: f64, width: f64, height: f64) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ]
}

/// Restore the graphics state saved by [`push_clip`]
pub fn pop_clip() -> Vec<Operation> {
    vec![Operation::new("Q", vec![])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_resource_names() {
        assert_eq!(font_resource_name(FontStyle::REGULAR), "F1");
        assert_eq!(
            font_resource_name(FontStyle {
                bold: true,
                italic: true
            }),
            "F1-BoldItalic"
        );
    }

    #[test]
    fn test_encode_latin1_reports_first_unencodable() {
        let (bytes, bad) = encode_latin1("caf\u{00e9}");
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(bad, None);

        let (bytes, bad) = encode_latin1("\u{4f60}x\u{597d}");
        assert_eq!(bytes, b"?x?".to_vec());
        assert_eq!(bad, Some('\u{4f60}'));
    }

    #[test]
    fn test_clip_brackets_graphics_state() {
        let ops = push_clip(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ops.first().map(|op| op.operator.as_str()), Some("q"));
        assert_eq!(pop_clip()[0].operator, "Q");
    }

    #[test]
    fn test_text_operation_sequence() {
        let ops = draw_text(10.0, 20.0, b"Hi".to_vec(), "F1", 12.0, Color::black());
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["BT", "Tf", "rg", "Td", "Tj", "ET"]);
    }
}
