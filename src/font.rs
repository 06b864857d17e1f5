//! Font metrics for text measurement
//!
//! The canvas measures every string through a [`FontMetrics`] implementation.
//! [`StandardFontMetrics`] approximates the built-in Helvetica family with a
//! fixed average advance; with the `ttf-parser` feature, [`TtfFontMetrics`]
//! reads real advances from a TrueType font.

use crate::constants::{BOLD_CHAR_WIDTH_RATIO, DEFAULT_CHAR_WIDTH_RATIO};

/// Trait for measuring text dimensions.
///
/// Widths are in points at the given font size.
pub trait FontMetrics {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f64) -> f64;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

/// Fixed-ratio metrics for the standard Helvetica faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardFontMetrics {
    ratio: f64,
}

impl StandardFontMetrics {
    pub fn regular() -> Self {
        Self {
            ratio: DEFAULT_CHAR_WIDTH_RATIO,
        }
    }

    pub fn bold() -> Self {
        Self {
            ratio: BOLD_CHAR_WIDTH_RATIO,
        }
    }
}

impl Default for StandardFontMetrics {
    fn default() -> Self {
        Self::regular()
    }
}

impl FontMetrics for StandardFontMetrics {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        if ch == '\n' || ch == '\r' {
            0.0
        } else {
            font_size * self.ratio
        }
    }
}

/// TrueType font metrics using ttf-parser for accurate glyph measurement.
///
/// This struct owns the font data and parses it on demand for measurements.
/// Glyphs missing from the font fall back to the average advance.
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    font_data: Vec<u8>,
    units_per_em: f64,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Create new font metrics from raw TTF/TTC font data.
    ///
    /// Validates the font by parsing it and extracting units_per_em.
    pub fn new(font_data: Vec<u8>) -> crate::Result<Self> {
        let face = ttf_parser::Face::parse(&font_data, 0).map_err(|e| {
            crate::error::TableError::TextError(format!("Failed to parse font: {e}"))
        })?;
        let units_per_em = face.units_per_em() as f64;
        Ok(Self {
            font_data,
            units_per_em,
        })
    }

    fn advance(&self, face: &ttf_parser::Face<'_>, ch: char, font_size: f64) -> f64 {
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|advance| advance as f64 / self.units_per_em * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        match ttf_parser::Face::parse(&self.font_data, 0) {
            Ok(face) => self.advance(&face, ch, font_size),
            Err(_) => font_size * DEFAULT_CHAR_WIDTH_RATIO,
        }
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match ttf_parser::Face::parse(&self.font_data, 0) {
            Ok(face) => text
                .chars()
                .map(|ch| self.advance(&face, ch, font_size))
                .sum(),
            Err(_) => text.chars().count() as f64 * font_size * DEFAULT_CHAR_WIDTH_RATIO,
        }
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("font_data_len", &self.font_data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_metrics_ratio() {
        let regular = StandardFontMetrics::regular();
        assert_eq!(regular.char_width('A', 10.0), 5.0);
        assert_eq!(regular.text_width("ABCD", 10.0), 20.0);
        assert_eq!(regular.text_width("", 10.0), 0.0);

        let bold = StandardFontMetrics::bold();
        assert!(bold.text_width("ABCD", 10.0) > regular.text_width("ABCD", 10.0));
    }

    #[cfg(feature = "ttf-parser")]
    fn system_sans() -> Option<Vec<u8>> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
        .iter()
        .find_map(|path| std::fs::read(path).ok())
    }

    #[cfg(feature = "ttf-parser")]
    #[test]
    fn test_ttf_font_metrics_invalid_data() {
        let result = TtfFontMetrics::new(vec![0, 1, 2, 3]);
        assert!(result.is_err());
    }

    #[cfg(feature = "ttf-parser")]
    #[test]
    fn test_ttf_text_width_sums_char_widths() {
        let Some(data) = system_sans() else {
            eprintln!("no TrueType font installed, nothing to measure");
            return;
        };
        let metrics = TtfFontMetrics::new(data).unwrap();
        let single = metrics.char_width('A', 12.0);
        let triple = metrics.text_width("AAA", 12.0);
        assert!(single > 0.0, "char_width should be positive, got {single}");
        assert!(
            (triple - single * 3.0).abs() < 0.01,
            "text_width should equal sum of char_widths"
        );
    }
}
