//! Text wrapping for paragraph cells

use crate::font::FontMetrics;
use tracing::trace;

/// Break text into lines no wider than `max_width` points.
///
/// Explicit newlines are preserved, words are kept whole where they fit and
/// words wider than a full line are split between characters.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut all_lines = Vec::new();
    let space_width = metrics.char_width(' ', font_size);

    for segment in text.split('\n') {
        let words: Vec<&str> = segment.split_whitespace().collect();

        if words.is_empty() {
            all_lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0.0;

        for word in words {
            let word_width = metrics.text_width(word, font_size);

            if word_width > max_width {
                if !current_line.is_empty() {
                    all_lines.push(std::mem::take(&mut current_line));
                }
                let (chunks, tail) = split_long_word(word, max_width, font_size, metrics);
                all_lines.extend(chunks);
                current_width = metrics.text_width(&tail, font_size);
                current_line = tail;
                continue;
            }

            if !current_line.is_empty() && current_width + space_width + word_width > max_width {
                all_lines.push(std::mem::take(&mut current_line));
                current_width = 0.0;
            }

            if !current_line.is_empty() {
                current_line.push(' ');
                current_width += space_width;
            }
            current_line.push_str(word);
            current_width += word_width;
        }

        if !current_line.is_empty() {
            all_lines.push(current_line);
        }
    }

    if all_lines.is_empty() {
        all_lines.push(String::new());
    }

    trace!("Wrapped text into {} lines", all_lines.len());
    all_lines
}

/// Split a word wider than `max_width` into full-width chunks and a tail.
/// Every chunk holds at least one character.
fn split_long_word(
    word: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> (Vec<String>, String) {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;

    for ch in word.chars() {
        let cw = metrics.char_width(ch, font_size);
        if !current.is_empty() && width + cw > max_width {
            chunks.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(ch);
        width += cw;
    }

    (chunks, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFontMetrics;

    fn wrap(text: &str, max_width: f64) -> Vec<String> {
        // 10pt regular: every character is 5pt wide
        wrap_text(text, max_width, 10.0, &StandardFontMetrics::regular())
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a long piece of text that should be wrapped into multiple lines";
        let lines = wrap(text, 100.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_empty_text() {
        let lines = wrap("", 100.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_words_fill_lines() {
        let lines = wrap("aaaa bbbb cccc", 50.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_text_with_newlines() {
        let lines = wrap("Line 1\n\nLine 3", 200.0);
        assert_eq!(lines, vec!["Line 1", "", "Line 3"]);
    }

    #[test]
    fn test_long_word_split_preserves_characters() {
        let text = "caf\u{00e9}caf\u{00e9}caf\u{00e9}caf\u{00e9}caf\u{00e9}";
        let lines = wrap(text, 30.0);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.join(""), text);
    }

    #[test]
    fn test_long_word_after_short_word() {
        let lines = wrap("ab abcdefghij", 25.0);
        assert_eq!(lines, vec!["ab", "abcde", "fghij"]);
    }

    #[test]
    fn test_narrow_width_keeps_one_char_per_line() {
        let lines = wrap("abc", 1.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
