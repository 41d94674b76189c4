//! Text Measurement
//!
//! Utilities for sizing text in terminal cells, plus a ready-made
//! [`MeasureFunc`] for text leaves.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width and control characters: 0 cells
//!
//! Wrapping is greedy on whitespace. A word wider than the line is broken
//! between characters.

use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

use crate::engine::{MeasureFunc, NodeId};
use crate::types::{MeasureMode, Size};

/// Width of one character in terminal cells.
#[inline]
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Measure the display width of a string in terminal cells.
///
/// Newlines are not special here; see [`measure_text`] for multi-line text.
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Word-wrap text to a given width.
///
/// Explicit newlines always break. Whitespace between words is collapsed
/// at line breaks; a zero width disables wrapping.
///
/// # Returns
///
/// The lines, without trailing whitespace. Empty text has no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return text.split('\n').map(str::to_owned).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = string_width(word);
            let gap = usize::from(!line.is_empty());

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // Too wide for any line: break between characters.
            for c in word.chars() {
                let w = char_width(c);
                if line_width + w > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
        lines.push(line);
    }
    lines
}

/// Size of `text` laid out within `max_width` cells, or unwrapped when
/// `None`. Width is the widest line, height the line count.
pub fn measure_text(text: &str, max_width: Option<usize>) -> Size<usize> {
    let lines = match max_width {
        Some(width) => wrap_text(text, width.max(1)),
        None if text.is_empty() => Vec::new(),
        None => text.split('\n').map(str::to_owned).collect(),
    };
    let width = lines.iter().map(|line| string_width(line)).max().unwrap_or(0);
    Size::new(width, lines.len())
}

/// Build a measure function sizing `text` in terminal cells.
///
/// Exact axes take the offered size. An at-most width wraps the text to
/// it; an at-most height caps the line count.
pub fn text_measure_func(text: impl Into<String>) -> MeasureFunc {
    let text: String = text.into();
    Arc::new(
        move |_node: NodeId, width: Option<f32>, width_mode: MeasureMode, height: Option<f32>, height_mode: MeasureMode| {
            let wrap_at = match (width_mode, width) {
                (MeasureMode::Undefined, _) | (_, None) => None,
                (_, Some(w)) => Some(w.max(0.0).floor() as usize),
            };
            let size = measure_text(&text, wrap_at);
            let content_width = size.width as f32;
            let content_height = size.height as f32;

            let fit = |mode: MeasureMode, offered: Option<f32>, content: f32| match (mode, offered) {
                (MeasureMode::Exactly, Some(offered)) => offered,
                (MeasureMode::AtMost, Some(offered)) => content.min(offered),
                _ => content,
            };
            Size::new(
                fit(width_mode, width, content_width),
                fit(height_mode, height, content_height),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LayoutTree;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_wide_and_zero_width() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("a\u{200b}b"), 2);
    }

    #[test]
    fn test_wrap_text_words() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_text("a b c d", 3), vec!["a b", "c d"]);
    }

    #[test]
    fn test_wrap_text_long_word() {
        assert_eq!(wrap_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_text("hi abcdef", 4), vec!["hi", "abcd", "ef"]);
    }

    #[test]
    fn test_wrap_text_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn test_wrap_text_wide_chars() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_measure_text() {
        assert_eq!(measure_text("hello world", None), Size::new(11, 1));
        assert_eq!(measure_text("hello world", Some(5)), Size::new(5, 2));
        assert_eq!(measure_text("ab\nabcd", None), Size::new(4, 2));
        assert_eq!(measure_text("", Some(5)), Size::new(0, 0));
    }

    #[test]
    fn test_measure_func_modes() {
        let measure = text_measure_func("hello world");
        let mut tree = LayoutTree::new();
        let id = tree.new_node();

        let unbounded = measure(id, None, MeasureMode::Undefined, None, MeasureMode::Undefined);
        assert_eq!(unbounded, Size::new(11.0, 1.0));

        let wrapped = measure(id, Some(7.5), MeasureMode::AtMost, None, MeasureMode::Undefined);
        assert_eq!(wrapped, Size::new(5.0, 2.0));

        let exact = measure(id, Some(20.0), MeasureMode::Exactly, Some(1.0), MeasureMode::AtMost);
        assert_eq!(exact, Size::new(20.0, 1.0));
    }
}
