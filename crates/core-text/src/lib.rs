//! Grapheme segmentation, display-width measurement, and the default
//! [`TextMeasure`] implementation consumed by layout.

pub mod segment;
pub mod width;

pub use width::egc_width;

/// Width and height (in abstract length units) of a rendered block of text.
///
/// A `TextMeasure` is a port: the layout engine never measures glyphs itself,
/// it asks one of these. The text backend uses [`SimpleTextMeasure`]; an SVG
/// caller embedding a real font would supply its own implementation.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> (i64, i64);
}

/// Grapheme-aware measure that treats every cluster as either "narrow" or
/// "wide" (East-Asian width), multiplies by a fixed per-character advance,
/// and multiplies line count by a fixed line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleTextMeasure {
    pub character_advance: f64,
    pub wide_character_advance: f64,
    pub line_height: f64,
}

impl SimpleTextMeasure {
    pub fn new(character_advance: f64, wide_character_advance: f64, line_height: f64) -> Self {
        Self {
            character_advance,
            wide_character_advance,
            line_height,
        }
    }
}

impl TextMeasure for SimpleTextMeasure {
    fn measure(&self, text: &str) -> (i64, i64) {
        if text.is_empty() {
            return (0, self.line_height.ceil() as i64);
        }

        let mut max_advance = 0.0f64;
        let mut num_lines = 0i64;
        for line in text.split_inclusive('\n') {
            num_lines += 1;
            let mut advance = 0.0f64;
            for g in grapheme::iter(line.trim_end_matches('\n')) {
                advance += if grapheme::is_wide(g) {
                    self.wide_character_advance
                } else {
                    self.character_advance
                };
            }
            if advance > max_advance {
                max_advance = advance;
            }
        }

        (max_advance.ceil() as i64, (num_lines as f64 * self.line_height).ceil() as i64)
    }
}

/// Grapheme and display-width utilities operating on a single string slice.
pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in `s`.
    pub fn iter(s: &str) -> impl Iterator<Item = &str> {
        s.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below the first boundary).
    pub fn prev_boundary(s: &str, byte: usize) -> usize {
        if byte == 0 || byte > s.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in s.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns `s.len()` if at or beyond the end).
    pub fn next_boundary(s: &str, byte: usize) -> usize {
        if byte >= s.len() {
            return s.len();
        }
        for (idx, _) in s.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        s.len()
    }

    /// Compute visual column (terminal cells) up to (but not including) `byte`.
    pub fn visual_col(s: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in s.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += egc_width(g) as usize;
        }
        col
    }

    /// Whether a single grapheme cluster occupies two display cells.
    pub fn is_wide(g: &str) -> bool {
        egc_width(g) >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_measure_ascii() {
        let m = SimpleTextMeasure::new(1.0, 2.0, 1.0);
        assert_eq!(m.measure("abc"), (3, 1));
    }

    #[test]
    fn simple_measure_empty() {
        let m = SimpleTextMeasure::new(1.0, 2.0, 1.0);
        assert_eq!(m.measure(""), (0, 1));
    }

    #[test]
    fn simple_measure_multiline_takes_longest_line() {
        let m = SimpleTextMeasure::new(1.0, 2.0, 1.0);
        assert_eq!(m.measure("a\nbcd\nef"), (3, 3));
    }

    #[test]
    fn simple_measure_wide_characters() {
        let m = SimpleTextMeasure::new(1.0, 2.0, 1.0);
        let (w, h) = m.measure("汉字");
        assert_eq!(w, 4);
        assert_eq!(h, 1);
    }

    #[test]
    fn grapheme_boundaries_roundtrip() {
        let s = "a\u{1F600}b";
        let first = grapheme::next_boundary(s, 0);
        let second = grapheme::next_boundary(s, first);
        assert_eq!(grapheme::prev_boundary(s, second), first);
        assert_eq!(grapheme::prev_boundary(s, first), 0);
    }

    #[test]
    fn visual_col_is_monotonic() {
        let s = "a\u{1F600}b\u{6C49}";
        let mut b = 0;
        let mut last = 0;
        while b < s.len() {
            let next = grapheme::next_boundary(s, b);
            let col = grapheme::visual_col(s, next);
            assert!(col >= last);
            last = col;
            b = next;
        }
    }
}
