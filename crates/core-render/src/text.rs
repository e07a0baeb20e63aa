use std::collections::HashMap;

use core_diagram::{EndClass, Line, NodeStyle, Render};
use core_geom::Vec2;

/// Bitmask of the four directions a line glyph occupies, used to merge two
/// glyphs that cross the same cell into a single box-drawing character.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
struct DirMask(u8);

const UP: u8 = 0b0001;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;

fn mask_to_char(mask: u8) -> char {
    match mask {
        m if m == LEFT | RIGHT => '─',
        m if m == UP | DOWN => '│',
        m if m == DOWN | RIGHT => '╭',
        m if m == DOWN | LEFT => '╮',
        m if m == UP | RIGHT => '╰',
        m if m == UP | LEFT => '╯',
        m if m == UP | DOWN | RIGHT => '├',
        m if m == UP | DOWN | LEFT => '┤',
        m if m == LEFT | RIGHT | DOWN => '┬',
        m if m == LEFT | RIGHT | UP => '┴',
        m if m == UP | DOWN | LEFT | RIGHT => '┼',
        RIGHT => '╴',
        LEFT => '╴',
        UP => '╵',
        DOWN => '╵',
        _ => ' ',
    }
}

/// A sparse character grid addressed by integer (x, y); absent cells render
/// as blank.
#[derive(Debug, Default)]
pub struct TextRender {
    cells: HashMap<(i64, i64), char>,
    masks: HashMap<(i64, i64), u8>,
}

impl TextRender {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, x: i64, y: i64, c: char) {
        self.cells.insert((x, y), c);
    }

    fn add_mask(&mut self, x: i64, y: i64, bits: u8) {
        let combined = self.masks.entry((x, y)).or_insert(0);
        *combined |= bits;
        self.cells.insert((x, y), mask_to_char(*combined));
    }

    /// Flattens the grid into lines of text, left edge at x = 0, top edge
    /// at y = 0, regardless of how far negative any coordinate reached.
    pub fn into_text(self) -> String {
        if self.cells.is_empty() {
            return String::new();
        }
        let min_x = self.cells.keys().map(|p| p.0).min().unwrap();
        let max_x = self.cells.keys().map(|p| p.0).max().unwrap();
        let min_y = self.cells.keys().map(|p| p.1).min().unwrap();
        let max_y = self.cells.keys().map(|p| p.1).max().unwrap();

        let mut out = String::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                out.push(*self.cells.get(&(x, y)).unwrap_or(&' '));
            }
            out.push('\n');
        }
        out
    }
}

impl Render for TextRender {
    type Line<'a> = TextLine<'a>;

    fn line(&mut self, from: Vec2) -> TextLine<'_> {
        TextLine {
            render: self,
            pos: from,
        }
    }

    fn node(
        &mut self,
        pos: Vec2,
        width: i64,
        text: &str,
        style: NodeStyle,
        _href: Option<&str>,
        _title: Option<&str>,
    ) {
        let (lb, rb) = match style {
            NodeStyle::Terminal => ('(', ')'),
            NodeStyle::NonTerminal => ('[', ']'),
            NodeStyle::Comment => ('/', '/'),
        };
        self.put(pos.x, pos.y, lb);
        let mut x = pos.x + 1;
        for g in core_text::grapheme::iter(text) {
            for ch in g.chars() {
                self.put(x, pos.y, ch);
                break;
            }
            x += if core_text::grapheme::is_wide(g) { 2 } else { 1 };
        }
        self.put(pos.x + width - 1, pos.y, rb);
    }

    fn group_box(&mut self, pos: Vec2, width: i64, height: i64) {
        for x in pos.x..pos.x + width {
            self.put(x, pos.y, '-');
            self.put(x, pos.y + height - 1, '-');
        }
        for y in pos.y..pos.y + height {
            self.put(pos.x, y, '.');
            self.put(pos.x + width - 1, y, '.');
        }
    }

    fn end(&mut self, pos: Vec2, class: EndClass, is_start: bool) {
        match class {
            EndClass::Simple => self.put(pos.x, pos.y, '─'),
            EndClass::Complex => {
                let glyph = if is_start { '├' } else { '┤' };
                self.put(pos.x, pos.y, glyph);
            }
        }
    }
}

pub struct TextLine<'a> {
    render: &'a mut TextRender,
    pos: Vec2,
}

impl Line for TextLine<'_> {
    fn horizontal(&mut self, to_x: i64) {
        let (lo, hi) = if to_x >= self.pos.x {
            (self.pos.x, to_x)
        } else {
            (to_x, self.pos.x)
        };
        for x in lo..=hi {
            self.render.add_mask(x, self.pos.y, LEFT | RIGHT);
        }
        self.pos.x = to_x;
    }

    fn vertical(&mut self, to_y: i64) {
        let (lo, hi) = if to_y >= self.pos.y {
            (self.pos.y, to_y)
        } else {
            (to_y, self.pos.y)
        };
        for y in lo..=hi {
            self.render.add_mask(self.pos.x, y, UP | DOWN);
        }
        self.pos.y = to_y;
    }

    fn arc(&mut self, dx: i64, dy: i64) {
        let bits = match (dx.signum(), dy.signum()) {
            (1, 1) | (-1, -1) => DOWN | RIGHT,
            (1, -1) | (-1, 1) => UP | RIGHT,
            _ => LEFT | RIGHT,
        };
        self.render.add_mask(self.pos.x, self.pos.y, bits);
        self.pos = Vec2::new(self.pos.x + dx, self.pos.y + dy);
    }

    fn finish(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_fills_cells() {
        let mut render = TextRender::new();
        {
            let mut line = render.line(Vec2::new(0, 0));
            line.horizontal(3);
            line.finish();
        }
        let text = render.into_text();
        assert_eq!(text.trim_end(), "────");
    }

    #[test]
    fn node_draws_brackets() {
        let mut render = TextRender::new();
        render.node(Vec2::new(0, 0), 5, "ab", NodeStyle::Terminal, None, None);
        let text = render.into_text();
        assert!(text.starts_with('('));
        assert!(text.trim_end().ends_with(')'));
    }
}
