use core_geom::Vec2;

use crate::context::RenderContext;
use crate::settings::LayoutSettings;

/// A backend's drawing surface. The layout engine never draws directly; it
/// calls into a `Render` implementation at each recursive step so that text
/// and SVG output share one traversal.
pub trait Render {
    type Line<'a>: Line
    where
        Self: 'a;

    /// Begin a straight or curved line segment at `from`, to be extended
    /// with further calls and finished with `Line::finish`.
    fn line(&mut self, from: Vec2) -> Self::Line<'_>;

    /// Draw a node's label box at `pos` with the given display text and
    /// style hint. `href`/`title` carry whatever `HrefResolver` resolved
    /// them to, already text-only; a backend with no notion of hyperlinks
    /// is free to ignore both.
    fn node(
        &mut self,
        pos: Vec2,
        width: i64,
        text: &str,
        style: crate::settings::NodeStyle,
        href: Option<&str>,
        title: Option<&str>,
    );

    /// Draw a group's surrounding box.
    fn group_box(&mut self, pos: Vec2, width: i64, height: i64);

    /// Draw the start or end cap of the outermost diagram.
    fn end(&mut self, pos: Vec2, class: crate::settings::EndClass, is_start: bool);
}

/// An in-progress line being built up by successive moves, closed out with
/// `finish`. Implementations translate these moves into glyph runs or SVG
/// path commands.
pub trait Line {
    fn horizontal(&mut self, to_x: i64);
    fn vertical(&mut self, to_y: i64);
    /// A quarter-circle arc bending from the current heading onto the
    /// opposite axis; `dx`/`dy` give the signed displacement of the arc's
    /// far endpoint relative to its near endpoint.
    fn arc(&mut self, dx: i64, dy: i64);
    fn finish(self);
}

/// Resolves a `Node`'s optional href into backend-specific markup (an SVG
/// `<a>` wrapper, or nothing for plain text). Kept generic so `core-diagram`
/// never depends on a markup format directly.
pub trait HrefResolver {
    fn resolve(&self, href: &str) -> Option<String>;
}

/// An `HrefResolver` that never links anything, used when a caller has no
/// use for hyperlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHrefs;

impl HrefResolver for NoHrefs {
    fn resolve(&self, _href: &str) -> Option<String> {
        None
    }
}

/// Bundles the pieces a `render` call needs beyond the element tree itself.
pub struct RenderEnv<'a, R: Render> {
    pub settings: &'a LayoutSettings,
    pub render: &'a mut R,
    pub ctx: RenderContext,
}
