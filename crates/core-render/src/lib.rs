//! Diagram backends: a Unicode text-grid renderer and an SVG renderer, both
//! implementing `core_diagram`'s `Render`/`Line` ports over the same
//! element tree.
//!
//! Invariants:
//! - A grid cell holds the full grapheme cluster for its leader column;
//!   continuation columns of a wide cluster stay empty and are never
//!   printed over.
//! - Both backends consume the same `BoxRecord`/ridge-line layout output;
//!   neither recomputes widths, they only translate positions into glyphs
//!   or path commands.

pub mod svg;
pub mod text;

pub use svg::SvgRender;
pub use text::TextRender;
