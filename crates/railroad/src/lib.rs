//! Public facade: build an [`Element`] tree, then render it to a Unicode
//! text diagram or an SVG document.

use core_config::{RenderConfig, SvgRenderSettings, TextRenderSettings};
pub use core_diagram::{
    Choice, ConnectionType, DiagramError, Element, End, EndClass, Group, HrefResolver,
    LoadingError, Node, NodeStyle, NoHrefs, OneOrMore, Sequence, Skip,
};
use core_diagram::{LayoutContext, LayoutSettings};
use core_render::{SvgRender, TextRender};
use core_text::SimpleTextMeasure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RailroadError {
    #[error(transparent)]
    Diagram(#[from] DiagramError),
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

/// Renders `root` as a Unicode text diagram using `settings` (or built-in
/// defaults when `None`). `href`s are never resolved in text output.
pub fn render_text(root: &Element, settings: Option<&TextRenderSettings>) -> String {
    let owned;
    let settings = match settings {
        Some(s) => s,
        None => {
            owned = TextRenderSettings::default();
            &owned
        }
    };
    let layout_settings = settings.layout_settings();
    let measure = SimpleTextMeasure::new(1.0, 2.0, 1.0);
    let context = outer_context(settings.end_class(), layout_settings.max_width);

    let (boxed, _, _) = root.calculate_layout(&layout_settings, &context, &measure, &NoHrefs);
    let mut render = TextRender::new();
    let ctx = outer_render_context(&boxed);
    root.render(&layout_settings, &mut render, &ctx, &NoHrefs);
    render.into_text()
}

/// Renders `root` as an SVG document, returning the serialized XML.
/// `resolver` turns a `Node`'s `href` into the link the SVG's `<a>` wrapper
/// points at; pass `&NoHrefs` when the tree carries no hyperlinks.
pub fn render_svg(
    root: &Element,
    settings: Option<&SvgRenderSettings>,
    resolver: &dyn HrefResolver,
) -> String {
    let owned;
    let settings = match settings {
        Some(s) => s,
        None => {
            owned = SvgRenderSettings::default();
            &owned
        }
    };
    let layout_settings = settings.layout_settings();
    let measure = SimpleTextMeasure::new(
        settings.character_advance,
        settings.wide_character_advance,
        settings.line_height,
    );
    let context = outer_context(settings.end_class(), layout_settings.max_width);

    let (boxed, _, _) = root.calculate_layout(&layout_settings, &context, &measure, resolver);
    let mut render = SvgRender::new();
    let ctx = outer_render_context(&boxed);
    root.render(&layout_settings, &mut render, &ctx, resolver);

    let doc = render.into_document(boxed.width(), boxed.height);
    format!("<style>{}</style>{}", settings.css(), doc.to_xml())
}

fn outer_context(end_class: EndClass, max_width: Option<i64>) -> LayoutContext {
    let connection = match end_class {
        EndClass::Simple => ConnectionType::Null,
        EndClass::Complex => ConnectionType::Normal,
    };
    LayoutContext {
        width: max_width.unwrap_or(i64::MAX),
        is_outer: true,
        start_connection: connection,
        start_top_is_clear: true,
        start_bottom_is_clear: true,
        end_connection: connection,
        end_top_is_clear: true,
        end_bottom_is_clear: true,
        ..LayoutContext::default()
    }
}

fn outer_render_context(boxed: &core_diagram::BoxRecord) -> core_diagram::RenderContext {
    use core_geom::Vec2;
    core_diagram::RenderContext {
        pos: Vec2::new(boxed.start_margin, boxed.up),
        start_connection_pos: Vec2::new(0, boxed.up),
        end_connection_pos: Vec2::new(boxed.width(), boxed.up),
        reverse: false,
    }
}

/// Re-exported so callers can load a config file without an extra
/// dependency on `core-config`.
pub use core_config::RenderConfig as Config;

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(text: &str) -> Element {
        Element::Node(Node::new(text, NodeStyle::NonTerminal))
    }

    #[test]
    fn renders_a_single_node_as_text() {
        let root = identifier("expr");
        let text = render_text(&root, None);
        assert!(text.contains("expr"));
    }

    #[test]
    fn renders_a_single_node_as_svg() {
        let root = identifier("expr");
        let svg = render_svg(&root, None, &NoHrefs);
        assert!(svg.contains("<svg"));
        assert!(svg.contains(">expr<"));
    }

    #[test]
    fn renders_a_sequence() {
        let root = Element::Sequence(
            Sequence::new(vec![identifier("a"), identifier("b")]).unwrap(),
        );
        let text = render_text(&root, None);
        assert!(text.contains('a'));
        assert!(text.contains('b'));
    }

    #[test]
    fn config_is_reexported() {
        let _: Config = Config::default();
    }
}
