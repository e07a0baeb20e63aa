use core_geom::{RidgeLine, Vec2};
use core_text::TextMeasure;

use crate::context::{LayoutContext, RenderContext};
use crate::hidden_symbols::reveal_hidden_symbols;
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::{LayoutSettings, NodeStyle};
use crate::tree::LayoutCache;

/// A single labeled box: a terminal, non-terminal reference, or comment.
#[derive(Debug, Clone)]
pub struct Node {
    pub text: String,
    pub style: NodeStyle,
    pub href: Option<String>,
    /// Tooltip text, carried through to the backend unchanged.
    pub title: Option<String>,
    /// Extra CSS class a backend may attach to this node's box.
    pub css_class: String,
    /// Whether `href` should be run through the caller's `HrefResolver`
    /// before rendering. `false` passes `href` through verbatim.
    pub resolve: bool,
    cache: LayoutCache,
}

impl Node {
    pub fn new(text: impl Into<String>, style: NodeStyle) -> Self {
        Self {
            text: text.into(),
            style,
            href: None,
            title: None,
            css_class: String::new(),
            resolve: true,
            cache: LayoutCache::new(),
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = css_class.into();
        self
    }

    /// Suppresses `HrefResolver` for this node's `href`, so it's passed to
    /// the backend exactly as given.
    pub fn without_resolving(mut self) -> Self {
        self.resolve = false;
        self
    }

    /// Label text with control and otherwise invisible characters escaped
    /// per `settings.hidden_symbol_escape`, ready to hand to a measurer or
    /// backend.
    pub fn display_text(&self, settings: &LayoutSettings) -> String {
        let escape = (
            settings.hidden_symbol_escape.0.as_str(),
            settings.hidden_symbol_escape.1.as_str(),
        );
        reveal_hidden_symbols(&self.text, escape)
    }

    fn resolved_href(&self, resolver: &dyn HrefResolver) -> Option<String> {
        let href = self.href.as_deref()?;
        if self.resolve {
            resolver.resolve(href)
        } else {
            Some(href.to_string())
        }
    }

    pub fn calculate_layout(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &impl TextMeasure,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            // Resolving the href doesn't change layout, but it's computed
            // here (rather than at render time) to match the step order a
            // resolver might rely on (e.g. one that also validates text).
            let _ = self.resolved_href(resolver);

            let (text_width, text_height) = measure.measure(&self.display_text(settings));
            let horizontal_padding = settings.node_start_padding.max(settings.node_end_padding);
            let content_width = text_width + 2 * horizontal_padding;
            let display_width = content_width;
            let height = text_height + 2 * settings.node_vertical_padding;
            let up_down = div_ceil(text_height, 2) + settings.node_vertical_padding;

            let start_margin = settings.horizontal_seq_separation;
            let end_margin = settings.horizontal_seq_separation;

            let boxed = BoxRecord {
                display_width,
                content_width,
                start_padding: horizontal_padding,
                end_padding: horizontal_padding,
                start_margin,
                end_margin,
                height,
                up: up_down,
                down: up_down,
            };
            (boxed, RidgeLine::flat(up_down), RidgeLine::flat(up_down))
        })
    }

    pub fn render<R: Render>(
        &self,
        settings: &LayoutSettings,
        render: &mut R,
        ctx: &RenderContext,
        resolver: &dyn HrefResolver,
    ) {
        let mut line = render.line(ctx.start_connection_pos);
        line.horizontal(ctx.pos.x);
        line.finish();

        let (boxed, _, _) = self
            .cache
            .cached()
            .expect("render called before calculate_layout");
        let href = self.resolved_href(resolver);
        render.node(
            Vec2::new(ctx.pos.x, ctx.pos.y),
            boxed.display_width,
            &self.display_text(settings),
            self.style,
            href.as_deref(),
            self.title.as_deref(),
        );

        let mut tail = render.line(Vec2::new(ctx.pos.x + boxed.display_width, ctx.pos.y));
        tail.horizontal(ctx.end_connection_pos.x);
        tail.finish();
    }
}

/// `ceil(a / b)` for non-negative `b`.
fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}
