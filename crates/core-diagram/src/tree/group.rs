use core_geom::RidgeLine;
use core_text::TextMeasure;

use crate::context::{LayoutContext, RenderContext};
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;
use crate::tree::{Element, LayoutCache};

/// Draws a dashed box around its child, with an optional caption above it.
/// Doesn't change the child's connection points, only adds surrounding
/// padding and a thicker top/bottom margin for the box's own border.
#[derive(Debug, Clone)]
pub struct Group {
    pub child: Box<Element>,
    pub caption: Option<String>,
    cache: LayoutCache,
}

impl Group {
    pub fn new(child: Element, caption: Option<String>) -> Self {
        Self {
            child: Box::new(child),
            caption,
            cache: LayoutCache::new(),
        }
    }

    pub fn calculate_layout<M: TextMeasure>(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            let (child_box, child_top, child_bottom) =
                self.child.calculate_layout(settings, context, measure, resolver);

            // The box's own border adds thickness to both the vertical
            // margins and the horizontal display width; a caption, when
            // present, adds its line height on top of that.
            let caption_height = self
                .caption
                .as_ref()
                .map(|c| measure.measure(c).1 + settings.group_vertical_padding)
                .unwrap_or(0);

            let up = child_box.up + settings.group_thickness + settings.group_vertical_padding
                + caption_height;
            let down = child_box.down + settings.group_thickness + settings.group_vertical_padding;

            let boxed = BoxRecord {
                display_width: child_box.display_width + 2 * settings.group_thickness,
                content_width: child_box.content_width,
                start_padding: child_box.start_padding + settings.group_thickness,
                end_padding: child_box.end_padding + settings.group_thickness,
                start_margin: child_box.start_margin,
                end_margin: child_box.end_margin,
                height: up + down,
                up,
                down,
            };

            let top = child_top.merge(&RidgeLine::flat(up), i64::max);
            let bottom = child_bottom.merge(&RidgeLine::flat(down), i64::max);
            (boxed, top, bottom)
        })
    }

    pub fn render<R: Render>(
        &self,
        settings: &LayoutSettings,
        render: &mut R,
        ctx: &RenderContext,
        resolver: &dyn HrefResolver,
    ) {
        let (boxed, _, _) = self
            .cache
            .cached()
            .expect("render called before calculate_layout");
        render.group_box(ctx.pos, boxed.display_width, boxed.height);
        self.child.render(settings, render, ctx, resolver);
    }
}
