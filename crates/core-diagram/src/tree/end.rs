use core_geom::RidgeLine;

use crate::context::{LayoutContext, RenderContext};
use crate::layout::BoxRecord;
use crate::ports::Render;
use crate::settings::{EndClass, LayoutSettings};
use crate::tree::LayoutCache;

/// The start or end cap of the outermost diagram.
#[derive(Debug, Clone)]
pub struct End {
    pub class: EndClass,
    pub is_start: bool,
    cache: LayoutCache,
}

impl End {
    pub fn new(class: EndClass, is_start: bool) -> Self {
        Self {
            class,
            is_start,
            cache: LayoutCache::new(),
        }
    }

    pub fn calculate_layout(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            let width = match self.class {
                EndClass::Simple => 0,
                EndClass::Complex => settings.marker_width,
            };
            let boxed = BoxRecord {
                display_width: width,
                content_width: width,
                start_padding: 0,
                end_padding: 0,
                start_margin: 0,
                end_margin: 0,
                height: 0,
                up: 0,
                down: 0,
            };
            (boxed, RidgeLine::flat(0), RidgeLine::flat(0))
        })
    }

    pub fn render<R: Render>(&self, _settings: &LayoutSettings, render: &mut R, ctx: &RenderContext) {
        render.end(ctx.pos, self.class, self.is_start);
    }
}
