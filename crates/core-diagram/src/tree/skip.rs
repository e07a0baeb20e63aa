use core_geom::RidgeLine;

use crate::context::{LayoutContext, RenderContext};
use crate::isolation;
use crate::layout::BoxRecord;
use crate::ports::Render;
use crate::settings::LayoutSettings;
use crate::tree::LayoutCache;

/// A straight line with nothing on it; the identity element for `Sequence`.
#[derive(Debug, Clone, Default)]
pub struct Skip {
    cache: LayoutCache,
}

impl Skip {
    pub fn new() -> Self {
        Self {
            cache: LayoutCache::new(),
        }
    }

    pub fn calculate_layout(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            let (_inner, iso) = isolation::isolate(settings, context, true, true);
            let boxed = BoxRecord {
                display_width: 0,
                content_width: 0,
                start_padding: 0,
                end_padding: 0,
                start_margin: 0,
                end_margin: 0,
                height: 0,
                up: 0,
                down: 0,
            };
            isolation::apply_isolation(settings, &iso, boxed, RidgeLine::flat(0), RidgeLine::flat(0))
        })
    }

    pub fn render<R: Render>(&self, _settings: &LayoutSettings, render: &mut R, ctx: &RenderContext) {
        let mut line = render.line(ctx.start_connection_pos);
        line.horizontal(ctx.end_connection_pos.x);
        line.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_has_zero_size() {
        let skip = Skip::new();
        let settings = LayoutSettings::text_defaults();
        let (boxed, top, bottom) = skip.calculate_layout(&settings, &LayoutContext::default());
        assert_eq!(boxed.width(), 0);
        assert_eq!(boxed.height, 0);
        assert_eq!(top, RidgeLine::flat(0));
        assert_eq!(bottom, RidgeLine::flat(0));
    }
}
