use core_geom::RidgeLine;
use core_text::TextMeasure;

use crate::context::{LayoutContext, RenderContext};
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;
use crate::tree::Element;

/// Forces its child to be measured as if it were the outermost element,
/// resetting connection context. Used to break an otherwise-unbounded
/// recursive width dependency (e.g. a self-referential rule drawn inline).
#[derive(Debug, Clone)]
pub struct Barrier {
    pub child: Box<Element>,
}

impl Barrier {
    pub fn new(child: Element) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn calculate_layout<M: TextMeasure>(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        // Barrier's "as if outer" semantics are exactly an isolation of both
        // ends plus the opt-line hooks, which `LayoutContext::default`
        // already has cleared; width/outer-ness are the only fields worth
        // keeping from the real context.
        let isolated = LayoutContext {
            width: context.width,
            is_outer: context.is_outer,
            ..LayoutContext::default()
        };
        self.child.calculate_layout(settings, &isolated, measure, resolver)
    }

    pub fn render<R: Render>(
        &self,
        settings: &LayoutSettings,
        render: &mut R,
        ctx: &RenderContext,
        resolver: &dyn HrefResolver,
    ) {
        self.child.render(settings, render, ctx, resolver);
    }
}
