mod barrier;
mod choice;
mod end;
mod group;
mod node;
mod one_or_more;
mod sequence;
mod skip;

pub use barrier::Barrier;
pub use choice::Choice;
pub use end::End;
pub use group::Group;
pub use node::Node;
pub use one_or_more::OneOrMore;
pub use sequence::Sequence;
pub use skip::Skip;

use std::cell::RefCell;

use core_geom::RidgeLine;

use crate::context::{LayoutContext, RenderContext};
use crate::layout::{BoxRecord, LayoutCacheEntry};
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;

/// A node in a diagram's element tree. Variants mirror the building blocks a
/// grammar rule is assembled from: atomic pieces (`Skip`, `Node`, `End`),
/// structural combinators (`Sequence`, `Choice`, `OneOrMore`), and two
/// wrappers that don't change layout math (`Barrier`, `Group`).
#[derive(Debug, Clone)]
pub enum Element {
    Skip(Skip),
    Node(Node),
    Sequence(Sequence),
    Choice(Choice),
    OneOrMore(OneOrMore),
    Barrier(Barrier),
    Group(Group),
    End(End),
}

/// Per-instance memoization slot, embedded in every element so repeated
/// `calculate_layout` calls with an unchanged `(settings, context)` are
/// free.
#[derive(Debug, Default)]
pub struct LayoutCache(RefCell<Option<LayoutCacheEntry>>);

impl LayoutCache {
    pub fn new() -> Self {
        Self(RefCell::new(None))
    }

    pub fn get_or_compute(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        compute: impl FnOnce() -> (BoxRecord, RidgeLine, RidgeLine),
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        if let Some(entry) = self.0.borrow().as_ref() {
            if entry.matches(settings, context) {
                return (entry.boxed.clone(), entry.top.clone(), entry.bottom.clone());
            }
        }
        let (boxed, top, bottom) = compute();
        *self.0.borrow_mut() = Some(LayoutCacheEntry {
            settings: settings.clone(),
            context: context.clone(),
            boxed: boxed.clone(),
            top: top.clone(),
            bottom: bottom.clone(),
        });
        (boxed, top, bottom)
    }

    pub fn cached(&self) -> Option<(BoxRecord, RidgeLine, RidgeLine)> {
        self.0
            .borrow()
            .as_ref()
            .map(|e| (e.boxed.clone(), e.top.clone(), e.bottom.clone()))
    }
}

impl Clone for LayoutCache {
    fn clone(&self) -> Self {
        Self(RefCell::new(self.0.borrow().clone()))
    }
}

impl Element {
    /// Computes (and memoizes) this element's box metrics and the ridge
    /// lines describing its top/bottom silhouette. `measure` is consulted
    /// only by `Node`s; every combinator just threads it through.
    pub fn calculate_layout<M: core_text::TextMeasure>(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        match self {
            Element::Skip(e) => e.calculate_layout(settings, context),
            Element::Node(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::Sequence(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::Choice(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::OneOrMore(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::Barrier(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::Group(e) => e.calculate_layout(settings, context, measure, resolver),
            Element::End(e) => e.calculate_layout(settings, context),
        }
    }

    /// Draws this element via `render`, assuming `calculate_layout` was
    /// already called with the same `settings`/the context `render_ctx` was
    /// derived from.
    pub fn render<R: Render>(
        &self,
        settings: &LayoutSettings,
        render: &mut R,
        render_ctx: &RenderContext,
        resolver: &dyn HrefResolver,
    ) {
        match self {
            Element::Skip(e) => e.render(settings, render, render_ctx),
            Element::Node(e) => e.render(settings, render, render_ctx, resolver),
            Element::Sequence(e) => e.render(settings, render, render_ctx, resolver),
            Element::Choice(e) => e.render(settings, render, render_ctx, resolver),
            Element::OneOrMore(e) => e.render(settings, render, render_ctx, resolver),
            Element::Barrier(e) => e.render(settings, render, render_ctx, resolver),
            Element::Group(e) => e.render(settings, render, render_ctx, resolver),
            Element::End(e) => e.render(settings, render, render_ctx),
        }
    }
}
