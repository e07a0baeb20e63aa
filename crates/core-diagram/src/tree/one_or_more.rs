use std::cell::Cell;

use core_geom::{RidgeLine, Vec2};
use core_text::TextMeasure;

use crate::context::{ceil_f64, ConnectionDirection, ConnectionType, LayoutContext, RenderContext};
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;
use crate::tree::{Barrier, Element, LayoutCache, Skip};

/// A forward element taken once, with a repeat element looped underneath
/// that sends control back to the start of the forward element. Plain
/// `zero_or_more` is expressed by wrapping the result in a `Choice` against
/// `Skip`, not as a variant of its own.
#[derive(Debug, Clone)]
pub struct OneOrMore {
    pub forward: Box<Element>,
    pub repeat: Option<Box<Element>>,
    /// Reserved for a future top-aligned repeat rendering; stored but not
    /// yet consulted by layout or render.
    pub repeat_top: bool,
    cache: LayoutCache,

    need_shift_start_arc: Cell<bool>,
    need_shift_end_arc: Cell<bool>,
    additional_start_padding: Cell<i64>,
    additional_end_padding: Cell<i64>,
    start_arc_size: Cell<i64>,
    end_arc_size: Cell<i64>,
    center_offset: Cell<i64>,
    repeat_pos_x_offset: Cell<i64>,
    down_offset: Cell<i64>,
    total_width: Cell<i64>,
    vertical_separation: Cell<i64>,
}

impl OneOrMore {
    /// Builds a one-or-more loop over `forward`, looping back through
    /// `repeat` (or a plain `Skip` if omitted). Collapses to `forward`
    /// outright when both ends of the loop are `Skip`, since a loop with no
    /// forward progress and no repeat separator draws nothing extra.
    pub fn new(forward: Element, repeat: Option<Element>) -> Element {
        let repeat_is_skip = match &repeat {
            None => true,
            Some(Element::Skip(_)) => true,
            Some(_) => false,
        };
        if matches!(forward, Element::Skip(_)) && repeat_is_skip {
            return forward;
        }
        Element::OneOrMore(Self {
            forward: Box::new(Element::Barrier(Barrier::new(forward))),
            repeat: repeat.map(Box::new),
            repeat_top: false,
            cache: LayoutCache::new(),
            need_shift_start_arc: Cell::new(false),
            need_shift_end_arc: Cell::new(false),
            additional_start_padding: Cell::new(0),
            additional_end_padding: Cell::new(0),
            start_arc_size: Cell::new(0),
            end_arc_size: Cell::new(0),
            center_offset: Cell::new(0),
            repeat_pos_x_offset: Cell::new(0),
            down_offset: Cell::new(0),
            total_width: Cell::new(0),
            vertical_separation: Cell::new(0),
        })
    }

    fn repeat_or_skip(&self) -> Element {
        match &self.repeat {
            Some(r) => (**r).clone(),
            None => Element::Skip(Skip::new()),
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
            let need_shift_start_arc =
                !(context.start_top_is_clear && context.start_bottom_is_clear);
            let need_shift_end_arc = !(context.end_top_is_clear && context.end_bottom_is_clear);
            self.need_shift_start_arc.set(need_shift_start_arc);
            self.need_shift_end_arc.set(need_shift_end_arc);

            let vertical_separation = if context.is_outer {
                settings.vertical_choice_separation_outer
            } else {
                settings.vertical_choice_separation
            };
            self.vertical_separation.set(vertical_separation);

            let arc_radius = ceil_f64(settings.arc_radius);
            let arc_size = settings.arc_margin + arc_radius;

            let start_arc_size = context.start_connection.arc_size(settings);
            let additional_start_padding = if need_shift_start_arc {
                arc_size
            } else {
                arc_size.max(start_arc_size) - start_arc_size
            };
            let end_arc_size = context.end_connection.arc_size(settings);
            let additional_end_padding = if need_shift_end_arc {
                arc_size
            } else {
                arc_size.max(end_arc_size) - end_arc_size
            };
            self.start_arc_size.set(start_arc_size);
            self.end_arc_size.set(end_arc_size);
            self.additional_start_padding.set(additional_start_padding);
            self.additional_end_padding.set(additional_end_padding);

            let inner_width =
                (context.width - additional_start_padding - additional_end_padding).max(0);

            let item_ctx = LayoutContext {
                width: inner_width,
                is_outer: false,
                start_connection: context.start_connection,
                start_direction: context.start_direction,
                end_connection: context.end_connection,
                end_direction: context.end_direction,
                allow_shrinking_stacks: context.allow_shrinking_stacks,
                ..LayoutContext::default()
            };
            let (item_box, item_top, item_bottom) =
                self.forward.calculate_layout(settings, &item_ctx, measure, resolver);

            let repeat_ctx = LayoutContext {
                width: inner_width,
                is_outer: false,
                start_connection: ConnectionType::Stack,
                start_top_is_clear: true,
                start_bottom_is_clear: context.end_bottom_is_clear
                    && (need_shift_end_arc || context.end_direction != ConnectionDirection::Down),
                start_direction: ConnectionDirection::Up,
                end_connection: ConnectionType::Stack,
                end_top_is_clear: true,
                end_bottom_is_clear: context.start_bottom_is_clear
                    && (need_shift_start_arc
                        || context.start_direction != ConnectionDirection::Down),
                end_direction: ConnectionDirection::Up,
                allow_shrinking_stacks: false,
                ..LayoutContext::default()
            };
            let repeat_elem = self.repeat_or_skip();
            let (rep_box, rep_top, rep_bottom) =
                repeat_elem.calculate_layout(settings, &repeat_ctx, measure, resolver);

            let width = (item_box.width() + additional_start_padding + additional_end_padding).max(
                rep_box.width() - 2 * arc_size
                    + start_arc_size
                    + end_arc_size
                    + additional_start_padding
                    + additional_end_padding,
            );
            let display_width = (item_box.display_width
                + additional_start_padding
                + additional_end_padding)
                .max(
                    rep_box.display_width - 2 * arc_size
                        + start_arc_size
                        + end_arc_size
                        + additional_start_padding
                        + additional_end_padding,
                );

            let center_offset =
                (start_arc_size + additional_start_padding + width - end_arc_size - additional_end_padding) / 2;
            self.center_offset.set(center_offset);

            let repeat_content_width_l = rep_box.content_width / 2;
            let repeat_content_width_r = rep_box.content_width - repeat_content_width_l;
            self.repeat_pos_x_offset
                .set(rep_box.start_padding + repeat_content_width_r);

            let start_padding = (item_box.start_padding + additional_start_padding)
                .min(center_offset - repeat_content_width_l);
            let start_shift_budget = if need_shift_start_arc {
                start_arc_size + arc_radius
            } else {
                start_arc_size + additional_start_padding - settings.arc_margin
            } - settings.arc_margin
                - arc_radius;
            let start_margin = 0.max(
                start_padding
                    - start_shift_budget
                        .min(item_box.start_padding + additional_start_padding - item_box.start_margin)
                        .min(center_offset - repeat_content_width_l - rep_box.start_margin),
            );

            let end_padding = 0.max(
                width
                    - (item_box.start_padding + additional_start_padding + item_box.content_width)
                        .max(center_offset + repeat_content_width_r),
            );
            let end_shift_budget = if need_shift_end_arc {
                end_arc_size + arc_radius
            } else {
                end_arc_size + additional_end_padding - settings.arc_margin
            };
            let end_margin = 0i64.max(
                (item_box.start_padding
                    + additional_start_padding
                    + item_box.content_width
                    + item_box.end_margin)
                    .max(center_offset + repeat_content_width_r + rep_box.end_margin)
                    - (width - end_padding),
            ).max(end_padding - end_shift_budget + arc_radius + settings.arc_margin);

            let content_width = 0.max(width - start_padding - end_padding);

            let up = item_box.up;
            let down = item_box.down + vertical_separation + rep_box.up + rep_box.height + rep_box.down;
            let down_offset = item_box.down + vertical_separation + rep_box.up;
            self.down_offset.set(down_offset);

            let top = if additional_start_padding > 0 {
                item_top + Vec2::new(additional_start_padding, 0)
            } else {
                item_top
            };

            let repeat_start_connection_pos = if need_shift_start_arc {
                start_arc_size
            } else {
                start_arc_size + additional_start_padding - settings.arc_margin - arc_radius
            };
            let repeat_end_connection_pos = width
                - if need_shift_end_arc {
                    end_arc_size
                } else {
                    end_arc_size + additional_end_padding - settings.arc_margin - arc_radius
                };
            let x_pos = center_offset + rep_box.start_padding + repeat_content_width_r;
            let y_pos = item_box.down + vertical_separation + rep_box.up;
            let bottom = (rep_bottom.reverse(x_pos) + Vec2::new(0, y_pos + rep_box.height))
                .merge(
                    &RidgeLine::new(
                        -(up + down),
                        vec![
                            Vec2::new(repeat_start_connection_pos, down),
                            Vec2::new(repeat_end_connection_pos, 0),
                        ],
                    ),
                    i64::min,
                );

            let boxed = BoxRecord {
                display_width,
                content_width,
                start_padding,
                end_padding,
                start_margin,
                end_margin,
                height: up + down,
                up,
                down,
            };
            self.total_width.set(boxed.width());
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
        let arc_radius = ceil_f64(settings.arc_radius);
        let arc_size = settings.arc_margin + arc_radius;
        let need_shift_start_arc = self.need_shift_start_arc.get();
        let need_shift_end_arc = self.need_shift_end_arc.get();
        let dir = ctx.dir();

        if need_shift_start_arc {
            let mut line = render.line(ctx.start_connection_pos);
            line.horizontal(ctx.start_connection_pos.x + dir * arc_size);
            line.finish();
        }
        if need_shift_end_arc {
            let mut line = render.line(ctx.end_connection_pos);
            line.horizontal(ctx.end_connection_pos.x - dir * arc_size);
            line.finish();
        }

        let additional_start_padding = self.additional_start_padding.get();
        let additional_end_padding = self.additional_end_padding.get();
        let start_arc_size = self.start_arc_size.get();
        let end_arc_size = self.end_arc_size.get();

        let item_ctx = RenderContext {
            pos: Vec2::new(ctx.pos.x + dir * additional_start_padding, ctx.pos.y),
            reverse: ctx.reverse,
            start_connection_pos: Vec2::new(
                ctx.start_connection_pos.x + if need_shift_start_arc { dir * arc_size } else { 0 },
                ctx.start_connection_pos.y,
            ),
            end_connection_pos: Vec2::new(
                ctx.end_connection_pos.x - if need_shift_end_arc { dir * arc_size } else { 0 },
                ctx.end_connection_pos.y,
            ),
        };
        self.forward.render(settings, render, &item_ctx, resolver);

        let repeat_start_connection_pos = Vec2::new(
            ctx.pos.x
                + dir
                    * (if need_shift_start_arc {
                        start_arc_size + arc_radius
                    } else {
                        start_arc_size + additional_start_padding - settings.arc_margin
                    }),
            ctx.pos.y,
        );
        let repeat_end_connection_pos = Vec2::new(
            ctx.pos.x
                + dir
                    * (self.total_width.get()
                        - if need_shift_end_arc {
                            end_arc_size + arc_radius
                        } else {
                            end_arc_size + additional_end_padding - settings.arc_margin
                        }),
            ctx.pos.y,
        );

        let center = Vec2::new(ctx.pos.x + dir * self.center_offset.get(), ctx.pos.y);
        let repeat_pos = Vec2::new(
            center.x + dir * self.repeat_pos_x_offset.get(),
            ctx.pos.y + self.down_offset.get(),
        );

        let repeat_ctx = RenderContext {
            pos: repeat_pos,
            start_connection_pos: repeat_end_connection_pos,
            end_connection_pos: repeat_start_connection_pos,
            reverse: !ctx.reverse,
        };
        self.repeat_or_skip().render(settings, render, &repeat_ctx, resolver);
    }
}
