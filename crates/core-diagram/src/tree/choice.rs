use std::cell::{Cell, RefCell};

use core_geom::{RidgeLine, Vec2};
use core_text::TextMeasure;

use crate::context::{ConnectionDirection, ConnectionType, LayoutContext, RenderContext};
use crate::error::LoadingError;
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;
use crate::tree::{Element, LayoutCache};

/// One branch taken to the exclusion of the others. Branches stack
/// vertically around a default branch drawn on the through line; everything
/// above routes up, everything below routes down.
#[derive(Debug, Clone)]
pub struct Choice {
    pub branches: Vec<Element>,
    pub default: usize,
    /// `true` if exactly one branch is `Skip`, making this choice an
    /// optional rather than a true multi-way choice.
    has_skip: bool,
    cache: LayoutCache,
    /// y offset of each branch's spine relative to the through line,
    /// computed during layout and consumed by render.
    offsets: RefCell<Vec<i64>>,
    /// Whether this choice absorbed the outer `opt_enter_*`/`opt_exit_*`
    /// hooks advertised by its parent, set during layout and read by render.
    connect_opt_enter: Cell<bool>,
    connect_opt_exit: Cell<bool>,
}

fn skip_index(branches: &[Element]) -> Option<usize> {
    branches.iter().position(|b| matches!(b, Element::Skip(_)))
}

/// Whether `element` is itself an optional `Choice`, and so can donate a
/// bypass line to a neighbor's `opt_enter`/`opt_exit` advertisement.
fn can_use_opt_line(element: &Element) -> bool {
    matches!(element, Element::Choice(c) if c.has_skip)
}

impl Choice {
    pub fn new(branches: Vec<Element>, default: usize) -> Result<Self, LoadingError> {
        if branches.len() < 2 {
            return Err(LoadingError::TooFewChoiceBranches);
        }
        if default >= branches.len() {
            return Err(LoadingError::ChoiceDefaultOutOfRange {
                default,
                len: branches.len(),
            });
        }
        let has_skip = skip_index(&branches).is_some();
        Ok(Self {
            branches,
            default,
            has_skip,
            cache: LayoutCache::new(),
            offsets: RefCell::new(Vec::new()),
            connect_opt_enter: Cell::new(false),
            connect_opt_exit: Cell::new(false),
        })
    }

    pub fn calculate_layout<M: TextMeasure>(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            // An optional's own Skip branch can be absorbed into whichever
            // bypass line the parent already advertises, rather than
            // drawing its own arc pair. When both an enter and an exit
            // land on the same side, they're the same line and nothing
            // extra needs to be drawn; otherwise we note each side we can
            // absorb so the margin and connection type account for it.
            let (mut connect_opt_enter, mut connect_opt_exit) = (false, false);
            if self.has_skip {
                let same_side = (context.opt_enter_top && context.opt_exit_top)
                    || (context.opt_enter_bottom && context.opt_exit_bottom);
                if !same_side {
                    if context.opt_enter_top || context.opt_enter_bottom {
                        connect_opt_enter = true;
                    }
                    if context.opt_exit_top || context.opt_exit_bottom {
                        connect_opt_exit = true;
                    }
                }
            }
            self.connect_opt_enter.set(connect_opt_enter);
            self.connect_opt_exit.set(connect_opt_exit);

            // Every non-trivial choice splits the line into its branches;
            // only a context that's already isolated down to a single
            // surviving branch (not modeled here: branch-count stays fixed)
            // would keep a plain connection.
            let start_connection = if matches!(
                context.start_connection,
                ConnectionType::Normal | ConnectionType::StackBound
            ) {
                ConnectionType::Split
            } else {
                context.start_connection
            };
            let end_connection = if matches!(
                context.end_connection,
                ConnectionType::Normal | ConnectionType::StackBound
            ) {
                ConnectionType::Split
            } else {
                context.end_connection
            };

            // The Skip branch's immediate neighbors may donate their own
            // bypass line to an advertisement the parent already made,
            // provided the other side of the same line isn't also being
            // claimed by the opposite neighbor (which would let input skip
            // both optional neighbors at once through one shared line).
            let mut prev_can_enter = false;
            let mut prev_can_exit = false;
            let mut next_can_enter = false;
            let mut next_can_exit = false;
            if let Some(skip_at) = skip_index(&self.branches) {
                if skip_at > 0 {
                    let prev = &self.branches[skip_at - 1];
                    prev_can_enter = can_use_opt_line(prev);
                    prev_can_exit = can_use_opt_line(prev);
                }
                if skip_at + 1 < self.branches.len() {
                    let next = &self.branches[skip_at + 1];
                    next_can_enter = can_use_opt_line(next);
                    next_can_exit = can_use_opt_line(next);
                }
            }
            if prev_can_enter {
                next_can_exit = false;
            }
            if next_can_enter {
                prev_can_exit = false;
            }
            if prev_can_exit {
                next_can_enter = false;
            }
            if next_can_exit {
                prev_can_enter = false;
            }

            let vertical_separation = if self
                .branches
                .iter()
                .any(|b| matches!(b, Element::Choice(c) if !c.has_skip || c.branches.len() > 2))
            {
                settings.vertical_choice_separation_outer
            } else {
                settings.vertical_choice_separation
            };

            let n = self.branches.len();
            let mut content_width = 0i64;
            let mut display_width = 0i64;
            let mut start_padding: Option<i64> = None;
            let mut start_margin_offset: Option<i64> = None;
            let mut end_padding: Option<i64> = None;
            let mut end_margin_offset: Option<i64> = None;
            let mut branch_boxes = Vec::with_capacity(n);

            for (i, branch) in self.branches.iter().enumerate() {
                let direction = if i < self.default {
                    ConnectionDirection::Up
                } else if i > self.default {
                    ConnectionDirection::Down
                } else {
                    ConnectionDirection::Straight
                };

                let mut branch_ctx = LayoutContext {
                    width: context.width,
                    is_outer: false,
                    start_connection,
                    start_top_is_clear: i == 0
                        && !(connect_opt_exit && context.opt_exit_top)
                        && context.start_top_is_clear,
                    start_bottom_is_clear: i == n - 1
                        && !(connect_opt_exit && context.opt_exit_bottom)
                        && context.start_bottom_is_clear,
                    start_direction: direction,
                    end_connection,
                    end_top_is_clear: i == 0
                        && !(connect_opt_enter && context.opt_enter_top)
                        && context.end_top_is_clear,
                    end_bottom_is_clear: i == n - 1
                        && !(connect_opt_enter && context.opt_enter_bottom)
                        && context.end_bottom_is_clear,
                    end_direction: direction,
                    allow_shrinking_stacks: context.allow_shrinking_stacks && i == 0,
                    opt_enter_top: false,
                    opt_enter_bottom: false,
                    opt_exit_top: false,
                    opt_exit_bottom: false,
                };

                if i == 0 {
                    branch_ctx.opt_enter_top = context.opt_enter_top;
                    branch_ctx.opt_exit_top = context.opt_exit_top;
                } else if matches!(self.branches[i - 1], Element::Skip(_)) {
                    branch_ctx.opt_enter_top = next_can_enter;
                    branch_ctx.opt_exit_top = next_can_exit;
                }
                if i == n - 1 {
                    branch_ctx.opt_enter_bottom = context.opt_enter_bottom;
                    branch_ctx.opt_exit_bottom = context.opt_exit_bottom;
                } else if matches!(self.branches[i + 1], Element::Skip(_)) {
                    branch_ctx.opt_enter_bottom = prev_can_enter;
                    branch_ctx.opt_exit_bottom = prev_can_exit;
                }

                let (b, top, bottom) = branch.calculate_layout(settings, &branch_ctx, measure, resolver);
                content_width = content_width.max(b.content_width);
                display_width = display_width.max(b.display_width);
                start_padding = Some(start_padding.map_or(b.start_padding, |v| v.min(b.start_padding)));
                start_margin_offset = Some(
                    start_margin_offset
                        .map_or(-b.start_margin + b.start_padding, |v| v.min(-b.start_margin + b.start_padding)),
                );
                end_padding = Some(end_padding.map_or(b.end_padding, |v| v.min(b.end_padding)));
                end_margin_offset = Some(end_margin_offset.map_or(
                    b.display_width + b.end_margin - b.end_padding,
                    |v| v.max(b.display_width + b.end_margin - b.end_padding),
                ));
                branch_boxes.push((b, top, bottom));
            }

            let start_arc = start_connection.arc_size(settings);
            let end_arc = end_connection.arc_size(settings);
            let mut offsets = vec![0i64; n];
            let mut top = RidgeLine::flat(0);
            let mut bottom = RidgeLine::flat(0);
            let mut up = 0i64;
            let mut down = 0i64;

            let mut cursor_up = 0i64;
            for i in (0..self.default).rev() {
                let (b, _, branch_bottom) = &branch_boxes[i];
                cursor_up += b.up + vertical_separation;
                offsets[i] = -cursor_up;
                cursor_up += b.down;
                top = top.merge(&(branch_bottom.reverse(0) + Vec2::new(0, -cursor_up)), i64::max);
            }
            up = up.max(cursor_up);

            let mut cursor_down = 0i64;
            for i in (self.default + 1)..n {
                let (b, branch_top, _) = &branch_boxes[i];
                cursor_down += b.down + vertical_separation;
                offsets[i] = cursor_down;
                cursor_down += b.up;
                bottom = bottom.merge(&(branch_top.reverse(0) + Vec2::new(0, cursor_down)), i64::max);
            }
            down = down.max(cursor_down);

            let (default_box, default_top, default_bottom) = &branch_boxes[self.default];
            up = up.max(default_box.up);
            down = down.max(default_box.down);
            top = top.merge(default_top, i64::max);
            bottom = bottom.merge(default_bottom, i64::max);

            let start_padding = start_padding.unwrap_or(0);
            let end_padding = end_padding.unwrap_or(0);
            let mut final_start_margin = start_margin_offset.map_or(0, |v| 0.max(-v + start_padding));
            let mut final_end_margin = end_margin_offset.map_or(0, |v| 0.max(v - display_width + end_padding));
            if connect_opt_exit {
                final_start_margin = final_start_margin.max(settings.arc_margin + start_padding);
            }
            if connect_opt_enter {
                final_end_margin = final_end_margin.max(settings.arc_margin + end_padding);
            }

            let boxed = BoxRecord {
                display_width: display_width + start_arc + end_arc,
                content_width,
                start_padding: start_padding + start_arc,
                end_padding: end_padding + end_arc,
                start_margin: final_start_margin,
                end_margin: final_end_margin,
                height: up + down,
                up,
                down,
            };
            *self.offsets.borrow_mut() = offsets;
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
        let offsets = self.offsets.borrow();
        for (i, branch) in self.branches.iter().enumerate() {
            let y = ctx.pos.y + offsets[i];
            let pos = Vec2::new(ctx.pos.x, y);
            let branch_ctx = RenderContext {
                pos,
                start_connection_pos: Vec2::new(ctx.start_connection_pos.x, y),
                end_connection_pos: Vec2::new(ctx.end_connection_pos.x, y),
                reverse: ctx.reverse,
            };
            branch.render(settings, render, &branch_ctx, resolver);
        }
    }
}
