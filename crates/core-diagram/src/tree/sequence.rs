use std::cell::RefCell;
use std::ops::Range;

use core_geom::{RidgeLine, Vec2};
use core_text::TextMeasure;

use crate::context::{ceil_f64, ConnectionDirection, ConnectionType, LayoutContext, RenderContext};
use crate::error::LoadingError;
use crate::isolation;
use crate::layout::BoxRecord;
use crate::ports::{HrefResolver, Render};
use crate::settings::LayoutSettings;
use crate::tree::{Element, LayoutCache};

/// How the gap between two adjacent children may be broken onto separate
/// rows when a sequence doesn't fit within its available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineBreak {
    /// Always breaks here, regardless of whether the row would otherwise
    /// fit.
    Hard,
    /// A preferred break point: if a later, unmarked overflow forces a
    /// break, wrapping rewinds back to the most recent `Soft` mark instead
    /// of breaking at the overflowing item itself.
    Soft,
    /// Breaks here only if the row would otherwise overflow, breaking right
    /// before the item that doesn't fit.
    Default,
    /// Never breaks here; the two neighboring children are glued onto the
    /// same row no matter how wide they get.
    NoBreak,
}

struct Row {
    children: Range<usize>,
    /// x offset of each child's start-connection position, relative to the
    /// row's own left edge (before `line_shift` is added back in at
    /// render/ridge time).
    offsets: Vec<i64>,
    /// y of this row's spine, relative to the sequence's own top edge
    /// (`up`).
    y: i64,
    up: i64,
    down: i64,
    display_width: i64,
}

/// A row of elements drawn one after another, wrapping onto additional rows
/// (each row's tail turning down into the next row's head) when the total
/// doesn't fit the available width. The identity element of concatenation;
/// an empty sequence is a loading error rather than silently degrading to
/// `Skip`.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub children: Vec<Element>,
    /// One entry per gap between consecutive children.
    pub linebreaks: Vec<LineBreak>,
    cache: LayoutCache,
    rows: RefCell<Vec<Row>>,
    shift_first_line: std::cell::Cell<bool>,
    line_shift: std::cell::Cell<i64>,
}

impl Sequence {
    pub fn new(children: Vec<Element>) -> Result<Self, LoadingError> {
        let n = children.len();
        if n == 0 {
            return Err(LoadingError::EmptySequence);
        }
        let linebreaks = vec![LineBreak::Default; n.saturating_sub(1)];
        Self::with_linebreaks(children, linebreaks)
    }

    pub fn with_linebreaks(
        children: Vec<Element>,
        linebreaks: Vec<LineBreak>,
    ) -> Result<Self, LoadingError> {
        if children.is_empty() {
            return Err(LoadingError::EmptySequence);
        }
        if linebreaks.len() != children.len() - 1 {
            return Err(LoadingError::Other {
                what: format!(
                    "number of line breaks (={}) must be one less than number of children (={})",
                    linebreaks.len(),
                    children.len()
                ),
            });
        }
        Ok(Self {
            children,
            linebreaks,
            cache: LayoutCache::new(),
            rows: RefCell::new(Vec::new()),
            shift_first_line: std::cell::Cell::new(false),
            line_shift: std::cell::Cell::new(0),
        })
    }

    /// Horizontal space reserved between two adjacent children: the larger
    /// of either side's margin once its own padding (and the neighbor's
    /// padding) is subtracted out, floored by the minimum arc clearance.
    fn calculate_gap(prev: &BoxRecord, next: &BoxRecord, settings: &LayoutSettings) -> i64 {
        let prev_gap = prev.end_margin - prev.end_padding - next.start_padding;
        let next_gap = next.start_margin - next.start_padding - prev.end_padding;
        0.max(prev_gap).max(next_gap).max(settings.arc_margin)
    }

    fn neutral_child_context(width: i64, is_outer: bool) -> LayoutContext {
        LayoutContext {
            width,
            is_outer,
            start_connection: ConnectionType::Normal,
            start_top_is_clear: true,
            start_bottom_is_clear: true,
            start_direction: ConnectionDirection::Straight,
            end_connection: ConnectionType::Normal,
            end_top_is_clear: true,
            end_bottom_is_clear: true,
            end_direction: ConnectionDirection::Straight,
            allow_shrinking_stacks: false,
            opt_enter_top: false,
            opt_enter_bottom: false,
            opt_exit_top: false,
            opt_exit_bottom: false,
        }
    }

    /// Builds the per-child layout context for child `i` of `n`, given the
    /// row-start override (`Some((connection, direction))` when `i` opens a
    /// new row) and, separately, a row-end override for the last child of a
    /// non-final row.
    #[allow(clippy::too_many_arguments)]
    fn child_context(
        i: usize,
        n: usize,
        width: i64,
        outer: &LayoutContext,
        row_start: Option<(ConnectionType, ConnectionDirection)>,
        row_end: Option<(ConnectionType, ConnectionDirection)>,
        start_connection_eff: ConnectionType,
        end_connection_eff: ConnectionType,
    ) -> LayoutContext {
        let mut c = Self::neutral_child_context(width, outer.is_outer);
        if i == 0 {
            c.opt_enter_top = outer.opt_enter_top;
            c.opt_enter_bottom = outer.opt_enter_bottom;
            c.start_connection = start_connection_eff;
            c.start_top_is_clear = outer.start_top_is_clear;
            c.start_bottom_is_clear = outer.start_bottom_is_clear;
            c.start_direction = outer.start_direction;
        } else if let Some((conn, dir)) = row_start {
            c.start_connection = conn;
            c.start_direction = dir;
        }
        if i == n - 1 {
            c.opt_exit_bottom = outer.opt_exit_bottom;
            c.end_connection = end_connection_eff;
            c.end_top_is_clear = outer.end_top_is_clear;
            c.end_bottom_is_clear = outer.end_bottom_is_clear;
            c.end_direction = outer.end_direction;
            c.allow_shrinking_stacks = outer.allow_shrinking_stacks;
        } else if let Some((conn, dir)) = row_end {
            c.end_connection = conn;
            c.end_direction = dir;
            c.opt_exit_bottom = true;
            c.allow_shrinking_stacks = true;
        }
        c
    }

    pub fn calculate_layout<M: TextMeasure>(
        &self,
        settings: &LayoutSettings,
        context: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        self.cache.get_or_compute(settings, context, || {
            let n = self.children.len();

            // Fast path: lay everything out on one row and see if it fits.
            let mut single_layouts = Vec::with_capacity(n);
            let mut single_width = 0i64;
            for (i, child) in self.children.iter().enumerate() {
                let ctx = Self::child_context(
                    i,
                    n,
                    context.width,
                    context,
                    None,
                    None,
                    context.start_connection,
                    context.end_connection,
                );
                let layout = child.calculate_layout(settings, &ctx, measure, resolver);
                if i > 0 {
                    single_width +=
                        Self::calculate_gap(&single_layouts[i - 1].0, &layout.0, settings);
                }
                single_width += layout.0.display_width;
                single_layouts.push(layout);
            }

            let has_hard_break = self.linebreaks.iter().any(|lb| *lb == LineBreak::Hard);
            if !has_hard_break && single_width <= context.width {
                self.shift_first_line.set(false);
                self.line_shift.set(0);
                return self.finish_single_row(settings, single_layouts);
            }

            let (iso_ctx, iso) = isolation::isolate(
                settings,
                context,
                context.start_direction == ConnectionDirection::Down || !context.start_bottom_is_clear,
                context.end_direction == ConnectionDirection::Up || !context.end_top_is_clear,
            );

            let start_connection_eff = match iso_ctx.start_connection {
                ConnectionType::Normal => ConnectionType::StackBound,
                other => other,
            };
            let end_connection_eff = iso_ctx.end_connection;
            let shift_first_line = matches!(self.children[0], Element::Choice(_))
                || start_connection_eff == ConnectionType::Split;
            self.shift_first_line.set(shift_first_line);
            let line_shift = if shift_first_line {
                ceil_f64(settings.arc_radius)
            } else {
                0
            };
            self.line_shift.set(line_shift);

            let (rows_idx, layouts) = self.wrap_rows(
                settings,
                &iso_ctx,
                measure,
                resolver,
                start_connection_eff,
                end_connection_eff,
                line_shift,
            );

            self.finish_multi_row(settings, &iso_ctx, &iso, rows_idx, layouts, line_shift)
        })
    }

    /// Greedy wrapping: accumulates children onto a row until one would
    /// overflow, then rewinds to the most recent `Soft` mark if one exists,
    /// else breaks right before the overflowing child. `NoBreak` boundaries
    /// are never split even if that overflows the row.
    #[allow(clippy::too_many_arguments)]
    fn wrap_rows<M: TextMeasure>(
        &self,
        settings: &LayoutSettings,
        iso_ctx: &LayoutContext,
        measure: &M,
        resolver: &dyn HrefResolver,
        start_connection_eff: ConnectionType,
        end_connection_eff: ConnectionType,
        line_shift: i64,
    ) -> (Vec<Range<usize>>, Vec<(BoxRecord, RidgeLine, RidgeLine)>) {
        let n = self.children.len();
        let arc_size = ConnectionType::Stack.arc_size(settings);
        let max_width_continuation = iso_ctx.width - line_shift;

        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut current_row: Vec<usize> = Vec::new();
        let mut current_width = 0i64;
        let mut max_line_width = iso_ctx.width;

        let mut last_soft_break_idx: Option<usize> = None;
        let mut width_at_last_soft_break = 0i64;
        let mut margin_after_last_soft_break = 0i64;

        let mut layouts: Vec<Option<(BoxRecord, RidgeLine, RidgeLine)>> = vec![None; n];

        for i in 0..n {
            let row_start_override = if i != 0 && current_row.is_empty() {
                Some((ConnectionType::Stack, ConnectionDirection::Up))
            } else {
                None
            };
            let ctx = Self::child_context(
                i,
                n,
                max_line_width,
                iso_ctx,
                row_start_override,
                None,
                start_connection_eff,
                end_connection_eff,
            );
            let mut layout = self.children[i].calculate_layout(settings, &ctx, measure, resolver);

            let mut margin = if let Some(&prev) = current_row.last() {
                Self::calculate_gap(&layouts[prev].as_ref().unwrap().0, &layout.0, settings)
            } else {
                0
            };

            let can_break_here = i > 0 && self.linebreaks[i - 1] != LineBreak::NoBreak;

            if can_break_here
                && !current_row.is_empty()
                && current_width + margin + layout.0.display_width + arc_size > max_line_width
                && last_soft_break_idx.is_some()
            {
                let idx = last_soft_break_idx.unwrap();
                rows.push(current_row[..idx].to_vec());
                current_row = current_row[idx..].to_vec();
                current_width -= width_at_last_soft_break + margin_after_last_soft_break;
                last_soft_break_idx = None;
                width_at_last_soft_break = 0;
                margin_after_last_soft_break = 0;
                max_line_width = max_width_continuation;

                if let Some(&first) = current_row.first() {
                    let fctx = Self::child_context(
                        first,
                        n,
                        max_line_width,
                        iso_ctx,
                        Some((ConnectionType::Stack, ConnectionDirection::Up)),
                        None,
                        start_connection_eff,
                        end_connection_eff,
                    );
                    let relaid = self.children[first].calculate_layout(settings, &fctx, measure, resolver);
                    layouts[first] = Some(relaid);
                    margin = Self::calculate_gap(&layouts[first].as_ref().unwrap().0, &layout.0, settings);
                } else {
                    margin = 0;
                }
            }

            if can_break_here
                && !current_row.is_empty()
                && current_width + margin + layout.0.display_width + arc_size > max_line_width
            {
                rows.push(std::mem::take(&mut current_row));
                current_width = 0;
                last_soft_break_idx = None;
                width_at_last_soft_break = 0;
                margin_after_last_soft_break = 0;
                margin = 0;
                max_line_width = max_width_continuation;

                let rctx = Self::child_context(
                    i,
                    n,
                    max_line_width,
                    iso_ctx,
                    Some((ConnectionType::Stack, ConnectionDirection::Up)),
                    None,
                    start_connection_eff,
                    end_connection_eff,
                );
                layout = self.children[i].calculate_layout(settings, &rctx, measure, resolver);
            }

            layouts[i] = Some(layout);
            current_row.push(i);
            current_width += margin + layouts[i].as_ref().unwrap().0.display_width;

            if i < n - 1 {
                match self.linebreaks[i] {
                    LineBreak::Hard => {
                        rows.push(std::mem::take(&mut current_row));
                        current_width = 0;
                        last_soft_break_idx = None;
                        width_at_last_soft_break = 0;
                        margin_after_last_soft_break = 0;
                        max_line_width = max_width_continuation;
                    }
                    LineBreak::Soft => {
                        last_soft_break_idx = Some(current_row.len());
                        width_at_last_soft_break = current_width;
                    }
                    _ => {
                        if Some(i + 1) == last_soft_break_idx {
                            margin_after_last_soft_break = margin;
                        }
                    }
                }
            }
        }
        if !current_row.is_empty() {
            rows.push(current_row);
        }

        // Every row but the last gets its final child re-laid-out with a
        // `Stack`/`Down` end connection so it turns into the next row.
        let row_count = rows.len();
        let mut row_ranges = Vec::with_capacity(row_count);
        for (ri, row) in rows.iter().enumerate() {
            let start = row[0];
            let end = row[row.len() - 1] + 1;
            row_ranges.push(start..end);
            if ri + 1 < row_count {
                let last = *row.last().unwrap();
                let is_row_start = last == start && last != 0;
                let row_start_override = if is_row_start {
                    Some((ConnectionType::Stack, ConnectionDirection::Up))
                } else {
                    None
                };
                let width_for_last = if ri == 0 { iso_ctx.width } else { max_width_continuation };
                let lctx = Self::child_context(
                    last,
                    n,
                    width_for_last,
                    iso_ctx,
                    row_start_override,
                    Some((ConnectionType::Stack, ConnectionDirection::Down)),
                    start_connection_eff,
                    end_connection_eff,
                );
                let relaid = self.children[last].calculate_layout(settings, &lctx, measure, resolver);
                layouts[last] = Some(relaid);
            }
        }

        (row_ranges, layouts.into_iter().map(|l| l.unwrap()).collect())
    }

    fn finish_single_row(
        &self,
        settings: &LayoutSettings,
        layouts: Vec<(BoxRecord, RidgeLine, RidgeLine)>,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        let n = layouts.len();
        let mut offsets = Vec::with_capacity(n);
        let mut cursor = 0i64;
        let mut up = 0i64;
        let mut down = 0i64;
        let mut top = RidgeLine::flat(0);
        let mut bottom = RidgeLine::flat(0);

        for (i, (boxed, child_top, child_bottom)) in layouts.iter().enumerate() {
            if i > 0 {
                cursor += Self::calculate_gap(&layouts[i - 1].0, boxed, settings);
            }
            offsets.push(cursor);
            let shifted_top = child_top.clone() + Vec2::new(cursor, 0);
            let shifted_bottom = child_bottom.clone() + Vec2::new(cursor, 0);
            top = top.merge(&shifted_top, i64::max);
            bottom = bottom.merge(&shifted_bottom, i64::max);
            up = up.max(boxed.up);
            down = down.max(boxed.down);
            cursor += boxed.display_width;
        }

        let start_padding = layouts.first().map(|l| l.0.start_padding).unwrap_or(0);
        let end_padding = layouts.last().map(|l| l.0.end_padding).unwrap_or(0);
        let start_margin = layouts.first().map(|l| l.0.start_margin).unwrap_or(0);
        let end_margin = layouts.last().map(|l| l.0.end_margin).unwrap_or(0);

        let boxed = BoxRecord {
            display_width: cursor,
            content_width: (cursor - start_padding - end_padding).max(0),
            start_padding,
            end_padding,
            start_margin,
            end_margin,
            height: up + down,
            up,
            down,
        };
        *self.rows.borrow_mut() = vec![Row {
            children: 0..n,
            offsets,
            y: 0,
            up,
            down,
            display_width: cursor,
        }];
        (boxed, top, bottom)
    }

    fn finish_multi_row(
        &self,
        settings: &LayoutSettings,
        iso_ctx: &LayoutContext,
        iso: &isolation::Isolation,
        rows_idx: Vec<Range<usize>>,
        layouts: Vec<(BoxRecord, RidgeLine, RidgeLine)>,
        line_shift: i64,
    ) -> (BoxRecord, RidgeLine, RidgeLine) {
        let vsep = if iso_ctx.is_outer {
            settings.vertical_seq_separation_outer
        } else {
            settings.vertical_seq_separation
        };

        let mut rows = Vec::with_capacity(rows_idx.len());
        let mut width = 0i64;
        let mut display_width = 0i64;
        let mut start_padding: Option<i64> = None;
        let mut start_margin_offset: Option<i64> = None;
        let mut end_padding_offset: Option<i64> = None;
        let mut end_margin_offset: Option<i64> = None;

        let mut pos = 0i64;
        let mut up = 0i64;
        let mut down = 0i64;

        for (ri, range) in rows_idx.iter().enumerate() {
            let row_shift = if ri > 0 { line_shift } else { 0 };
            let mut row_width = row_shift;
            let mut row_pos = 0i64;
            let mut row_up = 0i64;
            let mut row_down_offset = 0i64;
            let mut offsets = Vec::with_capacity(range.len());

            for (j, idx) in range.clone().enumerate() {
                let (boxed, _, _) = &layouts[idx];
                if j == 0 {
                    let sp = boxed.start_padding + row_shift;
                    start_padding = Some(start_padding.map_or(sp, |v| v.min(sp)));
                    let smo = row_shift - boxed.start_margin + boxed.start_padding;
                    start_margin_offset = Some(start_margin_offset.map_or(smo, |v| v.min(smo)));
                }
                if j > 0 {
                    let (prev, _, _) = &layouts[idx - 1];
                    row_width += Self::calculate_gap(prev, boxed, settings);
                }
                offsets.push(row_width);
                row_width += boxed.display_width;

                if j == range.len() - 1 {
                    let epo = row_width - boxed.end_padding;
                    end_padding_offset = Some(end_padding_offset.map_or(epo, |v| v.max(epo)));
                    let emo = row_width + boxed.end_margin - boxed.end_padding;
                    end_margin_offset = Some(end_margin_offset.map_or(emo, |v| v.max(emo)));
                }

                row_up = row_up.max(boxed.up - row_pos);
                row_pos += boxed.height;
                row_down_offset = row_down_offset.max(row_pos + boxed.down);
            }

            width = width.max(row_width);
            let row_display_width = row_width;
            display_width = display_width.max(row_display_width);

            let row_y;
            if ri == 0 {
                up = row_up;
                row_y = row_up;
            } else {
                pos += vsep + row_up;
                row_y = pos;
            }

            if ri + 1 < rows_idx.len() {
                pos += row_down_offset + vsep;
            } else {
                pos += row_pos;
                down = 0.max(row_down_offset - row_pos);
            }

            rows.push(Row {
                children: range.clone(),
                offsets,
                y: row_y,
                up: row_up,
                down: row_down_offset,
                display_width: row_display_width,
            });
        }

        let height = pos;
        let start_padding = start_padding.unwrap_or(0);
        let end_padding = if iso_ctx.allow_shrinking_stacks {
            layouts.last().unwrap().0.end_padding
        } else {
            0.max(width - end_padding_offset.unwrap_or(0))
        };
        let content_width = 0.max(width - start_padding - end_padding);
        let start_margin = start_margin_offset.map_or(0, |v| 0.max(-v + start_padding));
        let end_margin = if iso_ctx.allow_shrinking_stacks {
            let last_box = &layouts.last().unwrap().0;
            width - last_box.end_padding + last_box.end_margin - width + end_padding
        } else {
            end_margin_offset.map_or(0, |v| 0.max(v - width + end_padding))
        };

        let boxed = BoxRecord {
            display_width,
            content_width,
            start_padding,
            end_padding,
            start_margin,
            end_margin,
            height,
            up,
            down,
        };

        // Top/bottom ridge lines reflect only the first/last row's own
        // silhouette, widened flat beyond that row's own width: every
        // interior row is fully enclosed by the element's own box.
        let first_range = rows_idx[0].clone();
        let mut top = RidgeLine::flat(0);
        let mut cursor = 0i64;
        for (j, idx) in first_range.clone().enumerate() {
            let (boxed, child_top, _) = &layouts[idx];
            if j > 0 {
                cursor += Self::calculate_gap(&layouts[idx - 1].0, boxed, settings);
            }
            top = top.merge(&(child_top.clone() + Vec2::new(cursor, 0)), i64::max);
            cursor += boxed.display_width;
        }
        top = top.merge(&RidgeLine::flat(up), i64::min);

        let last_range = rows_idx[rows_idx.len() - 1].clone();
        let mut bottom = RidgeLine::flat(0);
        let mut cursor = 0i64;
        for (j, idx) in last_range.clone().enumerate() {
            let (boxed, _, child_bottom) = &layouts[idx];
            if j > 0 {
                cursor += Self::calculate_gap(&layouts[idx - 1].0, boxed, settings);
            }
            bottom = bottom.merge(&(child_bottom.clone() + Vec2::new(cursor, 0)), i64::max);
            cursor += boxed.display_width;
        }
        bottom = bottom.merge(&RidgeLine::flat(down), i64::min);

        // Row `y` was accumulated relative to the box's own top edge;
        // renormalize to "offset from the spine" (row 0 sits on the spine),
        // matching the convention every other combinator's offsets use.
        for row in rows.iter_mut() {
            row.y -= up;
        }
        *self.rows.borrow_mut() = rows;

        isolation::apply_isolation(settings, iso, boxed, top, bottom)
    }

    pub fn render<R: Render>(
        &self,
        settings: &LayoutSettings,
        render: &mut R,
        ctx: &RenderContext,
        resolver: &dyn HrefResolver,
    ) {
        let rows = self.rows.borrow();
        let arc_radius = ceil_f64(settings.arc_radius);
        let n_rows = rows.len();

        let row_y = |ri: usize| ctx.pos.y + rows[ri].y;
        let row_x = |ri: usize, offset: i64| ctx.pos.x + ctx.dir() * offset;

        for (ri, row) in rows.iter().enumerate() {
            let y = row_y(ri);

            for (local, idx) in row.children.clone().enumerate() {
                let is_row_first = local == 0;
                let is_row_last = local == row.children.len() - 1;
                let x = row_x(ri, row.offsets[local]);

                let start_pos = if is_row_first {
                    if ri == 0 {
                        ctx.start_connection_pos
                    } else {
                        Vec2::new(x, y)
                    }
                } else {
                    Vec2::new(x, y)
                };

                let next_offset = row.offsets.get(local + 1).copied().unwrap_or(row.display_width);
                let end_pos = if is_row_last {
                    if ri + 1 < n_rows {
                        Vec2::new(row_x(ri, row.display_width), y)
                    } else {
                        ctx.end_connection_pos
                    }
                } else {
                    Vec2::new(row_x(ri, next_offset), y)
                };

                let child_ctx = RenderContext {
                    pos: Vec2::new(x, y),
                    start_connection_pos: start_pos,
                    end_connection_pos: end_pos,
                    reverse: ctx.reverse,
                };
                self.children[idx].render(settings, render, &child_ctx, resolver);
            }

            // Turn down (or up, under `reverse`) from this row's tail into
            // the next row's head: an S-shaped bend of two quarter-arcs
            // rather than a plain drop, since the next row generally starts
            // at a different x than this one ends at.
            if ri + 1 < n_rows {
                let from = Vec2::new(row_x(ri, row.display_width), y);
                let to = Vec2::new(row_x(ri + 1, rows[ri + 1].offsets[0]), row_y(ri + 1));
                let dx_sign = if to.x >= from.x { 1 } else { -1 };

                let mut line = render.line(from);
                line.arc(dx_sign * arc_radius, arc_radius);
                line.vertical(to.y - arc_radius);
                line.arc(dx_sign * arc_radius, arc_radius);
                if from.x + 2 * dx_sign * arc_radius != to.x {
                    line.horizontal(to.x);
                }
                line.finish();
            }
        }
    }
}
