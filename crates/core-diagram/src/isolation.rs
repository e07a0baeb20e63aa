//! The isolation protocol: lets an element request that one or both of its
//! connection points be measured "as if outer" — arc space shrunk out of the
//! available width, the connection coerced to a plain line, clearance
//! guaranteed — then restores the real connection's bookkeeping once the
//! element has laid out its own content against that simplified view.
//!
//! `Skip` isolates both ends and does nothing else; `Sequence` isolates the
//! head and tail of each wrapped row so a `Stack` connection at the row
//! boundary doesn't leak arc-sized padding into every child in between.

use core_geom::{RidgeLine, Vec2};

use crate::context::{ConnectionDirection, ConnectionType, LayoutContext};
use crate::layout::BoxRecord;
use crate::settings::LayoutSettings;

/// Bookkeeping produced by [`isolate`], consumed by [`apply_isolation`] once
/// the element has computed its own layout against the returned context.
#[derive(Debug, Clone, Copy)]
pub struct Isolation {
    pub start: bool,
    pub end: bool,
    start_arc_size: i64,
    end_arc_size: i64,
    start_connection: ConnectionType,
    end_connection: ConnectionType,
}

/// Adjusts `context` for an element that isolates its `start` and/or `end`
/// connection. Returns the context the element should lay its own content
/// out against, plus the bookkeeping `apply_isolation` needs afterward.
pub fn isolate(
    settings: &LayoutSettings,
    context: &LayoutContext,
    start: bool,
    end: bool,
) -> (LayoutContext, Isolation) {
    let start_arc_size = if start {
        context.start_connection.arc_size(settings)
    } else {
        0
    };
    let end_arc_size = if end {
        context.end_connection.arc_size(settings)
    } else {
        0
    };

    let mut inner = context.clone();
    inner.width = (context.width - start_arc_size - end_arc_size).max(0);

    if start {
        inner.start_connection = match context.start_connection {
            ConnectionType::Null => ConnectionType::Null,
            _ => ConnectionType::Normal,
        };
        inner.start_top_is_clear = true;
        inner.start_bottom_is_clear = true;
        inner.start_direction = ConnectionDirection::Straight;
    }
    if end {
        inner.end_connection = match context.end_connection {
            ConnectionType::Null => ConnectionType::Null,
            _ => ConnectionType::Normal,
        };
        inner.end_top_is_clear = true;
        inner.end_bottom_is_clear = true;
        inner.end_direction = ConnectionDirection::Straight;
    }

    (
        inner,
        Isolation {
            start,
            end,
            start_arc_size,
            end_arc_size,
            start_connection: context.start_connection,
            end_connection: context.end_connection,
        },
    )
}

/// Folds the isolated arc size(s) back into padding and `display_width`,
/// raises `start_margin`/`end_margin` when the original connection on an
/// isolated side was `Stack`/`Split`, and re-aligns the ridge lines (computed
/// against the inner, shrunk-width context) back to the element's own outer
/// origin.
pub fn apply_isolation(
    settings: &LayoutSettings,
    iso: &Isolation,
    boxed: BoxRecord,
    top: RidgeLine,
    bottom: RidgeLine,
) -> (BoxRecord, RidgeLine, RidgeLine) {
    let mut boxed = boxed;
    let mut top = top;
    let mut bottom = bottom;

    if iso.start && iso.start_arc_size > 0 {
        boxed.display_width += iso.start_arc_size;
        boxed.start_padding += iso.start_arc_size;
        if matches!(
            iso.start_connection,
            ConnectionType::Stack | ConnectionType::Split
        ) {
            boxed.start_margin = boxed
                .start_margin
                .max(boxed.padded_width() + settings.arc_margin);
        }
        top = top + Vec2::new(iso.start_arc_size, 0);
        bottom = bottom + Vec2::new(iso.start_arc_size, 0);
    }
    if iso.end && iso.end_arc_size > 0 {
        boxed.display_width += iso.end_arc_size;
        boxed.end_padding += iso.end_arc_size;
        if matches!(
            iso.end_connection,
            ConnectionType::Stack | ConnectionType::Split
        ) {
            boxed.end_margin = boxed
                .end_margin
                .max(boxed.padded_width() + settings.arc_margin);
        }
    }

    (boxed, top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolating_both_ends_shrinks_width_by_both_arcs() {
        let settings = LayoutSettings::text_defaults();
        let ctx = LayoutContext {
            width: 20,
            start_connection: ConnectionType::Stack,
            end_connection: ConnectionType::Stack,
            ..LayoutContext::default()
        };
        let (inner, iso) = isolate(&settings, &ctx, true, true);
        let arc = ConnectionType::Stack.arc_size(&settings);
        assert_eq!(inner.width, 20 - 2 * arc);
        assert_eq!(inner.start_connection, ConnectionType::Normal);
        assert!(iso.start && iso.end);
    }

    #[test]
    fn null_connection_stays_null_under_isolation() {
        let settings = LayoutSettings::text_defaults();
        let ctx = LayoutContext {
            start_connection: ConnectionType::Null,
            ..LayoutContext::default()
        };
        let (inner, _) = isolate(&settings, &ctx, true, false);
        assert_eq!(inner.start_connection, ConnectionType::Null);
    }

    #[test]
    fn apply_isolation_adds_arc_size_back_into_padding() {
        let settings = LayoutSettings::text_defaults();
        let ctx = LayoutContext {
            start_connection: ConnectionType::Stack,
            ..LayoutContext::default()
        };
        let (_, iso) = isolate(&settings, &ctx, true, false);
        let boxed = BoxRecord {
            display_width: 4,
            content_width: 4,
            start_padding: 0,
            end_padding: 0,
            start_margin: 0,
            end_margin: 0,
            height: 0,
            up: 0,
            down: 0,
        };
        let (boxed, _, _) = apply_isolation(&settings, &iso, boxed, RidgeLine::flat(0), RidgeLine::flat(0));
        let arc = ConnectionType::Stack.arc_size(&settings);
        assert_eq!(boxed.display_width, 4 + arc);
        assert_eq!(boxed.start_padding, arc);
        assert!(boxed.start_margin >= arc);
    }
}
