use core_geom::RidgeLine;

use crate::context::{ConnectionType, LayoutContext};
use crate::settings::LayoutSettings;

/// The metrics a layout pass produces for one element: how much horizontal
/// space it claims, how tall it is, and the envelope its top/bottom edges
/// present to neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRecord {
    /// Total width of the element's drawing, including its own padding.
    pub display_width: i64,
    /// Width of the element's content, excluding padding reserved for
    /// connecting lines.
    pub content_width: i64,
    pub start_padding: i64,
    pub end_padding: i64,
    /// Extra horizontal space reserved outside `display_width` for a
    /// neighbor's arc to bend into, start/end.
    pub start_margin: i64,
    pub end_margin: i64,
    /// Total height of the element's drawing.
    pub height: i64,
    /// Distance from the connecting line to the top/bottom edge.
    pub up: i64,
    pub down: i64,
}

impl BoxRecord {
    /// Total footprint on the canvas: `display_width` plus the margins
    /// reserved on either side for a neighbor's arc. What a caller placing
    /// this element's sibling, or sizing the outermost canvas, needs.
    pub fn width(&self) -> i64 {
        self.start_margin + self.display_width + self.end_margin
    }

    /// Content plus its own padding, excluding margins and any isolation
    /// arc space folded into `display_width`. The quantity an element's own
    /// layout math reasons about internally.
    pub fn padded_width(&self) -> i64 {
        self.start_padding + self.content_width + self.end_padding
    }
}

/// A memoized layout result, valid only for the exact `(settings, context)`
/// pair it was computed against. `render` re-derives positions from this
/// plus the ridge lines but never recomputes widths.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCacheEntry {
    pub settings: LayoutSettings,
    pub context: LayoutContext,
    pub boxed: BoxRecord,
    pub top: RidgeLine,
    pub bottom: RidgeLine,
}

impl LayoutCacheEntry {
    pub fn matches(&self, settings: &LayoutSettings, context: &LayoutContext) -> bool {
        &self.settings == settings && &self.context == context
    }
}

/// Horizontal space a connection type plus its clearance flags demand on
/// one side of an element.
pub fn connection_margin(
    settings: &LayoutSettings,
    connection: ConnectionType,
    top_is_clear: bool,
    bottom_is_clear: bool,
) -> i64 {
    let arc = connection.arc_size(settings);
    if top_is_clear && bottom_is_clear {
        0
    } else {
        arc
    }
}
