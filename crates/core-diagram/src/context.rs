use crate::settings::LayoutSettings;

/// How a line enters or leaves an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    /// No line at all (outermost ends).
    Null,
    /// A plain horizontal line, no arc needed.
    Normal,
    /// Like `Normal`, but the neighbor is a stack/split connection and this
    /// element must still reserve stack-sized margin.
    StackBound,
    /// One arc bends the line onto/off of a parallel rail.
    Stack,
    /// A symmetric pair of arcs splits the line onto two parallel rails.
    Split,
}

impl ConnectionType {
    /// Horizontal space an arc of this connection type consumes.
    pub fn arc_size(self, settings: &LayoutSettings) -> i64 {
        match self {
            ConnectionType::Null | ConnectionType::Normal => 0,
            ConnectionType::StackBound | ConnectionType::Stack => {
                ceil_f64(settings.arc_radius) + settings.arc_margin
            }
            ConnectionType::Split => ceil_f64(2.0 * settings.arc_radius) + settings.arc_margin,
        }
    }
}

pub(crate) fn ceil_f64(x: f64) -> i64 {
    x.ceil() as i64
}

/// Which way a branch's connection points relative to the default (through)
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionDirection {
    Up,
    Down,
    Straight,
}

/// Per-call layout parameters, rebuilt at every recursive step.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    pub width: i64,
    pub is_outer: bool,

    pub start_connection: ConnectionType,
    pub start_top_is_clear: bool,
    pub start_bottom_is_clear: bool,
    pub start_direction: ConnectionDirection,

    pub end_connection: ConnectionType,
    pub end_top_is_clear: bool,
    pub end_bottom_is_clear: bool,
    pub end_direction: ConnectionDirection,

    pub allow_shrinking_stacks: bool,

    /// Opt-line absorption hooks. An outer `Choice` sets `opt_enter_*` on an
    /// optional branch's context to advertise a bypass line the branch's own
    /// content can split off of instead of drawing a fresh arc; `opt_exit_*`
    /// is the matching advertisement for a line the branch can split off
    /// *to*. A `Sequence` forwards these unchanged between adjacent `Skip`
    /// pairs at its own start/end so nested optionals can chain. `Barrier`
    /// resets all four to `false` along with the rest of the context.
    pub opt_enter_top: bool,
    pub opt_enter_bottom: bool,
    pub opt_exit_top: bool,
    pub opt_exit_bottom: bool,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            width: 0,
            is_outer: false,
            start_connection: ConnectionType::Normal,
            start_top_is_clear: false,
            start_bottom_is_clear: false,
            start_direction: ConnectionDirection::Straight,
            end_connection: ConnectionType::Normal,
            end_top_is_clear: false,
            end_bottom_is_clear: false,
            end_direction: ConnectionDirection::Straight,
            allow_shrinking_stacks: false,
            opt_enter_top: false,
            opt_enter_bottom: false,
            opt_exit_top: false,
            opt_exit_bottom: false,
        }
    }
}

/// Per-call render parameters, mirrors `LayoutContext` but carries concrete
/// positions instead of a width budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub pos: core_geom::Vec2,
    pub start_connection_pos: core_geom::Vec2,
    pub end_connection_pos: core_geom::Vec2,
    pub reverse: bool,
}

impl RenderContext {
    /// `+1` for left-to-right rendering, `-1` under `reverse`.
    pub fn dir(&self) -> i64 {
        if self.reverse { -1 } else { 1 }
    }
}
