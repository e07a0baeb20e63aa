/// Global style knobs shared by every element in a diagram. Both backends
/// build one of these from their own render settings before laying out the
/// tree, so the layout engine never depends on a specific backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    /// Radius of a standard connecting arc, in abstract length units.
    pub arc_radius: f64,
    /// Extra horizontal padding reserved around an arc, beyond its radius.
    pub arc_margin: i64,

    /// Padding inserted around a node's label text, start/end.
    pub node_start_padding: i64,
    pub node_end_padding: i64,
    /// Vertical padding above/below a node's label text.
    pub node_vertical_padding: i64,
    /// Horizontal gap a `Node` reserves on either side for the connecting
    /// line between it and its neighbor in a `Sequence`, independent of any
    /// arc reservation.
    pub horizontal_seq_separation: i64,

    /// Vertical gap between adjacent rails stacked by a `Choice`, or by
    /// `OneOrMore`'s down-stack repeat branch, when neither rail itself
    /// contains a nested `Choice`.
    pub vertical_choice_separation: i64,
    /// Same as `vertical_choice_separation`, but used when the rail being
    /// stacked against contains a nested `Choice` and needs extra clearance
    /// for its own branch arcs.
    pub vertical_choice_separation_outer: i64,

    /// Vertical gap a `Sequence` reserves between two wrapped rows when
    /// neither row's own content is itself a nested `Choice`.
    pub vertical_seq_separation: i64,
    /// Same as `vertical_seq_separation`, but used when one of the two rows
    /// contains a nested `Choice` and needs extra clearance for its own
    /// branch arcs.
    pub vertical_seq_separation_outer: i64,

    /// Thickness of a group's surrounding box, counted into its margins.
    pub group_thickness: i64,
    /// Extra vertical padding a group reserves beyond its content's height.
    pub group_vertical_padding: i64,

    /// Width and height of the arrowhead marker drawn at diagram ends.
    pub marker_width: i64,
    /// How far a marker projects past the line it decorates when the
    /// backend renders markers as overlays rather than inline glyphs.
    pub marker_projected_height: i64,

    /// Maximum width, in abstract length units, a `Sequence` may use before
    /// it must wrap onto additional lines. `None` disables wrapping.
    pub max_width: Option<i64>,

    /// Pair of strings flanking a revealed hidden-symbol token in a node's
    /// label (see `hidden_symbols::reveal_hidden_symbols`).
    pub hidden_symbol_escape: (String, String),
}

impl LayoutSettings {
    /// Matches the constants the text backend feeds into layout: an arc
    /// radius of half a cell, integral margins, and no line wrapping unless
    /// the caller opts in.
    pub fn text_defaults() -> Self {
        Self {
            arc_radius: 0.5,
            arc_margin: 1,
            node_start_padding: 2,
            node_end_padding: 0,
            node_vertical_padding: 0,
            horizontal_seq_separation: 1,
            vertical_choice_separation: 1,
            vertical_choice_separation_outer: 2,
            vertical_seq_separation: 1,
            vertical_seq_separation_outer: 2,
            group_thickness: 1,
            group_vertical_padding: 1,
            marker_width: 4,
            marker_projected_height: 0,
            max_width: None,
            hidden_symbol_escape: ("<".to_string(), ">".to_string()),
        }
    }
}

/// Visual treatment of a `Node` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStyle {
    Terminal,
    NonTerminal,
    Comment,
}

/// How the two ends of the outermost diagram are capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndClass {
    /// A simple line, for diagrams embedded in a larger rule.
    Simple,
    /// The classic railroad-track cross-hatch, for a complete rule.
    Complex,
}

impl Default for EndClass {
    fn default() -> Self {
        EndClass::Complex
    }
}
