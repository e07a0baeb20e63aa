//! Element tree, layout engine, and rendering ports shared by every
//! diagram backend.
//!
//! A diagram is built as a tree of [`tree::Element`] values, laid out once
//! with [`tree::Element::calculate_layout`] against a [`settings::LayoutSettings`]
//! and a root [`context::LayoutContext`], then drawn with
//! [`tree::Element::render`] against anything implementing [`ports::Render`].

pub mod context;
pub mod error;
pub mod hidden_symbols;
pub mod isolation;
pub mod layout;
pub mod ports;
pub mod settings;
pub mod tree;

pub use context::{ConnectionDirection, ConnectionType, LayoutContext, RenderContext};
pub use error::{DiagramError, InvariantError, LoadingError, Result};
pub use layout::BoxRecord;
pub use ports::{HrefResolver, Line, NoHrefs, Render};
pub use settings::{EndClass, LayoutSettings, NodeStyle};
pub use tree::{Barrier, Choice, Element, End, Group, Node, OneOrMore, Sequence, Skip};
