//! Integer geometry primitives: a 2-vector and a step-function ridge line
//! used to pack diagram rows without overlap.

mod ridge_line;
mod vec2;

pub use ridge_line::RidgeLine;
pub use vec2::Vec2;
