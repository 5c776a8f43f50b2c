//! Coordinate and geometry types shared by the engine and its callers.
//!
//! Canonical CPU space:
//! - Pixels of the bound render target
//! - Origin top-left
//! - +X right, +Y down
//!
//! Draw operations take a [`Transform`] that maps the unit square
//! `[0,1]×[0,1]` into this space. [`Rectangle::transformation`] is the usual
//! way to obtain one.

mod align;
mod color;
mod rect;
mod transform;
mod vec2;

pub use align::{HAlign, VAlign};
pub use color::Color;
pub use rect::Rectangle;
pub use transform::Transform;
pub use vec2::Vec2;
