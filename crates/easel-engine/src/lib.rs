//! Easel engine crate.
//!
//! Immediate-mode 2D drawing over wgpu. Callers build [`Transform`]s and
//! [`Rectangle`]s, then fill, blend and blit textured quads into the window
//! backbuffer or into nested off-screen [`Canvas`]es.

pub mod canvas;
pub mod coords;
pub mod device;
pub mod engine;
pub mod error;
pub mod image;
pub mod logging;
pub mod render;

pub use canvas::{Canvas, CanvasId};
pub use coords::{Color, HAlign, Rectangle, Transform, VAlign, Vec2};
pub use device::Backend;
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, Result};
pub use image::Image;
