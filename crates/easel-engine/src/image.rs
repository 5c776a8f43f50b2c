//! Image descriptors.

use slotmap::Key;

use crate::coords::Rectangle;
use crate::engine::{Engine, TextureKey};
use crate::error::Result;

/// Non-owning handle to a texture held by an [`Engine`].
///
/// Images come from [`Engine::load_image`], [`Engine::upload_image`] or a
/// finished [`Canvas`](crate::canvas::Canvas). Copies share the texture; once
/// it is released every copy is stale and draws with it fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Image {
    pub(crate) id: TextureKey,
    pub width: u32,
    pub height: u32,
    /// Stored bottom-up; sampling inverts the vertical coordinate.
    pub flipped: bool,
    pub has_alpha: bool,
}

impl Image {
    pub(crate) fn new(id: TextureKey, width: u32, height: u32, flipped: bool, has_alpha: bool) -> Self {
        Self {
            id,
            width,
            height,
            flipped,
            has_alpha,
        }
    }

    /// The sentinel returned when loading fails. Drawing it is an error.
    pub fn empty() -> Self {
        Self::new(TextureKey::null(), 0, 0, false, false)
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_null()
    }

    pub fn id(&self) -> TextureKey {
        self.id
    }

    /// `(0, 0, width, height)`.
    pub fn area(&self) -> Rectangle {
        Rectangle::from_size(self.width, self.height)
    }

    /// Draws the `src` region of this image into `dst`.
    pub fn draw(&self, engine: &mut Engine, dst: Rectangle, src: Rectangle, alpha: u8) -> Result<()> {
        engine.draw_image(self, dst.transformation(), src.transformation(), alpha)
    }

    /// Draws the whole image into `dst`.
    pub fn draw_all(&self, engine: &mut Engine, dst: Rectangle, alpha: u8) -> Result<()> {
        self.draw(engine, dst, self.area(), alpha)
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}
