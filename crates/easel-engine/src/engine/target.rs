use slotmap::SlotMap;

use crate::coords::{Rectangle, Transform};
use crate::error::{EngineError, Result};

use super::resources::{Framebuffer, TextureEntry, TextureKey};

/// Snapshot of the render target currently on top of the target stack.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct BoundTarget {
    /// `None` is the window backbuffer.
    pub texture: Option<TextureKey>,
    pub width: u32,
    pub height: u32,
    /// Rows are stored bottom-up (off-screen canvases).
    pub flip_y: bool,
}

impl BoundTarget {
    pub(crate) fn window(width: u32, height: u32) -> Self {
        Self {
            texture: None,
            width,
            height,
            flip_y: false,
        }
    }

    pub(crate) fn canvas(fb: &Framebuffer) -> Self {
        Self {
            texture: Some(fb.texture),
            width: fb.width,
            height: fb.height,
            flip_y: true,
        }
    }

    pub(crate) fn area(&self) -> Rectangle {
        Rectangle::from_size(self.width, self.height)
    }

    /// Maps target pixels (top-left origin, +Y down) to clip space.
    ///
    /// Canvases store their rows bottom-up, so their projection mirrors Y;
    /// images produced from them carry `flipped = true` to undo it on sampling.
    pub(crate) fn projection(&self) -> Transform {
        let sx = 2.0 / self.width.max(1) as f32;
        let sy = 2.0 / self.height.max(1) as f32;
        if self.flip_y {
            Transform::from_cols([sx, 0.0], [0.0, sy], [-1.0, -1.0])
        } else {
            Transform::from_cols([sx, 0.0], [0.0, -sy], [-1.0, 1.0])
        }
    }

    /// Resolves the color view to render into.
    pub(crate) fn view<'a>(
        &self,
        window: &'a TextureEntry,
        textures: &'a SlotMap<TextureKey, TextureEntry>,
    ) -> Result<&'a wgpu::TextureView> {
        match self.texture {
            None => Ok(&window.view),
            Some(key) => textures
                .get(key)
                .map(|entry| &entry.view)
                .ok_or(EngineError::StaleImage),
        }
    }

    /// Texture backing the target, for readback.
    pub(crate) fn texture<'a>(
        &self,
        window: &'a TextureEntry,
        textures: &'a SlotMap<TextureKey, TextureEntry>,
    ) -> Result<&'a wgpu::Texture> {
        match self.texture {
            None => Ok(&window.texture),
            Some(key) => textures
                .get(key)
                .map(|entry| &entry.texture)
                .ok_or(EngineError::StaleImage),
        }
    }
}

/// Maps the unit square onto the texture region selected by `src` (texel
/// space of a `width × height` texture), returning normalized coordinates.
pub(crate) fn uv_transform(src: Transform, width: u32, height: u32, flipped: bool) -> Transform {
    let uv = Transform::identity()
        .scale(1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32)
        .compose(src);
    if flipped {
        Transform::from_cols([1.0, 0.0], [0.0, -1.0], [0.0, 1.0]).compose(uv)
    } else {
        uv
    }
}
