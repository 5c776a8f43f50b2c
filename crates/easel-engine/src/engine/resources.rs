//! Engine-owned GPU objects and the tables indexing them.

use crate::error::{EngineError, Result};
use crate::render::{Pipelines, TARGET_FORMAT};

slotmap::new_key_type! {
    /// Generational key of a texture in the engine's texture table.
    ///
    /// The null key is reserved for [`Image::empty`](crate::image::Image::empty).
    pub struct TextureKey;

    /// Generational key of an off-screen framebuffer (an active canvas).
    pub struct FramebufferKey;
}

/// A sampled texture plus the bind group used to draw it.
pub(crate) struct TextureEntry {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl TextureEntry {
    /// Allocates an `Rgba8Unorm` texture.
    ///
    /// `renderable` adds the usages needed to bind the texture as a render
    /// target and read it back; otherwise it only accepts uploads.
    pub(crate) fn new(
        device: &wgpu::Device,
        pipelines: &Pipelines,
        label: &str,
        width: u32,
        height: u32,
        renderable: bool,
    ) -> Self {
        let usage = if renderable {
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
        } else {
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = pipelines.texture_bind_group(device, &view);

        Self {
            texture,
            view,
            bind_group,
            width,
            height,
        }
    }
}

/// An active off-screen render target backed by an entry of the texture table.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Framebuffer {
    pub texture: TextureKey,
    pub width: u32,
    pub height: u32,
    pub alpha: bool,
}

/// Rejects sizes the device cannot allocate.
pub(crate) fn validate_size(width: u32, height: u32, max_dim: u32) -> Result<()> {
    if width == 0 || height == 0 || width > max_dim || height > max_dim {
        return Err(EngineError::InvalidSize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_size_bounds() {
        assert!(validate_size(1, 1, 8).is_ok());
        assert!(validate_size(8, 8, 8).is_ok());
        assert!(matches!(
            validate_size(0, 4, 8),
            Err(EngineError::InvalidSize { width: 0, height: 4 })
        ));
        assert!(validate_size(9, 1, 8).is_err());
    }
}
