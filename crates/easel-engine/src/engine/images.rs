use std::path::Path;

use crate::error::{EngineError, Result};
use crate::image::Image;

use super::resources::validate_size;
use super::Engine;

impl Engine {
    /// Decodes the file at `path` and uploads it as an RGBA texture.
    pub fn try_load_image(&mut self, path: impl AsRef<Path>) -> Result<Image> {
        self.check_device()?;
        let path = path.as_ref();

        let decoded = image::open(path).map_err(|source| EngineError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let has_alpha = decoded.color().has_alpha();
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let img = self.upload_image(width, height, rgba.as_raw(), has_alpha)?;
        log::debug!(
            "loaded {} ({width}x{height}, alpha={has_alpha})",
            path.display()
        );
        Ok(img)
    }

    /// Like [`try_load_image`](Self::try_load_image), but logs the failure
    /// and returns [`Image::empty`] instead.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Image {
        match self.try_load_image(path) {
            Ok(img) => img,
            Err(err) => {
                match std::error::Error::source(&err) {
                    Some(cause) => log::warn!("{err}: {cause}"),
                    None => log::warn!("{err}"),
                }
                Image::empty()
            }
        }
    }

    /// Creates an image from tightly packed RGBA8 rows, top row first.
    ///
    /// `has_alpha = false` makes draws treat the image as opaque regardless
    /// of the alpha bytes.
    pub fn upload_image(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
        has_alpha: bool,
    ) -> Result<Image> {
        self.check_device()?;
        validate_size(width, height, self.max_texture_dim())?;

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(EngineError::PixelDataLength {
                expected,
                actual: rgba.len(),
            });
        }

        let key = self.insert_texture("easel image", width, height, false);
        let entry = self.textures.get(key).ok_or(EngineError::StaleImage)?;
        self.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &entry.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(Image::new(key, width, height, false, has_alpha))
    }

    /// Frees the texture behind `img`. Copies of `img` become stale.
    pub fn release_image(&mut self, img: &Image) -> Result<()> {
        if img.is_empty() {
            return Err(EngineError::EmptyImage);
        }
        if self.framebuffers.values().any(|fb| fb.texture == img.id) {
            // Still a render target; only close_canvas may free it.
            return Err(EngineError::StaleImage);
        }
        self.textures
            .remove(img.id)
            .map(|entry| log::debug!("released {}x{} image", entry.width, entry.height))
            .ok_or(EngineError::StaleImage)
    }
}
