use std::sync::mpsc;

use crate::coords::Rectangle;
use crate::error::{EngineError, Result};

use super::Engine;

impl Engine {
    /// Reads back `rect` of the bound target, top row first.
    ///
    /// Submits all pending draws and blocks until the copy completes.
    pub fn read_pixels(&mut self, rect: Rectangle) -> Result<image::RgbaImage> {
        self.check_device()?;
        let target = self.bound()?;

        let inside = rect.x >= 0
            && rect.y >= 0
            && !rect.is_empty()
            && rect.x as u64 + rect.width as u64 <= target.width as u64
            && rect.y as u64 + rect.height as u64 <= target.height as u64;
        if !inside {
            return Err(EngineError::OutOfBounds);
        }

        let (x, y, width, height) = (rect.x as u32, rect.y as u32, rect.width, rect.height);
        // Canvases store rows bottom-up.
        let origin_y = if target.flip_y {
            target.height - y - height
        } else {
            y
        };

        let unpadded_bytes_per_row = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = self.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel readback"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.take_encoder();
        {
            let texture = target.texture(self.window_entry(), &self.textures)?;
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x, y: origin_y, z: 0 },
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row),
                        rows_per_image: Some(height),
                    },
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }
        self.queue().submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|err| EngineError::Readback(err.to_string()))?;
        rx.recv()
            .map_err(|err| EngineError::Readback(err.to_string()))?
            .map_err(|err| EngineError::Readback(err.to_string()))?;

        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
        {
            let data = slice.get_mapped_range();
            let rows: Vec<&[u8]> = data
                .chunks(padded_bytes_per_row as usize)
                .map(|row| &row[..unpadded_bytes_per_row as usize])
                .collect();
            if target.flip_y {
                rows.iter().rev().for_each(|row| pixels.extend_from_slice(row));
            } else {
                rows.iter().for_each(|row| pixels.extend_from_slice(row));
            }
        }
        buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| EngineError::Readback("readback buffer size mismatch".into()))
    }
}
