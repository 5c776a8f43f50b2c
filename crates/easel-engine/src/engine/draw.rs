use crate::coords::{Color, Rectangle, Transform};
use crate::error::{EngineError, Result};
use crate::image::Image;
use crate::render::{DrawInstance, PipelineKind};

use super::target::uv_transform;
use super::{Engine, Quad};

impl Engine {
    /// Fills the whole bound target with `color`, alpha included.
    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.check_device()?;
        let target = self.bound()?;
        if self.trace_draws() {
            log::trace!("clear {color:?} on {}x{}", target.width, target.height);
        }
        self.record_pass(target, wgpu::LoadOp::Clear(color.to_wgpu()), None)
    }

    /// Fills the unit square mapped through `transform` (target pixels).
    ///
    /// With `copy_alpha` the target's alpha is replaced by `color.a`;
    /// otherwise target alpha is left untouched.
    pub fn fill_unit(&mut self, transform: Transform, color: Color, copy_alpha: bool) -> Result<()> {
        self.check_device()?;
        let target = self.bound()?;
        if self.trace_draws() {
            log::trace!("fill {color:?} copy_alpha={copy_alpha} {transform:?}");
        }

        let clip = target.projection().compose(transform);
        let quad = Quad {
            kind: PipelineKind::Fill { copy_alpha },
            instance: DrawInstance::fill(clip, color),
            texture: None,
        };
        self.record_pass(target, wgpu::LoadOp::Load, Some(quad))
    }

    pub fn fill_rect(&mut self, rect: Rectangle, color: Color, copy_alpha: bool) -> Result<()> {
        self.fill_unit(rect.transformation(), color, copy_alpha)
    }

    /// Draws the unit square through `dst`, colored by interpolating between
    /// `color1` and `color2` with the luminance of `mask` sampled through `src`
    /// (mask texels).
    pub fn blend_unit(
        &mut self,
        mask: &Image,
        dst: Transform,
        src: Transform,
        color1: Color,
        color2: Color,
    ) -> Result<()> {
        self.check_device()?;
        let target = self.bound()?;
        let (width, height) = self.texture_size(mask)?;
        if self.trace_draws() {
            log::trace!("blend {color1:?} -> {color2:?} through {width}x{height} mask");
        }

        let clip = target.projection().compose(dst);
        let uv = uv_transform(src, width, height, mask.flipped);
        let quad = Quad {
            kind: PipelineKind::Blend,
            instance: DrawInstance::blend(clip, uv, color1, color2),
            texture: Some(mask.id),
        };
        self.record_pass(target, wgpu::LoadOp::Load, Some(quad))
    }

    pub fn blend_rect(
        &mut self,
        mask: &Image,
        dst: Rectangle,
        src: Rectangle,
        color1: Color,
        color2: Color,
    ) -> Result<()> {
        self.blend_unit(mask, dst.transformation(), src.transformation(), color1, color2)
    }

    /// Draws the region of `img` selected by `src` (image texels) onto the
    /// unit square mapped through `dst`, multiplying coverage by `alpha`.
    pub fn draw_image(&mut self, img: &Image, dst: Transform, src: Transform, alpha: u8) -> Result<()> {
        self.check_device()?;
        let target = self.bound()?;
        let (width, height) = self.texture_size(img)?;
        if self.trace_draws() {
            log::trace!("image {width}x{height} alpha={alpha} flipped={}", img.flipped);
        }

        let clip = target.projection().compose(dst);
        let uv = uv_transform(src, width, height, img.flipped);
        let quad = Quad {
            kind: PipelineKind::Image,
            instance: DrawInstance::image(clip, uv, alpha, !img.has_alpha),
            texture: Some(img.id),
        };
        self.record_pass(target, wgpu::LoadOp::Load, Some(quad))
    }

    /// Size of the live texture behind `img`.
    fn texture_size(&self, img: &Image) -> Result<(u32, u32)> {
        if img.is_empty() {
            return Err(EngineError::EmptyImage);
        }
        self.textures
            .get(img.id)
            .map(|entry| (entry.width, entry.height))
            .ok_or(EngineError::StaleImage)
    }
}
