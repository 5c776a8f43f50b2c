//! Off-screen render targets.
//!
//! A canvas redirects every draw to a fresh texture until it is finished
//! (the texture becomes an [`Image`]) or closed (the texture is freed).
//! Canvases nest: the engine keeps a stack of them on top of the window, and
//! completing a canvas rebinds whatever was bound before it.
//!
//! [`Canvas`] is the scoped form. It borrows the engine mutably, so while a
//! nested canvas is alive the outer one cannot be touched, and a canvas that
//! goes out of scope unfinished is closed.

use std::ops::{Deref, DerefMut};

use crate::coords::Rectangle;
use crate::engine::resources::{validate_size, Framebuffer};
use crate::engine::{Engine, FramebufferKey};
use crate::error::{EngineError, Result};
use crate::image::Image;

/// Identifies an active canvas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CanvasId(FramebufferKey);

impl Engine {
    /// Creates a `width × height` canvas, clears it to transparent black and
    /// binds it.
    ///
    /// Canvases without alpha produce images drawn as opaque.
    pub fn begin_canvas(&mut self, width: u32, height: u32, with_alpha: bool) -> Result<CanvasId> {
        self.check_device()?;
        validate_size(width, height, self.max_texture_dim())?;

        let texture = self.insert_texture("easel canvas", width, height, true);
        let key = self.framebuffers.insert(Framebuffer {
            texture,
            width,
            height,
            alpha: with_alpha,
        });
        self.targets.push(key);

        log::debug!(
            "canvas {width}x{height} (alpha={with_alpha}) bound, depth {}",
            self.targets.len()
        );

        let target = self.bound()?;
        self.record_pass(
            target,
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            None,
        )?;
        Ok(CanvasId(key))
    }

    /// `(0, 0, width, height)` of an active canvas.
    pub fn canvas_rectangle(&self, id: CanvasId) -> Result<Rectangle> {
        self.framebuffers
            .get(id.0)
            .map(|fb| Rectangle::from_size(fb.width, fb.height))
            .ok_or(EngineError::UnknownCanvas(id))
    }

    /// The innermost active canvas, if any.
    pub fn active_canvas(&self) -> Option<CanvasId> {
        self.targets.last().copied().map(CanvasId)
    }

    /// Completes the canvas, keeping its contents as an image.
    pub fn finish_canvas(&mut self, id: CanvasId) -> Result<Image> {
        let fb = self.unbind(id)?;
        log::debug!("canvas {}x{} finished", fb.width, fb.height);
        Ok(Image::new(fb.texture, fb.width, fb.height, true, fb.alpha))
    }

    /// Completes the canvas and discards its texture.
    pub fn close_canvas(&mut self, id: CanvasId) -> Result<()> {
        let fb = self.unbind(id)?;
        self.textures.remove(fb.texture);
        log::debug!("canvas {}x{} closed", fb.width, fb.height);
        Ok(())
    }

    /// Pops `id` off the target stack; it must be the innermost canvas.
    fn unbind(&mut self, id: CanvasId) -> Result<Framebuffer> {
        if !self.framebuffers.contains_key(id.0) {
            return Err(EngineError::UnknownCanvas(id));
        }
        match self.targets.last() {
            Some(&top) if top == id.0 => {}
            Some(&top) => {
                return Err(EngineError::CanvasNotInnermost {
                    canvas: id,
                    innermost: CanvasId(top),
                });
            }
            None => return Err(EngineError::UnknownCanvas(id)),
        }

        self.targets.pop();
        self.framebuffers
            .remove(id.0)
            .ok_or(EngineError::UnknownCanvas(id))
    }
}

/// Scoped canvas; draws go to it through `Deref<Target = Engine>`.
///
/// ```ignore
/// let mut canvas = Canvas::create(&mut engine, 200, 200, true)?;
/// canvas.fill_rect(Rectangle::new(0, 0, 100, 100), Color::RED, true)?;
/// let img = canvas.finish()?;
/// ```
pub struct Canvas<'e> {
    engine: &'e mut Engine,
    id: CanvasId,
    width: u32,
    height: u32,
    alpha: bool,
    done: bool,
}

impl<'e> Canvas<'e> {
    pub fn create(engine: &'e mut Engine, width: u32, height: u32, with_alpha: bool) -> Result<Self> {
        let id = engine.begin_canvas(width, height, with_alpha)?;
        Ok(Self {
            engine,
            id,
            width,
            height,
            alpha: with_alpha,
            done: false,
        })
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn rectangle(&self) -> Rectangle {
        Rectangle::from_size(self.width, self.height)
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// Restores the previous target and returns the canvas contents.
    pub fn finish(mut self) -> Result<Image> {
        self.done = true;
        self.engine.finish_canvas(self.id)
    }

    /// Restores the previous target and frees the canvas texture.
    pub fn close(mut self) -> Result<()> {
        self.done = true;
        self.engine.close_canvas(self.id)
    }
}

impl Deref for Canvas<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        &*self.engine
    }
}

impl DerefMut for Canvas<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        &mut *self.engine
    }
}

impl Drop for Canvas<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        log::debug!("canvas {:?} dropped unfinished; closing", self.id);
        if let Err(err) = self.engine.close_canvas(self.id) {
            log::warn!("failed to close dropped canvas: {err}");
        }
    }
}
