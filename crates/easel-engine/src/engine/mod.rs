//! The drawing engine.
//!
//! [`Engine`] owns every GPU object: the window backbuffer, a texture table
//! for images and canvases, the framebuffer table of active canvases, the
//! render-target stack and the pending command encoder.
//!
//! Draw calls record one render pass each, in program order. Nothing is
//! submitted until [`Engine::flush`], [`Engine::present`],
//! [`Engine::read_pixels`] or [`Engine::close`].

mod draw;
mod images;
mod readback;
pub(crate) mod resources;
pub(crate) mod target;

#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex};

use slotmap::SlotMap;
use wgpu::util::DeviceExt;

use crate::coords::{Rectangle, Transform};
use crate::device::{request_headless, Backend};
use crate::error::{EngineError, Result};
use crate::render::{DrawInstance, PipelineKind, Pipelines, TARGET_FORMAT};

pub use resources::{FramebufferKey, TextureKey};

use resources::{validate_size, Framebuffer, TextureEntry};
use target::BoundTarget;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Backend used by [`Engine::headless`]; informational for [`Engine::new`].
    pub backend: Backend,
    pub window_width: u32,
    pub window_height: u32,
    /// Enables per-draw trace logging and GPU validation on headless devices.
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            window_width: 800,
            window_height: 600,
            debug: false,
        }
    }
}

/// One quad to draw inside a render pass.
pub(crate) struct Quad {
    pub kind: PipelineKind,
    pub instance: DrawInstance,
    pub texture: Option<TextureKey>,
}

pub struct Engine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: EngineConfig,
    max_texture_dim: u32,

    pipelines: Pipelines,

    window: TextureEntry,
    pub(crate) textures: SlotMap<TextureKey, TextureEntry>,
    pub(crate) framebuffers: SlotMap<FramebufferKey, Framebuffer>,
    /// Active canvases, innermost last. Empty means the window is bound.
    pub(crate) targets: Vec<FramebufferKey>,

    encoder: Option<wgpu::CommandEncoder>,
    lost: Arc<Mutex<Option<String>>>,
}

impl Engine {
    /// Builds an engine on a device acquired by the caller.
    ///
    /// Every pipeline used for off-screen rendering is built here, so shader
    /// problems show up at initialization rather than on the first draw.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, config: EngineConfig) -> Result<Self> {
        let max_texture_dim = device.limits().max_texture_dimension_2d;
        validate_size(config.window_width, config.window_height, max_texture_dim)?;

        let lost = Arc::new(Mutex::new(None));
        let lost_slot = Arc::clone(&lost);
        device.set_device_lost_callback(move |reason, message| {
            log::error!("GPU device lost ({reason:?}): {message}");
            if let Ok(mut slot) = lost_slot.lock() {
                *slot = Some(format!("{reason:?}: {message}"));
            }
        });

        let mut pipelines = Pipelines::new(&device);
        pipelines.warm(&device, TARGET_FORMAT);

        let window = TextureEntry::new(
            &device,
            &pipelines,
            "easel window backbuffer",
            config.window_width,
            config.window_height,
            true,
        );

        log::info!(
            "engine ready: window {}x{}, backend {}, max texture {}",
            config.window_width,
            config.window_height,
            config.backend,
            max_texture_dim
        );

        Ok(Self {
            device,
            queue,
            config,
            max_texture_dim,
            pipelines,
            window,
            textures: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            targets: Vec::new(),
            encoder: None,
            lost,
        })
    }

    /// Acquires a surfaceless device for `config.backend` and builds an engine on it.
    pub fn headless(config: EngineConfig) -> Result<Self> {
        let gpu = pollster::block_on(request_headless(config.backend, config.debug))?;
        Self::new(gpu.device, gpu.queue, config)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resizes the window backbuffer. Its previous contents are discarded.
    pub fn set_window_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.check_device()?;
        validate_size(width, height, self.max_texture_dim)?;
        if (width, height) == self.window_size() {
            return Ok(());
        }

        log::debug!("window backbuffer resized to {width}x{height}");
        self.window = TextureEntry::new(
            &self.device,
            &self.pipelines,
            "easel window backbuffer",
            width,
            height,
            true,
        );
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    /// Area of the bound render target: a canvas if one is active, else the window.
    pub fn area(&self) -> Rectangle {
        match self.bound() {
            Ok(target) => target.area(),
            Err(_) => Rectangle::from_size(self.window.width, self.window.height),
        }
    }

    /// Number of live textures (images plus active canvases).
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Submits all recorded draws.
    pub fn flush(&mut self) -> Result<()> {
        self.check_device()?;
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
        Ok(())
    }

    /// Copies the window backbuffer onto `view` (e.g. a surface texture of
    /// `format`) and submits.
    pub fn present(&mut self, view: &wgpu::TextureView, format: wgpu::TextureFormat) -> Result<()> {
        self.check_device()?;
        if !self.targets.is_empty() {
            log::warn!(
                "presenting with {} canvas(es) still active",
                self.targets.len()
            );
        }

        self.pipelines.ensure(&self.device, format, PipelineKind::Copy);

        let full_screen = Transform::from_cols([2.0, 0.0], [0.0, -2.0], [-1.0, 1.0]);
        let instance = DrawInstance::image(full_screen, Transform::identity(), u8::MAX, true);
        let instance_buf = self.instance_buffer(&instance);

        let encoder = self.encoder.get_or_insert_with(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("easel encoder"),
                })
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel present pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.pipelines.draw(
                &mut pass,
                format,
                PipelineKind::Copy,
                &instance_buf,
                Some(&self.window.bind_group),
            );
        }

        self.flush()
    }

    /// Submits pending work and releases every texture and canvas.
    ///
    /// The device itself may be shared with the host and is left alive.
    pub fn close(mut self) {
        if let Err(err) = self.flush() {
            log::warn!("final flush failed: {err}");
        }
        if !self.targets.is_empty() {
            log::warn!("closing engine with {} active canvas(es)", self.targets.len());
        }

        let textures = self.textures.len();
        self.targets.clear();
        self.framebuffers.clear();
        for (_, entry) in self.textures.drain() {
            entry.texture.destroy();
        }
        self.window.texture.destroy();

        log::debug!("engine closed; released {textures} texture(s)");
    }

    /// Fails once the device-lost callback has fired.
    pub(crate) fn check_device(&self) -> Result<()> {
        let slot = match self.lost.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        match slot.as_ref() {
            Some(reason) => Err(EngineError::DeviceLost(reason.clone())),
            None => Ok(()),
        }
    }

    /// The target on top of the stack.
    pub(crate) fn bound(&self) -> Result<BoundTarget> {
        match self.targets.last() {
            None => Ok(BoundTarget::window(self.window.width, self.window.height)),
            Some(&key) => self
                .framebuffers
                .get(key)
                .map(BoundTarget::canvas)
                .ok_or(EngineError::StaleImage),
        }
    }

    pub(crate) fn max_texture_dim(&self) -> u32 {
        self.max_texture_dim
    }

    pub(crate) fn trace_draws(&self) -> bool {
        self.config.debug
    }

    /// Allocates a texture and registers it in the texture table.
    pub(crate) fn insert_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        renderable: bool,
    ) -> TextureKey {
        let entry = TextureEntry::new(
            &self.device,
            &self.pipelines,
            label,
            width,
            height,
            renderable,
        );
        self.textures.insert(entry)
    }

    fn instance_buffer(&self, instance: &DrawInstance) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel instance"),
                contents: bytemuck::bytes_of(instance),
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    /// Records one render pass on `target`, optionally drawing `quad`.
    pub(crate) fn record_pass(
        &mut self,
        target: BoundTarget,
        load: wgpu::LoadOp<wgpu::Color>,
        quad: Option<Quad>,
    ) -> Result<()> {
        let instance_buf = quad.as_ref().map(|q| self.instance_buffer(&q.instance));

        let Self {
            device,
            pipelines,
            window,
            textures,
            encoder,
            ..
        } = self;

        if let Some(q) = &quad {
            pipelines.ensure(device, TARGET_FORMAT, q.kind);
        }

        let view = target.view(window, textures)?;
        let bind_group = match quad.as_ref().and_then(|q| q.texture) {
            None => None,
            Some(key) => Some(
                &textures
                    .get(key)
                    .ok_or(EngineError::StaleImage)?
                    .bind_group,
            ),
        };

        let encoder = encoder.get_or_insert_with(|| {
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel encoder"),
            })
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if let (Some(q), Some(buf)) = (&quad, &instance_buf) {
            pipelines.draw(&mut pass, TARGET_FORMAT, q.kind, buf, bind_group);
        }

        Ok(())
    }

    /// Takes the pending encoder, creating one if nothing was recorded.
    pub(crate) fn take_encoder(&mut self) -> wgpu::CommandEncoder {
        match self.encoder.take() {
            Some(encoder) => encoder,
            None => self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("easel encoder"),
                }),
        }
    }

    pub(crate) fn window_entry(&self) -> &TextureEntry {
        &self.window
    }
}
