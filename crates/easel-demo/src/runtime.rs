use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use easel_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use easel_engine::{Engine, EngineConfig};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Per-window drawing callbacks.
pub trait Scene {
    /// Called once the engine exists, before the first frame.
    fn setup(&mut self, engine: &mut Engine) -> easel_engine::Result<()>;

    /// Draws one frame into the engine's window backbuffer.
    fn frame(&mut self, engine: &mut Engine) -> easel_engine::Result<()>;
}

pub struct Runtime;

impl Runtime {
    pub fn run<S>(config: RuntimeConfig, gpu_init: GpuInit, scene: S) -> Result<()>
    where
        S: Scene + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            gpu_init,
            scene,
            window: None,
            engine: None,
            failed: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failed {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<S: Scene> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: S,

    window: Option<WindowEntry>,
    engine: Option<Engine>,
    failed: Option<anyhow::Error>,
}

impl<S: Scene> AppState<S> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failed = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let (size, device, queue) = entry.with_gpu(|gpu| {
            (gpu.size(), gpu.device().clone(), gpu.queue().clone())
        });

        let mut engine = Engine::new(
            device,
            queue,
            EngineConfig {
                backend: self.gpu_init.backend,
                window_width: size.width,
                window_height: size.height,
                debug: self.gpu_init.debug,
            },
        )
        .context("failed to create engine")?;

        self.scene
            .setup(&mut engine)
            .context("scene setup failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.engine = Some(engine);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let (Some(entry), Some(engine)) = (self.window.as_mut(), self.engine.as_mut()) else {
            return Ok(());
        };
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        entry.with_gpu_mut(|gpu| gpu.resize(size));
        engine
            .set_window_size(size.width, size.height)
            .context("failed to resize window backbuffer")?;
        entry.with_window(|w| w.request_redraw());
        Ok(())
    }

    /// Returns `false` when the surface is unusable.
    fn redraw(&mut self) -> Result<bool> {
        let (Some(entry), Some(engine)) = (self.window.as_mut(), self.engine.as_mut()) else {
            return Ok(true);
        };

        self.scene.frame(engine).context("frame failed")?;

        entry.with_gpu_mut(|gpu| -> Result<bool> {
            let frame = match gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    return match gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                            engine.flush().context("flush failed")?;
                            Ok(true)
                        }
                        SurfaceErrorAction::Fatal => Ok(false),
                    };
                }
            };

            engine
                .present(&frame.view, gpu.surface_format())
                .context("present failed")?;
            gpu.present(frame);
            Ok(true)
        })
    }
}

impl<S: Scene> ApplicationHandler for AppState<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the scene animates every frame.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(engine) = self.engine.take() {
                    engine.close();
                }
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Err(err) = self.resize(size) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    if let Err(err) = self.resize(size) {
                        self.fail(event_loop, err);
                    }
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(true) => {}
                Ok(false) => {
                    self.fail(event_loop, anyhow::anyhow!("surface lost beyond recovery"))
                }
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
