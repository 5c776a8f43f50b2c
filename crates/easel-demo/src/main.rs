//! Demo window: two rectangles, a rotating image and a pre-rendered canvas.
//!
//! Usage: `easel-demo [IMAGE]` (default `test.png`). `EASEL_BACKEND` selects
//! the backend (`ogl32`, `ogl43`, `ogles20`, `ogles31`, `auto`); `EASEL_DEBUG`
//! enables validation and per-draw tracing.

mod runtime;

use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::{Context, Result};

use easel_engine::device::GpuInit;
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::{
    Backend, Canvas, Color, Engine, HAlign, Image, Rectangle, Transform, VAlign,
};

use runtime::{Runtime, RuntimeConfig, Scene};

struct Demo {
    image_path: PathBuf,
    image: Image,
    painted: Image,
    angle: f32,
    image_angle: f32,
}

impl Demo {
    fn new(image_path: PathBuf) -> Self {
        Self {
            image_path,
            image: Image::empty(),
            painted: Image::empty(),
            angle: 0.0,
            image_angle: 0.0,
        }
    }
}

/// Four colored quadrants rendered once into a canvas.
fn paint_quadrants(engine: &mut Engine) -> easel_engine::Result<Image> {
    let mut canvas = Canvas::create(engine, 200, 200, false)?;
    let area = canvas.rectangle();
    for (halign, valign, color) in [
        (HAlign::Left, VAlign::Top, Color::RED),
        (HAlign::Right, VAlign::Top, Color::YELLOW),
        (HAlign::Left, VAlign::Bottom, Color::BLUE),
        (HAlign::Right, VAlign::Bottom, Color::GREEN),
    ] {
        canvas.fill_rect(area.position(100, 100, halign, valign), color, true)?;
    }
    canvas.finish()
}

impl Scene for Demo {
    fn setup(&mut self, engine: &mut Engine) -> easel_engine::Result<()> {
        self.image = engine.load_image(&self.image_path);
        log::info!(
            "loaded texture: w = {}, h = {}, alpha = {}",
            self.image.width,
            self.image.height,
            self.image.has_alpha
        );
        self.painted = paint_quadrants(engine)?;
        Ok(())
    }

    fn frame(&mut self, engine: &mut Engine) -> easel_engine::Result<()> {
        let (w, h) = engine.window_size();
        let (w, h) = (w as i32, h as i32);
        let r1 = Rectangle::new(w / 4 - 50, h / 4 - 50, 100, 100);
        let r2 = Rectangle::new(w * 3 / 4 - 50, h * 3 / 4 - 50, 100, 100);

        engine.clear(Color::BLACK)?;
        engine.fill_rect(r1, Color::RED, true)?;
        engine.fill_unit(r2.transformation().rotate(self.angle), Color::GREEN, true)?;

        if !self.image.is_empty() {
            let area = self.image.area();
            engine.draw_image(
                &self.image,
                area.moved(500, 400).transformation(),
                Transform::identity()
                    .rotate(self.image_angle)
                    .compose(area.transformation()),
                255,
            )?;
        }

        self.angle = (self.angle + 0.01) % TAU;
        self.image_angle = (self.image_angle + 0.001) % TAU;

        if !self.painted.is_empty() {
            self.painted.draw_all(engine, self.painted.area(), 255)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let debug = std::env::var_os("EASEL_DEBUG").is_some();
    init_logging(LoggingConfig {
        debug,
        ..Default::default()
    });

    let backend = match std::env::var("EASEL_BACKEND") {
        Ok(name) => name
            .parse::<Backend>()
            .with_context(|| format!("EASEL_BACKEND={name}"))?,
        Err(_) => Backend::default(),
    };

    let image_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test.png"));

    log::info!("starting demo on backend {backend}");

    Runtime::run(
        RuntimeConfig {
            title: "easel demo".to_string(),
            ..Default::default()
        },
        GpuInit {
            backend,
            debug,
            ..Default::default()
        },
        Demo::new(image_path),
    )
}
