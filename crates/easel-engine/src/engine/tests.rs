//! GPU tests on a headless engine.
//!
//! Every test skips when the machine has no usable adapter (not even a
//! software one).

use super::*;
use crate::canvas::Canvas;
use crate::coords::{Color, HAlign, VAlign};
use crate::image::Image;

// ── helpers ───────────────────────────────────────────────────────────────

fn headless(width: u32, height: u32) -> Option<Engine> {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EngineConfig {
        window_width: width,
        window_height: height,
        debug: true,
        ..Default::default()
    };
    match Engine::headless(config) {
        Ok(engine) => Some(engine),
        Err(err) => {
            log::warn!("skipping GPU test: {err}");
            None
        }
    }
}

macro_rules! engine_or_skip {
    ($w:expr, $h:expr) => {
        match headless($w, $h) {
            Some(engine) => engine,
            None => return,
        }
    };
}

fn pixel(engine: &mut Engine, x: i32, y: i32) -> [u8; 4] {
    let img = engine
        .read_pixels(Rectangle::new(x, y, 1, 1))
        .expect("readback");
    img.get_pixel(0, 0).0
}

#[track_caller]
fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 2);
    assert!(close, "pixel {actual:?} != {expected:?}");
}

fn solid(width: u32, height: u32, color: Color) -> Vec<u8> {
    color.to_array().repeat((width * height) as usize)
}

// ── canvas composition ────────────────────────────────────────────────────

#[test]
fn quadrant_canvas_round_trips_to_window() {
    let mut engine = engine_or_skip!(200, 200);
    engine.clear(Color::BLACK).unwrap();

    let img = {
        let mut canvas = Canvas::create(&mut engine, 200, 200, false).unwrap();
        let area = canvas.rectangle();
        let quadrants = [
            (HAlign::Left, VAlign::Top, Color::RED),
            (HAlign::Right, VAlign::Top, Color::YELLOW),
            (HAlign::Left, VAlign::Bottom, Color::BLUE),
            (HAlign::Right, VAlign::Bottom, Color::GREEN),
        ];
        for (h, v, color) in quadrants {
            canvas
                .fill_rect(area.position(100, 100, h, v), color, true)
                .unwrap();
        }
        canvas.finish().unwrap()
    };

    assert_eq!((img.width, img.height), (200, 200));
    assert!(img.flipped);
    assert!(!img.has_alpha);
    assert_eq!(engine.active_canvas(), None);

    let window = engine.area();
    img.draw_all(&mut engine, window, 255).unwrap();

    assert_near(pixel(&mut engine, 50, 50), [255, 0, 0, 255]);
    assert_near(pixel(&mut engine, 150, 50), [255, 255, 0, 255]);
    assert_near(pixel(&mut engine, 50, 150), [0, 0, 255, 255]);
    assert_near(pixel(&mut engine, 150, 150), [0, 255, 0, 255]);
}

#[test]
fn completing_a_canvas_restores_previous_target() {
    let mut engine = engine_or_skip!(40, 20);
    engine.clear(Color::BLACK).unwrap();
    engine
        .fill_rect(Rectangle::new(0, 0, 10, 10), Color::RED, true)
        .unwrap();
    let before = pixel(&mut engine, 5, 5);

    let mut canvas = Canvas::create(&mut engine, 8, 8, true).unwrap();
    assert_eq!(canvas.area(), Rectangle::from_size(8, 8));
    canvas.clear(Color::WHITE).unwrap();
    canvas.close().unwrap();

    assert_eq!(engine.area(), Rectangle::from_size(40, 20));
    engine
        .fill_rect(Rectangle::new(10, 0, 10, 10), Color::BLUE, true)
        .unwrap();

    assert_eq!(pixel(&mut engine, 5, 5), before);
    assert_near(pixel(&mut engine, 15, 5), [0, 0, 255, 255]);
    assert_near(pixel(&mut engine, 25, 5), [0, 0, 0, 255]);
}

#[test]
fn canvas_readback_is_top_down() {
    let mut engine = engine_or_skip!(16, 16);
    let id = engine.begin_canvas(4, 4, true).unwrap();
    engine
        .fill_rect(Rectangle::new(0, 0, 4, 1), Color::RED, true)
        .unwrap();

    let rows = engine.read_pixels(Rectangle::from_size(4, 4)).unwrap();
    assert_near(rows.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_near(rows.get_pixel(0, 3).0, [0, 0, 0, 0]);

    engine.close_canvas(id).unwrap();
}

#[test]
fn nested_guards_restore_in_stack_order() {
    let mut engine = engine_or_skip!(32, 32);
    engine.clear(Color::BLACK).unwrap();

    let outer_img = {
        let mut outer = Canvas::create(&mut engine, 32, 32, true).unwrap();
        outer.clear(Color::RED).unwrap();

        let inner_img = {
            let mut inner = Canvas::create(&mut outer, 16, 16, true).unwrap();
            inner.clear(Color::BLUE).unwrap();
            inner.finish().unwrap()
        };

        assert_eq!(outer.active_canvas(), Some(outer.id()));
        inner_img
            .draw_all(&mut outer, Rectangle::from_size(16, 16), 255)
            .unwrap();
        outer.finish().unwrap()
    };

    assert_eq!(engine.active_canvas(), None);
    outer_img
        .draw_all(&mut engine, Rectangle::from_size(32, 32), 255)
        .unwrap();

    assert_near(pixel(&mut engine, 4, 4), [0, 0, 255, 255]);
    assert_near(pixel(&mut engine, 24, 24), [255, 0, 0, 255]);
    assert_near(pixel(&mut engine, 24, 4), [255, 0, 0, 255]);
}

#[test]
fn double_and_out_of_order_completion_rejected() {
    let mut engine = engine_or_skip!(16, 16);

    let a = engine.begin_canvas(8, 8, true).unwrap();
    let b = engine.begin_canvas(4, 4, true).unwrap();
    assert_eq!(engine.active_canvas(), Some(b));

    match engine.finish_canvas(a) {
        Err(EngineError::CanvasNotInnermost { canvas, innermost }) => {
            assert_eq!(canvas, a);
            assert_eq!(innermost, b);
        }
        other => panic!("expected CanvasNotInnermost, got {other:?}"),
    }

    engine.close_canvas(b).unwrap();
    assert!(matches!(
        engine.close_canvas(b),
        Err(EngineError::UnknownCanvas(id)) if id == b
    ));

    let img = engine.finish_canvas(a).unwrap();
    assert!(matches!(engine.finish_canvas(a), Err(EngineError::UnknownCanvas(_))));
    assert!(matches!(engine.canvas_rectangle(a), Err(EngineError::UnknownCanvas(_))));
    assert_eq!(engine.active_canvas(), None);
    assert_eq!(engine.texture_count(), 1);
    engine.release_image(&img).unwrap();
}

#[test]
fn dropped_guard_closes_canvas() {
    let mut engine = engine_or_skip!(16, 16);
    {
        let mut canvas = Canvas::create(&mut engine, 8, 8, false).unwrap();
        let area = canvas.rectangle();
        canvas.fill_rect(area, Color::GREEN, false).unwrap();
    }
    assert_eq!(engine.active_canvas(), None);
    assert_eq!(engine.texture_count(), 0);
    assert_eq!(engine.area(), Rectangle::from_size(16, 16));
}

#[test]
fn close_releases_canvas_texture() {
    let mut engine = engine_or_skip!(16, 16);
    let canvas = Canvas::create(&mut engine, 8, 8, true).unwrap();
    assert_eq!(canvas.texture_count(), 1);
    canvas.close().unwrap();
    assert_eq!(engine.texture_count(), 0);
}

#[test]
fn invalid_canvas_size_rejected() {
    let mut engine = engine_or_skip!(16, 16);
    assert!(matches!(
        engine.begin_canvas(0, 8, true),
        Err(EngineError::InvalidSize { width: 0, height: 8 })
    ));
    assert_eq!(engine.active_canvas(), None);
}

// ── fills and blends ──────────────────────────────────────────────────────

#[test]
fn copy_alpha_controls_target_alpha() {
    let mut engine = engine_or_skip!(16, 16);
    let id = engine.begin_canvas(8, 4, true).unwrap();

    let half_red = Color::rgba(255, 0, 0, 128);
    engine
        .fill_rect(Rectangle::new(0, 0, 4, 4), half_red, true)
        .unwrap();
    engine
        .fill_rect(Rectangle::new(4, 0, 4, 4), half_red, false)
        .unwrap();

    let copied = pixel(&mut engine, 1, 1);
    let kept = pixel(&mut engine, 5, 1);
    assert!(copied[3].abs_diff(128) <= 2, "alpha copied: {copied:?}");
    assert_eq!(kept[3], 0, "alpha untouched: {kept:?}");
    assert!(copied[0].abs_diff(128) <= 2);

    engine.close_canvas(id).unwrap();
}

#[test]
fn fill_unit_follows_transform() {
    let mut engine = engine_or_skip!(20, 20);
    engine.clear(Color::BLACK).unwrap();

    let t = Transform::identity().translate(10.0, 0.0).scale(10.0, 20.0);
    engine.fill_unit(t, Color::GREEN, false).unwrap();

    assert_near(pixel(&mut engine, 5, 10), [0, 0, 0, 255]);
    assert_near(pixel(&mut engine, 15, 10), [0, 255, 0, 255]);
}

#[test]
fn blend_mask_luminance_picks_color() {
    let mut engine = engine_or_skip!(20, 10);
    engine.clear(Color::BLACK).unwrap();

    let white = engine
        .upload_image(4, 4, &solid(4, 4, Color::WHITE), false)
        .unwrap();
    let black = engine
        .upload_image(4, 4, &solid(4, 4, Color::BLACK), false)
        .unwrap();

    engine
        .blend_rect(&white, Rectangle::new(0, 0, 10, 10), white.area(), Color::RED, Color::BLUE)
        .unwrap();
    engine
        .blend_rect(&black, Rectangle::new(10, 0, 10, 10), black.area(), Color::RED, Color::BLUE)
        .unwrap();

    assert_near(pixel(&mut engine, 5, 5), [0, 0, 255, 255]);
    assert_near(pixel(&mut engine, 15, 5), [255, 0, 0, 255]);
}

// ── images ────────────────────────────────────────────────────────────────

#[test]
fn draw_image_applies_global_alpha() {
    let mut engine = engine_or_skip!(8, 8);
    engine.clear(Color::BLACK).unwrap();

    let white = engine
        .upload_image(2, 2, &solid(2, 2, Color::WHITE), true)
        .unwrap();
    white
        .draw_all(&mut engine, Rectangle::from_size(8, 8), 128)
        .unwrap();

    let p = pixel(&mut engine, 4, 4);
    assert!(p[0].abs_diff(128) <= 2, "{p:?}");
}

#[test]
fn image_without_alpha_draws_opaque() {
    let mut engine = engine_or_skip!(8, 8);
    engine.clear(Color::BLACK).unwrap();

    let invisible_red = engine
        .upload_image(2, 2, &solid(2, 2, Color::rgba(255, 0, 0, 0)), false)
        .unwrap();
    invisible_red
        .draw_all(&mut engine, Rectangle::from_size(8, 8), 255)
        .unwrap();

    assert_near(pixel(&mut engine, 4, 4), [255, 0, 0, 255]);
}

#[test]
fn draw_image_selects_source_region() {
    let mut engine = engine_or_skip!(8, 8);
    engine.clear(Color::BLACK).unwrap();

    // Left half red, right half blue; one row.
    let mut rgba = solid(4, 1, Color::RED);
    rgba.extend(solid(4, 1, Color::BLUE));
    let img = engine.upload_image(8, 1, &rgba, true).unwrap();
    img.draw(
        &mut engine,
        Rectangle::from_size(8, 8),
        Rectangle::new(4, 0, 4, 1),
        255,
    )
    .unwrap();

    assert_near(pixel(&mut engine, 2, 4), [0, 0, 255, 255]);
    assert_near(pixel(&mut engine, 6, 4), [0, 0, 255, 255]);
}

#[test]
fn loads_png_from_disk() {
    let mut engine = engine_or_skip!(8, 8);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("green.png");
    image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 255, 0, 255]))
        .save(&path)
        .unwrap();

    let img = engine.try_load_image(&path).unwrap();
    assert!(!img.is_empty());
    assert_eq!((img.width, img.height), (3, 2));
    assert!(img.has_alpha);
    assert!(!img.flipped);

    engine.clear(Color::BLACK).unwrap();
    let window = engine.area();
    img.draw_all(&mut engine, window, 255).unwrap();
    assert_near(pixel(&mut engine, 4, 4), [0, 255, 0, 255]);
}

#[test]
fn missing_file_yields_empty_image() {
    let mut engine = engine_or_skip!(8, 8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.png");

    assert!(engine.load_image(&path).is_empty());
    assert!(matches!(
        engine.try_load_image(&path),
        Err(EngineError::ImageLoad { .. })
    ));
    assert_eq!(engine.texture_count(), 0);
}

#[test]
fn empty_and_stale_images_rejected() {
    let mut engine = engine_or_skip!(8, 8);
    let unit = Transform::identity();

    assert!(matches!(
        engine.draw_image(&Image::empty(), unit, unit, 255),
        Err(EngineError::EmptyImage)
    ));

    let img = engine
        .upload_image(1, 1, &Color::WHITE.to_array(), true)
        .unwrap();
    let copy = img;
    engine.release_image(&img).unwrap();

    assert!(matches!(
        engine.draw_image(&copy, unit, unit, 255),
        Err(EngineError::StaleImage)
    ));
    assert!(matches!(
        engine.blend_unit(&copy, unit, unit, Color::RED, Color::BLUE),
        Err(EngineError::StaleImage)
    ));
    assert!(matches!(engine.release_image(&copy), Err(EngineError::StaleImage)));

    // The freed slot is reused under a new generation.
    let fresh = engine
        .upload_image(1, 1, &Color::WHITE.to_array(), true)
        .unwrap();
    assert_ne!(fresh.id(), copy.id());
    assert!(matches!(
        engine.draw_image(&copy, unit, unit, 255),
        Err(EngineError::StaleImage)
    ));
}

#[test]
fn upload_checks_buffer_length() {
    let mut engine = engine_or_skip!(8, 8);
    assert!(matches!(
        engine.upload_image(2, 2, &[0; 15], true),
        Err(EngineError::PixelDataLength {
            expected: 16,
            actual: 15
        })
    ));
}

// ── window ────────────────────────────────────────────────────────────────

#[test]
fn window_resize_changes_area_and_bounds() {
    let mut engine = engine_or_skip!(16, 16);
    engine.set_window_size(32, 8).unwrap();

    assert_eq!(engine.window_size(), (32, 8));
    assert_eq!(engine.area(), Rectangle::from_size(32, 8));
    assert!(matches!(
        engine.read_pixels(Rectangle::from_size(16, 16)),
        Err(EngineError::OutOfBounds)
    ));

    engine.clear(Color::WHITE).unwrap();
    assert_near(pixel(&mut engine, 31, 7), [255, 255, 255, 255]);
}

#[test]
fn present_copies_into_external_view() {
    let mut engine = engine_or_skip!(8, 8);
    engine.clear(Color::RED).unwrap();

    let texture = engine.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("present target"),
        size: wgpu::Extent3d {
            width: 8,
            height: 8,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Bgra8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    engine.present(&view, wgpu::TextureFormat::Bgra8Unorm).unwrap();
    engine.close();
}
