use super::{HAlign, Transform, VAlign, Vec2};

/// Axis-aligned integer rectangle in target pixels (top-left origin).
///
/// The origin may be negative; placing geometry partly or fully off-target
/// is legal and simply clips.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Translation moving the origin to `(x, y)`, without scaling.
    #[inline]
    pub fn translation(self) -> Transform {
        Transform::identity().translate(self.x as f32, self.y as f32)
    }

    /// Maps the unit square onto this rectangle:
    /// `(0,0) -> (x, y)` and `(1,1) -> (x + width, y + height)`.
    #[inline]
    pub fn transformation(self) -> Transform {
        self.translation()
            .scale(self.width as f32, self.height as f32)
    }

    /// Same size, origin shifted by `(dx, dy)`.
    #[inline]
    pub fn moved(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Resizes by `(dw, dh)` around the center.
    ///
    /// Sizes saturate at zero. The origin moves by half the delta, rounded
    /// toward zero.
    pub fn grow(self, dw: i32, dh: i32) -> Self {
        Self {
            x: self.x.saturating_sub(dw / 2),
            y: self.y.saturating_sub(dh / 2),
            width: add_signed(self.width, dw),
            height: add_signed(self.height, dh),
        }
    }

    /// Scales the size by `(fx, fy)` around the center.
    ///
    /// The new size is rounded to the nearest pixel; the origin follows the
    /// same convention as [`grow`](Self::grow) using the resulting delta.
    pub fn scale(self, fx: f32, fy: f32) -> Self {
        let w = scaled(self.width, fx);
        let h = scaled(self.height, fy);
        let dw = clamp_i32(w as i64 - self.width as i64);
        let dh = clamp_i32(h as i64 - self.height as i64);
        Self {
            x: self.x.saturating_sub(dw / 2),
            y: self.y.saturating_sub(dh / 2),
            width: w,
            height: h,
        }
    }

    /// Places a `width × height` box inside `self` according to the alignment.
    ///
    /// A box larger than `self` is still aligned the same way and ends up
    /// with an origin left of / above `self`.
    pub fn position(self, width: u32, height: u32, halign: HAlign, valign: VAlign) -> Self {
        let free_x = self.width as i64 - width as i64;
        let free_y = self.height as i64 - height as i64;

        let x = match halign {
            HAlign::Left => 0,
            HAlign::Center => free_x / 2,
            HAlign::Right => free_x,
        };
        let y = match valign {
            VAlign::Top => 0,
            VAlign::Middle => free_y / 2,
            VAlign::Bottom => free_y,
        };

        Self {
            x: clamp_i32(self.x as i64 + x),
            y: clamp_i32(self.y as i64 + y),
            width,
            height,
        }
    }
}

#[inline]
fn add_signed(v: u32, d: i32) -> u32 {
    (v as i64 + d as i64).clamp(0, u32::MAX as i64) as u32
}

#[inline]
fn scaled(v: u32, f: f32) -> u32 {
    let s = (v as f64 * f as f64).round();
    if s.is_nan() || s <= 0.0 {
        0
    } else {
        s.min(u32::MAX as f64) as u32
    }
}

#[inline]
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn r(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(x, y, w, h)
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn transformation_maps_unit_square_corners() {
        for rect in [r(0, 0, 1, 1), r(10, 20, 30, 40), r(-15, 7, 200, 3)] {
            let t = rect.transformation();
            let min = t.apply(Vec2::new(0.0, 0.0));
            let max = t.apply(Vec2::new(1.0, 1.0));
            assert!(min.approx_eq(Vec2::new(rect.x as f32, rect.y as f32), EPS));
            assert!(max.approx_eq(
                Vec2::new(
                    rect.x as f32 + rect.width as f32,
                    rect.y as f32 + rect.height as f32
                ),
                EPS
            ));
        }
    }

    #[test]
    fn translation_does_not_scale() {
        let t = r(5, -5, 100, 100).translation();
        assert!(t.apply(Vec2::new(1.0, 1.0)).approx_eq(Vec2::new(6.0, -4.0), EPS));
    }

    // ── move / grow / scale ───────────────────────────────────────────────

    #[test]
    fn moved_keeps_size() {
        assert_eq!(r(1, 2, 3, 4).moved(10, -20), r(11, -18, 3, 4));
    }

    #[test]
    fn grow_preserves_center() {
        let rect = r(10, 10, 40, 20);
        let grown = rect.grow(10, 6);
        assert_eq!(grown, r(5, 7, 50, 26));
        assert!(grown.center().approx_eq(rect.center(), EPS));

        let shrunk = rect.grow(-20, -10);
        assert_eq!(shrunk, r(20, 15, 20, 10));
        assert!(shrunk.center().approx_eq(rect.center(), EPS));
    }

    #[test]
    fn grow_saturates_at_zero_size() {
        let g = r(0, 0, 4, 4).grow(-10, -10);
        assert_eq!((g.width, g.height), (0, 0));
        assert!(g.is_empty());
    }

    #[test]
    fn scale_preserves_center() {
        let rect = r(100, 50, 20, 10);
        let s = rect.scale(2.0, 3.0);
        assert_eq!(s, r(90, 40, 40, 30));
        assert!(s.center().approx_eq(rect.center(), EPS));

        let half = rect.scale(0.5, 0.5);
        assert_eq!(half, r(105, 52, 10, 5));
    }

    #[test]
    fn scale_by_negative_or_nan_collapses() {
        assert!(r(0, 0, 10, 10).scale(-1.0, f32::NAN).is_empty());
    }

    // ── position ──────────────────────────────────────────────────────────

    #[test]
    fn position_corners() {
        let area = r(10, 20, 200, 100);
        assert_eq!(
            area.position(50, 30, HAlign::Left, VAlign::Top),
            r(10, 20, 50, 30)
        );
        assert_eq!(
            area.position(50, 30, HAlign::Right, VAlign::Bottom),
            r(10 + 200 - 50, 20 + 100 - 30, 50, 30)
        );
        assert_eq!(
            area.position(50, 30, HAlign::Right, VAlign::Top),
            r(160, 20, 50, 30)
        );
    }

    #[test]
    fn position_center_middle_centers_the_box() {
        let area = r(0, 0, 200, 100);
        let placed = area.position(50, 30, HAlign::Center, VAlign::Middle);
        assert_eq!(placed, r(75, 35, 50, 30));
        assert!(placed.center().approx_eq(area.center(), EPS));
    }

    #[test]
    fn position_splits_area_into_quadrants() {
        let area = Rectangle::from_size(200, 200);
        let quads = [
            area.position(100, 100, HAlign::Left, VAlign::Top),
            area.position(100, 100, HAlign::Right, VAlign::Top),
            area.position(100, 100, HAlign::Left, VAlign::Bottom),
            area.position(100, 100, HAlign::Right, VAlign::Bottom),
        ];
        assert_eq!(
            quads,
            [r(0, 0, 100, 100), r(100, 0, 100, 100), r(0, 100, 100, 100), r(100, 100, 100, 100)]
        );
    }

    #[test]
    fn position_oversized_box_goes_negative() {
        let placed = r(0, 0, 10, 10).position(30, 30, HAlign::Center, VAlign::Bottom);
        assert_eq!(placed, r(-10, -20, 30, 30));
    }
}
