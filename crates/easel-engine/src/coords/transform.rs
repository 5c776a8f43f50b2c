use core::ops::Mul;

use super::Vec2;

/// 2D affine transform stored as three columns.
///
/// A point maps as `p' = m[0] * p.x + m[1] * p.y + m[2]`: the first two
/// columns carry rotation/scale/shear, the last one the translation.
///
/// All builder methods apply the new operation *before* `self`, i.e. in the
/// transform's own (pre-transform) space. This matches how draw transforms are
/// usually built: start from the placement of a shape and refine the shape
/// locally.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: [[f32; 2]; 3],
}

impl Transform {
    /// No rotation, unit scale, zero translation.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        }
    }

    #[inline]
    pub const fn from_cols(c0: [f32; 2], c1: [f32; 2], c2: [f32; 2]) -> Self {
        Self { m: [c0, c1, c2] }
    }

    /// `self` composed with a translation by `(dx, dy)` on its right.
    #[inline]
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        self.compose(Self::from_cols([1.0, 0.0], [0.0, 1.0], [dx, dy]))
    }

    /// `self` composed with a rotation of `angle` radians about the origin.
    #[inline]
    pub fn rotate(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        self.compose(Self::from_cols([c, s], [-s, c], [0.0, 0.0]))
    }

    /// `self` composed with a non-uniform scale.
    #[inline]
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.compose(Self::from_cols([sx, 0.0], [0.0, sy], [0.0, 0.0]))
    }

    /// Transform equivalent to applying `r` and then `self`.
    ///
    /// `self.compose(r).apply(p) == self.apply(r.apply(p))`. Not commutative.
    pub fn compose(self, r: Transform) -> Self {
        let [l0, l1, l2] = self.m;
        let [r0, r1, r2] = r.m;
        Self::from_cols(
            [l0[0] * r0[0] + l1[0] * r0[1], l0[1] * r0[0] + l1[1] * r0[1]],
            [l0[0] * r1[0] + l1[0] * r1[1], l0[1] * r1[0] + l1[1] * r1[1]],
            [
                l0[0] * r2[0] + l1[0] * r2[1] + l2[0],
                l0[1] * r2[0] + l1[1] * r2[1] + l2[1],
            ],
        )
    }

    /// Maps a point.
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        let [c0, c1, c2] = self.m;
        Vec2::new(
            c0[0] * p.x + c1[0] * p.y + c2[0],
            c0[1] * p.x + c1[1] * p.y + c2[1],
        )
    }

    /// Element-wise comparison within `eps`.
    pub fn approx_eq(self, other: Transform, eps: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// Same as [`Transform::compose`].
    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        self.compose(rhs)
    }
}
