//! Contains a [`Transform`] object holding values of an affine transformation matrix.

use std::ops::{Mul, MulAssign};

use tinta_read::types::Point;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A transformation matrix to be applied to the drawing canvas.
///
/// Factors are specified in column-order, meaning that
/// for a vector `(x,y)` the transformed position `x'` of the vector
/// is calculated by
/// `x' = xx * x + xy * y + dx`,
/// and the transformed position y' is calculated by
/// `y' = yx * x + yy * y + dy`.
///
/// The product `a * b` applies `b` first, then `a`.
pub struct Transform {
    pub xx: f32,
    pub yx: f32,
    pub xy: f32,
    pub yy: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(scale_x: f32, scale_y: f32) -> Self {
        Self {
            xx: scale_x,
            yy: scale_y,
            ..Self::IDENTITY
        }
    }

    /// A counter-clockwise rotation by `angle`, in units of 180 degrees.
    pub fn rotate(angle: f32) -> Self {
        let (sin_v, cos_v) = (angle * core::f32::consts::PI).sin_cos();
        Self {
            xx: cos_v,
            yx: sin_v,
            xy: -sin_v,
            yy: cos_v,
            ..Self::IDENTITY
        }
    }

    /// A skew by the given angles, in units of 180 degrees.
    ///
    /// A positive `x_skew_angle` tilts the y axis clockwise, a positive
    /// `y_skew_angle` tilts the x axis counter-clockwise.
    pub fn skew(x_skew_angle: f32, y_skew_angle: f32) -> Self {
        let tan_x = (x_skew_angle * core::f32::consts::PI).tan();
        let tan_y = (y_skew_angle * core::f32::consts::PI).tan();
        Self {
            xy: -tan_x,
            yx: tan_y,
            ..Self::IDENTITY
        }
    }

    /// Returns this transform applied around `(center_x, center_y)`
    /// instead of the origin.
    pub fn around_center(self, center_x: f32, center_y: f32) -> Self {
        Self::translate(center_x, center_y) * self * Self::translate(-center_x, -center_y)
    }

    /// Applies the transform to a point.
    pub fn transform_point(&self, point: Point<f32>) -> Point<f32> {
        Point::new(
            self.xx * point.x + self.xy * point.y + self.dx,
            self.yx * point.x + self.yy * point.y + self.dy,
        )
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        fn muladdmul(a: f32, b: f32, c: f32, d: f32) -> f32 {
            a * b + c * d
        }
        Self {
            xx: muladdmul(self.xx, rhs.xx, self.xy, rhs.yx),
            xy: muladdmul(self.xx, rhs.xy, self.xy, rhs.yy),
            dx: muladdmul(self.xx, rhs.dx, self.xy, rhs.dy) + self.dx,
            yx: muladdmul(self.yx, rhs.xx, self.yy, rhs.yx),
            yy: muladdmul(self.yx, rhs.xy, self.yy, rhs.yy),
            dy: muladdmul(self.yx, rhs.dx, self.yy, rhs.dy) + self.dy,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform> for kurbo::Affine {
    fn from(value: Transform) -> Self {
        kurbo::Affine::new([
            value.xx as f64,
            value.yx as f64,
            value.xy as f64,
            value.yy as f64,
            value.dx as f64,
            value.dy as f64,
        ])
    }
}
