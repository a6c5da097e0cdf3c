//! COLR table instance.
//!
//! Applies variation deltas to paints, color stops and clip boxes and
//! resolves leaf paints into brushes.

use std::cmp::Ordering;

use tinta_read::{
    tables::colr::{ClipBox, ColorLine, ColorStop, Colr, Extend, Paint, NO_VARIATION_INDEX},
    types::{BoundingBox, F2Dot14, FWord, Fixed, Point, UfWord},
};

use super::Transform;
use crate::{instance::LocationRef, store::VariationInstance};

/// A color in the sRGB color space, as stored in a palette.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Source of the colors referenced by paints.
///
/// Implementations typically wrap a `CPAL` palette along with a foreground
/// color for palette index 0xFFFF.
pub trait Palette {
    /// Returns the color for `palette_index` with its alpha multiplied by
    /// `alpha`.
    fn color(&self, palette_index: u16, alpha: f32) -> Color;
}

impl<F> Palette for F
where
    F: Fn(u16, f32) -> Color,
{
    fn color(&self, palette_index: u16, alpha: f32) -> Color {
        self(palette_index, alpha)
    }
}

/// A color stop with variation deltas applied and its color resolved.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedColorStop {
    pub offset: f32,
    pub palette_index: u16,
    pub alpha: f32,
    pub color: Color,
}

/// The fill of a resolved color glyph layer.
///
/// Coordinates are in font units, in the space of the glyph before the
/// layer transform is applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        p0: Point<f32>,
        /// The end point of the gradient: `p1` of the paint, projected onto
        /// the line through `p0` perpendicular to `p0p2`.
        p1: Point<f32>,
        color_stops: Vec<ResolvedColorStop>,
        extend: Extend,
    },
    RadialGradient {
        c0: Point<f32>,
        r0: f32,
        c1: Point<f32>,
        r1: f32,
        color_stops: Vec<ResolvedColorStop>,
        extend: Extend,
    },
    /// Angles are in degrees, counter-clockwise from the positive x axis.
    SweepGradient {
        c0: Point<f32>,
        start_angle: f32,
        end_angle: f32,
        color_stops: Vec<ResolvedColorStop>,
        extend: Extend,
    },
}

/// Combination of a `COLR` table and a location in variation space for
/// resolving paints.
pub(crate) struct ColrInstance<'a> {
    pub colr: &'a Colr,
    store: Option<VariationInstance<'a>>,
}

impl<'a> ColrInstance<'a> {
    pub fn new(colr: &'a Colr, location: LocationRef) -> Self {
        let store = colr
            .item_variation_store()
            .filter(|_| !location.coords().is_empty())
            .map(|store| VariationInstance::new(store, location));
        Self { colr, store }
    }

    /// Computes a sequence of N variation deltas starting at the given
    /// `var_index_base`.
    pub fn var_deltas<const N: usize>(&self, var_index_base: u32) -> [f32; N] {
        let mut deltas = [0.0; N];
        let Some(store) = self.store.as_ref() else {
            return deltas;
        };
        if var_index_base == NO_VARIATION_INDEX {
            return deltas;
        }
        let index_map = self.colr.var_index_map();
        for (i, delta) in deltas.iter_mut().enumerate() {
            let Some(var_index) = var_index_base.checked_add(i as u32) else {
                break;
            };
            *delta = store.compute_mapped_delta(index_map, var_index);
        }
        deltas
    }

    /// Resolves a clip box, applying variation deltas.
    pub fn resolve_clip_box(&self, clip_box: &ClipBox) -> BoundingBox<f32> {
        match clip_box {
            ClipBox::Format1 {
                x_min,
                y_min,
                x_max,
                y_max,
            } => BoundingBox {
                x_min: fword(*x_min, 0.0),
                y_min: fword(*y_min, 0.0),
                x_max: fword(*x_max, 0.0),
                y_max: fword(*y_max, 0.0),
            },
            ClipBox::Format2 {
                x_min,
                y_min,
                x_max,
                y_max,
                var_index_base,
            } => {
                let deltas = self.var_deltas::<4>(*var_index_base);
                BoundingBox {
                    x_min: fword(*x_min, deltas[0]),
                    y_min: fword(*y_min, deltas[1]),
                    x_max: fword(*x_max, deltas[2]),
                    y_max: fword(*y_max, deltas[3]),
                }
            }
        }
    }

    /// Returns the transform introduced by a wrapper paint, with variation
    /// deltas applied, or `None` if the paint does not transform its child.
    pub fn resolve_transform(&self, paint: &Paint) -> Option<Transform> {
        let transform = match paint {
            Paint::Transform { transform, .. } => Transform {
                xx: fixed(transform.xx, 0.0),
                yx: fixed(transform.yx, 0.0),
                xy: fixed(transform.xy, 0.0),
                yy: fixed(transform.yy, 0.0),
                dx: fixed(transform.dx, 0.0),
                dy: fixed(transform.dy, 0.0),
            },
            Paint::VarTransform { transform, .. } => {
                let d = self.var_deltas::<6>(transform.var_index_base);
                Transform {
                    xx: fixed(transform.xx, d[0]),
                    yx: fixed(transform.yx, d[1]),
                    xy: fixed(transform.xy, d[2]),
                    yy: fixed(transform.yy, d[3]),
                    dx: fixed(transform.dx, d[4]),
                    dy: fixed(transform.dy, d[5]),
                }
            }
            Paint::Translate { dx, dy, .. } => {
                Transform::translate(fword(*dx, 0.0), fword(*dy, 0.0))
            }
            Paint::VarTranslate {
                dx,
                dy,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<2>(*var_index_base);
                Transform::translate(fword(*dx, d[0]), fword(*dy, d[1]))
            }
            Paint::Scale {
                scale_x, scale_y, ..
            } => Transform::scale(f2dot14(*scale_x, 0.0), f2dot14(*scale_y, 0.0)),
            Paint::VarScale {
                scale_x,
                scale_y,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<2>(*var_index_base);
                Transform::scale(f2dot14(*scale_x, d[0]), f2dot14(*scale_y, d[1]))
            }
            Paint::ScaleAroundCenter {
                scale_x,
                scale_y,
                center_x,
                center_y,
                ..
            } => Transform::scale(f2dot14(*scale_x, 0.0), f2dot14(*scale_y, 0.0))
                .around_center(fword(*center_x, 0.0), fword(*center_y, 0.0)),
            Paint::VarScaleAroundCenter {
                scale_x,
                scale_y,
                center_x,
                center_y,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<4>(*var_index_base);
                Transform::scale(f2dot14(*scale_x, d[0]), f2dot14(*scale_y, d[1]))
                    .around_center(fword(*center_x, d[2]), fword(*center_y, d[3]))
            }
            Paint::ScaleUniform { scale, .. } => {
                let scale = f2dot14(*scale, 0.0);
                Transform::scale(scale, scale)
            }
            Paint::VarScaleUniform {
                scale,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<1>(*var_index_base);
                let scale = f2dot14(*scale, d[0]);
                Transform::scale(scale, scale)
            }
            Paint::ScaleUniformAroundCenter {
                scale,
                center_x,
                center_y,
                ..
            } => {
                let scale = f2dot14(*scale, 0.0);
                Transform::scale(scale, scale)
                    .around_center(fword(*center_x, 0.0), fword(*center_y, 0.0))
            }
            Paint::VarScaleUniformAroundCenter {
                scale,
                center_x,
                center_y,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<3>(*var_index_base);
                let scale = f2dot14(*scale, d[0]);
                Transform::scale(scale, scale)
                    .around_center(fword(*center_x, d[1]), fword(*center_y, d[2]))
            }
            Paint::Rotate { angle, .. } => Transform::rotate(f2dot14(*angle, 0.0)),
            Paint::VarRotate {
                angle,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<1>(*var_index_base);
                Transform::rotate(f2dot14(*angle, d[0]))
            }
            Paint::RotateAroundCenter {
                angle,
                center_x,
                center_y,
                ..
            } => Transform::rotate(f2dot14(*angle, 0.0))
                .around_center(fword(*center_x, 0.0), fword(*center_y, 0.0)),
            Paint::VarRotateAroundCenter {
                angle,
                center_x,
                center_y,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<3>(*var_index_base);
                Transform::rotate(f2dot14(*angle, d[0]))
                    .around_center(fword(*center_x, d[1]), fword(*center_y, d[2]))
            }
            Paint::Skew {
                x_skew_angle,
                y_skew_angle,
                ..
            } => Transform::skew(f2dot14(*x_skew_angle, 0.0), f2dot14(*y_skew_angle, 0.0)),
            Paint::VarSkew {
                x_skew_angle,
                y_skew_angle,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<2>(*var_index_base);
                Transform::skew(f2dot14(*x_skew_angle, d[0]), f2dot14(*y_skew_angle, d[1]))
            }
            Paint::SkewAroundCenter {
                x_skew_angle,
                y_skew_angle,
                center_x,
                center_y,
                ..
            } => Transform::skew(f2dot14(*x_skew_angle, 0.0), f2dot14(*y_skew_angle, 0.0))
                .around_center(fword(*center_x, 0.0), fword(*center_y, 0.0)),
            Paint::VarSkewAroundCenter {
                x_skew_angle,
                y_skew_angle,
                center_x,
                center_y,
                var_index_base,
                ..
            } => {
                let d = self.var_deltas::<4>(*var_index_base);
                Transform::skew(f2dot14(*x_skew_angle, d[0]), f2dot14(*y_skew_angle, d[1]))
                    .around_center(fword(*center_x, d[2]), fword(*center_y, d[3]))
            }
            _ => return None,
        };
        Some(transform)
    }

    /// Resolves a leaf paint into a brush.
    ///
    /// Returns `None` for paints that are not leaves and for gradients
    /// without color stops.
    pub fn resolve_brush(&self, paint: &Paint, palette: &impl Palette) -> Option<Brush> {
        match paint {
            Paint::Solid {
                palette_index,
                alpha,
            } => Some(Brush::Solid(
                palette.color(*palette_index, f2dot14(*alpha, 0.0)),
            )),
            Paint::VarSolid {
                palette_index,
                alpha,
                var_index_base,
            } => {
                let d = self.var_deltas::<1>(*var_index_base);
                Some(Brush::Solid(
                    palette.color(*palette_index, f2dot14(*alpha, d[0])),
                ))
            }
            Paint::LinearGradient {
                color_line,
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
            } => {
                let points = [*x0, *y0, *x1, *y1, *x2, *y2].map(|v| fword(v, 0.0));
                self.linear_gradient(color_line, points, palette)
            }
            Paint::VarLinearGradient {
                color_line,
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
                var_index_base,
            } => {
                let d = self.var_deltas::<6>(*var_index_base);
                let mut points = [*x0, *y0, *x1, *y1, *x2, *y2].map(|v| fword(v, 0.0));
                for (point, delta) in points.iter_mut().zip(d) {
                    *point += delta;
                }
                self.linear_gradient(color_line, points, palette)
            }
            Paint::RadialGradient {
                color_line,
                x0,
                y0,
                radius0,
                x1,
                y1,
                radius1,
            } => {
                let color_stops = self.resolve_color_stops(color_line, palette);
                (!color_stops.is_empty()).then(|| Brush::RadialGradient {
                    c0: Point::new(fword(*x0, 0.0), fword(*y0, 0.0)),
                    r0: ufword(*radius0, 0.0),
                    c1: Point::new(fword(*x1, 0.0), fword(*y1, 0.0)),
                    r1: ufword(*radius1, 0.0),
                    color_stops,
                    extend: color_line.extend,
                })
            }
            Paint::VarRadialGradient {
                color_line,
                x0,
                y0,
                radius0,
                x1,
                y1,
                radius1,
                var_index_base,
            } => {
                let d = self.var_deltas::<6>(*var_index_base);
                let color_stops = self.resolve_color_stops(color_line, palette);
                (!color_stops.is_empty()).then(|| Brush::RadialGradient {
                    c0: Point::new(fword(*x0, d[0]), fword(*y0, d[1])),
                    r0: ufword(*radius0, d[2]),
                    c1: Point::new(fword(*x1, d[3]), fword(*y1, d[4])),
                    r1: ufword(*radius1, d[5]),
                    color_stops,
                    extend: color_line.extend,
                })
            }
            Paint::SweepGradient {
                color_line,
                center_x,
                center_y,
                start_angle,
                end_angle,
            } => {
                let color_stops = self.resolve_color_stops(color_line, palette);
                (!color_stops.is_empty()).then(|| Brush::SweepGradient {
                    c0: Point::new(fword(*center_x, 0.0), fword(*center_y, 0.0)),
                    start_angle: f2dot14(*start_angle, 0.0) * 180.0,
                    end_angle: f2dot14(*end_angle, 0.0) * 180.0,
                    color_stops,
                    extend: color_line.extend,
                })
            }
            Paint::VarSweepGradient {
                color_line,
                center_x,
                center_y,
                start_angle,
                end_angle,
                var_index_base,
            } => {
                let d = self.var_deltas::<4>(*var_index_base);
                let color_stops = self.resolve_color_stops(color_line, palette);
                (!color_stops.is_empty()).then(|| Brush::SweepGradient {
                    c0: Point::new(fword(*center_x, d[0]), fword(*center_y, d[1])),
                    start_angle: f2dot14(*start_angle, d[2]) * 180.0,
                    end_angle: f2dot14(*end_angle, d[3]) * 180.0,
                    color_stops,
                    extend: color_line.extend,
                })
            }
            _ => None,
        }
    }

    /// Resolves the stops of a color line, applying variation deltas and
    /// sorting by offset.
    pub fn resolve_color_stops(
        &self,
        color_line: &ColorLine,
        palette: &impl Palette,
    ) -> Vec<ResolvedColorStop> {
        let mut stops: Vec<_> = color_line
            .color_stops
            .iter()
            .map(|stop| self.resolve_color_stop(stop, palette))
            .collect();
        // stable, so stops at the same offset keep their order
        stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(Ordering::Equal));
        stops
    }

    fn resolve_color_stop(&self, stop: &ColorStop, palette: &impl Palette) -> ResolvedColorStop {
        let d = self.var_deltas::<2>(stop.var_index_base);
        let alpha = f2dot14(stop.alpha, d[1]);
        ResolvedColorStop {
            offset: f2dot14(stop.stop_offset, d[0]),
            palette_index: stop.palette_index,
            alpha,
            color: palette.color(stop.palette_index, alpha),
        }
    }

    fn linear_gradient(
        &self,
        color_line: &ColorLine,
        [x0, y0, x1, y1, x2, y2]: [f32; 6],
        palette: &impl Palette,
    ) -> Option<Brush> {
        let color_stops = self.resolve_color_stops(color_line, palette);
        let first = color_stops.first()?;
        let p0 = Point::new(x0, y0);
        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x2, y2);
        let cross_product = |a: Point<f32>, b: Point<f32>| a.x * b.y - a.y * b.x;
        // Degenerate or parallel vectors: use the first color.
        if p1 == p0 || p2 == p0 || cross_product(p1 - p0, p2 - p0) == 0.0 {
            return Some(Brush::Solid(first.color));
        }
        // Project p0p1 onto the line through p0 perpendicular to p0p2.
        let p0p2 = p2 - p0;
        let perpendicular = Point::new(p0p2.y, -p0p2.x);
        let v = p1 - p0;
        let length_squared = perpendicular.x * perpendicular.x + perpendicular.y * perpendicular.y;
        let factor = (v.x * perpendicular.x + v.y * perpendicular.y) / length_squared;
        Some(Brush::LinearGradient {
            p0,
            p1: p0 + perpendicular * factor,
            color_stops,
            extend: color_line.extend,
        })
    }
}

fn fword(value: FWord, delta: f32) -> f32 {
    value.to_i16() as f32 + delta
}

fn ufword(value: UfWord, delta: f32) -> f32 {
    value.to_u16() as f32 + delta
}

fn f2dot14(value: F2Dot14, delta: f32) -> f32 {
    value.to_f32() + delta / 16384.0
}

fn fixed(value: Fixed, delta: f32) -> f32 {
    (value.to_f64() + delta as f64 / 65536.0) as f32
}
