//! Variation deltas for glyph outlines.
//!
//! Applies the tuple variations of the
//! [`gvar`](https://learn.microsoft.com/en-us/typography/opentype/spec/gvar)
//! table to the points of a simple glyph. The points and contours come from
//! the outline source of the caller; only the deltas are computed here.

use core::ops::RangeInclusive;

use tinta_read::{tables::gvar::Gvar, types::Point, ReadError};

use crate::{instance::LocationRef, GlyphId};

/// Errors that can occur when computing outline deltas.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OutlineError {
    #[error("contour end point {0} is out of order or out of bounds")]
    InvalidContour(u16),
    #[error("Error reading font data: {0}")]
    Read(#[from] ReadError),
}

/// Computes the variation delta of every point of a simple glyph.
///
/// `points` are the unvaried points of the glyph in font units and
/// `contours` holds the index of the last point of each contour. Tuples
/// that only provide deltas for some points infer the missing deltas by
/// interpolation.
///
/// A glyph without variation data has a zero delta for every point.
pub fn glyph_deltas(
    gvar: &Gvar,
    glyph_id: GlyphId,
    location: LocationRef,
    points: &[Point<i32>],
    contours: &[u16],
) -> Result<Vec<Point<f32>>, OutlineError> {
    validate_contours(points, contours)?;
    let mut deltas = vec![Point::new(0.0f32, 0.0); points.len()];
    let Some(var_data) = gvar.glyph_variation_data(glyph_id, points.len())? else {
        return Ok(deltas);
    };
    let coords = location.coords();
    let mut iup_buffer = Vec::new();
    let mut has_delta = Vec::new();
    for (tuple, scalar) in var_data.active_tuples_at(coords) {
        // Fast path: tuple contains all points, we can simply accumulate
        // the deltas directly.
        if tuple.has_deltas_for_all_points() {
            for (delta, (_, dx, dy)) in deltas.iter_mut().zip(tuple.deltas()) {
                *delta += Point::new(dx as f32, dy as f32) * scalar;
            }
            continue;
        }
        iup_buffer.clear();
        iup_buffer.extend(points.iter().map(|point| point.map(|v| v as f32)));
        has_delta.clear();
        has_delta.resize(points.len(), false);
        for (ix, dx, dy) in tuple.deltas() {
            if let (Some(flag), Some(point)) = (has_delta.get_mut(ix), iup_buffer.get_mut(ix)) {
                *flag = true;
                *point += Point::new(dx as f32, dy as f32) * scalar;
            }
        }
        interpolate_deltas(points, &has_delta, contours, &mut iup_buffer)
            .ok_or(ReadError::OutOfBounds)?;
        for ((delta, point), iup_point) in deltas.iter_mut().zip(points).zip(&iup_buffer) {
            *delta += *iup_point - point.map(|v| v as f32);
        }
    }
    Ok(deltas)
}

fn validate_contours(points: &[Point<i32>], contours: &[u16]) -> Result<(), OutlineError> {
    let mut start = 0usize;
    for &end in contours {
        if (end as usize) < start || end as usize >= points.len() {
            return Err(OutlineError::InvalidContour(end));
        }
        start = end as usize + 1;
    }
    Ok(())
}

/// Interpolate points without delta values, similar to the IUP hinting
/// instruction.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/gvar#inferred-deltas-for-un-referenced-point-numbers>
fn interpolate_deltas(
    points: &[Point<i32>],
    has_delta: &[bool],
    contours: &[u16],
    out_points: &mut [Point<f32>],
) -> Option<()> {
    let mut jiggler = Jiggler { points, out_points };
    let mut point_ix = 0usize;
    for &end_point_ix in contours {
        let end_point_ix = end_point_ix as usize;
        let first_point_ix = point_ix;
        // Search for first point that has a delta.
        while point_ix <= end_point_ix && !*has_delta.get(point_ix)? {
            point_ix += 1;
        }
        // No deltas in this contour: nothing moves.
        if point_ix > end_point_ix {
            continue;
        }
        let first_delta_ix = point_ix;
        let mut cur_delta_ix = point_ix;
        point_ix += 1;
        // Search for next point that has a delta...
        while point_ix <= end_point_ix {
            if *has_delta.get(point_ix)? {
                // ... and interpolate intermediate points.
                jiggler.interpolate(
                    cur_delta_ix + 1..=point_ix - 1,
                    RefPoints(cur_delta_ix, point_ix),
                )?;
                cur_delta_ix = point_ix;
            }
            point_ix += 1;
        }
        // If we only have a single delta, shift the contour.
        if cur_delta_ix == first_delta_ix {
            jiggler.shift(first_point_ix..=end_point_ix, cur_delta_ix)?;
        } else {
            // Otherwise, handle remaining points at beginning and end of
            // contour.
            jiggler.interpolate(
                cur_delta_ix + 1..=end_point_ix,
                RefPoints(cur_delta_ix, first_delta_ix),
            )?;
            if first_delta_ix > 0 {
                jiggler.interpolate(
                    first_point_ix..=first_delta_ix - 1,
                    RefPoints(cur_delta_ix, first_delta_ix),
                )?;
            }
        }
    }
    Some(())
}

struct RefPoints(usize, usize);

struct Jiggler<'a> {
    points: &'a [Point<i32>],
    out_points: &'a mut [Point<f32>],
}

impl Jiggler<'_> {
    /// Shift the coordinates of all points in the specified range using the
    /// difference given by the point at `ref_ix`.
    fn shift(&mut self, range: RangeInclusive<usize>, ref_ix: usize) -> Option<()> {
        let ref_in = self.points.get(ref_ix)?.map(|v| v as f32);
        let ref_out = self.out_points.get(ref_ix)?;
        let delta = *ref_out - ref_in;
        if delta.x == 0.0 && delta.y == 0.0 {
            return Some(());
        }
        // The reference point itself already carries the delta.
        for out_point in self.out_points.get_mut(*range.start()..ref_ix)? {
            *out_point += delta;
        }
        for out_point in self.out_points.get_mut(ref_ix + 1..=*range.end())? {
            *out_point += delta;
        }
        Some(())
    }

    /// Interpolate the coordinates of all points in the specified range using
    /// the two reference points.
    fn interpolate(&mut self, range: RangeInclusive<usize>, ref_points: RefPoints) -> Option<()> {
        if range.is_empty() {
            return Some(());
        }
        macro_rules! interp_coord {
            ($coord:ident) => {
                let RefPoints(mut ref1_ix, mut ref2_ix) = ref_points;
                if self.points.get(ref1_ix)?.$coord > self.points.get(ref2_ix)?.$coord {
                    core::mem::swap(&mut ref1_ix, &mut ref2_ix);
                }
                let in1 = self.points.get(ref1_ix)?.$coord as f32;
                let in2 = self.points.get(ref2_ix)?.$coord as f32;
                let out1 = self.out_points.get(ref1_ix)?.$coord;
                let out2 = self.out_points.get(ref2_ix)?.$coord;
                // Reference points with the same coordinate but different
                // deltas leave the range untouched.
                if in1 != in2 || out1 == out2 {
                    let scale = if in1 != in2 {
                        (out2 - out1) / (in2 - in1)
                    } else {
                        0.0
                    };
                    let d1 = out1 - in1;
                    let d2 = out2 - in2;
                    for (point, out_point) in self
                        .points
                        .get(range.clone())?
                        .iter()
                        .zip(self.out_points.get_mut(range.clone())?)
                    {
                        let mut out = point.$coord as f32;
                        if out <= in1 {
                            out += d1;
                        } else if out >= in2 {
                            out += d2;
                        } else {
                            out = out1 + (out - in1) * scale;
                        }
                        out_point.$coord = out;
                    }
                }
            };
        }
        interp_coord!(x);
        interp_coord!(y);
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NormalizedCoord;
    use tinta_read::{FontData, FontRead};
    use tinta_test_data::gvar::{self, SQUARE_CONTOURS, SQUARE_POINTS};

    fn make_points(tuples: &[(i32, i32)]) -> Vec<Point<i32>> {
        tuples.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn make_working_points_and_flags(
        points: &[Point<i32>],
        deltas: &[Point<i32>],
    ) -> (Vec<Point<f32>>, Vec<bool>) {
        let working_points = points
            .iter()
            .zip(deltas)
            .map(|(point, delta)| (*point + *delta).map(|v| v as f32))
            .collect();
        let flags = deltas
            .iter()
            .map(|delta| delta.x != 0 || delta.y != 0)
            .collect();
        (working_points, flags)
    }

    #[test]
    fn shift() {
        let points = make_points(&[(245, 630), (260, 700), (305, 680)]);
        // Single delta triggers a full contour shift.
        let deltas = make_points(&[(20, -10), (0, 0), (0, 0)]);
        let (mut working_points, flags) = make_working_points_and_flags(&points, &deltas);
        interpolate_deltas(&points, &flags, &[2], &mut working_points).unwrap();
        let expected = &[
            Point::new(265.0, 620.0),
            Point::new(280.0, 690.0),
            Point::new(325.0, 670.0),
        ];
        assert_eq!(&working_points, expected);
    }

    #[test]
    fn interpolate() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gvar#inferred-deltas-for-un-referenced-point-numbers
        let points = make_points(&[(245, 630), (260, 700), (305, 680)]);
        let deltas = make_points(&[(28, -62), (0, 0), (-42, -57)]);
        let (mut working_points, flags) = make_working_points_and_flags(&points, &deltas);
        interpolate_deltas(&points, &flags, &[2], &mut working_points).unwrap();
        assert!((working_points[1].x - (260.0 + 10.5)).abs() < 1e-3);
        assert_eq!(working_points[1].y, 700.0 - 57.0);
    }

    fn square() -> Vec<Point<i32>> {
        make_points(&SQUARE_POINTS)
    }

    #[test]
    fn sparse_tuple_is_interpolated() {
        let data = gvar::gvar();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let coords = [NormalizedCoord::ONE];
        let deltas = glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::new(&coords),
            &square(),
            &SQUARE_CONTOURS,
        )
        .unwrap();
        assert_eq!(
            deltas,
            [
                Point::new(10.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(10.0, 0.0)
            ]
        );
    }

    #[test]
    fn dense_tuple_is_scaled() {
        let data = gvar::gvar();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let coords = [NormalizedCoord::from_f32(-0.5)];
        let deltas = glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::new(&coords),
            &square(),
            &SQUARE_CONTOURS,
        )
        .unwrap();
        assert!(deltas.iter().all(|delta| *delta == Point::new(0.0, -2.5)));
    }

    #[test]
    fn no_variation_data() {
        let data = gvar::gvar();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let coords = [NormalizedCoord::ONE];
        for glyph_id in [1, 20] {
            let deltas = glyph_deltas(
                &gvar,
                GlyphId::new(glyph_id),
                LocationRef::new(&coords),
                &square(),
                &SQUARE_CONTOURS,
            )
            .unwrap();
            assert!(deltas.iter().all(|delta| *delta == Point::new(0.0, 0.0)));
        }
        // default location
        let deltas = glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::default(),
            &square(),
            &SQUARE_CONTOURS,
        )
        .unwrap();
        assert!(deltas.iter().all(|delta| *delta == Point::new(0.0, 0.0)));
    }

    #[test]
    fn bad_contours() {
        let data = gvar::gvar();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let result = glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::default(),
            &square(),
            &[4],
        );
        assert_eq!(result, Err(OutlineError::InvalidContour(4)));
        let result = glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::default(),
            &square(),
            &[2, 1],
        );
        assert_eq!(result, Err(OutlineError::InvalidContour(1)));
    }
}
