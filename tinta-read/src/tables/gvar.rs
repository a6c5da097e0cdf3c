//! The [gvar (Glyph Variations)](https://learn.microsoft.com/en-us/typography/opentype/spec/gvar)
//! table

use font_types::{F2Dot14, GlyphId, Tag};

use super::variations::{read_packed_deltas, PackedPointNumbers, TupleVariationHeader};
use crate::{FontData, FontRead, ReadError};

/// 'gvar'
pub const TAG: Tag = Tag::new(b"gvar");

/// If set, offsets to glyph variation data are 32-bit.
const LONG_OFFSETS: u16 = 0x0001;
/// Flag in the tuple variation count indicating shared point numbers.
const SHARED_POINT_NUMBERS: u16 = 0x8000;
/// Mask for the tuple variation count.
const COUNT_MASK: u16 = 0x0FFF;

/// The [gvar](https://learn.microsoft.com/en-us/typography/opentype/spec/gvar) table.
///
/// The header, shared tuples and offsets are decoded up front; the
/// variation data for each glyph is decoded on request.
#[derive(Clone, Debug)]
pub struct Gvar<'a> {
    axis_count: u16,
    shared_tuples: Vec<Vec<F2Dot14>>,
    glyph_data_offsets: Vec<u32>,
    glyph_data: FontData<'a>,
}

impl<'a> Gvar<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_data_offsets.len().saturating_sub(1) as u32
    }

    /// Peak tuples referenced by index from tuple variation headers.
    pub fn shared_tuples(&self) -> &[Vec<F2Dot14>] {
        &self.shared_tuples
    }

    /// Decodes the variation data for a glyph with `point_count` points.
    ///
    /// Returns `Ok(None)` for glyphs without variation data.
    pub fn glyph_variation_data(
        &self,
        glyph_id: GlyphId,
        point_count: usize,
    ) -> Result<Option<GlyphVariationData>, ReadError> {
        let ix = glyph_id.to_u32() as usize;
        let (Some(start), Some(end)) = (
            self.glyph_data_offsets.get(ix),
            self.glyph_data_offsets.get(ix + 1),
        ) else {
            return Ok(None);
        };
        if start >= end {
            return Ok(None);
        }
        let data = self
            .glyph_data
            .slice(*start as usize..*end as usize)
            .ok_or(ReadError::OutOfBounds)?;
        GlyphVariationData::read(data, self, point_count).map(Some)
    }
}

impl<'a> FontRead<'a> for Gvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidVersion(major_version));
        }
        let _minor_version: u16 = cursor.read()?;
        let axis_count: u16 = cursor.read()?;
        let shared_tuple_count: u16 = cursor.read()?;
        let shared_tuples_offset: u32 = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let flags: u16 = cursor.read()?;
        let glyph_data_offset: u32 = cursor.read()?;
        let offset_count = glyph_count as usize + 1;
        let glyph_data_offsets = if flags & LONG_OFFSETS != 0 {
            cursor.read_array::<u32>(offset_count)?
        } else {
            cursor
                .read_array::<u16>(offset_count)?
                .into_iter()
                .map(|offset| offset as u32 * 2)
                .collect()
        };
        let shared_tuples = if shared_tuple_count == 0 {
            Vec::new()
        } else {
            let tuple_data = data.resolve_offset(shared_tuples_offset)?;
            let mut tuple_cursor = tuple_data.cursor();
            (0..shared_tuple_count)
                .map(|_| tuple_cursor.read_array(axis_count as usize))
                .collect::<Result<Vec<_>, _>>()?
        };
        let glyph_data = data
            .split_off(glyph_data_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        log::debug!(
            "gvar: {glyph_count} glyphs, {axis_count} axes, {shared_tuple_count} shared tuples"
        );
        Ok(Gvar {
            axis_count,
            shared_tuples,
            glyph_data_offsets,
            glyph_data,
        })
    }
}

/// The decoded tuple variations of a single glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphVariationData {
    tuples: Vec<TupleVariation>,
}

impl GlyphVariationData {
    pub fn tuples(&self) -> &[TupleVariation] {
        &self.tuples
    }

    /// Returns the tuples with a nonzero scalar at the given location,
    /// paired with that scalar.
    pub fn active_tuples_at<'b>(
        &'b self,
        coords: &'b [F2Dot14],
    ) -> impl Iterator<Item = (&'b TupleVariation, f32)> + 'b {
        self.tuples.iter().filter_map(move |tuple| {
            let scalar = tuple.compute_scalar(coords);
            (scalar != 0.0).then_some((tuple, scalar))
        })
    }

    fn read(data: FontData, gvar: &Gvar, point_count: usize) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let tuple_variation_count: u16 = cursor.read()?;
        let data_offset: u16 = cursor.read()?;
        let count = tuple_variation_count & COUNT_MASK;
        let headers = (0..count)
            .map(|_| TupleVariationHeader::read(&mut cursor, gvar.axis_count))
            .collect::<Result<Vec<_>, _>>()?;
        let serialized = data
            .split_off(data_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut serialized_cursor = serialized.cursor();
        let shared_points = if tuple_variation_count & SHARED_POINT_NUMBERS != 0 {
            Some(PackedPointNumbers::read(&mut serialized_cursor)?)
        } else {
            None
        };
        let mut tuples = Vec::with_capacity(headers.len());
        let mut tuple_start = serialized_cursor.position();
        for header in headers {
            let tuple_data = serialized
                .slice(tuple_start..tuple_start + header.variation_data_size as usize)
                .ok_or(ReadError::OutOfBounds)?;
            tuple_start += header.variation_data_size as usize;
            let peak = match (&header.peak_tuple, header.tuple_index.tuple_records_index()) {
                (Some(peak), _) => peak.clone(),
                (None, Some(ix)) => gvar
                    .shared_tuples
                    .get(ix as usize)
                    .cloned()
                    .ok_or(ReadError::MalformedData("shared tuple index out of range"))?,
                (None, None) => return Err(ReadError::MalformedData("missing peak tuple")),
            };
            let mut tuple_cursor = tuple_data.cursor();
            let points = if header.tuple_index.private_point_numbers() {
                PackedPointNumbers::read(&mut tuple_cursor)?
            } else {
                shared_points.clone().unwrap_or(PackedPointNumbers::All)
            };
            let delta_count = points.count().unwrap_or(point_count);
            let x_deltas = read_packed_deltas(&mut tuple_cursor, delta_count)?;
            let y_deltas = read_packed_deltas(&mut tuple_cursor, delta_count)?;
            tuples.push(TupleVariation {
                peak,
                intermediate: header.intermediate_tuples,
                points,
                x_deltas,
                y_deltas,
            });
        }
        Ok(Self { tuples })
    }
}

/// A single tuple variation: a region of the design space and the point
/// deltas that apply within it.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleVariation {
    peak: Vec<F2Dot14>,
    intermediate: Option<(Vec<F2Dot14>, Vec<F2Dot14>)>,
    points: PackedPointNumbers,
    x_deltas: Vec<i16>,
    y_deltas: Vec<i16>,
}

impl TupleVariation {
    pub fn peak(&self) -> &[F2Dot14] {
        &self.peak
    }

    /// The start and end tuples of an intermediate region.
    pub fn intermediate(&self) -> Option<(&[F2Dot14], &[F2Dot14])> {
        self.intermediate
            .as_ref()
            .map(|(start, end)| (start.as_slice(), end.as_slice()))
    }

    /// Returns `true` if this tuple provides deltas for every point.
    pub fn has_deltas_for_all_points(&self) -> bool {
        self.points == PackedPointNumbers::All
    }

    /// Returns the deltas of this tuple as `(point index, dx, dy)`.
    pub fn deltas(&self) -> impl Iterator<Item = (usize, i16, i16)> + '_ {
        let points: Box<dyn Iterator<Item = usize> + '_> = match &self.points {
            PackedPointNumbers::All => Box::new(0..),
            PackedPointNumbers::Points(points) => Box::new(points.iter().map(|p| *p as usize)),
        };
        points
            .zip(self.x_deltas.iter().zip(&self.y_deltas))
            .map(|(ix, (dx, dy))| (ix, *dx, *dy))
    }

    /// Computes the scalar for this tuple at the given normalized location.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/otvaroverview#algorithm-for-interpolation-of-instance-values>
    pub fn compute_scalar(&self, coords: &[F2Dot14]) -> f32 {
        let mut scalar = 1.0f32;
        for (i, peak) in self.peak.iter().enumerate() {
            let peak = peak.to_f32();
            let coord = coords.get(i).copied().unwrap_or_default().to_f32();
            if peak == 0.0 || peak == coord {
                continue;
            }
            if coord == 0.0 {
                return 0.0;
            }
            if let Some((start, end)) = &self.intermediate {
                let start = start.get(i).copied().unwrap_or_default().to_f32();
                let end = end.get(i).copied().unwrap_or_default().to_f32();
                if coord < start || coord > end {
                    return 0.0;
                }
                if coord < peak {
                    if peak != start {
                        scalar *= (coord - start) / (peak - start);
                    }
                } else if peak != end {
                    scalar *= (end - coord) / (end - peak);
                }
            } else {
                if coord < peak.min(0.0) || coord > peak.max(0.0) {
                    return 0.0;
                }
                scalar *= coord / peak;
            }
        }
        scalar
    }
}
