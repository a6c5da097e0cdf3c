//! The [Axis Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/avar) table

use font_types::{F2Dot14, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'avar'
pub const TAG: Tag = Tag::new(b"avar");

/// The [avar](https://docs.microsoft.com/en-us/typography/opentype/spec/avar) table.
///
/// Only version 1 is supported; the version 2 extensions are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Avar {
    axis_segment_maps: Vec<SegmentMaps>,
}

impl Avar {
    /// The segment maps array, one per axis in `fvar` order.
    pub fn axis_segment_maps(&self) -> &[SegmentMaps] {
        &self.axis_segment_maps
    }
}

/// A single `(from, to)` entry of a segment map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisValueMap {
    /// A normalized coordinate value obtained using default normalization.
    pub from_coordinate: F2Dot14,
    /// The modified, normalized coordinate value.
    pub to_coordinate: F2Dot14,
}

/// [SegmentMaps](https://learn.microsoft.com/en-us/typography/opentype/spec/avar#table-formats)
/// record: a piecewise linear remapping of one axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentMaps {
    axis_value_maps: Vec<AxisValueMap>,
}

impl SegmentMaps {
    pub fn new(axis_value_maps: Vec<AxisValueMap>) -> Self {
        Self { axis_value_maps }
    }

    /// The array of axis value map records for this axis.
    pub fn axis_value_maps(&self) -> &[AxisValueMap] {
        &self.axis_value_maps
    }

    /// Applies the piecewise linear mapping to the specified coordinate.
    ///
    /// An empty map leaves the coordinate unchanged. Coordinates before the
    /// first entry or after the last entry clamp to that entry's `to` value.
    pub fn apply(&self, coord: f32) -> f32 {
        let maps = &self.axis_value_maps;
        let from = |i: usize| maps[i].from_coordinate.to_f32();
        let to = |i: usize| maps[i].to_coordinate.to_f32();
        match maps.len() {
            0 => return coord,
            // a single mapping shifts everything by its delta
            1 => return coord - from(0) + to(0),
            _ => (),
        }
        if let Some(exact) = (0..maps.len()).find(|i| from(*i) == coord) {
            return to(exact);
        }
        let Some(next) = (0..maps.len()).find(|i| from(*i) > coord) else {
            return to(maps.len() - 1);
        };
        if next == 0 {
            return to(0);
        }
        let prev = next - 1;
        let from_range = from(next) - from(prev);
        if from_range == 0.0 {
            return to(prev);
        }
        to(prev) + (to(next) - to(prev)) * (coord - from(prev)) / from_range
    }
}

impl<'a> FontRead<'a> for Avar {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidVersion(major_version));
        }
        let _minor_version: u16 = cursor.read()?;
        cursor.advance::<u16>();
        let axis_count: u16 = cursor.read()?;
        let mut axis_segment_maps = Vec::with_capacity(axis_count as usize);
        for _ in 0..axis_count {
            let count: u16 = cursor.read()?;
            let raw = cursor.read_array::<F2Dot14>(count as usize * 2)?;
            let maps = raw
                .chunks_exact(2)
                .map(|pair| AxisValueMap {
                    from_coordinate: pair[0],
                    to_coordinate: pair[1],
                })
                .collect();
            axis_segment_maps.push(SegmentMaps::new(maps));
        }
        Ok(Avar { axis_segment_maps })
    }
}
