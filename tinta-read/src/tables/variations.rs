//! OpenType font variations common tables.
//!
//! The [item variation store], [delta set index maps] and the
//! [tuple variation store] encodings shared by `gvar`, `HVAR`, `VVAR` and
//! `COLR`.
//!
//! [item variation store]: https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store
//! [delta set index maps]: https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#associating-target-items-to-variation-data
//! [tuple variation store]: https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#tuple-variation-store

use font_types::{F2Dot14, Uint24};

use crate::{Cursor, FontData, FontRead, ReadError};

/// Outer and inner indices for reading from an [ItemVariationStore].
#[derive(Copy, Clone, Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeltaSetIndex {
    /// Outer delta set index.
    pub outer: u16,
    /// Inner delta set index.
    pub inner: u16,
}

impl DeltaSetIndex {
    /// The index used when no mapping is present: block zero, row `item`.
    ///
    /// Returns `None` if `item` does not fit in a 16-bit inner index.
    pub fn identity(item: u32) -> Option<Self> {
        Some(Self {
            outer: 0,
            inner: u16::try_from(item).ok()?,
        })
    }
}

/// The `start`, `peak` and `end` coordinates of one axis of a region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionAxisCoordinates {
    pub start_coord: F2Dot14,
    pub peak_coord: F2Dot14,
    pub end_coord: F2Dot14,
}

impl RegionAxisCoordinates {
    fn validate(&self) -> bool {
        let (start, peak, end) = (self.start_coord, self.peak_coord, self.end_coord);
        let in_range = |v: F2Dot14| v >= -F2Dot14::ONE && v <= F2Dot14::ONE;
        if !(in_range(start) && in_range(peak) && in_range(end)) || start > peak || peak > end {
            return false;
        }
        let zero = F2Dot14::ZERO;
        if peak > zero {
            start >= zero && end >= zero
        } else if peak < zero {
            start <= zero && end <= zero
        } else {
            true
        }
    }
}

/// A region of the design space, defined as a tent function over every axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariationRegion {
    region_axes: Vec<RegionAxisCoordinates>,
}

impl VariationRegion {
    pub fn new(region_axes: Vec<RegionAxisCoordinates>) -> Self {
        Self { region_axes }
    }

    /// Array of region axis coordinates records, in the order of axes given
    /// in the 'fvar' table.
    pub fn region_axes(&self) -> &[RegionAxisCoordinates] {
        &self.region_axes
    }

    /// Computes a scalar value for this region and the specified
    /// normalized variation coordinates.
    ///
    /// Missing coordinates are treated as zero.
    pub fn compute_scalar(&self, coords: &[F2Dot14]) -> f32 {
        let mut scalar = 1.0f32;
        for (i, axis) in self.region_axes.iter().enumerate() {
            let coord = coords.get(i).copied().unwrap_or_default().to_f32();
            let start = axis.start_coord.to_f32();
            let peak = axis.peak_coord.to_f32();
            let end = axis.end_coord.to_f32();
            if start > peak || peak > end || peak == 0.0 || start < 0.0 && end > 0.0 {
                continue;
            } else if coord == peak {
                continue;
            } else if coord <= start || coord >= end {
                return 0.0;
            } else if coord < peak {
                scalar *= (coord - start) / (peak - start);
            } else {
                scalar *= (end - coord) / (end - peak);
            }
        }
        scalar
    }
}

/// The [VariationRegionList](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#variation-regions).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariationRegionList {
    axis_count: u16,
    variation_regions: Vec<VariationRegion>,
}

impl VariationRegionList {
    /// The number of variation axes for this font. This must be the same
    /// number as axisCount in the 'fvar' table.
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn variation_regions(&self) -> &[VariationRegion] {
        &self.variation_regions
    }
}

impl<'a> FontRead<'a> for VariationRegionList {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let axis_count: u16 = cursor.read()?;
        let region_count: u16 = cursor.read()?;
        let mut variation_regions = Vec::with_capacity(region_count as usize);
        for region in 0..region_count {
            let mut region_axes = Vec::with_capacity(axis_count as usize);
            for axis in 0..axis_count {
                let coords = RegionAxisCoordinates {
                    start_coord: cursor.read()?,
                    peak_coord: cursor.read()?,
                    end_coord: cursor.read()?,
                };
                if !coords.validate() {
                    return Err(ReadError::InvalidRegion { region, axis });
                }
                region_axes.push(coords);
            }
            variation_regions.push(VariationRegion { region_axes });
        }
        Ok(Self {
            axis_count,
            variation_regions,
        })
    }
}

/// One block of delta sets in an [ItemVariationStore].
///
/// Each row holds one delta per referenced region. On disk the first
/// `word_delta_count` columns of a row use the wide encoding (16 bits, or 32
/// with the long words flag) and the rest use the narrow encoding (8 bits,
/// or 16); rows are widened to `i32` when the block is decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemVariationData {
    item_count: u16,
    word_delta_count: u16,
    region_indexes: Vec<u16>,
    deltas: Vec<i32>,
}

impl ItemVariationData {
    /// The number of delta sets for distinct items.
    pub fn item_count(&self) -> u16 {
        self.item_count
    }

    /// The raw packed word count field, including the long words flag.
    pub fn word_delta_count(&self) -> u16 {
        self.word_delta_count
    }

    /// Indices into the region list, one per delta set column.
    pub fn region_indexes(&self) -> &[u16] {
        &self.region_indexes
    }

    /// Returns the per-region delta values for the specified inner index,
    /// or `None` if the index is out of range.
    pub fn delta_set(&self, inner_index: u16) -> Option<&[i32]> {
        let width = self.region_indexes.len();
        let start = inner_index as usize * width;
        self.deltas.get(start..start + width)
    }
}

impl<'a> FontRead<'a> for ItemVariationData {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let item_count: u16 = cursor.read()?;
        let word_delta_count: u16 = cursor.read()?;
        let region_index_count: u16 = cursor.read()?;
        let region_indexes = cursor.read_array(region_index_count as usize)?;
        let long_words = word_delta_count & 0x8000 != 0;
        let word_count = (word_delta_count & 0x7FFF) as usize;
        if word_count > region_index_count as usize {
            return Err(ReadError::MalformedData(
                "word delta count exceeds region index count",
            ));
        }
        let (wide, narrow) = if long_words { (4, 2) } else { (2, 1) };
        let row_len = word_count * wide + (region_index_count as usize - word_count) * narrow;
        if cursor.remaining_bytes() < item_count as usize * row_len {
            return Err(ReadError::OutOfBounds);
        }
        let mut deltas = Vec::with_capacity(item_count as usize * region_index_count as usize);
        for _ in 0..item_count {
            for column in 0..region_index_count as usize {
                let delta = match (column < word_count, long_words) {
                    (true, true) => cursor.read::<i32>()?,
                    (true, false) | (false, true) => cursor.read::<i16>()? as i32,
                    (false, false) => cursor.read::<i8>()? as i32,
                };
                deltas.push(delta);
            }
        }
        Ok(Self {
            item_count,
            word_delta_count,
            region_indexes,
            deltas,
        })
    }
}

/// The [ItemVariationStore](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemVariationStore {
    variation_region_list: VariationRegionList,
    item_variation_data: Vec<Option<ItemVariationData>>,
}

impl ItemVariationStore {
    pub fn variation_region_list(&self) -> &VariationRegionList {
        &self.variation_region_list
    }

    /// The delta set blocks. A block with a null offset is `None`.
    pub fn item_variation_data(&self) -> &[Option<ItemVariationData>] {
        &self.item_variation_data
    }

    /// Computes the delta value for the specified index and set of normalized
    /// variation coordinates.
    ///
    /// Indices that do not address a delta set resolve to zero. Callers that
    /// resolve many items at one location should cache the per-region
    /// scalars instead of using this method.
    pub fn compute_delta(&self, index: DeltaSetIndex, coords: &[F2Dot14]) -> f32 {
        let Some(data) = self
            .item_variation_data
            .get(index.outer as usize)
            .and_then(Option::as_ref)
        else {
            log::warn!("delta set index {index:?} has no variation data");
            return 0.0;
        };
        let Some(deltas) = data.delta_set(index.inner) else {
            log::warn!("delta set index {index:?} is out of range");
            return 0.0;
        };
        let regions = self.variation_region_list.variation_regions();
        deltas
            .iter()
            .zip(data.region_indexes())
            .filter_map(|(delta, region_ix)| {
                let region = regions.get(*region_ix as usize)?;
                Some(*delta as f32 * region.compute_scalar(coords))
            })
            .sum()
    }
}

impl<'a> FontRead<'a> for ItemVariationStore {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as _));
        }
        let region_list_offset: u32 = cursor.read()?;
        let data_count: u16 = cursor.read()?;
        let data_offsets: Vec<u32> = cursor.read_array(data_count as usize)?;
        let variation_region_list = data
            .resolve_offset(region_list_offset)
            .and_then(VariationRegionList::read)?;
        let region_count = variation_region_list.variation_regions().len();
        let item_variation_data = data_offsets
            .into_iter()
            .map(|offset| -> Result<Option<ItemVariationData>, ReadError> {
                let Some(block) = data.resolve_nullable_offset(offset)? else {
                    return Ok(None);
                };
                let block = ItemVariationData::read(block)?;
                if block
                    .region_indexes()
                    .iter()
                    .any(|ix| *ix as usize >= region_count)
                {
                    return Err(ReadError::MalformedData(
                        "region index out of range in ItemVariationData",
                    ));
                }
                Ok(Some(block))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "item variation store: {region_count} regions, {} blocks",
            item_variation_data.len()
        );
        Ok(Self {
            variation_region_list,
            item_variation_data,
        })
    }
}

/// A [delta set index map](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#associating-target-items-to-variation-data).
///
/// Both on-disk formats (16-bit and 32-bit map counts) decode to this type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaSetIndexMap {
    entries: Vec<DeltaSetIndex>,
}

/// Mask of the entry format field giving the size in bytes of each entry,
/// minus one, in bits 4 and 5.
const MAP_ENTRY_SIZE_MASK: u8 = 0x30;
/// Mask of the entry format field giving the number of bits used for the
/// inner index, minus one.
const INNER_INDEX_BIT_COUNT_MASK: u8 = 0x0F;

impl DeltaSetIndexMap {
    pub fn map_count(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Returns the delta set index for the specified value.
    ///
    /// Indices past the end of the map use the last entry. Returns `None`
    /// only for an empty map.
    pub fn get(&self, index: u32) -> Option<DeltaSetIndex> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.get((index as usize).min(last)).copied()
    }
}

impl<'a> FontRead<'a> for DeltaSetIndexMap {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u8 = cursor.read()?;
        let entry_format: u8 = cursor.read()?;
        let map_count = match format {
            0 => cursor.read::<u16>()? as u32,
            1 => cursor.read::<u32>()?,
            other => return Err(ReadError::InvalidFormat(other as _)),
        };
        let entry_size = ((entry_format & MAP_ENTRY_SIZE_MASK) >> 4) + 1;
        let bit_count = (entry_format & INNER_INDEX_BIT_COUNT_MASK) + 1;
        // every entry must be present; reading up front also bounds the
        // allocation by the size of the data.
        if cursor.remaining_bytes() < map_count as usize * entry_size as usize {
            return Err(ReadError::OutOfBounds);
        }
        let entries = (0..map_count)
            .map(|_| -> Result<DeltaSetIndex, ReadError> {
                let entry = read_map_entry(&mut cursor, entry_size)?;
                Ok(DeltaSetIndex {
                    outer: (entry >> bit_count) as u16,
                    inner: (entry & ((1 << bit_count) - 1)) as u16,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}

fn read_map_entry(cursor: &mut Cursor, entry_size: u8) -> Result<u32, ReadError> {
    Ok(match entry_size {
        1 => cursor.read::<u8>()? as u32,
        2 => cursor.read::<u16>()? as u32,
        3 => cursor.read::<Uint24>()?.to_u32(),
        _ => cursor.read::<u32>()?,
    })
}

/// The tuple index field of a tuple variation header: flags plus a shared
/// tuple index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TupleIndex(u16);

impl TupleIndex {
    /// Flag indicating that this tuple variation header includes an embedded
    /// peak tuple record, immediately after the tupleIndex field.
    pub const EMBEDDED_PEAK_TUPLE: u16 = 0x8000;

    /// Flag indicating that this tuple variation table applies to an
    /// intermediate region within the variation space.
    pub const INTERMEDIATE_REGION: u16 = 0x4000;

    /// Flag indicating that the serialized data for this tuple variation
    /// table includes packed "point" number data.
    pub const PRIVATE_POINT_NUMBERS: u16 = 0x2000;

    /// Mask for the low 12 bits to give the shared tuple records index.
    pub const TUPLE_INDEX_MASK: u16 = 0x0FFF;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn embedded_peak_tuple(self) -> bool {
        self.0 & Self::EMBEDDED_PEAK_TUPLE != 0
    }

    pub fn intermediate_region(self) -> bool {
        self.0 & Self::INTERMEDIATE_REGION != 0
    }

    pub fn private_point_numbers(self) -> bool {
        self.0 & Self::PRIVATE_POINT_NUMBERS != 0
    }

    /// The index into the shared tuples, if the peak is not embedded.
    pub fn tuple_records_index(self) -> Option<u16> {
        (!self.embedded_peak_tuple()).then_some(self.0 & Self::TUPLE_INDEX_MASK)
    }
}

/// A [TupleVariationHeader](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#tuplevariationheader)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TupleVariationHeader {
    /// The size in bytes of the serialized data for this tuple variation table.
    pub variation_data_size: u16,
    pub tuple_index: TupleIndex,
    /// The embedded peak tuple, if present.
    pub peak_tuple: Option<Vec<F2Dot14>>,
    /// Start and end tuples of an intermediate region, if present.
    pub intermediate_tuples: Option<(Vec<F2Dot14>, Vec<F2Dot14>)>,
}

impl TupleVariationHeader {
    /// Reads a header from the front of the cursor.
    pub fn read(cursor: &mut Cursor, axis_count: u16) -> Result<Self, ReadError> {
        let variation_data_size = cursor.read()?;
        let tuple_index = TupleIndex::from_bits(cursor.read()?);
        let axis_count = axis_count as usize;
        let peak_tuple = if tuple_index.embedded_peak_tuple() {
            Some(cursor.read_array(axis_count)?)
        } else {
            None
        };
        let intermediate_tuples = if tuple_index.intermediate_region() {
            Some((cursor.read_array(axis_count)?, cursor.read_array(axis_count)?))
        } else {
            None
        };
        Ok(Self {
            variation_data_size,
            tuple_index,
            peak_tuple,
            intermediate_tuples,
        })
    }
}

/// Decoded [packed "point" numbers](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#packed-point-numbers).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackedPointNumbers {
    /// Every point in the glyph, in order.
    All,
    /// An explicit, ascending list of point numbers.
    Points(Vec<u16>),
}

impl PackedPointNumbers {
    /// Reads point numbers from the front of the cursor.
    pub fn read(cursor: &mut Cursor) -> Result<Self, ReadError> {
        let first: u8 = cursor.read()?;
        let count = if first & 0x80 != 0 {
            let second: u8 = cursor.read()?;
            u16::from_be_bytes([first & 0x7F, second])
        } else {
            first as u16
        };
        if count == 0 {
            return Ok(Self::All);
        }
        let mut points = Vec::with_capacity(count as usize);
        let mut last = 0u16;
        while points.len() < count as usize {
            let control: u8 = cursor.read()?;
            let two_bytes = control & 0x80 != 0;
            let run_count = (control & 0x7F) as usize + 1;
            for _ in 0..run_count.min(count as usize - points.len()) {
                let delta = if two_bytes {
                    cursor.read::<u16>()?
                } else {
                    cursor.read::<u8>()? as u16
                };
                last = last.wrapping_add(delta);
                points.push(last);
            }
        }
        Ok(Self::Points(points))
    }

    /// The number of explicit points, or `None` if this refers to all points.
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Points(points) => Some(points.len()),
        }
    }
}

/// Reads `count` [packed deltas](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#packed-deltas)
/// from the front of the cursor.
pub fn read_packed_deltas(cursor: &mut Cursor, count: usize) -> Result<Vec<i16>, ReadError> {
    /// Flag indicating that this run contains no data,
    /// and that the deltas for this run are all zero.
    const DELTAS_ARE_ZERO: u8 = 0x80;
    /// Flag indicating the data type for delta values in the run.
    const DELTAS_ARE_WORDS: u8 = 0x40;
    /// Mask for the low 6 bits to provide the number of delta values in the run, minus one.
    const DELTA_RUN_COUNT_MASK: u8 = 0x3F;

    let mut deltas = Vec::with_capacity(count);
    while deltas.len() < count {
        let control: u8 = cursor.read()?;
        let run_count = ((control & DELTA_RUN_COUNT_MASK) as usize + 1).min(count - deltas.len());
        for _ in 0..run_count {
            let delta = if control & DELTAS_ARE_ZERO != 0 {
                0
            } else if control & DELTAS_ARE_WORDS != 0 {
                cursor.read::<i16>()?
            } else {
                cursor.read::<i8>()? as i16
            };
            deltas.push(delta);
        }
    }
    Ok(deltas)
}
