//! The [COLR](https://docs.microsoft.com/en-us/typography/opentype/spec/colr) table

mod arena;
mod paint;

use std::ops::Range;

use font_types::{GlyphId, GlyphId16, Tag};

use super::variations::{DeltaSetIndexMap, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

pub use arena::{PaintArena, PaintId};
pub use paint::{
    Affine2x3, ClipBox, ColorLine, ColorStop, CompositeMode, Extend, Paint, NO_VARIATION_INDEX,
};

use arena::PaintArenaBuilder;

/// 'COLR'
pub const TAG: Tag = Tag::new(b"COLR");

/// A COLRv0 [BaseGlyph](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#baseglyph-and-layer-records) record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseGlyph {
    pub glyph_id: GlyphId16,
    pub first_layer_index: u16,
    pub num_layers: u16,
}

/// A COLRv0 Layer record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layer {
    pub glyph_id: GlyphId16,
    pub palette_index: u16,
}

/// A record of the ClipList: a clip box for an inclusive range of glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clip {
    pub start_glyph_id: GlyphId16,
    pub end_glyph_id: GlyphId16,
    pub clip_box: ClipBox,
}

/// The [COLR](https://docs.microsoft.com/en-us/typography/opentype/spec/colr) table.
///
/// Every paint reachable from the base glyph list or the layer list is
/// decoded when the table is read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Colr {
    version: u16,
    base_glyph_records: Vec<BaseGlyph>,
    layer_records: Vec<Layer>,
    base_glyph_paints: Vec<(GlyphId16, PaintId)>,
    layer_paints: Vec<PaintId>,
    clips: Vec<Clip>,
    var_index_map: Option<DeltaSetIndexMap>,
    item_variation_store: Option<ItemVariationStore>,
    paints: PaintArena,
}

impl Colr {
    pub fn version(&self) -> u16 {
        self.version
    }

    /// The sorted COLRv0 base glyph records.
    pub fn base_glyph_records(&self) -> &[BaseGlyph] {
        &self.base_glyph_records
    }

    pub fn layer_records(&self) -> &[Layer] {
        &self.layer_records
    }

    /// Returns the COLRv0 base glyph for the given glyph identifier.
    ///
    /// The return value is a range of layer indices that can be passed to
    /// [`v0_layer`](Self::v0_layer) to retrieve the layer glyph identifiers
    /// and palette color indices.
    pub fn v0_base_glyph(&self, glyph_id: GlyphId) -> Option<Range<usize>> {
        let glyph_id: GlyphId16 = glyph_id.try_into().ok()?;
        let ix = self
            .base_glyph_records
            .binary_search_by(|rec| rec.glyph_id.cmp(&glyph_id))
            .ok()?;
        let record = &self.base_glyph_records[ix];
        let start = record.first_layer_index as usize;
        Some(start..start + record.num_layers as usize)
    }

    /// Returns the COLRv0 layer at the given index.
    pub fn v0_layer(&self, index: usize) -> Option<Layer> {
        self.layer_records.get(index).copied()
    }

    /// Returns the COLRv0 layers in the given range, or `None` if the range
    /// is not contained in the layer records.
    pub fn v0_layers(&self, range: Range<usize>) -> Option<&[Layer]> {
        self.layer_records.get(range)
    }

    /// Returns the root paint of the COLRv1 base glyph for the given glyph
    /// identifier.
    pub fn v1_base_glyph(&self, glyph_id: GlyphId) -> Option<PaintId> {
        let glyph_id: GlyphId16 = glyph_id.try_into().ok()?;
        let ix = self
            .base_glyph_paints
            .binary_search_by(|(gid, _)| gid.cmp(&glyph_id))
            .ok()?;
        Some(self.base_glyph_paints[ix].1)
    }

    /// The COLRv1 base glyph records as `(glyph, root paint)` pairs.
    pub fn v1_base_glyphs(&self) -> &[(GlyphId16, PaintId)] {
        &self.base_glyph_paints
    }

    /// Returns the COLRv1 layer at the given index.
    pub fn v1_layer(&self, index: usize) -> Option<PaintId> {
        self.layer_paints.get(index).copied()
    }

    pub fn v1_layer_count(&self) -> usize {
        self.layer_paints.len()
    }

    /// Returns the COLRv1 clip box for the given glyph identifier.
    pub fn v1_clip_box(&self, glyph_id: GlyphId) -> Option<&ClipBox> {
        use core::cmp::Ordering;
        let glyph_id: GlyphId16 = glyph_id.try_into().ok()?;
        let ix = self
            .clips
            .binary_search_by(|clip| {
                if glyph_id < clip.start_glyph_id {
                    Ordering::Greater
                } else if glyph_id > clip.end_glyph_id {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;
        Some(&self.clips[ix].clip_box)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// The decoded paint graph.
    pub fn paints(&self) -> &PaintArena {
        &self.paints
    }

    pub fn var_index_map(&self) -> Option<&DeltaSetIndexMap> {
        self.var_index_map.as_ref()
    }

    pub fn item_variation_store(&self) -> Option<&ItemVariationStore> {
        self.item_variation_store.as_ref()
    }
}

impl<'a> FontRead<'a> for Colr {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version > 1 {
            return Err(ReadError::InvalidVersion(version));
        }
        let num_base_glyph_records: u16 = cursor.read()?;
        let base_glyph_records_offset: u32 = cursor.read()?;
        let layer_records_offset: u32 = cursor.read()?;
        let num_layer_records: u16 = cursor.read()?;
        let base_glyph_records = read_records(
            data,
            base_glyph_records_offset,
            num_base_glyph_records,
            |cursor| {
                Ok(BaseGlyph {
                    glyph_id: cursor.read()?,
                    first_layer_index: cursor.read()?,
                    num_layers: cursor.read()?,
                })
            },
        )?;
        let layer_records = read_records(data, layer_records_offset, num_layer_records, |cursor| {
            Ok(Layer {
                glyph_id: cursor.read()?,
                palette_index: cursor.read()?,
            })
        })?;
        let mut colr = Colr {
            version,
            base_glyph_records,
            layer_records,
            ..Default::default()
        };
        if version == 0 {
            log::debug!(
                "COLRv0: {} base glyphs, {} layers",
                colr.base_glyph_records.len(),
                colr.layer_records.len()
            );
            return Ok(colr);
        }
        let base_glyph_list_offset: u32 = cursor.read()?;
        let layer_list_offset: u32 = cursor.read()?;
        let clip_list_offset: u32 = cursor.read()?;
        let var_index_map_offset: u32 = cursor.read()?;
        let item_variation_store_offset: u32 = cursor.read()?;

        let mut arena = PaintArenaBuilder::new(data);
        if let Some(list) = data.resolve_nullable_offset(base_glyph_list_offset)? {
            let mut list_cursor = list.cursor();
            let count: u32 = list_cursor.read()?;
            for _ in 0..count {
                let glyph_id: GlyphId16 = list_cursor.read()?;
                let paint_offset: u32 = list_cursor.read()?;
                let paint = arena.intern(base_glyph_list_offset as usize + paint_offset as usize);
                colr.base_glyph_paints.push((glyph_id, paint));
            }
        }
        if let Some(list) = data.resolve_nullable_offset(layer_list_offset)? {
            let mut list_cursor = list.cursor();
            let count: u32 = list_cursor.read()?;
            for _ in 0..count {
                let paint_offset: u32 = list_cursor.read()?;
                let paint = arena.intern(layer_list_offset as usize + paint_offset as usize);
                colr.layer_paints.push(paint);
            }
        }
        if let Some(list) = data.resolve_nullable_offset(clip_list_offset)? {
            colr.clips = read_clip_list(list)?;
        }
        colr.var_index_map = data
            .resolve_nullable_offset(var_index_map_offset)?
            .map(DeltaSetIndexMap::read)
            .transpose()?;
        colr.item_variation_store = data
            .resolve_nullable_offset(item_variation_store_offset)?
            .map(ItemVariationStore::read)
            .transpose()?;
        colr.paints = arena.build();
        log::debug!(
            "COLRv1: {} base glyphs, {} layers, {} clips, {} distinct paints",
            colr.base_glyph_paints.len(),
            colr.layer_paints.len(),
            colr.clips.len(),
            colr.paints.len()
        );
        Ok(colr)
    }
}

fn read_records<T>(
    data: FontData,
    offset: u32,
    count: u16,
    mut read: impl FnMut(&mut crate::Cursor) -> Result<T, ReadError>,
) -> Result<Vec<T>, ReadError> {
    let Some(records) = data.resolve_nullable_offset(offset)? else {
        return Ok(Vec::new());
    };
    let mut cursor = records.cursor();
    (0..count).map(|_| read(&mut cursor)).collect()
}

fn read_clip_list(list: FontData) -> Result<Vec<Clip>, ReadError> {
    let mut cursor = list.cursor();
    let format: u8 = cursor.read()?;
    if format != 1 {
        return Err(ReadError::InvalidFormat(format as _));
    }
    let num_clips: u32 = cursor.read()?;
    (0..num_clips)
        .map(|_| -> Result<Clip, ReadError> {
            let start_glyph_id = cursor.read()?;
            let end_glyph_id = cursor.read()?;
            let offset = cursor.read::<font_types::Uint24>()?.to_u32();
            let clip_box = list.resolve_offset(offset).and_then(ClipBox::read)?;
            Ok(Clip {
                start_glyph_id,
                end_glyph_id,
                clip_box,
            })
        })
        .collect()
}
