//! The [HVAR (Horizontal Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar)
//! and [VVAR (Vertical Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar)
//! tables.
//!
//! Both tables share one layout: an item variation store followed by
//! optional delta set index maps for each metric. `VVAR` adds a map for the
//! vertical origin.

use font_types::Tag;

use super::variations::{DeltaSetIndexMap, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

/// 'HVAR'
pub const HVAR_TAG: Tag = Tag::new(b"HVAR");
/// 'VVAR'
pub const VVAR_TAG: Tag = Tag::new(b"VVAR");

/// The [HVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hvar {
    pub item_variation_store: ItemVariationStore,
    pub advance_width_mapping: Option<DeltaSetIndexMap>,
    pub lsb_mapping: Option<DeltaSetIndexMap>,
    pub rsb_mapping: Option<DeltaSetIndexMap>,
}

/// The [VVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar) table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vvar {
    pub item_variation_store: ItemVariationStore,
    pub advance_height_mapping: Option<DeltaSetIndexMap>,
    pub tsb_mapping: Option<DeltaSetIndexMap>,
    pub bsb_mapping: Option<DeltaSetIndexMap>,
    pub v_org_mapping: Option<DeltaSetIndexMap>,
}

struct MetricsVariations {
    store: ItemVariationStore,
    mappings: Vec<Option<DeltaSetIndexMap>>,
}

fn read_metrics_variations(
    data: FontData,
    n_mappings: usize,
) -> Result<MetricsVariations, ReadError> {
    let mut cursor = data.cursor();
    let major_version: u16 = cursor.read()?;
    if major_version != 1 {
        return Err(ReadError::InvalidVersion(major_version));
    }
    let _minor_version: u16 = cursor.read()?;
    let store_offset: u32 = cursor.read()?;
    let store = data
        .resolve_offset(store_offset)
        .and_then(ItemVariationStore::read)?;
    let mut mappings = Vec::with_capacity(n_mappings);
    for _ in 0..n_mappings {
        let offset: u32 = cursor.read()?;
        let mapping = data
            .resolve_nullable_offset(offset)?
            .map(DeltaSetIndexMap::read)
            .transpose()?;
        mappings.push(mapping);
    }
    Ok(MetricsVariations { store, mappings })
}

impl<'a> FontRead<'a> for Hvar {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let MetricsVariations { store, mappings } = read_metrics_variations(data, 3)?;
        let mut mappings = mappings.into_iter();
        Ok(Hvar {
            item_variation_store: store,
            advance_width_mapping: mappings.next().flatten(),
            lsb_mapping: mappings.next().flatten(),
            rsb_mapping: mappings.next().flatten(),
        })
    }
}

impl<'a> FontRead<'a> for Vvar {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let MetricsVariations { store, mappings } = read_metrics_variations(data, 4)?;
        let mut mappings = mappings.into_iter();
        Ok(Vvar {
            item_variation_store: store,
            advance_height_mapping: mappings.next().flatten(),
            tsb_mapping: mappings.next().flatten(),
            bsb_mapping: mappings.next().flatten(),
            v_org_mapping: mappings.next().flatten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::variations::DeltaSetIndex;
    use tinta_test_data::{be_buffer, variations};

    #[test]
    fn read_hvar() {
        let data = variations::hvar();
        let hvar = Hvar::read(FontData::new(&data)).unwrap();
        assert!(hvar.advance_width_mapping.is_none());
        assert!(hvar.rsb_mapping.is_none());
        let lsb = hvar.lsb_mapping.as_ref().unwrap();
        assert_eq!(lsb.get(1), Some(DeltaSetIndex { outer: 1, inner: 0 }));
        assert_eq!(hvar.item_variation_store.item_variation_data().len(), 2);
    }

    #[test]
    fn vvar_version() {
        let data = be_buffer!(2u16, 0u16, 0u32, 0u32, 0u32, 0u32, 0u32);
        assert_eq!(
            Vvar::read(FontData::new(&data)),
            Err(ReadError::InvalidVersion(2))
        );
    }
}
