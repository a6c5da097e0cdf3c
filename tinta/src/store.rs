//! Blending deltas from an item variation store at a fixed location.

use std::sync::OnceLock;

use tinta_read::tables::variations::{DeltaSetIndex, DeltaSetIndexMap, ItemVariationStore};

use crate::{instance::LocationRef, NormalizedCoord};

/// An [`ItemVariationStore`] bound to one location in variation space.
///
/// The blend vector of a delta set block (one scalar per region column) only
/// depends on the location, so it is computed the first time an item in that
/// block is resolved and reused afterwards. The cache is thread safe: an
/// instance can be shared by all threads that render at the same location.
#[derive(Debug)]
pub struct VariationInstance<'a> {
    store: &'a ItemVariationStore,
    coords: Vec<NormalizedCoord>,
    blends: Vec<OnceLock<Vec<f32>>>,
}

impl<'a> VariationInstance<'a> {
    pub fn new(store: &'a ItemVariationStore, location: LocationRef) -> Self {
        let blends = (0..store.item_variation_data().len())
            .map(|_| OnceLock::new())
            .collect();
        Self {
            store,
            coords: location.coords().to_vec(),
            blends,
        }
    }

    /// The normalized coordinates this instance was created for.
    pub fn coords(&self) -> &[NormalizedCoord] {
        &self.coords
    }

    /// Returns the region scalars for the delta set block at `outer`, one
    /// per column of the block.
    ///
    /// Returns `None` if there is no such block.
    pub fn blend_vector(&self, outer: u16) -> Option<&[f32]> {
        let data = self.store.item_variation_data().get(outer as usize)?.as_ref()?;
        let blend = self.blends.get(outer as usize)?.get_or_init(|| {
            let regions = self.store.variation_region_list().variation_regions();
            data.region_indexes()
                .iter()
                .map(|ix| {
                    regions
                        .get(*ix as usize)
                        .map(|region| region.compute_scalar(&self.coords))
                        .unwrap_or_default()
                })
                .collect()
        });
        Some(blend)
    }

    /// Computes the delta for the given outer and inner indices.
    ///
    /// Indices that do not address a delta set resolve to zero.
    pub fn compute_delta(&self, index: DeltaSetIndex) -> f32 {
        let deltas = self
            .store
            .item_variation_data()
            .get(index.outer as usize)
            .and_then(Option::as_ref)
            .and_then(|data| data.delta_set(index.inner));
        let (Some(deltas), Some(blend)) = (deltas, self.blend_vector(index.outer)) else {
            log::warn!("delta set index {index:?} is out of range");
            return 0.0;
        };
        deltas
            .iter()
            .zip(blend)
            .map(|(delta, scalar)| *delta as f32 * scalar)
            .sum()
    }

    /// Computes the delta for `item`, mapped through `map`.
    ///
    /// Without a map, `item` addresses row `item` of the first block.
    pub fn compute_mapped_delta(&self, map: Option<&DeltaSetIndexMap>, item: u32) -> f32 {
        let index = match map {
            Some(map) => map.get(item),
            None => DeltaSetIndex::identity(item),
        };
        match index {
            Some(index) => self.compute_delta(index),
            None => {
                log::warn!("no delta set index for item {item}");
                0.0
            }
        }
    }
}
