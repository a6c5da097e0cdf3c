//! Variation deltas for glyph metrics.
//!
//! The [`HVAR`](https://learn.microsoft.com/en-us/typography/opentype/spec/hvar)
//! and [`VVAR`](https://learn.microsoft.com/en-us/typography/opentype/spec/vvar)
//! tables map glyphs to delta sets in an item variation store, one mapping
//! per metric.

use tinta_read::tables::{
    hvar::{Hvar, Vvar},
    variations::DeltaSetIndexMap,
};

use crate::{instance::LocationRef, store::VariationInstance, GlyphId};

/// A glyph metric that can receive a variation delta.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    AdvanceWidth,
    LeftSideBearing,
    RightSideBearing,
    AdvanceHeight,
    TopSideBearing,
    BottomSideBearing,
    VerticalOrigin,
}

impl Metric {
    /// Returns true for the metrics stored in `VVAR`.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::AdvanceHeight
                | Self::TopSideBearing
                | Self::BottomSideBearing
                | Self::VerticalOrigin
        )
    }

    fn is_advance(self) -> bool {
        matches!(self, Self::AdvanceWidth | Self::AdvanceHeight)
    }
}

/// Metric deltas for all glyphs at one location.
///
/// Either table may be absent, in which case the metrics it would provide
/// have no variation.
#[derive(Debug)]
pub struct VariableMetrics<'a> {
    hvar: Option<(&'a Hvar, VariationInstance<'a>)>,
    vvar: Option<(&'a Vvar, VariationInstance<'a>)>,
}

impl<'a> VariableMetrics<'a> {
    pub fn new(hvar: Option<&'a Hvar>, vvar: Option<&'a Vvar>, location: LocationRef) -> Self {
        Self {
            hvar: hvar.map(|hvar| {
                (
                    hvar,
                    VariationInstance::new(&hvar.item_variation_store, location),
                )
            }),
            vvar: vvar.map(|vvar| {
                (
                    vvar,
                    VariationInstance::new(&vvar.item_variation_store, location),
                )
            }),
        }
    }

    /// Returns the delta, in font units, for the given glyph and metric.
    ///
    /// Advance metrics without a mapping use the glyph id as an index into
    /// the first delta set block. Side bearings and the vertical origin have
    /// no variation without a mapping.
    pub fn delta(&self, glyph_id: GlyphId, metric: Metric) -> f32 {
        let (instance, mapping) = match metric {
            Metric::AdvanceWidth | Metric::LeftSideBearing | Metric::RightSideBearing => {
                let Some((hvar, instance)) = &self.hvar else {
                    return 0.0;
                };
                let mapping = match metric {
                    Metric::AdvanceWidth => &hvar.advance_width_mapping,
                    Metric::LeftSideBearing => &hvar.lsb_mapping,
                    _ => &hvar.rsb_mapping,
                };
                (instance, mapping.as_ref())
            }
            _ => {
                let Some((vvar, instance)) = &self.vvar else {
                    return 0.0;
                };
                let mapping = match metric {
                    Metric::AdvanceHeight => &vvar.advance_height_mapping,
                    Metric::TopSideBearing => &vvar.tsb_mapping,
                    Metric::BottomSideBearing => &vvar.bsb_mapping,
                    _ => &vvar.v_org_mapping,
                };
                (instance, mapping.as_ref())
            }
        };
        resolve(instance, mapping, glyph_id, metric)
    }
}

fn resolve(
    instance: &VariationInstance,
    mapping: Option<&DeltaSetIndexMap>,
    glyph_id: GlyphId,
    metric: Metric,
) -> f32 {
    if mapping.is_none() && !metric.is_advance() {
        return 0.0;
    }
    instance.compute_mapped_delta(mapping, glyph_id.to_u32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NormalizedCoord;
    use tinta_read::{FontData, FontRead};
    use tinta_test_data::variations;

    fn hvar() -> Hvar {
        let data = variations::hvar();
        Hvar::read(FontData::new(&data)).unwrap()
    }

    #[test]
    fn advance_uses_identity_mapping() {
        let hvar = hvar();
        let coords = [NormalizedCoord::ONE, NormalizedCoord::ZERO];
        let metrics = VariableMetrics::new(Some(&hvar), None, LocationRef::new(&coords));
        assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceWidth), 100.0);
        assert_eq!(metrics.delta(GlyphId::new(1), Metric::AdvanceWidth), -300.0);
        // past the end of the first block
        assert_eq!(metrics.delta(GlyphId::new(3), Metric::AdvanceWidth), 0.0);
    }

    #[test]
    fn side_bearings_use_mappings() {
        let hvar = hvar();
        let coords = [NormalizedCoord::ONE, NormalizedCoord::ZERO];
        let metrics = VariableMetrics::new(Some(&hvar), None, LocationRef::new(&coords));
        assert_eq!(metrics.delta(GlyphId::new(1), Metric::LeftSideBearing), 70000.0);
        assert_eq!(metrics.delta(GlyphId::new(2), Metric::LeftSideBearing), -300.0);
        // no rsb mapping
        assert_eq!(metrics.delta(GlyphId::new(1), Metric::RightSideBearing), 0.0);
    }

    #[test]
    fn missing_tables_have_no_deltas() {
        let hvar = hvar();
        let coords = [NormalizedCoord::ONE, NormalizedCoord::ONE];
        let metrics = VariableMetrics::new(Some(&hvar), None, LocationRef::new(&coords));
        for metric in [
            Metric::AdvanceHeight,
            Metric::TopSideBearing,
            Metric::BottomSideBearing,
            Metric::VerticalOrigin,
        ] {
            assert!(metric.is_vertical());
            assert_eq!(metrics.delta(GlyphId::new(0), metric), 0.0);
        }
        let metrics = VariableMetrics::new(None, None, LocationRef::new(&coords));
        assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceWidth), 0.0);
    }

    #[test]
    fn default_location() {
        let hvar = hvar();
        let metrics = VariableMetrics::new(Some(&hvar), None, LocationRef::default());
        assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceWidth), 0.0);
        assert_eq!(metrics.delta(GlyphId::new(1), Metric::LeftSideBearing), 0.0);
    }
}
