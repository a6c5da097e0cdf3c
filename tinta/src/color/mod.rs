//! Color glyph support.
//!
//! A [`ColorGlyphCollection`] provides access to the color glyphs of a font
//! as described by the [`COLR`](https://learn.microsoft.com/en-us/typography/opentype/spec/colr)
//! table. Version 0 glyphs are a flat stack of (glyph, palette color)
//! layers. Version 1 glyphs are a graph of paints which is flattened, at a
//! given location in variation space, into a sequence of
//! [`ResolvedGlyphLayer`]s: leaf paints bound to a glyph outline along with
//! the transform and composite mode accumulated on the way to them.
//!
//! # Example
//!
//! ```rust,ignore
//! use tinta::{color::ColorGlyphCollection, LocationRef};
//!
//! let color_glyphs = ColorGlyphCollection::new(&font);
//! for layer in color_glyphs.v1_layers(glyph_id, LocationRef::default())? {
//!     let path = layer.geometry(LocationRef::default(), &outlines);
//!     let brush = color_glyphs.brush(&layer, LocationRef::default(), &palette);
//!     // fill path with brush
//! }
//! ```

mod flatten;
mod instance;
mod transform;

use std::ops::Range;

use tinta_read::{
    tables::colr::{Colr, CompositeMode, Layer, Paint, PaintId},
    types::{BoundingBox, F2Dot14},
    ReadError, TableProvider,
};

use crate::{instance::LocationRef, GlyphId};

use instance::ColrInstance;

pub use instance::{Brush, Color, Palette, ResolvedColorStop};
pub use tinta_read::tables::colr::Extend;
pub use transform::Transform;

/// Depth at which we will stop traversing and return an error.
///
/// Used to prevent stack overflows.
///
/// This limit matches the one used in HarfBuzz:
/// HB_MAX_NESTING_LEVEL: <https://github.com/harfbuzz/harfbuzz/blob/c2f8f35a6cfce43b88552b3eb5c05062ac7007b2/src/hb-limits.hh#L53>
pub const MAX_TRAVERSAL_DEPTH: usize = 64;

/// An error during resolution of a color glyph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    #[error("Error reading font data: {0}")]
    Read(#[from] ReadError),
    #[error("The glyph {0} has no color data")]
    GlyphNotFound(GlyphId),
    #[error("The paint graph of glyph {0} contains no glyph bound paints")]
    NoLayers(GlyphId),
    #[error("Paint cycle detected in COLR table")]
    PaintCycleDetected,
    #[error("Depth limit exceeded in COLR table")]
    DepthLimitExceeded,
}

/// Source of glyph outlines for [`ResolvedGlyphLayer::geometry`].
pub trait OutlineProvider {
    /// Returns the outline of the glyph, in font units, at the given
    /// location.
    fn outline(&self, glyph_id: GlyphId, location: LocationRef) -> Option<kurbo::BezPath>;
}

impl<F> OutlineProvider for F
where
    F: Fn(GlyphId, LocationRef) -> Option<kurbo::BezPath>,
{
    fn outline(&self, glyph_id: GlyphId, location: LocationRef) -> Option<kurbo::BezPath> {
        self(glyph_id, location)
    }
}

/// A leaf paint bound to a glyph outline.
///
/// Produced by flattening a paint graph. The paint is always one of the
/// solid or gradient variants, with variations not yet applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGlyphLayer {
    /// The glyph whose outline is filled.
    pub glyph_id: GlyphId,
    /// The leaf paint.
    pub paint: Paint,
    /// The transform accumulated from the root of the graph.
    pub transform: Transform,
    pub composite_mode: CompositeMode,
    /// The clip box of the base glyph, in font units.
    pub clip_box: Option<BoundingBox<f32>>,
}

impl ResolvedGlyphLayer {
    /// Returns the outline of the bound glyph with the accumulated transform
    /// applied.
    pub fn geometry(
        &self,
        location: LocationRef,
        outlines: &impl OutlineProvider,
    ) -> Option<kurbo::BezPath> {
        let mut path = outlines.outline(self.glyph_id, location)?;
        path.apply_affine(self.transform.into());
        Some(path)
    }
}

/// The table version that describes a color glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ColorGlyphFormat {
    ColrV0,
    ColrV1,
}

#[derive(Clone, Debug)]
enum ColorGlyphKind {
    V0(Range<usize>),
    V1(PaintId),
}

/// A color glyph from a [`ColorGlyphCollection`].
#[derive(Clone, Debug)]
pub struct ColorGlyph<'a> {
    colr: &'a Colr,
    glyph_id: GlyphId,
    kind: ColorGlyphKind,
}

impl<'a> ColorGlyph<'a> {
    /// Returns the glyph identifier that was used to retrieve this glyph.
    pub fn glyph_id(&self) -> GlyphId {
        self.glyph_id
    }

    pub fn format(&self) -> ColorGlyphFormat {
        match self.kind {
            ColorGlyphKind::V0(_) => ColorGlyphFormat::ColrV0,
            ColorGlyphKind::V1(_) => ColorGlyphFormat::ColrV1,
        }
    }

    /// Returns the layer stack of a version 0 glyph.
    pub fn v0_layers(&self) -> Option<&'a [Layer]> {
        match &self.kind {
            ColorGlyphKind::V0(range) => self.colr.v0_layers(range.clone()),
            ColorGlyphKind::V1(_) => None,
        }
    }

    /// Resolves the glyph into layers at the given location.
    ///
    /// Version 0 layers become solid fills with an identity transform.
    pub fn resolve(&self, location: LocationRef) -> Result<Vec<ResolvedGlyphLayer>, PaintError> {
        match &self.kind {
            ColorGlyphKind::V0(range) => {
                let layers = self
                    .colr
                    .v0_layers(range.clone())
                    .ok_or(ReadError::OutOfBounds)?;
                if layers.is_empty() {
                    return Err(PaintError::NoLayers(self.glyph_id));
                }
                Ok(layers
                    .iter()
                    .map(|layer| ResolvedGlyphLayer {
                        glyph_id: layer.glyph_id.into(),
                        paint: Paint::Solid {
                            palette_index: layer.palette_index,
                            alpha: F2Dot14::ONE,
                        },
                        transform: Transform::IDENTITY,
                        composite_mode: CompositeMode::SrcOver,
                        clip_box: None,
                    })
                    .collect())
            }
            ColorGlyphKind::V1(root) => {
                let instance = ColrInstance::new(self.colr, location);
                flatten::flatten(&instance, self.glyph_id, *root)
            }
        }
    }
}

/// Collection of color glyphs.
#[derive(Clone, Debug, Default)]
pub struct ColorGlyphCollection {
    colr: Option<Colr>,
}

impl ColorGlyphCollection {
    /// Creates a new color glyph collection for the given font.
    ///
    /// A font without a readable `COLR` table has no color glyphs.
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Self {
        let colr = font
            .colr()
            .map_err(|e| log::debug!("no usable COLR table: {e}"))
            .ok();
        Self { colr }
    }

    pub fn from_colr(colr: Colr) -> Self {
        Self { colr: Some(colr) }
    }

    pub fn colr(&self) -> Option<&Colr> {
        self.colr.as_ref()
    }

    /// Returns true if the glyph has a version 0 layer stack.
    pub fn has_v0(&self, glyph_id: GlyphId) -> bool {
        self.colr
            .as_ref()
            .is_some_and(|colr| colr.v0_base_glyph(glyph_id).is_some())
    }

    /// Returns true if the glyph has a version 1 paint graph.
    pub fn has_v1(&self, glyph_id: GlyphId) -> bool {
        self.colr
            .as_ref()
            .is_some_and(|colr| colr.v1_base_glyph(glyph_id).is_some())
    }

    /// Returns the color glyph for the given glyph identifier.
    ///
    /// If the glyph has both version 0 and version 1 data, the version 1
    /// graph is returned.
    pub fn get(&self, glyph_id: GlyphId) -> Option<ColorGlyph<'_>> {
        let colr = self.colr.as_ref()?;
        let kind = match colr.v1_base_glyph(glyph_id) {
            Some(root) => ColorGlyphKind::V1(root),
            None => ColorGlyphKind::V0(colr.v0_base_glyph(glyph_id)?),
        };
        Some(ColorGlyph {
            colr,
            glyph_id,
            kind,
        })
    }

    /// Returns an iterator over all version 0 color glyphs, in glyph order.
    pub fn iter_v0(&self) -> impl Iterator<Item = ColorGlyph<'_>> + '_ {
        self.colr.iter().flat_map(|colr| {
            colr.base_glyph_records().iter().map(move |record| {
                let start = record.first_layer_index as usize;
                ColorGlyph {
                    colr,
                    glyph_id: record.glyph_id.into(),
                    kind: ColorGlyphKind::V0(start..start + record.num_layers as usize),
                }
            })
        })
    }

    /// Returns an iterator over all version 1 color glyphs, in glyph order.
    pub fn iter_v1(&self) -> impl Iterator<Item = ColorGlyph<'_>> + '_ {
        self.colr.iter().flat_map(|colr| {
            colr.v1_base_glyphs()
                .iter()
                .map(move |(glyph_id, root)| ColorGlyph {
                    colr,
                    glyph_id: (*glyph_id).into(),
                    kind: ColorGlyphKind::V1(*root),
                })
        })
    }

    /// Returns the version 0 layers of the glyph, a direct slice of the
    /// layer records.
    pub fn v0_layers(&self, glyph_id: GlyphId) -> Option<&[Layer]> {
        let colr = self.colr.as_ref()?;
        colr.v0_layers(colr.v0_base_glyph(glyph_id)?)
    }

    /// Flattens the version 1 paint graph of the glyph at the given
    /// location.
    ///
    /// Fails if the glyph has no graph, if the graph is cyclic or too deep,
    /// or if it never reaches a paint bound to a glyph.
    pub fn v1_layers(
        &self,
        glyph_id: GlyphId,
        location: LocationRef,
    ) -> Result<Vec<ResolvedGlyphLayer>, PaintError> {
        let colr = self
            .colr
            .as_ref()
            .ok_or(PaintError::GlyphNotFound(glyph_id))?;
        let root = colr
            .v1_base_glyph(glyph_id)
            .ok_or(PaintError::GlyphNotFound(glyph_id))?;
        let instance = ColrInstance::new(colr, location);
        flatten::flatten(&instance, glyph_id, root)
    }

    /// Resolves the leaf paint of a layer into a brush, applying variation
    /// deltas for the given location and looking up colors in `palette`.
    ///
    /// Returns `None` if the collection has no `COLR` table or the gradient
    /// has no color stops.
    pub fn brush(
        &self,
        layer: &ResolvedGlyphLayer,
        location: LocationRef,
        palette: &impl Palette,
    ) -> Option<Brush> {
        let instance = ColrInstance::new(self.colr.as_ref()?, location);
        instance.resolve_brush(&layer.paint, palette)
    }

    /// Resolves the brushes of all `layers` at one location.
    ///
    /// Blend vectors are computed once and shared by every layer. The
    /// result has one entry per layer, as returned by [`brush`](Self::brush).
    pub fn brushes(
        &self,
        layers: &[ResolvedGlyphLayer],
        location: LocationRef,
        palette: &impl Palette,
    ) -> Vec<Option<Brush>> {
        let Some(colr) = self.colr.as_ref() else {
            return layers.iter().map(|_| None).collect();
        };
        let instance = ColrInstance::new(colr, location);
        layers
            .iter()
            .map(|layer| instance.resolve_brush(&layer.paint, palette))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::TestFont, NormalizedCoord};
    use kurbo::Shape;
    use pretty_assertions::assert_eq;
    use tinta_read::{tables::colr, types::GlyphId16, FontData, FontRead};
    use tinta_test_data::colr as test_data;

    fn collection() -> ColorGlyphCollection {
        let data = test_data::colr_v1();
        ColorGlyphCollection::from_colr(Colr::read(FontData::new(&data)).unwrap())
    }

    fn gid(id: u32) -> GlyphId {
        GlyphId::new(id)
    }

    #[test]
    fn membership() {
        let glyphs = collection();
        assert!(glyphs.has_v1(gid(test_data::COMPOSITE_GLYPH)));
        assert!(!glyphs.has_v0(gid(test_data::COMPOSITE_GLYPH)));
        assert!(glyphs.has_v0(gid(test_data::V0_GLYPH)));
        assert!(!glyphs.has_v1(gid(test_data::V0_GLYPH)));
        assert!(!glyphs.has_v0(gid(100)) && !glyphs.has_v1(gid(100)));
        assert!(glyphs.get(gid(100)).is_none());
    }

    #[test]
    fn formats() {
        let glyphs = collection();
        let v1 = glyphs.get(gid(test_data::TRANSFORM_GLYPH)).unwrap();
        assert_eq!(v1.format(), ColorGlyphFormat::ColrV1);
        assert!(v1.v0_layers().is_none());
        let v0 = glyphs.get(gid(test_data::V0_GLYPH)).unwrap();
        assert_eq!(v0.format(), ColorGlyphFormat::ColrV0);
        assert_eq!(v0.glyph_id(), gid(test_data::V0_GLYPH));
        assert_eq!(v0.v0_layers().map(<[_]>::len), Some(2));
    }

    #[test]
    fn v0_layers() {
        let glyphs = collection();
        let layers = glyphs.v0_layers(gid(test_data::V0_GLYPH)).unwrap();
        assert_eq!(
            layers,
            [
                colr::Layer {
                    glyph_id: GlyphId16::new(11),
                    palette_index: test_data::RED
                },
                colr::Layer {
                    glyph_id: GlyphId16::new(12),
                    palette_index: test_data::GREEN
                },
            ]
        );
        let resolved = glyphs
            .get(gid(test_data::V0_GLYPH))
            .unwrap()
            .resolve(LocationRef::default())
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].glyph_id, gid(12));
        assert_eq!(
            resolved[1].paint,
            Paint::Solid {
                palette_index: test_data::GREEN,
                alpha: F2Dot14::ONE
            }
        );
    }

    #[test]
    fn iterators() {
        let glyphs = collection();
        let v0: Vec<_> = glyphs.iter_v0().map(|glyph| glyph.glyph_id()).collect();
        assert_eq!(v0, [gid(test_data::V0_GLYPH)]);
        let v1: Vec<_> = glyphs.iter_v1().map(|glyph| glyph.glyph_id()).collect();
        assert_eq!(
            v1,
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 12].map(gid),
            "base glyph list order"
        );
        assert!(glyphs
            .iter_v1()
            .all(|glyph| glyph.format() == ColorGlyphFormat::ColrV1));
    }

    #[test]
    fn missing_glyph() {
        let glyphs = collection();
        assert_eq!(
            glyphs.v1_layers(gid(test_data::V0_GLYPH), LocationRef::default()),
            Err(PaintError::GlyphNotFound(gid(test_data::V0_GLYPH)))
        );
        let empty = ColorGlyphCollection::default();
        assert_eq!(
            empty.v1_layers(gid(1), LocationRef::default()),
            Err(PaintError::GlyphNotFound(gid(1)))
        );
        assert!(empty.iter_v0().next().is_none());
    }

    #[test]
    fn from_table_provider() {
        let data = test_data::colr_v0();
        let font = TestFont::default().with_table(colr::TAG, &data);
        let glyphs = ColorGlyphCollection::new(&font);
        assert!(glyphs.has_v0(gid(test_data::V0_GLYPH)));
        let font = TestFont::default();
        assert!(ColorGlyphCollection::new(&font).colr().is_none());
    }

    #[test]
    fn brush_at_location() {
        let glyphs = collection();
        let coords = [NormalizedCoord::ONE, NormalizedCoord::ZERO];
        let location = LocationRef::new(&coords);
        let layers = glyphs
            .v1_layers(gid(test_data::VARIABLE_GLYPH), location)
            .unwrap();
        let palette = |palette_index: u16, alpha: f32| Color {
            red: 0,
            green: 0,
            blue: palette_index as u8,
            alpha: (alpha * 255.0) as u8,
        };
        // var index 2 has no deltas, so alpha stays at 1.0
        assert_eq!(
            glyphs.brush(&layers[0], location, &palette),
            Some(Brush::Solid(Color {
                red: 0,
                green: 0,
                blue: test_data::BLUE as u8,
                alpha: 255
            }))
        );
    }

    #[test]
    fn brushes_for_all_layers() {
        let glyphs = collection();
        let coords = [NormalizedCoord::ONE, NormalizedCoord::ONE];
        let location = LocationRef::new(&coords);
        let mut layers = Vec::new();
        for glyph_id in [
            test_data::LAYERS_GLYPH,
            test_data::VARIABLE_GLYPH,
            test_data::GRADIENT_GLYPH,
        ] {
            layers.extend(glyphs.v1_layers(gid(glyph_id), location).unwrap());
        }
        let palette = |palette_index: u16, alpha: f32| Color {
            red: palette_index as u8,
            green: 0,
            blue: 0,
            alpha: (alpha * 255.0) as u8,
        };
        let brushes = glyphs.brushes(&layers, location, &palette);
        assert_eq!(brushes.len(), layers.len());
        for (layer, brush) in layers.iter().zip(&brushes) {
            assert!(brush.is_some());
            assert_eq!(brush, &glyphs.brush(layer, location, &palette));
        }
        let empty = ColorGlyphCollection::default();
        assert_eq!(empty.brushes(&layers, location, &palette), vec![None; layers.len()]);
    }

    #[test]
    fn geometry() {
        let glyphs = collection();
        let layers = glyphs
            .v1_layers(gid(test_data::TRANSFORM_GLYPH), LocationRef::default())
            .unwrap();
        let outlines = |glyph_id: GlyphId, _: LocationRef| {
            (glyph_id == gid(3)).then(|| kurbo::Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1))
        };
        let path = layers[0]
            .geometry(LocationRef::default(), &outlines)
            .unwrap();
        assert_eq!(
            path.bounding_box(),
            kurbo::Rect::new(10.0, 5.0, 25.0, 20.0)
        );
        let no_outlines = |_: GlyphId, _: LocationRef| -> Option<kurbo::BezPath> { None };
        assert!(layers[0]
            .geometry(LocationRef::default(), &no_outlines)
            .is_none());
    }
}
