//! Flattening of COLRv1 paint graphs.

use tinta_read::{
    tables::colr::{CompositeMode, Paint, PaintId},
    types::BoundingBox,
};

use super::{
    instance::ColrInstance, PaintError, ResolvedGlyphLayer, Transform, MAX_TRAVERSAL_DEPTH,
};
use crate::{
    decycler::{Decycler, DecyclerError},
    GlyphId,
};

type PaintDecycler = Decycler<PaintId, MAX_TRAVERSAL_DEPTH>;

impl From<DecyclerError> for PaintError {
    fn from(value: DecyclerError) -> Self {
        match value {
            DecyclerError::CycleDetected => Self::PaintCycleDetected,
            DecyclerError::DepthLimitExceeded => Self::DepthLimitExceeded,
        }
    }
}

/// State carried down the graph.
#[derive(Copy, Clone, Debug)]
struct State {
    glyph_id: Option<GlyphId>,
    transform: Transform,
    composite_mode: CompositeMode,
}

struct Flattener<'a, 'b> {
    instance: &'b ColrInstance<'a>,
    clip_box: Option<BoundingBox<f32>>,
    layers: Vec<ResolvedGlyphLayer>,
}

/// Flattens the graph rooted at `root` into a sequence of glyph bound leaf
/// paints, in paint order.
pub(crate) fn flatten(
    instance: &ColrInstance,
    glyph_id: GlyphId,
    root: PaintId,
) -> Result<Vec<ResolvedGlyphLayer>, PaintError> {
    let clip_box = instance
        .colr
        .v1_clip_box(glyph_id)
        .map(|clip_box| instance.resolve_clip_box(clip_box));
    let mut flattener = Flattener {
        instance,
        clip_box,
        layers: Vec::new(),
    };
    let state = State {
        glyph_id: None,
        transform: Transform::IDENTITY,
        composite_mode: CompositeMode::SrcOver,
    };
    flattener
        .visit(&mut PaintDecycler::default(), root, state)
        .inspect_err(|e| log::warn!("failed to flatten color glyph {glyph_id}: {e}"))?;
    if flattener.layers.is_empty() {
        return Err(PaintError::NoLayers(glyph_id));
    }
    Ok(flattener.layers)
}

impl Flattener<'_, '_> {
    fn visit(
        &mut self,
        decycler: &mut PaintDecycler,
        paint_id: PaintId,
        mut state: State,
    ) -> Result<(), PaintError> {
        let mut cycle_guard = decycler.enter(paint_id)?;
        let colr = self.instance.colr;
        let paint = match colr.paints().get(paint_id) {
            Some(Ok(paint)) => paint,
            Some(Err(e)) => {
                log::warn!("skipping unreadable paint {paint_id:?}: {e}");
                return Ok(());
            }
            None => {
                log::warn!("skipping missing paint {paint_id:?}");
                return Ok(());
            }
        };
        match paint {
            Paint::ColrLayers {
                num_layers,
                first_layer_index,
            } => {
                let start = *first_layer_index as usize;
                for layer_ix in start..start + *num_layers as usize {
                    let Some(layer) = colr.v1_layer(layer_ix) else {
                        log::warn!("skipping missing layer {layer_ix}");
                        continue;
                    };
                    self.visit(&mut cycle_guard, layer, state)?;
                }
            }
            Paint::Glyph { paint, glyph_id } => {
                state.glyph_id = Some((*glyph_id).into());
                self.visit(&mut cycle_guard, *paint, state)?;
            }
            Paint::ColrGlyph { glyph_id } => {
                let glyph_id = GlyphId::from(*glyph_id);
                let Some(root) = colr.v1_base_glyph(glyph_id) else {
                    log::warn!("skipping reference to missing color glyph {glyph_id}");
                    return Ok(());
                };
                state.glyph_id = Some(glyph_id);
                self.visit(&mut cycle_guard, root, state)?;
            }
            Paint::Composite {
                source_paint,
                composite_mode,
                backdrop_paint,
            } => {
                self.visit(&mut cycle_guard, *backdrop_paint, state)?;
                state.composite_mode = *composite_mode;
                self.visit(&mut cycle_guard, *source_paint, state)?;
            }
            Paint::Solid { .. }
            | Paint::VarSolid { .. }
            | Paint::LinearGradient { .. }
            | Paint::VarLinearGradient { .. }
            | Paint::RadialGradient { .. }
            | Paint::VarRadialGradient { .. }
            | Paint::SweepGradient { .. }
            | Paint::VarSweepGradient { .. } => {
                if let Some(glyph_id) = state.glyph_id {
                    self.layers.push(ResolvedGlyphLayer {
                        glyph_id,
                        paint: paint.clone(),
                        transform: state.transform,
                        composite_mode: state.composite_mode,
                        clip_box: self.clip_box,
                    });
                }
            }
            Paint::Transform { paint: child, .. }
            | Paint::VarTransform { paint: child, .. }
            | Paint::Translate { paint: child, .. }
            | Paint::VarTranslate { paint: child, .. }
            | Paint::Scale { paint: child, .. }
            | Paint::VarScale { paint: child, .. }
            | Paint::ScaleAroundCenter { paint: child, .. }
            | Paint::VarScaleAroundCenter { paint: child, .. }
            | Paint::ScaleUniform { paint: child, .. }
            | Paint::VarScaleUniform { paint: child, .. }
            | Paint::ScaleUniformAroundCenter { paint: child, .. }
            | Paint::VarScaleUniformAroundCenter { paint: child, .. }
            | Paint::Rotate { paint: child, .. }
            | Paint::VarRotate { paint: child, .. }
            | Paint::RotateAroundCenter { paint: child, .. }
            | Paint::VarRotateAroundCenter { paint: child, .. }
            | Paint::Skew { paint: child, .. }
            | Paint::VarSkew { paint: child, .. }
            | Paint::SkewAroundCenter { paint: child, .. }
            | Paint::VarSkewAroundCenter { paint: child, .. } => {
                if let Some(transform) = self.instance.resolve_transform(paint) {
                    state.transform *= transform;
                }
                self.visit(&mut cycle_guard, *child, state)?;
            }
        }
        Ok(())
    }
}
