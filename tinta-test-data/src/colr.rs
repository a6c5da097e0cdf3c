//! COLR test data.
//!
//! Paints are built as self-contained blobs: the paint itself starts at
//! byte zero and its children follow it, so the Offset24 fields of a blob
//! stay valid wherever the blob is placed.

use font_types::{F2Dot14, FWord, Uint24};

use crate::{bebuffer::BeBuffer, variations};

pub const RED: u16 = 0;
pub const GREEN: u16 = 1;
pub const BLUE: u16 = 2;

/// `composite(backdrop: solid(green), source: glyph(7, solid(red)), src-over)`
pub const COMPOSITE_GLYPH: u32 = 1;
/// `translate(10, 5, scale(1.5, 1.5, glyph(3, solid(blue))))`
pub const TRANSFORM_GLYPH: u32 = 2;
/// `colr_layers(2, 0)` over layers `glyph(4, solid(red))` and `solid(green)`
pub const LAYERS_GLYPH: u32 = 3;
/// `colr_glyph(5)`, and glyph 5 is `colr_glyph(4)`
pub const CYCLE_GLYPH: u32 = 4;
/// `var_translate(10, 20, var 0, glyph(3, var_solid(blue, 1.0, var 2)))`
pub const VARIABLE_GLYPH: u32 = 6;
/// 70 nested translates around `glyph(3, solid(red))`
pub const DEEP_GLYPH: u32 = 7;
/// a solid that is never bound to a glyph
pub const UNBOUND_GLYPH: u32 = 8;
/// `colr_glyph(1)`
pub const REUSE_GLYPH: u32 = 9;
/// COLRv0 glyph with layers (11, red) and (12, green)
pub const V0_GLYPH: u32 = 10;
/// `glyph(3, linear_gradient(...))` with stops out of order
pub const GRADIENT_GLYPH: u32 = 12;

/// The number of nested transforms in [`DEEP_GLYPH`].
pub const DEEP_NESTING: usize = 70;

pub fn solid(palette_index: u16, alpha: f32) -> BeBuffer {
    BeBuffer::new()
        .push(2u8)
        .push(palette_index)
        .push(F2Dot14::from_f32(alpha))
}

pub fn var_solid(palette_index: u16, alpha: f32, var_index_base: u32) -> BeBuffer {
    BeBuffer::new()
        .push(3u8)
        .push(palette_index)
        .push(F2Dot14::from_f32(alpha))
        .push(var_index_base)
}

pub fn glyph(glyph_id: u16, child: BeBuffer) -> BeBuffer {
    BeBuffer::new()
        .push(10u8)
        .push(Uint24::new(6))
        .push(glyph_id)
        .extend_bytes(&child)
}

pub fn colr_glyph(glyph_id: u16) -> BeBuffer {
    BeBuffer::new().push(11u8).push(glyph_id)
}

pub fn colr_layers(num_layers: u8, first_layer_index: u32) -> BeBuffer {
    BeBuffer::new()
        .push(1u8)
        .push(num_layers)
        .push(first_layer_index)
}

pub fn translate(dx: i16, dy: i16, child: BeBuffer) -> BeBuffer {
    BeBuffer::new()
        .push(14u8)
        .push(Uint24::new(8))
        .push(FWord::new(dx))
        .push(FWord::new(dy))
        .extend_bytes(&child)
}

pub fn var_translate(dx: i16, dy: i16, var_index_base: u32, child: BeBuffer) -> BeBuffer {
    BeBuffer::new()
        .push(15u8)
        .push(Uint24::new(12))
        .push(FWord::new(dx))
        .push(FWord::new(dy))
        .push(var_index_base)
        .extend_bytes(&child)
}

pub fn scale(scale_x: f32, scale_y: f32, child: BeBuffer) -> BeBuffer {
    BeBuffer::new()
        .push(16u8)
        .push(Uint24::new(8))
        .push(F2Dot14::from_f32(scale_x))
        .push(F2Dot14::from_f32(scale_y))
        .extend_bytes(&child)
}

pub fn composite(source: BeBuffer, mode: u8, backdrop: BeBuffer) -> BeBuffer {
    BeBuffer::new()
        .push(32u8)
        .push(Uint24::new(8))
        .push(mode)
        .push(Uint24::new(8 + source.len() as u32))
        .extend_bytes(&source)
        .extend_bytes(&backdrop)
}

/// A linear gradient; `stops` are `(offset, palette index, alpha)`.
pub fn linear_gradient(points: [i16; 6], extend: u8, stops: &[(f32, u16, f32)]) -> BeBuffer {
    let mut buf = BeBuffer::new().push(4u8).push(Uint24::new(16));
    for coord in points {
        buf = buf.push(FWord::new(coord));
    }
    buf = buf.push(extend).push(stops.len() as u16);
    for (offset, palette_index, alpha) in stops {
        buf = buf
            .push(F2Dot14::from_f32(*offset))
            .push(*palette_index)
            .push(F2Dot14::from_f32(*alpha));
    }
    buf
}

/// A COLRv0 table with a single base glyph, [`V0_GLYPH`].
pub fn colr_v0() -> BeBuffer {
    let header_len = 14u32;
    BeBuffer::new()
        .push(0u16)
        .push(1u16)
        .push(header_len)
        .push(header_len + 6)
        .push(2u16)
        .extend(v0_records())
}

fn v0_records() -> [u16; 7] {
    [V0_GLYPH as u16, 0, 2, 11, RED, 12, GREEN]
}

fn base_glyph_paints() -> Vec<(u32, BeBuffer)> {
    let mut deep = glyph(3, solid(RED, 1.0));
    for _ in 0..DEEP_NESTING {
        deep = translate(1, 0, deep);
    }
    vec![
        (
            COMPOSITE_GLYPH,
            composite(glyph(7, solid(RED, 1.0)), 3, solid(GREEN, 1.0)),
        ),
        (
            TRANSFORM_GLYPH,
            translate(10, 5, scale(1.5, 1.5, glyph(3, solid(BLUE, 1.0)))),
        ),
        (LAYERS_GLYPH, colr_layers(2, 0)),
        (CYCLE_GLYPH, colr_glyph(5)),
        (5, colr_glyph(4)),
        (
            VARIABLE_GLYPH,
            var_translate(10, 20, 0, glyph(3, var_solid(BLUE, 1.0, 2))),
        ),
        (DEEP_GLYPH, deep),
        (UNBOUND_GLYPH, solid(RED, 1.0)),
        (REUSE_GLYPH, colr_glyph(COMPOSITE_GLYPH as u16)),
        (
            GRADIENT_GLYPH,
            glyph(
                3,
                linear_gradient(
                    [0, 0, 100, 0, 0, 100],
                    0,
                    &[(1.0, BLUE, 1.0), (0.0, RED, 0.5)],
                ),
            ),
        ),
    ]
}

fn base_glyph_list() -> BeBuffer {
    let paints = base_glyph_paints();
    let mut paint_offset = 4 + paints.len() as u32 * 6;
    let mut list = BeBuffer::new().push(paints.len() as u32);
    for (glyph_id, paint) in &paints {
        list = list.push(*glyph_id as u16).push(paint_offset);
        paint_offset += paint.len() as u32;
    }
    for (_, paint) in &paints {
        list = list.extend_bytes(paint);
    }
    list
}

fn layer_list() -> BeBuffer {
    let layers = [glyph(4, solid(RED, 1.0)), solid(GREEN, 1.0)];
    let mut paint_offset = 4 + layers.len() as u32 * 4;
    let mut list = BeBuffer::new().push(layers.len() as u32);
    for paint in &layers {
        list = list.push(paint_offset);
        paint_offset += paint.len() as u32;
    }
    for paint in &layers {
        list = list.extend_bytes(paint);
    }
    list
}

/// Glyphs 1..=2 get a static box, glyph 6 a variable box (var index 0).
fn clip_list() -> BeBuffer {
    let header_len = 1 + 4 + 2 * 7;
    BeBuffer::new()
        .push(1u8)
        .push(2u32)
        .extend([1u16, 2])
        .push(Uint24::new(header_len))
        .extend([6u16, 6])
        .push(Uint24::new(header_len + 9))
        .push(1u8)
        .extend([FWord::new(0), FWord::new(0), FWord::new(100), FWord::new(100)])
        .push(2u8)
        .extend([FWord::new(0), FWord::new(0), FWord::new(50), FWord::new(50)])
        .push(0u32)
}

/// A COLRv1 table containing the base glyphs described by the constants in
/// this module, along with the v0 records of [`colr_v0`].
///
/// The item variation store is [`variations::item_variation_store`], with no
/// delta set index map.
pub fn colr_v1() -> BeBuffer {
    let header_len = 34u32;
    let base_records_offset = header_len;
    let layer_records_offset = base_records_offset + 6;
    let base_glyph_list = base_glyph_list();
    let layer_list = layer_list();
    let clip_list = clip_list();
    let store = variations::item_variation_store();
    let base_glyph_list_offset = layer_records_offset + 8;
    let layer_list_offset = base_glyph_list_offset + base_glyph_list.len() as u32;
    let clip_list_offset = layer_list_offset + layer_list.len() as u32;
    let store_offset = clip_list_offset + clip_list.len() as u32;
    BeBuffer::new()
        .push(1u16)
        .push(1u16)
        .push(base_records_offset)
        .push(layer_records_offset)
        .push(2u16)
        .push(base_glyph_list_offset)
        .push(layer_list_offset)
        .push(clip_list_offset)
        .push(0u32) // var index map
        .push(store_offset)
        .extend(v0_records())
        .extend_bytes(&base_glyph_list)
        .extend_bytes(&layer_list)
        .extend_bytes(&clip_list)
        .extend_bytes(&store)
}
