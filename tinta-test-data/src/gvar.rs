//! gvar test data.

use font_types::F2Dot14;

use crate::bebuffer::BeBuffer;

/// The points of glyph 0 in [`gvar`]: a single square contour.
pub const SQUARE_POINTS: [(i32, i32); 4] = [(0, 0), (100, 0), (100, 100), (0, 100)];
/// Contour end point indices of glyph 0 in [`gvar`].
pub const SQUARE_CONTOURS: [u16; 1] = [3];

/// A single axis gvar table for two glyphs.
///
/// Glyph 0 (see [`SQUARE_POINTS`]) has two tuples:
/// - shared tuple 0 (peak 1.0) with deltas for points 0 and 2 only:
///   x +10 and +30, y unchanged
/// - an embedded peak of -1.0 with deltas for all points: y -5
///
/// Glyph 1 has no variation data.
pub fn gvar() -> BeBuffer {
    let glyph0 = BeBuffer::new()
        .push(2u16) // tuple variation count
        .push(14u16) // data offset
        // header 1
        .push(8u16)
        .push(0x2000u16)
        // header 2
        .push(7u16)
        .push(0xA000u16)
        .push(F2Dot14::from_f32(-1.0))
        // tuple 1: points 0, 2
        .extend([0x02u8, 0x01, 0, 2])
        .extend([0x01u8, 10, 30])
        .push(0x81u8)
        // tuple 2: all points
        .push(0u8)
        .push(0x83u8)
        .push(0x03u8)
        .extend([-5i8; 4])
        // padding for short offsets
        .push(0u8);
    let shared_tuples_offset = 26u32;
    let data_offset = 28u32;
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(1u16) // axis count
        .push(1u16) // shared tuple count
        .push(shared_tuples_offset)
        .push(2u16) // glyph count
        .push(0u16) // flags
        .push(data_offset)
        .extend([0u16, glyph0.len() as u16 / 2, glyph0.len() as u16 / 2])
        .push(F2Dot14::ONE)
        .extend_bytes(&glyph0)
}
