//! fvar, avar, item variation store and HVAR test data.

use font_types::{F2Dot14, Fixed, NameId, Tag};

use crate::bebuffer::BeBuffer;

pub const WGHT: Tag = Tag::new(b"wght");
pub const WDTH: Tag = Tag::new(b"wdth");

fn f2dot14(value: f32) -> F2Dot14 {
    F2Dot14::from_f32(value)
}

fn fixed(value: f64) -> Fixed {
    Fixed::from_f64(value)
}

/// Two axes (wght 100..900, default 400; wdth 75..125, default 100) and
/// two named instances.
///
/// The first instance ("Bold", wght 700) carries a PostScript name id, the
/// second ("Condensed", wdth 75) stores 0xFFFF in that slot.
pub fn fvar_wght_wdth() -> BeBuffer {
    let axes_offset = 16u16;
    let axis_size = 20u16;
    // subfamily + flags + 2 coords + postscript name
    let instance_size = 2 + 2 + 2 * 4 + 2;
    BeBuffer::new()
        .push(1u16) // major
        .push(0u16) // minor
        .push(axes_offset)
        .push(2u16) // reserved
        .push(2u16) // axis count
        .push(axis_size)
        .push(2u16) // instance count
        .push(instance_size as u16)
        // wght
        .push(WGHT)
        .extend([fixed(100.0), fixed(400.0), fixed(900.0)])
        .push(0u16)
        .push(NameId::new(256))
        // wdth
        .push(WDTH)
        .extend([fixed(75.0), fixed(100.0), fixed(125.0)])
        .push(0u16)
        .push(NameId::new(257))
        // Bold
        .push(NameId::new(258))
        .push(0u16)
        .extend([fixed(700.0), fixed(100.0)])
        .push(NameId::new(259))
        // Condensed
        .push(NameId::new(260))
        .push(0u16)
        .extend([fixed(400.0), fixed(75.0)])
        .push(0xFFFFu16)
}

/// avar with a bent wght map and an empty wdth map.
///
/// wght: -1 -> -1, 0 -> 0, 0.5 -> 0.75, 1 -> 1
pub fn avar_wght() -> BeBuffer {
    BeBuffer::new()
        .push(1u16) // major
        .push(0u16) // minor
        .push(0u16) // reserved
        .push(2u16) // axis count
        .push(4u16)
        .extend([
            f2dot14(-1.0),
            f2dot14(-1.0),
            f2dot14(0.0),
            f2dot14(0.0),
            f2dot14(0.5),
            f2dot14(0.75),
            f2dot14(1.0),
            f2dot14(1.0),
        ])
        .push(0u16)
}

/// A two axis variation region list.
///
/// - region 0: wght (0, 1, 1)
/// - region 1: wdth (0, 1, 1)
/// - region 2: wght (-1, -1, 0)
pub fn region_list() -> BeBuffer {
    let zero = [f2dot14(0.0); 3];
    BeBuffer::new()
        .push(2u16) // axis count
        .push(3u16) // region count
        .extend([f2dot14(0.0), f2dot14(1.0), f2dot14(1.0)])
        .extend(zero)
        .extend(zero)
        .extend([f2dot14(0.0), f2dot14(1.0), f2dot14(1.0)])
        .extend([f2dot14(-1.0), f2dot14(-1.0), f2dot14(0.0)])
        .extend(zero)
}

/// Delta rows of [`item_variation_store`], by (outer, inner) index.
pub const DELTAS_0: [[i32; 3]; 3] = [[100, 10, -20], [-300, 0, 5], [0, 0, 0]];
pub const DELTAS_1: [[i32; 2]; 1] = [[70000, -2]];

/// An item variation store over [`region_list`] with two blocks.
///
/// Block 0 uses regions 0, 1 and 2, with one 16-bit column followed by two
/// 8-bit columns. Block 1 uses regions 0 and 1 with the long-word flag set:
/// one 32-bit column and one 16-bit column.
pub fn item_variation_store() -> BeBuffer {
    let regions = region_list();
    let mut block0 = BeBuffer::new()
        .push(3u16) // item count
        .push(1u16) // word delta count
        .push(3u16) // region index count
        .extend([0u16, 1, 2]);
    for row in DELTAS_0 {
        block0 = block0
            .push(row[0] as i16)
            .push(row[1] as i8)
            .push(row[2] as i8);
    }
    let mut block1 = BeBuffer::new()
        .push(1u16)
        .push(0x8001u16)
        .push(2u16)
        .extend([0u16, 1]);
    for row in DELTAS_1 {
        block1 = block1.push(row[0]).push(row[1] as i16);
    }
    let header_len = 2 + 4 + 2 + 2 * 4;
    let region_offset = header_len as u32;
    let block0_offset = region_offset + regions.len() as u32;
    let block1_offset = block0_offset + block0.len() as u32;
    BeBuffer::new()
        .push(1u16) // format
        .push(region_offset)
        .push(2u16)
        .extend([block0_offset, block1_offset])
        .extend_bytes(&regions)
        .extend_bytes(&block0)
        .extend_bytes(&block1)
}

/// A format 0 delta set index map with 2 byte entries and 8 inner bits.
///
/// - glyph 0 -> (0, 2)
/// - glyph 1 -> (1, 0)
/// - glyph 2 -> (0, 1)
pub fn delta_set_index_map() -> BeBuffer {
    BeBuffer::new()
        .push(0u8) // format
        .push(0x17u8) // entry format
        .push(3u16)
        .extend([0x0002u16, 0x0100, 0x0001])
}

/// HVAR without an advance width mapping and with a left side bearing
/// mapping from [`delta_set_index_map`].
pub fn hvar() -> BeBuffer {
    let store = item_variation_store();
    let header_len = 2 + 2 + 4 * 4;
    let store_offset = header_len as u32;
    let lsb_offset = store_offset + store.len() as u32;
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(store_offset)
        .push(0u32) // advance width mapping
        .push(lsb_offset)
        .push(0u32) // rsb mapping
        .extend_bytes(&store)
        .extend_bytes(&delta_set_index_map())
}
