//! Paint tables and the records they reference.

use font_types::{F2Dot14, FWord, Fixed, GlyphId16, UfWord, Uint24};

use super::arena::PaintId;
use crate::{Cursor, FontData, ReadError};

/// The variation index base used by non-variable records.
///
/// A `varIndexBase` of 0xFFFFFFFF means "no variation data".
pub const NO_VARIATION_INDEX: u32 = 0xFFFF_FFFF;

/// [Extend](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#color-references-colorstop-and-colorline) enumeration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extend {
    #[default]
    Pad = 0,
    Repeat = 1,
    Reflect = 2,
    #[doc(hidden)]
    Unknown,
}

impl From<u8> for Extend {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Pad,
            1 => Self::Repeat,
            2 => Self::Reflect,
            _ => Self::Unknown,
        }
    }
}

/// [CompositeMode](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#format-32-paintcomposite) enumeration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositeMode {
    Clear = 0,
    Src = 1,
    Dest = 2,
    #[default]
    SrcOver = 3,
    DestOver = 4,
    SrcIn = 5,
    DestIn = 6,
    SrcOut = 7,
    DestOut = 8,
    SrcAtop = 9,
    DestAtop = 10,
    Xor = 11,
    Plus = 12,
    Screen = 13,
    Overlay = 14,
    Darken = 15,
    Lighten = 16,
    ColorDodge = 17,
    ColorBurn = 18,
    HardLight = 19,
    SoftLight = 20,
    Difference = 21,
    Exclusion = 22,
    Multiply = 23,
    HslHue = 24,
    HslSaturation = 25,
    HslColor = 26,
    HslLuminosity = 27,
    #[doc(hidden)]
    Unknown,
}

impl From<u8> for CompositeMode {
    fn from(raw: u8) -> Self {
        use CompositeMode::*;
        const MODES: [CompositeMode; 28] = [
            Clear,
            Src,
            Dest,
            SrcOver,
            DestOver,
            SrcIn,
            DestIn,
            SrcOut,
            DestOut,
            SrcAtop,
            DestAtop,
            Xor,
            Plus,
            Screen,
            Overlay,
            Darken,
            Lighten,
            ColorDodge,
            ColorBurn,
            HardLight,
            SoftLight,
            Difference,
            Exclusion,
            Multiply,
            HslHue,
            HslSaturation,
            HslColor,
            HslLuminosity,
        ];
        MODES.get(raw as usize).copied().unwrap_or(Unknown)
    }
}

/// A [ColorStop](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#color-references-colorstop-and-colorline)
/// or VarColorStop record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorStop {
    /// Position on a color line.
    pub stop_offset: F2Dot14,
    /// Index for a CPAL palette entry.
    pub palette_index: u16,
    /// Alpha value.
    pub alpha: F2Dot14,
    /// Base index into DeltaSetIndexMap, or [`NO_VARIATION_INDEX`].
    pub var_index_base: u32,
}

/// A ColorLine or VarColorLine table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorLine {
    pub extend: Extend,
    pub color_stops: Vec<ColorStop>,
}

impl ColorLine {
    fn read(data: FontData, is_var: bool) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let extend = Extend::from(cursor.read::<u8>()?);
        let num_stops: u16 = cursor.read()?;
        let color_stops = (0..num_stops)
            .map(|_| -> Result<ColorStop, ReadError> {
                Ok(ColorStop {
                    stop_offset: cursor.read()?,
                    palette_index: cursor.read()?,
                    alpha: cursor.read()?,
                    var_index_base: read_var_index_base(&mut cursor, is_var)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            extend,
            color_stops,
        })
    }
}

/// An [Affine2x3](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#formats-12-and-13-painttransform-paintvartransform)
/// or VarAffine2x3 record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine2x3 {
    pub xx: Fixed,
    pub yx: Fixed,
    pub xy: Fixed,
    pub yy: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    /// Base index into DeltaSetIndexMap, or [`NO_VARIATION_INDEX`].
    pub var_index_base: u32,
}

impl Affine2x3 {
    fn read(data: FontData, is_var: bool) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Self {
            xx: cursor.read()?,
            yx: cursor.read()?,
            xy: cursor.read()?,
            yy: cursor.read()?,
            dx: cursor.read()?,
            dy: cursor.read()?,
            var_index_base: read_var_index_base(&mut cursor, is_var)?,
        })
    }
}

/// A [ClipBox](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#baseglyphlist-layerlist-and-cliplist)
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipBox {
    Format1 {
        x_min: FWord,
        y_min: FWord,
        x_max: FWord,
        y_max: FWord,
    },
    Format2 {
        x_min: FWord,
        y_min: FWord,
        x_max: FWord,
        y_max: FWord,
        var_index_base: u32,
    },
}

impl ClipBox {
    pub(crate) fn read(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u8 = cursor.read()?;
        let (x_min, y_min, x_max, y_max) =
            (cursor.read()?, cursor.read()?, cursor.read()?, cursor.read()?);
        match format {
            1 => Ok(Self::Format1 {
                x_min,
                y_min,
                x_max,
                y_max,
            }),
            2 => Ok(Self::Format2 {
                x_min,
                y_min,
                x_max,
                y_max,
                var_index_base: cursor.read()?,
            }),
            other => Err(ReadError::InvalidFormat(other as _)),
        }
    }
}

/// A decoded [paint](https://learn.microsoft.com/en-us/typography/opentype/spec/colr#paint-tables)
/// table.
///
/// Child paints are referenced by [`PaintId`] in the paint arena of the
/// owning [`Colr`](super::Colr) table. Variants prefixed with `Var` carry a
/// `var_index_base` addressing the deltas for their fields in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    /// Format 1: a slice of the layer list.
    ColrLayers {
        num_layers: u8,
        first_layer_index: u32,
    },
    /// Format 2
    Solid { palette_index: u16, alpha: F2Dot14 },
    /// Format 3
    VarSolid {
        palette_index: u16,
        alpha: F2Dot14,
        var_index_base: u32,
    },
    /// Format 4
    LinearGradient {
        color_line: ColorLine,
        x0: FWord,
        y0: FWord,
        x1: FWord,
        y1: FWord,
        x2: FWord,
        y2: FWord,
    },
    /// Format 5
    VarLinearGradient {
        color_line: ColorLine,
        x0: FWord,
        y0: FWord,
        x1: FWord,
        y1: FWord,
        x2: FWord,
        y2: FWord,
        var_index_base: u32,
    },
    /// Format 6
    RadialGradient {
        color_line: ColorLine,
        x0: FWord,
        y0: FWord,
        radius0: UfWord,
        x1: FWord,
        y1: FWord,
        radius1: UfWord,
    },
    /// Format 7
    VarRadialGradient {
        color_line: ColorLine,
        x0: FWord,
        y0: FWord,
        radius0: UfWord,
        x1: FWord,
        y1: FWord,
        radius1: UfWord,
        var_index_base: u32,
    },
    /// Format 8
    SweepGradient {
        color_line: ColorLine,
        center_x: FWord,
        center_y: FWord,
        start_angle: F2Dot14,
        end_angle: F2Dot14,
    },
    /// Format 9
    VarSweepGradient {
        color_line: ColorLine,
        center_x: FWord,
        center_y: FWord,
        start_angle: F2Dot14,
        end_angle: F2Dot14,
        var_index_base: u32,
    },
    /// Format 10: binds the child paint to the outline of `glyph_id`.
    Glyph { paint: PaintId, glyph_id: GlyphId16 },
    /// Format 11: reuses the paint graph of another base glyph.
    ColrGlyph { glyph_id: GlyphId16 },
    /// Format 12
    Transform { paint: PaintId, transform: Affine2x3 },
    /// Format 13
    VarTransform { paint: PaintId, transform: Affine2x3 },
    /// Format 14
    Translate { paint: PaintId, dx: FWord, dy: FWord },
    /// Format 15
    VarTranslate {
        paint: PaintId,
        dx: FWord,
        dy: FWord,
        var_index_base: u32,
    },
    /// Format 16
    Scale {
        paint: PaintId,
        scale_x: F2Dot14,
        scale_y: F2Dot14,
    },
    /// Format 17
    VarScale {
        paint: PaintId,
        scale_x: F2Dot14,
        scale_y: F2Dot14,
        var_index_base: u32,
    },
    /// Format 18
    ScaleAroundCenter {
        paint: PaintId,
        scale_x: F2Dot14,
        scale_y: F2Dot14,
        center_x: FWord,
        center_y: FWord,
    },
    /// Format 19
    VarScaleAroundCenter {
        paint: PaintId,
        scale_x: F2Dot14,
        scale_y: F2Dot14,
        center_x: FWord,
        center_y: FWord,
        var_index_base: u32,
    },
    /// Format 20
    ScaleUniform { paint: PaintId, scale: F2Dot14 },
    /// Format 21
    VarScaleUniform {
        paint: PaintId,
        scale: F2Dot14,
        var_index_base: u32,
    },
    /// Format 22
    ScaleUniformAroundCenter {
        paint: PaintId,
        scale: F2Dot14,
        center_x: FWord,
        center_y: FWord,
    },
    /// Format 23
    VarScaleUniformAroundCenter {
        paint: PaintId,
        scale: F2Dot14,
        center_x: FWord,
        center_y: FWord,
        var_index_base: u32,
    },
    /// Format 24. Angles are in units of 180 degrees.
    Rotate { paint: PaintId, angle: F2Dot14 },
    /// Format 25
    VarRotate {
        paint: PaintId,
        angle: F2Dot14,
        var_index_base: u32,
    },
    /// Format 26
    RotateAroundCenter {
        paint: PaintId,
        angle: F2Dot14,
        center_x: FWord,
        center_y: FWord,
    },
    /// Format 27
    VarRotateAroundCenter {
        paint: PaintId,
        angle: F2Dot14,
        center_x: FWord,
        center_y: FWord,
        var_index_base: u32,
    },
    /// Format 28
    Skew {
        paint: PaintId,
        x_skew_angle: F2Dot14,
        y_skew_angle: F2Dot14,
    },
    /// Format 29
    VarSkew {
        paint: PaintId,
        x_skew_angle: F2Dot14,
        y_skew_angle: F2Dot14,
        var_index_base: u32,
    },
    /// Format 30
    SkewAroundCenter {
        paint: PaintId,
        x_skew_angle: F2Dot14,
        y_skew_angle: F2Dot14,
        center_x: FWord,
        center_y: FWord,
    },
    /// Format 31
    VarSkewAroundCenter {
        paint: PaintId,
        x_skew_angle: F2Dot14,
        y_skew_angle: F2Dot14,
        center_x: FWord,
        center_y: FWord,
        var_index_base: u32,
    },
    /// Format 32: `source` composited onto `backdrop` with `mode`.
    Composite {
        source_paint: PaintId,
        composite_mode: CompositeMode,
        backdrop_paint: PaintId,
    },
}

impl Paint {
    /// The format tag of this paint.
    pub fn format(&self) -> u8 {
        match self {
            Self::ColrLayers { .. } => 1,
            Self::Solid { .. } => 2,
            Self::VarSolid { .. } => 3,
            Self::LinearGradient { .. } => 4,
            Self::VarLinearGradient { .. } => 5,
            Self::RadialGradient { .. } => 6,
            Self::VarRadialGradient { .. } => 7,
            Self::SweepGradient { .. } => 8,
            Self::VarSweepGradient { .. } => 9,
            Self::Glyph { .. } => 10,
            Self::ColrGlyph { .. } => 11,
            Self::Transform { .. } => 12,
            Self::VarTransform { .. } => 13,
            Self::Translate { .. } => 14,
            Self::VarTranslate { .. } => 15,
            Self::Scale { .. } => 16,
            Self::VarScale { .. } => 17,
            Self::ScaleAroundCenter { .. } => 18,
            Self::VarScaleAroundCenter { .. } => 19,
            Self::ScaleUniform { .. } => 20,
            Self::VarScaleUniform { .. } => 21,
            Self::ScaleUniformAroundCenter { .. } => 22,
            Self::VarScaleUniformAroundCenter { .. } => 23,
            Self::Rotate { .. } => 24,
            Self::VarRotate { .. } => 25,
            Self::RotateAroundCenter { .. } => 26,
            Self::VarRotateAroundCenter { .. } => 27,
            Self::Skew { .. } => 28,
            Self::VarSkew { .. } => 29,
            Self::SkewAroundCenter { .. } => 30,
            Self::VarSkewAroundCenter { .. } => 31,
            Self::Composite { .. } => 32,
        }
    }

    /// Decodes the paint at `offset` bytes from the start of the COLR table.
    ///
    /// Every Offset24 in a paint is relative to the start of the paint
    /// itself. Child paints are not decoded here: each child's absolute
    /// offset is handed to `child`, which returns the id the child has in
    /// the arena.
    pub(crate) fn read(
        table: FontData,
        offset: usize,
        child: &mut impl FnMut(usize) -> PaintId,
    ) -> Result<Self, ReadError> {
        let data = table.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        let mut cursor = data.cursor();
        let format: u8 = cursor.read()?;
        let is_var = format % 2 == 1;
        let mut child_paint = |cursor: &mut Cursor| -> Result<PaintId, ReadError> {
            match cursor.read::<Uint24>()?.to_u32() {
                0 => Err(ReadError::NullOffset),
                relative => Ok(child(offset + relative as usize)),
            }
        };
        let paint = match format {
            1 => Self::ColrLayers {
                num_layers: cursor.read()?,
                first_layer_index: cursor.read()?,
            },
            2 | 3 => {
                let (palette_index, alpha) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarSolid {
                        palette_index,
                        alpha,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::Solid {
                        palette_index,
                        alpha,
                    }
                }
            }
            4 | 5 => {
                let color_line = read_color_line(data, &mut cursor, is_var)?;
                let [x0, y0, x1, y1, x2, y2] = read_fwords(&mut cursor)?;
                if is_var {
                    Self::VarLinearGradient {
                        color_line,
                        x0,
                        y0,
                        x1,
                        y1,
                        x2,
                        y2,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::LinearGradient {
                        color_line,
                        x0,
                        y0,
                        x1,
                        y1,
                        x2,
                        y2,
                    }
                }
            }
            6 | 7 => {
                let color_line = read_color_line(data, &mut cursor, is_var)?;
                let (x0, y0, radius0) = (cursor.read()?, cursor.read()?, cursor.read()?);
                let (x1, y1, radius1) = (cursor.read()?, cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarRadialGradient {
                        color_line,
                        x0,
                        y0,
                        radius0,
                        x1,
                        y1,
                        radius1,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::RadialGradient {
                        color_line,
                        x0,
                        y0,
                        radius0,
                        x1,
                        y1,
                        radius1,
                    }
                }
            }
            8 | 9 => {
                let color_line = read_color_line(data, &mut cursor, is_var)?;
                let (center_x, center_y) = (cursor.read()?, cursor.read()?);
                let (start_angle, end_angle) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarSweepGradient {
                        color_line,
                        center_x,
                        center_y,
                        start_angle,
                        end_angle,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::SweepGradient {
                        color_line,
                        center_x,
                        center_y,
                        start_angle,
                        end_angle,
                    }
                }
            }
            10 => Self::Glyph {
                paint: child_paint(&mut cursor)?,
                glyph_id: cursor.read()?,
            },
            11 => Self::ColrGlyph {
                glyph_id: cursor.read()?,
            },
            12 | 13 => {
                let paint = child_paint(&mut cursor)?;
                let offset = cursor.read::<Uint24>()?.to_u32();
                let transform = data
                    .resolve_offset(offset)
                    .and_then(|data| Affine2x3::read(data, is_var))?;
                if is_var {
                    Self::VarTransform { paint, transform }
                } else {
                    Self::Transform { paint, transform }
                }
            }
            14 | 15 => {
                let paint = child_paint(&mut cursor)?;
                let (dx, dy) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarTranslate {
                        paint,
                        dx,
                        dy,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::Translate { paint, dx, dy }
                }
            }
            16 | 17 => {
                let paint = child_paint(&mut cursor)?;
                let (scale_x, scale_y) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarScale {
                        paint,
                        scale_x,
                        scale_y,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::Scale {
                        paint,
                        scale_x,
                        scale_y,
                    }
                }
            }
            18 | 19 => {
                let paint = child_paint(&mut cursor)?;
                let (scale_x, scale_y) = (cursor.read()?, cursor.read()?);
                let (center_x, center_y) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarScaleAroundCenter {
                        paint,
                        scale_x,
                        scale_y,
                        center_x,
                        center_y,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::ScaleAroundCenter {
                        paint,
                        scale_x,
                        scale_y,
                        center_x,
                        center_y,
                    }
                }
            }
            20 | 21 => {
                let paint = child_paint(&mut cursor)?;
                let scale = cursor.read()?;
                if is_var {
                    Self::VarScaleUniform {
                        paint,
                        scale,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::ScaleUniform { paint, scale }
                }
            }
            22 | 23 => {
                let paint = child_paint(&mut cursor)?;
                let scale = cursor.read()?;
                let (center_x, center_y) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarScaleUniformAroundCenter {
                        paint,
                        scale,
                        center_x,
                        center_y,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::ScaleUniformAroundCenter {
                        paint,
                        scale,
                        center_x,
                        center_y,
                    }
                }
            }
            24 | 25 => {
                let paint = child_paint(&mut cursor)?;
                let angle = cursor.read()?;
                if is_var {
                    Self::VarRotate {
                        paint,
                        angle,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::Rotate { paint, angle }
                }
            }
            26 | 27 => {
                let paint = child_paint(&mut cursor)?;
                let angle = cursor.read()?;
                let (center_x, center_y) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarRotateAroundCenter {
                        paint,
                        angle,
                        center_x,
                        center_y,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::RotateAroundCenter {
                        paint,
                        angle,
                        center_x,
                        center_y,
                    }
                }
            }
            28 | 29 => {
                let paint = child_paint(&mut cursor)?;
                let (x_skew_angle, y_skew_angle) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarSkew {
                        paint,
                        x_skew_angle,
                        y_skew_angle,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::Skew {
                        paint,
                        x_skew_angle,
                        y_skew_angle,
                    }
                }
            }
            30 | 31 => {
                let paint = child_paint(&mut cursor)?;
                let (x_skew_angle, y_skew_angle) = (cursor.read()?, cursor.read()?);
                let (center_x, center_y) = (cursor.read()?, cursor.read()?);
                if is_var {
                    Self::VarSkewAroundCenter {
                        paint,
                        x_skew_angle,
                        y_skew_angle,
                        center_x,
                        center_y,
                        var_index_base: cursor.read()?,
                    }
                } else {
                    Self::SkewAroundCenter {
                        paint,
                        x_skew_angle,
                        y_skew_angle,
                        center_x,
                        center_y,
                    }
                }
            }
            32 => {
                let source_paint = child_paint(&mut cursor)?;
                let composite_mode = CompositeMode::from(cursor.read::<u8>()?);
                let backdrop_paint = child_paint(&mut cursor)?;
                Self::Composite {
                    source_paint,
                    composite_mode,
                    backdrop_paint,
                }
            }
            other => return Err(ReadError::InvalidFormat(other as _)),
        };
        Ok(paint)
    }
}

fn read_var_index_base(cursor: &mut Cursor, is_var: bool) -> Result<u32, ReadError> {
    if is_var {
        cursor.read()
    } else {
        Ok(NO_VARIATION_INDEX)
    }
}

fn read_color_line(
    data: FontData,
    cursor: &mut Cursor,
    is_var: bool,
) -> Result<ColorLine, ReadError> {
    let offset = cursor.read::<Uint24>()?.to_u32();
    data.resolve_offset(offset)
        .and_then(|data| ColorLine::read(data, is_var))
}

fn read_fwords<const N: usize>(cursor: &mut Cursor) -> Result<[FWord; N], ReadError> {
    let mut values = [FWord::new(0); N];
    for value in &mut values {
        *value = cursor.read()?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinta_test_data::be_buffer;

    fn no_children(_: usize) -> PaintId {
        panic!("unexpected child paint")
    }

    fn read_paint(bytes: &[u8]) -> Result<Paint, ReadError> {
        Paint::read(FontData::new(bytes), 0, &mut no_children)
    }

    #[test]
    fn composite_mode_from_raw() {
        assert_eq!(CompositeMode::from(3), CompositeMode::SrcOver);
        assert_eq!(CompositeMode::from(27), CompositeMode::HslLuminosity);
        assert_eq!(CompositeMode::from(28), CompositeMode::Unknown);
        assert_eq!(CompositeMode::default(), CompositeMode::SrcOver);
    }

    #[test]
    fn solid() {
        let data = be_buffer!(2u8, 5u16, F2Dot14::from_f32(0.5));
        assert_eq!(
            read_paint(&data).unwrap(),
            Paint::Solid {
                palette_index: 5,
                alpha: F2Dot14::from_f32(0.5)
            }
        );
        let data = be_buffer!(3u8, 5u16, F2Dot14::ONE, 7u32);
        let paint = read_paint(&data).unwrap();
        assert_eq!(paint.format(), 3);
        assert!(matches!(paint, Paint::VarSolid { var_index_base: 7, .. }));
    }

    #[test]
    fn linear_gradient_color_line_is_paint_relative() {
        let data = be_buffer!(
            4u8,
            Uint24::new(16),
            FWord::new(0),
            FWord::new(0),
            FWord::new(100),
            FWord::new(0),
            FWord::new(0),
            FWord::new(100),
            // color line
            1u8,
            2u16,
            F2Dot14::ZERO,
            1u16,
            F2Dot14::ONE,
            F2Dot14::ONE,
            2u16,
            F2Dot14::ONE
        );
        let paint = read_paint(&data).unwrap();
        let Paint::LinearGradient { color_line, x1, .. } = paint else {
            panic!("expected linear gradient, got {paint:?}");
        };
        assert_eq!(x1, FWord::new(100));
        assert_eq!(color_line.extend, Extend::Repeat);
        assert_eq!(color_line.color_stops.len(), 2);
        assert_eq!(color_line.color_stops[1].palette_index, 2);
        assert_eq!(color_line.color_stops[1].var_index_base, NO_VARIATION_INDEX);
    }

    #[test]
    fn children_resolve_against_paint_start() {
        // a paint at byte 3 of its table; child offsets are relative to it
        let table = be_buffer!(0u8, 0u8, 0u8, 10u8, Uint24::new(6), 9u16);
        let mut seen = Vec::new();
        let paint = Paint::read(FontData::new(&table), 3, &mut |offset| {
            seen.push(offset);
            PaintId::new(0)
        })
        .unwrap();
        assert_eq!(seen, vec![9]);
        assert_eq!(
            paint,
            Paint::Glyph {
                paint: PaintId::new(0),
                glyph_id: GlyphId16::new(9)
            }
        );
    }

    #[test]
    fn null_child_offset() {
        let data = be_buffer!(14u8, Uint24::new(0), FWord::new(1), FWord::new(2));
        assert_eq!(read_paint(&data), Err(ReadError::NullOffset));
    }

    #[test]
    fn unknown_format() {
        let data = be_buffer!(33u8, 0u32);
        assert_eq!(read_paint(&data), Err(ReadError::InvalidFormat(33)));
    }
}
