//! The [Font Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table

use font_types::{Fixed, NameId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'fvar'
pub const TAG: Tag = Tag::new(b"fvar");

// added to the numerator and denominator of every normalization division,
// so that degenerate axes (min == default or default == max) stay finite.
const NORMALIZE_EPSILON: f64 = 1.0 / 65536.0;

/// The [fvar](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fvar {
    axes: Vec<VariationAxisRecord>,
    instances: Vec<InstanceRecord>,
}

impl Fvar {
    /// Returns the variation axis records, in font order.
    pub fn axes(&self) -> &[VariationAxisRecord] {
        &self.axes
    }

    /// Returns the named instance records.
    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn axis_count(&self) -> u16 {
        self.axes.len() as u16
    }

    pub fn instance_count(&self) -> u16 {
        self.instances.len() as u16
    }
}

/// The [VariationAxisRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#variationaxisrecord)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariationAxisRecord {
    axis_tag: Tag,
    min_value: Fixed,
    default_value: Fixed,
    max_value: Fixed,
    flags: u16,
    axis_name_id: NameId,
}

impl VariationAxisRecord {
    /// Tag identifying the design variation for the axis.
    pub fn axis_tag(&self) -> Tag {
        self.axis_tag
    }

    /// The minimum coordinate value for the axis.
    pub fn min_value(&self) -> Fixed {
        self.min_value
    }

    /// The default coordinate value for the axis.
    pub fn default_value(&self) -> Fixed {
        self.default_value
    }

    /// The maximum coordinate value for the axis.
    pub fn max_value(&self) -> Fixed {
        self.max_value
    }

    /// Axis qualifiers. Bit 0 marks an axis that should be hidden from users.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// The name ID for entries in the 'name' table that provide a display
    /// name for this axis.
    pub fn axis_name_id(&self) -> NameId {
        self.axis_name_id
    }

    /// Returns a normalized coordinate for the given user space value.
    ///
    /// The value is clamped to the axis range before normalization and the
    /// result is always in the range [-1, 1].
    pub fn normalize(&self, value: f32) -> f32 {
        use core::cmp::Ordering::*;
        let min = self.min_value.to_f64();
        let default = self.default_value.to_f64();
        let max = self.max_value.to_f64();
        let value = (value as f64).clamp(min, max);
        let normalized = match value.partial_cmp(&default) {
            Some(Less) => {
                -((default - value + NORMALIZE_EPSILON) / (default - min + NORMALIZE_EPSILON))
            }
            Some(Greater) => {
                (value - default + NORMALIZE_EPSILON) / (max - default + NORMALIZE_EPSILON)
            }
            _ => 0.0,
        };
        normalized.clamp(-1.0, 1.0) as f32
    }

    fn read(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let record = VariationAxisRecord {
            axis_tag: cursor.read()?,
            min_value: cursor.read()?,
            default_value: cursor.read()?,
            max_value: cursor.read()?,
            flags: cursor.read()?,
            axis_name_id: cursor.read()?,
        };
        if record.min_value > record.default_value || record.default_value > record.max_value {
            return Err(ReadError::MalformedData(
                "axis default value outside of [min, max]",
            ));
        }
        Ok(record)
    }
}

/// The [InstanceRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#instancerecord)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceRecord {
    /// The name ID for entries in the 'name' table that provide subfamily
    /// names for this instance.
    pub subfamily_name_id: NameId,
    /// Reserved for future use, set to 0.
    pub flags: u16,
    /// The coordinates array for this instance, in user space.
    pub coordinates: Vec<Fixed>,
    /// Optional. The name ID for entries in the 'name' table that provide
    /// PostScript names for this instance.
    pub post_script_name_id: Option<NameId>,
}

impl InstanceRecord {
    fn read(data: FontData, axis_count: u16, instance_size: u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let subfamily_name_id = cursor.read()?;
        let flags = cursor.read()?;
        let coordinates = cursor.read_array(axis_count as usize)?;
        // the record only contains the postscript name id if there is room
        // for it in each record
        let post_script_name_id = if instance_size as u32 >= axis_count as u32 * 4 + 6 {
            Some(cursor.read::<NameId>()?).filter(|id| id.to_u16() != 0xFFFF)
        } else {
            None
        };
        Ok(InstanceRecord {
            subfamily_name_id,
            flags,
            coordinates,
            post_script_name_id,
        })
    }
}

impl<'a> FontRead<'a> for Fvar {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidVersion(major_version));
        }
        let _minor_version: u16 = cursor.read()?;
        let axes_offset: u16 = cursor.read()?;
        cursor.advance::<u16>();
        let axis_count: u16 = cursor.read()?;
        let axis_size: u16 = cursor.read()?;
        let instance_count: u16 = cursor.read()?;
        let instance_size: u16 = cursor.read()?;
        if axis_size < 20 || instance_size < axis_count.saturating_mul(4).saturating_add(4) {
            return Err(ReadError::InvalidArrayLen);
        }
        let axis_data = data.resolve_offset(axes_offset as u32)?;
        let axes = (0..axis_count as usize)
            .map(|i| {
                axis_data
                    .split_off(i * axis_size as usize)
                    .ok_or(ReadError::OutOfBounds)
                    .and_then(VariationAxisRecord::read)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let instance_start = axis_count as usize * axis_size as usize;
        let instances = (0..instance_count as usize)
            .map(|i| {
                axis_data
                    .split_off(instance_start + i * instance_size as usize)
                    .ok_or(ReadError::OutOfBounds)
                    .and_then(|data| InstanceRecord::read(data, axis_count, instance_size))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "fvar: {} axes, {} named instances",
            axes.len(),
            instances.len()
        );
        Ok(Fvar { axes, instances })
    }
}
