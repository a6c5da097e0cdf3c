//! raw font bytes

use std::ops::RangeBounds;

use font_types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for reading a sequence of values from [`FontData`].
///
/// Every read advances the cursor, whether or not it succeeds, so a
/// failed read leaves the cursor past the end of the requested value.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the data starting at `pos`, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Resolves a non-null offset relative to the start of this data.
    pub fn resolve_offset(&self, offset: u32) -> Result<FontData<'a>, ReadError> {
        if offset == 0 {
            return Err(ReadError::NullOffset);
        }
        self.split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Resolves an offset that may be null.
    ///
    /// Returns `Ok(None)` for a null offset.
    pub fn resolve_nullable_offset(&self, offset: u32) -> Result<Option<FontData<'a>>, ReadError> {
        match offset {
            0 => Ok(None),
            _ => self.resolve_offset(offset).map(Some),
        }
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset.checked_add(T::RAW_BYTE_LEN).ok_or(ReadError::OutOfBounds)?)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Reads `len` consecutive scalars starting at `offset`.
    pub fn read_array<T: Scalar>(&self, offset: usize, len: usize) -> Result<Vec<T>, ReadError> {
        let byte_len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::InvalidArrayLen)?;
        let end = offset.checked_add(byte_len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.bytes.get(offset..end).ok_or(ReadError::OutOfBounds)?;
        bytes
            .chunks_exact(T::RAW_BYTE_LEN)
            .map(|chunk| T::read(chunk).ok_or(ReadError::OutOfBounds))
            .collect()
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    pub fn read_array<T: Scalar>(&mut self, len: usize) -> Result<Vec<T>, ReadError> {
        let temp = self.data.read_array(self.pos, len);
        self.advance_by(len.saturating_mul(T::RAW_BYTE_LEN));
        temp
    }

    /// The current position, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    // used when handling fields with an implicit length, which must be at the
    // end of a table.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The unread portion of the underlying data.
    pub fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use font_types::{F2Dot14, Uint24};

    use super::*;

    #[test]
    fn read_scalars() {
        static BYTES: &[u8] = &[0x00, 0x01, 0xFF, 0xFE, 0x40, 0x00, 0x00, 0x12, 0x34];
        let data = FontData::new(BYTES);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        assert_eq!(data.read_at::<i16>(2).unwrap(), -2);
        assert_eq!(data.read_at::<F2Dot14>(4).unwrap(), F2Dot14::ONE);
        assert_eq!(data.read_at::<Uint24>(6).unwrap().to_u32(), 0x1234);
        assert!(matches!(
            data.read_at::<u32>(6),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn cursor_advances_past_failed_reads() {
        let data = FontData::new(&[0, 5, 0, 6, 7]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 5);
        assert_eq!(cursor.read_array::<u16>(1).unwrap(), vec![6]);
        assert_eq!(cursor.remaining_bytes(), 1);
        assert!(cursor.read::<u16>().is_err());
        assert_eq!(cursor.remaining_bytes(), 0);
    }

    #[test]
    fn offsets() {
        let data = FontData::new(&[0, 1, 2, 3]);
        assert!(matches!(data.resolve_offset(0), Err(ReadError::NullOffset)));
        assert!(data.resolve_nullable_offset(0).unwrap().is_none());
        assert_eq!(data.resolve_offset(2).unwrap().as_bytes(), &[2, 3]);
        assert!(matches!(data.resolve_offset(9), Err(ReadError::OutOfBounds)));
    }
}
