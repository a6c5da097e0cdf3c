//! a trait for things that can serve font tables

use font_types::Tag;

use crate::{tables, FontData, FontRead, ReadError};

/// An interface for accessing tables from a font (or font-like object)
///
/// The table directory itself lives outside this crate; implementors only
/// need to hand out the raw bytes for a tag.
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    fn fvar(&self) -> Result<tables::fvar::Fvar, ReadError> {
        self.expect_data_for_tag(tables::fvar::TAG)
            .and_then(FontRead::read)
    }

    fn avar(&self) -> Result<tables::avar::Avar, ReadError> {
        self.expect_data_for_tag(tables::avar::TAG)
            .and_then(FontRead::read)
    }

    fn hvar(&self) -> Result<tables::hvar::Hvar, ReadError> {
        self.expect_data_for_tag(tables::hvar::HVAR_TAG)
            .and_then(FontRead::read)
    }

    fn vvar(&self) -> Result<tables::hvar::Vvar, ReadError> {
        self.expect_data_for_tag(tables::hvar::VVAR_TAG)
            .and_then(FontRead::read)
    }

    fn gvar(&self) -> Result<tables::gvar::Gvar<'a>, ReadError> {
        self.expect_data_for_tag(tables::gvar::TAG)
            .and_then(FontRead::read)
    }

    fn colr(&self) -> Result<tables::colr::Colr, ReadError> {
        self.expect_data_for_tag(tables::colr::TAG)
            .and_then(FontRead::read)
    }
}
