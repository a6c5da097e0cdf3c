//! A minimal in-memory font for unit tests.

use tinta_read::{FontData, TableProvider};

use crate::Tag;

/// Serves table data from a list of `(tag, bytes)` pairs.
#[derive(Default)]
pub(crate) struct TestFont<'a> {
    tables: Vec<(Tag, &'a [u8])>,
}

impl<'a> TestFont<'a> {
    pub fn with_table(mut self, tag: Tag, data: &'a [u8]) -> Self {
        self.tables.push((tag, data));
        self
    }
}

impl<'a> TableProvider<'a> for TestFont<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.tables
            .iter()
            .find(|(table_tag, _)| *table_tag == tag)
            .map(|(_, data)| FontData::new(data))
    }
}
