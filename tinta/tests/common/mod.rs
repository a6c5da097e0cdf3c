//! An in-memory font assembled from test tables.

use tinta::{
    raw::{FontData, TableProvider},
    Tag,
};

#[derive(Default)]
pub struct Font<'a> {
    tables: Vec<(Tag, &'a [u8])>,
}

impl<'a> Font<'a> {
    pub fn with_table(mut self, tag: Tag, data: &'a [u8]) -> Self {
        self.tables.push((tag, data));
        self
    }
}

impl<'a> TableProvider<'a> for Font<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.tables
            .iter()
            .find(|(table_tag, _)| *table_tag == tag)
            .map(|(_, data)| FontData::new(data))
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
