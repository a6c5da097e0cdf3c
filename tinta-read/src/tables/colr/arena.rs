//! Storage for the decoded paint graph.

use std::collections::HashMap;

use super::paint::Paint;
use crate::{FontData, ReadError};

/// Identifier of a paint in a [`PaintArena`].
///
/// Paints are deduplicated by their offset in the COLR table, so two
/// references to the same bytes always produce the same id. This makes the
/// id suitable for detecting cycles in the paint graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaintId(u32);

impl PaintId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Every paint reachable from a COLR table, decoded once.
///
/// A paint that could not be decoded (unknown format, truncated data) is
/// kept as an error so that only the glyphs referencing it are affected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintArena {
    paints: Vec<Result<Paint, ReadError>>,
    offsets: Vec<usize>,
}

impl PaintArena {
    /// Returns the paint with the given id.
    pub fn get(&self, id: PaintId) -> Option<&Result<Paint, ReadError>> {
        self.paints.get(id.index())
    }

    /// The offset of the paint from the start of the COLR table.
    pub fn offset(&self, id: PaintId) -> Option<usize> {
        self.offsets.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.paints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paints.is_empty()
    }

    /// Iterates over all paints along with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (PaintId, &Result<Paint, ReadError>)> + '_ {
        self.paints
            .iter()
            .enumerate()
            .map(|(ix, paint)| (PaintId::new(ix as u32), paint))
    }
}

/// Builds a [`PaintArena`] from a set of root offsets.
///
/// Decoding uses an explicit work list rather than recursion, and every
/// offset is decoded at most once, so cyclic or deeply nested graphs are
/// decoded in bounded stack space.
pub(crate) struct PaintArenaBuilder<'a> {
    table: FontData<'a>,
    ids: HashMap<usize, PaintId>,
    offsets: Vec<usize>,
    pending: Vec<PaintId>,
}

impl<'a> PaintArenaBuilder<'a> {
    pub(crate) fn new(table: FontData<'a>) -> Self {
        Self {
            table,
            ids: HashMap::new(),
            offsets: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Returns the id for the paint at `offset` in the table, scheduling it
    /// for decoding if it has not been seen before.
    pub(crate) fn intern(&mut self, offset: usize) -> PaintId {
        if let Some(id) = self.ids.get(&offset) {
            return *id;
        }
        let id = PaintId::new(self.offsets.len() as u32);
        self.ids.insert(offset, id);
        self.offsets.push(offset);
        self.pending.push(id);
        id
    }

    pub(crate) fn build(mut self) -> PaintArena {
        let mut decoded: Vec<Option<Result<Paint, ReadError>>> = Vec::new();
        while let Some(id) = self.pending.pop() {
            let offset = self.offsets[id.index()];
            let table = self.table;
            let paint = Paint::read(table, offset, &mut |child| self.intern(child));
            if let Err(e) = &paint {
                log::warn!("skipping unreadable paint at offset {offset}: {e}");
            }
            decoded.resize_with(self.offsets.len(), || None);
            decoded[id.index()] = Some(paint);
        }
        let paints: Vec<_> = decoded
            .into_iter()
            .map(|paint| paint.unwrap_or(Err(ReadError::OutOfBounds)))
            .collect();
        log::debug!("decoded {} COLR paints", paints.len());
        PaintArena {
            paints,
            offsets: self.offsets,
        }
    }
}
