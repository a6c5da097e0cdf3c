//! Decoding OpenType variation and color tables
//!
//! This crate decodes the tables that describe a variable font's design
//! space (`fvar`, `avar`), the shared [item variation store] used by metric
//! and color variations (`HVAR`, `VVAR`, `COLR`), glyph outline variations
//! (`gvar`) and the [`COLR`] paint graph.
//!
//! Unlike a zero-copy reader, most tables here are decoded eagerly into
//! owned, immutable structures: a font is decoded once and then queried
//! concurrently by many rendering threads. The paint graph in particular is
//! decoded into an arena keyed by the byte offset of each paint, so that
//! subtrees shared between glyphs are decoded exactly once.
//!
//! Interpreting the decoded data (normalizing user coordinates, blending
//! deltas, flattening paint graphs) is the job of the `tinta` crate.
//!
//! [item variation store]: https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store
//! [`COLR`]: https://learn.microsoft.com/en-us/typography/opentype/spec/colr

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod table_provider;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError};
pub use table_provider::TableProvider;

/// Public re-export of the font-types crate.
pub extern crate font_types as types;
