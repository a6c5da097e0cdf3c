//! Resolving variations and color glyphs in OpenType fonts.
//!
//! Tinta sits on top of the table decoding in
//! [`tinta-read`](tinta_read) and turns decoded data into concrete values:
//!
//! * user space axis settings become [normalized locations](Location)
//!   through the [`AxisCollection`], including `avar` remapping;
//! * delta set indices become blended deltas through a
//!   [`VariationInstance`](store::VariationInstance), which caches the
//!   per-region scalars for one location;
//! * glyph metrics and outline points receive their variation deltas
//!   ([`metrics`], [`outline`]);
//! * `COLR` paint graphs are flattened into glyph-bound, transformed layers
//!   ([`color`]).
//!
//! Every table is decoded once and then shared; the results of a query are
//! owned by the caller.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Expose our "raw" underlying parser crate.
pub extern crate tinta_read as raw;

pub mod color;
pub mod metrics;
pub mod outline;
pub mod store;

mod decycler;
mod instance;
mod setting;
mod variation;

#[cfg(test)]
mod testing;

pub use instance::{Location, LocationRef, NormalizedCoord};
pub use setting::{Setting, VariationSetting};
pub use variation::{Axis, AxisCollection, NamedInstance};

/// Type for a glyph identifier.
pub type GlyphId = tinta_read::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables and other resources.
pub type Tag = tinta_read::types::Tag;
