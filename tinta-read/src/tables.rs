//! The decoded font tables.
//!
//! Each submodule decodes one table (or, for [`variations`], the structures
//! shared between several tables).

pub mod avar;
pub mod colr;
pub mod fvar;
pub mod gvar;
pub mod hvar;
pub mod variations;
