//! test data shared between the tinta crates.
//!
//! Everything here is assembled by hand with [`BeBuffer`](bebuffer::BeBuffer),
//! so each blob documents its own layout.

pub mod bebuffer;
pub mod colr;
pub mod gvar;
pub mod variations;
