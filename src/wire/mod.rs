//! Low-level byte handling shared by every binary codec in the crate.
//!
//! - [`io`] - little-endian fixed-width reads/writes and compressed unsigned integers
//! - [`parser`] - the cursor [`parser::Parser`] used by all decoders

pub mod io;
pub mod parser;
