//! Value module - In-memory representation of TOML configuration entries.
//!
//! Scalars, lists and insertion-ordered tables, plus the conversion to and
//! from the `toml` crate's representation.

mod value;

pub use value::*;
