//! Document module - Parsed configuration files with path-based access.
//!
//! A [`ConfigDocument`] wraps the root [`crate::value::Table`] of a TOML file and
//! exposes get/set/has/remove addressed by [`Path`], each returning a typed
//! [`DocumentError`] instead of panicking on a missing key or wrong type.

mod document;
mod path;

pub use document::*;
pub use path::*;
