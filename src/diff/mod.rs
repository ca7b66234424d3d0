//! Diff module - Line-oriented unified diffs between serialized documents.
//!
//! Computation ([`unified_diff`]) and presentation ([`DiffRenderer`]) are kept
//! apart so the same annotated lines can be printed plain or colored.

mod render;
mod unified;

pub use render::*;
pub use unified::*;
