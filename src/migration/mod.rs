//! Migration module - Named version-to-version paths and the driver that runs them.
//!
//! A [`MigrationPathSet`] maps path keys such as `v7-v9` to ordered
//! [`MigrationStep`]s. [`Migration`] resolves a key, runs the steps over a
//! loaded document, then writes the backup, the result and a diff report.

mod error;
mod migrate;
mod options;
mod registry;
mod step;

#[cfg(test)]
mod migrate_test;

pub use error::*;
pub use migrate::*;
pub use options::*;
pub use registry::*;
pub use step::*;
