//! # Node Config Migrate
//!
//! Schema-version migration for distributed-node TOML configuration files.
//!
//! A migration path such as `v7-v9` is an ordered list of hand-written steps.
//! The orchestrator loads the source file, runs the steps over a working
//! document, saves a backup, writes the result and prints a unified diff of
//! everything that changed. Steps that rebuild a config from a version's
//! default template reconcile the user's old values against the new defaults,
//! asking before replacing any of them.
//!
//! ## Modules
//!
//! - [`value`] - TOML values and ordered tables
//! - [`document`] - Parsed config files with path-based access
//! - [`diff`] - Line-based unified diffs and their rendering
//! - [`reconcile`] - Keep-or-replace decisions against recommended defaults
//! - [`migration`] - Steps, path registry and the migration orchestrator
//! - [`templates`] - Bundled default configs for target versions
//! - [`families`] - Per-family migration steps and path tables

pub mod diff;
pub mod document;
pub mod families;
pub mod migration;
pub mod reconcile;
pub mod templates;
pub mod value;

pub use diff::{unified_diff, DiffLine, DiffLineKind, UnifiedDiff};
pub use document::{ConfigDocument, DocumentError, Path, PathElement};
pub use families::ConfigFamily;
pub use migration::{
    Migration, MigrationError, MigrationOptions, MigrationOutcome, MigrationPathSet, MigrationReport,
    MigrationStep, StepContext,
};
pub use reconcile::{AssumeYes, Prompter, ResolvePolicy, Scanner};
pub use value::{Table, Value};
