//! Reconcile module - Keep-or-replace decisions between a user's values and
//! a new version's recommended defaults.
//!
//! The decision itself is delegated to a [`ResolvePolicy`], so the same
//! [`Scanner`] runs interactively, fully automatic, or scripted in tests.

mod policy;
mod scanner;

pub use policy::*;
pub use scanner::*;
