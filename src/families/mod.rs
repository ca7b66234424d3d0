//! Config families and their migration steps.
//!
//! A family is one kind of config file with its own version history. Each
//! family module declares its steps as `const` slices and registers its path
//! set once, on first use.

pub mod rpc;
pub mod smr;

#[cfg(test)]
mod smr_test;

use crate::document::{ConfigDocument, Path};
use crate::migration::{MigrationError, MigrationPathSet, StepContext};
use crate::value::{Table, Value};
use std::fmt;

/// ConfigFamily names a kind of config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFamily {
    /// RPC node config.
    Rpc,
    /// Validator node settings.
    Smr,
}

impl ConfigFamily {
    pub const ALL: [ConfigFamily; 2] = [ConfigFamily::Rpc, ConfigFamily::Smr];

    /// Returns the registered migration paths of this family.
    pub fn paths(self) -> &'static MigrationPathSet {
        match self {
            ConfigFamily::Rpc => rpc::paths(),
            ConfigFamily::Smr => smr::paths(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigFamily::Rpc => "rpc config",
            ConfigFamily::Smr => "smr settings",
        }
    }
}

impl fmt::Display for ConfigFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const EMPTY_VALUE_HINT: &str =
    "Your config must be invalid and you should check it manually after migration";

/// Renders a table path the way progress lines name it.
pub(crate) fn table_label(table: &Path) -> String {
    if table.is_empty() {
        "root level".to_string()
    } else {
        format!("[{}]", table)
    }
}

/// Fails if `table` already exists in `doc`.
pub(crate) fn forbid_table(doc: &ConfigDocument, table: &str, version: &str) -> Result<(), MigrationError> {
    if doc.has(&Path::parse(table)) {
        return Err(MigrationError::unexpected_table(table, version));
    }
    Ok(())
}

/// Returns the table at `table`, failing if `doc` lacks it.
pub(crate) fn require_table<'d>(
    doc: &'d ConfigDocument,
    table: &str,
    version: &str,
) -> Result<&'d Table, MigrationError> {
    doc.get_table(&Path::parse(table))
        .map_err(|_| MigrationError::missing_table(table, version))
}

/// Removes `key` from the table at `from` and returns its value.
///
/// A missing key is flagged for manual review and yields `None`. An empty
/// value is returned but flagged as well.
pub(crate) fn take_value(
    doc: &mut ConfigDocument,
    from: &Path,
    key: &str,
    ctx: &mut StepContext<'_>,
) -> Result<Option<Value>, MigrationError> {
    let removed = doc.get_table_mut(from)?.remove(key);
    match removed {
        None => {
            ctx.warn(format!("`{}` not found in {}", key, table_label(from)))?;
            Ok(None)
        }
        Some(value) => {
            if value.is_blank() {
                ctx.warn(format!("`{}` is empty. {}", key, EMPTY_VALUE_HINT))?;
            }
            Ok(Some(value))
        }
    }
}

/// Copies `key` of the source table at `from` into the destination table at
/// `to` as `new_key`.
///
/// When the source lacks the key, the destination key is removed so the
/// template default does not silently stand in for the user's value.
pub(crate) fn copy_value(
    source: &ConfigDocument,
    from: &Path,
    key: &str,
    dest: &mut ConfigDocument,
    to: &Path,
    new_key: &str,
    ctx: &mut StepContext<'_>,
) -> Result<(), MigrationError> {
    match source.get_table(from)?.get(key) {
        Some(value) => {
            if value.is_blank() {
                ctx.warn(format!("`{}` is empty. {}", key, EMPTY_VALUE_HINT))?;
            }
            dest.set(&to.child(new_key), value.clone())?;
            if key == new_key {
                ctx.check(format_args!(
                    "Copying `{}` from {} to {}",
                    key,
                    table_label(from),
                    table_label(to)
                ))?;
            } else {
                ctx.check(format_args!(
                    "Copying `{}` from {} to {} as `{}`",
                    key,
                    table_label(from),
                    table_label(to),
                    new_key
                ))?;
            }
        }
        None => {
            if let Ok(table) = dest.get_table_mut(to) {
                table.remove(new_key);
            }
            ctx.warn(format!(
                "`{}` not found in {}, `{}` in {} is left unset",
                key,
                table_label(from),
                new_key,
                table_label(to)
            ))?;
        }
    }
    Ok(())
}
