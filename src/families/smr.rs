//! Validator node settings migrations.
//!
//! v7 to v9 rebuilds the settings from the bundled v9 template. Site-specific
//! values (ports, certificate and database paths) are copied over, and every
//! other scalar the user had is reconciled against the template's default.

use super::{copy_value, forbid_table, require_table, table_label};
use crate::document::{ConfigDocument, Path};
use crate::migration::{MigrationError, MigrationPathSet, MigrationStep, StepContext};
use crate::templates::{self, TemplateError, SMR_SETTINGS_V9_NAME};
use crate::value::Table;
use once_cell::sync::Lazy;

/// v7 `[node]` certificate keys and their v9 names in `[node.ws_server.certificates]`.
pub const WS_CERTIFICATE_RENAMES: [(&str, &str); 3] = [
    ("root_ca_cert_path", "root_ca_cert_path"),
    ("server_cert_path", "cert_path"),
    ("server_private_key_path", "private_key_path"),
];

const LEDGER: &str = "node.database_setup.dbs.ledger.rocks_db";
const CHAIN_STORE: &str = "node.database_setup.dbs.chain_store.rocks_db";
const SNAPSHOT: &str = "node.database_setup.snapshot_config";
pub(super) const PRUNE: &str = "node.database_setup.prune_config";

pub const V7_V9: &[MigrationStep] = &[MigrationStep::template("migrate_v7_to_v9", migrate_v7_to_v9)];

static PATHS: Lazy<MigrationPathSet> = Lazy::new(|| {
    let mut set = MigrationPathSet::new();
    set.register("v7-v9", V7_V9.to_vec());
    set
});

/// Returns the validator settings migration paths.
pub fn paths() -> &'static MigrationPathSet {
    &PATHS
}

fn migrate_v7_to_v9(source: &ConfigDocument, ctx: &mut StepContext<'_>) -> Result<ConfigDocument, MigrationError> {
    let mut dest = templates::load_document(SMR_SETTINGS_V9_NAME)?;
    migrate_node_root(source, &mut dest, ctx)?;
    migrate_rocks_db(source, &mut dest, LEDGER, "ledger", ctx)?;
    migrate_rocks_db(source, &mut dest, CHAIN_STORE, "chain store", ctx)?;
    migrate_optional(source, &mut dest, SNAPSHOT, "snapshot", Some("path"), ctx)?;
    migrate_optional(source, &mut dest, PRUNE, "prune", None, ctx)?;
    scan_table(source, &mut dest, "mempool", "mempool", ctx)?;
    scan_table(source, &mut dest, "moonshot", "moonshot", ctx)?;
    Ok(dest)
}

fn migrate_node_root(
    source: &ConfigDocument,
    dest: &mut ConfigDocument,
    ctx: &mut StepContext<'_>,
) -> Result<(), MigrationError> {
    require_table(source, "node", "v7")?;
    forbid_table(source, "node.ws_server", "v7")?;

    let node = Path::from("node");
    let certificates = Path::parse("node.ws_server.certificates");
    copy_value(source, &node, "rpc_access_port", dest, &node, "rpc_access_port", ctx)?;
    for (key, new_key) in WS_CERTIFICATE_RENAMES {
        copy_value(source, &node, key, dest, &certificates, new_key, ctx)?;
    }
    scan_table(source, dest, "node", "node root", ctx)
}

fn migrate_rocks_db(
    source: &ConfigDocument,
    dest: &mut ConfigDocument,
    table: &str,
    label: &str,
    ctx: &mut StepContext<'_>,
) -> Result<(), MigrationError> {
    require_table(source, table, "v7")?;
    let path = Path::parse(table);
    template_table(dest, table)?;
    copy_value(source, &path, "path", dest, &path, "path", ctx)?;
    scan_table(source, dest, table, label, ctx)
}

/// Migrates a section the source may omit. An omitted section keeps the
/// template's defaults.
pub(super) fn migrate_optional(
    source: &ConfigDocument,
    dest: &mut ConfigDocument,
    table: &str,
    label: &str,
    copied_key: Option<&str>,
    ctx: &mut StepContext<'_>,
) -> Result<(), MigrationError> {
    let path = Path::parse(table);
    if !source.has_table(&path) {
        ctx.note(format_args!(
            "{} not found in v7 config, using the template defaults",
            table_label(&path)
        ))?;
        return Ok(());
    }
    template_table(dest, table)?;
    if let Some(key) = copied_key {
        copy_value(source, &path, key, dest, &path, key, ctx)?;
    }
    scan_table(source, dest, table, label, ctx)
}

fn scan_table(
    source: &ConfigDocument,
    dest: &mut ConfigDocument,
    table: &str,
    label: &str,
    ctx: &mut StepContext<'_>,
) -> Result<(), MigrationError> {
    let original = require_table(source, table, "v7")?;
    let recommended = template_table(dest, table)?;
    ctx.scan(label, original, recommended)?;
    Ok(())
}

fn template_table<'d>(
    dest: &'d mut ConfigDocument,
    table: &str,
) -> Result<&'d mut Table, MigrationError> {
    dest.get_table_mut(&Path::parse(table))
        .map_err(|_| TemplateError::missing_table(SMR_SETTINGS_V9_NAME, table).into())
}
