//! RPC node config migrations.
//!
//! v7 to v8 moves the consensus connection settings from the root level into
//! `[synchronization.ws]` and creates `[chain_state_assembler]`. v8 to v9
//! moves the three certificate paths into `[synchronization.ws.certificates]`
//! under shorter names.

use super::{forbid_table, require_table, take_value, table_label};
use crate::document::{ConfigDocument, Path};
use crate::migration::{MigrationError, MigrationPathSet, MigrationStep, StepContext};
use crate::value::{Table, Value};
use once_cell::sync::Lazy;

/// Root-level keys that v8 expects under `[synchronization.ws]`.
pub const SYNC_WS_KEYS: [&str; 4] = [
    "consensus_rpc",
    "consensus_client_cert_path",
    "consensus_client_private_key_path",
    "consensus_root_ca_cert_path",
];

/// v8 `[synchronization.ws]` keys and their v9 names in `[synchronization.ws.certificates]`.
pub const CERTIFICATE_RENAMES: [(&str, &str); 3] = [
    ("consensus_client_cert_path", "cert_path"),
    ("consensus_client_private_key_path", "private_key_path"),
    ("consensus_root_ca_cert_path", "root_ca_cert_path"),
];

pub const SYNC_RETRY_INTERVAL_KEY: &str = "sync_retry_interval_in_secs";
pub const SYNC_RETRY_INTERVAL_SECS: i64 = 1;
pub const CERTIFIED_BLOCK_CACHE_BUCKET_SIZE: i64 = 50;

pub const V7_V8: &[MigrationStep] = &[MigrationStep::in_place("migrate_v7_to_v8", migrate_v7_to_v8)];
pub const V8_V9: &[MigrationStep] = &[MigrationStep::in_place("migrate_v8_to_v9", migrate_v8_to_v9)];

static PATHS: Lazy<MigrationPathSet> = Lazy::new(|| {
    let mut set = MigrationPathSet::new();
    set.register("v7-v8", V7_V8.to_vec())
        .register("v8-v9", V8_V9.to_vec())
        .register_composed("v7-v9", &[V7_V8, V8_V9]);
    set
});

/// Returns the RPC config migration paths.
pub fn paths() -> &'static MigrationPathSet {
    &PATHS
}

fn migrate_v7_to_v8(doc: &mut ConfigDocument, ctx: &mut StepContext<'_>) -> Result<(), MigrationError> {
    migrate_sync_ws(doc, ctx)?;
    migrate_chain_state_assembler(doc, ctx)?;

    doc.set(&Path::from("consensus_access_tokens"), Value::List(Vec::new()))?;
    ctx.check("Adding `consensus_access_tokens = []` to root level")?;

    doc.set(&Path::from("block_provider_is_trusted"), true)?;
    ctx.check("Adding `block_provider_is_trusted = true` to root level")?;
    Ok(())
}

fn migrate_sync_ws(doc: &mut ConfigDocument, ctx: &mut StepContext<'_>) -> Result<(), MigrationError> {
    forbid_table(doc, "synchronization", "v7")?;

    let root = Path::new();
    let ws = Path::parse("synchronization.ws");
    let mut moved = Table::new();
    for key in SYNC_WS_KEYS {
        if let Some(value) = take_value(doc, &root, key, ctx)? {
            ctx.check(format_args!("Moving `{}` from root level to {}", key, table_label(&ws)))?;
            moved.set(key, value);
        }
    }
    doc.set(&ws, moved)?;
    Ok(())
}

fn migrate_chain_state_assembler(doc: &mut ConfigDocument, ctx: &mut StepContext<'_>) -> Result<(), MigrationError> {
    forbid_table(doc, "chain_state_assembler", "v7")?;

    let assembler = Path::from("chain_state_assembler");
    if let Some(value) = take_value(doc, &Path::new(), SYNC_RETRY_INTERVAL_KEY, ctx)? {
        ctx.check(format_args!(
            "Moving `{}` from root level to {}",
            SYNC_RETRY_INTERVAL_KEY,
            table_label(&assembler)
        ))?;
        if value.as_int() != Some(SYNC_RETRY_INTERVAL_SECS) {
            ctx.warn(format!(
                "`{} = {}`, will be set to `{}` as recommended",
                SYNC_RETRY_INTERVAL_KEY, value, SYNC_RETRY_INTERVAL_SECS
            ))?;
        }
    }

    let mut table = Table::new();
    table.set(SYNC_RETRY_INTERVAL_KEY, SYNC_RETRY_INTERVAL_SECS);
    table.set("certified_block_cache_bucket_size", CERTIFIED_BLOCK_CACHE_BUCKET_SIZE);
    doc.set(&assembler, table)?;
    ctx.check(format_args!(
        "Adding `certified_block_cache_bucket_size = {}` to {}",
        CERTIFIED_BLOCK_CACHE_BUCKET_SIZE,
        table_label(&assembler)
    ))?;
    Ok(())
}

fn migrate_v8_to_v9(doc: &mut ConfigDocument, ctx: &mut StepContext<'_>) -> Result<(), MigrationError> {
    require_table(doc, "synchronization", "v8")?;
    require_table(doc, "synchronization.ws", "v8")?;
    forbid_table(doc, "synchronization.ws.certificates", "v8")?;

    let ws = Path::parse("synchronization.ws");
    let certificates = ws.child("certificates");
    let mut moved = Table::new();
    for (key, new_key) in CERTIFICATE_RENAMES {
        if let Some(value) = take_value(doc, &ws, key, ctx)? {
            ctx.check(format_args!(
                "Moving `{}` from {} to {} as `{}`",
                key,
                table_label(&ws),
                table_label(&certificates),
                new_key
            ))?;
            moved.set(new_key, value);
        }
    }
    doc.set(&certificates, moved)?;
    Ok(())
}
