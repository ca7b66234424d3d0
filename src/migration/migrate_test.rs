//! End-to-end tests for the migration orchestrator.

#[cfg(test)]
mod tests {
    use crate::document::{ConfigDocument, DocumentError};
    use crate::families::ConfigFamily;
    use crate::migration::{backup_path, Migration, MigrationError, MigrationOptions, MigrationOutcome};
    use crate::reconcile::AssumeYes;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const RPC_V7: &str = r#"# rpc node config
bind_addr = "0.0.0.0:26000"
consensus_rpc = "x"
consensus_client_cert_path = "a"
consensus_client_private_key_path = "b"
consensus_root_ca_cert_path = "c"
"#;

    fn options() -> MigrationOptions {
        MigrationOptions::builder().assume_yes(true).color(false).build()
    }

    fn write_source(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    /// Runs one migration with auto-accept and returns the result and the
    /// captured output.
    fn migrate(
        family: ConfigFamily,
        key: &str,
        from: &Path,
        to: &Path,
    ) -> (Result<MigrationOutcome, MigrationError>, String) {
        let mut out = Vec::new();
        let result = Migration::new(family.paths(), options())
            .with_policy(AssumeYes)
            .with_output(&mut out)
            .migrate(key, from, to);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_rpc_v7_to_v8_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let from = write_source(&dir, "config.toml", RPC_V7);
        let to = dir.path().join("config_v8.toml");

        let (result, output) = migrate(ConfigFamily::Rpc, "v7-v8", &from, &to);
        let outcome = result.unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.from_version, "v7");
        assert_eq!(report.to_version, "v8");
        assert_eq!(report.destination, to);

        let migrated = ConfigDocument::parse(&fs::read_to_string(&to).unwrap()).unwrap();
        let expected = ConfigDocument::parse(
            r#"
bind_addr = "0.0.0.0:26000"
consensus_access_tokens = []
block_provider_is_trusted = true

[synchronization.ws]
consensus_rpc = "x"
consensus_client_cert_path = "a"
consensus_client_private_key_path = "b"
consensus_root_ca_cert_path = "c"

[chain_state_assembler]
sync_retry_interval_in_secs = 1
certified_block_cache_bucket_size = 50
"#,
        )
        .unwrap();
        assert_eq!(migrated, expected);

        assert!(output.contains("Running migration step: migrate_v7_to_v8\n"));
        assert!(output.contains("|----------------- Begin diff v7 vs v8 -----------------|"));
        assert!(output.contains("\n+[synchronization.ws]\n"));
        assert!(output.contains("\n consensus_rpc = \"x\"\n"));
        assert!(output.contains("The following items need manual review:"));
        assert!(!report.diff.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_backup_keeps_source_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let from = write_source(&dir, "config.toml", RPC_V7);
        let to = dir.path().join("out.toml");

        let (result, output) = migrate(ConfigFamily::Rpc, "v7-v9", &from, &to);
        let report = result.unwrap().report().cloned().unwrap();

        assert_eq!(report.backup_path, dir.path().join("config.toml_v7.bak"));
        assert_eq!(report.backup_path, backup_path(&from, "v7"));
        // Comments survive in the backup even though the output drops them.
        assert_eq!(fs::read_to_string(&report.backup_path).unwrap(), RPC_V7);
        assert!(!fs::read_to_string(&to).unwrap().contains("# rpc node config"));
        assert!(output.contains(&format!("Backing up old config to {}", report.backup_path.display())));
    }

    #[test]
    fn test_precondition_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{}\n[synchronization]\nx = 1\n", RPC_V7);
        let from = write_source(&dir, "config.toml", &text);
        let to = dir.path().join("out.toml");

        let (result, _) = migrate(ConfigFamily::Rpc, "v7-v8", &from, &to);
        assert!(result.unwrap_err().is_schema_precondition());
        assert!(!to.exists());
        assert!(!backup_path(&from, "v7").exists());
        assert_eq!(fs::read_to_string(&from).unwrap(), text);
    }

    #[test]
    fn test_same_path_rerun_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "config.toml", RPC_V7);
        let backup = backup_path(&path, "v7");

        let (result, output) = migrate(ConfigFamily::Rpc, "v7-v8", &path, &path);
        assert!(!result.unwrap().is_aborted());
        assert!(output.contains("This will overwrite your original config file. Continue? (assuming yes)"));
        let first_dest = fs::read_to_string(&path).unwrap();
        let first_backup = fs::read_to_string(&backup).unwrap();

        fs::write(&path, RPC_V7).unwrap();
        let (result, _) = migrate(ConfigFamily::Rpc, "v7-v8", &path, &path);
        result.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first_dest);
        assert_eq!(fs::read_to_string(&backup).unwrap(), first_backup);
    }

    #[test]
    fn test_declined_overwrite_aborts_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "config.toml", RPC_V7);

        let mut out = Vec::new();
        let outcome = Migration::new(ConfigFamily::Rpc.paths(), options())
            .with_policy(|_: &str| false)
            .with_output(&mut out)
            .migrate("v7-v8", &path, &path)
            .unwrap();

        assert!(outcome.is_aborted());
        assert_eq!(fs::read_to_string(&path).unwrap(), RPC_V7);
        assert!(!backup_path(&path, "v7").exists());
        assert!(String::from_utf8(out).unwrap().ends_with("Aborted by user.\n"));
    }

    #[test]
    fn test_unknown_path() {
        let dir = tempfile::tempdir().unwrap();
        let from = write_source(&dir, "config.toml", RPC_V7);
        let to = dir.path().join("out.toml");

        let (result, output) = migrate(ConfigFamily::Rpc, "v6-v7", &from, &to);
        match result.unwrap_err() {
            MigrationError::UnknownPath { key, choices } => {
                assert_eq!(key, "v6-v7");
                assert_eq!(choices, "v7-v8, v8-v9, v7-v9");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(output.is_empty());
        assert!(!to.exists());
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let from = write_source(&dir, "config.toml", "consensus_rpc = \n");
        let to = dir.path().join("out.toml");

        let (result, _) = migrate(ConfigFamily::Rpc, "v7-v8", &from, &to);
        assert!(matches!(
            result,
            Err(MigrationError::Document(DocumentError::Parse { .. }))
        ));
        assert!(!to.exists());
    }

    #[test]
    fn test_missing_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("absent.toml");
        let to = dir.path().join("out.toml");

        let (result, _) = migrate(ConfigFamily::Rpc, "v7-v8", &from, &to);
        match result.unwrap_err() {
            MigrationError::Io { path, .. } => assert_eq!(path, from),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_smr_template_step_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let from = write_source(
            &dir,
            "smr_settings.toml",
            r#"
[node]
rpc_access_port = 27000
root_ca_cert_path = "./certs/ca.pem"
server_cert_path = "./certs/server.pem"
server_private_key_path = "./certs/server_key.pem"

[node.database_setup.dbs.chain_store.rocks_db]
path = "./data/smr"

[node.database_setup.dbs.ledger.rocks_db]
path = "./data/ledger"

[mempool]
max_batch_delay_ms = 1000

[moonshot]
timeout_delay_ms = 5000
"#,
        );
        let to = dir.path().join("smr_settings_v9.toml");

        let (result, output) = migrate(ConfigFamily::Smr, "v7-v9", &from, &to);
        let report = result.unwrap().report().cloned().unwrap();
        assert_eq!(report.to_version, "v9");
        assert!(report.warnings.is_empty());
        assert!(output.contains("Running migration step: migrate_v7_to_v9\n"));
        assert!(output.contains("Do you want to apply the recommended config: `max_batch_delay_ms = 1500`? (assuming yes)"));

        let migrated = fs::read_to_string(&to).unwrap();
        assert!(migrated.contains("cert_path = \"./certs/server.pem\""));
        assert!(migrated.contains("max_batch_delay_ms = 1500"));
    }
}
