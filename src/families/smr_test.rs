//! Tests for the validator settings migration steps.

#[cfg(test)]
mod tests {
    use crate::document::{ConfigDocument, Path};
    use crate::families::smr::{migrate_optional, paths, PRUNE};
    use crate::migration::{MigrationError, StepContext};
    use crate::templates::{self, TemplateError, SMR_SETTINGS_V9_NAME};
    use crate::reconcile::{AssumeYes, ResolvePolicy};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    const V7: &str = r#"
[node]
rpc_access_port = 27000
root_ca_cert_path = "./certs/ca.pem"
server_cert_path = "./certs/server.pem"
server_private_key_path = "./certs/server_key.pem"
block_recency_bound_in_secs = 0
connection_refresh_timeout_sec = 1
resume = false
test = false

[node.database_setup.dbs.chain_store.rocks_db]
path = "./data/smr_storage"
enable_snapshots = true

[node.database_setup.dbs.ledger.rocks_db]
path = "./data/ledger_storage"

[node.database_setup.snapshot_config]
depth = 2
interval_in_seconds = 1800
path = "./data/snapshot"
retry_count = 3
retry_interval_in_seconds = 5

[node.database_setup.prune_config]
epochs_to_retain = 100

[mempool]
max_batch_delay_ms = 1500
max_batch_size_bytes = 5000000
sync_retry_delay_ms = 2000
sync_retry_nodes = 3

[moonshot]
block_recency_bound_ms = 500
halt_block_production_when_no_txs = false
leader_elector = "FairSuccessionRotation"
max_pending_certificate_requests = 128
message_recency_bound_rounds = 20
sync_retry_delay_ms = 1000
timeout_delay_ms = 5000
retired_setting = 1
"#;

    struct Run {
        doc: ConfigDocument,
        warnings: Vec<String>,
        output: String,
    }

    fn run_with(text: &str, policy: &mut dyn ResolvePolicy) -> Result<Run, MigrationError> {
        let mut out = Vec::new();
        let mut ctx = StepContext::new(policy, &mut out);
        let mut doc = ConfigDocument::parse(text)?;
        for step in paths().resolve("v7-v9")? {
            doc = step.apply(doc, &mut ctx)?;
        }
        let warnings = ctx.into_warnings();
        Ok(Run {
            doc,
            warnings,
            output: String::from_utf8(out).unwrap(),
        })
    }

    fn run(text: &str) -> Result<Run, MigrationError> {
        run_with(text, &mut AssumeYes)
    }

    fn get<'d>(doc: &'d ConfigDocument, path: &str) -> &'d Value {
        doc.get(&Path::parse(path)).unwrap()
    }

    #[test]
    fn test_copies_site_specific_values() {
        let run = run(V7).unwrap();
        let doc = &run.doc;

        assert_eq!(get(doc, "node.rpc_access_port"), &Value::Int(27000));
        assert_eq!(
            get(doc, "node.ws_server.certificates.root_ca_cert_path"),
            &Value::from("./certs/ca.pem")
        );
        assert_eq!(
            get(doc, "node.ws_server.certificates.cert_path"),
            &Value::from("./certs/server.pem")
        );
        assert_eq!(
            get(doc, "node.ws_server.certificates.private_key_path"),
            &Value::from("./certs/server_key.pem")
        );
        assert_eq!(
            get(doc, "node.database_setup.dbs.chain_store.rocks_db.path"),
            &Value::from("./data/smr_storage")
        );
        assert_eq!(
            get(doc, "node.database_setup.dbs.ledger.rocks_db.path"),
            &Value::from("./data/ledger_storage")
        );
        assert_eq!(
            get(doc, "node.database_setup.snapshot_config.path"),
            &Value::from("./data/snapshot")
        );
        // Template-only settings come through untouched.
        assert_eq!(get(doc, "node.ws_server.max_connections"), &Value::Int(1024));
        // v7 certificate keys are not carried into [node].
        assert!(!doc.has(&Path::parse("node.server_cert_path")));
        assert!(run.warnings.is_empty());
    }

    #[test]
    fn test_assume_yes_applies_recommended_values() {
        let run = run(V7).unwrap();
        assert_eq!(get(&run.doc, "node.resume"), &Value::Bool(true));
        assert_eq!(
            get(&run.doc, "node.database_setup.prune_config.epochs_to_retain"),
            &Value::Int(84)
        );
        assert!(run.output.contains("`resume = false` is not recommended for new version."));
    }

    #[test]
    fn test_declining_keeps_original_values() {
        let mut keep = |_: &str| false;
        let run = run_with(V7, &mut keep).unwrap();
        assert_eq!(get(&run.doc, "node.resume"), &Value::Bool(false));
        assert_eq!(
            get(&run.doc, "node.database_setup.prune_config.epochs_to_retain"),
            &Value::Int(100)
        );
        assert!(run.output.contains("✓ Keep original config: `resume = false`"));
    }

    #[test]
    fn test_source_only_keys_are_dropped() {
        let run = run(V7).unwrap();
        assert!(!run.doc.has(&Path::parse("moonshot.retired_setting")));
    }

    #[test]
    fn test_scans_each_section_in_order() {
        let run = run(V7).unwrap();
        let labels = [
            "node root",
            "ledger",
            "chain store",
            "snapshot",
            "prune",
            "mempool",
            "moonshot",
        ];
        let mut cursor = 0;
        for label in labels {
            let needle = format!("\nScanning {} configuration ...\n", label);
            let found = run.output[cursor..]
                .find(&needle)
                .unwrap_or_else(|| panic!("no scan of {label} after byte {cursor}"));
            cursor += found + needle.len();
        }
    }

    #[test]
    fn test_optional_sections_fall_back_to_template() {
        let text = V7
            .replace("[node.database_setup.snapshot_config]", "[unused_snapshot]")
            .replace("[node.database_setup.prune_config]", "[unused_prune]");
        let run = run(&text).unwrap();
        assert_eq!(
            get(&run.doc, "node.database_setup.snapshot_config.path"),
            &Value::from("./configs/snapshot")
        );
        assert_eq!(
            get(&run.doc, "node.database_setup.prune_config.epochs_to_retain"),
            &Value::Int(84)
        );
        assert!(!run.output.contains("Scanning snapshot configuration"));
        assert!(run
            .output
            .contains("[node.database_setup.prune_config] not found in v7 config"));
    }

    #[test]
    fn test_missing_certificate_is_left_unset() {
        let text = V7.replace("server_cert_path = \"./certs/server.pem\"\n", "");
        let run = run(&text).unwrap();
        assert!(!run.doc.has(&Path::parse("node.ws_server.certificates.cert_path")));
        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].starts_with("`server_cert_path` not found in [node]"));
    }

    #[test]
    fn test_rejects_existing_ws_server() {
        let text = format!("{}\n[node.ws_server]\nmax_connections = 1\n", V7);
        let err = run(&text).err().unwrap();
        assert!(err.is_schema_precondition());
        assert!(err
            .to_string()
            .starts_with("[node.ws_server] table should not exist in v7 config."));
    }

    #[test]
    fn test_requires_mempool() {
        let text = V7.replace("[mempool]", "[old_mempool]");
        let err = run(&text).err().unwrap();
        assert!(err.to_string().starts_with("[mempool] table should exist in v7 config."));
    }

    #[test]
    fn test_optional_section_missing_from_template() {
        let source = ConfigDocument::parse(V7).unwrap();
        let mut dest = templates::load_document(SMR_SETTINGS_V9_NAME).unwrap();
        dest.remove(&Path::parse(PRUNE)).unwrap();

        let mut out = Vec::new();
        let mut policy = AssumeYes;
        let mut ctx = StepContext::new(&mut policy, &mut out);
        let err = migrate_optional(&source, &mut dest, PRUNE, "prune", None, &mut ctx).unwrap_err();
        match err {
            MigrationError::Template(TemplateError::MissingTable { template, table }) => {
                assert_eq!(template, SMR_SETTINGS_V9_NAME);
                assert_eq!(table, "node.database_setup.prune_config");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
