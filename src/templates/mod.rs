//! Bundled base documents for template-based migration steps.
//!
//! Each template is the full default config of one target version. Steps
//! parse a fresh copy per run and fill it from the source document.

use crate::document::ConfigDocument;
use crate::migration::MigrationError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default RPC node config for v9.1.x.
pub const RPC_CONFIG_V9: &str = include_str!("rpc_config_v9_1_x_mainnet.toml");

/// Default validator node settings for v9.1.x.
pub const SMR_SETTINGS_V9: &str = include_str!("smr_settings_v9_1_x_mainnet.toml");

pub const RPC_CONFIG_V9_NAME: &str = "rpc_config_v9_1_x_mainnet";
pub const SMR_SETTINGS_V9_NAME: &str = "smr_settings_v9_1_x_mainnet";

const TEMPLATES: &[(&str, &str)] = &[
    (RPC_CONFIG_V9_NAME, RPC_CONFIG_V9),
    (SMR_SETTINGS_V9_NAME, SMR_SETTINGS_V9),
];

/// TemplateError is a failure to find, read or use a bundled template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template `{name}` (available: {choices})")]
    Unknown { name: String, choices: String },

    #[error("[{table}] table should exist in template {template}")]
    MissingTable { template: String, table: String },

    #[error("failed to write template to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TemplateError {
    pub fn missing_table(template: impl Into<String>, table: impl Into<String>) -> Self {
        TemplateError::MissingTable {
            template: template.into(),
            table: table.into(),
        }
    }
}

/// Returns the names of all bundled templates.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(name, _)| *name)
}

/// Returns the raw text of a bundled template.
pub fn load_template(name: &str) -> Result<&'static str, TemplateError> {
    TEMPLATES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, text)| *text)
        .ok_or_else(|| TemplateError::Unknown {
            name: name.to_string(),
            choices: template_names().collect::<Vec<_>>().join(", "),
        })
}

/// Parses a bundled template into a fresh document.
pub fn load_document(name: &str) -> Result<ConfigDocument, MigrationError> {
    let text = load_template(name)?;
    Ok(ConfigDocument::parse(text)?)
}

/// Writes every bundled template to `<dir>/<name>.toml` and returns the
/// written paths.
pub fn dump_templates(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let mut written = Vec::with_capacity(TEMPLATES.len());
    for (name, text) in TEMPLATES {
        let path = dir.join(format!("{}.toml", name));
        fs::write(&path, text).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}
