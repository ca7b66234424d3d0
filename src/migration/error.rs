//! Migration errors.

use crate::document::DocumentError;
use crate::templates::TemplateError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Expectation is the structural condition a step found violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    ShouldExist,
    ShouldNotExist,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::ShouldExist => write!(f, "should exist"),
            Expectation::ShouldNotExist => write!(f, "should not exist"),
        }
    }
}

/// MigrationError is any failure that aborts a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("unsupported migration path `{key}` (choices: {choices})")]
    UnknownPath { key: String, choices: String },

    #[error("invalid migration path `{key}`: expected the form `vX-vY`")]
    InvalidPathKey { key: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Output(#[from] io::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(
        "[{table}] table {expectation} in {version} config. \
         Please check that the migration path matches the version of your config file."
    )]
    SchemaPrecondition {
        table: String,
        expectation: Expectation,
        version: String,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl MigrationError {
    /// Creates an I/O error for a file.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MigrationError::Io {
            path: path.into(),
            source,
        }
    }

    /// The source config already has a table this step is about to create.
    pub fn unexpected_table(table: impl Into<String>, version: impl Into<String>) -> Self {
        MigrationError::SchemaPrecondition {
            table: table.into(),
            expectation: Expectation::ShouldNotExist,
            version: version.into(),
        }
    }

    /// The source config lacks a table this step reads from.
    pub fn missing_table(table: impl Into<String>, version: impl Into<String>) -> Self {
        MigrationError::SchemaPrecondition {
            table: table.into(),
            expectation: Expectation::ShouldExist,
            version: version.into(),
        }
    }

    /// Returns true for structural precondition failures.
    pub fn is_schema_precondition(&self) -> bool {
        matches!(self, MigrationError::SchemaPrecondition { .. })
    }
}
