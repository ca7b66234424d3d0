//! The migration orchestrator.

use super::error::MigrationError;
use super::options::MigrationOptions;
use super::registry::MigrationPathSet;
use super::step::StepContext;
use crate::diff::{unified_diff, write_report, AnsiRenderer, DiffRenderer, PlainRenderer, UnifiedDiff};
use crate::document::ConfigDocument;
use crate::reconcile::{AssumeYes, Prompter, ResolvePolicy};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// MigrationReport describes a completed run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub from_version: String,
    pub to_version: String,
    pub backup_path: PathBuf,
    pub destination: PathBuf,
    /// Diff between the re-serialized original and the migrated document.
    pub diff: UnifiedDiff,
    /// Issues flagged for manual review.
    pub warnings: Vec<String>,
}

/// MigrationOutcome is the result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum MigrationOutcome {
    Migrated(MigrationReport),
    /// The user declined to overwrite the source file; nothing was written.
    Aborted,
}

impl MigrationOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, MigrationOutcome::Aborted)
    }

    pub fn report(&self) -> Option<&MigrationReport> {
        match self {
            MigrationOutcome::Migrated(report) => Some(report),
            MigrationOutcome::Aborted => None,
        }
    }
}

/// Returns the backup location for `from_path`: `<from_path>_<version>.bak`.
pub fn backup_path(from_path: &Path, from_version: &str) -> PathBuf {
    let mut name = OsString::from(from_path.as_os_str());
    name.push(format!("_{}.bak", from_version));
    PathBuf::from(name)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn default_policy<'p>(assume_yes: bool) -> Box<dyn ResolvePolicy + 'p> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(Prompter::stdin())
    }
}

/// Migration drives one run: resolve the path, load and snapshot the source,
/// run each step, write the backup and the destination, then report the diff.
///
/// Nothing is written until every step has succeeded and the result has
/// serialized, so a failing step leaves the files on disk untouched.
pub struct Migration<'a> {
    paths: &'a MigrationPathSet,
    options: MigrationOptions,
    policy: Option<Box<dyn ResolvePolicy + 'a>>,
    out: Box<dyn Write + 'a>,
}

impl<'a> Migration<'a> {
    /// Creates an orchestrator writing to stdout. Without an explicit policy,
    /// questions are answered by `options.assume_yes` or asked on stdin.
    pub fn new(paths: &'a MigrationPathSet, options: MigrationOptions) -> Self {
        Migration {
            paths,
            options,
            policy: None,
            out: Box::new(io::stdout()),
        }
    }

    /// Replaces the resolve policy.
    pub fn with_policy(mut self, policy: impl ResolvePolicy + 'a) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Replaces the output stream.
    pub fn with_output(mut self, out: impl Write + 'a) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Migrates `from_path` along the path `key`, writing the result to `to_path`.
    pub fn migrate(
        &mut self,
        key: &str,
        from_path: &Path,
        to_path: &Path,
    ) -> Result<MigrationOutcome, MigrationError> {
        let paths = self.paths;
        let steps = paths.resolve(key)?;
        let (from_version, to_version) = paths.versions(key)?;
        debug!(key, steps = steps.len(), "resolved migration path");

        let source = fs::read_to_string(from_path).map_err(|e| MigrationError::io(from_path, e))?;
        let document = ConfigDocument::parse(&source)?;
        let original = document.clone();
        let backup = backup_path(from_path, &from_version);

        let assume_yes = self.options.assume_yes;
        let policy = self
            .policy
            .get_or_insert_with(|| default_policy(assume_yes))
            .as_mut();
        let out = self.out.as_mut();

        if same_file(from_path, to_path) {
            writeln!(
                out,
                "Warning: The source and destination paths are the same ({}).",
                from_path.display()
            )?;
            writeln!(
                out,
                "A backup of your original config will be saved to: {}",
                backup.display()
            )?;
            if !policy.confirm("This will overwrite your original config file. Continue?", out)? {
                writeln!(out, "Aborted by user.")?;
                info!("migration aborted by user");
                return Ok(MigrationOutcome::Aborted);
            }
        }

        let mut ctx = StepContext::new(&mut *policy, &mut *out);
        let mut working = document;
        for step in steps {
            info!(step = step.name, "running migration step");
            ctx.note(format_args!("Running migration step: {}", step.name))?;
            working = step.apply(working, &mut ctx)?;
        }
        let warnings = ctx.into_warnings();

        let original_text = original.serialize()?;
        let migrated_text = working.serialize()?;

        writeln!(out, "Backing up old config to {}", backup.display())?;
        fs::write(&backup, &source).map_err(|e| MigrationError::io(&backup, e))?;
        debug!(path = %backup.display(), "wrote backup");

        writeln!(out, "Writing new config to {}", to_path.display())?;
        fs::write(to_path, &migrated_text).map_err(|e| MigrationError::io(to_path, e))?;
        debug!(path = %to_path.display(), "wrote migrated config");

        let diff = unified_diff(
            &original_text,
            &migrated_text,
            &from_version,
            &to_version,
            self.options.context_lines,
        );
        let renderer: &dyn DiffRenderer = if self.options.color {
            &AnsiRenderer
        } else {
            &PlainRenderer
        };
        write_report(renderer, &diff, &from_version, &to_version, out)?;
        write_summary(out, from_path, to_path, &warnings)?;
        out.flush()?;

        info!(changes = diff.change_count(), "migration complete");
        Ok(MigrationOutcome::Migrated(MigrationReport {
            from_version,
            to_version,
            backup_path: backup,
            destination: to_path.to_path_buf(),
            diff,
            warnings,
        }))
    }
}

fn write_summary(out: &mut dyn Write, from_path: &Path, to_path: &Path, warnings: &[String]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Config migrated from {} to {}.",
        from_path.display(),
        to_path.display()
    )?;
    writeln!(out, "Please double check above for the diff between old and new config.")?;
    writeln!(out, "Please ensure to use the new config file for target binary version.")?;
    writeln!(
        out,
        "NOTE: comments may not be preserved in the new config file, so you may need to restore them manually."
    )?;
    if !warnings.is_empty() {
        writeln!(out, "The following items need manual review:")?;
        for warning in warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }
    Ok(())
}
