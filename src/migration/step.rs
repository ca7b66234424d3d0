//! Migration steps and the context they run in.

use super::error::MigrationError;
use crate::document::ConfigDocument;
use crate::reconcile::{ResolvePolicy, ScanReport, Scanner};
use crate::value::Table;
use std::fmt;
use std::io::{self, Write};
use tracing::warn;

/// Step body that restructures the working document in place.
pub type InPlaceFn = fn(&mut ConfigDocument, &mut StepContext<'_>) -> Result<(), MigrationError>;

/// Step body that builds a new document, usually from a bundled template,
/// reading from the working document.
pub type TemplateFn = fn(&ConfigDocument, &mut StepContext<'_>) -> Result<ConfigDocument, MigrationError>;

/// StepKind distinguishes the two step shapes.
#[derive(Clone, Copy)]
pub enum StepKind {
    InPlace(InPlaceFn),
    Template(TemplateFn),
}

/// MigrationStep is one named, stateless version-to-version transformation.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    /// Name shown in progress output.
    pub name: &'static str,
    pub kind: StepKind,
}

impl MigrationStep {
    pub const fn in_place(name: &'static str, f: InPlaceFn) -> Self {
        MigrationStep {
            name,
            kind: StepKind::InPlace(f),
        }
    }

    pub const fn template(name: &'static str, f: TemplateFn) -> Self {
        MigrationStep {
            name,
            kind: StepKind::Template(f),
        }
    }

    /// Runs the step, returning the document later steps should work on.
    pub fn apply(
        &self,
        mut document: ConfigDocument,
        ctx: &mut StepContext<'_>,
    ) -> Result<ConfigDocument, MigrationError> {
        match self.kind {
            StepKind::InPlace(f) => {
                f(&mut document, ctx)?;
                Ok(document)
            }
            StepKind::Template(f) => f(&document, ctx),
        }
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            StepKind::InPlace(_) => "in-place",
            StepKind::Template(_) => "template",
        };
        f.debug_struct("MigrationStep")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// StepContext carries what a step may use besides the documents: the output
/// stream for progress lines, the resolve policy for reconciliation, and the
/// list of issues flagged for manual review.
pub struct StepContext<'a> {
    policy: &'a mut dyn ResolvePolicy,
    out: &'a mut dyn Write,
    warnings: Vec<String>,
}

impl<'a> StepContext<'a> {
    pub fn new(policy: &'a mut dyn ResolvePolicy, out: &'a mut dyn Write) -> Self {
        StepContext {
            policy,
            out,
            warnings: Vec::new(),
        }
    }

    /// Writes a completed-action line.
    pub fn check(&mut self, message: impl fmt::Display) -> io::Result<()> {
        writeln!(self.out, "✓ {}", message)
    }

    /// Writes an informational line.
    pub fn note(&mut self, message: impl fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// Records a non-fatal issue that needs manual review.
    pub fn warn(&mut self, message: impl Into<String>) -> io::Result<()> {
        let message = message.into();
        warn!("{}", message);
        writeln!(self.out, "Warning: {}", message)?;
        self.warnings.push(message);
        Ok(())
    }

    /// Reconciles one table level against the recommended table.
    pub fn scan(
        &mut self,
        label: &str,
        original: &Table,
        recommended: &mut Table,
    ) -> io::Result<ScanReport> {
        writeln!(self.out, "\nScanning {} configuration ...", label)?;
        Scanner::new(&mut *self.policy, &mut *self.out).scan(original, recommended)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Path;
    use crate::reconcile::AssumeYes;

    fn add_flag(doc: &mut ConfigDocument, ctx: &mut StepContext<'_>) -> Result<(), MigrationError> {
        doc.set(&Path::from("flag"), true)?;
        ctx.check("Adding `flag = true` to root level")?;
        Ok(())
    }

    fn fresh(_: &ConfigDocument, ctx: &mut StepContext<'_>) -> Result<ConfigDocument, MigrationError> {
        ctx.warn("source ignored")?;
        Ok(ConfigDocument::parse("fresh = 1")?)
    }

    #[test]
    fn test_in_place_step_mutates_document() {
        let mut policy = AssumeYes;
        let mut out = Vec::new();
        let mut ctx = StepContext::new(&mut policy, &mut out);
        let step = MigrationStep::in_place("add_flag", add_flag);

        let doc = step.apply(ConfigDocument::parse("a = 1").unwrap(), &mut ctx).unwrap();
        assert!(doc.has(&Path::from("a")));
        assert!(doc.has(&Path::from("flag")));
        drop(ctx);
        assert_eq!(String::from_utf8(out).unwrap(), "✓ Adding `flag = true` to root level\n");
    }

    #[test]
    fn test_template_step_replaces_document() {
        let mut policy = AssumeYes;
        let mut out = Vec::new();
        let mut ctx = StepContext::new(&mut policy, &mut out);
        let step = MigrationStep::template("fresh", fresh);

        let doc = step.apply(ConfigDocument::parse("a = 1").unwrap(), &mut ctx).unwrap();
        assert!(!doc.has(&Path::from("a")));
        assert!(doc.has(&Path::from("fresh")));
        assert_eq!(ctx.into_warnings(), vec!["source ignored".to_string()]);
    }

    #[test]
    fn test_debug_shows_name_and_kind() {
        let step = MigrationStep::in_place("add_flag", add_flag);
        let text = format!("{:?}", step);
        assert!(text.contains("add_flag"));
        assert!(text.contains("in-place"));
    }
}
