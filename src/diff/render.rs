//! Diff presentation.

use super::unified::{DiffLineKind, UnifiedDiff};
use colored::Colorize;
use std::io::{self, Write};

/// DiffRenderer writes an annotated diff to an output stream.
pub trait DiffRenderer {
    fn render(&self, diff: &UnifiedDiff, out: &mut dyn Write) -> io::Result<()>;
}

/// PlainRenderer writes diff lines without decoration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl DiffRenderer for PlainRenderer {
    fn render(&self, diff: &UnifiedDiff, out: &mut dyn Write) -> io::Result<()> {
        for line in diff.iter() {
            writeln!(out, "{}", line.text)?;
        }
        Ok(())
    }
}

/// AnsiRenderer colors additions green, deletions red and hunk headers cyan.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer;

impl DiffRenderer for AnsiRenderer {
    fn render(&self, diff: &UnifiedDiff, out: &mut dyn Write) -> io::Result<()> {
        for line in diff.iter() {
            let text = line.text.as_str();
            match line.kind {
                DiffLineKind::Addition => writeln!(out, "{}", text.green())?,
                DiffLineKind::Deletion => writeln!(out, "{}", text.red())?,
                DiffLineKind::HunkHeader => writeln!(out, "{}", text.cyan())?,
                DiffLineKind::FileHeader | DiffLineKind::Context => writeln!(out, "{}", text)?,
            }
        }
        Ok(())
    }
}

/// Writes `diff` framed by begin/end banners naming both versions.
pub fn write_report(
    renderer: &dyn DiffRenderer,
    diff: &UnifiedDiff,
    from_label: &str,
    to_label: &str,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(
        out,
        "|----------------- Begin diff {} vs {} -----------------|",
        from_label, to_label
    )?;
    renderer.render(diff, out)?;
    writeln!(
        out,
        "|----------------- End diff {} vs {} -----------------|",
        from_label, to_label
    )
}
