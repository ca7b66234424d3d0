//! Line-based unified diff.

use similar::{Algorithm, ChangeTag, DiffTag, TextDiff};

/// Number of unchanged lines shown around each change by default.
pub const DEFAULT_CONTEXT: usize = 3;

/// DiffLineKind tags each output line for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `---` / `+++` label lines.
    FileHeader,
    /// `@@ -a,b +c,d @@` lines.
    HunkHeader,
    Context,
    Addition,
    Deletion,
}

/// DiffLine is one rendered line of a unified diff, prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: DiffLineKind, text: impl Into<String>) -> Self {
        DiffLine {
            kind,
            text: text.into(),
        }
    }

    /// Returns true for additions and deletions.
    pub fn is_change(&self) -> bool {
        matches!(self.kind, DiffLineKind::Addition | DiffLineKind::Deletion)
    }
}

/// UnifiedDiff holds the annotated lines of a diff between two texts.
///
/// Identical inputs produce no lines at all, not even the file headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedDiff {
    lines: Vec<DiffLine>,
}

impl UnifiedDiff {
    /// Returns true if the two texts were identical.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the annotated lines.
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Returns an iterator over the annotated lines.
    pub fn iter(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter()
    }

    /// Returns the number of added or deleted lines.
    pub fn change_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_change()).count()
    }

    /// Returns the number of lines of the given kind.
    pub fn count(&self, kind: DiffLineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

/// Computes the unified diff of `before` and `after`.
///
/// The result is a pure function of the inputs. Hunks carry `context` lines of
/// surrounding unchanged text, and changes separated by at most twice that
/// many unchanged lines share a hunk.
pub fn unified_diff(
    before: &str,
    after: &str,
    before_label: &str,
    after_label: &str,
    context: usize,
) -> UnifiedDiff {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_lines(before, after);

    let mut lines = Vec::new();
    for group in diff.grouped_ops(context) {
        if group.iter().all(|op| op.tag() == DiffTag::Equal) {
            continue;
        }
        if lines.is_empty() {
            lines.push(DiffLine::new(DiffLineKind::FileHeader, format!("--- {}", before_label)));
            lines.push(DiffLine::new(DiffLineKind::FileHeader, format!("+++ {}", after_label)));
        }

        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        lines.push(DiffLine::new(
            DiffLineKind::HunkHeader,
            format!(
                "@@ -{} +{} @@",
                format_range(group[0].old_range().start, old_len),
                format_range(group[0].new_range().start, new_len)
            ),
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let value = change.value().trim_end_matches('\n');
                lines.push(match change.tag() {
                    ChangeTag::Equal => DiffLine::new(DiffLineKind::Context, format!(" {}", value)),
                    ChangeTag::Delete => DiffLine::new(DiffLineKind::Deletion, format!("-{}", value)),
                    ChangeTag::Insert => DiffLine::new(DiffLineKind::Addition, format!("+{}", value)),
                });
            }
        }
    }

    UnifiedDiff { lines }
}

/// Formats a hunk range: a single line is `start`, an empty range points at
/// the line before it.
fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}
