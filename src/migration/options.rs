//! Run options for the migration orchestrator.

use crate::diff::DEFAULT_CONTEXT;

/// MigrationOptions controls how a migration run interacts with the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Answer every confirmation and reconciliation question with yes.
    pub assume_yes: bool,
    /// Color the diff report.
    pub color: bool,
    /// Unchanged lines shown around each diff hunk.
    pub context_lines: usize,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        MigrationOptions {
            assume_yes: false,
            color: true,
            context_lines: DEFAULT_CONTEXT,
        }
    }
}

impl MigrationOptions {
    /// Creates a new MigrationOptionsBuilder.
    pub fn builder() -> MigrationOptionsBuilder {
        MigrationOptionsBuilder::new()
    }
}

/// MigrationOptionsBuilder is a builder for creating MigrationOptions.
#[derive(Debug, Default)]
pub struct MigrationOptionsBuilder {
    options: MigrationOptions,
}

impl MigrationOptionsBuilder {
    pub fn new() -> Self {
        MigrationOptionsBuilder::default()
    }

    pub fn assume_yes(mut self, value: bool) -> Self {
        self.options.assume_yes = value;
        self
    }

    pub fn color(mut self, value: bool) -> Self {
        self.options.color = value;
        self
    }

    pub fn context_lines(mut self, value: usize) -> Self {
        self.options.context_lines = value;
        self
    }

    pub fn build(self) -> MigrationOptions {
        self.options
    }
}
