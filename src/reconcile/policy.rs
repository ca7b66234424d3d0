//! Resolve policies for yes/no decisions.

use std::io::{self, BufRead, Write};

/// ResolvePolicy answers a yes/no question posed during a migration.
///
/// `true` means "yes": apply the recommended value, or proceed with the
/// overwrite. Any closure `FnMut(&str) -> bool` is a policy, which keeps
/// scripted answers in tests short.
pub trait ResolvePolicy {
    fn confirm(&mut self, message: &str, out: &mut dyn Write) -> io::Result<bool>;
}

impl<F: FnMut(&str) -> bool> ResolvePolicy for F {
    fn confirm(&mut self, message: &str, _out: &mut dyn Write) -> io::Result<bool> {
        Ok(self(message))
    }
}

/// AssumeYes answers every question with yes, echoing it so the log shows
/// what was accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ResolvePolicy for AssumeYes {
    fn confirm(&mut self, message: &str, out: &mut dyn Write) -> io::Result<bool> {
        writeln!(out, "{} (assuming yes)", message)?;
        Ok(true)
    }
}

/// Prompter asks interactively and reads the answer from `input`.
///
/// Only `y` or `yes` (any case) count as yes; end of input counts as no.
pub struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Prompter { input }
    }
}

impl Prompter<io::StdinLock<'static>> {
    /// Creates a prompter reading from standard input.
    pub fn stdin() -> Self {
        Prompter::new(io::stdin().lock())
    }
}

impl<R: BufRead> ResolvePolicy for Prompter<R> {
    fn confirm(&mut self, message: &str, out: &mut dyn Write) -> io::Result<bool> {
        write!(out, "{} [y/N]: ", message)?;
        out.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
