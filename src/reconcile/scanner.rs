//! Reconciliation of user values against a new version's recommended defaults.

use super::policy::ResolvePolicy;
use crate::value::{Table, Value};
use std::io::{self, Write};

/// Width at which values are cut short in user-facing messages.
pub const DISPLAY_WIDTH: usize = 50;

/// Shortens `text` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Integers and floats holding the same number compare equal, so `1` and
/// `1.0` never raise a question.
fn values_match(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => *i as f64 == *f,
        _ => a == b,
    }
}

fn shown(value: &Value) -> String {
    truncate(&value.to_string(), DISPLAY_WIDTH)
}

/// Resolution records what happened to one recommended key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The key is new in this version; its default was kept.
    NewDefault,
    /// The user's value differed and the recommended value was applied.
    AppliedRecommended,
    /// The user's value differed and was kept.
    KeptOriginal,
}

/// ScanEntry is the resolution of a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub key: String,
    pub resolution: Resolution,
}

/// ScanReport lists every key a scan reported on. Keys whose values already
/// matched do not appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    entries: Vec<ScanEntry>,
}

impl ScanReport {
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the resolution recorded for `key`, if any.
    pub fn resolution(&self, key: &str) -> Option<Resolution> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.resolution)
    }

    /// Returns the number of entries with the given resolution.
    pub fn count(&self, resolution: Resolution) -> usize {
        self.entries
            .iter()
            .filter(|e| e.resolution == resolution)
            .count()
    }

    fn push(&mut self, key: &str, resolution: Resolution) {
        self.entries.push(ScanEntry {
            key: key.to_string(),
            resolution,
        });
    }
}

/// Scanner compares one level of a user's table against the recommended one.
pub struct Scanner<'a> {
    policy: &'a mut dyn ResolvePolicy,
    out: &'a mut dyn Write,
}

impl<'a> Scanner<'a> {
    pub fn new(policy: &'a mut dyn ResolvePolicy, out: &'a mut dyn Write) -> Self {
        Scanner { policy, out }
    }

    /// Reconciles `recommended` against `original` in place.
    ///
    /// Only non-table entries of `recommended` are considered; nested tables
    /// need their own call. Keys that exist only in `original` are never
    /// copied. For each divergent value the policy decides: yes keeps the
    /// recommended value, no restores the original one.
    pub fn scan(&mut self, original: &Table, recommended: &mut Table) -> io::Result<ScanReport> {
        let mut report = ScanReport::default();
        let keys: Vec<String> = recommended
            .iter()
            .filter(|(_, v)| !v.is_table())
            .map(|(k, _)| k.clone())
            .collect();

        for key in keys {
            let Some(new_value) = recommended.get(&key) else {
                continue;
            };
            let Some(old_value) = original.get(&key) else {
                writeln!(
                    self.out,
                    "✓ `{}` not found in original config, using new version's default value: {}",
                    key,
                    shown(new_value)
                )?;
                report.push(&key, Resolution::NewDefault);
                continue;
            };
            if values_match(old_value, new_value) {
                continue;
            }

            let question = format!(
                "`{key} = {}` is not recommended for new version.\n\
                 Do you want to apply the recommended config: `{key} = {}`?",
                shown(old_value),
                shown(new_value),
            );
            if self.policy.confirm(&question, &mut *self.out)? {
                writeln!(self.out, "✓ Apply recommended config: `{} = {}`", key, shown(new_value))?;
                report.push(&key, Resolution::AppliedRecommended);
            } else {
                writeln!(self.out, "✓ Keep original config: `{} = {}`", key, shown(old_value))?;
                recommended.set(key.clone(), old_value.clone());
                report.push(&key, Resolution::KeptOriginal);
            }
        }

        Ok(report)
    }
}
