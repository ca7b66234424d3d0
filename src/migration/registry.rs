//! Registry of named migration paths.

use super::error::MigrationError;
use super::step::MigrationStep;
use indexmap::IndexMap;

/// Separator between the two versions of a path key, as in `v7-v8`.
pub const PATH_SEPARATOR: char = '-';

/// MigrationPathSet maps path keys like `v7-v9` to their ordered steps.
///
/// The set only knows the paths registered on it; a multi-hop path is
/// registered as the concatenation of its legs, never discovered by search.
#[derive(Debug, Clone, Default)]
pub struct MigrationPathSet {
    paths: IndexMap<String, Vec<MigrationStep>>,
}

impl MigrationPathSet {
    pub fn new() -> Self {
        MigrationPathSet {
            paths: IndexMap::new(),
        }
    }

    /// Registers `steps` under `key`, replacing any earlier registration.
    pub fn register(&mut self, key: impl Into<String>, steps: Vec<MigrationStep>) -> &mut Self {
        self.paths.insert(key.into(), steps);
        self
    }

    /// Registers `key` as the steps of each leg in order.
    pub fn register_composed(&mut self, key: impl Into<String>, legs: &[&[MigrationStep]]) -> &mut Self {
        self.register(key, legs.concat())
    }

    /// Returns the ordered steps for `key`.
    pub fn resolve(&self, key: &str) -> Result<&[MigrationStep], MigrationError> {
        self.paths
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| MigrationError::UnknownPath {
                key: key.to_string(),
                choices: self.keys().collect::<Vec<_>>().join(", "),
            })
    }

    /// Splits a registered key into its from and to versions.
    pub fn versions(&self, key: &str) -> Result<(String, String), MigrationError> {
        self.resolve(key)?;
        match key.split_once(PATH_SEPARATOR) {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => {
                Ok((from.to_string(), to.to_string()))
            }
            _ => Err(MigrationError::InvalidPathKey {
                key: key.to_string(),
            }),
        }
    }

    /// Returns the registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigDocument;
    use crate::migration::StepContext;

    fn noop(_: &mut ConfigDocument, _: &mut StepContext<'_>) -> Result<(), MigrationError> {
        Ok(())
    }

    const FIRST: &[MigrationStep] = &[MigrationStep::in_place("first", noop)];
    const SECOND: &[MigrationStep] = &[
        MigrationStep::in_place("second_a", noop),
        MigrationStep::in_place("second_b", noop),
    ];

    fn sample() -> MigrationPathSet {
        let mut set = MigrationPathSet::new();
        set.register("v1-v2", FIRST.to_vec())
            .register("v2-v3", SECOND.to_vec())
            .register_composed("v1-v3", &[FIRST, SECOND]);
        set
    }

    #[test]
    fn test_resolve_and_compose() {
        let set = sample();
        assert_eq!(set.len(), 3);
        let names: Vec<&str> = set.resolve("v1-v3").unwrap().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["first", "second_a", "second_b"]);
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["v1-v2", "v2-v3", "v1-v3"]);
    }

    #[test]
    fn test_unknown_path_lists_choices() {
        let err = sample().resolve("v0-v1").unwrap_err();
        match err {
            MigrationError::UnknownPath { key, choices } => {
                assert_eq!(key, "v0-v1");
                assert_eq!(choices, "v1-v2, v2-v3, v1-v3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_versions() {
        let mut set = sample();
        assert_eq!(
            set.versions("v1-v3").unwrap(),
            ("v1".to_string(), "v3".to_string())
        );
        assert!(matches!(
            set.versions("v9-v10"),
            Err(MigrationError::UnknownPath { .. })
        ));

        set.register("latest", Vec::new());
        assert!(matches!(
            set.versions("latest"),
            Err(MigrationError::InvalidPathKey { .. })
        ));
    }
}
