//! Path-addressed configuration document.

use super::path::{Path, PathElement};
use crate::value::{self, Table, Value};
use thiserror::Error;

/// DocumentError represents a failed lookup, mutation or codec operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("key not found: {path}")]
    KeyNotFound { path: String },

    #[error("{path}: type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("{path}: index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("empty path does not address a value")]
    EmptyPath,

    #[error("failed to parse TOML: {message}")]
    Parse { message: String },

    #[error("failed to serialize TOML: {message}")]
    Serialize { message: String },
}

impl DocumentError {
    /// Creates a key not found error.
    pub fn key_not_found(path: &Path) -> Self {
        DocumentError::KeyNotFound {
            path: display_path(path),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(path: &Path, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        DocumentError::TypeMismatch {
            path: display_path(path),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an index out of bounds error.
    pub fn index_out_of_bounds(path: &Path, index: usize, len: usize) -> Self {
        DocumentError::IndexOutOfBounds {
            path: display_path(path),
            index,
            len,
        }
    }
}

fn display_path(path: &Path) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

enum Container<'a> {
    Table(&'a Table),
    List(&'a Vec<Value>),
}

enum ContainerMut<'a> {
    Table(&'a mut Table),
    List(&'a mut Vec<Value>),
}

/// ConfigDocument is a parsed configuration file: a root table of entries.
///
/// Cloning produces a fully independent deep copy. Comments in the source text
/// are not retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Table,
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        ConfigDocument { root: Table::new() }
    }

    /// Creates a document from an existing root table.
    pub fn from_table(root: Table) -> Self {
        ConfigDocument { root }
    }

    /// Parses TOML text into a document.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        value::from_toml(text)
            .map(ConfigDocument::from_table)
            .map_err(|e| DocumentError::Parse {
                message: e.to_string(),
            })
    }

    /// Serializes the document to TOML text, keeping key insertion order.
    pub fn serialize(&self) -> Result<String, DocumentError> {
        value::to_toml(&self.root).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }

    /// Returns the root table.
    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Returns the value at `path`.
    pub fn get(&self, path: &Path) -> Result<&Value, DocumentError> {
        let (last, parent) = path.split_last().ok_or(DocumentError::EmptyPath)?;
        match self.container(&parent)? {
            Container::Table(table) => match last {
                PathElement::Key(key) => table
                    .get(key)
                    .ok_or_else(|| DocumentError::key_not_found(path)),
                PathElement::Index(_) => Err(DocumentError::type_mismatch(&parent, "list", "table")),
            },
            Container::List(list) => match last {
                PathElement::Index(i) => list
                    .get(*i)
                    .ok_or_else(|| DocumentError::index_out_of_bounds(&parent, *i, list.len())),
                PathElement::Key(_) => Err(DocumentError::type_mismatch(&parent, "table", "list")),
            },
        }
    }

    /// Returns the value at `path` mutably.
    pub fn get_mut(&mut self, path: &Path) -> Result<&mut Value, DocumentError> {
        let (last, parent) = path.split_last().ok_or(DocumentError::EmptyPath)?;
        match self.container_mut(&parent)? {
            ContainerMut::Table(table) => match last {
                PathElement::Key(key) => table
                    .get_mut(key)
                    .ok_or_else(|| DocumentError::key_not_found(path)),
                PathElement::Index(_) => Err(DocumentError::type_mismatch(&parent, "list", "table")),
            },
            ContainerMut::List(list) => match last {
                PathElement::Index(i) => {
                    let len = list.len();
                    list.get_mut(*i)
                        .ok_or_else(|| DocumentError::index_out_of_bounds(&parent, *i, len))
                }
                PathElement::Key(_) => Err(DocumentError::type_mismatch(&parent, "table", "list")),
            },
        }
    }

    /// Returns the table at `path`; the empty path addresses the root.
    pub fn get_table(&self, path: &Path) -> Result<&Table, DocumentError> {
        match self.container(path)? {
            Container::Table(table) => Ok(table),
            Container::List(_) => Err(DocumentError::type_mismatch(path, "table", "list")),
        }
    }

    /// Returns the table at `path` mutably; the empty path addresses the root.
    pub fn get_table_mut(&mut self, path: &Path) -> Result<&mut Table, DocumentError> {
        match self.container_mut(path)? {
            ContainerMut::Table(table) => Ok(table),
            ContainerMut::List(_) => Err(DocumentError::type_mismatch(path, "table", "list")),
        }
    }

    /// Returns true if a value exists at `path`.
    pub fn has(&self, path: &Path) -> bool {
        !path.is_empty() && self.get(path).is_ok()
    }

    /// Returns true if a table exists at `path`.
    pub fn has_table(&self, path: &Path) -> bool {
        matches!(self.get(path), Ok(Value::Table(_)))
    }

    /// Stores `value` at `path`, returning the value it replaced.
    ///
    /// Missing intermediate tables are created. A list index may address an
    /// existing element or the position one past the end, which appends.
    pub fn set(&mut self, path: &Path, value: impl Into<Value>) -> Result<Option<Value>, DocumentError> {
        let value = value.into();
        let (last, parent) = path.split_last().ok_or(DocumentError::EmptyPath)?;
        if !parent.is_empty() && !self.has(&parent) {
            if let Some(PathElement::Key(_)) = parent.last() {
                self.set(&parent, Table::new())?;
            }
        }

        match self.container_mut(&parent)? {
            ContainerMut::Table(table) => match last {
                PathElement::Key(key) => Ok(table.set(key.clone(), value)),
                PathElement::Index(_) => Err(DocumentError::type_mismatch(&parent, "list", "table")),
            },
            ContainerMut::List(list) => match last {
                PathElement::Index(i) if *i < list.len() => {
                    Ok(Some(std::mem::replace(&mut list[*i], value)))
                }
                PathElement::Index(i) if *i == list.len() => {
                    list.push(value);
                    Ok(None)
                }
                PathElement::Index(i) => Err(DocumentError::index_out_of_bounds(&parent, *i, list.len())),
                PathElement::Key(_) => Err(DocumentError::type_mismatch(&parent, "table", "list")),
            },
        }
    }

    /// Removes and returns the value at `path`.
    ///
    /// A missing key is an error: callers rely on this to assert that the
    /// entry they are moving is really there.
    pub fn remove(&mut self, path: &Path) -> Result<Value, DocumentError> {
        let (last, parent) = path.split_last().ok_or(DocumentError::EmptyPath)?;
        match self.container_mut(&parent)? {
            ContainerMut::Table(table) => match last {
                PathElement::Key(key) => table
                    .remove(key)
                    .ok_or_else(|| DocumentError::key_not_found(path)),
                PathElement::Index(_) => Err(DocumentError::type_mismatch(&parent, "list", "table")),
            },
            ContainerMut::List(list) => match last {
                PathElement::Index(i) if *i < list.len() => Ok(list.remove(*i)),
                PathElement::Index(i) => Err(DocumentError::index_out_of_bounds(&parent, *i, list.len())),
                PathElement::Key(_) => Err(DocumentError::type_mismatch(&parent, "table", "list")),
            },
        }
    }

    fn container(&self, path: &Path) -> Result<Container<'_>, DocumentError> {
        if path.is_empty() {
            return Ok(Container::Table(&self.root));
        }
        match self.get(path)? {
            Value::Table(table) => Ok(Container::Table(table)),
            Value::List(list) => Ok(Container::List(list)),
            other => Err(DocumentError::type_mismatch(path, "table or list", other.type_name())),
        }
    }

    fn container_mut(&mut self, path: &Path) -> Result<ContainerMut<'_>, DocumentError> {
        if path.is_empty() {
            return Ok(ContainerMut::Table(&mut self.root));
        }
        match self.get_mut(path)? {
            Value::Table(table) => Ok(ContainerMut::Table(table)),
            Value::List(list) => Ok(ContainerMut::List(list)),
            other => Err(DocumentError::type_mismatch(path, "table or list", other.type_name())),
        }
    }
}
