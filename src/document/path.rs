//! Path element and path types.

use std::fmt;

/// PathElement represents one level of navigation inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Key of a table entry.
    Key(String),
    /// Position inside a list.
    Index(usize),
}

impl PathElement {
    /// Creates a new key path element.
    pub fn key(name: impl Into<String>) -> Self {
        PathElement::Key(name.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    /// Returns the key if this is a key element.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathElement::Key(name) => Some(name),
            PathElement::Index(_) => None,
        }
    }
}

/// Path addresses a value nested inside a document's tables and lists.
///
/// The textual form joins keys with `.` and writes list positions as `[i]`,
/// so `database_setup.snapshot_config[0].path` is a key, key, index, key path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path, addressing the document root.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Parses the dotted textual form. Segments of the form `name[i]` produce
    /// a key followed by an index; a malformed bracket is kept as part of the key.
    pub fn parse(text: &str) -> Self {
        let mut elements = Vec::new();
        for segment in text.split('.').filter(|s| !s.is_empty()) {
            let mut rest = segment;
            let mut indices = Vec::new();
            while let Some(stripped) = rest.strip_suffix(']') {
                let Some(open) = stripped.rfind('[') else {
                    break;
                };
                match stripped[open + 1..].parse::<usize>() {
                    Ok(i) => {
                        indices.push(i);
                        rest = &stripped[..open];
                    }
                    Err(_) => break,
                }
            }
            if !rest.is_empty() {
                elements.push(PathElement::key(rest));
            }
            elements.extend(indices.into_iter().rev().map(PathElement::Index));
        }
        Path { elements }
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path addresses the root.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the path elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Removes and returns the last path element.
    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    /// Returns the last path element.
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.push(element);
        new_path
    }

    /// Creates a new path with a key element appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        self.with(PathElement::key(key))
    }

    /// Splits off the last element, returning it with the parent path.
    pub fn split_last(&self) -> Option<(&PathElement, Path)> {
        self.elements
            .split_last()
            .map(|(last, parent)| (last, Path::from_elements(parent.to_vec())))
    }

    /// Returns a slice of the path elements.
    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }
}

impl From<&str> for Path {
    fn from(text: &str) -> Self {
        Path::parse(text)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Key(name) if i == 0 => write!(f, "{}", name)?,
                PathElement::Key(name) => write!(f, ".{}", name)?,
                PathElement::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
