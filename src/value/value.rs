//! Core value types and operations.

use indexmap::IndexMap;
use std::fmt;
use toml::value::Datetime;

/// Value represents a single TOML entry: a scalar, a list or a nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Datetime(Datetime),
    List(Vec<Value>),
    Table(Table),
}

/// Table maps keys to values, preserving insertion order.
///
/// Equality is structural: two tables are equal when they hold the same
/// keys with equal values, regardless of key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    fields: IndexMap<String, Value>,
}

impl Value {
    /// Returns the TOML name of this value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::List(_) => "list",
            Value::Table(_) => "table",
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true for values a node config treats as "not filled in":
    /// empty strings, lists and tables, and numeric zero.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::List(l) => l.is_empty(),
            Value::Table(t) => t.is_empty(),
            Value::Bool(_) | Value::Datetime(_) => false,
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Table {
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Inserts or replaces a value. A replaced key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Removes a key, shifting later keys up so the remaining order is kept.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Table {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(d) => Value::Datetime(d),
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Table(Table::from(table)),
        }
    }
}

impl From<toml::Table> for Table {
    fn from(table: toml::Table) -> Self {
        table.into_iter().collect()
    }
}

impl From<Value> for toml::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => toml::Value::String(s),
            Value::Int(i) => toml::Value::Integer(i),
            Value::Float(f) => toml::Value::Float(f),
            Value::Bool(b) => toml::Value::Boolean(b),
            Value::Datetime(d) => toml::Value::Datetime(d),
            Value::List(items) => {
                toml::Value::Array(items.into_iter().map(toml::Value::from).collect())
            }
            Value::Table(table) => toml::Value::Table(toml::Table::from(table)),
        }
    }
}

impl From<Table> for toml::Table {
    fn from(table: Table) -> Self {
        table
            .into_iter()
            .map(|(k, v)| (k, toml::Value::from(v)))
            .collect()
    }
}

/// Renders the value in TOML inline syntax, e.g. `"abc"`, `[1, 2]`, `{ a = 1 }`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&toml::Value::from(self.clone()), f)
    }
}

/// Parse a table from TOML text.
pub fn from_toml(text: &str) -> Result<Table, toml::de::Error> {
    toml::from_str::<toml::Table>(text).map(Table::from)
}

/// Serialize a table to TOML text.
pub fn to_toml(table: &Table) -> Result<String, toml::ser::Error> {
    toml::to_string(&toml::Table::from(table.clone()))
}
