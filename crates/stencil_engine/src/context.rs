//! Data context supplied to a render.
//!
//! A [`DataContext`] maps field names to [`Value`]s. Values are either scalars,
//! "not present" markers (`Null`, and `Bool(false)` for conditionals), a list
//! of nested contexts consumed by repeat blocks, or a nested map that only
//! satisfies conditionals.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::{TemplateError, TemplateResult};

/// A value stored in a [`DataContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<DataContext>),
    Map(DataContext),
}

impl Value {
    /// Whether this value counts as present for an INCLUDEIF condition.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Whether this value can be substituted into text.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Null | Value::List(_) | Value::Map(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Bool(false) | Value::List(_) | Value::Map(_) => Ok(()),
            Value::Bool(true) => f.write_str("1"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<DataContext>> for Value {
    fn from(items: Vec<DataContext>) -> Self {
        Value::List(items)
    }
}

impl From<DataContext> for Value {
    fn from(map: DataContext) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::Text(s),
            Json::Array(items) => {
                Value::List(items.into_iter().map(DataContext::from_json_lossy).collect())
            }
            json @ Json::Object(_) => Value::Map(DataContext::from_json_lossy(json)),
        }
    }
}

/// Field name to value mapping for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContext {
    fields: HashMap<String, Value>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of a list of nested contexts.
    pub fn with_list(mut self, name: impl Into<String>, items: Vec<DataContext>) -> Self {
        self.insert(name, Value::List(items));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look a field up by its exact (case-sensitive) name.
    ///
    /// Absent fields and `Null` values both come back as `None`.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// The text to substitute for a variable, if the field can be substituted.
    pub fn text(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .filter(|value| value.is_scalar() && value.is_truthy())
            .map(Value::to_string)
    }

    /// Present, and neither `false` nor `null`.
    pub fn is_satisfied(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Value::is_truthy)
    }

    /// The nested contexts of a list field.
    pub fn sequence(&self, name: &str) -> Option<&[DataContext]> {
        match self.lookup(name) {
            Some(Value::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Objects become contexts; anything else becomes an empty context.
    fn from_json_lossy(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => Self {
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            },
            _ => Self::default(),
        }
    }

    /// Parse a JSON object into a context.
    pub fn from_json_str(content: &str) -> TemplateResult<Self> {
        let json: serde_json::Value = serde_json::from_str(content)?;
        Self::try_from(json)
    }

    /// Parse a YAML mapping into a context.
    pub fn from_yaml_str(content: &str) -> TemplateResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        let json = serde_json::to_value(yaml)?;
        Self::try_from(json)
    }
}

impl TryFrom<serde_json::Value> for DataContext {
    type Error = TemplateError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        if !json.is_object() {
            return Err(TemplateError::InvalidContext(format!(
                "expected an object at the top level, found {}",
                json_kind(&json)
            )));
        }
        Ok(Self::from_json_lossy(json))
    }
}

impl<'de> Deserialize<'de> for DataContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Self::try_from(json).map_err(serde::de::Error::custom)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DataContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
