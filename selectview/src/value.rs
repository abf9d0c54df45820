//! Dynamic option values.

use serde::{Deserialize, Serialize};

use crate::model::Model;

/// A value held by a select: an option value, a record id, or a whole record.
///
/// Values compare loosely through [`Value::key`]: the key is the string an
/// `<option>` element would carry, so `"1"` matches `1`. Native controls only
/// ever report strings while record ids are often numeric, and the key is the
/// single place where that cross-type matching is defined.
///
/// # Example
///
/// ```
/// use selectview::Value;
///
/// assert!(Value::from("1").loose_eq(&Value::from(1)));
/// assert!(Value::from(1.5).loose_eq(&Value::from("1.5")));
/// assert!(!Value::from("one").loose_eq(&Value::from(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value / unselected.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A record from a collection.
    Model(Model),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null and the empty string both mean "nothing selected".
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used for the disabled flag of options.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Model(_) => true,
        }
    }

    /// Comparable key, i.e. the string a native `<option>` would carry.
    ///
    /// Null maps to the empty string. Models have no key.
    pub fn key(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format_float(*f)),
            Value::String(s) => Some(s.clone()),
            Value::Model(_) => None,
        }
    }

    /// Loose equality: models by identity, everything else by key.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Model(a), Value::Model(b)) => a == b,
            (Value::Model(_), _) | (_, Value::Model(_)) => false,
            _ => self.key() == other.key(),
        }
    }

    /// Strict equality, except that integers and floats compare by numeric value.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => *i as f64 == *f,
            _ => self == other,
        }
    }

    /// Text shown to the user for this value.
    pub fn display(&self) -> String {
        match self {
            Value::Model(model) => serde_json::to_string(model).unwrap_or_default(),
            other => other.key().unwrap_or_default(),
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Model> for Value {
    fn from(v: Model) -> Self {
        Value::Model(v)
    }
}

impl From<&Model> for Value {
    fn from(v: &Model) -> Self {
        Value::Model(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
