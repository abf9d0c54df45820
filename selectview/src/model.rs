//! Records held by a [`Collection`](crate::Collection).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// Client-side identity of a model, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(u64);

impl Cid {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "model{}", self.0)
    }
}

/// A record with dynamic fields.
///
/// Two models are equal only when they are the same record (same [`Cid`]),
/// regardless of field contents. Cloning keeps the identity.
///
/// # Example
///
/// ```
/// use selectview::Model;
///
/// let model = Model::new().set("id", 1).set("title", "Option one");
/// assert_eq!(model.get("title").and_then(|v| v.as_str()), Some("Option one"));
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    cid: Cid,
    fields: BTreeMap<String, Value>,
}

impl Model {
    /// Creates a new empty model with a fresh identity.
    pub fn new() -> Self {
        Self {
            cid: Cid::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Creates a model from a field map.
    pub fn from_fields(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            cid: Cid::new(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, treating a missing field as null.
    pub fn get_or_null(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.cid == other.cid
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_fields(fields))
    }
}
