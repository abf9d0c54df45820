//! Option sources and their projection into `(value, label, disabled)` entries.

use crate::collection::Collection;
use crate::error::LookupError;
use crate::value::Value;

/// A `(value, label, disabled)` option given as an explicit tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionTuple {
    pub value: Value,
    pub label: Value,
    pub disabled: bool,
}

impl OptionTuple {
    pub fn new(value: impl Into<Value>, label: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl<V: Into<Value>, L: Into<Value>> From<(V, L)> for OptionTuple {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

impl<V: Into<Value>, L: Into<Value>> From<(V, L, bool)> for OptionTuple {
    fn from((value, label, disabled): (V, L, bool)) -> Self {
        Self::new(value, label).disabled(disabled)
    }
}

/// Field names used to project collection models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub id: String,
    pub text: String,
    pub disabled: Option<String>,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            id: "id".into(),
            text: "text".into(),
            disabled: None,
        }
    }
}

/// One renderable option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    pub value: Value,
    pub label: String,
    pub disabled: bool,
}

/// The ordered set of choices presented by a select.
///
/// # Example
///
/// ```
/// use selectview::{Attributes, OptionSource};
///
/// let source = OptionSource::tuples([("one", "Option One"), ("two", "Option Two")]);
/// let entries = source.entries(&Attributes::default());
/// assert_eq!(entries[1].label, "Option Two");
/// ```
#[derive(Debug, Clone)]
pub enum OptionSource {
    /// Each scalar is both value and label.
    Scalars(Vec<Value>),
    /// Explicit `(value, label, disabled)` triples.
    Tuples(Vec<OptionTuple>),
    /// A live collection of models.
    Collection(Collection),
}

impl OptionSource {
    pub fn scalars<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Scalars(items.into_iter().map(Into::into).collect())
    }

    pub fn tuples<T: Into<OptionTuple>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuples(items.into_iter().map(Into::into).collect())
    }

    /// Parse a JSON array of scalars or of `[value, label, disabled?]` arrays.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let items: Vec<serde_json::Value> = serde_json::from_str(json)?;
        if items.first().is_some_and(serde_json::Value::is_array) {
            let tuples = items
                .into_iter()
                .map(|item| {
                    let parts: Vec<Value> = serde_json::from_value(item)?;
                    let mut parts = parts.into_iter();
                    let value = parts.next().unwrap_or_default();
                    let label = parts.next().unwrap_or_default();
                    let disabled = parts.next().is_some_and(|d| d.is_truthy());
                    Ok(OptionTuple::new(value, label).disabled(disabled))
                })
                .collect::<serde_json::Result<Vec<_>>>()?;
            return Ok(Self::Tuples(tuples));
        }
        let scalars = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<Value>>>()?;
        Ok(Self::Scalars(scalars))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(coll) => Some(coll),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Scalars(items) => items.len(),
            Self::Tuples(items) => items.len(),
            Self::Collection(coll) => coll.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project every option into a renderable entry.
    pub fn entries(&self, attrs: &Attributes) -> Vec<OptionEntry> {
        match self {
            Self::Scalars(items) => items
                .iter()
                .map(|item| OptionEntry {
                    value: item.clone(),
                    label: item.display(),
                    disabled: false,
                })
                .collect(),
            Self::Tuples(items) => items
                .iter()
                .map(|tuple| OptionEntry {
                    value: tuple.value.clone(),
                    label: tuple.label.display(),
                    disabled: tuple.disabled,
                })
                .collect(),
            Self::Collection(coll) => coll
                .models()
                .iter()
                .map(|model| {
                    let label = match model.get(&attrs.text) {
                        Some(text) => text.display(),
                        None => Value::from(model).display(),
                    };
                    let disabled = attrs
                        .disabled
                        .as_ref()
                        .and_then(|field| model.get(field))
                        .is_some_and(Value::is_truthy);
                    OptionEntry {
                        value: model.get_or_null(&attrs.id),
                        label,
                        disabled,
                    }
                })
                .collect(),
        }
    }

    /// The canonical value of the first option, if any.
    pub fn first_value(&self, attrs: &Attributes, yield_model: bool) -> Option<Value> {
        match self {
            Self::Scalars(items) => items.first().cloned(),
            Self::Tuples(items) => items.first().map(|t| t.value.clone()),
            Self::Collection(coll) => coll
                .first()
                .map(|model| project(model.into(), attrs, yield_model)),
        }
    }

    /// Resolve a non-empty candidate against the options.
    ///
    /// Collections accept a present model or an id (loosely matched against
    /// the id field); tuples match their value loosely; scalars require exact
    /// membership, with integers and floats compared by value. Collection
    /// results are the model or its id per `yield_model`.
    pub fn find(
        &self,
        candidate: &Value,
        attrs: &Attributes,
        yield_model: bool,
    ) -> Result<Value, LookupError> {
        match self {
            Self::Collection(coll) => {
                let model = match candidate {
                    Value::Model(model) if coll.contains(model) => Some(model.clone()),
                    Value::Model(_) => None,
                    id => coll
                        .models()
                        .into_iter()
                        .find(|m| m.get_or_null(&attrs.id).loose_eq(id)),
                };
                let model = model.ok_or_else(|| LookupError::ModelNotFound {
                    value: candidate.display(),
                })?;
                Ok(project(Value::Model(model), attrs, yield_model))
            }
            Self::Tuples(items) => items
                .iter()
                .find(|t| t.value.loose_eq(candidate))
                .map(|t| t.value.clone())
                .ok_or_else(|| LookupError::ValueNotFound {
                    value: candidate.display(),
                }),
            Self::Scalars(items) => items
                .iter()
                .find(|item| item.strict_eq(candidate))
                .cloned()
                .ok_or_else(|| LookupError::ValueNotFound {
                    value: candidate.display(),
                }),
        }
    }
}

fn project(model: Value, attrs: &Attributes, yield_model: bool) -> Value {
    match model {
        Value::Model(model) if !yield_model => model.get_or_null(&attrs.id),
        other => other,
    }
}

impl From<Collection> for OptionSource {
    fn from(coll: Collection) -> Self {
        Self::Collection(coll)
    }
}

impl From<Vec<Value>> for OptionSource {
    fn from(items: Vec<Value>) -> Self {
        Self::Scalars(items)
    }
}

impl From<Vec<OptionTuple>> for OptionSource {
    fn from(items: Vec<OptionTuple>) -> Self {
        Self::Tuples(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn collection_attrs() -> Attributes {
        Attributes {
            id: "id".into(),
            text: "title".into(),
            disabled: Some("disabled".into()),
        }
    }

    #[test]
    fn test_scalar_entries() {
        let source = OptionSource::scalars([0.0, 1.0, 1.5]);
        let entries = source.entries(&Attributes::default());
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1", "1.5"]);
        assert!(entries.iter().all(|e| !e.disabled));
    }

    #[test]
    fn test_tuple_entries() {
        let source = OptionSource::tuples([
            OptionTuple::new("one", "Option One"),
            OptionTuple::new("two", "Option Two"),
            OptionTuple::new("three", "Option Three").disabled(true),
        ]);
        let disabled: Vec<_> = source
            .entries(&Attributes::default())
            .iter()
            .map(|e| e.disabled)
            .collect();
        assert_eq!(disabled, vec![false, false, true]);
    }

    #[test]
    fn test_collection_entries() {
        let coll = Collection::new([
            Model::new().set("id", 1).set("title", "Option one"),
            Model::new().set("id", 2).set("title", "Option two").set("disabled", Value::Null),
            Model::new().set("id", 4).set("disabled", true),
        ]);
        let entries = OptionSource::from(coll).entries(&collection_attrs());

        assert_eq!(entries[0].value, Value::Int(1));
        assert_eq!(entries[0].label, "Option one");
        assert!(!entries[1].disabled);
        assert!(entries[2].disabled);
        // Without a text field the model itself is the label
        assert_eq!(entries[2].label, r#"{"disabled":true,"id":4}"#);
    }

    #[test]
    fn test_find_in_collection() {
        let coll = Collection::new([
            Model::new().set("id", 1),
            Model::new().set("id", 2),
        ]);
        let second = coll.at(1).unwrap();
        let source = OptionSource::from(coll);
        let attrs = collection_attrs();

        assert_eq!(source.find(&"2".into(), &attrs, true), Ok(Value::Model(second.clone())));
        assert_eq!(source.find(&Value::from(&second), &attrs, false), Ok(Value::Int(2)));
        assert!(source.find(&Model::new().set("id", 2).into(), &attrs, true).is_err());
        assert!(source.find(&1000.into(), &attrs, true).is_err());
    }

    #[test]
    fn test_find_scalars_is_exact() {
        let source = OptionSource::scalars(["one", "two"]);
        let attrs = Attributes::default();
        assert_eq!(source.find(&"two".into(), &attrs, true), Ok("two".into()));
        assert!(source.find(&"three".into(), &attrs, true).is_err());

        let numbers = OptionSource::scalars([0, 1, 2]);
        assert!(numbers.find(&"2".into(), &attrs, true).is_err());

        let floats = OptionSource::scalars([1.5, 2.0]);
        assert_eq!(floats.find(&2.into(), &attrs, true), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_find_tuples_is_loose() {
        let source = OptionSource::tuples([(0, "Zero"), (1, "One")]);
        assert_eq!(
            source.find(&"1".into(), &Attributes::default(), true),
            Ok(Value::Int(1))
        );
    }

    #[test]
    fn test_from_json() {
        let tuples = OptionSource::from_json(r#"[["a", "A"], ["b", "B", true]]"#).unwrap();
        let entries = tuples.entries(&Attributes::default());
        assert_eq!(entries[1].label, "B");
        assert!(entries[1].disabled);

        let scalars = OptionSource::from_json(r#"["x", 2]"#).unwrap();
        assert_eq!(scalars.len(), 2);
        assert!(!scalars.is_collection());
    }
}
