//! Generated values and the documents assembled from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key carrying a document identifier.
pub const ID_FIELD: &str = "_id";

/// A single value produced by a field generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<GeneratedValue>),
}

impl GeneratedValue {
    /// Returns the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array value.
    pub fn as_array(&self) -> Option<&[GeneratedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<GeneratedValue> for Value {
    fn from(value: GeneratedValue) -> Self {
        match value {
            GeneratedValue::Bool(b) => Value::Bool(b),
            GeneratedValue::Int(i) => Value::from(i),
            GeneratedValue::String(s) => Value::String(s),
            GeneratedValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
        }
    }
}

/// A flat document: field name to JSON value, in insertion order.
///
/// Generated documents and documents loaded from CSV/JSON sources share this
/// type so they can flow through the same bulk pipeline. Re-inserting an
/// existing field replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a field, overwriting any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The reserved `_id` value, when present.
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in output order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_value_to_json() {
        let value = GeneratedValue::Array(vec![
            GeneratedValue::Int(3),
            GeneratedValue::Bool(false),
            GeneratedValue::String("x".to_string()),
        ]);
        assert_eq!(Value::from(value), json!([3, false, "x"]));
    }

    #[test]
    fn test_document_preserves_insertion_order() {
        let mut doc = Document::new();
        doc.insert("b", 1);
        doc.insert("a", 2);
        doc.insert("c", 3);

        let names: Vec<&str> = doc.field_names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"b":1,"a":2,"c":3}"#);
    }

    #[test]
    fn test_duplicate_field_overwrites() {
        let mut doc = Document::new();
        doc.insert("name", "first");
        doc.insert("age", 7);
        doc.insert("name", "second");

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("name"), Some(&json!("second")));
    }

    #[test]
    fn test_document_id() {
        let mut doc = Document::new();
        assert!(doc.id().is_none());
        doc.insert(ID_FIELD, 12);
        assert_eq!(doc.id(), Some(&json!(12)));
    }
}
