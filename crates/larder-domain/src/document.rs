//! Schemaless documents and equality filters

use crate::naming::USED_BY_FIELD;
use serde_json::{Map, Value};

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Options for inserting a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Overwrite a document equal to this one instead of inserting a duplicate
    pub upsert: bool,
}

impl InsertOptions {
    /// Plain insert
    pub fn insert() -> Self {
        Self { upsert: false }
    }

    /// Insert-or-overwrite
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// Conjunction of top-level field equalities
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, Value)>,
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching documents whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    /// Add another equality condition
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Filter that matches documents carrying every field of `doc`
    pub fn from_document(doc: &Document) -> Self {
        Self {
            fields: doc.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Whether a document satisfies every condition
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    /// Whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read the `usedBy` tag of a settings record
pub fn used_by(doc: &Document) -> Option<&str> {
    doc.get(USED_BY_FIELD).and_then(Value::as_str)
}
