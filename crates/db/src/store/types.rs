//! Store value types and errors.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document does not exist.
    #[error("Document {collection}/{id} not found")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },

    /// Document data is not a JSON object.
    #[error("Document data must be a JSON object")]
    NotAnObject,

    /// Document could not be converted to or from its typed form.
    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A stored document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id.
    pub id: String,
    /// Document body, always a JSON object.
    pub data: Value,
}

impl Document {
    /// Returns a top-level field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name).filter(|v| !v.is_null())
    }

    /// Deserializes the document with its id merged in as `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        Ok(serde_json::from_value(data)?)
    }
}

/// Serializes a record into document data, dropping its `id` field.
pub fn to_data<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    let mut data = serde_json::to_value(value)?;
    match &mut data {
        Value::Object(map) => {
            map.remove("id");
            Ok(data)
        }
        _ => Err(StoreError::NotAnObject),
    }
}

/// Comparison operator of a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// One `(field, op, value)` query condition.
///
/// A document lacking the field never matches, whatever the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Top-level field name.
    pub field: String,
    /// Operator.
    pub op: FilterOp,
    /// Operand.
    pub value: Value,
}

impl Filter {
    /// Builds a filter.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }
}

/// Result ordering by one top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field name.
    pub field: String,
    /// Largest first when true.
    pub descending: bool,
}

impl OrderBy {
    /// Ascending order.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending order.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// One write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite, see [`super::DocumentStore::set_document`].
    Set {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
        /// Document data.
        data: Value,
        /// Deep-merge into the existing document.
        merge: bool,
    },
    /// Partial update of an existing document.
    Update {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
        /// Top-level fields to replace.
        data: Value,
    },
    /// Delete a document.
    Delete {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },
}

impl WriteOp {
    /// Partial update op.
    pub fn update(collection: &str, id: impl Into<String>, data: Value) -> Self {
        Self::Update {
            collection: collection.to_string(),
            id: id.into(),
            data,
        }
    }

    /// Set op.
    pub fn set(collection: &str, id: impl Into<String>, data: Value, merge: bool) -> Self {
        Self::Set {
            collection: collection.to_string(),
            id: id.into(),
            data,
            merge,
        }
    }
}

/// Deep-merges `patch` into `target`. Nested objects merge key by key,
/// everything else is replaced.
pub(crate) fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Replaces top-level fields of `target` with those of `patch`.
pub(crate) fn shallow_update(target: &mut Value, patch: Value) -> Result<(), StoreError> {
    let (Value::Object(target), Value::Object(patch)) = (target, patch) else {
        return Err(StoreError::NotAnObject);
    };
    for (key, value) in patch {
        target.insert(key, value);
    }
    Ok(())
}

/// Fails unless `data` is a JSON object.
pub(crate) fn ensure_object(data: &Value) -> Result<(), StoreError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject)
    }
}

/// Empty object.
pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}
